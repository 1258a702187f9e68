use std::collections::BTreeMap;
use std::ops::Bound;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rbtree_index::comparator::{ByFn, CaseInsensitive, NaturalOrder, Reverse};
use rbtree_index::{RbTreeMap, TreeConfig};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a range smaller than TEST_SIZE so that overwrites and deletes hit.
fn key_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build(keys: &[i64]) -> RbTreeMap<i64, i64> {
    let mut map = RbTreeMap::new();
    for &k in keys {
        map.set(k, k * 10).unwrap();
    }
    map
}

fn floor_of(model: &BTreeMap<i64, i64>, q: i64) -> Option<(&i64, &i64)> {
    model.range(..=q).next_back()
}

fn ceil_of(model: &BTreeMap<i64, i64>, q: i64) -> Option<(&i64, &i64)> {
    model.range(q..).next()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Set(i64, i64),
    Delete(i64),
    Get(i64),
    Has(i64),
    Floor(i64),
    Ceil(i64),
    Successor(i64),
    Predecessor(i64),
    Min,
    Max,
    PopMin,
    PopMax,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Set(k, v)),
        4 => key_strategy().prop_map(MapOp::Delete),
        1 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Has),
        1 => key_strategy().prop_map(MapOp::Floor),
        1 => key_strategy().prop_map(MapOp::Ceil),
        1 => key_strategy().prop_map(MapOp::Successor),
        1 => key_strategy().prop_map(MapOp::Predecessor),
        1 => Just(MapOp::Min),
        1 => Just(MapOp::Max),
        1 => Just(MapOp::PopMin),
        1 => Just(MapOp::PopMax),
    ]
}

// ─── Model-checked operations ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RbTreeMap and BTreeMap, asserting
    /// identical results and a valid tree at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb_map: RbTreeMap<i64, i64> = RbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Set(k, v) => {
                    prop_assert_eq!(rb_map.set(k, v), Ok(bt_map.insert(k, v)), "set({}, {})", k, v);
                }
                MapOp::Delete(k) => {
                    prop_assert_eq!(rb_map.delete(&k), bt_map.remove(&k), "delete({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb_map.get(&k), bt_map.get(&k), "get({})", k);
                }
                MapOp::Has(k) => {
                    prop_assert_eq!(rb_map.has(&k), bt_map.contains_key(&k), "has({})", k);
                }
                MapOp::Floor(k) => {
                    prop_assert_eq!(rb_map.floor(&k), floor_of(&bt_map, k), "floor({})", k);
                }
                MapOp::Ceil(k) => {
                    prop_assert_eq!(rb_map.ceil(&k), ceil_of(&bt_map, k), "ceil({})", k);
                }
                MapOp::Successor(k) => {
                    let expected = if bt_map.contains_key(&k) {
                        bt_map.range((Bound::Excluded(k), Bound::Unbounded)).next()
                    } else {
                        None
                    };
                    prop_assert_eq!(rb_map.successor(&k), expected, "successor({})", k);
                }
                MapOp::Predecessor(k) => {
                    let expected = if bt_map.contains_key(&k) { bt_map.range(..k).next_back() } else { None };
                    prop_assert_eq!(rb_map.predecessor(&k), expected, "predecessor({})", k);
                }
                MapOp::Min => {
                    prop_assert_eq!(rb_map.min(), bt_map.first_key_value(), "min");
                }
                MapOp::Max => {
                    prop_assert_eq!(rb_map.max(), bt_map.last_key_value(), "max");
                }
                MapOp::PopMin => {
                    prop_assert_eq!(rb_map.pop_min(), bt_map.pop_first(), "pop_min");
                }
                MapOp::PopMax => {
                    prop_assert_eq!(rb_map.pop_max(), bt_map.pop_last(), "pop_max");
                }
            }
            prop_assert_eq!(rb_map.validate(), Ok(()), "invalid tree after {:?}", op);
            prop_assert_eq!(rb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }

        prop_assert_eq!(rb_map.entries(), bt_map.iter().collect::<Vec<_>>());
    }

    /// Iteration yields strictly ascending keys and exactly `len` items.
    #[test]
    fn entries_are_strictly_ascending(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: RbTreeMap<i64, i64> = entries.iter().copied().collect();
        let collected = map.entries();

        prop_assert_eq!(collected.len(), map.len());
        prop_assert!(collected.windows(2).all(|w| w[0].0 < w[1].0));
        prop_assert_eq!(map.iter().len(), map.len());
        prop_assert_eq!(map.keys(), map.iter_keys().collect::<Vec<_>>());
        prop_assert_eq!(map.values(), map.iter_values().collect::<Vec<_>>());
    }

    /// `range(lo, hi)` is the filter of `entries()` to `[lo, hi]`.
    #[test]
    fn range_matches_filtered_entries(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 4),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let map: RbTreeMap<i64, i64> = entries.iter().copied().collect();
        let expected: Vec<_> = map.entries().into_iter().filter(|(k, _)| lo <= **k && **k <= hi).collect();
        prop_assert_eq!(map.range(&lo, &hi).collect::<Vec<_>>(), expected);
    }

    /// Floor and ceil agree with BTreeMap for arbitrary query keys, present or not.
    #[test]
    fn floor_ceil_match_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 4),
        queries in proptest::collection::vec(-600i64..600i64, 100),
    ) {
        let map: RbTreeMap<i64, i64> = entries.iter().copied().collect();
        let model: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for q in queries {
            prop_assert_eq!(map.floor(&q), floor_of(&model, q), "floor({})", q);
            prop_assert_eq!(map.ceil(&q), ceil_of(&model, q), "ceil({})", q);
        }
    }

    /// Deleting every key in random order keeps the tree valid down to empty.
    #[test]
    fn drain_by_delete_stays_valid(keys in proptest::collection::vec(key_strategy(), 1..TEST_SIZE / 4)) {
        let mut map = build(&keys);
        let mut order = keys.clone();
        order.reverse();

        for k in &order {
            map.delete(k);
            prop_assert_eq!(map.validate(), Ok(()));
            prop_assert!(!map.has(k));
        }
        prop_assert!(map.is_empty());
        prop_assert_eq!(map.min(), None);
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn insert_scenario() {
    let map = build(&[10, 20, 5, 15, 25, 1]);

    assert_eq!(map.keys(), [&1, &5, &10, &15, &20, &25]);
    assert_eq!(map.validate(), Ok(()));
    assert_eq!(map.floor(&12).map(|(k, _)| *k), Some(10));
    assert_eq!(map.ceil(&12).map(|(k, _)| *k), Some(15));
}

#[test]
fn delete_node_with_two_children() {
    let mut map = build(&[10, 20, 5, 15, 25, 1]);

    assert_eq!(map.delete(&10), Some(100));
    assert_eq!(map.validate(), Ok(()));
    assert_eq!(map.keys(), [&1, &5, &15, &20, &25]);
    assert_eq!(map.get(&10), None);
}

#[test]
fn overwrite_keeps_len() {
    let mut map = RbTreeMap::new();
    assert_eq!(map.set("a", 1), Ok(None));
    assert_eq!(map.set("a", 2), Ok(Some(1)));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"a"), Some(&2));
}

#[test]
fn empty_map_queries() {
    let map: RbTreeMap<i32, i32> = RbTreeMap::new();
    assert_eq!(map.min(), None);
    assert_eq!(map.max(), None);
    assert_eq!(map.floor(&0), None);
    assert_eq!(map.ceil(&0), None);
    assert_eq!(map.successor(&0), None);
    assert_eq!(map.predecessor(&0), None);
    assert_eq!(map.range(&i32::MIN, &i32::MAX).count(), 0);
    assert_eq!(map.iter().next(), None);
    assert_eq!(map.black_height(), 0);
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn neighbours_of_absent_and_extreme_keys() {
    let map = build(&[1, 3, 5, 7]);
    assert_eq!(map.successor(&3), Some((&5, &50)));
    assert_eq!(map.successor(&7), None);
    assert_eq!(map.successor(&4), None);
    assert_eq!(map.predecessor(&5), Some((&3, &30)));
    assert_eq!(map.predecessor(&1), None);
}

#[test]
fn range_edges() {
    let map = build(&[10, 20, 30, 40, 50]);
    let keys = |lo: i64, hi: i64| map.range(&lo, &hi).map(|(k, _)| *k).collect::<Vec<_>>();

    assert_eq!(keys(20, 40), [20, 30, 40]);
    assert_eq!(keys(15, 45), [20, 30, 40]);
    assert_eq!(keys(30, 30), [30]);
    assert_eq!(keys(31, 39), Vec::<i64>::new());
    assert_eq!(keys(40, 20), Vec::<i64>::new());
    assert_eq!(keys(i64::MIN, i64::MAX), [10, 20, 30, 40, 50]);
}

#[test]
fn range_outlives_its_bounds() {
    let map = build(&[10, 20, 30, 40, 50]);
    let range = {
        let (lo, hi) = (15, 40);
        map.range(&lo, &hi)
    };
    assert_eq!(range.map(|(k, _)| *k).collect::<Vec<_>>(), [20, 30, 40]);

    // The upper bound may sit between stored keys, or past all of them.
    let tail = {
        let hi = 1_000;
        map.range(&45, &hi)
    };
    assert_eq!(tail.collect::<Vec<_>>(), [(&50, &500)]);
}

/// Every insertion order of up to six keys, every bound pair around them.
#[test]
fn range_exhaustive_small_trees() {
    fn permutations(items: &mut Vec<i64>, k: usize, out: &mut Vec<Vec<i64>>) {
        if k == items.len() {
            out.push(items.clone());
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            permutations(items, k + 1, out);
            items.swap(k, i);
        }
    }

    for n in 0..=6i64 {
        let mut keys: Vec<i64> = (0..n).map(|k| k * 2).collect();
        let mut orders = Vec::new();
        permutations(&mut keys, 0, &mut orders);

        for order in orders {
            let map = build(&order);
            assert_eq!(map.validate(), Ok(()));
            for lo in -1..=2 * n {
                for hi in -1..=2 * n {
                    let got: Vec<i64> = map.range(&lo, &hi).map(|(k, _)| *k).collect();
                    let want: Vec<i64> = (0..n).map(|k| k * 2).filter(|k| lo <= *k && *k <= hi).collect();
                    assert_eq!(got, want, "order {order:?}, range [{lo}, {hi}]");
                }
            }
        }
    }
}

#[test]
fn iteration_restarts_from_the_root() {
    let map = build(&[3, 1, 2]);
    let first: Vec<_> = map.iter().collect();
    let second: Vec<_> = (&map).into_iter().collect();
    assert_eq!(first, second);

    let mut partial = map.iter();
    partial.next();
    let resumed = partial.clone();
    assert_eq!(partial.collect::<Vec<_>>(), resumed.collect::<Vec<_>>());
    assert_eq!(map.iter().count(), 3);
}

#[test]
fn traversal_orders_cover_every_entry() {
    let map = build(&(0..100).collect::<Vec<_>>());

    let mut in_order = Vec::new();
    map.in_order(|k, _| in_order.push(*k));
    let mut each = Vec::new();
    map.for_each(|k, _| each.push(*k));
    let mut pre = Vec::new();
    map.pre_order(|k, _| pre.push(*k));
    let mut post = Vec::new();
    map.post_order(|k, _| post.push(*k));

    assert_eq!(in_order, (0..100).collect::<Vec<_>>());
    assert_eq!(each, in_order);
    // The root comes first in pre-order and last in post-order.
    assert_eq!(pre.first(), post.last());

    let mut pre_sorted = pre.clone();
    pre_sorted.sort_unstable();
    let mut post_sorted = post.clone();
    post_sorted.sort_unstable();
    assert_eq!(pre_sorted, in_order);
    assert_eq!(post_sorted, in_order);
}

#[test]
fn clear_then_reuse() {
    init_tracing();
    let mut map = build(&(0..50).collect::<Vec<_>>());
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.validate(), Ok(()));

    map.set(7, 70).unwrap();
    assert_eq!(map.entries(), [(&7, &70)]);
}

#[test]
fn get_mut_updates_in_place() {
    let mut map = build(&[1, 2, 3]);
    *map.get_mut(&2).unwrap() += 1;
    assert_eq!(map.get(&2), Some(&21));
    assert_eq!(map.get_mut(&9), None);
}

#[test]
fn clone_is_independent() {
    let original = build(&[1, 2, 3, 4, 5]);
    let mut copy = original.clone();
    copy.delete(&3);
    copy.set(6, 60).unwrap();

    assert_eq!(copy.validate(), Ok(()));
    assert_eq!(original.keys(), [&1, &2, &3, &4, &5]);
    assert_eq!(copy.keys(), [&1, &2, &4, &5, &6]);
    assert_ne!(original, copy);
}

#[test]
fn debug_formats_as_map() {
    let map = RbTreeMap::from([(2, "b"), (1, "a")]);
    assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
    assert_eq!(format!("{:?}", map.iter_keys()), "[1, 2]");
}

#[test]
fn with_config_verifies_mutations() {
    init_tracing();
    let config = TreeConfig::new().with_capacity(16).with_verify_mutations(true);
    let mut map = RbTreeMap::with_config(NaturalOrder, config);
    for k in 0..64u32 {
        map.set(k.wrapping_mul(2_654_435_761) % 97, k).unwrap();
    }
    for k in 0..97 {
        map.delete(&k);
    }
    assert!(map.is_empty());
}

// ─── Comparators ─────────────────────────────────────────────────────────────

#[test]
fn reverse_order_flips_queries() {
    let mut map = RbTreeMap::with_comparator(Reverse(NaturalOrder));
    for k in [10, 20, 5, 15, 25, 1] {
        map.set(k, ()).unwrap();
    }

    assert_eq!(map.keys(), [&25, &20, &15, &10, &5, &1]);
    assert_eq!(map.min().map(|(k, _)| *k), Some(25));
    // "At or before 12" in descending order is 15.
    assert_eq!(map.floor(&12).map(|(k, _)| *k), Some(15));
    assert_eq!(map.ceil(&12).map(|(k, _)| *k), Some(10));
    assert_eq!(map.range(&20, &5).map(|(k, _)| *k).collect::<Vec<_>>(), [20, 15, 10, 5]);
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn case_insensitive_keys_collide() {
    let mut volunteers = RbTreeMap::with_comparator(CaseInsensitive);
    assert_eq!(volunteers.set(String::from("Alice@Example.org"), 1), Ok(None));
    assert_eq!(volunteers.set(String::from("alice@example.org"), 2), Ok(Some(1)));
    volunteers.set(String::from("bob@example.org"), 3).unwrap();

    assert_eq!(volunteers.len(), 2);
    // The first spelling of a key is kept; only the value is replaced.
    assert_eq!(volunteers.min(), Some((&String::from("Alice@Example.org"), &2)));
}

#[test]
fn closure_comparator_orders_records() {
    struct Volunteer {
        email: &'static str,
        created_at: u64,
    }

    let by_created = ByFn(|a: &Volunteer, b: &Volunteer| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
    let mut index = RbTreeMap::with_comparator(by_created);
    for (email, created_at) in [("c@x", 30), ("a@x", 10), ("b@x", 20)] {
        index.set(Volunteer { email, created_at }, ()).unwrap();
    }

    let emails: Vec<_> = index.iter_keys().map(|v| v.email).collect();
    assert_eq!(emails, ["a@x", "b@x", "c@x"]);
}
