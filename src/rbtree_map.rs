use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, error};

use crate::comparator::{Comparator, NaturalOrder};
use crate::config::TreeConfig;
use crate::error::{InvariantViolation, TreeError, TreeResult};
use crate::raw::{Handle, RawRbTree};

mod capacity;
mod iter;

pub use iter::{Iter, Keys, Range, Values};

/// An ordered map based on a [red-black tree].
///
/// Keys are ordered by a [`Comparator`] chosen when the map is built; [`NaturalOrder`] (the
/// key's own [`Ord`]) is the default. Every mutation and lookup runs in O(log n): the
/// coloring rules keep the longest root-to-leaf path at most twice the shortest.
///
/// Nodes live in an arena owned by the map and refer to each other by index. Removing an
/// entry frees its slot at once for the next insertion.
///
/// Iterators obtained from functions such as [`RbTreeMap::iter`], [`RbTreeMap::range`] or
/// [`RbTreeMap::iter_keys`] produce their items in key order and start from the root each
/// time they are created.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to
/// any other key, as determined by the comparator, changes while it is in the map. The
/// resulting behavior is not specified, but [`RbTreeMap::validate`] will report the broken
/// order and there is no undefined behavior.
///
/// # Examples
///
/// ```
/// use rbtree_index::RbTreeMap;
///
/// let mut volunteers = RbTreeMap::new();
///
/// volunteers.set("carol@example.org", "Carol").unwrap();
/// volunteers.set("alice@example.org", "Alice").unwrap();
/// volunteers.set("bob@example.org", "Bob").unwrap();
///
/// // Setting an existing key overwrites and hands back the old value.
/// assert_eq!(volunteers.set("bob@example.org", "Bobby"), Ok(Some("Bob")));
/// assert_eq!(volunteers.len(), 3);
///
/// assert_eq!(volunteers.get(&"bob@example.org"), Some(&"Bobby"));
/// assert_eq!(volunteers.min(), Some((&"alice@example.org", &"Alice")));
///
/// for (email, name) in &volunteers {
///     println!("{name} <{email}>");
/// }
///
/// assert_eq!(volunteers.delete(&"carol@example.org"), Some("Carol"));
/// assert!(volunteers.validate().is_ok());
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbTreeMap<K, V, C = NaturalOrder> {
    raw: RawRbTree<K, V, C>,
    verify_mutations: bool,
}

impl<K, V> RbTreeMap<K, V> {
    /// Makes a new, empty `RbTreeMap` ordered by the key's [`Ord`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.set(1, "a").unwrap();
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C> RbTreeMap<K, V, C> {
    /// Makes a new, empty `RbTreeMap` ordered by `cmp`.
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        RbTreeMap {
            raw: RawRbTree::new(cmp),
            verify_mutations: false,
        }
    }

    /// Makes a new, empty `RbTreeMap` ordered by `cmp` with the given options.
    #[must_use]
    pub fn with_config(cmp: C, config: TreeConfig) -> Self {
        RbTreeMap {
            raw: RawRbTree::with_capacity(cmp, config.capacity),
            verify_mutations: config.verify_mutations,
        }
    }

    /// Returns the comparator the map was built with.
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let mut a = RbTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.set(1, "a").unwrap();
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let mut a = RbTreeMap::new();
    /// a.set(1, "a").unwrap();
    /// a.clear();
    /// assert!(a.is_empty());
    /// assert!(a.validate().is_ok());
    /// ```
    pub fn clear(&mut self) {
        debug!(dropped = self.len(), "clearing tree");
        self.raw.clear();
    }

    /// Returns the entry with the smallest key, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// assert_eq!(map.min(), None);
    /// map.set(1, "b").unwrap();
    /// map.set(2, "a").unwrap();
    /// assert_eq!(map.min(), Some((&1, &"b")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.entry_at(self.raw.first())
    }

    /// Returns the entry with the largest key, or `None` if the map is empty.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.entry_at(self.raw.last())
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(3, "c"), (2, "b"), (1, "a")]);
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter::new(&self.raw)
    }

    /// Gets a lazy iterator over the keys of the map, in sorted order.
    pub fn iter_keys(&self) -> Keys<'_, K, V, C> {
        Keys::new(&self.raw)
    }

    /// Gets a lazy iterator over the values of the map, in order by key.
    pub fn iter_values(&self) -> Values<'_, K, V, C> {
        Values::new(&self.raw)
    }

    /// Collects every entry in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(10, 'j'), (5, 'e'), (20, 't')]);
    /// assert_eq!(map.entries(), [(&5, &'e'), (&10, &'j'), (&20, &'t')]);
    /// ```
    #[must_use]
    pub fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Collects every key in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<&K> {
        self.iter_keys().collect()
    }

    /// Collects every value, in ascending order of their keys.
    #[must_use]
    pub fn values(&self) -> Vec<&V> {
        self.iter_values().collect()
    }

    /// Calls `f` on every entry in ascending key order.
    pub fn for_each<F: FnMut(&K, &V)>(&self, f: F) {
        self.raw.in_order(f);
    }

    /// Calls `f` on every entry in ascending key order (left subtree, node, right subtree).
    pub fn in_order<F: FnMut(&K, &V)>(&self, f: F) {
        self.raw.in_order(f);
    }

    /// Calls `f` on every entry, each node before its subtrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(1, ()), (2, ()), (3, ())]);
    /// let mut seen = Vec::new();
    /// map.pre_order(|k, _| seen.push(*k));
    /// assert_eq!(seen, [2, 1, 3]);
    /// ```
    pub fn pre_order<F: FnMut(&K, &V)>(&self, f: F) {
        self.raw.pre_order(f);
    }

    /// Calls `f` on every entry, each node after both of its subtrees.
    pub fn post_order<F: FnMut(&K, &V)>(&self, f: F) {
        self.raw.post_order(f);
    }

    /// Number of black nodes on any path from the root down to a leaf. Zero for an empty map.
    ///
    /// Diagnostic only; the height of the tree is at most twice this plus one.
    #[must_use]
    pub fn black_height(&self) -> usize {
        self.raw.black_height()
    }

    fn entry_at(&self, h: Handle) -> Option<(&K, &V)> {
        if h.is_nil() { None } else { Some(self.raw.entry(h)) }
    }
}

impl<K, V, C: Comparator<K>> RbTreeMap<K, V, C> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `Ok(None)` is returned.
    ///
    /// If the map did have this key present, the value is updated in place and the old value
    /// is returned. The stored key, its node and its color are left as they were.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidKey`] without touching the map when the comparator does
    /// not [admit](Comparator::admits) `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// assert_eq!(map.set("a", 1), Ok(None));
    /// assert_eq!(map.set("a", 2), Ok(Some(1)));
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&"a"), Some(&2));
    /// ```
    pub fn set(&mut self, key: K, value: V) -> TreeResult<Option<V>> {
        if !self.raw.comparator().admits(&key) {
            debug!("rejected key outside the comparator's order");
            return Err(TreeError::InvalidKey);
        }
        let previous = self.raw.insert(key, value);
        self.verify("set");
        Ok(previous)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.set(1, "a").unwrap();
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entry_at(self.raw.find(key)).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let h = self.raw.find(key);
        if h.is_nil() { None } else { Some(self.raw.value_mut(h)) }
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn has(&self, key: &K) -> bool {
        !self.raw.find(key).is_nil()
    }

    /// Removes a key from the map, returning its value if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.set(1, "a").unwrap();
    /// assert_eq!(map.delete(&1), Some("a"));
    /// assert_eq!(map.delete(&1), None);
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let (_, value) = self.raw.remove(key)?;
        self.verify("delete");
        Some(value)
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        let h = self.raw.first();
        if h.is_nil() {
            return None;
        }
        let entry = self.raw.remove_node(h);
        self.verify("pop_min");
        Some(entry)
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_max(&mut self) -> Option<(K, V)> {
        let h = self.raw.last();
        if h.is_nil() {
            return None;
        }
        let entry = self.raw.remove_node(h);
        self.verify("pop_max");
        Some(entry)
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(10, ()), (20, ()), (5, ()), (15, ())]);
    /// assert_eq!(map.floor(&12).map(|(k, _)| *k), Some(10));
    /// assert_eq!(map.floor(&15).map(|(k, _)| *k), Some(15));
    /// assert_eq!(map.floor(&4), None);
    /// ```
    pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
        self.entry_at(self.raw.floor(key))
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(10, ()), (20, ()), (5, ()), (15, ())]);
    /// assert_eq!(map.ceil(&12).map(|(k, _)| *k), Some(15));
    /// assert_eq!(map.ceil(&21), None);
    /// ```
    pub fn ceil(&self, key: &K) -> Option<(&K, &V)> {
        self.entry_at(self.raw.ceil(key))
    }

    /// Returns the entry that follows `key` in key order.
    ///
    /// Returns `None` if `key` is not in the map or is its largest key.
    pub fn successor(&self, key: &K) -> Option<(&K, &V)> {
        let h = self.raw.find(key);
        if h.is_nil() {
            return None;
        }
        self.entry_at(self.raw.next_node(h))
    }

    /// Returns the entry that precedes `key` in key order.
    ///
    /// Returns `None` if `key` is not in the map or is its smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(1, 'a'), (3, 'c'), (5, 'e')]);
    /// assert_eq!(map.predecessor(&3), Some((&1, &'a')));
    /// assert_eq!(map.predecessor(&1), None);
    /// assert_eq!(map.predecessor(&2), None);
    /// ```
    pub fn predecessor(&self, key: &K) -> Option<(&K, &V)> {
        let h = self.raw.find(key);
        if h.is_nil() {
            return None;
        }
        self.entry_at(self.raw.prev_node(h))
    }

    /// Constructs a lazy iterator over the entries whose keys lie in `[lo, hi]`, in ascending
    /// order. Yields nothing when `lo` orders after `hi`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map: RbTreeMap<i32, char> = (1..=9).zip('a'..).collect();
    /// let keys: Vec<_> = map.range(&3, &6).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [3, 4, 5, 6]);
    /// assert_eq!(map.range(&6, &3).count(), 0);
    /// ```
    pub fn range(&self, lo: &K, hi: &K) -> Range<'_, K, V, C> {
        Range::new(&self.raw, lo, hi)
    }

    /// Recomputes every red-black invariant from scratch.
    ///
    /// Checks, in order: the root is black and has no parent, every child links back to its
    /// parent and the number of reachable nodes equals [`len`](Self::len), all root-to-leaf
    /// paths carry the same number of black nodes, no red node has a red child, and keys are
    /// in order. The link check runs before the walks that trust the links, so a cyclic tree
    /// is reported rather than walked forever.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.raw.validate()
    }

    fn verify(&self, operation: &'static str) {
        if !self.verify_mutations {
            return;
        }
        if let Err(violation) = self.raw.validate() {
            error!(operation, %violation, "red-black invariant broken");
            panic!("red-black invariant broken after `{operation}`: {violation}");
        }
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RbTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        RbTreeMap {
            raw: self.raw.clone(),
            verify_mutations: self.verify_mutations,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RbTreeMap<K, V, C> {
    /// Creates an empty `RbTreeMap` with the comparator's default.
    fn default() -> Self {
        RbTreeMap::with_comparator(C::default())
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RbTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for RbTreeMap<K, V, C> {}

impl<K: Ord, V> FromIterator<(K, V)> for RbTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RbTreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RbTreeMap<K, V> {
    /// Natural order admits every key, so no pair is refused.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.raw.insert(k, v);
            self.verify("extend");
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into a `RbTreeMap<K, V>`. Later duplicates overwrite earlier
    /// ones.
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map1 = RbTreeMap::from([(1, 2), (3, 4)]);
    /// let map2: RbTreeMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}
