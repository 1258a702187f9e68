//! Total orders over keys.
//!
//! A tree is built with one [`Comparator`] and keeps it for life. Besides ordering two keys,
//! a comparator decides which keys may enter the tree at all: [`Comparator::admits`]
//! returning `false` makes [`RbTreeMap::set`](crate::RbTreeMap::set) fail with
//! [`TreeError::InvalidKey`](crate::TreeError::InvalidKey).
//!
//! # Example
//!
//! ```
//! use rbtree_index::RbTreeMap;
//! use rbtree_index::comparator::{ByFn, Reverse, NaturalOrder};
//!
//! let mut desc = RbTreeMap::with_comparator(Reverse(NaturalOrder));
//! desc.set(1, "one").unwrap();
//! desc.set(2, "two").unwrap();
//! assert_eq!(desc.keys(), [&2, &1]);
//!
//! let mut by_len = RbTreeMap::with_comparator(ByFn(|a: &&str, b: &&str| a.len().cmp(&b.len())));
//! by_len.set("ccc", 3).unwrap();
//! by_len.set("a", 1).unwrap();
//! assert_eq!(by_len.min(), Some((&"a", &1)));
//! ```

use core::cmp::Ordering;

/// A total order over `K`.
///
/// `compare` must be consistent for the tree's whole lifetime: reflexive, antisymmetric and
/// transitive over every admitted key. A comparator that violates this produces a tree whose
/// lookups give wrong answers, which [`RbTreeMap::validate`](crate::RbTreeMap::validate)
/// reports as an order violation.
pub trait Comparator<K: ?Sized> {
    /// Orders `a` relative to `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Whether `key` belongs to the order at all. Defaults to `true`.
    #[inline]
    fn admits(&self, key: &K) -> bool {
        let _ = key;
        true
    }
}

/// The key type's own [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// The inner comparator, backwards. Admits the same keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }

    #[inline]
    fn admits(&self, key: &K) -> bool {
        self.0.admits(key)
    }
}

/// A closure used as the order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByFn<F>(pub F);

impl<K: ?Sized, F: Fn(&K, &K) -> Ordering> Comparator<K> for ByFn<F> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

/// IEEE 754 `totalOrder` over floats, with NaN refused as a key.
///
/// ```
/// use rbtree_index::{RbTreeMap, TreeError};
/// use rbtree_index::comparator::FloatOrder;
///
/// let mut prices = RbTreeMap::with_comparator(FloatOrder);
/// prices.set(9.99_f64, "lunch").unwrap();
/// assert_eq!(prices.set(f64::NAN, "??"), Err(TreeError::InvalidKey));
/// assert_eq!(prices.len(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloatOrder;

impl Comparator<f64> for FloatOrder {
    #[inline]
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }

    #[inline]
    fn admits(&self, key: &f64) -> bool {
        !key.is_nan()
    }
}

impl Comparator<f32> for FloatOrder {
    #[inline]
    fn compare(&self, a: &f32, b: &f32) -> Ordering {
        a.total_cmp(b)
    }

    #[inline]
    fn admits(&self, key: &f32) -> bool {
        !key.is_nan()
    }
}

/// Strings ordered byte-wise with ASCII case folded, so `"Alice"` and `"alice"` are the same
/// key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl<K: AsRef<str> + ?Sized> Comparator<K> for CaseInsensitive {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        let a = a.as_ref().bytes().map(|b| b.to_ascii_lowercase());
        let b = b.as_ref().bytes().map(|b| b.to_ascii_lowercase());
        a.cmp(b)
    }
}
