use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use super::RbTreeMap;
use crate::comparator::Comparator;
use crate::raw::{Handle, RawRbTree, Stack};

/// An iterator over the entries of a `RbTreeMap`, in ascending key order.
///
/// This `struct` is created by the [`iter`] method on [`RbTreeMap`]. It walks the tree with
/// an explicit stack of pending ancestors, so memory use is bounded by the tree height and
/// every call to [`iter`] starts over from the root.
///
/// # Examples
///
/// ```
/// use rbtree_index::RbTreeMap;
///
/// let map = RbTreeMap::from([(2, "b"), (1, "a")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.len(), 1);
/// assert_eq!(iter.next(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RbTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V, C> {
    tree: &'a RawRbTree<K, V, C>,
    stack: Stack,
    cur: Handle,
    remaining: usize,
}

/// An iterator over the keys of a `RbTreeMap`.
///
/// This `struct` is created by the [`iter_keys`] method on [`RbTreeMap`].
///
/// [`iter_keys`]: RbTreeMap::iter_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

/// An iterator over the values of a `RbTreeMap`.
///
/// This `struct` is created by the [`iter_values`] method on [`RbTreeMap`].
///
/// [`iter_values`]: RbTreeMap::iter_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

/// An iterator over the entries of a `RbTreeMap` whose keys lie in a closed interval.
///
/// This `struct` is created by the [`range`] method on [`RbTreeMap`]. Subtrees that lie
/// wholly below the lower bound are never entered. The upper bound is resolved to its floor
/// node up front, so the iterator borrows only the map and stops right after that node.
///
/// [`range`]: RbTreeMap::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K, V, C> {
    tree: &'a RawRbTree<K, V, C>,
    stack: Stack,
    last: Handle,
}

impl<'a, K, V, C> Iter<'a, K, V, C> {
    pub(super) fn new(tree: &'a RawRbTree<K, V, C>) -> Self {
        Iter {
            tree,
            stack: Stack::new(),
            cur: tree.root(),
            remaining: tree.len(),
        }
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.cur.is_nil() {
            self.stack.push(self.cur);
            self.cur = self.tree.left(self.cur);
        }
        let h = self.stack.pop()?;
        self.cur = self.tree.right(h);
        self.remaining -= 1;
        Some(self.tree.entry(h))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            cur: self.cur,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Iter<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C> Keys<'a, K, V, C> {
    pub(super) fn new(tree: &'a RawRbTree<K, V, C>) -> Self {
        Keys { inner: Iter::new(tree) }
    }
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> ExactSizeIterator for Keys<'_, K, V, C> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

impl<K, V, C> Clone for Keys<'_, K, V, C> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V, C> fmt::Debug for Keys<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C> Values<'a, K, V, C> {
    pub(super) fn new(tree: &'a RawRbTree<K, V, C>) -> Self {
        Values { inner: Iter::new(tree) }
    }
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> ExactSizeIterator for Values<'_, K, V, C> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}

impl<K, V, C> Clone for Values<'_, K, V, C> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug, C> fmt::Debug for Values<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C: Comparator<K>> Range<'a, K, V, C> {
    pub(super) fn new(tree: &'a RawRbTree<K, V, C>, lo: &K, hi: &K) -> Self {
        let mut range = Range {
            tree,
            stack: Stack::new(),
            last: tree.floor(hi),
        };
        if range.last.is_nil() {
            return range;
        }

        // Seed the stack with the ancestors of the first key >= lo. Nodes below `lo` are
        // passed over along with their left subtrees; a node equal to `lo` needs nothing from
        // its left.
        let cmp = tree.comparator();
        let mut h = tree.root();
        while !h.is_nil() {
            match cmp.compare(&tree.node(h).key, lo) {
                Ordering::Less => h = tree.right(h),
                Ordering::Equal => {
                    range.stack.push(h);
                    break;
                }
                Ordering::Greater => {
                    range.stack.push(h);
                    h = tree.left(h);
                }
            }
        }

        // An inverted interval: the first key >= lo already lies past the last key <= hi.
        if let Some(&first) = range.stack.last() {
            if cmp.compare(&tree.node(first).key, &tree.node(range.last).key) == Ordering::Greater {
                range.stack.clear();
            }
        }
        range
    }
}

impl<K, V, C> Range<'_, K, V, C> {
    fn push_left_spine(&mut self, mut h: Handle) {
        while !h.is_nil() {
            self.stack.push(h);
            h = self.tree.left(h);
        }
    }
}

impl<'a, K, V, C> Iterator for Range<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.stack.pop()?;
        if h == self.last {
            // Everything still pending lies above the upper bound.
            self.stack.clear();
        } else {
            self.push_left_spine(self.tree.right(h));
        }
        Some(self.tree.entry(h))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.tree.len()))
    }
}

impl<K, V, C> FusedIterator for Range<'_, K, V, C> {}

impl<K, V, C> Clone for Range<'_, K, V, C> {
    fn clone(&self) -> Self {
        Range {
            tree: self.tree,
            stack: self.stack.clone(),
            last: self.last,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Range<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Iter<'a, K, V, C> {
        self.iter()
    }
}
