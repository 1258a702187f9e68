use super::RbTreeMap;
use crate::comparator::NaturalOrder;
use crate::config::TreeConfig;

impl<K, V> RbTreeMap<K, V> {
    /// Creates an empty map, ordered by the key's [`Ord`], with room for at least `capacity`
    /// entries before the node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let map: RbTreeMap<i32, i32> = RbTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RbTreeMap::with_config(NaturalOrder, TreeConfig::new().with_capacity(capacity))
    }
}

impl<K, V, C> RbTreeMap<K, V, C> {
    /// Returns the number of entries the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more entries. Slots freed by earlier deletions
    /// count toward the room.
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Shrinks the node arena as much as live entries allow.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::with_capacity(100);
    /// map.set(1, 1).unwrap();
    /// map.clear();
    /// map.shrink_to_fit();
    /// assert!(map.capacity() < 100);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}
