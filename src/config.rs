//! Construction-time options for [`RbTreeMap`](crate::RbTreeMap).

/// Options fixed when a tree is built.
///
/// ```
/// use rbtree_index::{RbTreeMap, TreeConfig};
/// use rbtree_index::comparator::NaturalOrder;
///
/// let config = TreeConfig::new().with_capacity(64).with_verify_mutations(true);
/// let mut map = RbTreeMap::with_config(NaturalOrder, config);
/// map.set(1, "a").unwrap();
/// assert!(map.capacity() >= 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeConfig {
    /// Node slots to reserve up front.
    pub capacity: usize,

    /// Run the full invariant validator after every `set` and `delete`, panicking on the first
    /// violation. Costs O(n) per mutation; meant for tests and fuzzing.
    pub verify_mutations: bool,
}

impl TreeConfig {
    /// Creates a configuration with no reserved capacity and verification off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capacity: 0,
            verify_mutations: false,
        }
    }

    /// Sets the number of node slots to reserve.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enables or disables validation after every mutation.
    #[must_use]
    pub const fn with_verify_mutations(mut self, enable: bool) -> Self {
        self.verify_mutations = enable;
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = TreeConfig::new().with_capacity(8).with_verify_mutations(true);
        assert_eq!(config.capacity, 8);
        assert!(config.verify_mutations);
        assert_eq!(TreeConfig::new(), TreeConfig::default());
    }
}
