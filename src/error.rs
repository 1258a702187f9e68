//! Error types for tree operations and for the invariant validator.

use thiserror::Error;

/// Result type for fallible tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors returned by [`RbTreeMap`](crate::RbTreeMap) operations.
///
/// Lookups of absent keys are not errors; they return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The key has no place in the comparator's order (for example NaN under
    /// [`FloatOrder`](crate::comparator::FloatOrder)). The tree was not changed.
    #[error("key is not admitted by the tree's comparator")]
    InvalidKey,
}

/// A broken red-black invariant, as reported by [`RbTreeMap::validate`](crate::RbTreeMap::validate).
///
/// Seeing one of these means the tree itself has a bug; no sequence of public calls should
/// produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root of a non-empty tree is red.
    #[error("root must be black")]
    RootNotBlack,

    /// The root links to a parent other than the sentinel.
    #[error("root must not have a parent")]
    RootHasParent,

    /// Two root-to-leaf paths carry different numbers of black nodes.
    #[error("black height mismatch: expected {expected}, found {found}")]
    BlackHeightMismatch {
        /// Black count on the first path walked.
        expected: usize,
        /// Black count on the offending path.
        found: usize,
    },

    /// A red node has a red child.
    #[error("red node has red child")]
    RedRedAdjacency,

    /// A key is out of order with respect to one of its ancestors.
    #[error("binary search tree order violated")]
    OrderViolated,

    /// A child's parent link does not point back at the node holding it.
    #[error("child does not link back to its parent")]
    BrokenParentLink,

    /// The recorded length disagrees with the number of nodes reachable from the root.
    #[error("len is {recorded} but {reachable} nodes are reachable")]
    LenMismatch {
        /// Length the tree reports.
        recorded: usize,
        /// Nodes found by walking from the root.
        reachable: usize,
    },
}
