//! Red-black ordered map for Rust.
//!
//! This crate provides [`RbTreeMap`], a self-balancing ordered key-value map with
//! logarithmic insert, lookup and delete, plus the nearest-key queries an in-process index
//! needs:
//!
//! - [`floor`](RbTreeMap::floor) / [`ceil`](RbTreeMap::ceil) - nearest key at or below / at
//!   or above a query key
//! - [`successor`](RbTreeMap::successor) / [`predecessor`](RbTreeMap::predecessor) - the
//!   stored neighbors of a stored key
//! - [`range`](RbTreeMap::range) - a lazy, pruned walk over a closed key interval
//! - [`validate`](RbTreeMap::validate) - an independent check of every red-black invariant
//!
//! # Example
//!
//! ```
//! use rbtree_index::RbTreeMap;
//!
//! let mut tree = RbTreeMap::new();
//! for k in [10, 20, 5, 15, 25, 1] {
//!     tree.set(k, k * 100).unwrap();
//! }
//!
//! assert_eq!(tree.keys(), [&1, &5, &10, &15, &20, &25]);
//! assert_eq!(tree.floor(&12), Some((&10, &1000)));
//! assert_eq!(tree.ceil(&12), Some((&15, &1500)));
//! assert!(tree.validate().is_ok());
//!
//! tree.delete(&10);
//! assert_eq!(tree.keys(), [&1, &5, &15, &20, &25]);
//! assert!(tree.validate().is_ok());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Pluggable order** - Any [`Comparator`](comparator::Comparator), fixed at construction
//! - **Arena storage** - Nodes link by index, so parent links own nothing and deleted slots
//!   are reused
//!
//! # Implementation
//!
//! Every leaf position and the root's parent point at one shared black sentinel, which keeps
//! the rebalancing code free of absent-child special cases. Insertion restores the coloring
//! with at most two rotations; deletion with at most three. Traversals, iterators and the
//! validator walk with explicit stacks instead of recursion.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod comparator;
pub mod config;
pub mod error;
pub mod rbtree_map;

pub use config::TreeConfig;
pub use error::{InvariantViolation, TreeError, TreeResult};
pub use rbtree_map::RbTreeMap;
