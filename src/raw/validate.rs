//! Independent recomputation of the red-black invariants.
//!
//! Every check walks the tree with an explicit stack and reads links only through the
//! sentinel-aware accessors.

use core::cmp::Ordering;

use smallvec::SmallVec;

use super::handle::Handle;
use super::node::Color;
use super::raw_rbtree::{RawRbTree, Stack};
use crate::comparator::Comparator;
use crate::error::InvariantViolation;

impl<K, V, C> RawRbTree<K, V, C> {
    /// Black nodes on the leftmost root-to-sentinel path, sentinel excluded.
    pub(crate) fn black_height(&self) -> usize {
        let mut height = 0;
        let mut cur = self.root();
        while !cur.is_nil() {
            if self.color(cur) == Color::Black {
                height += 1;
            }
            cur = self.left(cur);
        }
        height
    }

    fn check_root(&self) -> Result<(), InvariantViolation> {
        let root = self.root();
        if self.color(root) != Color::Black {
            return Err(InvariantViolation::RootNotBlack);
        }
        if !self.parent(root).is_nil() {
            return Err(InvariantViolation::RootHasParent);
        }
        Ok(())
    }

    /// Every root-to-sentinel path carries the same number of black nodes. Equal totals along
    /// shared prefixes imply equal counts below every node.
    fn check_black_height(&self) -> Result<(), InvariantViolation> {
        let mut expected = None;
        let mut stack: SmallVec<[(Handle, usize); 32]> = SmallVec::new();
        stack.push((self.root(), 0));

        while let Some((h, above)) = stack.pop() {
            if h.is_nil() {
                match expected {
                    None => expected = Some(above),
                    Some(expected) if expected != above => {
                        return Err(InvariantViolation::BlackHeightMismatch { expected, found: above });
                    }
                    Some(_) => {}
                }
                continue;
            }
            let here = above + usize::from(self.color(h) == Color::Black);
            stack.push((self.right(h), here));
            stack.push((self.left(h), here));
        }
        Ok(())
    }

    fn check_no_red_red(&self) -> Result<(), InvariantViolation> {
        let mut stack = Stack::new();
        stack.push(self.root());
        while let Some(h) = stack.pop() {
            if h.is_nil() {
                continue;
            }
            let (left, right) = (self.left(h), self.right(h));
            if self.color(h) == Color::Red && (self.color(left) == Color::Red || self.color(right) == Color::Red) {
                return Err(InvariantViolation::RedRedAdjacency);
            }
            stack.push(right);
            stack.push(left);
        }
        Ok(())
    }

    /// Children link back to their parents and the reachable population matches `len`. Stops
    /// once more than `len` nodes have been seen, so it terminates on cyclic links.
    fn check_links(&self) -> Result<(), InvariantViolation> {
        let mut reachable = 0;
        let mut stack = Stack::new();
        stack.push(self.root());
        while let Some(h) = stack.pop() {
            if h.is_nil() {
                continue;
            }
            reachable += 1;
            if reachable > self.len() {
                break;
            }
            for child in [self.left(h), self.right(h)] {
                if !child.is_nil() && self.parent(child) != h {
                    return Err(InvariantViolation::BrokenParentLink);
                }
                stack.push(child);
            }
        }
        if reachable == self.len() {
            Ok(())
        } else {
            Err(InvariantViolation::LenMismatch {
                recorded: self.len(),
                reachable,
            })
        }
    }
}

impl<K, V, C: Comparator<K>> RawRbTree<K, V, C> {
    /// Checks every invariant, stopping at the first violation found.
    pub(crate) fn validate(&self) -> Result<(), InvariantViolation> {
        if self.root().is_nil() {
            return if self.is_empty() {
                Ok(())
            } else {
                Err(InvariantViolation::LenMismatch {
                    recorded: self.len(),
                    reachable: 0,
                })
            };
        }
        self.check_root()?;
        self.check_links()?;
        self.check_black_height()?;
        self.check_no_red_red()?;
        self.check_order()
    }

    /// Each key lies strictly inside the open interval set by its ancestors. `NIL` bounds are
    /// unbounded.
    fn check_order(&self) -> Result<(), InvariantViolation> {
        let cmp = self.comparator();
        let mut stack: SmallVec<[(Handle, Handle, Handle); 32]> = SmallVec::new();
        stack.push((self.root(), Handle::NIL, Handle::NIL));

        while let Some((h, lo, hi)) = stack.pop() {
            if h.is_nil() {
                continue;
            }
            let key = &self.node(h).key;
            if !lo.is_nil() && cmp.compare(key, &self.node(lo).key) != Ordering::Greater {
                return Err(InvariantViolation::OrderViolated);
            }
            if !hi.is_nil() && cmp.compare(key, &self.node(hi).key) != Ordering::Less {
                return Err(InvariantViolation::OrderViolated);
            }
            stack.push((self.right(h), h, hi));
            stack.push((self.left(h), lo, h));
        }
        Ok(())
    }
}
