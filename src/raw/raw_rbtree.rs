use core::cmp::Ordering;

use smallvec::SmallVec;
use tracing::trace;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::comparator::Comparator;

/// Stack of pending ancestors for the iterative walks. Red-black height is at most
/// `2 * log2(n + 1)`, so the inline part covers every tree that fits in memory on 32-bit
/// handles without spilling in the common case.
pub(crate) type Stack = SmallVec<[Handle; 32]>;

/// The core red-black tree backing `RbTreeMap`.
///
/// Nodes live in an arena and link to each other by [`Handle`]. [`Handle::NIL`] plays the
/// sentinel: it is black, its children are itself, and its parent slot (`nil_parent`) is
/// scratch space written by `transplant` so the delete fixup can climb from an empty
/// position.
pub(crate) struct RawRbTree<K, V, C> {
    /// Arena storing all tree nodes. Its length is the tree's length.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, or `NIL` when the tree is empty.
    root: Handle,
    /// Parent link of the sentinel.
    nil_parent: Handle,
    /// Total order over keys, fixed at construction.
    cmp: C,
}

impl<K, V, C> RawRbTree<K, V, C> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: Handle::NIL,
            nil_parent: Handle::NIL,
            cmp,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(cmp: C, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: Handle::NIL,
            nil_parent: Handle::NIL,
            cmp,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Drops every node and resets the root to the sentinel.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = Handle::NIL;
        self.nil_parent = Handle::NIL;
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.cmp
    }

    pub(crate) const fn root(&self) -> Handle {
        self.root
    }

    /// Returns a reference to a node by handle.
    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Raw node access for tests that corrupt the tree on purpose.
    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn entry(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (&node.key, &node.value)
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.nodes.get_mut(handle).value
    }

    // ─── Sentinel-aware link accessors ──────────────────────────────────────

    #[inline]
    pub(crate) fn color(&self, h: Handle) -> Color {
        if h.is_nil() { Color::Black } else { self.nodes.get(h).color }
    }

    #[inline]
    fn set_color(&mut self, h: Handle, color: Color) {
        if h.is_nil() {
            debug_assert_eq!(color, Color::Black, "the sentinel cannot be painted red");
        } else {
            self.nodes.get_mut(h).color = color;
        }
    }

    #[inline]
    pub(crate) fn parent(&self, h: Handle) -> Handle {
        if h.is_nil() { self.nil_parent } else { self.nodes.get(h).parent }
    }

    #[inline]
    fn set_parent(&mut self, h: Handle, parent: Handle) {
        if h.is_nil() {
            self.nil_parent = parent;
        } else {
            self.nodes.get_mut(h).parent = parent;
        }
    }

    #[inline]
    pub(crate) fn left(&self, h: Handle) -> Handle {
        if h.is_nil() { Handle::NIL } else { self.nodes.get(h).left }
    }

    #[inline]
    pub(crate) fn right(&self, h: Handle) -> Handle {
        if h.is_nil() { Handle::NIL } else { self.nodes.get(h).right }
    }

    #[inline]
    pub(crate) fn child(&self, h: Handle, side: Side) -> Handle {
        match side {
            Side::Left => self.left(h),
            Side::Right => self.right(h),
        }
    }

    #[inline]
    fn set_child(&mut self, h: Handle, side: Side, child: Handle) {
        let node = self.nodes.get_mut(h);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// The side of `parent` that `h` hangs from. With a `NIL` `h` this relies on the sibling
    /// being real, which the delete fixup guarantees.
    #[inline]
    fn side_in(&self, parent: Handle, h: Handle) -> Side {
        if self.left(parent) == h { Side::Left } else { Side::Right }
    }

    // ─── Structural primitives ──────────────────────────────────────────────

    /// Points `parent`'s link that held `old` at `new` instead; a `NIL` parent means `old` was
    /// the root.
    fn replace_child(&mut self, parent: Handle, old: Handle, new: Handle) {
        if parent.is_nil() {
            self.root = new;
        } else {
            let side = self.side_in(parent, old);
            self.set_child(parent, side, new);
        }
    }

    /// Hangs the subtree `v` where `u` was. `u`'s own links are left untouched.
    fn transplant(&mut self, u: Handle, v: Handle) {
        let parent = self.parent(u);
        self.replace_child(parent, u, v);
        self.set_parent(v, parent);
    }

    /// Rotates at `x` so that `x` moves down to `side` and its child on the other side takes
    /// its place. `rotate(x, Side::Left)` is the classic left rotation.
    fn rotate(&mut self, x: Handle, side: Side) {
        let up = side.opposite();
        let y = self.child(x, up);
        debug_assert!(!y.is_nil(), "rotation pivot must be a real node");
        trace!(?side, "rotate");

        let inner = self.child(y, side);
        self.set_child(x, up, inner);
        if !inner.is_nil() {
            self.set_parent(inner, x);
        }

        let parent = self.parent(x);
        self.set_parent(y, parent);
        self.replace_child(parent, x, y);

        self.set_child(y, side, x);
        self.set_parent(x, y);
    }

    pub(crate) fn minimum(&self, mut h: Handle) -> Handle {
        while !self.left(h).is_nil() {
            h = self.left(h);
        }
        h
    }

    pub(crate) fn maximum(&self, mut h: Handle) -> Handle {
        while !self.right(h).is_nil() {
            h = self.right(h);
        }
        h
    }

    /// In-order successor of `h`, or `NIL`.
    pub(crate) fn next_node(&self, h: Handle) -> Handle {
        if !self.right(h).is_nil() {
            return self.minimum(self.right(h));
        }
        let mut cur = h;
        let mut parent = self.parent(h);
        while !parent.is_nil() && cur == self.right(parent) {
            cur = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// In-order predecessor of `h`, or `NIL`.
    pub(crate) fn prev_node(&self, h: Handle) -> Handle {
        if !self.left(h).is_nil() {
            return self.maximum(self.left(h));
        }
        let mut cur = h;
        let mut parent = self.parent(h);
        while !parent.is_nil() && cur == self.left(parent) {
            cur = parent;
            parent = self.parent(parent);
        }
        parent
    }

    pub(crate) fn first(&self) -> Handle {
        if self.root.is_nil() { Handle::NIL } else { self.minimum(self.root) }
    }

    pub(crate) fn last(&self) -> Handle {
        if self.root.is_nil() { Handle::NIL } else { self.maximum(self.root) }
    }

    // ─── Rebalancing ────────────────────────────────────────────────────────

    fn insert_fixup(&mut self, mut n: Handle) {
        while self.color(self.parent(n)) == Color::Red {
            let parent = self.parent(n);
            let grandparent = self.parent(parent);
            if grandparent.is_nil() {
                break;
            }

            let side = self.side_in(grandparent, parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                trace!("insert fixup: red uncle");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                n = grandparent;
            } else {
                if self.side_in(parent, n) != side {
                    trace!("insert fixup: inner child");
                    n = parent;
                    self.rotate(n, side);
                }
                trace!("insert fixup: outer child");
                let parent = self.parent(n);
                self.set_color(parent, Color::Black);
                self.set_color(grandparent, Color::Red);
                self.rotate(grandparent, side.opposite());
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
        if !root.is_nil() {
            self.set_parent(root, Handle::NIL);
        }
    }

    fn delete_fixup(&mut self, mut x: Handle) {
        while x != self.root && self.color(x) == Color::Black {
            let parent = self.parent(x);
            if parent.is_nil() {
                break;
            }

            let side = self.side_in(parent, x);
            let far = side.opposite();
            let mut sibling = self.child(parent, far);

            if self.color(sibling) == Color::Red {
                trace!("delete fixup: red sibling");
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, far);
            }

            if self.color(self.left(sibling)) == Color::Black && self.color(self.right(sibling)) == Color::Black {
                trace!("delete fixup: black nephews");
                self.set_color(sibling, Color::Red);
                x = parent;
            } else {
                if self.color(self.child(sibling, far)) == Color::Black {
                    trace!("delete fixup: red near nephew");
                    let near = self.child(sibling, side);
                    self.set_color(near, Color::Black);
                    self.set_color(sibling, Color::Red);
                    self.rotate(sibling, far);
                    sibling = self.child(parent, far);
                }
                trace!("delete fixup: red far nephew");
                self.set_color(sibling, self.color(parent));
                self.set_color(parent, Color::Black);
                let far_nephew = self.child(sibling, far);
                self.set_color(far_nephew, Color::Black);
                self.rotate(parent, side);
                x = self.root;
            }
        }

        self.set_color(x, Color::Black);
        let root = self.root;
        if !root.is_nil() {
            self.set_parent(root, Handle::NIL);
        }
        self.nil_parent = Handle::NIL;
    }

    /// Unlinks `z`, rebalances, and hands back its pair.
    pub(crate) fn remove_node(&mut self, z: Handle) -> (K, V) {
        let z_left = self.left(z);
        let z_right = self.right(z);
        let mut spliced_color = self.color(z);
        let x;

        if z_left.is_nil() {
            x = z_right;
            self.transplant(z, z_right);
        } else if z_right.is_nil() {
            x = z_left;
            self.transplant(z, z_left);
        } else {
            let y = self.minimum(z_right);
            spliced_color = self.color(y);
            x = self.right(y);

            if self.parent(y) == z {
                self.set_parent(x, y);
            } else {
                self.transplant(y, x);
                self.set_child(y, Side::Right, z_right);
                self.set_parent(z_right, y);
            }

            self.transplant(z, y);
            self.set_child(y, Side::Left, z_left);
            self.set_parent(z_left, y);
            self.set_color(y, self.color(z));
        }

        if spliced_color == Color::Black {
            self.delete_fixup(x);
        } else {
            self.nil_parent = Handle::NIL;
        }

        let node = self.nodes.take(z);
        (node.key, node.value)
    }

    // ─── Traversals ─────────────────────────────────────────────────────────

    /// Visits every pair in ascending order.
    pub(crate) fn in_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        let mut stack = Stack::new();
        let mut cur = self.root;
        loop {
            while !cur.is_nil() {
                stack.push(cur);
                cur = self.left(cur);
            }
            let Some(h) = stack.pop() else { break };
            let (k, v) = self.entry(h);
            f(k, v);
            cur = self.right(h);
        }
    }

    /// Visits each node before its subtrees, left subtree first.
    pub(crate) fn pre_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        let mut stack = Stack::new();
        if !self.root.is_nil() {
            stack.push(self.root);
        }
        while let Some(h) = stack.pop() {
            let (k, v) = self.entry(h);
            f(k, v);
            let (left, right) = (self.left(h), self.right(h));
            if !right.is_nil() {
                stack.push(right);
            }
            if !left.is_nil() {
                stack.push(left);
            }
        }
    }

    /// Visits each node after both of its subtrees.
    pub(crate) fn post_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        let mut stack = Stack::new();
        let mut cur = self.root;
        let mut last = Handle::NIL;
        loop {
            while !cur.is_nil() {
                stack.push(cur);
                cur = self.left(cur);
            }
            let Some(&top) = stack.last() else { break };
            let right = self.right(top);
            if !right.is_nil() && right != last {
                cur = right;
            } else {
                let (k, v) = self.entry(top);
                f(k, v);
                last = top;
                stack.pop();
            }
        }
    }
}

impl<K, V, C: Comparator<K>> RawRbTree<K, V, C> {
    /// Finds the node holding `key`, or `NIL`.
    pub(crate) fn find(&self, key: &K) -> Handle {
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = self.nodes.get(cur);
            cur = match self.cmp.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return cur,
            };
        }
        Handle::NIL
    }

    /// Inserts `key`, or overwrites the value of an equal key in place and returns the old
    /// value. Does not consult [`Comparator::admits`].
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = Handle::NIL;
        let mut side = Side::Left;
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = self.nodes.get(cur);
            parent = cur;
            match self.cmp.compare(&key, &node.key) {
                Ordering::Less => {
                    side = Side::Left;
                    cur = node.left;
                }
                Ordering::Greater => {
                    side = Side::Right;
                    cur = node.right;
                }
                Ordering::Equal => {
                    return Some(core::mem::replace(self.value_mut(cur), value));
                }
            }
        }

        let z = self.nodes.alloc(Node::new_leaf(key, value, parent));
        if parent.is_nil() {
            self.root = z;
        } else {
            self.set_child(parent, side, z);
        }
        self.insert_fixup(z);
        None
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let z = self.find(key);
        if z.is_nil() { None } else { Some(self.remove_node(z)) }
    }

    /// Greatest node with a key `<= key`, or `NIL`.
    pub(crate) fn floor(&self, key: &K) -> Handle {
        let mut cur = self.root;
        let mut best = Handle::NIL;
        while !cur.is_nil() {
            let node = self.nodes.get(cur);
            match self.cmp.compare(key, &node.key) {
                Ordering::Equal => return cur,
                Ordering::Less => cur = node.left,
                Ordering::Greater => {
                    best = cur;
                    cur = node.right;
                }
            }
        }
        best
    }

    /// Least node with a key `>= key`, or `NIL`.
    pub(crate) fn ceil(&self, key: &K) -> Handle {
        let mut cur = self.root;
        let mut best = Handle::NIL;
        while !cur.is_nil() {
            let node = self.nodes.get(cur);
            match self.cmp.compare(key, &node.key) {
                Ordering::Equal => return cur,
                Ordering::Greater => cur = node.right,
                Ordering::Less => {
                    best = cur;
                    cur = node.left;
                }
            }
        }
        best
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RawRbTree<K, V, C> {
    fn clone(&self) -> Self {
        // Handles are arena indices, so a slot-for-slot copy preserves every link.
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            nil_parent: Handle::NIL,
            cmp: self.cmp.clone(),
        }
    }
}
