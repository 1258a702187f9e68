use super::handle::Handle;

/// Node color. The sentinel is always `Black`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A key/value pair and its links. Links to absent children or to the root's parent hold
/// [`Handle::NIL`].
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: Handle,
    pub(crate) left: Handle,
    pub(crate) right: Handle,
}

impl<K, V> Node<K, V> {
    /// A fresh leaf: red, both children on the sentinel.
    pub(crate) const fn new_leaf(key: K, value: V, parent: Handle) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: Handle::NIL,
            right: Handle::NIL,
        }
    }
}

/// Which side of its parent a node hangs on. Lets the fixup routines share one body for a
/// case and its mirror image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}
