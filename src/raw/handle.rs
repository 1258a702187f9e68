use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node in the tree's arena.
///
/// The raw value is `index + 1`, so `Option<Handle>` costs nothing. The top raw value is
/// reserved for [`Handle::NIL`], the sentinel that stands in for every leaf and for the
/// parent of the root.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Largest index a real node may occupy.
    pub(crate) const MAX: usize = (RawHandle::MAX - 2) as usize;

    /// The shared sentinel. Never names an arena slot.
    pub(crate) const NIL: Self = Self(NonZero::new(RawHandle::MAX).unwrap());

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        debug_assert!(!self.is_nil(), "`Handle::to_index()` - called on the sentinel!");
        (self.0.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_nil(self) -> bool {
        self.0.get() == RawHandle::MAX
    }
}
