use alloc::vec::Vec;

use super::handle::Handle;

/// A slot in the node table: either a live node or a link in the free chain.
#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<Handle> },
}

/// The tree's exclusive node table.
///
/// Freed slots are threaded into an intrusive free chain and handed out again by the next
/// `alloc`, so a long-lived tree under churn does not grow past its peak population.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let vacant = self.slots.len() - self.len;
        self.slots.reserve(additional.saturating_sub(vacant));
    }

    /// Releases spare capacity. Trailing vacant slots are only dropped when the arena is empty,
    /// since live handles must keep their indices.
    pub(crate) fn shrink_to_fit(&mut self) {
        if self.len == 0 {
            self.slots.clear();
            self.free_head = None;
        }
        self.slots.shrink_to_fit();
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        let handle = if let Some(h) = self.free_head {
            let slot = &mut self.slots[h.to_index()];
            let Slot::Vacant { next_free } = *slot else {
                unreachable!("`Arena::alloc()` - free chain points at a live slot!");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(element);
            h
        } else {
            // Keeps every real handle clear of `Handle::NIL`.
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX + 1
            );
            self.slots.push(Slot::Occupied(element));
            Handle::from_index(self.slots.len() - 1)
        };
        self.len += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.to_index()];
        assert!(matches!(slot, Slot::Occupied(_)), "`Arena::take()` - `handle` is invalid!");
        let Slot::Occupied(element) = core::mem::replace(slot, Slot::Vacant { next_free: self.free_head }) else {
            unreachable!();
        };
        self.free_head = Some(handle);
        self.len -= 1;
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}
