use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for tree nodes.
///
/// A node keeps its slot, and so its [`Handle`], for as long as it is linked
/// into the tree; rotations only rewrite links. A deleted node's slot goes on
/// the free list and is handed to the next inserted node before the backing
/// vector grows, so a public `NodeRef` to a deleted node either resolves to
/// nothing or, after reuse, to the newer node.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots. The invariant audit compares it with the
    /// number of nodes reachable from the root to find orphaned nodes.
    pub(crate) const fn live(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Stores a freshly inserted node, reusing the most recently freed slot.
    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()] = Some(element);
            return h;
        }
        assert!(
            self.slots.len() < Handle::MAX,
            "`Arena::alloc()` - tree is at maximum node count ({})",
            Handle::MAX
        );
        self.slots.push(Some(element));
        Handle::from_index(self.slots.len() - 1)
    }

    /// Node behind a link the tree itself holds. Such links always point at
    /// occupied slots, so a vacant one is a broken tree.
    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    /// Node behind a caller-supplied reference, which may have outlived its
    /// node. A vacant or out-of-range slot yields `None`.
    #[inline]
    pub(crate) fn resolve(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.to_index()).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Moves an unlinked node out and frees its slot for the next insert.
    pub(crate) fn release(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::release()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
