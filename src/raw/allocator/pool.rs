use alloc::vec::Vec;

use tracing::trace;

use super::NodeAllocator;
use crate::raw::handle::Handle;
use crate::raw::node::Node;

/// Recycles node storage through a free list.
///
/// Nodes live inline in one slot vector. A released slot is pushed onto the
/// free list and the next [`acquire`](NodeAllocator::acquire) writes into it
/// instead of growing the vector.
pub(crate) struct PoolAllocator<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<Handle>,
}

impl<K, V> PoolAllocator<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of released slots waiting to be reused.
    #[cfg(test)]
    pub(crate) const fn pooled(&self) -> usize {
        self.free.len()
    }
}

impl<K, V> NodeAllocator<K, V> for PoolAllocator<K, V> {
    fn acquire(&mut self, key: K, value: V) -> Handle {
        let node = Node::new(key, value);
        if let Some(h) = self.free.pop() {
            trace!(slot = h.to_index(), "reusing pooled node slot");
            self.slots[h.to_index()] = Some(node);
            h
        } else {
            // Strict less-than keeps the live node count within `Handle::MAX`.
            assert!(
                self.slots.len() < Handle::MAX,
                "`PoolAllocator::acquire()` - pool is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(node));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    fn release(&mut self, handle: Handle) -> (K, V) {
        let node = self.slots[handle.to_index()]
            .take()
            .expect("`PoolAllocator::release()` - `handle` is invalid!");
        self.free.push(handle);
        node.into_entry()
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<K, V> {
        self.slots[handle.to_index()].as_ref().expect("`PoolAllocator::node()` - `handle` is invalid!")
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.slots[handle.to_index()].as_mut().expect("`PoolAllocator::node_mut()` - `handle` is invalid!")
    }

    fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional.saturating_sub(self.free.len()));
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
