use alloc::boxed::Box;
use alloc::vec::Vec;

use super::NodeAllocator;
use crate::raw::handle::Handle;
use crate::raw::node::Node;

/// Allocates every node individually on the heap.
///
/// Releasing a node drops its box, returning the memory to the global
/// allocator. Only the slot index is recycled.
pub(crate) struct DirectAllocator<K, V> {
    slots: Vec<Option<Box<Node<K, V>>>>,
    vacant: Vec<Handle>,
}

impl<K, V> DirectAllocator<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }
}

impl<K, V> NodeAllocator<K, V> for DirectAllocator<K, V> {
    fn acquire(&mut self, key: K, value: V) -> Handle {
        let node = Box::new(Node::new(key, value));
        if let Some(h) = self.vacant.pop() {
            self.slots[h.to_index()] = Some(node);
            h
        } else {
            assert!(
                self.slots.len() < Handle::MAX,
                "`DirectAllocator::acquire()` - allocator is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(node));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    fn release(&mut self, handle: Handle) -> (K, V) {
        let node = self.slots[handle.to_index()]
            .take()
            .expect("`DirectAllocator::release()` - `handle` is invalid!");
        self.vacant.push(handle);
        (*node).into_entry()
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<K, V> {
        self.slots[handle.to_index()].as_deref().expect("`DirectAllocator::node()` - `handle` is invalid!")
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.slots[handle.to_index()]
            .as_deref_mut()
            .expect("`DirectAllocator::node_mut()` - `handle` is invalid!")
    }

    fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    // Node memory is allocated on demand, so only the index table has capacity.
    fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional.saturating_sub(self.vacant.len()));
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}
