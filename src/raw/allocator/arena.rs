use alloc::vec::Vec;

use tracing::trace;

use super::NodeAllocator;
use crate::raw::handle::Handle;
use crate::raw::node::Node;

/// Carves nodes sequentially out of fixed-size regions.
///
/// A region is reserved in one allocation and never grows, so nodes never
/// move once placed. Releasing a node moves its payload out but leaves the
/// slot dead; the storage is only returned when every region is dropped at
/// once by [`clear`](NodeAllocator::clear) or by dropping the allocator.
pub(crate) struct ArenaAllocator<K, V> {
    regions: Vec<Vec<Option<Node<K, V>>>>,
    region_capacity: usize,
    live: usize,
}

impl<K, V> ArenaAllocator<K, V> {
    pub(crate) fn new(region_capacity: usize) -> Self {
        Self {
            regions: Vec::new(),
            region_capacity: region_capacity.max(1),
            live: 0,
        }
    }

    /// Number of slots handed out so far, live or dead.
    fn used(&self) -> usize {
        match self.regions.last() {
            Some(last) => (self.regions.len() - 1) * self.region_capacity + last.len(),
            None => 0,
        }
    }

    #[inline]
    fn slot(&self, handle: Handle) -> &Option<Node<K, V>> {
        let index = handle.to_index();
        &self.regions[index / self.region_capacity][index % self.region_capacity]
    }

    #[inline]
    fn slot_mut(&mut self, handle: Handle) -> &mut Option<Node<K, V>> {
        let index = handle.to_index();
        &mut self.regions[index / self.region_capacity][index % self.region_capacity]
    }
}

impl<K, V> NodeAllocator<K, V> for ArenaAllocator<K, V> {
    fn acquire(&mut self, key: K, value: V) -> Handle {
        let index = self.used();
        assert!(
            index < Handle::MAX,
            "`ArenaAllocator::acquire()` - arena is at maximum capacity ({})",
            Handle::MAX
        );
        if self.regions.last().is_none_or(|region| region.len() == self.region_capacity) {
            trace!(region = self.regions.len(), capacity = self.region_capacity, "reserving arena region");
            self.regions.push(Vec::with_capacity(self.region_capacity));
        }
        if let Some(region) = self.regions.last_mut() {
            region.push(Some(Node::new(key, value)));
        }
        self.live += 1;
        Handle::from_index(index)
    }

    fn release(&mut self, handle: Handle) -> (K, V) {
        let node = self
            .slot_mut(handle)
            .take()
            .expect("`ArenaAllocator::release()` - `handle` is invalid!");
        self.live -= 1;
        node.into_entry()
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<K, V> {
        self.slot(handle).as_ref().expect("`ArenaAllocator::node()` - `handle` is invalid!")
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.slot_mut(handle).as_mut().expect("`ArenaAllocator::node_mut()` - `handle` is invalid!")
    }

    fn len(&self) -> usize {
        self.live
    }

    fn capacity(&self) -> usize {
        self.regions.len() * self.region_capacity
    }

    // Regions have a fixed size and are reserved on demand.
    fn reserve(&mut self, _additional: usize) {}

    fn clear(&mut self) {
        self.regions.clear();
        self.live = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn regions_are_reserved_on_demand() {
        let mut arena: ArenaAllocator<u32, u32> = ArenaAllocator::new(4);
        assert_eq!(arena.capacity(), 0);
        let handles: Vec<_> = (0..9).map(|i| arena.acquire(i, i)).collect();
        assert_eq!(arena.capacity(), 12);
        assert_eq!(arena.len(), 9);
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(h.to_index(), i);
        }
    }

    #[test]
    fn released_slots_are_not_reused() {
        let mut arena: ArenaAllocator<u32, u32> = ArenaAllocator::new(2);
        let a = arena.acquire(1, 1);
        assert_eq!(arena.release(a), (1, 1));
        let b = arena.acquire(2, 2);
        assert_ne!(a, b);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.used(), 2);

        arena.clear();
        assert_eq!(arena.capacity(), 0);
        assert_eq!(arena.acquire(3, 3).to_index(), 0);
    }

    #[test]
    fn zero_region_capacity_is_clamped() {
        let mut arena: ArenaAllocator<u8, u8> = ArenaAllocator::new(0);
        let a = arena.acquire(1, 1);
        let b = arena.acquire(2, 2);
        assert_eq!((*arena.node(a).key(), *arena.node(b).key()), (1, 2));
        assert_eq!(arena.capacity(), 2);
    }

    #[test]
    #[should_panic(expected = "`ArenaAllocator::node()` - `handle` is invalid!")]
    fn dead_slot_cannot_be_read() {
        let mut arena: ArenaAllocator<u8, u8> = ArenaAllocator::new(4);
        let a = arena.acquire(1, 1);
        let _ = arena.release(a);
        let _ = arena.node(a);
    }
}
