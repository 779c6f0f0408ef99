mod arena;
mod direct;
mod pool;

pub(crate) use arena::ArenaAllocator;
pub(crate) use direct::DirectAllocator;
pub(crate) use pool::PoolAllocator;

use super::handle::Handle;
use super::node::Node;
use crate::options::AllocationStrategy;

/// A strategy for obtaining and reclaiming tree nodes.
///
/// Every handle returned by [`acquire`](NodeAllocator::acquire) stays valid
/// until it is passed to [`release`](NodeAllocator::release) exactly once.
/// Releasing a handle twice is a caller error and panics.
pub(crate) trait NodeAllocator<K, V> {
    /// Stores a fresh, detached node and returns its handle.
    fn acquire(&mut self, key: K, value: V) -> Handle;

    /// Reclaims the node's storage and hands back its payload.
    fn release(&mut self, handle: Handle) -> (K, V);

    fn node(&self, handle: Handle) -> &Node<K, V>;

    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V>;

    /// Number of live nodes.
    fn len(&self) -> usize;

    /// Number of nodes that can be held without reserving more storage.
    fn capacity(&self) -> usize;

    /// Hints that `additional` more nodes are about to be acquired.
    fn reserve(&mut self, additional: usize);

    /// Drops every node at once.
    fn clear(&mut self);
}

/// The allocator chosen by [`AllocationStrategy`] at construction.
///
/// Dispatch is a plain `match`; the tree is never generic over the strategy.
pub(crate) enum Allocator<K, V> {
    Direct(DirectAllocator<K, V>),
    Pool(PoolAllocator<K, V>),
    Arena(ArenaAllocator<K, V>),
}

impl<K, V> Allocator<K, V> {
    pub(crate) fn new(strategy: AllocationStrategy) -> Self {
        match strategy {
            AllocationStrategy::Direct => Self::Direct(DirectAllocator::new()),
            AllocationStrategy::Pool => Self::Pool(PoolAllocator::new()),
            AllocationStrategy::Arena { region_capacity } => Self::Arena(ArenaAllocator::new(region_capacity)),
        }
    }
}

impl<K, V> NodeAllocator<K, V> for Allocator<K, V> {
    #[inline]
    fn acquire(&mut self, key: K, value: V) -> Handle {
        match self {
            Self::Direct(a) => a.acquire(key, value),
            Self::Pool(a) => a.acquire(key, value),
            Self::Arena(a) => a.acquire(key, value),
        }
    }

    #[inline]
    fn release(&mut self, handle: Handle) -> (K, V) {
        match self {
            Self::Direct(a) => a.release(handle),
            Self::Pool(a) => a.release(handle),
            Self::Arena(a) => a.release(handle),
        }
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<K, V> {
        match self {
            Self::Direct(a) => a.node(handle),
            Self::Pool(a) => a.node(handle),
            Self::Arena(a) => a.node(handle),
        }
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        match self {
            Self::Direct(a) => a.node_mut(handle),
            Self::Pool(a) => a.node_mut(handle),
            Self::Arena(a) => a.node_mut(handle),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Direct(a) => a.len(),
            Self::Pool(a) => a.len(),
            Self::Arena(a) => a.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            Self::Direct(a) => a.capacity(),
            Self::Pool(a) => a.capacity(),
            Self::Arena(a) => a.capacity(),
        }
    }

    fn reserve(&mut self, additional: usize) {
        match self {
            Self::Direct(a) => a.reserve(additional),
            Self::Pool(a) => a.reserve(additional),
            Self::Arena(a) => a.reserve(additional),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Direct(a) => a.clear(),
            Self::Pool(a) => a.clear(),
            Self::Arena(a) => a.clear(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    pub(crate) fn all_strategies() -> [AllocationStrategy; 3] {
        [
            AllocationStrategy::Direct,
            AllocationStrategy::Pool,
            AllocationStrategy::Arena { region_capacity: 8 },
        ]
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Acquire(u32),
        Get(usize),
        GetMut(usize, u32),
        Release(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Acquire),
            5 => any::<usize>().prop_map(Operation::Get),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            8 => any::<usize>().prop_map(Operation::Release),
            1 => Just(Operation::Clear),
        ]
    }

    fn check_against_model(allocator: &mut Allocator<u32, u32>, operations: Vec<Operation>) -> Result<(), TestCaseError> {
        let mut model: Vec<(Handle, u32, u32)> = Vec::new();

        for operation in operations {
            match operation {
                Operation::Acquire(key) => {
                    let handle = allocator.acquire(key, key ^ 1);
                    prop_assert!(model.iter().all(|&(h, _, _)| h != handle), "handle handed out twice");
                    model.push((handle, key, key ^ 1));
                }
                Operation::Get(which) => {
                    if model.is_empty() {
                        continue;
                    }
                    let (handle, key, value) = model[which % model.len()];
                    let node = allocator.node(handle);
                    prop_assert_eq!((*node.key(), *node.value()), (key, value));
                }
                Operation::GetMut(which, value) => {
                    if model.is_empty() {
                        continue;
                    }
                    let index = which % model.len();
                    *allocator.node_mut(model[index].0).value_mut() = value;
                    model[index].2 = value;
                }
                Operation::Release(which) => {
                    if model.is_empty() {
                        continue;
                    }
                    let (handle, key, value) = model.swap_remove(which % model.len());
                    prop_assert_eq!(allocator.release(handle), (key, value));
                }
                Operation::Clear => {
                    allocator.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(allocator.len(), model.len());
            for &(handle, key, value) in &model {
                let node = allocator.node(handle);
                prop_assert_eq!((*node.key(), *node.value()), (key, value));
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn direct_behaves_like_model(operations in prop::collection::vec(strategy(), 0..256)) {
            check_against_model(&mut Allocator::new(AllocationStrategy::Direct), operations)?;
        }

        #[test]
        fn pool_behaves_like_model(operations in prop::collection::vec(strategy(), 0..256)) {
            check_against_model(&mut Allocator::new(AllocationStrategy::Pool), operations)?;
        }

        #[test]
        fn arena_behaves_like_model(operations in prop::collection::vec(strategy(), 0..256)) {
            check_against_model(&mut Allocator::new(AllocationStrategy::Arena { region_capacity: 16 }), operations)?;
        }
    }

    fn release_twice(strategy: AllocationStrategy) {
        let mut allocator: Allocator<i32, i32> = Allocator::new(strategy);
        let handle = allocator.acquire(1, 2);
        assert_eq!(allocator.release(handle), (1, 2));
        assert_eq!(allocator.len(), 0);
        let _ = allocator.release(handle);
    }

    #[test]
    #[should_panic(expected = "`DirectAllocator::release()` - `handle` is invalid!")]
    fn direct_double_release_panics() {
        release_twice(AllocationStrategy::Direct);
    }

    #[test]
    #[should_panic(expected = "`PoolAllocator::release()` - `handle` is invalid!")]
    fn pool_double_release_panics() {
        release_twice(AllocationStrategy::Pool);
    }

    #[test]
    #[should_panic(expected = "`ArenaAllocator::release()` - `handle` is invalid!")]
    fn arena_double_release_panics() {
        release_twice(AllocationStrategy::Arena { region_capacity: 4 });
    }
}
