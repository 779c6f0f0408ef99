/// Nodes per region when [`AllocationStrategy::Arena`] is built with [`AllocationStrategy::arena`].
pub const DEFAULT_REGION_CAPACITY: usize = 128;

/// How an [`AvlTreeMap`](crate::AvlTreeMap) obtains and reclaims its nodes.
///
/// The strategy changes performance characteristics only; every strategy
/// yields the same map behavior.
///
/// # Examples
///
/// ```
/// use avl_osmap::{AllocationStrategy, AvlTreeMap, Options};
///
/// let options = Options::new().allocation(AllocationStrategy::Pool);
/// let mut map = AvlTreeMap::with_options(options);
/// map.insert(1, "a");
/// map.remove(&1);
/// // The freed node is recycled by the next insert.
/// map.insert(2, "b");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum AllocationStrategy {
    /// Every node is allocated on its own and freed as soon as it is removed.
    #[default]
    Direct,
    /// Removed nodes are kept on a free list and their storage is reused by
    /// later insertions.
    Pool,
    /// Nodes are carved out of regions of `region_capacity` nodes reserved in
    /// one allocation each. Storage of removed nodes is not reclaimed until
    /// the map is cleared or dropped, when all regions are freed at once.
    ///
    /// A `region_capacity` of zero is treated as one.
    Arena {
        /// Number of nodes per region.
        region_capacity: usize,
    },
}

impl AllocationStrategy {
    /// An arena with [`DEFAULT_REGION_CAPACITY`] nodes per region.
    #[must_use]
    pub const fn arena() -> Self {
        Self::Arena {
            region_capacity: DEFAULT_REGION_CAPACITY,
        }
    }
}

/// Construction-time configuration for an [`AvlTreeMap`](crate::AvlTreeMap).
///
/// # Examples
///
/// ```
/// use avl_osmap::{AllocationStrategy, Options};
///
/// let options = Options::new()
///     .count_children(true)
///     .allocation(AllocationStrategy::arena());
/// assert!(options.counts_children());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Options {
    count_children: bool,
    allocation: AllocationStrategy,
}

impl Options {
    /// Direct allocation, no child counts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count_children: false,
            allocation: AllocationStrategy::Direct,
        }
    }

    /// Maintains left/right descendant counts in every node.
    ///
    /// This makes positional operations such as
    /// [`at`](crate::AvlTreeMap::at) O(log n) instead of O(n), at the cost of
    /// O(log n) extra bookkeeping per insertion and removal.
    #[must_use]
    pub const fn count_children(mut self, count: bool) -> Self {
        self.count_children = count;
        self
    }

    /// Selects the node allocation strategy.
    #[must_use]
    pub const fn allocation(mut self, strategy: AllocationStrategy) -> Self {
        self.allocation = strategy;
        self
    }

    #[must_use]
    pub const fn counts_children(&self) -> bool {
        self.count_children
    }

    #[must_use]
    pub const fn allocation_strategy(&self) -> AllocationStrategy {
        self.allocation
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options, Options::new());
        assert!(!options.counts_children());
        assert_eq!(options.allocation_strategy(), AllocationStrategy::Direct);
    }

    #[test]
    fn builder_sets_fields() {
        let options = Options::new().count_children(true).allocation(AllocationStrategy::arena());
        assert!(options.counts_children());
        assert_eq!(
            options.allocation_strategy(),
            AllocationStrategy::Arena {
                region_capacity: DEFAULT_REGION_CAPACITY
            }
        );
    }
}
