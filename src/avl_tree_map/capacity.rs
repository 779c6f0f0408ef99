use super::AvlTreeMap;
use crate::options::Options;
use crate::raw::RawAvlTree;

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` nodes before
    /// the node storage grows.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, i32> = AvlTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut raw = RawAvlTree::new(Options::new());
        raw.reserve(capacity);
        AvlTreeMap { raw }
    }

    /// Returns the number of nodes the map can hold without reserving more
    /// storage.
    ///
    /// With [`AllocationStrategy::Arena`](crate::AllocationStrategy::Arena)
    /// this is the total size of the regions reserved so far, including slots
    /// of removed entries, which are not reused.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::{AllocationStrategy, AvlTreeMap, Options};
    ///
    /// let options = Options::new().allocation(AllocationStrategy::Arena { region_capacity: 16 });
    /// let mut map = AvlTreeMap::with_options(options);
    /// assert_eq!(map.capacity(), 0);
    /// map.insert(1, 1);
    /// assert_eq!(map.capacity(), 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
