use core::borrow::Borrow;
use core::ops::{Index, IndexMut};

use super::AvlTreeMap;
use crate::Rank;

/// Order-statistic operations.
///
/// All of them work on any map. With [`Options::count_children`] enabled they
/// descend the tree in O(log n); otherwise they walk from the nearer end in
/// O(n).
///
/// [`Options::count_children`]: crate::Options::count_children
impl<K, V> AvlTreeMap<K, V> {
    /// Returns the entry at `position` in sorted order.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::{AvlTreeMap, Options};
    ///
    /// let mut map = AvlTreeMap::with_options(Options::new().count_children(true));
    /// for k in [7, 1, 3, 10, 2] {
    ///     map.insert(k, k * 100);
    /// }
    /// assert_eq!(map.at(2), (&3, &300));
    /// ```
    pub fn at(&self, position: usize) -> (&K, &V) {
        self.raw.key_value(self.raw.locate_at(position))
    }

    /// Returns the entry at `position` in sorted order, with a mutable value.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    pub fn at_mut(&mut self, position: usize) -> (&K, &mut V) {
        let h = self.raw.locate_at(position);
        self.raw.key_value_mut(h)
    }

    /// Removes and returns the entry at `position` in sorted order.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
    /// assert_eq!(map.delete_at(1), ("b", 2));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn delete_at(&mut self, position: usize) -> (K, V) {
        self.raw.delete_at(position)
    }

    /// Returns the key-value pair at position `rank` in sorted order, or
    /// `None` if `rank` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert("a", 10);
    /// map.insert("c", 30);
    /// map.insert("b", 20);
    ///
    /// let (key, value) = map.get_by_rank(1).unwrap();
    /// assert_eq!((key, value), (&"b", &20));
    /// assert!(map.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        self.raw.try_locate_at(rank).map(|h| self.raw.key_value(h))
    }

    /// Returns the key and a mutable reference to the value at position
    /// `rank` in sorted order, or `None` if `rank` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(10, "a");
    /// map.insert(5, "b");
    ///
    /// if let Some((key, value)) = map.get_by_rank_mut(0) {
    ///     assert_eq!(*key, 5);
    ///     *value = "updated";
    /// }
    ///
    /// assert_eq!(map.get(&5), Some(&"updated"));
    /// ```
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let h = self.raw.try_locate_at(rank)?;
        Some(self.raw.key_value_mut(h))
    }

    /// Returns the zero-based rank of `key` in sorted order, or `None` if the
    /// key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(10, "a");
    /// map.insert(20, "b");
    ///
    /// assert_eq!(map.rank_of(&20), Some(1));
    /// assert_eq!(map.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key)
    }
}

/// Indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_osmap::{AvlTreeMap, Rank};
///
/// let map = AvlTreeMap::from([("a", 1), ("b", 2)]);
/// assert_eq!(map[Rank(0)], 1);
/// ```
impl<K, V> Index<Rank> for AvlTreeMap<K, V> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.at(rank.0).1
    }
}

/// Mutably indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_osmap::{AvlTreeMap, Rank};
///
/// let mut map = AvlTreeMap::from([("a", 1), ("b", 2)]);
/// map[Rank(1)] = 5;
///
/// assert_eq!(map.get(&"b"), Some(&5));
/// ```
impl<K, V> IndexMut<Rank> for AvlTreeMap<K, V> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.at_mut(rank.0).1
    }
}
