use core::borrow::Borrow;
use core::fmt;

use super::AvlTreeMap;
use crate::raw::{Location, RawAvlTree};

/// Where a cursor sits once it has moved off the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Boundary {
    BeforeHead,
    AfterEnd,
}

/// A bidirectional cursor over the entries of an [`AvlTreeMap`].
///
/// The cursor points either at an entry or off one end of the map. Both
/// [`next`](Iterator::next) and [`prev`](Cursor::prev) yield the entry under
/// the cursor and then move one step. Once the cursor has stepped off an end,
/// moving back in the other direction re-enters the map at that end.
///
/// As an [`Iterator`] the cursor is not fused: after `next` returns `None`,
/// a call to `prev` re-enters the map and later calls to `next` yield again.
///
/// This `struct` is created by [`AvlTreeMap::ascend_from_start`],
/// [`AvlTreeMap::descend_from_end`], [`AvlTreeMap::ascend`],
/// [`AvlTreeMap::descend`] and [`AvlTreeMap::ascend_at`].
///
/// # Examples
///
/// ```
/// use avl_osmap::AvlTreeMap;
///
/// let map = AvlTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let mut cursor = map.ascend_from_start();
/// assert_eq!(cursor.next(), Some((&1, &"a")));
/// assert_eq!(cursor.peek(), Some((&2, &"b")));
/// assert_eq!(cursor.prev(), Some((&2, &"b")));
/// assert_eq!(cursor.prev(), Some((&1, &"a")));
/// assert_eq!(cursor.prev(), None);
/// assert_eq!(cursor.next(), Some((&1, &"a")));
/// ```
pub struct Cursor<'a, K, V> {
    tree: &'a RawAvlTree<K, V>,
    current: Location,
    boundary: Boundary,
}

/// A bidirectional cursor that can also modify the map.
///
/// Besides moving like a [`Cursor`], it can remove the entry under it with
/// [`delete_current`](CursorMut::delete_current), which leaves the cursor on
/// the following entry, and insert new entries without losing its place.
///
/// # Examples
///
/// ```
/// use avl_osmap::AvlTreeMap;
///
/// let mut map: AvlTreeMap<i32, i32> = (1..=6).map(|k| (k, k * k)).collect();
/// let mut cursor = map.ascend_mut(&2);
/// assert_eq!(cursor.delete_current(), Some((2, 4)));
/// assert_eq!(cursor.peek(), Some((&3, &9)));
/// cursor.insert(10, 100);
/// *cursor.peek_mut().unwrap().1 += 1;
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [1, 3, 4, 5, 6, 10]);
/// assert_eq!(map[&3], 10);
/// ```
pub struct CursorMut<'a, K, V> {
    tree: &'a mut RawAvlTree<K, V>,
    current: Location,
    boundary: Boundary,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Returns a cursor on the first entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.ascend_from_start().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn ascend_from_start(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, self.raw.min(), Boundary::BeforeHead)
    }

    /// Returns a cursor on the last entry, meant to be walked with
    /// [`Cursor::prev`].
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut cursor = map.descend_from_end();
    /// assert_eq!(cursor.prev(), Some((&2, &"b")));
    /// assert_eq!(cursor.prev(), Some((&1, &"a")));
    /// assert_eq!(cursor.prev(), None);
    /// ```
    pub fn descend_from_end(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, self.raw.max(), Boundary::AfterEnd)
    }

    /// Returns a cursor on the first entry whose key is `>= key`.
    ///
    /// If every key is smaller, the cursor starts past the end: `next`
    /// yields nothing and `prev` yields the last entry.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, "a"), (20, "b"), (30, "c")]);
    /// let keys: Vec<_> = map.ascend(&15).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [20, 30]);
    /// assert_eq!(map.ascend(&99).prev(), Some((&30, &"c")));
    /// ```
    pub fn ascend<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let current = self.raw.lower_bound(key);
        Cursor::new(&self.raw, current, Boundary::AfterEnd)
    }

    /// Returns a cursor on the last entry whose key is `<= key`, meant to be
    /// walked with [`Cursor::prev`].
    ///
    /// If every key is larger, the cursor starts before the first entry:
    /// `prev` yields nothing and `next` yields the first entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, "a"), (20, "b"), (30, "c")]);
    /// let mut cursor = map.descend(&25);
    /// assert_eq!(cursor.prev(), Some((&20, &"b")));
    /// assert_eq!(cursor.prev(), Some((&10, &"a")));
    /// assert_eq!(cursor.prev(), None);
    /// ```
    pub fn descend<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let current = self.raw.upper_bound_inclusive(key);
        Cursor::new(&self.raw, current, Boundary::BeforeHead)
    }

    /// Returns a cursor on the entry at `position` in sorted order.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log n) with child counts, O(n) without.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_osmap::{AvlTreeMap, Options};
    ///
    /// let mut map = AvlTreeMap::with_options(Options::new().count_children(true));
    /// map.extend([(3, 'c'), (1, 'a'), (2, 'b')]);
    /// assert_eq!(map.ascend_at(1).next(), Some((&2, &'b')));
    /// ```
    pub fn ascend_at(&self, position: usize) -> Cursor<'_, K, V> {
        let current = self.raw.locate_at(position);
        Cursor::new(&self.raw, Some(current), Boundary::BeforeHead)
    }

    /// Mutable counterpart of [`ascend_from_start`](AvlTreeMap::ascend_from_start).
    pub fn ascend_from_start_mut(&mut self) -> CursorMut<'_, K, V> {
        let current = self.raw.min();
        CursorMut::new(&mut self.raw, current, Boundary::BeforeHead)
    }

    /// Mutable counterpart of [`descend_from_end`](AvlTreeMap::descend_from_end).
    pub fn descend_from_end_mut(&mut self) -> CursorMut<'_, K, V> {
        let current = self.raw.max();
        CursorMut::new(&mut self.raw, current, Boundary::AfterEnd)
    }

    /// Mutable counterpart of [`ascend`](AvlTreeMap::ascend).
    pub fn ascend_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let current = self.raw.lower_bound(key);
        CursorMut::new(&mut self.raw, current, Boundary::AfterEnd)
    }

    /// Mutable counterpart of [`descend`](AvlTreeMap::descend).
    pub fn descend_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let current = self.raw.upper_bound_inclusive(key);
        CursorMut::new(&mut self.raw, current, Boundary::BeforeHead)
    }

    /// Mutable counterpart of [`ascend_at`](AvlTreeMap::ascend_at).
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    pub fn ascend_at_mut(&mut self, position: usize) -> CursorMut<'_, K, V> {
        let current = self.raw.locate_at(position);
        CursorMut::new(&mut self.raw, Some(current), Boundary::BeforeHead)
    }
}

/// One forward step from `current`, shared by both cursor kinds.
fn step_next<K, V>(tree: &RawAvlTree<K, V>, current: &mut Location, boundary: &mut Boundary) -> Location {
    if current.is_none() {
        if *boundary != Boundary::BeforeHead {
            return None;
        }
        *current = tree.min();
    }
    let h = (*current)?;
    *current = tree.next(h);
    if current.is_none() {
        *boundary = Boundary::AfterEnd;
    }
    Some(h)
}

/// One backward step from `current`.
fn step_prev<K, V>(tree: &RawAvlTree<K, V>, current: &mut Location, boundary: &mut Boundary) -> Location {
    if current.is_none() {
        if *boundary != Boundary::AfterEnd {
            return None;
        }
        *current = tree.max();
    }
    let h = (*current)?;
    *current = tree.prev(h);
    if current.is_none() {
        *boundary = Boundary::BeforeHead;
    }
    Some(h)
}

impl<'a, K, V> Cursor<'a, K, V> {
    const fn new(tree: &'a RawAvlTree<K, V>, current: Location, boundary: Boundary) -> Self {
        Cursor {
            tree,
            current,
            boundary,
        }
    }

    /// Yields the entry under the cursor, then moves to its predecessor.
    pub fn prev(&mut self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        step_prev(tree, &mut self.current, &mut self.boundary).map(|h| tree.key_value(h))
    }

    /// Returns the entry under the cursor without moving.
    #[must_use]
    pub fn peek(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        self.current.map(|h| tree.key_value(h))
    }
}

impl<'a, K, V> Iterator for Cursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    /// Yields the entry under the cursor, then moves to its successor.
    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        step_next(tree, &mut self.current, &mut self.boundary).map(|h| tree.key_value(h))
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Cursor::new(self.tree, self.current, self.boundary)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.peek()).finish()
    }
}

impl<'a, K, V> CursorMut<'a, K, V> {
    const fn new(tree: &'a mut RawAvlTree<K, V>, current: Location, boundary: Boundary) -> Self {
        CursorMut {
            tree,
            current,
            boundary,
        }
    }

    /// Yields the entry under the cursor, then moves to its successor.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&K, &mut V)> {
        let h = step_next(self.tree, &mut self.current, &mut self.boundary)?;
        Some(self.tree.key_value_mut(h))
    }

    /// Yields the entry under the cursor, then moves to its predecessor.
    pub fn prev(&mut self) -> Option<(&K, &mut V)> {
        let h = step_prev(self.tree, &mut self.current, &mut self.boundary)?;
        Some(self.tree.key_value_mut(h))
    }

    /// Returns the entry under the cursor without moving.
    #[must_use]
    pub fn peek(&self) -> Option<(&K, &V)> {
        self.current.map(|h| self.tree.key_value(h))
    }

    /// Returns the entry under the cursor, with a mutable value, without
    /// moving.
    pub fn peek_mut(&mut self) -> Option<(&K, &mut V)> {
        let h = self.current?;
        Some(self.tree.key_value_mut(h))
    }

    /// Removes the entry under the cursor and returns it.
    ///
    /// The cursor moves to the entry that followed the removed one, or past
    /// the end if it was the last. Returns `None`, without changing the map,
    /// when the cursor is off either end.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn delete_current(&mut self) -> Option<(K, V)> {
        let h = self.current?;
        // The successor has to be read while `h` is still linked.
        let successor = self.tree.next(h);
        let entry = self.tree.delete_and_replace(h);
        self.current = successor;
        if successor.is_none() {
            self.boundary = Boundary::AfterEnd;
        }
        Some(entry)
    }

    /// Inserts or updates an entry without moving the cursor. Returns `true`
    /// if a new entry was created.
    ///
    /// The cursor keeps pointing at the same entry however the map is
    /// rebalanced.
    pub fn insert(&mut self, key: K, value: V) -> bool
    where
        K: Ord,
    {
        self.tree.insert(key, value).1.is_none()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.peek()).finish()
    }
}
