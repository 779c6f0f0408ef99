use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::allocator::{Allocator, NodeAllocator};
use super::handle::{Handle, Location};
use super::location::{Direction, Links};
use crate::options::Options;

/// Positions within this many steps of either end are reached by walking the
/// in-order chain instead of descending from the root.
const LINEAR_LOCATE_DISTANCE: usize = 8;

/// Inline depth of the explicit stacks used by whole-tree walks. AVL height
/// is bounded by ~1.44 log2(n), so this covers any tree that fits a `Handle`.
const WALK_STACK: usize = 64;

/// The AVL engine backing `AvlTreeMap`.
pub(crate) struct RawAvlTree<K, V> {
    /// Storage for every node reachable from `root`.
    nodes: Allocator<K, V>,
    root: Location,
    /// In-order first node, `None` iff the tree is empty.
    min: Location,
    /// In-order last node, `None` iff the tree is empty.
    max: Location,
    len: usize,
    options: Options,
}

impl<K, V> RawAvlTree<K, V> {
    pub(crate) fn new(options: Options) -> Self {
        debug!(
            count_children = options.counts_children(),
            allocation = ?options.allocation_strategy(),
            "creating avl tree"
        );
        Self {
            nodes: Allocator::new(options.allocation_strategy()),
            root: None,
            min: None,
            max: None,
            len: 0,
            options,
        }
    }

    pub(crate) const fn options(&self) -> Options {
        self.options
    }

    #[inline]
    const fn counts_children(&self) -> bool {
        self.options.counts_children()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Drops every node. With the arena strategy this frees all regions at once.
    pub(crate) fn clear(&mut self) {
        debug!(len = self.len, "clearing avl tree");
        self.nodes.clear();
        self.root = None;
        self.min = None;
        self.max = None;
        self.len = 0;
    }

    pub(crate) const fn min(&self) -> Location {
        self.min
    }

    pub(crate) const fn max(&self) -> Location {
        self.max
    }

    #[inline]
    pub(crate) fn key_value(&self, h: Handle) -> (&K, &V) {
        let node = self.nodes.node(h);
        (node.key(), node.value())
    }

    #[inline]
    pub(crate) fn key_value_mut(&mut self, h: Handle) -> (&K, &mut V) {
        self.nodes.node_mut(h).entry_mut()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, h: Handle) -> &mut V {
        self.nodes.node_mut(h).value_mut()
    }

    #[inline]
    pub(crate) fn next(&self, h: Handle) -> Location {
        self.nodes.next_location(h)
    }

    #[inline]
    pub(crate) fn prev(&self, h: Handle) -> Location {
        self.nodes.prev_location(h)
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        self.min.map(|h| self.key_value(h))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        self.max.map(|h| self.key_value(h))
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let h = self.min?;
        Some(self.delete_and_replace(h))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let h = self.max?;
        Some(self.delete_and_replace(h))
    }

    /// Moves every entry out in key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut handles = Vec::with_capacity(self.len);
        let mut current = self.min;
        while let Some(h) = current {
            handles.push(h);
            current = self.nodes.next_location(h);
        }
        let entries = handles.into_iter().map(|h| self.nodes.release(h)).collect();
        self.clear();
        entries
    }

    fn should_locate_linearly(&self, position: usize) -> bool {
        position.min(self.len - position - 1) <= LINEAR_LOCATE_DISTANCE
    }

    /// Finds the node at `position` in key order, or `None` if out of range.
    ///
    /// O(log n) with child counts, otherwise a walk from the nearer end.
    pub(crate) fn try_locate_at(&self, position: usize) -> Location {
        if position >= self.len {
            return None;
        }
        if !self.counts_children() || self.should_locate_linearly(position) {
            return if position < self.len / 2 {
                self.nodes.advance(self.min, position)
            } else {
                self.nodes.advance_back(self.max, self.len - position - 1)
            };
        }
        let mut current = self.root?;
        let mut position = position;
        loop {
            debug_assert!(position <= self.nodes.child_count(current) as usize);
            let left_count = self.nodes.left_count(current) as usize;
            current = match position.cmp(&left_count) {
                Ordering::Equal => return Some(current),
                Ordering::Less => self.nodes.left(current),
                Ordering::Greater => {
                    position -= left_count + 1;
                    self.nodes.right(current)
                }
            }
            .expect("child counts are inconsistent with the tree shape");
        }
    }

    /// # Panics
    ///
    /// Panics if `position >= len`.
    pub(crate) fn locate_at(&self, position: usize) -> Handle {
        self.try_locate_at(position).expect("index out of bounds")
    }

    /// Removes the entry at `position` in key order.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len`.
    pub(crate) fn delete_at(&mut self, position: usize) -> (K, V) {
        let h = self.locate_at(position);
        self.delete_and_replace(h)
    }

    /// Zero-based position of `h` in key order.
    pub(crate) fn rank_of_handle(&self, h: Handle) -> usize {
        if !self.counts_children() {
            let mut rank = 0;
            let mut current = self.nodes.prev_location(h);
            while let Some(p) = current {
                rank += 1;
                current = self.nodes.prev_location(p);
            }
            return rank;
        }
        // Everything in the left subtree precedes `h`, plus every ancestor we
        // hang to the right of, together with that ancestor's left subtree.
        let mut rank = self.nodes.left_count(h) as usize;
        let mut current = h;
        loop {
            match self.nodes.parent_and_dir(current) {
                (Some(parent), Direction::Right) => {
                    rank += self.nodes.left_count(parent) as usize + 1;
                    current = parent;
                }
                (Some(parent), _) => current = parent,
                (None, _) => return rank,
            }
        }
    }

    fn find_replacement(&self, h: Handle) -> Location {
        match (self.nodes.left(h), self.nodes.right(h)) {
            (Some(left), None) => self.nodes.go_right(Some(left)),
            (Some(left), Some(right)) if self.nodes.height(left) <= self.nodes.height(right) => {
                self.nodes.go_right(Some(left))
            }
            (_, Some(right)) => self.nodes.go_left(Some(right)),
            (None, None) => None,
        }
    }

    /// Unlinks `h`, rebalances, and hands its storage back to the allocator.
    ///
    /// Every other handle stays valid: nodes are relinked, never swapped.
    pub(crate) fn delete_and_replace(&mut self, h: Handle) -> (K, V) {
        let replacement = self.find_replacement(h);
        let (parent, dir) = self.nodes.parent_and_dir(h);
        if self.min == Some(h) {
            self.min = self.nodes.next_location(h);
        }
        if self.max == Some(h) {
            self.max = self.nodes.prev_location(h);
        }
        match replacement {
            None => match parent {
                // The last node; the tree is now empty.
                None => self.set_root(None),
                Some(parent) => {
                    self.nodes.remove_child(parent, h);
                    self.check_balance(Some(parent), false);
                }
            },
            Some(replacement) => {
                let (replacement_parent, replacement_dir) = self.nodes.parent_and_dir(replacement);
                if replacement_parent == Some(h) {
                    // A direct child takes the deleted node's place and adopts
                    // its other subtree.
                    self.splice(parent, dir, replacement);
                    let inverted = replacement_dir.invert();
                    let adopted = self.nodes.child_at(h, inverted);
                    self.nodes.set_child(replacement, adopted, inverted);
                    self.check_balance(Some(replacement), true);
                } else {
                    let replacement_parent =
                        replacement_parent.expect("a replacement below the deleted node has a parent");
                    let orphan = self.nodes.child_at(replacement, replacement_dir.invert());
                    self.nodes.set_child(replacement_parent, orphan, replacement_dir);
                    self.splice(parent, dir, replacement);
                    let (left, right) = (self.nodes.left(h), self.nodes.right(h));
                    self.nodes.set_left(replacement, left);
                    self.nodes.set_right(replacement, right);
                    self.check_balance(Some(replacement_parent), true);
                }
            }
        }
        self.len -= 1;
        self.nodes.release(h)
    }

    /// Puts `replacement` where a child of `parent` on side `dir` was, or at
    /// the root.
    fn splice(&mut self, parent: Location, dir: Direction, replacement: Handle) {
        match parent {
            Some(parent) => self.nodes.set_child(parent, Some(replacement), dir),
            None => self.set_root(Some(replacement)),
        }
    }

    fn set_root(&mut self, root: Location) {
        self.root = root;
        if let Some(r) = root {
            self.nodes.set_parent(r, None);
        }
    }

    fn update_counts(&mut self, mut loc: Location) {
        if !self.counts_children() {
            return;
        }
        while let Some(h) = loc {
            self.nodes.recalc_counts(h);
            loc = self.nodes.parent(h);
        }
    }

    /// Walks up from `loc` restoring heights, balance and counts.
    ///
    /// Stops early once a node's height is unchanged, unless `full_way_up`
    /// is set because the structure changed above the starting point.
    fn check_balance(&mut self, mut loc: Location, full_way_up: bool) {
        while let Some(h) = loc {
            let height_changed = self.nodes.recalc_height(h);
            let parent = self.nodes.parent(h);
            match self.nodes.balance(h) {
                -2 => {
                    let left = self.nodes.left(h).expect("left-heavy node has a left child");
                    match self.nodes.balance(left) {
                        -1 | 0 => self.rotate_right(h),
                        1 => self.rotate_left_right(h),
                        b => panic!("impossible balance factor {b} under left-heavy node {h:?}"),
                    }
                }
                2 => {
                    let right = self.nodes.right(h).expect("right-heavy node has a right child");
                    match self.nodes.balance(right) {
                        0 | 1 => self.rotate_left(h),
                        -1 => self.rotate_right_left(h),
                        b => panic!("impossible balance factor {b} under right-heavy node {h:?}"),
                    }
                }
                -1..=1 => {
                    if !height_changed && !full_way_up {
                        self.update_counts(loc);
                        return;
                    }
                    if self.counts_children() {
                        self.nodes.recalc_counts(h);
                    }
                }
                b => panic!("impossible balance factor {b} at node {h:?}"),
            }
            loc = parent;
        }
    }

    /// Makes `new` occupy `old`'s slot under `old`'s parent.
    fn replace_in_parent(&mut self, old: Handle, new: Handle) {
        match self.nodes.parent_and_dir(old) {
            (Some(parent), dir) => self.nodes.set_child(parent, Some(new), dir),
            (None, _) => self.set_root(Some(new)),
        }
    }

    fn recalc(&mut self, handles: &[Handle]) {
        for &h in handles {
            self.nodes.recalc_height(h);
        }
        if self.counts_children() {
            for &h in handles {
                self.nodes.recalc_counts(h);
            }
        }
    }

    /// Left-left case.
    fn rotate_right(&mut self, h: Handle) {
        trace!(pivot = h.to_index(), "rotate right");
        let left = self.nodes.left(h).expect("rotate_right needs a left child");
        let left_right = self.nodes.right(left);
        self.replace_in_parent(h, left);
        self.nodes.set_left(h, left_right);
        self.nodes.set_right(left, Some(h));
        self.recalc(&[h, left]);
    }

    /// Right-right case.
    fn rotate_left(&mut self, h: Handle) {
        trace!(pivot = h.to_index(), "rotate left");
        let right = self.nodes.right(h).expect("rotate_left needs a right child");
        let right_left = self.nodes.left(right);
        self.replace_in_parent(h, right);
        self.nodes.set_right(h, right_left);
        self.nodes.set_left(right, Some(h));
        self.recalc(&[h, right]);
    }

    /// Left-right case.
    fn rotate_left_right(&mut self, h: Handle) {
        trace!(pivot = h.to_index(), "rotate left-right");
        let left = self.nodes.left(h).expect("rotate_left_right needs a left child");
        let left_right = self.nodes.right(left).expect("rotate_left_right needs a left-right grandchild");
        self.replace_in_parent(h, left_right);
        let (grand_left, grand_right) = (self.nodes.left(left_right), self.nodes.right(left_right));
        self.nodes.set_right(left_right, Some(h));
        self.nodes.set_left(left_right, Some(left));
        self.nodes.set_left(h, grand_right);
        self.nodes.set_right(left, grand_left);
        self.recalc(&[h, left, left_right]);
    }

    /// Right-left case.
    fn rotate_right_left(&mut self, h: Handle) {
        trace!(pivot = h.to_index(), "rotate right-left");
        let right = self.nodes.right(h).expect("rotate_right_left needs a right child");
        let right_left = self.nodes.left(right).expect("rotate_right_left needs a right-left grandchild");
        self.replace_in_parent(h, right_left);
        let (grand_left, grand_right) = (self.nodes.left(right_left), self.nodes.right(right_left));
        self.nodes.set_left(right_left, Some(h));
        self.nodes.set_right(right_left, Some(right));
        self.nodes.set_right(h, grand_left);
        self.nodes.set_left(right, grand_right);
        self.recalc(&[h, right, right_left]);
    }
}

impl<K: Ord, V> RawAvlTree<K, V> {
    /// Descends from the root towards `key`.
    ///
    /// Returns the matching node with `Center`, or the last visited node and
    /// the side `key` would be attached on. An empty tree yields
    /// `(None, Center)`.
    pub(crate) fn locate<Q>(&self, key: &Q) -> (Location, Direction)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(mut current) = self.root else {
            return (None, Direction::Center);
        };
        loop {
            let (next, dir) = match key.cmp(self.nodes.node(current).key().borrow()) {
                Ordering::Less => (self.nodes.left(current), Direction::Left),
                Ordering::Equal => return (Some(current), Direction::Center),
                Ordering::Greater => (self.nodes.right(current), Direction::Right),
            };
            match next {
                Some(next) => current = next,
                None => return (Some(current), dir),
            }
        }
    }

    pub(crate) fn search<Q>(&self, key: &Q) -> Location
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.locate(key) {
            (Some(h), Direction::Center) => Some(h),
            _ => None,
        }
    }

    /// Inserts or updates `key`.
    ///
    /// Returns the node holding the value, and the previous value if the key
    /// was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, Option<V>) {
        let (loc, dir) = self.locate(&key);
        if let (Some(h), Direction::Center) = (loc, dir) {
            let old = self.nodes.node_mut(h).replace_value(value);
            return (h, Some(old));
        }
        let handle = self.nodes.acquire(key, value);
        self.len += 1;
        match loc {
            Some(parent) => {
                self.nodes.add_child(parent, handle, dir);
                if dir == Direction::Left && loc == self.min {
                    self.min = Some(handle);
                } else if dir == Direction::Right && loc == self.max {
                    self.max = Some(handle);
                }
                if self.nodes.recalc_height(parent) {
                    if self.counts_children() {
                        self.nodes.recalc_counts(parent);
                    }
                    let grandparent = self.nodes.parent(parent);
                    self.check_balance(grandparent, false);
                } else {
                    // Height is stable, so no rotation can be needed above.
                    self.update_counts(Some(parent));
                }
            }
            None => {
                self.root = Some(handle);
                self.min = self.root;
                self.max = self.root;
            }
        }
        (handle, None)
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.search(key)?;
        Some(self.delete_and_replace(h))
    }

    /// First node whose key is `>= key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Location
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.locate(key) {
            (Some(h), Direction::Right) => self.nodes.next_location(h),
            (loc, _) => loc,
        }
    }

    /// Last node whose key is `<= key`.
    pub(crate) fn upper_bound_inclusive<Q>(&self, key: &Q) -> Location
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.locate(key) {
            (Some(h), Direction::Left) => self.nodes.prev_location(h),
            (loc, _) => loc,
        }
    }

    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.search(key)?;
        Some(self.rank_of_handle(h))
    }
}

impl<K: Clone, V: Clone> Clone for RawAvlTree<K, V> {
    /// Copies the tree node by node, preserving its exact shape.
    fn clone(&self) -> Self {
        let mut cloned = Self {
            nodes: Allocator::new(self.options.allocation_strategy()),
            root: None,
            min: None,
            max: None,
            len: self.len,
            options: self.options,
        };
        cloned.nodes.reserve(self.len);

        let Some(root) = self.root else {
            return cloned;
        };
        let mut stack: SmallVec<[(Handle, Location, Direction); WALK_STACK]> = SmallVec::new();
        stack.push((root, None, Direction::Center));
        while let Some((source, parent, dir)) = stack.pop() {
            let node = self.nodes.node(source);
            let h = cloned.nodes.acquire(node.key().clone(), node.value().clone());
            cloned.nodes.node_mut(h).copy_shape_from(node);
            match parent {
                Some(parent) => cloned.nodes.add_child(parent, h, dir),
                None => cloned.root = Some(h),
            }
            if self.min == Some(source) {
                cloned.min = Some(h);
            }
            if self.max == Some(source) {
                cloned.max = Some(h);
            }
            if let Some(right) = node.right() {
                stack.push((right, Some(h), Direction::Right));
            }
            if let Some(left) = node.left() {
                stack.push((left, Some(h), Direction::Left));
            }
        }
        cloned
    }
}
