use super::allocator::NodeAllocator;
use super::handle::{Handle, Location};

/// Which side of its parent a node hangs from, or where a key belongs
/// relative to a visited node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Left,
    /// Exact match, or no parent.
    Center,
    Right,
}

impl Direction {
    #[inline]
    pub(crate) const fn invert(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Center => Self::Center,
            Self::Right => Self::Left,
        }
    }
}

/// Navigation and link maintenance over the nodes held by an allocator.
///
/// Setters keep parent pointers reciprocal: attaching a child through
/// [`set_left`](Links::set_left) or [`set_right`](Links::set_right) also
/// points the child back at its new parent.
pub(crate) trait Links<K, V>: NodeAllocator<K, V> {
    #[inline]
    fn left(&self, h: Handle) -> Location {
        self.node(h).left()
    }

    #[inline]
    fn right(&self, h: Handle) -> Location {
        self.node(h).right()
    }

    #[inline]
    fn parent(&self, h: Handle) -> Location {
        self.node(h).parent()
    }

    #[inline]
    fn height(&self, h: Handle) -> u8 {
        self.node(h).height()
    }

    /// Returns the parent and the side `h` hangs from.
    ///
    /// # Panics
    ///
    /// Panics if the parent does not list `h` as one of its children.
    fn parent_and_dir(&self, h: Handle) -> (Location, Direction) {
        let Some(parent) = self.parent(h) else {
            return (None, Direction::Center);
        };
        let node = self.node(parent);
        if node.left() == Some(h) {
            (Some(parent), Direction::Left)
        } else if node.right() == Some(h) {
            (Some(parent), Direction::Right)
        } else {
            panic!("parents aren't consistent");
        }
    }

    /// Height of the right subtree minus height of the left subtree.
    fn balance(&self, h: Handle) -> i8 {
        let side = |child: Location| child.map_or(0, |c| i16::from(self.height(c)) + 1);
        let node = self.node(h);
        #[allow(clippy::cast_possible_truncation)]
        let balance = (side(node.right()) - side(node.left())) as i8;
        balance
    }

    fn child_at(&self, h: Handle, dir: Direction) -> Location {
        match dir {
            Direction::Left => self.left(h),
            Direction::Right => self.right(h),
            Direction::Center => panic!("invalid direction"),
        }
    }

    #[inline]
    fn set_parent(&mut self, h: Handle, parent: Location) {
        self.node_mut(h).set_parent(parent);
    }

    fn set_left(&mut self, h: Handle, child: Location) {
        self.node_mut(h).set_left(child);
        if let Some(c) = child {
            self.set_parent(c, Some(h));
        }
    }

    fn set_right(&mut self, h: Handle, child: Location) {
        self.node_mut(h).set_right(child);
        if let Some(c) = child {
            self.set_parent(c, Some(h));
        }
    }

    /// Attaches `child` on side `dir`; `Center` is ignored.
    fn set_child(&mut self, h: Handle, child: Location, dir: Direction) {
        match dir {
            Direction::Left => self.set_left(h, child),
            Direction::Right => self.set_right(h, child),
            Direction::Center => {}
        }
    }

    /// Attaches a detached node into an empty child slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already occupied or `dir` is `Center`.
    fn add_child(&mut self, h: Handle, child: Handle, dir: Direction) {
        match dir {
            Direction::Left => {
                assert!(self.left(h).is_none(), "already has a left child");
                self.node_mut(h).set_left(Some(child));
            }
            Direction::Right => {
                assert!(self.right(h).is_none(), "already has a right child");
                self.node_mut(h).set_right(Some(child));
            }
            Direction::Center => panic!("wrong dir"),
        }
        self.set_parent(child, Some(h));
    }

    /// Detaches `child` from `h` and clears its parent pointer.
    fn remove_child(&mut self, h: Handle, child: Handle) {
        if self.left(h) == Some(child) {
            self.node_mut(h).set_left(None);
        } else if self.right(h) == Some(child) {
            self.node_mut(h).set_right(None);
        } else {
            panic!("wrong dir");
        }
        self.set_parent(child, None);
    }

    /// Recomputes the stored height from the children. Returns whether it
    /// changed.
    fn recalc_height(&mut self, h: Handle) -> bool {
        let node = self.node(h);
        let mut height = 0;
        if let Some(l) = node.left() {
            height = 1 + self.height(l);
        }
        if let Some(r) = node.right() {
            height = height.max(1 + self.height(r));
        }
        let changed = height != node.height();
        self.node_mut(h).set_height(height);
        changed
    }

    #[inline]
    fn left_count(&self, h: Handle) -> u32 {
        self.node(h).left_count()
    }

    #[inline]
    fn right_count(&self, h: Handle) -> u32 {
        self.node(h).right_count()
    }

    /// Number of descendants of `h`.
    #[inline]
    fn child_count(&self, h: Handle) -> u32 {
        self.left_count(h) + self.right_count(h)
    }

    /// Recomputes descendant counts from the immediate children, whose own
    /// counts must already be correct.
    fn recalc_counts(&mut self, h: Handle) {
        let node = self.node(h);
        let left_count = node.left().map_or(0, |l| 1 + self.child_count(l));
        let right_count = node.right().map_or(0, |r| 1 + self.child_count(r));
        self.node_mut(h).set_counts(left_count, right_count);
    }

    /// Leftmost node of the subtree at `loc`.
    fn go_left(&self, loc: Location) -> Location {
        let mut current = loc?;
        while let Some(l) = self.left(current) {
            current = l;
        }
        Some(current)
    }

    /// Rightmost node of the subtree at `loc`.
    fn go_right(&self, loc: Location) -> Location {
        let mut current = loc?;
        while let Some(r) = self.right(current) {
            current = r;
        }
        Some(current)
    }

    /// In-order successor.
    fn next_location(&self, h: Handle) -> Location {
        if let Some(r) = self.right(h) {
            return self.go_left(Some(r));
        }
        let mut current = h;
        loop {
            match self.parent_and_dir(current) {
                (Some(parent), Direction::Right) => current = parent,
                (parent, _) => return parent,
            }
        }
    }

    /// In-order predecessor.
    fn prev_location(&self, h: Handle) -> Location {
        if let Some(l) = self.left(h) {
            return self.go_right(Some(l));
        }
        let mut current = h;
        loop {
            match self.parent_and_dir(current) {
                (Some(parent), Direction::Left) => current = parent,
                (parent, _) => return parent,
            }
        }
    }

    fn advance(&self, mut loc: Location, count: usize) -> Location {
        for _ in 0..count {
            loc = self.next_location(loc?);
        }
        loc
    }

    fn advance_back(&self, mut loc: Location, count: usize) -> Location {
        for _ in 0..count {
            loc = self.prev_location(loc?);
        }
        loc
    }
}

impl<K, V, A: NodeAllocator<K, V> + ?Sized> Links<K, V> for A {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::allocator::PoolAllocator;

    /// Builds `2 <- 4 -> 6` with `1` under `2` and returns the handles.
    fn small_tree() -> (PoolAllocator<i32, ()>, [Handle; 4]) {
        let mut nodes = PoolAllocator::new();
        let four = nodes.acquire(4, ());
        let two = nodes.acquire(2, ());
        let six = nodes.acquire(6, ());
        let one = nodes.acquire(1, ());
        nodes.add_child(four, two, Direction::Left);
        nodes.add_child(four, six, Direction::Right);
        nodes.add_child(two, one, Direction::Left);
        nodes.recalc_height(two);
        nodes.recalc_counts(two);
        nodes.recalc_height(four);
        nodes.recalc_counts(four);
        (nodes, [one, two, four, six])
    }

    #[test]
    fn invert_direction() {
        assert_eq!(Direction::Left.invert(), Direction::Right);
        assert_eq!(Direction::Right.invert(), Direction::Left);
        assert_eq!(Direction::Center.invert(), Direction::Center);
    }

    #[test]
    fn heights_balances_and_counts() {
        let (nodes, [one, two, four, six]) = small_tree();
        assert_eq!(nodes.height(four), 2);
        assert_eq!(nodes.height(two), 1);
        assert_eq!(nodes.height(one), 0);
        assert_eq!(nodes.balance(four), -1);
        assert_eq!(nodes.balance(two), -1);
        assert_eq!(nodes.balance(six), 0);
        assert_eq!((nodes.left_count(four), nodes.right_count(four)), (2, 1));
        assert_eq!(nodes.child_count(two), 1);
    }

    #[test]
    fn recalc_height_reports_change() {
        let (mut nodes, [_, two, four, _]) = small_tree();
        assert!(!nodes.recalc_height(four));
        let three = nodes.acquire(3, ());
        nodes.add_child(two, three, Direction::Right);
        assert!(!nodes.recalc_height(two));
        let zero = nodes.acquire(0, ());
        let one = nodes.left(two).unwrap();
        nodes.add_child(one, zero, Direction::Left);
        assert!(nodes.recalc_height(one));
    }

    #[test]
    fn in_order_navigation() {
        let (nodes, [one, two, four, six]) = small_tree();
        assert_eq!(nodes.go_left(Some(four)), Some(one));
        assert_eq!(nodes.go_right(Some(four)), Some(six));
        assert_eq!(nodes.go_left(None), None);
        assert_eq!(nodes.next_location(one), Some(two));
        assert_eq!(nodes.next_location(two), Some(four));
        assert_eq!(nodes.next_location(four), Some(six));
        assert_eq!(nodes.next_location(six), None);
        assert_eq!(nodes.prev_location(six), Some(four));
        assert_eq!(nodes.prev_location(one), None);
        assert_eq!(nodes.advance(Some(one), 3), Some(six));
        assert_eq!(nodes.advance(Some(one), 4), None);
        assert_eq!(nodes.advance_back(Some(six), 2), Some(two));
    }

    #[test]
    fn setters_keep_parents_reciprocal() {
        let (mut nodes, [one, two, four, six]) = small_tree();
        nodes.set_right(two, Some(six));
        assert_eq!(nodes.parent(six), Some(two));
        assert_eq!(nodes.parent_and_dir(six), (Some(two), Direction::Right));
        assert_eq!(nodes.parent_and_dir(four), (None, Direction::Center));

        nodes.remove_child(two, one);
        assert_eq!(nodes.left(two), None);
        assert_eq!(nodes.parent(one), None);
    }

    #[test]
    #[should_panic(expected = "already has a left child")]
    fn add_child_rejects_occupied_slot() {
        let (mut nodes, [_, two, _, _]) = small_tree();
        let zero = nodes.acquire(0, ());
        nodes.add_child(two, zero, Direction::Left);
    }

    #[test]
    #[should_panic(expected = "parents aren't consistent")]
    fn inconsistent_parent_is_detected() {
        let (mut nodes, [_, two, _, six]) = small_tree();
        nodes.set_parent(six, Some(two));
        let _ = nodes.parent_and_dir(six);
    }
}
