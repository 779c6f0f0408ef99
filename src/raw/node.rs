use super::handle::Location;

/// The storage record behind a single tree entry.
///
/// Links are raw: setting a child here does not touch the child's parent
/// pointer. The reciprocal bookkeeping lives in [`super::location::Links`].
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    // Height of the subtree rooted here; a leaf has height 0.
    height: u8,
    // Number of nodes in the left/right subtree. Only maintained when the
    // tree counts children.
    left_count: u32,
    right_count: u32,
    parent: Location,
    left: Location,
    right: Location,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 0,
            left_count: 0,
            right_count: 0,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) const fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Returns the key and a mutable reference to the value.
    #[inline]
    pub(crate) const fn entry_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    /// Overwrites the value in place, returning the previous one.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) const fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub(crate) const fn set_height(&mut self, height: u8) {
        self.height = height;
    }

    #[inline]
    pub(crate) const fn left_count(&self) -> u32 {
        self.left_count
    }

    #[inline]
    pub(crate) const fn right_count(&self) -> u32 {
        self.right_count
    }

    #[inline]
    pub(crate) const fn set_counts(&mut self, left_count: u32, right_count: u32) {
        self.left_count = left_count;
        self.right_count = right_count;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Location {
        self.parent
    }

    #[inline]
    pub(crate) const fn set_parent(&mut self, parent: Location) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Location {
        self.left
    }

    #[inline]
    pub(crate) const fn set_left(&mut self, left: Location) {
        self.left = left;
    }

    #[inline]
    pub(crate) const fn right(&self) -> Location {
        self.right
    }

    #[inline]
    pub(crate) const fn set_right(&mut self, right: Location) {
        self.right = right;
    }

    /// Copies height and counts from `other`, used when cloning a tree shape.
    pub(crate) const fn copy_shape_from(&mut self, other: &Self) {
        self.height = other.height;
        self.left_count = other.left_count;
        self.right_count = other.right_count;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::handle::Handle;

    #[test]
    fn new_node_is_a_detached_leaf() {
        let node = Node::new(1, "one");
        assert_eq!(*node.key(), 1);
        assert_eq!(*node.value(), "one");
        assert_eq!(node.height(), 0);
        assert_eq!((node.left_count(), node.right_count()), (0, 0));
        assert!(node.parent().is_none() && node.left().is_none() && node.right().is_none());
    }

    #[test]
    fn setters_do_not_touch_other_fields() {
        let mut node = Node::new(7, 70);
        node.set_height(3);
        node.set_counts(4, 2);
        node.set_left(Some(Handle::from_index(1)));
        assert_eq!(node.height(), 3);
        assert_eq!((node.left_count(), node.right_count()), (4, 2));
        assert_eq!(node.left(), Some(Handle::from_index(1)));
        assert!(node.right().is_none());
        assert_eq!(node.replace_value(71), 70);
        assert_eq!(node.into_entry(), (7, 71));
    }
}
