mod allocator;
mod handle;
mod location;
mod node;
mod raw_avl_tree;

pub(crate) use handle::Location;
pub(crate) use raw_avl_tree::RawAvlTree;
