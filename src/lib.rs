//! An AVL-tree ordered map with optional order statistics.
//!
//! This crate provides [`AvlTreeMap`], a sorted map with an API modelled on the
//! standard library's `BTreeMap`, plus:
//!
//! - Positional access: [`at`](AvlTreeMap::at), [`delete_at`](AvlTreeMap::delete_at),
//!   [`rank_of`](AvlTreeMap::rank_of) and indexing by [`Rank`]. These are
//!   O(log n) when child counts are enabled through [`Options`].
//! - Bidirectional [`Cursor`](avl_tree_map::Cursor)s starting at either end, at
//!   a key, or at a position, and [`CursorMut`](avl_tree_map::CursorMut)s that
//!   can delete the entry under them and keep iterating.
//! - A choice of node [`AllocationStrategy`]: individually allocated nodes, a
//!   reuse pool, or fixed-size arena regions freed all at once.
//!
//! # Example
//!
//! ```
//! use avl_osmap::{AllocationStrategy, AvlTreeMap, Options, Rank};
//!
//! let options = Options::new()
//!     .count_children(true)
//!     .allocation(AllocationStrategy::Pool);
//! let mut scores = AvlTreeMap::with_options(options);
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.at(1), (&"Bob", &85));
//! assert_eq!(scores.rank_of(&"Carol"), Some(2));
//! assert_eq!(scores[Rank(0)], 100);
//!
//! // Drop everyone below 90 while walking the map.
//! let mut cursor = scores.ascend_from_start_mut();
//! while let Some((_, &mut score)) = cursor.peek_mut() {
//!     if score < 90 {
//!         cursor.delete_current();
//!     } else {
//!         cursor.next();
//!     }
//! }
//! assert_eq!(scores.len(), 2);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **No unsafe code** - Nodes live in an index-addressed store and link to
//!   each other by handle
//! - **Stable cursors** - Rebalancing relinks nodes and never moves them
//!
//! # Logging
//!
//! Construction and clearing emit `tracing` events at `debug` level; rotations,
//! pool reuse and arena region reservations at `trace` level. No subscriber is
//! installed by this crate.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod options;
mod order_statistic;
mod raw;

pub mod avl_tree_map;

pub use avl_tree_map::AvlTreeMap;
pub use options::{AllocationStrategy, DEFAULT_REGION_CAPACITY, Options};
pub use order_statistic::Rank;
