/// A zero-based position in the key order of an [`AvlTreeMap`].
///
/// Indexing by `Rank` goes through [`AvlTreeMap::at`], so it is O(log n) on
/// maps built with [`Options::count_children`] and a linear walk from the
/// nearer end otherwise. Out-of-range ranks panic.
///
/// # Examples
///
/// ```
/// use avl_osmap::{AvlTreeMap, Options, Rank};
///
/// let mut scores = AvlTreeMap::with_options(Options::new().count_children(true));
/// for (player, score) in [("mia", 40), ("ana", 75), ("zoe", 12), ("kit", 58)] {
///     scores.insert(player, score);
/// }
///
/// assert_eq!(scores[Rank(0)], 75);
/// scores[Rank(3)] += 1;
/// assert_eq!(scores.get("zoe"), Some(&13));
/// assert_eq!(scores.rank_of("kit"), Some(1));
/// ```
///
/// [`AvlTreeMap`]: crate::AvlTreeMap
/// [`AvlTreeMap::at`]: crate::AvlTreeMap::at
/// [`Options::count_children`]: crate::Options::count_children
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
