/// Where an insertion starts its downward walk.
///
/// # Examples
///
/// ```
/// use avl_stat_tree::{AvlTreeMap, Descent};
///
/// let mut map = AvlTreeMap::new();
/// for key in 0..8 {
///     map.insert_with_descent(key, key * 10, Descent::Max);
/// }
/// assert_eq!(map.len(), 8);
/// assert_eq!(map.last_key_value(), Some((&7, &70)));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Descent {
    /// Walk down from the root. Always correct.
    #[default]
    Root,
    /// Walk down from the node currently holding the greatest key.
    ///
    /// The walk never moves up, so the new key must compare greater than
    /// every ancestor of the maximum node. This holds for append-like
    /// (non-decreasing) insertion sequences; for anything else the resulting
    /// tree can violate key order or hold a key twice. Falls back to
    /// [`Descent::Root`] on an empty map.
    Max,
}
