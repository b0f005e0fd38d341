use super::AvlTreeMap;
use crate::InvariantError;

impl<K, V> AvlTreeMap<K, V> {
    /// Returns the fraction of nodes whose two subtrees have equal height,
    /// or `0.0` for an empty map.
    ///
    /// The count behind the ratio is maintained incrementally by every insert,
    /// delete and rotation, so this never walks the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.balance_zero_ratio(), 0.0);
    ///
    /// map.insert(2, ());
    /// assert_eq!(map.balance_zero_ratio(), 1.0);
    ///
    /// map.insert(1, ());
    /// assert_eq!(map.balance_zero_ratio(), 0.5);
    ///
    /// map.insert(3, ());
    /// assert_eq!(map.balance_zero_ratio(), 1.0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn balance_zero_ratio(&self) -> f64 {
        if self.raw.is_empty() {
            return 0.0;
        }
        self.raw.zero_balanced() as f64 / self.raw.len() as f64
    }

    /// Number of nodes whose balance factor is zero.
    #[must_use]
    pub const fn zero_balanced_len(&self) -> usize {
        self.raw.zero_balanced()
    }

    /// Height of the tree: -1 when empty, 0 for a single node.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.raw.height(self.raw.root())
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Walks the whole tree and checks everything it caches against what the
    /// structure actually holds.
    ///
    /// # Errors
    ///
    /// Returns the first fault found, in key order. A map that has only been
    /// changed through its own methods always returns `Ok(())`.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.raw.check_invariants()
    }
}
