use alloc::vec::Vec;

use tracing::trace;

use super::AvlTreeMap;

impl<K, V> AvlTreeMap<K, V> {
    /// Drops the memoized snapshot. Every mutating operation calls this
    /// before touching the tree.
    pub(super) fn invalidate_snapshot(&mut self) {
        if self.snapshot.take().is_some() {
            trace!("snapshot invalidated");
        }
    }

    /// Returns `true` if a snapshot has been built since the last mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(1, 'a')]);
    /// assert!(!map.is_snapshot_cached());
    /// let _ = map.snapshot();
    /// assert!(map.is_snapshot_cached());
    /// map.insert(2, 'b');
    /// assert!(!map.is_snapshot_cached());
    /// ```
    #[must_use]
    pub fn is_snapshot_cached(&self) -> bool {
        self.snapshot.get().is_some()
    }
}

impl<K: Clone, V: Clone> AvlTreeMap<K, V> {
    /// Returns every entry in ascending key order.
    ///
    /// The first call after a mutation walks the tree and copies the entries
    /// out; later calls return the same slice until the next
    /// [`insert`](Self::insert), [`delete`](Self::delete),
    /// [`remove`](Self::remove), [`get_mut`](Self::get_mut),
    /// [`value_mut`](Self::value_mut) or [`clear`](Self::clear).
    ///
    /// # Complexity
    ///
    /// O(n) to build, O(1) when cached.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let first = map.snapshot().as_ptr();
    /// assert_eq!(map.snapshot(), &[(1, "a"), (2, "b"), (3, "c")]);
    /// assert_eq!(map.snapshot().as_ptr(), first);
    ///
    /// map.remove(&2);
    /// assert_eq!(map.snapshot(), &[(1, "a"), (3, "c")]);
    /// ```
    pub fn snapshot(&self) -> &[(K, V)] {
        self.snapshot.get_or_init(|| {
            trace!(len = self.raw.len(), "building snapshot");
            let mut entries = Vec::with_capacity(self.raw.len());
            entries.extend(self.raw.in_order().map(|(_, node)| (node.key.clone(), node.value.clone())));
            entries
        })
    }

    /// Same as [`snapshot`](Self::snapshot).
    pub fn avl_to_array(&self) -> &[(K, V)] {
        self.snapshot()
    }
}
