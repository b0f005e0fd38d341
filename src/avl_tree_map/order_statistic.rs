use super::{AvlTreeMap, NodeRef};

impl<K, V> AvlTreeMap<K, V> {
    /// Returns the node holding the largest key smaller than `node`'s key.
    ///
    /// Returns `None` for the minimum and for [`NodeRef::SENTINEL`].
    ///
    /// # Complexity
    ///
    /// O(1) when the neighbor is a direct child, O(log n) worst case.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(15, ()), (10, ()), (20, ()), (5, ()), (12, ())]);
    /// let twelve = map.search(&12).unwrap();
    ///
    /// let before = map.predecessor(twelve).unwrap();
    /// assert_eq!(map.node(before).unwrap().key(), &10);
    /// assert!(map.predecessor(map.search(&5).unwrap()).is_none());
    /// ```
    #[must_use]
    pub fn predecessor(&self, node: NodeRef) -> Option<NodeRef> {
        self.raw.predecessor(node.handle()?).map(NodeRef::new)
    }

    /// Returns the node holding the smallest key greater than `node`'s key.
    ///
    /// Returns `None` for the maximum and for [`NodeRef::SENTINEL`].
    ///
    /// # Complexity
    ///
    /// O(1) when the neighbor is a direct child, O(log n) worst case.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(15, ()), (10, ()), (20, ()), (5, ()), (12, ())]);
    /// let twelve = map.search(&12).unwrap();
    ///
    /// let after = map.successor(twelve).unwrap();
    /// assert_eq!(map.node(after).unwrap().key(), &15);
    /// assert!(map.successor(map.search(&20).unwrap()).is_none());
    /// ```
    #[must_use]
    pub fn successor(&self, node: NodeRef) -> Option<NodeRef> {
        self.raw.successor(node.handle()?).map(NodeRef::new)
    }

    /// Returns the node holding the smallest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<NodeRef> {
        self.raw.min().map(NodeRef::new)
    }

    /// Returns the node holding the greatest key.
    ///
    /// # Complexity
    ///
    /// O(1) - the maximum is cached across mutations.
    #[must_use]
    pub fn last(&self) -> Option<NodeRef> {
        self.raw.max().map(NodeRef::new)
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.min()?);
        Some((&node.key, &node.value))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.max()?);
        Some((&node.key, &node.value))
    }
}
