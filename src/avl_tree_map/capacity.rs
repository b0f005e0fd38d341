use core::cell::OnceCell;

use super::AvlTreeMap;
use crate::raw::RawAvlTree;

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` nodes before
    /// the node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, i32> = AvlTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTreeMap {
            raw: RawAvlTree::with_capacity(capacity),
            snapshot: OnceCell::new(),
        }
    }

    /// Returns the number of nodes the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn deleted_slots_are_reused() {
        let mut map = AvlTreeMap::with_capacity(4);
        for key in 0..4 {
            map.insert(key, ());
        }
        let capacity = map.capacity();
        for _ in 0..50 {
            map.remove(&0);
            map.insert(0, ());
        }
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.len(), 4);
    }
}
