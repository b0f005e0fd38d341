use core::borrow::Borrow;
use core::cell::OnceCell;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;

use alloc::vec::Vec;

use crate::Descent;
use crate::raw::{Handle, RawAvlTree};

mod balance;
mod capacity;
mod node_ref;
mod order_statistic;
mod snapshot;

pub use node_ref::{NodeRef, NodeView};

/// An ordered map based on an [AVL tree].
///
/// Keys must implement [`Ord`]. Besides the usual map operations the tree
/// exposes its own structure: [`search`](AvlTreeMap::search) hands out a
/// [`NodeRef`] that can be stepped with [`predecessor`](AvlTreeMap::predecessor)
/// and [`successor`](AvlTreeMap::successor) or passed to
/// [`delete`](AvlTreeMap::delete); mutations report how many rebalancing
/// steps they caused; [`snapshot`](AvlTreeMap::snapshot) memoizes the sorted
/// contents between mutations; and
/// [`balance_zero_ratio`](AvlTreeMap::balance_zero_ratio) reports, in O(1),
/// the fraction of nodes whose subtrees have equal height.
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key changes while it is in the map.
///
/// # Examples
///
/// ```
/// use avl_stat_tree::AvlTreeMap;
///
/// let mut map = AvlTreeMap::new();
/// map.insert(30, "thirty");
/// map.insert(20, "twenty");
///
/// // The third ascending-order insert forces one right rotation.
/// assert_eq!(map.insert(10, "ten"), 1);
///
/// let twenty = map.search(&20).unwrap();
/// assert_eq!(map.root(), Some(twenty));
///
/// let ten = map.predecessor(twenty).unwrap();
/// assert_eq!(map.node(ten).unwrap().value(), &"ten");
///
/// assert_eq!(map.delete(ten), 0);
/// assert_eq!(map.snapshot(), &[(20, "twenty"), (30, "thirty")]);
/// ```
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
pub struct AvlTreeMap<K, V> {
    raw: RawAvlTree<K, V>,
    snapshot: OnceCell<Vec<(K, V)>>,
}

/// An iterator over the entries of an `AvlTreeMap`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`AvlTreeMap`].
///
/// # Examples
///
/// ```
/// use avl_stat_tree::AvlTreeMap;
///
/// let map = AvlTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    raw: &'a RawAvlTree<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An iterator over the keys of an `AvlTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`AvlTreeMap`].
///
/// [`keys`]: AvlTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `AvlTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`AvlTreeMap`].
///
/// [`values`]: AvlTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Makes a new, empty `AvlTreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, &str> = AvlTreeMap::new();
    /// assert_eq!(map.len(), 0);
    /// assert!(map.root().is_none());
    /// ```
    #[must_use]
    pub const fn new() -> AvlTreeMap<K, V> {
        AvlTreeMap {
            raw: RawAvlTree::new(),
            snapshot: OnceCell::new(),
        }
    }

    /// Clears the map, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.invalidate_snapshot();
        self.raw.clear();
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut a = AvlTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Same as [`len`](Self::len).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the root node, or `None` if the map is empty.
    #[must_use]
    pub const fn root(&self) -> Option<NodeRef> {
        match self.raw.root() {
            Some(handle) => Some(NodeRef::new(handle)),
            None => None,
        }
    }

    /// Returns a view of the node behind `node`, or `None` for
    /// [`NodeRef::SENTINEL`] and for references whose node has been deleted.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::{AvlTreeMap, NodeRef};
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(10, "ten");
    ///
    /// let node = map.node(map.search(&10).unwrap()).unwrap();
    /// assert_eq!((node.key(), node.value()), (&10, &"ten"));
    /// assert!(node.is_real());
    /// assert_eq!(node.height(), 0);
    ///
    /// assert!(map.node(NodeRef::SENTINEL).is_none());
    /// ```
    #[must_use]
    pub fn node(&self, node: NodeRef) -> Option<NodeView<'_, K, V>> {
        let handle = node.handle()?;
        self.raw.try_node(handle).map(|n| NodeView::new(handle, n))
    }

    /// Returns a mutable reference to the value stored at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` refers to a node that has been deleted.
    pub fn value_mut(&mut self, node: NodeRef) -> Option<&mut V> {
        let handle = node.handle()?;
        self.invalidate_snapshot();
        Some(&mut self.raw.node_mut(handle).value)
    }

    /// Deletes the node behind `node` and returns the number of rebalancing
    /// steps the deletion caused.
    ///
    /// `None` and [`NodeRef::SENTINEL`] are accepted and ignored, so the
    /// result of [`search`](Self::search) can be passed straight in. A node
    /// with two children keeps its place and takes over its in-order
    /// successor's entry; references to that successor are invalidated.
    ///
    /// # Panics
    ///
    /// Panics if `node` refers to a node that has already been deleted.
    /// Passing a reference obtained from a different map is a logic error.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(10, "a"), (5, "b"), (15, "c")]);
    /// map.delete(map.search(&10));
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.delete(map.search(&10)), 0);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn delete(&mut self, node: impl Into<Option<NodeRef>>) -> usize {
        let Some(handle) = node.into().and_then(NodeRef::handle) else {
            return 0;
        };
        self.invalidate_snapshot();
        self.raw.delete(handle).rotations
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(3, "c"), (2, "b"), (1, "a")]);
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            raw: &self.raw,
            front: self.raw.min(),
            back: self.raw.max(),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Finds the node holding `key`.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(String::from("b"), 2);
    ///
    /// let node = map.search("b").unwrap();
    /// assert_eq!(map.node(node).unwrap().value(), &2);
    /// assert!(map.search("z").is_none());
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).map(NodeRef::new)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.raw.node(self.raw.search(key)?);
        Some((&node.key, &node.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key)?;
        self.invalidate_snapshot();
        Some(&mut self.raw.node_mut(handle).value)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Inserts a key-value pair, overwriting the value if the key is already
    /// present, and returns the number of rebalancing steps performed.
    ///
    /// Each height change that needs no rotation counts one step, a single
    /// rotation counts one and a double rotation two. A rotation absorbs the
    /// step counted for the child whose growth triggered it. Overwriting an
    /// existing key never rebalances and returns 0.
    ///
    /// On a two-node tree, a third insert that needs a single rotation (left-left
    /// or right-right) therefore returns 1, and one that needs a double
    /// rotation (left-right or right-left) returns 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.insert(30, ()), 0);
    /// assert_eq!(map.insert(10, ()), 1); // root grows
    /// assert_eq!(map.insert(20, ()), 2); // left-right double rotation
    /// assert_eq!(map.insert(20, ()), 0); // overwrite
    /// assert_eq!(map.len(), 3);
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(30, ());
    /// map.insert(20, ());
    /// assert_eq!(map.insert(10, ()), 1); // left-left single rotation
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> usize {
        self.insert_with_descent(key, value, Descent::Root)
    }

    /// Like [`insert`](Self::insert), but lets the caller pick where the
    /// downward walk starts. See [`Descent::Max`] for the precondition of the
    /// append fast path.
    pub fn insert_with_descent(&mut self, key: K, value: V, descent: Descent) -> usize {
        self.invalidate_snapshot();
        self.raw.insert(key, value, descent)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_stat_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key)?;
        self.invalidate_snapshot();
        let removal = self.raw.delete(handle);
        Some((removal.key, removal.value))
    }
}

impl<K: Clone, V: Clone> Clone for AvlTreeMap<K, V> {
    fn clone(&self) -> Self {
        AvlTreeMap {
            raw: self.raw.clone(),
            snapshot: self.snapshot.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &AvlTreeMap<K, V>) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for AvlTreeMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        AvlTreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> AvlTreeMap<K, V> {
        let mut map = AvlTreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, Q, V> Index<&Q> for AvlTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `AvlTreeMap`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        AvlTreeMap::from_iter(arr)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        let node = self.raw.node(handle);
        self.remaining -= 1;
        self.front = self.raw.successor(handle);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        let node = self.raw.node(handle);
        self.remaining -= 1;
        self.back = self.raw.predecessor(handle);
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}
