use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;
use tracing::debug;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, SENTINEL_HEIGHT, Side};
use crate::Descent;

/// Explicit stack for in-order walks. An AVL tree of `Handle::MAX` nodes is
/// under 46 levels deep, so 64 inline slots never spill.
pub(crate) type Stack = SmallVec<[Handle; 64]>;

/// The AVL tree backing `AvlTreeMap`.
#[derive(Clone)]
pub(crate) struct RawAvlTree<K, V> {
    /// Arena storing all tree nodes.
    pub(super) nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    pub(super) root: Option<Handle>,
    /// Handle to the node holding the greatest key.
    pub(super) max: Option<Handle>,
    /// Number of key-value pairs in the tree.
    pub(super) len: usize,
    /// Number of nodes whose balance factor is exactly zero.
    pub(super) zero_balanced: usize,
}

/// The pair taken out of the tree by [`RawAvlTree::delete`].
pub(crate) struct Removal<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) rotations: usize,
}

impl<K, V> RawAvlTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            max: None,
            len: 0,
            zero_balanced: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            max: None,
            len: 0,
            zero_balanced: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn zero_balanced(&self) -> usize {
        self.zero_balanced
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Handle of the node holding the greatest key. O(1).
    pub(crate) const fn max(&self) -> Option<Handle> {
        self.max
    }

    /// Handle of the node holding the smallest key. O(log n).
    pub(crate) fn min(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.max = None;
        self.len = 0;
        self.zero_balanced = 0;
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn try_node(&self, handle: Handle) -> Option<&Node<K, V>> {
        self.nodes.resolve(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Height of a subtree; the sentinel sits at -1.
    #[inline]
    pub(crate) fn height(&self, link: Option<Handle>) -> i32 {
        link.map_or(SENTINEL_HEIGHT, |h| self.nodes.get(h).height)
    }

    /// Live balance factor, computed from the children's cached heights.
    #[inline]
    pub(crate) fn balance_factor(&self, handle: Handle) -> i32 {
        let node = self.nodes.get(handle);
        self.height(node.left) - self.height(node.right)
    }

    pub(crate) fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes.get(handle).left {
            handle = left;
        }
        handle
    }

    pub(crate) fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.nodes.get(handle).right {
            handle = right;
        }
        handle
    }

    /// Largest node ordered before `handle`.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.nodes.get(handle).left {
            return Some(self.rightmost(left));
        }
        self.first_ancestor_from(handle, Side::Right)
    }

    /// Smallest node ordered after `handle`.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.nodes.get(handle).right {
            return Some(self.leftmost(right));
        }
        self.first_ancestor_from(handle, Side::Left)
    }

    /// Walks up from `handle` and returns the first ancestor reached from its
    /// `side` child.
    fn first_ancestor_from(&self, mut handle: Handle, side: Side) -> Option<Handle> {
        let mut parent = self.nodes.get(handle).parent;
        while let Some(p) = parent {
            if self.nodes.get(p).child(side) == Some(handle) {
                return Some(p);
            }
            handle = p;
            parent = self.nodes.get(p).parent;
        }
        None
    }

    /// Which side of `parent` holds `child`.
    pub(super) fn side_of(&self, parent: Handle, child: Handle) -> Side {
        if self.nodes.get(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points the link that held `old` at `new`: a child slot of `parent`, or
    /// the root when `parent` is the sentinel. Does not touch `new.parent`.
    pub(super) fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self.side_of(p, old);
                self.nodes.get_mut(p).set_child(side, new);
            }
        }
    }

    /// Walks the nodes in key order without touching parent links.
    pub(crate) fn in_order(&self) -> InOrder<'_, K, V> {
        InOrder {
            tree: self,
            stack: Stack::new(),
            current: self.root,
        }
    }
}

/// In-order traversal driven by an explicit stack.
pub(crate) struct InOrder<'a, K, V> {
    tree: &'a RawAvlTree<K, V>,
    stack: Stack,
    current: Option<Handle>,
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (Handle, &'a Node<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.current {
            self.stack.push(handle);
            self.current = self.tree.nodes.get(handle).left;
        }
        let handle = self.stack.pop()?;
        let node = self.tree.nodes.get(handle);
        self.current = node.right;
        Some((handle, node))
    }
}

impl<K: Ord, V> RawAvlTree<K, V> {
    /// Finds the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Inserts `key`, or overwrites the value if it is already present.
    ///
    /// Returns the number of rebalancing steps the insertion caused.
    pub(crate) fn insert(&mut self, key: K, value: V, descent: Descent) -> usize {
        let Some(root) = self.root else {
            let handle = self.nodes.alloc(Node::leaf(key, value, None));
            self.root = Some(handle);
            self.max = Some(handle);
            self.len = 1;
            self.zero_balanced = 1;
            return 0;
        };

        let mut parent = match descent {
            Descent::Max => self.max.unwrap_or(root),
            Descent::Root => root,
        };
        let side = loop {
            let node = self.nodes.get_mut(parent);
            let side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    node.value = value;
                    return 0;
                }
            };
            match node.child(side) {
                Some(child) => parent = child,
                None => break side,
            }
        };

        let is_new_max = self.max.is_none_or(|max| key > self.nodes.get(max).key);
        let handle = self.nodes.alloc(Node::leaf(key, value, Some(parent)));
        self.nodes.get_mut(parent).set_child(side, Some(handle));
        self.len += 1;
        self.zero_balanced += 1;
        if is_new_max {
            self.max = Some(handle);
        }

        let rotations = self.rebalance(Some(parent));
        debug!(rotations, len = self.len, "inserted avl node");
        rotations
    }
}

impl<K, V> RawAvlTree<K, V> {
    /// Unlinks the pair stored at `target`.
    ///
    /// A node with two children keeps its slot and takes over its in-order
    /// successor's pair; the successor's slot is the one freed.
    pub(crate) fn delete(&mut self, target: Handle) -> Removal<K, V> {
        let removed = {
            let node = self.nodes.get(target);
            match node.right {
                Some(right) if node.has_two_children() => self.leftmost(right),
                _ => target,
            }
        };

        let (child, parent) = {
            let node = self.nodes.get(removed);
            (node.only_child(), node.parent)
        };
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
        self.replace_child(parent, removed, child);

        let Node { key, value, balance, .. } = self.nodes.release(removed);
        if balance == 0 {
            self.zero_balanced -= 1;
        }
        self.len -= 1;

        let (key, value) = if removed == target {
            (key, value)
        } else {
            let node = self.nodes.get_mut(target);
            (core::mem::replace(&mut node.key, key), core::mem::replace(&mut node.value, value))
        };

        // The successor can be the maximum; its pair now lives at `target`.
        if self.max == Some(target) || self.max == Some(removed) {
            self.max = self.root.map(|root| self.rightmost(root));
        }

        let rotations = self.rebalance(parent);
        debug!(rotations, len = self.len, "deleted avl node");
        Removal { key, value, rotations }
    }
}
