use core::fmt;

use crate::raw::{Handle, Node};

/// A copyable reference to a node of an [`AvlTreeMap`](super::AvlTreeMap).
///
/// A `NodeRef` does not borrow the map; it is resolved against the map it
/// came from with [`AvlTreeMap::node`](super::AvlTreeMap::node). It stays
/// valid until the node it names is deleted. Deleting a node with two
/// children removes that node's in-order successor from the structure, so
/// references to the successor are invalidated too.
///
/// [`NodeRef::SENTINEL`] stands for "no node": it is what an empty child slot
/// or the root's parent would be, and it is never returned by a lookup.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeRef(Option<Handle>);

impl NodeRef {
    /// The absent node.
    pub const SENTINEL: NodeRef = NodeRef(None);

    pub(crate) const fn new(handle: Handle) -> Self {
        Self(Some(handle))
    }

    pub(crate) const fn handle(self) -> Option<Handle> {
        self.0
    }

    /// Returns `false` for [`NodeRef::SENTINEL`] and `true` for a reference
    /// to a stored node.
    #[must_use]
    pub const fn is_real(self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(handle) => f.debug_tuple("NodeRef").field(&handle.to_index()).finish(),
            None => f.write_str("NodeRef::SENTINEL"),
        }
    }
}

/// A borrowed view of one stored node, produced by
/// [`AvlTreeMap::node`](super::AvlTreeMap::node).
pub struct NodeView<'a, K, V> {
    handle: Handle,
    node: &'a Node<K, V>,
}

impl<'a, K, V> NodeView<'a, K, V> {
    pub(crate) const fn new(handle: Handle, node: &'a Node<K, V>) -> Self {
        Self { handle, node }
    }

    /// The reference this view was resolved from.
    #[must_use]
    pub const fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.handle)
    }

    #[must_use]
    pub const fn key(&self) -> &'a K {
        &self.node.key
    }

    #[must_use]
    pub const fn value(&self) -> &'a V {
        &self.node.value
    }

    /// Always `true`: the sentinel has no view.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn is_real(&self) -> bool {
        true
    }

    /// Height of the subtree rooted here; a leaf has height 0.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.node.height
    }

    /// Left subtree height minus right subtree height.
    #[must_use]
    pub fn balance_factor(&self) -> i32 {
        i32::from(self.node.balance)
    }

    #[must_use]
    pub const fn left(&self) -> Option<NodeRef> {
        match self.node.left {
            Some(handle) => Some(NodeRef::new(handle)),
            None => None,
        }
    }

    #[must_use]
    pub const fn right(&self) -> Option<NodeRef> {
        match self.node.right {
            Some(handle) => Some(NodeRef::new(handle)),
            None => None,
        }
    }

    /// The parent node, or `None` at the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeRef> {
        match self.node.parent {
            Some(handle) => Some(NodeRef::new(handle)),
            None => None,
        }
    }
}

impl<K, V> Clone for NodeView<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeView<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeView<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeView")
            .field("key", self.key())
            .field("value", self.value())
            .field("height", &self.height())
            .field("balance_factor", &self.balance_factor())
            .finish()
    }
}
