use super::handle::Handle;

/// Height of the absent node. A fresh leaf sits one above it, at 0.
pub(crate) const SENTINEL_HEIGHT: i32 = -1;

/// A stored key/value pair plus its structural metadata.
///
/// `left` and `right` own their subtrees; `parent` is a back-reference used
/// for upward walks only. `None` in any link is the sentinel.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) parent: Option<Handle>,
    pub(crate) height: i32,
    // Balance factor as last counted in `RawAvlTree::zero_balanced`.
    pub(crate) balance: i8,
}

/// Which side of its parent a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf hanging under `parent`.
    pub(crate) const fn leaf(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            parent,
            height: 0,
            balance: 0,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the single child of a node with at most one child, preferring
    /// the left one.
    #[inline]
    pub(crate) const fn only_child(&self) -> Option<Handle> {
        match self.left {
            Some(left) => Some(left),
            None => self.right,
        }
    }

    #[inline]
    pub(crate) const fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn leaf_starts_balanced_at_height_zero() {
        let parent = Some(Handle::from_index(3));
        let leaf = Node::leaf(7, "seven", parent);

        assert_eq!(leaf.height, 0);
        assert_eq!(leaf.height - 1, SENTINEL_HEIGHT);
        assert_eq!(leaf.balance, 0);
        assert_eq!(leaf.parent, parent);
        assert!(leaf.only_child().is_none());
        assert!(!leaf.has_two_children());
    }

    #[test]
    fn children_by_side() {
        let mut node = Node::leaf(1, (), None);
        let l = Handle::from_index(0);
        let r = Handle::from_index(1);

        node.set_child(Side::Right, Some(r));
        assert_eq!(node.only_child(), Some(r));

        node.set_child(Side::Left, Some(l));
        assert_eq!(node.child(Side::Left), Some(l));
        assert_eq!(node.child(Side::Right), Some(r));
        assert_eq!(node.only_child(), Some(l));
        assert!(node.has_two_children());
    }
}
