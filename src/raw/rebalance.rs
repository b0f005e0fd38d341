//! Rotations and the upward rebalancing walk.
//!
//! Every height recomputation goes through [`RawAvlTree::refresh`], which is
//! also the only place the zero-balance count changes for a surviving node.
//! That keeps the count exact across rotations without a separate fix-up.

use tracing::trace;

use super::handle::Handle;
use super::raw_avl_tree::RawAvlTree;

impl<K, V> RawAvlTree<K, V> {
    /// Recomputes the height and balance factor of `handle` from its
    /// children and moves it in or out of the zero-balance count.
    ///
    /// Returns the new balance factor.
    pub(super) fn refresh(&mut self, handle: Handle) -> i32 {
        let (left, right) = {
            let node = self.nodes.get(handle);
            (self.height(node.left), self.height(node.right))
        };
        let balance = left - right;

        let node = self.nodes.get_mut(handle);
        let was_zero = node.balance == 0;
        node.height = 1 + left.max(right);
        #[allow(clippy::cast_possible_truncation)]
        {
            node.balance = balance as i8;
        }

        match (was_zero, balance == 0) {
            (true, false) => self.zero_balanced -= 1,
            (false, true) => self.zero_balanced += 1,
            _ => {}
        }
        balance
    }

    /// Promotes the right child of `z` and returns it.
    pub(super) fn rotate_left(&mut self, z: Handle) -> Handle {
        let (y, parent) = {
            let node = self.nodes.get(z);
            let y = node.right.expect("`RawAvlTree::rotate_left()` - `z` has no right child!");
            (y, node.parent)
        };
        let inner = self.nodes.get(y).left;

        self.nodes.get_mut(z).right = inner;
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(z);
        }
        self.nodes.get_mut(y).parent = parent;
        self.replace_child(parent, z, Some(y));
        self.nodes.get_mut(y).left = Some(z);
        self.nodes.get_mut(z).parent = Some(y);

        self.refresh(z);
        self.refresh(y);
        trace!(pivot = ?z, promoted = ?y, "rotated left");
        y
    }

    /// Promotes the left child of `z` and returns it.
    pub(super) fn rotate_right(&mut self, z: Handle) -> Handle {
        let (y, parent) = {
            let node = self.nodes.get(z);
            let y = node.left.expect("`RawAvlTree::rotate_right()` - `z` has no left child!");
            (y, node.parent)
        };
        let inner = self.nodes.get(y).right;

        self.nodes.get_mut(z).left = inner;
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(z);
        }
        self.nodes.get_mut(y).parent = parent;
        self.replace_child(parent, z, Some(y));
        self.nodes.get_mut(y).right = Some(z);
        self.nodes.get_mut(z).parent = Some(y);

        self.refresh(z);
        self.refresh(y);
        trace!(pivot = ?z, promoted = ?y, "rotated right");
        y
    }

    /// Rotates the left child of `z` left, then `z` right.
    pub(super) fn rotate_left_right(&mut self, z: Handle) -> Handle {
        let left = self.nodes.get(z).left.expect("`RawAvlTree::rotate_left_right()` - `z` has no left child!");
        self.rotate_left(left);
        self.rotate_right(z)
    }

    /// Rotates the right child of `z` right, then `z` left.
    pub(super) fn rotate_right_left(&mut self, z: Handle) -> Handle {
        let right = self.nodes.get(z).right.expect("`RawAvlTree::rotate_right_left()` - `z` has no right child!");
        self.rotate_right(right);
        self.rotate_left(z)
    }

    /// Walks from `start` towards the root restoring heights and balance.
    ///
    /// Returns the number of rebalancing steps: 1 per height change that
    /// needed no rotation, 1 per single rotation and 2 per double rotation.
    /// A rotation that promotes the child whose height change was counted on
    /// the step below absorbs that count, since that growth is exactly what
    /// the rotation repairs.
    pub(crate) fn rebalance(&mut self, start: Option<Handle>) -> usize {
        let mut steps = 0;
        // Node whose height-only change was counted on the previous step.
        let mut grown: Option<Handle> = None;
        let mut current = start;

        while let Some(node) = current {
            let old_height = self.nodes.get(node).height;
            let balance = self.refresh(node);

            let top = if balance > 1 {
                let left = self.nodes.get(node).left.expect("left-heavy node has a left child");
                let (top, cost) = if self.balance_factor(left) < 0 {
                    (self.rotate_left_right(node), 2)
                } else {
                    (self.rotate_right(node), 1)
                };
                if grown == Some(left) {
                    steps -= 1;
                }
                steps += cost;
                grown = None;
                top
            } else if balance < -1 {
                let right = self.nodes.get(node).right.expect("right-heavy node has a right child");
                let (top, cost) = if self.balance_factor(right) > 0 {
                    (self.rotate_right_left(node), 2)
                } else {
                    (self.rotate_left(node), 1)
                };
                if grown == Some(right) {
                    steps -= 1;
                }
                steps += cost;
                grown = None;
                top
            } else if self.nodes.get(node).height != old_height {
                steps += 1;
                grown = Some(node);
                node
            } else {
                break;
            };

            current = self.nodes.get(top).parent;
        }
        steps
    }
}
