//! Full-scan audit of everything the tree caches.

use super::handle::Handle;
use super::raw_avl_tree::RawAvlTree;
use crate::InvariantError;

impl<K, V> RawAvlTree<K, V> {
    /// Counts nodes whose live balance factor is zero. O(n).
    pub(crate) fn recount_zero_balanced(&self) -> usize {
        self.in_order().filter(|&(handle, _)| self.balance_factor(handle) == 0).count()
    }

    fn parent_link_holds(&self, owner: Option<Handle>, child: Option<Handle>) -> bool {
        child.is_none_or(|child| self.nodes.get(child).parent == owner)
    }
}

impl<K: Ord, V> RawAvlTree<K, V> {
    /// Verifies key order, AVL balance, cached heights and balance factors,
    /// parent links, the length, that no live slot is orphaned, the cached
    /// maximum and the zero-balance count.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        if !self.parent_link_holds(None, self.root) {
            return Err(InvariantError::BrokenParent { position: 0 });
        }

        let mut previous: Option<&K> = None;
        let mut last = None;
        let mut count = 0;
        let mut zero_balanced = 0;

        for (position, (handle, node)) in self.in_order().enumerate() {
            if previous.is_some_and(|previous| *previous >= node.key) {
                return Err(InvariantError::OutOfOrder { position });
            }

            let (left, right) = (self.height(node.left), self.height(node.right));
            let actual = 1 + left.max(right);
            if node.height != actual {
                return Err(InvariantError::StaleHeight {
                    position,
                    cached: node.height,
                    actual,
                });
            }

            let balance = left - right;
            if i32::from(node.balance) != balance {
                return Err(InvariantError::StaleBalance {
                    position,
                    cached: i32::from(node.balance),
                    actual: balance,
                });
            }
            if balance.abs() > 1 {
                return Err(InvariantError::Unbalanced { position, balance });
            }

            if !self.parent_link_holds(Some(handle), node.left) || !self.parent_link_holds(Some(handle), node.right) {
                return Err(InvariantError::BrokenParent { position });
            }

            if balance == 0 {
                zero_balanced += 1;
            }
            previous = Some(&node.key);
            last = Some(handle);
            count += 1;
        }

        if count != self.len {
            return Err(InvariantError::LenMismatch {
                recorded: self.len,
                actual: count,
            });
        }
        if self.nodes.live() != count {
            return Err(InvariantError::Unreachable {
                live: self.nodes.live(),
                reachable: count,
            });
        }
        if last != self.max {
            return Err(InvariantError::StaleMax);
        }
        if zero_balanced != self.zero_balanced {
            return Err(InvariantError::ZeroBalanceMismatch {
                recorded: self.zero_balanced,
                actual: zero_balanced,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Descent;
    use crate::raw::Node;

    fn sample() -> RawAvlTree<i32, ()> {
        let mut tree = RawAvlTree::new();
        for key in [40, 20, 60, 10, 30, 50, 70, 5] {
            tree.insert(key, (), Descent::Root);
        }
        assert_eq!(tree.check_invariants(), Ok(()));
        tree
    }

    #[test]
    fn detects_stale_zero_balance_count() {
        let mut tree = sample();
        tree.zero_balanced += 1;
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantError::ZeroBalanceMismatch {
                recorded: tree.zero_balanced,
                actual: tree.zero_balanced - 1,
            })
        );
    }

    #[test]
    fn detects_stale_height() {
        let mut tree = sample();
        let five = tree.search(&5).unwrap();
        tree.node_mut(five).height = 3;
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantError::StaleHeight {
                position: 0,
                cached: 3,
                actual: 0,
            })
        );
    }

    #[test]
    fn detects_keys_out_of_order() {
        let mut tree = sample();
        let thirty = tree.search(&30).unwrap();
        tree.node_mut(thirty).key = 45;
        assert_eq!(tree.check_invariants(), Err(InvariantError::OutOfOrder { position: 4 }));
    }

    #[test]
    fn detects_broken_parent_link() {
        let mut tree = sample();
        let ten = tree.search(&10).unwrap();
        tree.node_mut(ten).parent = None;
        assert_eq!(tree.check_invariants(), Err(InvariantError::BrokenParent { position: 2 }));
    }

    #[test]
    fn detects_stale_max_and_len() {
        let mut tree = sample();
        tree.max = tree.search(&60);
        assert_eq!(tree.check_invariants(), Err(InvariantError::StaleMax));

        let mut tree = sample();
        tree.len = 3;
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantError::LenMismatch { recorded: 3, actual: 8 })
        );
    }

    #[test]
    fn detects_orphaned_slot() {
        let mut tree = sample();
        tree.nodes.alloc(Node::leaf(99, (), None));
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantError::Unreachable { live: 9, reachable: 8 })
        );
    }

    #[test]
    fn recount_matches_running_count() {
        let tree = sample();
        assert_eq!(tree.recount_zero_balanced(), tree.zero_balanced());
    }
}
