use thiserror::Error;

/// A structural fault reported by [`AvlTreeMap::check_invariants`].
///
/// Nodes are identified by their zero-based position in key order, since
/// keys are not required to implement `Debug`.
///
/// [`AvlTreeMap::check_invariants`]: crate::AvlTreeMap::check_invariants
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum InvariantError {
    /// A key is not greater than the key before it.
    #[error("key at position {position} is not greater than its predecessor")]
    OutOfOrder { position: usize },

    /// A node's subtrees differ in height by more than one.
    #[error("node at position {position} has balance factor {balance}")]
    Unbalanced { position: usize, balance: i32 },

    /// A node's cached height disagrees with its children.
    #[error("node at position {position} caches height {cached}, children imply {actual}")]
    StaleHeight { position: usize, cached: i32, actual: i32 },

    /// A node's cached balance factor disagrees with its children.
    #[error("node at position {position} caches balance factor {cached}, children imply {actual}")]
    StaleBalance { position: usize, cached: i32, actual: i32 },

    /// A child does not point back at the node that owns it, or the root has a parent.
    #[error("parent link of node at position {position} does not match its owner")]
    BrokenParent { position: usize },

    /// The cached length disagrees with the number of reachable nodes.
    #[error("map records {recorded} entries but {actual} are reachable")]
    LenMismatch { recorded: usize, actual: usize },

    /// The node arena holds slots that no link reaches.
    #[error("{live} nodes are allocated but only {reachable} are reachable from the root")]
    Unreachable { live: usize, reachable: usize },

    /// The cached maximum is not the last node in key order.
    #[error("cached maximum does not hold the greatest key")]
    StaleMax,

    /// The running zero-balance count disagrees with a recount.
    #[error("zero-balance count is {recorded} but {actual} nodes have balance factor 0")]
    ZeroBalanceMismatch { recorded: usize, actual: usize },
}
