//! An AVL-tree ordered map for Rust that exposes its own structure.
//!
//! [`AvlTreeMap`] keeps keys sorted in a height-balanced binary search tree
//! and, on top of the usual map API, offers:
//!
//! - [`search`](AvlTreeMap::search) returning a copyable [`NodeRef`] that can
//!   be stepped with [`predecessor`](AvlTreeMap::predecessor) and
//!   [`successor`](AvlTreeMap::successor) or handed to
//!   [`delete`](AvlTreeMap::delete)
//! - rebalancing step counts returned by every insert and delete
//! - a sorted [`snapshot`](AvlTreeMap::snapshot) memoized until the next
//!   mutation
//! - [`balance_zero_ratio`](AvlTreeMap::balance_zero_ratio), the fraction of
//!   perfectly balanced nodes, in O(1)
//! - an append fast path, [`Descent::Max`], for non-decreasing key sequences
//!
//! # Example
//!
//! ```
//! use avl_stat_tree::AvlTreeMap;
//!
//! let mut scores = AvlTreeMap::new();
//! scores.insert("Carol", 92);
//! scores.insert("Bob", 85);
//!
//! // Descending inserts trigger a single right rotation.
//! assert_eq!(scores.insert("Alice", 100), 1);
//!
//! let bob = scores.search("Bob").unwrap();
//! let alice = scores.predecessor(bob).unwrap();
//! assert_eq!(scores.node(alice).unwrap().value(), &100);
//!
//! assert_eq!(scores.balance_zero_ratio(), 1.0);
//! assert_eq!(scores.snapshot(), &[("Alice", 100), ("Bob", 85), ("Carol", 92)]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **No unsafe code** - Nodes live in an index arena linked by non-zero handles
//! - **Observable** - Mutations emit [`tracing`] events at `debug` and `trace` level
//! - **Self-checking** - [`check_invariants`](AvlTreeMap::check_invariants) audits
//!   every cached height, balance factor and counter
//!
//! # Implementation
//!
//! Every node caches its height and balance factor. Those caches are refreshed
//! in exactly one place, which is also where the running count of
//! zero-balance nodes is adjusted, so the count stays exact through rotations.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod descent;
mod error;
mod raw;

pub mod avl_tree_map;

pub use avl_tree_map::{AvlTreeMap, NodeRef, NodeView};
pub use descent::Descent;
pub use error::InvariantError;
