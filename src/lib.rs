//! # lambars-rrb
//!
//! A persistent Relaxed Radix Balanced tree (RRB-Tree) for Rust.
//!
//! ## Overview
//!
//! The RRB-Tree is an indexed sequence that keeps the fast bit-indexed trie of
//! a classic persistent vector for the common case, and relaxes it only where
//! inserts, splits and joins break the perfect packing. It provides:
//!
//! - O(log N) `get`, `replace`, `insert`, `split` and `join`
//! - amortized O(1) `append` and repeated inserts at the same position,
//!   through a small write-combining buffer called the focus
//! - an immutable variant ([`RrbTree`](persistent::RrbTree)) that shares
//!   structure between versions, and a single-writer mutable variant
//!   ([`MutableRrbTree`](persistent::MutableRrbTree)) for batch building
//!
//! ## Feature Flags
//!
//! - `arc`: Use `Arc` instead of `Rc` so immutable trees can cross threads
//! - `serde`: Serialize trees as plain sequences
//! - `full`: Enable all optional features
//!
//! ## Example
//!
//! ```rust
//! use lambars_rrb::prelude::*;
//!
//! let tree: RrbTree<i32> = (0..100).collect();
//! let (left, right) = tree.split(40).unwrap();
//! assert_eq!(left.len(), 40);
//! assert_eq!(right.get(0), Some(&40));
//! assert_eq!(left.join(&right), tree);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use lambars_rrb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
