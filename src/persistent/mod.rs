//! Persistent (immutable) sequence based on a Relaxed Radix Balanced tree.
//!
//! - [`RrbTree`]: Immutable RRB-Tree; every operation returns a new version
//! - [`MutableRrbTree`]: Single-writer variant updated in place
//!
//! # Structural Sharing
//!
//! Both variants are built from the same immutable nodes. An operation
//! allocates new nodes only along the path from the root to the change, and
//! shares every untouched subtree with the previous version. The mutable
//! variant never edits a node in place either; it only swaps its own root and
//! focus.
//!
//! # Examples
//!
//! ```rust
//! use lambars_rrb::persistent::RrbTree;
//!
//! let tree: RrbTree<i32> = (0..100).collect();
//! let inserted = tree.insert(50, -1).unwrap();
//! assert_eq!(tree.get(50), Some(&50));      // Original unchanged
//! assert_eq!(inserted.get(50), Some(&-1));  // New version
//! assert_eq!(inserted.len(), 101);
//! ```
//!
//! ```rust
//! use lambars_rrb::persistent::MutableRrbTree;
//!
//! let mut builder = MutableRrbTree::new();
//! builder.append(1).append(2).append(3);
//! let tree = builder.immutable();
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod rrb_tree;

pub use rrb_tree::InvariantViolation;
pub use rrb_tree::MutableRrbTree;
pub use rrb_tree::RrbError;
pub use rrb_tree::RrbTree;
pub use rrb_tree::RrbTreeIntoIterator;
pub use rrb_tree::RrbTreeIterator;

// =============================================================================
// Tests
// =============================================================================
