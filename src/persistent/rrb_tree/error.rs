//! Error types for RRB-Tree operations.

use thiserror::Error;

/// A contract violation by the caller of an RRB-Tree operation.
///
/// Errors are returned before any state is touched, so a failed call on a
/// [`MutableRrbTree`](super::MutableRrbTree) leaves the tree unchanged.
///
/// # Examples
///
/// ```rust
/// use lambars_rrb::persistent::{RrbError, RrbTree};
///
/// let tree: RrbTree<i32> = (0..3).collect();
/// assert_eq!(
///     tree.insert(4, 0),
///     Err(RrbError::IndexOutOfBounds { index: 4, length: 3 })
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RrbError {
    /// The index does not address an element (or, for `insert`, a gap).
    #[error("index {index} is out of bounds for a tree of length {length}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The length of the tree at the time of the call.
        length: usize,
    },
    /// A split index outside `1..=length`.
    #[error("split index {index} must be within 1..={length}")]
    InvalidSplitIndex {
        /// The offending index.
        index: usize,
        /// The length of the tree at the time of the call.
        length: usize,
    },
}

/// A broken structural invariant, found by `check_invariants`.
///
/// This never happens in correct code. The `dump` field holds the
/// pretty-printed subtree in which the violation was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("RRB-Tree invariant violated: {message}\n{dump}")]
pub struct InvariantViolation {
    /// What was violated.
    pub message: String,
    /// Indented dump of the offending subtree.
    pub dump: String,
}

impl InvariantViolation {
    pub(crate) const fn new(message: String, dump: String) -> Self {
        Self { message, dump }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        RrbError::IndexOutOfBounds { index: 7, length: 3 },
        "index 7 is out of bounds for a tree of length 3"
    )]
    #[case(
        RrbError::InvalidSplitIndex { index: 0, length: 3 },
        "split index 0 must be within 1..=3"
    )]
    fn test_rrb_error_display(#[case] error: RrbError, #[case] expected: &str) {
        assert_eq!(format!("{error}"), expected);
    }

    #[rstest]
    fn test_invariant_violation_display_includes_dump() {
        let violation = InvariantViolation {
            message: "leaf too short".to_string(),
            dump: "Leaf(1)[0]".to_string(),
        };
        assert_eq!(
            format!("{violation}"),
            "RRB-Tree invariant violated: leaf too short\nLeaf(1)[0]"
        );
    }
}
