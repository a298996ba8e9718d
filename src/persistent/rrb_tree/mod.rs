//! Relaxed Radix Balanced tree.
//!
//! This module provides [`RrbTree`], an immutable indexed sequence with
//! logarithmic `split` and `join`, and its single-writer companion
//! [`MutableRrbTree`].
//!
//! # Structure
//!
//! The tree mixes two kinds of branches. Strict branches are packed exactly
//! like a 32-way trie and are indexed by bit shifting. Relaxed branches carry
//! a table of cumulative child sizes and are indexed by interpolation search.
//! A tree built by appending stays strict; inserts, splits and joins relax
//! only the branches they touch.
//!
//! Edits are batched in a focus of up to 32 pending elements at one
//! position. Runs of appends or of inserts at neighbouring positions fill
//! the focus, which is pushed into the tree as a whole once it is full or an
//! edit lands elsewhere.
//!
//! # Complexity
//!
//! | Operation          | Complexity         |
//! |--------------------|--------------------|
//! | `get`              | O(log N)           |
//! | `append`           | amortized O(1)     |
//! | `insert`           | O(log N)           |
//! | `replace`          | O(log N)           |
//! | `split`            | O(log N)           |
//! | `join`             | O(log N)           |
//! | `without`          | O(log N)           |
//! | `iter().next()`    | amortized O(1)     |

mod debug;
mod error;
mod focus;
mod iterator;
mod join;
mod leaf;
mod mutable;
mod node;
mod relaxed;
mod state;
mod strict;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use static_assertions::const_assert;

use super::ReferenceCounter;
use state::TreeState;

pub use error::{InvariantViolation, RrbError};
pub use iterator::{RrbTreeIntoIterator, RrbTreeIterator};
pub use mutable::MutableRrbTree;

// =============================================================================
// Constants
// =============================================================================

/// log2 of the strict branching factor.
pub(crate) const NODE_LENGTH_POW_2: usize = 5;

/// Children of a full strict branch, and elements of a full strict leaf.
pub(crate) const STRICT_NODE_LENGTH: usize = 1 << NODE_LENGTH_POW_2;

/// Fewest elements of a leaf below the root.
pub(crate) const MIN_NODE_LENGTH: usize = (STRICT_NODE_LENGTH + 1) * 2 / 3;

/// Exclusive upper bound on leaf elements and relaxed children.
pub(crate) const MAX_NODE_LENGTH: usize = (STRICT_NODE_LENGTH + 1) * 4 / 3;

const_assert!(STRICT_NODE_LENGTH == 32);
const_assert!(MIN_NODE_LENGTH == 22);
const_assert!(MAX_NODE_LENGTH == 44);
// A leaf that reaches MAX_NODE_LENGTH splits into two valid halves.
const_assert!(MAX_NODE_LENGTH / 2 >= MIN_NODE_LENGTH);
const_assert!(STRICT_NODE_LENGTH >= MIN_NODE_LENGTH && STRICT_NODE_LENGTH < MAX_NODE_LENGTH);

// =============================================================================
// RrbTree Definition
// =============================================================================

/// An immutable, structurally shared indexed sequence.
///
/// Every operation returns a new tree and leaves `self` untouched. Versions
/// share all nodes except those on the path to the change, so keeping old
/// versions around is cheap.
///
/// # Examples
///
/// ```rust
/// use lambars_rrb::persistent::RrbTree;
///
/// let tree: RrbTree<i32> = (1..=5).collect();
/// let (left, right) = tree.split(2).unwrap();
/// assert_eq!(left.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
/// assert_eq!(right.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
///
/// let joined = right.join(&left);
/// assert_eq!(joined.to_string(), "[3, 4, 5, 1, 2]");
/// ```
#[derive(Clone)]
pub struct RrbTree<T> {
    state: TreeState<T>,
}

impl<T> RrbTree<T> {
    /// Creates an empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_rrb::persistent::RrbTree;
    ///
    /// let tree: RrbTree<i32> = RrbTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(TreeState::new())
    }

    pub(crate) const fn from_state(state: TreeState<T>) -> Self {
        Self { state }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns `true` if the tree holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.state.len() == 0
    }

    /// Returns the element at `index`, or `None` past the end.
    ///
    /// # Complexity
    ///
    /// O(1) inside the focus, O(log N) otherwise
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_rrb::persistent::RrbTree;
    ///
    /// let tree: RrbTree<char> = "abc".chars().collect();
    /// assert_eq!(tree.get(1), Some(&'b'));
    /// assert_eq!(tree.get(3), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.state.get(index)
    }

    /// Returns the first element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the last element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns an iterator over references to the elements in index order.
    ///
    /// Each call starts a fresh traversal.
    pub fn iter(&self) -> RrbTreeIterator<'_, T> {
        RrbTreeIterator::new(&self.state)
    }

    /// Converts into a mutable tree without copying.
    #[must_use]
    pub fn into_mutable(self) -> MutableRrbTree<T> {
        MutableRrbTree::from_state(self.state)
    }
}

impl<T: Clone> RrbTree<T> {
    /// Creates a tree holding one element.
    #[must_use]
    pub fn singleton(item: T) -> Self {
        Self::new().append(item)
    }

    /// Returns a new tree with `item` appended.
    ///
    /// # Complexity
    ///
    /// Amortized O(1) when appends follow each other
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_rrb::persistent::RrbTree;
    ///
    /// let tree = RrbTree::new().append(1).append(2);
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.last(), Some(&2));
    /// ```
    #[must_use]
    pub fn append(&self, item: T) -> Self {
        let mut state = self.state.clone();
        state.append(item);
        Self { state }
    }

    /// Returns a new tree with `item` inserted before the element at
    /// `index`; `index == len()` appends.
    ///
    /// # Errors
    ///
    /// [`RrbError::IndexOutOfBounds`] if `index > len()`.
    ///
    /// # Complexity
    ///
    /// O(log N); O(1) next to the previous edit of the same lineage
    pub fn insert(&self, index: usize, item: T) -> Result<Self, RrbError> {
        let mut state = self.state.clone();
        state.insert(index, item)?;
        Ok(Self { state })
    }

    /// Returns a new tree with the element at `index` replaced.
    ///
    /// # Errors
    ///
    /// [`RrbError::IndexOutOfBounds`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_rrb::persistent::RrbTree;
    ///
    /// let tree: RrbTree<i32> = (0..5).collect();
    /// let replaced = tree.replace(2, 20).unwrap();
    /// assert_eq!(replaced.get(2), Some(&20));
    /// assert_eq!(tree.get(2), Some(&2));
    /// ```
    pub fn replace(&self, index: usize, item: T) -> Result<Self, RrbError> {
        let mut state = self.state.clone();
        state.replace(index, item)?;
        Ok(Self { state })
    }

    /// Returns a new tree with every item of `items` appended.
    #[must_use]
    pub fn concat<I: IntoIterator<Item = T>>(&self, items: I) -> Self {
        let mut state = self.state.clone();
        for item in items {
            state.append(item);
        }
        Self { state }
    }

    /// Returns the elements in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            state: self.state.reversed(),
        }
    }

    /// Splits into `[0, index)` and `[index, len())`.
    ///
    /// # Errors
    ///
    /// [`RrbError::InvalidSplitIndex`] unless `1 <= index <= len()`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    pub fn split(&self, index: usize) -> Result<(Self, Self), RrbError> {
        self.state.check_split_index(index)?;
        let (left, right) = self.state.clone().split(index)?;
        Ok((Self { state: left }, Self { state: right }))
    }

    /// Returns the concatenation of `self` and `other`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_rrb::persistent::RrbTree;
    ///
    /// let left: RrbTree<i32> = (1..50).collect();
    /// let right: RrbTree<i32> = (50..100).collect();
    /// let joined = left.join(&right);
    /// assert!(joined.iter().copied().eq(1..100));
    /// ```
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        Self {
            state: self.state.clone().join(other.state.clone()),
        }
    }

    /// Returns a new tree without the element at `index`.
    ///
    /// # Errors
    ///
    /// [`RrbError::IndexOutOfBounds`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_rrb::persistent::RrbTree;
    ///
    /// let tree: RrbTree<i32> = (1..=6).collect();
    /// let removed = tree.without(3).unwrap();
    /// assert_eq!(removed.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6]);
    /// ```
    pub fn without(&self, index: usize) -> Result<Self, RrbError> {
        let (state, _) = self.state.clone().without(index)?;
        Ok(Self { state })
    }

    /// Returns a mutable copy of this tree. Only the focus is copied; every
    /// node stays shared.
    #[must_use]
    pub fn mutable(&self) -> MutableRrbTree<T> {
        MutableRrbTree::from_state(self.state.clone())
    }
}

impl<T: fmt::Debug> RrbTree<T> {
    /// Walks the whole tree and checks every structural invariant.
    ///
    /// Meant for test suites; a violation is always a defect of this crate.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        debug::check_tree(&self.state)
    }

    /// Renders the node structure as an indented multi-line string: the
    /// focus first, then one line per node.
    ///
    /// The layout is meant for humans and may change between versions.
    #[must_use]
    pub fn indent_string(&self) -> String {
        debug::indent_string(&self.state)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for RrbTree<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<T> for RrbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<MutableRrbTree<T>>().immutable()
    }
}

impl<T: Clone> IntoIterator for RrbTree<T> {
    type Item = T;
    type IntoIter = RrbTreeIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        RrbTreeIntoIterator::new(self.state)
    }
}

impl<'a, T> IntoIterator for &'a RrbTree<T> {
    type Item = &'a T;
    type IntoIter = RrbTreeIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<usize> for RrbTree<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(element) => element,
            None => panic!(
                "index out of bounds: the len is {} but the index is {index}",
                self.len()
            ),
        }
    }
}

impl<T: PartialEq> PartialEq for RrbTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RrbTree<T> {}

impl<T: PartialEq> PartialEq<MutableRrbTree<T>> for RrbTree<T> {
    fn eq(&self, other: &MutableRrbTree<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<[T]> for RrbTree<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for RrbTree<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == *other.as_slice()
    }
}

/// Hashes the length, then every element in order, so equal trees hash
/// equally regardless of their internal node layout.
///
/// # Examples
///
/// ```rust
/// use lambars_rrb::persistent::RrbTree;
/// use std::collections::HashSet;
///
/// let built: RrbTree<i32> = (0..100).collect();
/// let (left, right) = built.split(30).unwrap();
/// let mut seen = HashSet::new();
/// seen.insert(built);
/// assert!(seen.contains(&left.join(&right)));
/// ```
impl<T: Hash> Hash for RrbTree<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RrbTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for RrbTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for RrbTree<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct RrbTreeVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> RrbTreeVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for RrbTreeVisitor<T>
where
    T: serde::Deserialize<'de> + Clone,
{
    type Value = RrbTree<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut tree = MutableRrbTree::new();
        while let Some(element) = seq.next_element()? {
            tree.append(element);
        }
        Ok(tree.immutable())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for RrbTree<T>
where
    T: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(RrbTreeVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
