//! The single-writer variant of the RRB-Tree.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::debug;
use super::error::{InvariantViolation, RrbError};
use super::iterator::RrbTreeIterator;
use super::state::TreeState;
use super::RrbTree;

/// A mutable RRB-Tree for batch building and in-place editing.
///
/// `MutableRrbTree` updates its own root and focus in place, while the nodes
/// it points to stay immutable and may be shared with [`RrbTree`] values.
/// Converting between the two variants with [`RrbTree::mutable`] and
/// [`MutableRrbTree::immutable`] copies at most the focus.
///
/// It is a builder for a single owner: it is neither `Send` nor `Sync`, even
/// with the `arc` feature. Finish editing and call
/// [`immutable`](Self::immutable) before sharing the result.
///
/// # Examples
///
/// ```rust
/// use lambars_rrb::persistent::MutableRrbTree;
///
/// let mut tree = MutableRrbTree::new();
/// tree.append(1).append(2).append(4);
/// tree.insert(2, 3).unwrap();
/// assert_eq!(tree.replace(0, 0), Ok(1));
///
/// let immutable = tree.immutable();
/// assert_eq!(immutable.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3, 4]);
/// ```
pub struct MutableRrbTree<T> {
    state: TreeState<T>,
    /// Marker to ensure `!Send` and `!Sync`.
    _marker: PhantomData<Rc<()>>,
}

static_assertions::assert_not_impl_any!(MutableRrbTree<i32>: Send, Sync);
static_assertions::assert_not_impl_any!(MutableRrbTree<String>: Send, Sync);

impl<T> MutableRrbTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(TreeState::new())
    }

    pub(super) const fn from_state(state: TreeState<T>) -> Self {
        Self {
            state,
            _marker: PhantomData,
        }
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
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.state.get(index)
    }

    /// Returns an iterator over references to the elements in index order.
    pub fn iter(&self) -> RrbTreeIterator<'_, T> {
        RrbTreeIterator::new(&self.state)
    }

    /// Converts into an immutable tree without copying.
    #[must_use]
    pub fn immutable(self) -> RrbTree<T> {
        RrbTree::from_state(self.state)
    }
}

impl<T: fmt::Debug> MutableRrbTree<T> {
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

    /// Renders the node structure as an indented multi-line string.
    #[must_use]
    pub fn indent_string(&self) -> String {
        debug::indent_string(&self.state)
    }
}

impl<T: Clone> MutableRrbTree<T> {
    /// Appends `item` at the end.
    ///
    /// # Complexity
    ///
    /// Amortized O(1)
    pub fn append(&mut self, item: T) -> &mut Self {
        self.state.append(item);
        self
    }

    /// Inserts `item` before the element at `index`; `index == len()`
    /// appends.
    ///
    /// # Errors
    ///
    /// [`RrbError::IndexOutOfBounds`] if `index > len()`. The tree is left
    /// unchanged.
    ///
    /// # Complexity
    ///
    /// O(1) next to the previous edit, O(log N) otherwise
    pub fn insert(&mut self, index: usize, item: T) -> Result<&mut Self, RrbError> {
        self.state.insert(index, item)?;
        Ok(self)
    }

    /// Replaces the element at `index` and returns the previous one.
    ///
    /// # Errors
    ///
    /// [`RrbError::IndexOutOfBounds`] if `index >= len()`.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, RrbError> {
        self.state.replace(index, item)
    }

    /// Appends every item of `items`.
    pub fn concat<I: IntoIterator<Item = T>>(&mut self, items: I) -> &mut Self {
        for item in items {
            self.state.append(item);
        }
        self
    }

    /// Reverses the order of the elements.
    pub fn reverse(&mut self) -> &mut Self {
        self.state = self.state.reversed();
        self
    }

    /// Keeps `[0, index)` in place and returns `[index, len())` as a new
    /// tree, like [`Vec::split_off`].
    ///
    /// # Errors
    ///
    /// [`RrbError::InvalidSplitIndex`] unless `1 <= index <= len()`. The tree
    /// is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_rrb::persistent::MutableRrbTree;
    ///
    /// let mut tree: MutableRrbTree<i32> = (0..10).collect();
    /// let right = tree.split(7).unwrap();
    /// assert_eq!(tree.len(), 7);
    /// assert_eq!(right.iter().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
    /// ```
    pub fn split(&mut self, index: usize) -> Result<Self, RrbError> {
        self.state.check_split_index(index)?;
        let state = std::mem::replace(&mut self.state, TreeState::new());
        let (left, right) = state.split(index)?;
        self.state = left;
        Ok(Self::from_state(right))
    }

    /// Appends all elements of `other`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    pub fn join(&mut self, other: Self) -> &mut Self {
        let state = std::mem::replace(&mut self.state, TreeState::new());
        self.state = state.join(other.state);
        self
    }

    /// Removes the element at `index` and returns it.
    ///
    /// # Errors
    ///
    /// [`RrbError::IndexOutOfBounds`] if `index >= len()`. The tree is left
    /// unchanged.
    pub fn without(&mut self, index: usize) -> Result<T, RrbError> {
        self.state.check_index(index)?;
        let state = std::mem::replace(&mut self.state, TreeState::new());
        let (rest, removed) = state.without(index)?;
        self.state = rest;
        Ok(removed)
    }
}

impl<T> Default for MutableRrbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Extend<T> for MutableRrbTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.concat(iter);
    }
}

impl<T: Clone> FromIterator<T> for MutableRrbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.concat(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a MutableRrbTree<T> {
    type Item = &'a T;
    type IntoIter = RrbTreeIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for MutableRrbTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for MutableRrbTree<T> {}

impl<T: PartialEq> PartialEq<RrbTree<T>> for MutableRrbTree<T> {
    fn eq(&self, other: &RrbTree<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for MutableRrbTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for MutableRrbTree<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for MutableRrbTree<T>
where
    T: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <RrbTree<T> as serde::Deserialize>::deserialize(deserializer).map(RrbTree::into_mutable)
    }
}
