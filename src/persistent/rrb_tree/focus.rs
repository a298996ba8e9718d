//! The focus: a small write-combining buffer at one logical position.

use arrayvec::ArrayVec;

use super::{MAX_NODE_LENGTH, STRICT_NODE_LENGTH};

/// Room for the largest leaf fragment a split can leave behind.
pub(crate) const FOCUS_CAPACITY: usize = MAX_NODE_LENGTH - 1;

/// Pending elements that logically sit at `start_index` of the sequence,
/// ahead of the tree element with the same index.
///
/// The focus is not part of the node invariants; it reaches the tree only
/// through `push_focus`.
#[derive(Clone)]
pub(crate) struct Focus<T> {
    items: ArrayVec<T, FOCUS_CAPACITY>,
    start_index: usize,
}

impl<T> Focus<T> {
    pub(crate) const fn empty_at(start_index: usize) -> Self {
        Self {
            items: ArrayVec::new_const(),
            start_index,
        }
    }

    /// Wraps a split leftover, which is always shorter than a leaf.
    pub(crate) fn from_leftover(items: Vec<T>, start_index: usize) -> Self {
        debug_assert!(items.len() <= FOCUS_CAPACITY);
        Self {
            items: items.into_iter().collect(),
            start_index,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub(crate) const fn start_index(&self) -> usize {
        self.start_index
    }

    #[inline]
    pub(crate) fn end_index(&self) -> usize {
        self.start_index + self.items.len()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Whether `index` addresses an element held here.
    #[inline]
    pub(crate) fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index()
    }

    /// Whether an insertion at `index` can be absorbed without flushing:
    /// the index touches the focus and the focus is shorter than a full leaf.
    pub(crate) fn accepts(&self, index: usize) -> bool {
        if self.items.is_empty() {
            return true;
        }
        self.items.len() < STRICT_NODE_LENGTH
            && index >= self.start_index
            && index <= self.end_index()
    }

    /// Inserts at absolute `index`. Requires `accepts(index)`.
    pub(crate) fn insert(&mut self, index: usize, item: T) {
        debug_assert!(self.accepts(index));
        if self.items.is_empty() {
            self.start_index = index;
        }
        self.items.insert(index - self.start_index, item);
    }

    /// Replaces at absolute `index`. Requires `contains(index)`.
    pub(crate) fn replace(&mut self, index: usize, item: T) -> T {
        std::mem::replace(&mut self.items[index - self.start_index], item)
    }

    /// Maps an index of the whole sequence onto the tree, which does not hold
    /// the focus elements.
    #[inline]
    pub(crate) fn tree_index(&self, index: usize) -> usize {
        if index >= self.end_index() {
            index - self.items.len()
        } else {
            index
        }
    }

    pub(crate) fn clear_at(&mut self, start_index: usize) {
        self.items.clear();
        self.start_index = start_index;
    }
}
