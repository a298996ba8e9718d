//! Shared core of the immutable and mutable trees.
//!
//! `TreeState` is the "cell" both variants wrap: a root, a focus and the total
//! size. The mutable variant edits its state in place; the immutable variant
//! clones the state (a root link plus a short focus) and edits the clone.

use super::error::RrbError;
use super::focus::Focus;
use super::join::join_nodes;
use super::node::{Node, NodeRef, eliminate_ancestors};
use super::{MAX_NODE_LENGTH, ReferenceCounter};

#[derive(Clone)]
pub(crate) struct TreeState<T> {
    root: NodeRef<T>,
    focus: Focus<T>,
    size: usize,
}

impl<T> TreeState<T> {
    pub(crate) fn new() -> Self {
        Self {
            root: ReferenceCounter::new(Node::empty()),
            focus: Focus::empty_at(0),
            size: 0,
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) const fn root(&self) -> &NodeRef<T> {
        &self.root
    }

    #[inline]
    pub(crate) const fn focus(&self) -> &Focus<T> {
        &self.focus
    }

    pub(crate) fn into_focus(self) -> Focus<T> {
        self.focus
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        (index < self.size).then(|| self.root_or_focus(index))
    }

    /// The element at `index`, which must be below `len()`.
    fn root_or_focus(&self, index: usize) -> &T {
        if self.focus.contains(index) {
            &self.focus.as_slice()[index - self.focus.start_index()]
        } else {
            self.root.get(self.focus.tree_index(index))
        }
    }

    /// Fails unless `index` addresses an element.
    pub(crate) const fn check_index(&self, index: usize) -> Result<(), RrbError> {
        if index < self.size {
            Ok(())
        } else {
            Err(RrbError::IndexOutOfBounds {
                index,
                length: self.size,
            })
        }
    }

    /// Fails unless `index` is within `1..=len()`.
    pub(crate) const fn check_split_index(&self, index: usize) -> Result<(), RrbError> {
        if index >= 1 && index <= self.size {
            Ok(())
        } else {
            Err(RrbError::InvalidSplitIndex {
                index,
                length: self.size,
            })
        }
    }
}

impl<T: Clone> TreeState<T> {
    pub(crate) fn append(&mut self, item: T) {
        self.insert_within(self.size, item);
    }

    pub(crate) fn insert(&mut self, index: usize, item: T) -> Result<(), RrbError> {
        if index > self.size {
            return Err(RrbError::IndexOutOfBounds {
                index,
                length: self.size,
            });
        }
        self.insert_within(index, item);
        Ok(())
    }

    /// Inserts at `index`, which must be at most `len()`.
    fn insert_within(&mut self, index: usize, item: T) {
        if !self.focus.accepts(index) {
            self.flush();
        }
        self.focus.insert(index, item);
        self.size += 1;
    }

    /// Replaces the element at `index` and returns the previous one.
    pub(crate) fn replace(&mut self, index: usize, item: T) -> Result<T, RrbError> {
        self.check_index(index)?;
        if self.focus.contains(index) {
            return Ok(self.focus.replace(index, item));
        }
        let (root, previous) = self.root.replace(self.focus.tree_index(index), item);
        self.root = ReferenceCounter::new(root);
        Ok(previous)
    }

    /// Pushes the focus into the tree, leaving an empty focus at the end.
    pub(crate) fn flush(&mut self) {
        if self.focus.is_empty() {
            return;
        }
        let root = Node::push_focus_root(
            &self.root,
            self.focus.start_index(),
            self.focus.as_slice(),
        );
        self.root = root;
        self.focus.clear_at(self.size);
    }

    /// Splits into `[0, index)` and `[index, len())`.
    pub(crate) fn split(mut self, index: usize) -> Result<(Self, Self), RrbError> {
        self.check_split_index(index)?;
        if index == self.size {
            return Ok((self, Self::new()));
        }
        self.flush();
        let split = Node::split_at(&self.root, index);
        debug_assert_eq!(split.size(), self.size);
        tracing::trace!(
            index,
            left_leftover = split.left_leftover.len(),
            right_leftover = split.right_leftover.len(),
            "split tree"
        );

        let left_root = split
            .left
            .map_or_else(|| ReferenceCounter::new(Node::empty()), eliminate_ancestors);
        let left_focus = Focus::from_leftover(split.left_leftover, left_root.size());
        let right_root = split
            .right
            .map_or_else(|| ReferenceCounter::new(Node::empty()), eliminate_ancestors);
        let right_focus = Focus::from_leftover(split.right_leftover, 0);
        Ok((
            Self::from_parts(left_root, left_focus),
            Self::from_parts(right_root, right_focus),
        ))
    }

    fn from_parts(root: NodeRef<T>, focus: Focus<T>) -> Self {
        let size = root.size() + focus.len();
        Self { root, focus, size }
    }

    /// Concatenates `other` after `self`.
    ///
    /// Operands shorter than `MAX_NODE_LENGTH` are not worth tree surgery and
    /// are fed element by element through the focus of the other operand.
    pub(crate) fn join(self, other: Self) -> Self {
        if other.size == 0 {
            return self;
        }
        if self.size == 0 {
            return other;
        }
        if self.size < MAX_NODE_LENGTH {
            tracing::trace!(size = self.size, "join: prepending short left operand");
            let prefix: Vec<T> = self.iter_cloned().collect();
            let mut joined = other;
            for item in prefix.into_iter().rev() {
                joined.insert_within(0, item);
            }
            return joined;
        }
        if other.size < MAX_NODE_LENGTH {
            tracing::trace!(size = other.size, "join: appending short right operand");
            let mut joined = self;
            for item in other.iter_cloned() {
                joined.append(item);
            }
            return joined;
        }

        let mut left = self;
        let mut right = other;
        left.flush();
        right.flush();
        let root = join_nodes(&left.root, &right.root);
        let size = left.size + right.size;
        debug_assert_eq!(root.size(), size);
        Self {
            root,
            focus: Focus::empty_at(size),
            size,
        }
    }

    /// Removes the element at `index` by splitting around it and joining the
    /// remaining parts.
    pub(crate) fn without(self, index: usize) -> Result<(Self, T), RrbError> {
        self.check_index(index)?;
        let removed = self.root_or_focus(index).clone();
        if index == 0 {
            let (_, rest) = self.split(1)?;
            return Ok((rest, removed));
        }
        let (left, right) = self.split(index)?;
        if right.size == 1 {
            return Ok((left, removed));
        }
        let (_, rest) = right.split(1)?;
        Ok((left.join(rest), removed))
    }

    pub(crate) fn reversed(&self) -> Self {
        let items: Vec<T> = self.iter_cloned().collect();
        let mut reversed = Self::new();
        for item in items.into_iter().rev() {
            reversed.append(item);
        }
        reversed
    }

    fn iter_cloned(&self) -> impl Iterator<Item = T> + '_ {
        super::iterator::RrbTreeIterator::new(self).cloned()
    }
}
