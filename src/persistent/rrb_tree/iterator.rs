//! In-order iteration over the tree and its focus.
//!
//! Both iterators walk the leaves depth-first with an explicit stack, so a
//! full traversal is O(N). The focus is not part of the tree; it is spliced
//! into the stream once `start_index` tree elements have been produced.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::focus::Focus;
use super::node::{Node, NodeRef};
use super::state::TreeState;

/// Stack depth that covers any tree of practical size without spilling.
const INLINE_DEPTH: usize = 8;

/// A branch being traversed and the index of the next child to visit.
struct Frame<'a, T> {
    children: &'a [NodeRef<T>],
    next: usize,
}

/// An iterator over references to the elements of an
/// [`RrbTree`](super::RrbTree) or a [`MutableRrbTree`](super::MutableRrbTree).
pub struct RrbTreeIterator<'a, T> {
    stack: SmallVec<[Frame<'a, T>; INLINE_DEPTH]>,
    /// Leaf currently being emitted
    leaf: &'a [T],
    leaf_index: usize,
    focus: &'a [T],
    /// Number of tree elements that precede the focus
    focus_start: usize,
    focus_index: usize,
    /// Tree elements produced so far
    root_emitted: usize,
    remaining: usize,
}

impl<'a, T> RrbTreeIterator<'a, T> {
    pub(crate) fn new(state: &'a TreeState<T>) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            leaf: &[],
            leaf_index: 0,
            focus: state.focus().as_slice(),
            focus_start: state.focus().start_index(),
            focus_index: 0,
            root_emitted: 0,
            remaining: state.len(),
        };
        match state.root().as_ref() {
            Node::Leaf(leaf) => iterator.leaf = leaf.items(),
            branch => iterator.stack.push(Frame {
                children: branch.children(),
                next: 0,
            }),
        }
        iterator
    }

    /// Moves to the next leaf in order. Returns `false` once the tree is
    /// exhausted.
    fn advance_to_next_leaf(&mut self) -> bool {
        while let Some(frame) = self.stack.last_mut() {
            let children = frame.children;
            let Some(child) = children.get(frame.next) else {
                self.stack.pop();
                continue;
            };
            frame.next += 1;
            match child.as_ref() {
                Node::Leaf(leaf) => {
                    self.leaf = leaf.items();
                    self.leaf_index = 0;
                    return true;
                }
                branch => self.stack.push(Frame {
                    children: branch.children(),
                    next: 0,
                }),
            }
        }
        false
    }
}

impl<'a, T> Iterator for RrbTreeIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.root_emitted == self.focus_start && self.focus_index < self.focus.len() {
                let element = &self.focus[self.focus_index];
                self.focus_index += 1;
                self.remaining -= 1;
                return Some(element);
            }
            if self.leaf_index < self.leaf.len() {
                let element = &self.leaf[self.leaf_index];
                self.leaf_index += 1;
                self.root_emitted += 1;
                self.remaining -= 1;
                return Some(element);
            }
            if !self.advance_to_next_leaf() {
                return None;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RrbTreeIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for RrbTreeIterator<'_, T> {}

/// Owning counterpart of [`Frame`].
struct OwnedFrame<T> {
    node: NodeRef<T>,
    next: usize,
}

/// An owning iterator over the elements of an [`RrbTree`](super::RrbTree).
///
/// Nodes may be shared with other trees, so elements are cloned out of them.
pub struct RrbTreeIntoIterator<T> {
    stack: SmallVec<[OwnedFrame<T>; INLINE_DEPTH]>,
    leaf: Option<NodeRef<T>>,
    leaf_index: usize,
    focus: Focus<T>,
    focus_index: usize,
    root_emitted: usize,
    remaining: usize,
}

impl<T> RrbTreeIntoIterator<T> {
    pub(crate) fn new(state: TreeState<T>) -> Self {
        let remaining = state.len();
        let root = state.root().clone();
        let mut iterator = Self {
            stack: SmallVec::new(),
            leaf: None,
            leaf_index: 0,
            focus: state.into_focus(),
            focus_index: 0,
            root_emitted: 0,
            remaining,
        };
        if root.is_leaf() {
            iterator.leaf = Some(root);
        } else {
            iterator.stack.push(OwnedFrame { node: root, next: 0 });
        }
        iterator
    }

    fn advance_to_next_leaf(&mut self) -> bool {
        while let Some(frame) = self.stack.last_mut() {
            let Some(child) = frame.node.children().get(frame.next).cloned() else {
                self.stack.pop();
                continue;
            };
            frame.next += 1;
            if child.is_leaf() {
                self.leaf = Some(child);
                self.leaf_index = 0;
                return true;
            }
            self.stack.push(OwnedFrame {
                node: child,
                next: 0,
            });
        }
        self.leaf = None;
        false
    }

    fn current_leaf(&self) -> &[T] {
        match self.leaf.as_deref() {
            Some(Node::Leaf(leaf)) => leaf.items(),
            _ => &[],
        }
    }
}

impl<T: Clone> Iterator for RrbTreeIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.root_emitted == self.focus.start_index() && self.focus_index < self.focus.len()
            {
                let element = self.focus.as_slice()[self.focus_index].clone();
                self.focus_index += 1;
                self.remaining -= 1;
                return Some(element);
            }
            if let Some(element) = self.current_leaf().get(self.leaf_index).cloned() {
                self.leaf_index += 1;
                self.root_emitted += 1;
                self.remaining -= 1;
                return Some(element);
            }
            if !self.advance_to_next_leaf() {
                return None;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for RrbTreeIntoIterator<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: Clone> FusedIterator for RrbTreeIntoIterator<T> {}
