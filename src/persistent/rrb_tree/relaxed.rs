//! Relaxed branch nodes with a cumulative size table.

use super::node::{Node, NodeRef, Pushed, SplitNode, cut_children};
use super::{MAX_NODE_LENGTH, ReferenceCounter};

/// A branch whose children may hold any number of elements.
///
/// `cumulative_sizes[i]` is the number of elements in `nodes[0..=i]`, so the
/// table is strictly increasing and its last entry is the size of the node.
/// All children share height `height - 1`, and there are fewer than
/// `MAX_NODE_LENGTH` of them.
pub(crate) struct Relaxed<T> {
    height: usize,
    cumulative_sizes: Vec<usize>,
    nodes: Vec<NodeRef<T>>,
}

impl<T> Relaxed<T> {
    pub(crate) fn from_nodes(height: usize, nodes: Vec<NodeRef<T>>) -> Self {
        debug_assert!(height >= 2);
        let mut total = 0;
        let cumulative_sizes = nodes
            .iter()
            .map(|node| {
                total += node.size();
                total
            })
            .collect();
        Self {
            height,
            cumulative_sizes,
            nodes,
        }
    }

    #[inline]
    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.cumulative_sizes.last().copied().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn nodes(&self) -> &[NodeRef<T>] {
        &self.nodes
    }

    #[inline]
    pub(crate) fn cumulative_sizes(&self) -> &[usize] {
        &self.cumulative_sizes
    }

    fn child_start(&self, child: usize) -> usize {
        if child == 0 {
            0
        } else {
            self.cumulative_sizes[child - 1]
        }
    }

    /// Finds the child holding `index` (below `size()`) by interpolation:
    /// guess from the average child size, then walk to the right slot.
    pub(crate) fn find_child(&self, index: usize) -> (usize, usize) {
        let last = self.nodes.len() - 1;
        let average = self.size().div_ceil(self.nodes.len());
        let mut guess = (index / average).min(last);
        while self.cumulative_sizes[guess] <= index {
            guess += 1;
        }
        while guess > 0 && self.cumulative_sizes[guess - 1] > index {
            guess -= 1;
        }
        (guess, index - self.child_start(guess))
    }

    /// The child an insertion at `index` (up to `size()`) descends into. On a
    /// boundary this is the end of the left child.
    pub(crate) fn locate_insert(&self, index: usize) -> (usize, usize) {
        let child = self
            .cumulative_sizes
            .partition_point(|&cumulative| cumulative < index)
            .min(self.nodes.len() - 1);
        (child, index - self.child_start(child))
    }

    pub(crate) fn get(&self, index: usize) -> &T {
        let (child, sub_index) = self.find_child(index);
        self.nodes[child].get(sub_index)
    }
}

impl<T: Clone> Relaxed<T> {
    pub(crate) fn replace(&self, index: usize, item: T) -> (Self, T) {
        let (child, sub_index) = self.find_child(index);
        let (node, previous) = self.nodes[child].replace(sub_index, item);
        let mut nodes = self.nodes.clone();
        nodes[child] = ReferenceCounter::new(node);
        (
            Self {
                height: self.height,
                cumulative_sizes: self.cumulative_sizes.clone(),
                nodes,
            },
            previous,
        )
    }

    /// Splits strictly inside this node; both halves are rebuilt with their
    /// own cumulative sizes.
    pub(crate) fn split_at(&self, index: usize) -> SplitNode<T> {
        let (child, sub_index) = self.find_child(index);
        let (left, right, split) = cut_children(&self.nodes, child, sub_index);
        let build = |nodes: Vec<NodeRef<T>>| {
            (!nodes.is_empty())
                .then(|| ReferenceCounter::new(Node::Relaxed(Self::from_nodes(self.height, nodes))))
        };
        SplitNode {
            left: build(left),
            left_leftover: split.left_leftover,
            right: build(right),
            right_leftover: split.right_leftover,
        }
    }

    /// Pushes `focus` into the child at `index`. A child that divides in two
    /// takes an extra slot here; when that overflows `MAX_NODE_LENGTH` this
    /// node divides as well.
    pub(crate) fn push_focus(&self, index: usize, focus: &[T]) -> Pushed<T> {
        let (child, sub_index) = self.locate_insert(index);
        match Node::push_focus(&self.nodes[child], sub_index, focus) {
            Pushed::One(node) => {
                let mut nodes = self.nodes.clone();
                nodes[child] = ReferenceCounter::new(node);
                let mut cumulative_sizes = self.cumulative_sizes.clone();
                for cumulative in &mut cumulative_sizes[child..] {
                    *cumulative += focus.len();
                }
                Pushed::One(Node::Relaxed(Self {
                    height: self.height,
                    cumulative_sizes,
                    nodes,
                }))
            }
            Pushed::Two(left, right) => {
                let mut nodes = self.nodes.clone();
                nodes.splice(
                    child..=child,
                    [ReferenceCounter::new(left), ReferenceCounter::new(right)],
                );
                if nodes.len() < MAX_NODE_LENGTH {
                    return Pushed::One(Node::Relaxed(Self::from_nodes(self.height, nodes)));
                }
                let upper = nodes.split_off(nodes.len() / 2);
                tracing::trace!(
                    height = self.height,
                    left = nodes.len(),
                    right = upper.len(),
                    "relaxed node split while pushing focus"
                );
                Pushed::Two(
                    Node::Relaxed(Self::from_nodes(self.height, nodes)),
                    Node::Relaxed(Self::from_nodes(self.height, upper)),
                )
            }
        }
    }
}
