//! The polymorphic node of the RRB-Tree.
//!
//! A [`Node`] is one of three variants:
//!
//! - [`Leaf`]: a packed array of elements (height 1)
//! - [`Strict`]: a branch whose non-last children are completely full, indexed
//!   by bit shifting alone
//! - [`Relaxed`]: a branch whose children vary in size, indexed through a
//!   table of cumulative sizes
//!
//! Nodes are never mutated once linked into a tree. Every change produces new
//! nodes along one root-to-leaf path and shares the rest.

use super::leaf::Leaf;
use super::relaxed::Relaxed;
use super::strict::Strict;
use super::{MAX_NODE_LENGTH, ReferenceCounter, STRICT_NODE_LENGTH};

/// Shared link to a node.
pub(crate) type NodeRef<T> = ReferenceCounter<Node<T>>;

pub(crate) enum Node<T> {
    Leaf(Leaf<T>),
    Strict(Strict<T>),
    Relaxed(Relaxed<T>),
}

/// The outcome of pushing a focus into a subtree: either the subtree absorbed
/// it, or it had to divide into two siblings of the same height.
pub(crate) enum Pushed<T> {
    One(Node<T>),
    Two(Node<T>, Node<T>),
}

/// The two halves of a split subtree.
///
/// The logical order is `left`, `left_leftover`, `right_leftover`, `right`.
/// Leftovers are fragments of a leaf that was cut inside; they are carried up
/// to the tree, where they become the focus of the respective half.
pub(crate) struct SplitNode<T> {
    pub(crate) left: Option<NodeRef<T>>,
    pub(crate) left_leftover: Vec<T>,
    pub(crate) right: Option<NodeRef<T>>,
    pub(crate) right_leftover: Vec<T>,
}

impl<T> SplitNode<T> {
    const fn whole_left(node: NodeRef<T>) -> Self {
        Self {
            left: Some(node),
            left_leftover: Vec::new(),
            right: None,
            right_leftover: Vec::new(),
        }
    }

    const fn whole_right(node: NodeRef<T>) -> Self {
        Self {
            left: None,
            left_leftover: Vec::new(),
            right: Some(node),
            right_leftover: Vec::new(),
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.left.as_ref().map_or(0, |node| node.size())
            + self.left_leftover.len()
            + self.right_leftover.len()
            + self.right.as_ref().map_or(0, |node| node.size())
    }
}

impl<T> Node<T> {
    pub(crate) const fn empty() -> Self {
        Self::Leaf(Leaf::empty())
    }

    pub(crate) fn size(&self) -> usize {
        match self {
            Self::Leaf(leaf) => leaf.len(),
            Self::Strict(strict) => strict.size(),
            Self::Relaxed(relaxed) => relaxed.size(),
        }
    }

    pub(crate) const fn height(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Strict(strict) => strict.height(),
            Self::Relaxed(relaxed) => relaxed.height(),
        }
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Child links of a branch; empty for a leaf.
    pub(crate) fn children(&self) -> &[NodeRef<T>] {
        match self {
            Self::Leaf(_) => &[],
            Self::Strict(strict) => strict.nodes(),
            Self::Relaxed(relaxed) => relaxed.nodes(),
        }
    }

    pub(crate) fn num_children(&self) -> usize {
        self.children().len()
    }

    /// The `index`-th child. Leaves have no children, so asking one is a bug
    /// in the caller and yields `None`.
    pub(crate) fn child(&self, index: usize) -> Option<&NodeRef<T>> {
        self.children().get(index)
    }

    /// The element at `index`, which must be below `size()`.
    pub(crate) fn get(&self, index: usize) -> &T {
        match self {
            Self::Leaf(leaf) => leaf.get(index),
            Self::Strict(strict) => strict.get(index),
            Self::Relaxed(relaxed) => relaxed.get(index),
        }
    }

    /// Whether a full leaf can be appended while keeping this node strict and
    /// its height unchanged.
    pub(crate) fn has_strict_capacity(&self) -> bool {
        match self {
            Self::Strict(strict) => strict.has_strict_capacity(),
            Self::Leaf(_) | Self::Relaxed(_) => false,
        }
    }

    /// Whether this branch can take `count` more children.
    pub(crate) fn this_node_has_relaxed_capacity(&self, count: usize) -> bool {
        !self.is_leaf() && self.num_children() + count < MAX_NODE_LENGTH
    }

    /// Whether pushing `count` elements at `index` is absorbed by this
    /// subtree without it dividing in two.
    pub(crate) fn has_relaxed_capacity(&self, index: usize, count: usize) -> bool {
        match self {
            Self::Leaf(leaf) => leaf.has_relaxed_capacity(count),
            Self::Strict(_) | Self::Relaxed(_) => {
                let (child, sub_index) = self.locate_insert(index);
                self.children()[child].has_relaxed_capacity(sub_index, count)
                    || self.this_node_has_relaxed_capacity(1)
            }
        }
    }

    /// The child an insertion at `index` descends into, preferring the end of
    /// the left child when `index` falls on a boundary.
    fn locate_insert(&self, index: usize) -> (usize, usize) {
        match self {
            Self::Leaf(_) => (0, index),
            Self::Strict(strict) => strict.locate_insert(index),
            Self::Relaxed(relaxed) => relaxed.locate_insert(index),
        }
    }
}

impl<T: Clone> Node<T> {
    /// Copy-on-write replacement along the path to `index`.
    pub(crate) fn replace(&self, index: usize, item: T) -> (Self, T) {
        match self {
            Self::Leaf(leaf) => {
                let (leaf, previous) = leaf.replace(index, item);
                (Self::Leaf(leaf), previous)
            }
            Self::Strict(strict) => {
                let (strict, previous) = strict.replace(index, item);
                (Self::Strict(strict), previous)
            }
            Self::Relaxed(relaxed) => {
                let (relaxed, previous) = relaxed.replace(index, item);
                (Self::Relaxed(relaxed), previous)
            }
        }
    }

    /// Splits `node` so that the left part holds exactly `index` elements.
    pub(crate) fn split_at(node: &NodeRef<T>, index: usize) -> SplitNode<T> {
        if index == 0 {
            return SplitNode::whole_right(node.clone());
        }
        if index >= node.size() {
            return SplitNode::whole_left(node.clone());
        }
        match node.as_ref() {
            Self::Leaf(leaf) => leaf.split_at(index),
            Self::Strict(strict) => strict.split_at(index),
            Self::Relaxed(relaxed) => relaxed.split_at(index),
        }
    }

    /// Splices `focus` into the subtree at `index`.
    ///
    /// Full leaves on a boundary are grafted by `push_focus_root`; any other
    /// push breaks a strict node's packing, so it is relaxed first.
    pub(crate) fn push_focus(node: &NodeRef<T>, index: usize, focus: &[T]) -> Pushed<T> {
        let absorbed = cfg!(debug_assertions) && node.has_relaxed_capacity(index, focus.len());
        let pushed = match node.as_ref() {
            Self::Leaf(leaf) => leaf.push_focus(index, focus),
            Self::Strict(strict) => {
                tracing::trace!(height = strict.height(), "relaxing strict node");
                strict.relax().push_focus(index, focus)
            }
            Self::Relaxed(relaxed) => relaxed.push_focus(index, focus),
        };
        debug_assert!(!absorbed || matches!(pushed, Pushed::One(_)));
        pushed
    }

    /// Reconciles a focus with a whole tree and returns the new root.
    ///
    /// A full focus on a leaf boundary of a strict (or full leaf) root is
    /// grafted as a new leaf and keeps the tree strict when the packing
    /// allows it; everything else goes through the relaxed path.
    pub(crate) fn push_focus_root(root: &NodeRef<T>, index: usize, focus: &[T]) -> NodeRef<T> {
        if focus.is_empty() {
            return root.clone();
        }
        if root.size() == 0 {
            return ReferenceCounter::new(Self::Leaf(Leaf::from_slice(focus)));
        }
        if focus.len() == STRICT_NODE_LENGTH
            && index % STRICT_NODE_LENGTH == 0
            && let Some(strict) = Self::strict_insert(root, index, focus)
        {
            return ReferenceCounter::new(strict);
        }
        match Self::push_focus(root, index, focus) {
            Pushed::One(node) => ReferenceCounter::new(node),
            Pushed::Two(left, right) => {
                let height = left.height() + 1;
                tracing::debug!(height, "root grew while pushing focus");
                ReferenceCounter::new(Self::Relaxed(Relaxed::from_nodes(
                    height,
                    vec![ReferenceCounter::new(left), ReferenceCounter::new(right)],
                )))
            }
        }
    }

    /// Inserts a full leaf at the leaf boundary `index` of a root that is
    /// strict (or a full leaf) and stays strict. `None` when the packing
    /// cannot be kept.
    fn strict_insert(root: &NodeRef<T>, index: usize, focus: &[T]) -> Option<Self> {
        if index < root.size() {
            let leaf = ReferenceCounter::new(Self::Leaf(Leaf::from_slice(focus)));
            return match root.as_ref() {
                Self::Leaf(existing) if existing.len() == STRICT_NODE_LENGTH => {
                    Some(Self::Strict(Strict::new(2, vec![leaf, root.clone()])))
                }
                Self::Strict(strict) => strict.insert_leaf(index, leaf).map(Self::Strict),
                _ => None,
            };
        }
        Self::strict_append(root, focus)
    }

    /// Appends a full leaf to a root that is strict (or a full leaf) and
    /// stays strict. `None` when the packing cannot be kept.
    fn strict_append(root: &NodeRef<T>, focus: &[T]) -> Option<Self> {
        let leaf = ReferenceCounter::new(Self::Leaf(Leaf::from_slice(focus)));
        match root.as_ref() {
            Self::Leaf(existing) if existing.len() == STRICT_NODE_LENGTH => {
                Some(Self::Strict(Strict::new(2, vec![root.clone(), leaf])))
            }
            Self::Strict(strict) if strict.has_strict_capacity() => {
                Some(Self::Strict(strict.append_leaf(leaf)))
            }
            Self::Strict(strict) if strict.is_full() => {
                let height = strict.height() + 1;
                tracing::debug!(height, "strict root grew");
                Some(Self::Strict(Strict::new(
                    height,
                    vec![root.clone(), skinny_strict(leaf, strict.height())],
                )))
            }
            _ => None,
        }
    }
}

/// Wraps `node` in single-child strict ancestors until it reaches `height`.
pub(crate) fn skinny_strict<T>(node: NodeRef<T>, height: usize) -> NodeRef<T> {
    let mut node = node;
    while node.height() < height {
        let parent_height = node.height() + 1;
        node = ReferenceCounter::new(Node::Strict(Strict::new(parent_height, vec![node])));
    }
    node
}

/// Raises `node` by one level under a single-child relaxed ancestor.
pub(crate) fn skinny_relaxed<T>(node: NodeRef<T>) -> NodeRef<T> {
    let height = node.height() + 1;
    ReferenceCounter::new(Node::Relaxed(Relaxed::from_nodes(height, vec![node])))
}

/// Strips single-child branches off the top of a tree.
pub(crate) fn eliminate_ancestors<T>(node: NodeRef<T>) -> NodeRef<T> {
    let mut node = node;
    while node.num_children() == 1 {
        node = node.children()[0].clone();
    }
    node
}

/// Cuts the child list of a branch at `sub_index` within child `child`.
///
/// Returns the children left and right of the cut plus the leftovers from a
/// leaf that was cut inside. A cut on a child boundary (`sub_index == 0`)
/// shares every child unchanged.
pub(crate) fn cut_children<T: Clone>(
    nodes: &[NodeRef<T>],
    child: usize,
    sub_index: usize,
) -> (Vec<NodeRef<T>>, Vec<NodeRef<T>>, SplitNode<T>) {
    if sub_index == 0 {
        return (
            nodes[..child].to_vec(),
            nodes[child..].to_vec(),
            SplitNode {
                left: None,
                left_leftover: Vec::new(),
                right: None,
                right_leftover: Vec::new(),
            },
        );
    }
    let split = Node::split_at(&nodes[child], sub_index);
    let mut left: Vec<NodeRef<T>> = nodes[..child].to_vec();
    left.extend(split.left.clone());
    let mut right: Vec<NodeRef<T>> = Vec::with_capacity(nodes.len() - child);
    right.extend(split.right.clone());
    right.extend_from_slice(&nodes[child + 1..]);
    (left, right, split)
}
