//! Logarithmic concatenation of two trees.
//!
//! The shorter tree is hung off the facing spine of the taller one:
//!
//! 1. Descend the taller tree along its right spine (left spine when the right
//!    operand is taller) down to the height of the shorter tree, recording
//!    the ancestors passed on the way.
//! 2. If the node reached has room for all children of the shorter root,
//!    graft them in directly.
//! 3. Otherwise walk back up, offering the shorter tree as one extra child,
//!    raised by a skinny single-child ancestor at each level, until some
//!    ancestor has room. If none has, a new two-child root is created.
//! 4. Rebuild the recorded ancestors above the changed node as relaxed nodes.
//!
//! Each recorded ancestor is visited at most once on the way up and at most
//! one level is added on top, so the result is at most one level taller than
//! the taller operand.

use std::slice;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::node::{Node, NodeRef, skinny_relaxed};
use super::relaxed::Relaxed;

/// The spine of the taller tree that faces the shorter one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Spine {
    /// The taller tree is on the left; the shorter one joins on its right.
    Right,
    /// The taller tree is on the right; the shorter one joins on its left.
    Left,
}

impl Spine {
    fn edge_child<T>(self, node: &Node<T>) -> Option<&NodeRef<T>> {
        match self {
            Self::Right => node
                .num_children()
                .checked_sub(1)
                .and_then(|last| node.child(last)),
            Self::Left => node.child(0),
        }
    }

    /// `existing` children of the taller side followed or preceded by the
    /// `incoming` ones, keeping left-to-right order.
    fn attach<T>(self, existing: &[NodeRef<T>], incoming: &[NodeRef<T>]) -> Vec<NodeRef<T>> {
        let (first, second) = match self {
            Self::Right => (existing, incoming),
            Self::Left => (incoming, existing),
        };
        let mut nodes = Vec::with_capacity(first.len() + second.len());
        nodes.extend_from_slice(first);
        nodes.extend_from_slice(second);
        nodes
    }

    fn replace_edge_child<T>(self, parent: &Node<T>, child: NodeRef<T>) -> NodeRef<T> {
        let mut nodes = parent.children().to_vec();
        let edge = match self {
            Self::Right => nodes.len() - 1,
            Self::Left => 0,
        };
        nodes[edge] = child;
        ReferenceCounter::new(Node::Relaxed(Relaxed::from_nodes(parent.height(), nodes)))
    }
}

/// Joins two branch roots.
pub(crate) fn join_nodes<T>(left: &NodeRef<T>, right: &NodeRef<T>) -> NodeRef<T> {
    debug_assert!(!left.is_leaf() && !right.is_leaf());
    let taller_height = left.height().max(right.height());
    let joined = if left.height() >= right.height() {
        join_along(left, right, Spine::Right)
    } else {
        join_along(right, left, Spine::Left)
    };
    debug_assert!(joined.height() <= taller_height + 1);
    joined
}

fn join_along<T>(taller: &NodeRef<T>, shorter: &NodeRef<T>, spine: Spine) -> NodeRef<T> {
    let mut ancestors: SmallVec<[NodeRef<T>; 8]> = SmallVec::new();
    let mut node = taller.clone();
    while node.height() > shorter.height() {
        let Some(next) = spine.edge_child(&node).cloned() else {
            break;
        };
        ancestors.push(node);
        node = next;
    }
    debug_assert_eq!(node.height(), shorter.height());

    if node.this_node_has_relaxed_capacity(shorter.num_children()) {
        tracing::trace!(
            height = node.height(),
            grafted = shorter.num_children(),
            ?spine,
            "join: grafting children"
        );
        let grafted = ReferenceCounter::new(Node::Relaxed(Relaxed::from_nodes(
            node.height(),
            spine.attach(node.children(), shorter.children()),
        )));
        return rebuild_spine(ancestors, grafted, spine);
    }

    let mut orphan = shorter.clone();
    while let Some(parent) = ancestors.pop() {
        debug_assert_eq!(orphan.height() + 1, parent.height());
        if parent.this_node_has_relaxed_capacity(1) {
            tracing::trace!(height = parent.height(), ?spine, "join: adopting skinny branch");
            let adopted = ReferenceCounter::new(Node::Relaxed(Relaxed::from_nodes(
                parent.height(),
                spine.attach(parent.children(), slice::from_ref(&orphan)),
            )));
            return rebuild_spine(ancestors, adopted, spine);
        }
        orphan = skinny_relaxed(orphan);
    }

    debug_assert_eq!(orphan.height(), taller.height());
    let height = taller.height() + 1;
    tracing::debug!(height, "join: new root");
    ReferenceCounter::new(Node::Relaxed(Relaxed::from_nodes(
        height,
        spine.attach(slice::from_ref(taller), slice::from_ref(&orphan)),
    )))
}

/// Replaces the edge child of each recorded ancestor, bottom-up.
fn rebuild_spine<T>(
    mut ancestors: SmallVec<[NodeRef<T>; 8]>,
    changed: NodeRef<T>,
    spine: Spine,
) -> NodeRef<T> {
    let mut child = changed;
    while let Some(parent) = ancestors.pop() {
        child = spine.replace_edge_child(&parent, child);
    }
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::rrb_tree::leaf::Leaf;
    use crate::persistent::rrb_tree::strict::Strict;
    use crate::persistent::rrb_tree::MAX_NODE_LENGTH;
    use rstest::rstest;

    fn leaf(start: usize, length: usize) -> NodeRef<usize> {
        ReferenceCounter::new(Node::Leaf(Leaf::from_vec((start..start + length).collect())))
    }

    /// A height-2 relaxed node of `children` leaves of 30, starting at `start`.
    fn branch(start: usize, children: usize) -> NodeRef<usize> {
        let nodes = (0..children).map(|index| leaf(start + index * 30, 30)).collect();
        ReferenceCounter::new(Node::Relaxed(Relaxed::from_nodes(2, nodes)))
    }

    /// A height-3 relaxed node over `branches` branches of `children` leaves.
    fn tall(start: usize, branches: usize, children: usize) -> NodeRef<usize> {
        let nodes = (0..branches)
            .map(|index| branch(start + index * children * 30, children))
            .collect();
        ReferenceCounter::new(Node::Relaxed(Relaxed::from_nodes(3, nodes)))
    }

    fn contents(node: &NodeRef<usize>) -> Vec<usize> {
        (0..node.size()).map(|index| *node.get(index)).collect()
    }

    #[rstest]
    fn test_equal_heights_with_room_merge_into_one_root() {
        let joined = join_nodes(&branch(0, 3), &branch(90, 4));
        assert_eq!(joined.height(), 2);
        assert_eq!(joined.num_children(), 7);
        assert_eq!(contents(&joined), (0..210).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_equal_heights_without_room_get_new_root() {
        let joined = join_nodes(&branch(0, 30), &branch(900, 20));
        assert_eq!(joined.height(), 3);
        assert_eq!(joined.num_children(), 2);
        assert_eq!(contents(&joined), (0..1500).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_taller_left_grafts_into_right_spine() {
        let left = tall(0, 3, 10);
        let joined = join_nodes(&left, &branch(900, 5));
        assert_eq!(joined.height(), 3);
        assert_eq!(joined.num_children(), 3);
        assert_eq!(joined.children()[2].num_children(), 15);
        assert!(ReferenceCounter::ptr_eq(&joined.children()[0], &left.children()[0]));
        assert_eq!(contents(&joined), (0..1050).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_taller_right_adopts_on_left_spine() {
        let right = tall(150, 2, 40);
        let joined = join_nodes(&branch(0, 5), &right);
        assert_eq!(joined.height(), 3);
        assert_eq!(joined.num_children(), 3);
        assert_eq!(joined.children()[0].num_children(), 5);
        assert_eq!(contents(&joined), (0..2550).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_full_edge_adopts_shorter_as_new_child() {
        let left = tall(0, 2, 40);
        let joined = join_nodes(&left, &branch(2400, 10));
        assert_eq!(joined.height(), 3);
        assert_eq!(joined.num_children(), 3);
        assert_eq!(contents(&joined), (0..2700).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_no_room_anywhere_adds_skinny_ancestor_under_new_root() {
        let children = MAX_NODE_LENGTH - 1;
        let left = tall(0, children, 40);
        let right_start = children * 40 * 30;
        let joined = join_nodes(&left, &branch(right_start, 10));
        assert_eq!(joined.height(), 4);
        assert_eq!(joined.num_children(), 2);
        let skinny = &joined.children()[1];
        assert_eq!(skinny.height(), 3);
        assert_eq!(skinny.num_children(), 1);
        assert_eq!(contents(&joined), (0..right_start + 300).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_strict_ancestors_become_relaxed() {
        let leaves = (0..4).map(|index| leaf(index * 32, 32)).collect();
        let strict: NodeRef<usize> =
            ReferenceCounter::new(Node::Strict(Strict::new(2, leaves)));
        let joined = join_nodes(&strict, &branch(128, 2));
        assert!(matches!(joined.as_ref(), Node::Relaxed(_)));
        assert_eq!(contents(&joined), (0..188).collect::<Vec<_>>());
    }
}
