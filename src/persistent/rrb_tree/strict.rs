//! Strict branch nodes, indexed by bit shifting.

use super::node::{Node, NodeRef, SplitNode, cut_children, skinny_strict};
use super::relaxed::Relaxed;
use super::{NODE_LENGTH_POW_2, ReferenceCounter, STRICT_NODE_LENGTH};

/// A perfectly packed branch.
///
/// Every child but the last holds exactly `1 << shift` elements, so the child
/// owning an index is `index >> shift` with no size table. The last child
/// holds at most that many. All children share height `height - 1`.
pub(crate) struct Strict<T> {
    height: usize,
    size: usize,
    nodes: Vec<NodeRef<T>>,
}

impl<T> Strict<T> {
    pub(crate) fn new(height: usize, nodes: Vec<NodeRef<T>>) -> Self {
        debug_assert!(height >= 2);
        let size = nodes.iter().map(|node| node.size()).sum();
        Self {
            height,
            size,
            nodes,
        }
    }

    #[inline]
    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn nodes(&self) -> &[NodeRef<T>] {
        &self.nodes
    }

    /// Bits of an index consumed below this node.
    #[inline]
    pub(crate) const fn shift(&self) -> usize {
        NODE_LENGTH_POW_2 * (self.height - 1)
    }

    /// Elements held by each full child.
    #[inline]
    pub(crate) const fn child_capacity(&self) -> usize {
        1 << self.shift()
    }

    /// Whether this node holds `STRICT_NODE_LENGTH` full children.
    pub(crate) const fn is_full(&self) -> bool {
        self.size == self.child_capacity() * STRICT_NODE_LENGTH
    }

    pub(crate) fn get(&self, index: usize) -> &T {
        let child = index >> self.shift();
        self.nodes[child].get(index & (self.child_capacity() - 1))
    }

    pub(crate) const fn locate_insert(&self, index: usize) -> (usize, usize) {
        if index == 0 {
            return (0, 0);
        }
        let child = (index - 1) >> self.shift();
        (child, index - (child << self.shift()))
    }

    pub(crate) fn has_strict_capacity(&self) -> bool {
        let Some(last) = self.nodes.last() else {
            return false;
        };
        if last.has_strict_capacity() {
            return true;
        }
        self.nodes.len() < STRICT_NODE_LENGTH && last.size() == self.child_capacity()
    }

    /// Appends a full leaf. Requires `has_strict_capacity()`.
    pub(crate) fn append_leaf(&self, leaf: NodeRef<T>) -> Self {
        debug_assert!(self.has_strict_capacity());
        let mut nodes = self.nodes.clone();
        let last = nodes.len() - 1;
        if let Node::Strict(child) = nodes[last].as_ref()
            && child.has_strict_capacity()
        {
            nodes[last] = ReferenceCounter::new(Node::Strict(child.append_leaf(leaf)));
        } else {
            nodes.push(skinny_strict(leaf, self.height - 1));
        }
        Self {
            height: self.height,
            size: self.size + STRICT_NODE_LENGTH,
            nodes,
        }
    }

    /// Inserts a full leaf at the leaf boundary `index` (below `size()`).
    ///
    /// Every child left of the target must stay full, so the leaf can only
    /// land in the last bottom-level branch, and only while it has fewer than
    /// `STRICT_NODE_LENGTH` leaves. `None` otherwise.
    pub(crate) fn insert_leaf(&self, index: usize, leaf: NodeRef<T>) -> Option<Self> {
        debug_assert!(index % STRICT_NODE_LENGTH == 0 && index < self.size);
        let mut nodes = self.nodes.clone();
        if self.height == 2 {
            if nodes.len() >= STRICT_NODE_LENGTH {
                return None;
            }
            nodes.insert(index >> self.shift(), leaf);
        } else {
            let last = nodes.len() - 1;
            let start = last << self.shift();
            let Node::Strict(child) = nodes[last].as_ref() else {
                return None;
            };
            if index < start {
                return None;
            }
            let child = child.insert_leaf(index - start, leaf)?;
            nodes[last] = ReferenceCounter::new(Node::Strict(child));
        }
        Some(Self {
            height: self.height,
            size: self.size + STRICT_NODE_LENGTH,
            nodes,
        })
    }

    /// One-way conversion to the relaxed representation.
    pub(crate) fn relax(&self) -> Relaxed<T> {
        Relaxed::from_nodes(self.height, self.nodes.clone())
    }
}

impl<T: Clone> Strict<T> {
    pub(crate) fn replace(&self, index: usize, item: T) -> (Self, T) {
        let child = index >> self.shift();
        let (node, previous) =
            self.nodes[child].replace(index & (self.child_capacity() - 1), item);
        let mut nodes = self.nodes.clone();
        nodes[child] = ReferenceCounter::new(node);
        (
            Self {
                height: self.height,
                size: self.size,
                nodes,
            },
            previous,
        )
    }

    /// Splits strictly inside this node.
    ///
    /// The left half keeps every full child it had, so it stays strict. The
    /// right half stays strict only when the cut falls on a child boundary.
    pub(crate) fn split_at(&self, index: usize) -> SplitNode<T> {
        let child = index >> self.shift();
        let sub_index = index & (self.child_capacity() - 1);
        let (left, right, split) = cut_children(&self.nodes, child, sub_index);

        let left = (!left.is_empty())
            .then(|| ReferenceCounter::new(Node::Strict(Self::new(self.height, left))));
        let right = (!right.is_empty()).then(|| {
            if sub_index == 0 {
                ReferenceCounter::new(Node::Strict(Self::new(self.height, right)))
            } else {
                ReferenceCounter::new(Node::Relaxed(Relaxed::from_nodes(self.height, right)))
            }
        });
        SplitNode {
            left,
            left_leftover: split.left_leftover,
            right,
            right_leftover: split.right_leftover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::rrb_tree::leaf::Leaf;
    use rstest::rstest;

    fn full_leaf(start: usize) -> NodeRef<usize> {
        ReferenceCounter::new(Node::Leaf(Leaf::from_vec((start..start + 32).collect())))
    }

    fn strict_with(leaves: usize) -> Strict<usize> {
        Strict::new(2, (0..leaves).map(|index| full_leaf(index * 32)).collect())
    }

    #[rstest]
    #[case(0)]
    #[case(31)]
    #[case(32)]
    #[case(100)]
    #[case(127)]
    fn test_get_by_shift(#[case] index: usize) {
        let strict = strict_with(4);
        assert_eq!(*strict.get(index), index);
    }

    #[rstest]
    #[case(0, (0, 0))]
    #[case(32, (0, 32))]
    #[case(33, (1, 1))]
    #[case(128, (3, 32))]
    fn test_locate_insert_prefers_left_child(#[case] index: usize, #[case] expected: (usize, usize)) {
        assert_eq!(strict_with(4).locate_insert(index), expected);
    }

    #[rstest]
    fn test_strict_capacity_and_fullness() {
        assert!(strict_with(31).has_strict_capacity());
        assert!(!strict_with(32).has_strict_capacity());
        assert!(strict_with(32).is_full());
        assert!(!strict_with(31).is_full());
    }

    #[rstest]
    fn test_append_leaf_descends_into_strict_last_child() {
        let lower = strict_with(3);
        let upper = Strict::new(
            3,
            vec![
                ReferenceCounter::new(Node::Strict(strict_with(32))),
                ReferenceCounter::new(Node::Strict(lower)),
            ],
        );
        assert!(upper.has_strict_capacity());
        let appended = upper.append_leaf(full_leaf(1024 + 96));
        assert_eq!(appended.size(), 1024 + 128);
        assert_eq!(appended.nodes().len(), 2);
        assert_eq!(appended.nodes()[1].num_children(), 4);
        assert_eq!(*appended.get(1024 + 100), 1024 + 100);
    }

    #[rstest]
    fn test_insert_leaf_on_boundary_shifts_later_leaves() {
        let strict = strict_with(3);
        let inserted = strict.insert_leaf(32, full_leaf(500)).unwrap();
        assert_eq!(inserted.size(), 128);
        assert_eq!(*inserted.get(31), 31);
        assert_eq!(*inserted.get(32), 500);
        assert_eq!(*inserted.get(64), 32);
        assert_eq!(*inserted.get(127), 95);
        assert!(ReferenceCounter::ptr_eq(&strict.nodes()[2], &inserted.nodes()[3]));
    }

    #[rstest]
    fn test_insert_leaf_needs_room_in_last_branch() {
        assert!(strict_with(32).insert_leaf(64, full_leaf(0)).is_none());
        let upper = Strict::new(
            3,
            vec![
                ReferenceCounter::new(Node::Strict(strict_with(32))),
                ReferenceCounter::new(Node::Strict(strict_with(2))),
            ],
        );
        assert!(upper.insert_leaf(512, full_leaf(0)).is_none());
        let inserted = upper.insert_leaf(1056, full_leaf(5000)).unwrap();
        assert_eq!(inserted.nodes()[1].num_children(), 3);
        assert_eq!(*inserted.get(1056), 5000);
        assert_eq!(*inserted.get(1088), 32);
    }

    #[rstest]
    fn test_replace_is_copy_on_write() {
        let strict = strict_with(2);
        let (replaced, previous) = strict.replace(40, 999);
        assert_eq!(previous, 40);
        assert_eq!(*replaced.get(40), 999);
        assert_eq!(*strict.get(40), 40);
        assert!(ReferenceCounter::ptr_eq(&strict.nodes()[0], &replaced.nodes()[0]));
    }

    #[rstest]
    fn test_split_on_boundary_keeps_both_halves_strict() {
        let split = strict_with(4).split_at(64);
        assert!(matches!(split.left.as_deref(), Some(Node::Strict(_))));
        assert!(matches!(split.right.as_deref(), Some(Node::Strict(_))));
        assert!(split.left_leftover.is_empty());
        assert!(split.right_leftover.is_empty());
    }

    #[rstest]
    fn test_split_inside_leaf_relaxes_right_half() {
        let split = strict_with(4).split_at(70);
        assert!(matches!(split.left.as_deref(), Some(Node::Strict(_))));
        assert!(matches!(split.right.as_deref(), Some(Node::Relaxed(_))));
        assert_eq!(split.left_leftover.len(), 6);
        assert_eq!(split.right_leftover.len(), 26);
        assert_eq!(split.size(), 128);
    }

    #[rstest]
    fn test_relax_preserves_contents() {
        let relaxed = strict_with(3).relax();
        assert_eq!(relaxed.size(), 96);
        assert_eq!(*relaxed.get(95), 95);
    }
}
