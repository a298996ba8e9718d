//! Leaf nodes: packed arrays of elements at height 1.

use super::MAX_NODE_LENGTH;
use super::node::{Node, Pushed, SplitNode};

/// A terminal node holding up to `MAX_NODE_LENGTH - 1` elements.
///
/// Leaves below the root hold between `MIN_NODE_LENGTH` and
/// `MAX_NODE_LENGTH - 1` elements. The root leaf may be shorter, down to empty.
pub(crate) struct Leaf<T> {
    items: Vec<T>,
}

impl<T> Leaf<T> {
    pub(crate) const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub(crate) const fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    #[inline]
    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> &T {
        &self.items[index]
    }

    /// Whether `count` more elements fit without splitting this leaf.
    #[inline]
    pub(crate) fn has_relaxed_capacity(&self, count: usize) -> bool {
        self.items.len() + count < MAX_NODE_LENGTH
    }
}

impl<T: Clone> Leaf<T> {
    pub(crate) fn from_slice(items: &[T]) -> Self {
        Self::from_vec(items.to_vec())
    }

    /// Copy-on-write replacement; returns the new leaf and the old element.
    pub(crate) fn replace(&self, index: usize, item: T) -> (Self, T) {
        let mut items = self.items.clone();
        let previous = std::mem::replace(&mut items[index], item);
        (Self::from_vec(items), previous)
    }

    /// Splits strictly inside the leaf. Both halves become leftovers, since a
    /// fragment of a leaf is generally too short to stand as a node.
    pub(crate) fn split_at(&self, index: usize) -> SplitNode<T> {
        debug_assert!(index > 0 && index < self.items.len());
        SplitNode {
            left: None,
            left_leftover: self.items[..index].to_vec(),
            right: None,
            right_leftover: self.items[index..].to_vec(),
        }
    }

    /// Splices `focus` in at `index`. When the result reaches
    /// `MAX_NODE_LENGTH` it is divided at the midpoint into two leaves.
    pub(crate) fn push_focus(&self, index: usize, focus: &[T]) -> Pushed<T> {
        let total = self.items.len() + focus.len();
        let mut items = Vec::with_capacity(total);
        items.extend_from_slice(&self.items[..index]);
        items.extend_from_slice(focus);
        items.extend_from_slice(&self.items[index..]);

        if total < MAX_NODE_LENGTH {
            return Pushed::One(Node::Leaf(Self::from_vec(items)));
        }
        Self::splice_and_split(items)
    }

    fn splice_and_split(mut items: Vec<T>) -> Pushed<T> {
        debug_assert!(items.len() < 2 * MAX_NODE_LENGTH - 1);
        let right = items.split_off(items.len() / 2);
        tracing::trace!(
            left = items.len(),
            right = right.len(),
            "leaf split while pushing focus"
        );
        Pushed::Two(
            Node::Leaf(Self::from_vec(items)),
            Node::Leaf(Self::from_vec(right)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::rrb_tree::MIN_NODE_LENGTH;
    use rstest::rstest;

    fn leaf_of(range: std::ops::Range<i32>) -> Leaf<i32> {
        Leaf::from_vec(range.collect())
    }

    #[rstest]
    fn test_replace_returns_previous_and_leaves_original() {
        let leaf = leaf_of(0..5);
        let (replaced, previous) = leaf.replace(2, 99);
        assert_eq!(previous, 2);
        assert_eq!(replaced.items(), &[0, 1, 99, 3, 4]);
        assert_eq!(leaf.items(), &[0, 1, 2, 3, 4]);
    }

    #[rstest]
    fn test_split_at_produces_leftovers_only() {
        let split = leaf_of(0..10).split_at(4);
        assert!(split.left.is_none());
        assert!(split.right.is_none());
        assert_eq!(split.left_leftover, vec![0, 1, 2, 3]);
        assert_eq!(split.right_leftover, vec![4, 5, 6, 7, 8, 9]);
    }

    #[rstest]
    fn test_push_focus_grows_in_place_when_it_fits() {
        let leaf = leaf_of(0..4);
        match leaf.push_focus(2, &[10, 11]) {
            Pushed::One(Node::Leaf(grown)) => assert_eq!(grown.items(), &[0, 1, 10, 11, 2, 3]),
            _ => panic!("expected a single grown leaf"),
        }
    }

    #[rstest]
    #[case(43, 1)]
    #[case(22, 22)]
    #[case(43, 43)]
    fn test_push_focus_splits_into_valid_halves(#[case] leaf_length: i32, #[case] focus_length: i32) {
        let leaf = leaf_of(0..leaf_length);
        let focus: Vec<i32> = (100..100 + focus_length).collect();
        match leaf.push_focus(leaf.len(), &focus) {
            Pushed::Two(Node::Leaf(left), Node::Leaf(right)) => {
                for half in [&left, &right] {
                    assert!(half.len() >= MIN_NODE_LENGTH);
                    assert!(half.len() < MAX_NODE_LENGTH);
                }
                let joined: Vec<i32> = left.items().iter().chain(right.items()).copied().collect();
                let expected: Vec<i32> = (0..leaf_length).chain(focus).collect();
                assert_eq!(joined, expected);
            }
            _ => panic!("expected two leaves"),
        }
    }

    #[rstest]
    fn test_has_relaxed_capacity_boundary() {
        let leaf = leaf_of(0..40);
        assert!(leaf.has_relaxed_capacity(3));
        assert!(!leaf.has_relaxed_capacity(4));
    }
}
