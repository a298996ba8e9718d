//! Diagnostics: an indented structure dump and the consistency check.

use std::fmt::{self, Debug, Display, Formatter};

use super::error::InvariantViolation;
use super::focus::FOCUS_CAPACITY;
use super::node::Node;
use super::state::TreeState;
use super::{MAX_NODE_LENGTH, MIN_NODE_LENGTH, STRICT_NODE_LENGTH};

const INDENT: &str = "  ";

/// Renders the whole tree: one header line for the focus, then one line per
/// node, children indented under their parent.
pub(crate) fn indent_string<T: Debug>(state: &TreeState<T>) -> String {
    TreeDump(state).to_string()
}

struct TreeDump<'a, T>(&'a TreeState<T>);

impl<T: Debug> Display for TreeDump<'_, T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let focus = state.focus();
        writeln!(
            formatter,
            "RrbTree(size={}, focus_start={}, focus={:?})",
            state.len(),
            focus.start_index(),
            focus.as_slice()
        )?;
        NodeDump {
            node: state.root().as_ref(),
            depth: 1,
        }
        .fmt(formatter)
    }
}

struct NodeDump<'a, T> {
    node: &'a Node<T>,
    depth: usize,
}

impl<T: Debug> Display for NodeDump<'_, T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            formatter.write_str(INDENT)?;
        }
        match self.node {
            Node::Leaf(leaf) => {
                return writeln!(formatter, "Leaf(size={}) {:?}", leaf.len(), leaf.items());
            }
            Node::Strict(strict) => writeln!(
                formatter,
                "Strict(height={}, size={}, children={})",
                strict.height(),
                strict.size(),
                strict.nodes().len()
            )?,
            Node::Relaxed(relaxed) => writeln!(
                formatter,
                "Relaxed(height={}, size={}, cumulative_sizes={:?})",
                relaxed.height(),
                relaxed.size(),
                relaxed.cumulative_sizes()
            )?,
        }
        for child in self.node.children() {
            NodeDump {
                node: child.as_ref(),
                depth: self.depth + 1,
            }
            .fmt(formatter)?;
        }
        Ok(())
    }
}

/// Walks the whole tree and reports the first broken invariant.
pub(crate) fn check_tree<T: Debug>(state: &TreeState<T>) -> Result<(), InvariantViolation> {
    let root = state.root();
    let focus = state.focus();
    let whole = || indent_string(state);

    if state.len() != root.size() + focus.len() {
        return Err(InvariantViolation::new(
            format!(
                "size {} differs from root size {} plus focus length {}",
                state.len(),
                root.size(),
                focus.len()
            ),
            whole(),
        ));
    }
    if focus.start_index() > root.size() {
        return Err(InvariantViolation::new(
            format!(
                "focus starts at {} past the {} tree elements",
                focus.start_index(),
                root.size()
            ),
            whole(),
        ));
    }
    if focus.len() > FOCUS_CAPACITY {
        return Err(InvariantViolation::new(
            format!("focus holds {} elements", focus.len()),
            whole(),
        ));
    }
    if !root.is_leaf() && root.num_children() < 2 {
        return Err(InvariantViolation::new(
            "root branch has a single child".to_owned(),
            whole(),
        ));
    }
    check_node(root, true)
}

fn check_node<T: Debug>(node: &Node<T>, is_root: bool) -> Result<(), InvariantViolation> {
    let violation = |message: String| {
        Err(InvariantViolation::new(
            message,
            NodeDump { node, depth: 0 }.to_string(),
        ))
    };

    match node {
        Node::Leaf(leaf) => {
            if leaf.len() >= MAX_NODE_LENGTH {
                return violation(format!("leaf holds {} elements", leaf.len()));
            }
            if !is_root && leaf.len() < MIN_NODE_LENGTH {
                return violation(format!("inner leaf holds only {} elements", leaf.len()));
            }
            return Ok(());
        }
        Node::Strict(strict) => {
            let nodes = strict.nodes();
            if nodes.is_empty() || nodes.len() > STRICT_NODE_LENGTH {
                return violation(format!("strict node has {} children", nodes.len()));
            }
            let total: usize = nodes.iter().map(|child| child.size()).sum();
            if total != strict.size() {
                return violation(format!(
                    "strict node records size {} but its children hold {total}",
                    strict.size()
                ));
            }
            for (position, child) in nodes.iter().enumerate() {
                if matches!(child.as_ref(), Node::Relaxed(_)) {
                    return violation(format!("strict node has a relaxed child at {position}"));
                }
                let is_last = position + 1 == nodes.len();
                if (!is_last && child.size() != strict.child_capacity())
                    || child.size() > strict.child_capacity()
                {
                    return violation(format!(
                        "strict child {position} holds {} of {} elements",
                        child.size(),
                        strict.child_capacity()
                    ));
                }
            }
        }
        Node::Relaxed(relaxed) => {
            let nodes = relaxed.nodes();
            let cumulative_sizes = relaxed.cumulative_sizes();
            if nodes.is_empty() || nodes.len() >= MAX_NODE_LENGTH {
                return violation(format!("relaxed node has {} children", nodes.len()));
            }
            if cumulative_sizes.len() != nodes.len() {
                return violation(format!(
                    "{} cumulative sizes for {} children",
                    cumulative_sizes.len(),
                    nodes.len()
                ));
            }
            let mut total = 0;
            for (position, (child, &cumulative)) in nodes.iter().zip(cumulative_sizes).enumerate()
            {
                if child.size() == 0 {
                    return violation(format!("relaxed child {position} is empty"));
                }
                total += child.size();
                if cumulative != total {
                    return violation(format!(
                        "cumulative size {cumulative} at {position}, expected {total}"
                    ));
                }
            }
        }
    }

    for (position, child) in node.children().iter().enumerate() {
        if child.height() + 1 != node.height() {
            return violation(format!(
                "child {position} has height {} under height {}",
                child.height(),
                node.height()
            ));
        }
        check_node(child, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::rrb_tree::ReferenceCounter;
    use crate::persistent::rrb_tree::leaf::Leaf;
    use crate::persistent::rrb_tree::relaxed::Relaxed;
    use rstest::rstest;

    fn build(length: usize) -> TreeState<usize> {
        let mut state = TreeState::new();
        for item in 0..length {
            state.append(item);
        }
        state
    }

    #[rstest]
    #[case(0)]
    #[case(10)]
    #[case(100)]
    #[case(2000)]
    fn test_built_trees_pass(#[case] length: usize) {
        assert_eq!(check_tree(&build(length)), Ok(()));
    }

    #[rstest]
    fn test_split_and_joined_trees_pass() {
        let (left, right) = build(3000).split(1234).unwrap();
        assert_eq!(check_tree(&left), Ok(()));
        assert_eq!(check_tree(&right), Ok(()));
        assert_eq!(check_tree(&right.join(left)), Ok(()));
    }

    #[rstest]
    fn test_short_inner_leaf_is_reported_with_dump() {
        let leaf = |length: usize| ReferenceCounter::new(Node::Leaf(Leaf::from_vec(vec![0; length])));
        let relaxed = Node::Relaxed(Relaxed::from_nodes(2, vec![leaf(30), leaf(5)]));
        let violation = check_node(&relaxed, true).unwrap_err();
        assert_eq!(violation.message, "inner leaf holds only 5 elements");
        assert!(violation.dump.starts_with("Leaf(size=5)"));
    }

    #[rstest]
    fn test_indent_string_lists_nodes_by_depth() {
        let dump = indent_string(&build(70));
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("RrbTree(size=70, focus_start=64, focus=[64, 65"));
        assert_eq!(lines[1], "  Strict(height=2, size=64, children=2)");
        assert!(lines[2].starts_with("    Leaf(size=32) [0, 1, 2"));
    }
}
