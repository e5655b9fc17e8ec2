//! Incremental self-balancing tree
//!
//! Keeps the most recently inserted values near the root while only ever
//! growing at the bottom. A subtree is *fixed* once it is completely filled
//! down to the current max depth: nothing below a fixed node ever moves
//! again. When the whole tree is fixed a new root is stacked on top.
//!
//! The newest value always sits at the root; on insertion values are
//! swapped down the path, preferring the left child until it is fixed.
//!
//! Nodes live in an arena and are addressed by index.

mod interval;
mod node;

pub use interval::Span;
pub use node::Node;

use node::{NodeId, Side};

use std::mem;
use std::ops::Range;

use thiserror::Error;

/// Structural consistency errors reported by [`IncrementalTree::validate`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Stored depth disagrees with the node's distance from the root.
    #[error("node {value} stores depth {stored} but sits at depth {actual}")]
    DepthMismatch {
        /// Value held by the node
        value: usize,
        /// Depth recorded in the node
        stored: usize,
        /// Depth found by walking from the root
        actual: usize,
    },

    /// Node lies below the tree's max depth.
    #[error("node {value} at depth {depth} exceeds max depth {max_depth}")]
    TooDeep {
        /// Value held by the node
        value: usize,
        /// Its depth
        depth: usize,
        /// Current max depth of the tree
        max_depth: usize,
    },

    /// Root does not hold the most recently inserted value.
    #[error("root holds {found:?}, expected {expected}")]
    RootMismatch {
        /// Value that should be at the root
        expected: usize,
        /// Value actually found there
        found: Option<usize>,
    },

    /// Arena contains nodes not reachable (exactly once) from the root.
    #[error("{reachable} of {total} nodes reachable from the root")]
    Unreachable {
        /// Nodes visited from the root
        reachable: usize,
        /// Nodes in the arena
        total: usize,
    },

    /// Fixed flag cached on a subtree that is not completely filled.
    #[error("node {value} is marked fixed but its subtree is incomplete")]
    FalselyFixed {
        /// Value held by the node
        value: usize,
    },
}

/// What a single insertion did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertOutcome {
    /// Values swapped on the way down
    pub swaps: usize,

    /// Whether a new root level was stacked on top
    pub grew: bool,
}

/// Incrementally balanced tree of block indices
#[derive(Debug, Clone, Default)]
pub struct IncrementalTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    max_depth: usize,
}

impl IncrementalTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree after inserting every value of `values` in order
    pub fn from_range(values: Range<usize>) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(values.len()),
            ..Self::default()
        };
        for value in values {
            tree.insert(value);
        }
        tree
    }

    /// Number of values stored
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth every fixed leaf sits at
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Value at the root (the newest insertion)
    pub fn root_value(&self) -> Option<usize> {
        self.root.map(|id| self.nodes[id.0].value)
    }

    fn alloc(&mut self, value: usize, depth: usize) -> NodeId {
        self.nodes.push(Node::new(value, depth));
        NodeId(self.nodes.len() - 1)
    }

    fn attach(&mut self, parent: NodeId, side: Side, value: usize) {
        let depth = self.nodes[parent.0].depth + 1;
        let child = self.alloc(value, depth);
        self.nodes[parent.0].children[side.slot()] = Some(child);
    }

    /// Whether the subtree at `id` is filled down to max depth.
    ///
    /// A true answer is cached on the node.
    fn is_fixed(&mut self, id: NodeId) -> bool {
        let Node {
            fixed,
            depth,
            children,
            ..
        } = self.nodes[id.0];
        if fixed {
            return true;
        }
        if depth == self.max_depth {
            self.nodes[id.0].fixed = true;
            return true;
        }

        let [Some(left), Some(right)] = children else {
            return false;
        };
        let fixed = self.is_fixed(left) && self.is_fixed(right);
        if fixed {
            self.nodes[id.0].fixed = true;
        }
        fixed
    }

    /// Insert `value` as the newest element
    pub fn insert(&mut self, value: usize) -> InsertOutcome {
        let Some(root) = self.root else {
            self.root = Some(self.alloc(value, 0));
            self.max_depth = 0;
            return InsertOutcome::default();
        };

        if self.is_fixed(root) {
            for node in &mut self.nodes {
                node.depth += 1;
            }
            self.max_depth += 1;
            let top = self.alloc(value, 0);
            self.nodes[top.0].children[0] = Some(root);
            self.root = Some(top);
            return InsertOutcome {
                swaps: 0,
                grew: true,
            };
        }

        let mut carried = value;
        let mut at = root;
        let mut swaps = 0;
        loop {
            carried = mem::replace(&mut self.nodes[at.0].value, carried);
            swaps += 1;

            let [left, right] = self.nodes[at.0].children;
            at = match left {
                None => {
                    self.attach(at, Side::Left, carried);
                    break;
                }
                Some(left) if !self.is_fixed(left) => left,
                Some(_) => match right {
                    None => {
                        self.attach(at, Side::Right, carried);
                        break;
                    }
                    Some(right) => {
                        debug_assert!(!self.is_fixed(right), "descending into fixed subtree");
                        right
                    }
                },
            };
        }

        InsertOutcome { swaps, grew: false }
    }

    /// Brute-force search from the root, left first.
    pub fn find(&self, value: usize) -> Option<&Node> {
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.value == value {
                return Some(node);
            }
            stack.extend(node.children.iter().rev().flatten());
        }
        None
    }

    /// Depth of `value`, if present
    pub fn depth_of(&self, value: usize) -> Option<usize> {
        self.find(value).map(|node| node.depth)
    }

    fn is_complete(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        if node.depth == self.max_depth {
            return true;
        }
        match node.children {
            [Some(left), Some(right)] => self.is_complete(left) && self.is_complete(right),
            _ => false,
        }
    }

    /// Check structural invariants, with `newest` expected at the root.
    ///
    /// An empty tree is always valid.
    pub fn validate(&self, newest: usize) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            return Ok(());
        };

        let found = self.nodes[root.0].value;
        if found != newest {
            return Err(TreeError::RootMismatch {
                expected: newest,
                found: Some(found),
            });
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut reachable = 0;
        let mut stack = vec![(root, 0usize)];
        while let Some((id, actual)) = stack.pop() {
            if mem::replace(&mut seen[id.0], true) {
                return Err(TreeError::Unreachable {
                    reachable,
                    total: self.nodes.len(),
                });
            }
            reachable += 1;

            let node = &self.nodes[id.0];
            if node.depth != actual {
                return Err(TreeError::DepthMismatch {
                    value: node.value,
                    stored: node.depth,
                    actual,
                });
            }
            if node.depth > self.max_depth {
                return Err(TreeError::TooDeep {
                    value: node.value,
                    depth: node.depth,
                    max_depth: self.max_depth,
                });
            }
            if node.fixed && !self.is_complete(id) {
                return Err(TreeError::FalselyFixed { value: node.value });
            }
            stack.extend(node.children.iter().flatten().map(|&child| (child, actual + 1)));
        }

        if reachable != self.nodes.len() {
            return Err(TreeError::Unreachable {
                reachable,
                total: self.nodes.len(),
            });
        }
        Ok(())
    }

    /// Release every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.max_depth = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depths(tree: &IncrementalTree, upto: usize) -> Vec<usize> {
        (0..upto).map(|v| tree.depth_of(v).unwrap()).collect()
    }

    #[test]
    fn test_first_insert_is_root() {
        let mut tree = IncrementalTree::new();
        assert_eq!(tree.insert(0), InsertOutcome::default());
        assert_eq!(tree.root_value(), Some(0));
        assert_eq!(tree.max_depth(), 0);
        tree.validate(0).unwrap();
    }

    #[test]
    fn test_seven_inserts_fill_two_levels() {
        let tree = IncrementalTree::from_range(0..7);
        // 6 at the root, [2 [0, 1]] on the left, [5 [3, 4]] on the right
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(depths(&tree, 7), vec![2, 2, 1, 2, 2, 1, 0]);
        tree.validate(6).unwrap();
    }

    #[test]
    fn test_swap_counts() {
        let mut tree = IncrementalTree::from_range(0..5);
        let outcome = tree.insert(5);
        assert_eq!(outcome, InsertOutcome { swaps: 2, grew: false });
        let outcome = tree.insert(6);
        assert_eq!(outcome.swaps, 2);
        let outcome = tree.insert(7);
        assert!(outcome.grew);
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn test_validate_catches_corruption() {
        let mut tree = IncrementalTree::from_range(0..6);
        assert_eq!(
            tree.validate(4),
            Err(TreeError::RootMismatch {
                expected: 4,
                found: Some(5)
            })
        );

        tree.nodes[1].depth += 1;
        assert!(matches!(
            tree.validate(5),
            Err(TreeError::DepthMismatch { .. })
        ));
    }

    #[test]
    fn test_clear_releases_nodes() {
        let mut tree = IncrementalTree::from_range(0..100);
        assert_eq!(tree.len(), 100);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.root_value(), None);
        assert_eq!(tree.find(3), None);
    }
}
