//! Arena node for the incremental tree
//!
//! Node = (value, depth, fixed, [left, right])
//! Children are arena indices owned by exactly one parent slot.

use std::fmt;

/// Index of a node inside an [`IncrementalTree`](super::IncrementalTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// Which child slot of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// Slot 0, preferred on insertion
    Left,
    /// Slot 1
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Tree node holding one block index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Block index stored here
    pub value: usize,

    /// Distance from the root
    pub depth: usize,

    /// Cached "subtree filled to max depth" flag; never reset once set
    pub(crate) fixed: bool,

    pub(crate) children: [Option<NodeId>; 2],
}

impl Node {
    pub(crate) fn new(value: usize, depth: usize) -> Self {
        Self {
            value,
            depth,
            fixed: false,
            children: [None, None],
        }
    }

    /// Check if leaf (no children)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Whether the fixed flag has been cached for this node
    #[inline]
    pub fn is_marked_fixed(&self) -> bool {
        self.fixed
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.value, self.depth)?;
        if self.fixed {
            write!(f, "*")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unfixed_leaf() {
        let node = Node::new(7, 3);
        assert!(node.is_leaf());
        assert!(!node.is_marked_fixed());
        assert_eq!(node.children, [None, None]);
        assert_eq!(node.to_string(), "7@3");
    }
}
