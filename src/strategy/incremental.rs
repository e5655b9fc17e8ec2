//! Incremental tree topology
//!
//! Values live in internal nodes, so a node at depth d costs
//! [`internal_node_cost`](super::internal_node_cost)`(d)` hashes.

use super::internal_node_cost;
use crate::tree::IncrementalTree;

/// Hashes to prove `to` in the incremental tree over `0..from`.
///
/// `tree` is reused when it holds exactly `0..from`; otherwise the tree is
/// rebuilt from scratch, which is O(from).
pub fn incremental_proof_len(from: usize, to: usize, tree: Option<&IncrementalTree>) -> Option<u64> {
    let depth = match tree {
        Some(tree) if tree.len() == from && tree.root_value() == from.checked_sub(1) => {
            tree.depth_of(to)
        }
        _ => IncrementalTree::from_range(0..from).depth_of(to),
    };
    depth.map(internal_node_cost)
}
