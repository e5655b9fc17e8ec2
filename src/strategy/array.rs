//! In-order external-node tree
//!
//! ```text
//!         ^
//!        / \
//!       /\  \
//!      /  \  \
//!     /\  /\  \
//!    0  1 2  3  4
//! ```
//!
//! Values live only in leaves, so the proof is one sibling per level.

use crate::tree::Span;

/// Depth of leaf `to` in the array tree over `0..from`
pub fn array_proof_len(from: usize, to: usize) -> u64 {
    Span::root(from).depth_of(to) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_leaf_needs_nothing() {
        assert_eq!(array_proof_len(1, 0), 0);
    }

    #[test]
    fn test_recent_leaf_beats_old_leaf() {
        assert_eq!(array_proof_len(5, 0), 3);
        assert_eq!(array_proof_len(5, 4), 1);
        assert_eq!(array_proof_len(2, 1), 1);
    }
}
