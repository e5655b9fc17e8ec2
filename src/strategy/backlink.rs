//! Single-backlink baseline
//!
//! Every block commits to its predecessor and to exactly one older block
//! picked by a fixed bit rule, so a skip list emerges without any tree.

use crate::util::clear_lowest_bit;

/// Structural skip target of the block at `height`
pub fn skip_height(height: usize) -> usize {
    if height < 2 {
        return 0;
    }
    if height & 1 == 1 {
        clear_lowest_bit(clear_lowest_bit(height - 1)) + 1
    } else {
        clear_lowest_bit(height)
    }
}

/// One hash per hop, but only along the two links a block carries
pub fn single_backlink_hop(from: usize, to: usize) -> Option<u64> {
    (to + 1 == from || to == skip_height(from)).then_some(1)
}
