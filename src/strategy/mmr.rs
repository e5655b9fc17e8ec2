//! Merkle Mountain Range
//!
//! `from` elements form one perfect mountain per set bit of `from`,
//! largest (oldest) first. Seven elements make three peaks:
//!
//! ```text
//!    (0)     (1)   (2)
//!    /\      /\     6
//!   /  \    4  5
//!  /\  /\
//! 0 1  2 3
//! ```
//!
//! The proof climbs from the peak to the root joining the peaks, then
//! descends the mountain.

use super::array_proof_len;

/// Mountain holding a given element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mountain {
    /// Peak number, 0 for the oldest
    pub index: usize,
    /// log2 of the mountain size
    pub height: u32,
    /// Number of mountains in total
    pub count: usize,
}

/// Find the mountain that element `to` of `from` lives in
pub fn locate_mountain(from: usize, to: usize) -> Mountain {
    debug_assert!(to < from);

    let count = from.count_ones() as usize;
    let mut offset = 0;
    let mut index = 0;
    for height in (0..usize::BITS).rev() {
        let size = 1usize << height;
        if from & size == 0 {
            continue;
        }
        offset += size;
        if to < offset {
            return Mountain {
                index,
                height,
                count,
            };
        }
        index += 1;
    }
    unreachable!("element {to} beyond {from} elements")
}

/// Peaks joined by an array tree: recent peaks are cheap
pub fn mmr_proof_len(from: usize, to: usize) -> u64 {
    let mountain = locate_mountain(from, to);
    array_proof_len(mountain.count, mountain.index) + u64::from(mountain.height)
}

/// Peaks chained newest first: `root = H(peak_n, H(peak_n-1, ...))`.
///
/// The oldest peak is the tail of the chain and shares the last link's
/// cost with its successor.
pub fn linear_mmr_proof_len(from: usize, to: usize) -> u64 {
    let mountain = locate_mountain(from, to);
    (mountain.count - mountain.index.max(1)) as u64 + u64::from(mountain.height)
}
