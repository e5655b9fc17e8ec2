//! Batched breadth-first subtrees
//!
//! Elements are grouped in batches; the batch under construction is a
//! breadth-first tree and completed batches hang off a left spine:
//!
//! ```text
//!              /\
//!             /  \
//!            /\   batch 3 (under construction)
//!           /  \
//!          /\   batch 2
//!         /  \
//!   batch 0   batch 1
//! ```
//!
//! The array flavour replaces the spine with an array tree over every
//! element of the completed batches.

use super::{array_proof_len, breadth_first_proof_len};

/// Default number of elements per batch
pub const DEFAULT_BATCH_SIZE: usize = 65_535;

/// How completed batches are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFlavour {
    /// Left spine, one hash per batch stepped over
    Breadth,
    /// Array tree over all completed elements
    Array,
}

/// Hashes to prove `to` when `from` elements are batched by `batch_size`
pub fn batch_proof_len(from: usize, to: usize, batch_size: usize, flavour: BatchFlavour) -> u64 {
    debug_assert!(batch_size > 0);

    let from_batch = from / batch_size;
    let to_batch = to / batch_size;

    if from_batch == to_batch {
        // Only the live batch so far: plain breadth-first tree
        let inner = breadth_first_proof_len(from, to);
        return if from < batch_size { inner } else { inner + 1 };
    }

    match flavour {
        BatchFlavour::Array => 1 + array_proof_len(from_batch * batch_size, to),
        BatchFlavour::Breadth => {
            let mut hops = 1 + from_batch - to_batch;
            // batch 0 is the bottom of the spine, no hash to its left
            if to_batch == 0 {
                hops -= 1;
            }
            hops as u64 + breadth_first_proof_len(batch_size, to % batch_size)
        }
    }
}
