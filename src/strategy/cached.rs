//! Cache-augmented mountain ranges
//!
//! The blocks with the largest skips are the ones proofs keep landing on,
//! so they get a dedicated Huffman-coded commitment weighted by skip. Any
//! other block costs one extra hash to step past that commitment into the
//! underlying mountain range.

use crate::cache::{huffman_depth, TopCache};

/// Hashes to prove `to` through `cache`, else through `fallback`.
///
/// While the chain is no longer than the cache, the cache would just
/// repeat history and `fallback` is used directly.
pub fn cached_proof_len(
    from: usize,
    to: usize,
    cache: &TopCache,
    fallback: fn(usize, usize) -> u64,
) -> u64 {
    if from <= cache.capacity() {
        return fallback(from, to);
    }
    if !cache.contains(to) {
        return 1 + fallback(from, to);
    }
    match huffman_depth(cache.entries(), to) {
        Some(depth) => 1 + depth as u64,
        None => 1 + fallback(from, to),
    }
}
