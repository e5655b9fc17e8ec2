//! Bounded top-K cache of the largest skips seen so far
//!
//! Entries are kept sorted strictly descending by skip. A new entry is
//! admitted while there is room, or when it beats the smallest retained
//! skip; the smallest is then dropped. Equal skips keep the earlier block.

mod huffman;

pub use huffman::{huffman_depth, HuffmanTree};

use tracing::trace;

/// Default number of cached back-links
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// One cached back-link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct CacheEntry {
    /// Block the link points at
    pub blocknum: usize,
    /// That block's skip distance
    pub skip: u64,
}

/// Fixed-capacity cache sorted descending by skip
#[derive(Debug, Clone)]
pub struct TopCache {
    entries: Vec<CacheEntry>,
    capacity: usize,
}

impl TopCache {
    /// Create an empty cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, largest skip first
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    /// Position of `blocknum` in skip order, if cached
    pub fn position(&self, blocknum: usize) -> Option<usize> {
        self.entries.iter().position(|e| e.blocknum == blocknum)
    }

    /// Whether `blocknum` is cached
    pub fn contains(&self, blocknum: usize) -> bool {
        self.position(blocknum).is_some()
    }

    /// Offer a block; returns whether it was admitted.
    pub fn offer(&mut self, blocknum: usize, skip: u64) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() == self.capacity
            && self.entries.last().is_some_and(|min| skip <= min.skip)
        {
            return false;
        }

        // First slot whose skip is not larger than ours
        let at = self.entries.partition_point(|e| e.skip > skip);
        if self.entries.get(at).is_some_and(|e| e.skip == skip) {
            return false;
        }

        self.entries.insert(at, CacheEntry { blocknum, skip });
        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop() {
                trace!(blocknum = evicted.blocknum, skip = evicted.skip, "evicted from cache");
            }
        }
        true
    }
}
