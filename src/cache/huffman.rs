//! Huffman depth encoding over cache entries
//!
//! Frequently useful back-links (large skips) get short codes. We only
//! ever need the depth of one entry, so each merged node just remembers
//! how far below it the target sits, if at all.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::CacheEntry;

/// Heap item: (weight, insertion order, depth of target below this node)
type Item = Reverse<(u64, usize, Option<usize>)>;

/// Huffman tree over a set of weighted entries, tracking one target leaf
#[derive(Debug)]
pub struct HuffmanTree {
    heap: BinaryHeap<Item>,
    next_seq: usize,
}

impl HuffmanTree {
    /// Seed with cache entries weighted by skip; `target` marks the leaf we
    /// want the depth of.
    pub fn new(entries: &[CacheEntry], target: usize) -> Self {
        let heap = entries
            .iter()
            .enumerate()
            .map(|(seq, e)| Reverse((e.skip, seq, (e.blocknum == target).then_some(0))))
            .collect();
        Self {
            heap,
            next_seq: entries.len(),
        }
    }

    /// Merge the two lightest nodes until one remains; returns the target's
    /// depth under the final root.
    pub fn target_depth(mut self) -> Option<usize> {
        while self.heap.len() > 1 {
            let (Some(Reverse((w1, _, d1))), Some(Reverse((w2, _, d2)))) =
                (self.heap.pop(), self.heap.pop())
            else {
                break;
            };
            let depth = d1.or(d2).map(|d| d + 1);
            self.heap
                .push(Reverse((w1.saturating_add(w2), self.next_seq, depth)));
            self.next_seq += 1;
        }
        self.heap.pop().and_then(|Reverse((_, _, depth))| depth)
    }
}

/// Depth of `target` in the Huffman tree over `entries`
pub fn huffman_depth(entries: &[CacheEntry], target: usize) -> Option<usize> {
    HuffmanTree::new(entries, target).target_depth()
}
