//! Pricing the shared shortest path under each topology
//!
//! The path is fixed by [`Chain::grow`]; every topology then sums its own
//! cost per hop. Cache and incremental-tree state at each hop must match
//! what the chain had built by then, so both are replayed block by block
//! in height order.

use tracing::debug;

use super::Chain;
use crate::cache::TopCache;
use crate::strategy::{ProofContext, Topology};
use crate::tree::IncrementalTree;

/// Total hashes one topology needs along the shared path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct PathCost {
    /// Topology priced
    pub topology: Topology,
    /// Sum over all hops; `None` if a hop uses a link the topology lacks
    pub hashes: Option<u64>,
}

/// Price the shortest path of `chain` under every topology in `topologies`
pub fn price_path(
    chain: &Chain,
    topologies: &[Topology],
    cache_capacity: usize,
    batch_size: usize,
) -> Vec<PathCost> {
    let hops = chain.hops();
    let needs_tree = topologies.contains(&Topology::Incremental);
    let needs_cache = topologies.iter().any(|t| t.uses_cache());
    let mut totals: Vec<Option<u64>> = vec![Some(0); topologies.len()];
    let mut tree = IncrementalTree::new();
    let mut cache = TopCache::new(cache_capacity);
    let mut pending = hops.iter().copied().peekable();

    for block in chain.blocks() {
        if pending.peek().is_none() {
            break;
        }
        let i = block.index;

        if let Some((from, to)) = pending.next_if(|&(from, _)| from == i) {
            let mut ctx = ProofContext::new(&cache, batch_size);
            if needs_tree {
                ctx = ctx.with_tree(&tree);
            }
            for (total, topology) in totals.iter_mut().zip(topologies) {
                let hop = topology.proof_len(from, to, &ctx);
                *total = total.zip(hop).map(|(sum, hop)| sum + hop);
            }
        }

        if needs_tree {
            tree.insert(i);
        }
        if needs_cache && i > 0 {
            cache.offer(i, block.skip as u64);
        }
    }

    debug!(hops = hops.len(), topologies = topologies.len(), "shared path priced");
    topologies
        .iter()
        .zip(totals)
        .map(|(&topology, hashes)| PathCost { topology, hashes })
        .collect()
}
