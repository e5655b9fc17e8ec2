//! Optimal proof lengths per topology
//!
//! Unlike the shortest-path table, each topology here picks its own chain:
//! `len[i][s] = min over the window of proof_len_s(i, j) + len[j][s]`.
//! All topologies share one forward pass that also maintains the cache,
//! so only fast topologies are admitted.

use tracing::debug;

use super::Chain;
use crate::cache::TopCache;
use crate::strategy::{ProofContext, Topology};

/// Per-topology optimal proof-length table
#[derive(Debug, Clone)]
pub struct OptimalLengths {
    topologies: Vec<Topology>,
    /// Row-major `[block][topology]`
    lengths: Vec<Option<u64>>,
    steps: Vec<Option<usize>>,
    target: usize,
}

impl OptimalLengths {
    /// Run the combined DP over `chain` for the fast members of `topologies`
    pub fn compute(
        chain: &Chain,
        topologies: impl IntoIterator<Item = Topology>,
        cache_capacity: usize,
        batch_size: usize,
    ) -> Self {
        let topologies: Vec<Topology> = topologies.into_iter().filter(|t| t.is_fast()).collect();
        let width = topologies.len();
        let needs_cache = topologies.iter().any(|t| t.uses_cache());
        let target = chain.target();
        let mut lengths = vec![None; chain.len() * width];
        let mut steps = vec![None; chain.len() * width];
        let mut cache = TopCache::new(cache_capacity);
        let mut best: Vec<Option<(usize, u64)>> = vec![None; width];

        for block in chain.blocks() {
            let i = block.index;
            let row = i * width;

            if i == target {
                lengths[row..row + width].fill(Some(0));
            } else if i > target {
                let ctx = ProofContext::new(&cache, batch_size);
                best.fill(None);

                for j in (block.window_start(target)..i).rev() {
                    for (s, topology) in topologies.iter().enumerate() {
                        let Some(prior) = lengths[j * width + s] else {
                            continue;
                        };
                        let Some(hop) = topology.proof_len(i, j, &ctx) else {
                            continue;
                        };
                        let total = prior + hop;
                        if best[s].map_or(true, |(_, b)| total < b) {
                            best[s] = Some((j, total));
                        }
                    }
                }

                for (s, choice) in best.iter().enumerate() {
                    lengths[row + s] = choice.map(|(_, total)| total);
                    steps[row + s] = choice.map(|(j, _)| j);
                }
            }

            if needs_cache && i > 0 {
                cache.offer(i, block.skip as u64);
            }
        }

        let table = Self {
            topologies,
            lengths,
            steps,
            target,
        };
        debug!(topologies = width, blocks = chain.len(), "optimal lengths computed");
        table
    }

    /// Topologies in the table, in report order
    pub fn topologies(&self) -> &[Topology] {
        &self.topologies
    }

    fn column(&self, topology: Topology) -> Option<usize> {
        self.topologies.iter().position(|&t| t == topology)
    }

    fn blocks(&self) -> usize {
        self.lengths.len().checked_div(self.topologies.len()).unwrap_or(0)
    }

    /// Optimal hashes from `block` down to the target
    pub fn length_at(&self, block: usize, topology: Topology) -> Option<u64> {
        let s = self.column(topology)?;
        self.lengths
            .get(block * self.topologies.len() + s)
            .copied()
            .flatten()
    }

    /// Optimal hashes from the tip down to the target
    pub fn total(&self, topology: Topology) -> Option<u64> {
        self.length_at(self.blocks().checked_sub(1)?, topology)
    }

    /// Chain `topology` would use from the tip, tip first
    pub fn path(&self, topology: Topology) -> Vec<usize> {
        let Some(s) = self.column(topology) else {
            return Vec::new();
        };
        let width = self.topologies.len();
        let Some(mut at) = self.blocks().checked_sub(1) else {
            return Vec::new();
        };

        let mut path = vec![at];
        while at != self.target {
            match self.steps[at * width + s] {
                Some(step) => {
                    path.push(step);
                    at = step;
                }
                None => break,
            }
        }
        path
    }
}
