//! Chain growth and shortest back-link paths
//!
//! Block `i` draws a uniform `u64` and may link back at most
//! `min(i, u64::MAX / draw)` blocks: mostly tiny jumps, with the odd
//! lucky low-hash block reaching far back.
//!
//! Growing the chain runs the shortest-path DP block by block:
//! `dist[i] = 1 + min(dist[j])` over the skip window, scanned from the
//! closest predecessor down so that ties keep the closest block.

mod ancestry;
mod draws;
mod optimal;
mod replay;

pub use ancestry::{track_ancestry, AncestorArena, AncestorEntry, AncestryReport, EntryId};
pub use draws::{DrawSource, ScriptedDraws, SeededDraws};
pub use optimal::OptimalLengths;
pub use replay::{price_path, PathCost};

use tracing::{debug, trace};

use crate::SimulationError;

/// Furthest a block holding `draw` may jump back, clamped to `index`.
///
/// A zero draw has no finite bound and is treated as the full `index`.
pub fn skip_distance(index: usize, draw: u64) -> usize {
    let reach = u64::MAX.checked_div(draw).unwrap_or(u64::MAX);
    usize::try_from(reach).map_or(index, |reach| reach.min(index))
}

/// One simulated block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Height
    pub index: usize,

    /// Random draw (zero for genesis, which draws nothing)
    pub draw: u64,

    /// Furthest permitted jump back
    pub skip: usize,

    /// Fewest hops down to the target, `None` below the target
    pub dist: Option<u64>,

    /// Predecessor chosen on the shortest path
    pub step: Option<usize>,
}

impl Block {
    /// Lowest block this one may link to when proving down to `target`
    #[inline]
    pub fn window_start(&self, target: usize) -> usize {
        (self.index - self.skip).max(target)
    }
}

/// Grown chain with its shortest-path table
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
    target: usize,
}

impl Chain {
    /// Grow `len` blocks, solving shortest paths down to `target`.
    ///
    /// Every block after genesis consumes one draw, whatever the target,
    /// including blocks at or below it that take no part in the DP. Drawing
    /// only above the target would give a different chain for the same
    /// seed once `target > 0`; this way a seed fixes the chain prefix for
    /// every length and target.
    pub fn grow(
        len: usize,
        target: usize,
        draws: &mut impl DrawSource,
    ) -> Result<Self, SimulationError> {
        if len == 0 {
            return Err(SimulationError::EmptyChain);
        }
        if target >= len {
            return Err(SimulationError::InvalidTarget {
                target,
                blocks: len,
            });
        }

        let mut blocks: Vec<Block> = Vec::with_capacity(len);
        for index in 0..len {
            let draw = if index == 0 { 0 } else { draws.next_draw() };
            let mut block = Block {
                index,
                draw,
                skip: skip_distance(index, draw),
                dist: None,
                step: None,
            };

            if index == target {
                block.dist = Some(0);
            } else if index > target {
                let mut best: Option<(usize, u64)> = None;
                for j in (block.window_start(target)..index).rev() {
                    if let Some(d) = blocks[j].dist {
                        if best.map_or(true, |(_, b)| d < b) {
                            best = Some((j, d));
                        }
                    }
                }
                if let Some((j, d)) = best {
                    block.step = Some(j);
                    block.dist = Some(d + 1);
                }
                trace!(index, skip = block.skip, step = ?block.step, "block solved");
            }
            blocks.push(block);
        }

        let chain = Self { blocks, target };
        debug!(
            blocks = len,
            target,
            hops = chain.hop_count(),
            "chain grown"
        );
        Ok(chain)
    }

    /// All blocks, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the chain is empty (never, once grown)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block proofs terminate at
    pub fn target(&self) -> usize {
        self.target
    }

    /// Newest block
    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Hops on the shortest path from the tip down to the target
    pub fn hop_count(&self) -> u64 {
        self.tip().dist.unwrap_or_default()
    }

    /// Blocks on the shortest path, tip first, target last
    pub fn path(&self) -> Vec<usize> {
        let mut path = vec![self.tip().index];
        let mut at = self.tip();
        while let Some(step) = at.step {
            path.push(step);
            at = &self.blocks[step];
        }
        path
    }

    /// `(from, to)` hops of the shortest path, oldest first
    pub fn hops(&self) -> Vec<(usize, usize)> {
        let path = self.path();
        path.windows(2).rev().map(|w| (w[0], w[1])).collect()
    }

    /// Digest of the `dist`/`step` table, for cheap determinism checks
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.target as u64).to_le_bytes());
        for block in &self.blocks {
            hasher.update(&block.draw.to_le_bytes());
            hasher.update(&block.dist.unwrap_or(u64::MAX).to_le_bytes());
            hasher.update(&block.step.map_or(u64::MAX, |s| s as u64).to_le_bytes());
        }
        hasher.finalize()
    }
}
