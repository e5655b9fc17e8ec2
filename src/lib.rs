//! # Compact SPV proof lengths over back-link topologies
//!
//! A light client proves that a high block descends from a trusted one by
//! following back-links. Each block commits to some set of earlier blocks,
//! and the shape of that commitment decides how many hashes each hop costs.
//!
//! ## Core Algorithm
//!
//! 1. **Chain growth**: block `i` may jump back `min(i, u64::MAX / draw)`
//!    blocks; a shortest-path DP picks the fewest hops down to the target
//! 2. **Path pricing**: every topology prices that one shared path
//! 3. **Optimal pricing**: every fast topology runs its own DP and picks
//!    its own path
//! 4. **Ancestor bookkeeping** (optional): blocks carry persistent,
//!    pruned ancestor lists committed as mountain ranges
//!
//! ## Usage Example
//!
//! ```
//! use prevtree::{SimulationConfig, Simulator, StrategySet};
//!
//! let config = SimulationConfig::new(1_000)
//!     .with_seed(7)
//!     .with_topologies(StrategySet::all());
//! let report = Simulator::new(config).run()?;
//! assert_eq!(report.path.last(), Some(&0));
//! # Ok::<(), prevtree::SimulationError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod cache; // Bounded top-K cache and Huffman depths
pub mod chain; // Chain growth, DP tables, ancestor lists
pub mod space; // Live-entry accounting
pub mod strategy; // Proof-length topologies
pub mod tree; // Incremental self-balancing tree
pub mod util; // Integer helpers

// Re-exports for convenience
pub use cache::{CacheEntry, TopCache, DEFAULT_CACHE_CAPACITY};
pub use chain::{
    AncestryReport, Block, Chain, DrawSource, OptimalLengths, PathCost, ScriptedDraws,
    SeededDraws,
};
pub use strategy::{ProofContext, StrategySet, Topology, DEFAULT_BATCH_SIZE};
pub use tree::{IncrementalTree, InsertOutcome, TreeError};

use thiserror::Error;
use tracing::debug;

/// Configuration parameters for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of blocks N (genesis included)
    pub blocks: usize,

    /// Block the proofs terminate at
    pub target: usize,

    /// Seed for the draw stream
    pub seed: u64,

    /// Topologies to compare
    pub topologies: StrategySet,

    /// Capacity of the top-K skip cache
    pub cache_capacity: usize,

    /// Elements per batch for batched topologies
    pub batch_size: usize,

    /// Run the per-topology optimal DP
    pub optimal: bool,

    /// Run the ancestor-bookkeeping variant
    pub ancestry: bool,
}

impl SimulationConfig {
    /// Defaults for a chain of `blocks` blocks proving down to genesis
    pub fn new(blocks: usize) -> Self {
        Self {
            blocks,
            target: 0,
            seed: 0,
            topologies: StrategySet::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            optimal: true,
            ancestry: false,
        }
    }

    /// Terminate proofs at `target`
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = target;
        self
    }

    /// Seed the draw stream
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Compare these topologies
    pub fn with_topologies(mut self, topologies: StrategySet) -> Self {
        self.topologies = topologies;
        self
    }

    /// Cache this many big skips
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Batch this many elements per subtree
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Toggle the optimal DP
    pub fn with_optimal(mut self, optimal: bool) -> Self {
        self.optimal = optimal;
        self
    }

    /// Toggle ancestor bookkeeping
    pub fn with_ancestry(mut self, ancestry: bool) -> Self {
        self.ancestry = ancestry;
        self
    }

    /// Reject inputs that cannot be simulated
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.blocks == 0 {
            return Err(SimulationError::EmptyChain);
        }
        if self.target >= self.blocks {
            return Err(SimulationError::InvalidTarget {
                target: self.target,
                blocks: self.blocks,
            });
        }
        if self.cache_capacity == 0 {
            return Err(SimulationError::InvalidCacheCapacity(self.cache_capacity));
        }
        if self.batch_size == 0 {
            return Err(SimulationError::InvalidBatchSize(self.batch_size));
        }
        Ok(())
    }
}

/// Errors that can occur before a run starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// No blocks to simulate
    #[error("chain must contain at least one block")]
    EmptyChain,

    /// Target outside the chain
    #[error("target {target} must be below the chain length {blocks}")]
    InvalidTarget {
        /// Requested target
        target: usize,
        /// Chain length
        blocks: usize,
    },

    /// Cache cannot hold anything
    #[error("invalid cache capacity {0}")]
    InvalidCacheCapacity(usize),

    /// Batches cannot hold anything
    #[error("invalid batch size {0}")]
    InvalidBatchSize(usize),

    /// Name does not match any topology
    #[error("unknown topology '{0}'")]
    UnknownTopology(String),
}

/// Optimal DP total for one fast topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct OptimalCost {
    /// Topology priced
    pub topology: Topology,
    /// Fewest hashes from the tip down to the target
    pub hashes: u64,
    /// Hops on the chain it picked
    pub hops: usize,
}

/// Result of a run
#[derive(Debug, Clone)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct SimulationReport {
    /// Chain length
    pub blocks: usize,

    /// Block proofs terminate at
    pub target: usize,

    /// Hops on the shared shortest path
    pub hops: u64,

    /// Shared shortest path, tip first
    pub path: Vec<usize>,

    /// Every active topology priced along the shared path
    pub path_costs: Vec<PathCost>,

    /// Every active fast topology on its own optimal path
    pub optimal_costs: Vec<OptimalCost>,

    /// Ancestor bookkeeping, if enabled
    pub ancestry: Option<AncestryReport>,

    /// Hex digest of the shortest-path table
    pub fingerprint: String,
}

impl SimulationReport {
    /// Shared-path total for `topology`
    pub fn path_cost(&self, topology: Topology) -> Option<u64> {
        self.path_costs
            .iter()
            .find(|c| c.topology == topology)
            .and_then(|c| c.hashes)
    }

    /// Optimal total for `topology`
    pub fn optimal_cost(&self, topology: Topology) -> Option<u64> {
        self.optimal_costs
            .iter()
            .find(|c| c.topology == topology)
            .map(|c| c.hashes)
    }
}

/// Main simulation orchestrator
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Create new simulator
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    fn grow_chain(&self, draws: &mut impl DrawSource) -> Result<Chain, SimulationError> {
        self.config.validate()?;
        Chain::grow(self.config.blocks, self.config.target, draws)
    }

    /// Run with the configured seed
    pub fn run(&self) -> Result<SimulationReport, SimulationError> {
        self.run_with(&mut SeededDraws::new(self.config.seed))
    }

    /// Run over an explicit draw stream
    ///
    /// Orchestrates:
    /// 1. Shortest-path chain growth
    /// 2. Pricing the shared path under every topology
    /// 3. Per-topology optimal DP
    /// 4. Ancestor bookkeeping
    pub fn run_with(&self, draws: &mut impl DrawSource) -> Result<SimulationReport, SimulationError> {
        let config = &self.config;
        let chain = self.grow_chain(draws)?;
        let topologies: Vec<Topology> = config.topologies.iter().collect();

        let path_costs = chain::price_path(
            &chain,
            &topologies,
            config.cache_capacity,
            config.batch_size,
        );

        let optimal_costs = if config.optimal {
            let table = OptimalLengths::compute(
                &chain,
                topologies.iter().copied(),
                config.cache_capacity,
                config.batch_size,
            );
            table
                .topologies()
                .iter()
                .filter_map(|&topology| {
                    let hashes = table.total(topology)?;
                    let hops = table.path(topology).len().saturating_sub(1);
                    Some(OptimalCost {
                        topology,
                        hashes,
                        hops,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        let ancestry = config.ancestry.then(|| chain::track_ancestry(&chain));

        debug!(
            blocks = config.blocks,
            target = config.target,
            seed = config.seed,
            topologies = topologies.len(),
            "simulation complete"
        );

        Ok(SimulationReport {
            blocks: config.blocks,
            target: config.target,
            hops: chain.hop_count(),
            path: chain.path(),
            path_costs,
            optimal_costs,
            ancestry,
            fingerprint: chain.fingerprint().to_hex().to_string(),
        })
    }
}
