//! Proof-length strategies
//!
//! Each topology answers one question: how many hashes does a verifier
//! need to walk from element `to` up to the root of a back-link structure
//! covering `from` elements (`to < from`)?
//!
//! Topologies flagged *fast* answer in O(log) without rebuilding a tree and
//! may take part in the optimal-length DP; the others are only evaluated
//! along an already-chosen path.

mod array;
mod backlink;
mod batch;
mod cached;
mod incremental;
mod mmr;

pub use array::array_proof_len;
pub use backlink::{single_backlink_hop, skip_height};
pub use batch::{batch_proof_len, BatchFlavour, DEFAULT_BATCH_SIZE};
pub use cached::cached_proof_len;
pub use incremental::incremental_proof_len;
pub use mmr::{linear_mmr_proof_len, locate_mountain, mmr_proof_len, Mountain};

use std::fmt;
use std::str::FromStr;

use crate::cache::TopCache;
use crate::tree::IncrementalTree;
use crate::util::{ceil_log2, floor_log2};
use crate::SimulationError;

/// Hashes needed to prove a value stored in an internal node at `depth`.
///
/// The root's own value needs one hash (its children's digest); every
/// level below that adds the sibling subtree and the parent's value:
///
/// ```text
///        /\
///       /  \
///    value  /\
///          L  R
/// ```
pub fn internal_node_cost(depth: usize) -> u64 {
    if depth == 0 {
        1
    } else {
        2 * depth as u64 - 1
    }
}

/// Balanced tree over all `from` elements, ignoring how it is maintained
pub fn naive_proof_len(from: usize) -> u64 {
    u64::from(ceil_log2(from))
}

/// Breadth-first internal-node tree with the newest element at the root:
///
/// ```text
///             N
///           /   \
///        N-1     N-2
///       /   \   /   \
///     N-3 N-4 N-5  N-6
/// ```
///
/// Depth of `to` is ⌊log2(from − to)⌋. Optimal, but not incrementable.
pub fn breadth_first_proof_len(from: usize, to: usize) -> u64 {
    debug_assert!(to < from);
    internal_node_cost(floor_log2(from - to) as usize)
}

/// State a topology may consult when pricing a hop
#[derive(Debug, Clone, Copy)]
pub struct ProofContext<'a> {
    /// Largest skips among blocks before `from`
    pub cache: &'a TopCache,

    /// Incremental tree holding `0..from`, if the caller keeps one
    pub tree: Option<&'a IncrementalTree>,

    /// Elements per batch for the batched topologies
    pub batch_size: usize,
}

impl<'a> ProofContext<'a> {
    /// Context without a prebuilt tree
    pub fn new(cache: &'a TopCache, batch_size: usize) -> Self {
        Self {
            cache,
            tree: None,
            batch_size,
        }
    }

    /// Attach a tree that already holds `0..from`
    pub fn with_tree(self, tree: &'a IncrementalTree) -> Self {
        Self {
            tree: Some(tree),
            ..self
        }
    }
}

/// Back-link topology under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Topology {
    /// In-order external-node tree
    Array,
    /// Breadth-first internal-node tree
    Breadth,
    /// Incremental self-balancing tree
    Incremental,
    /// Breadth-first batches linked by a left spine
    BreadthBatch,
    /// Breadth-first batch under construction, array tree over old batches
    ArrayBatch,
    /// Merkle Mountain Range, peaks joined by an array tree
    Mmr,
    /// Merkle Mountain Range, peaks chained as a backward list
    MmrLinear,
    /// Huffman-coded cache of big skips in front of an MMR
    HuffmanMmr,
    /// Huffman-coded cache of big skips in front of a linear MMR
    HuffmanLinear,
    /// Balanced tree over everything
    Naive,
    /// Predecessor plus one structural skip link per block
    SingleBacklink,
}

impl Topology {
    /// Every topology, in report order
    pub const ALL: [Topology; 11] = [
        Topology::Array,
        Topology::Breadth,
        Topology::Incremental,
        Topology::BreadthBatch,
        Topology::ArrayBatch,
        Topology::Mmr,
        Topology::MmrLinear,
        Topology::HuffmanMmr,
        Topology::HuffmanLinear,
        Topology::Naive,
        Topology::SingleBacklink,
    ];

    /// Name used on the command line and in reports
    pub fn name(self) -> &'static str {
        match self {
            Topology::Array => "array",
            Topology::Breadth => "breadth",
            Topology::Incremental => "incremental",
            Topology::BreadthBatch => "breadth-batch",
            Topology::ArrayBatch => "array-batch",
            Topology::Mmr => "mmr",
            Topology::MmrLinear => "mmr-linear",
            Topology::HuffmanMmr => "huffman-mmr",
            Topology::HuffmanLinear => "huffman-linear",
            Topology::Naive => "naive",
            Topology::SingleBacklink => "single-backlink",
        }
    }

    /// Whether a hop can be priced without rebuilding a tree
    pub fn is_fast(self) -> bool {
        !matches!(self, Topology::Incremental)
    }

    /// Whether pricing depends on the cache state
    pub fn uses_cache(self) -> bool {
        matches!(self, Topology::HuffmanMmr | Topology::HuffmanLinear)
    }

    /// Hashes to prove `to` from a structure over `from` elements.
    ///
    /// `None` when the topology has no link from `from` to `to`.
    pub fn proof_len(self, from: usize, to: usize, ctx: &ProofContext<'_>) -> Option<u64> {
        debug_assert!(to < from, "hop {from} -> {to} does not go back");
        let len = match self {
            Topology::Array => array_proof_len(from, to),
            Topology::Breadth => breadth_first_proof_len(from, to),
            Topology::Incremental => return incremental_proof_len(from, to, ctx.tree),
            Topology::BreadthBatch => {
                batch_proof_len(from, to, ctx.batch_size, BatchFlavour::Breadth)
            }
            Topology::ArrayBatch => batch_proof_len(from, to, ctx.batch_size, BatchFlavour::Array),
            Topology::Mmr => mmr_proof_len(from, to),
            Topology::MmrLinear => linear_mmr_proof_len(from, to),
            Topology::HuffmanMmr => cached_proof_len(from, to, ctx.cache, mmr_proof_len),
            Topology::HuffmanLinear => {
                cached_proof_len(from, to, ctx.cache, linear_mmr_proof_len)
            }
            Topology::Naive => naive_proof_len(from),
            Topology::SingleBacklink => return single_backlink_hop(from, to),
        };
        Some(len)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topology {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topology::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| SimulationError::UnknownTopology(s.to_string()))
    }
}

/// Active topologies, kept in report order without duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySet {
    topologies: Vec<Topology>,
}

impl StrategySet {
    /// No topologies
    pub fn empty() -> Self {
        Self {
            topologies: Vec::new(),
        }
    }

    /// Every topology
    pub fn all() -> Self {
        Topology::ALL.into_iter().collect()
    }

    /// Add a topology
    pub fn insert(&mut self, topology: Topology) {
        if let Err(at) = self.topologies.binary_search(&topology) {
            self.topologies.insert(at, topology);
        }
    }

    /// Remove a topology
    pub fn remove(&mut self, topology: Topology) {
        self.topologies.retain(|&t| t != topology);
    }

    /// Whether `topology` is active
    pub fn contains(&self, topology: Topology) -> bool {
        self.topologies.binary_search(&topology).is_ok()
    }

    /// Number of active topologies
    pub fn len(&self) -> usize {
        self.topologies.len()
    }

    /// Whether nothing is active
    pub fn is_empty(&self) -> bool {
        self.topologies.is_empty()
    }

    /// Active topologies in report order
    pub fn iter(&self) -> impl Iterator<Item = Topology> + '_ {
        self.topologies.iter().copied()
    }

    /// Active fast topologies in report order
    pub fn fast(&self) -> Vec<Topology> {
        self.iter().filter(|t| t.is_fast()).collect()
    }
}

impl Default for StrategySet {
    /// The classic comparison set: array, breadth, incremental and both
    /// batched trees.
    fn default() -> Self {
        [
            Topology::Array,
            Topology::Breadth,
            Topology::Incremental,
            Topology::BreadthBatch,
            Topology::ArrayBatch,
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<Topology> for StrategySet {
    fn from_iter<I: IntoIterator<Item = Topology>>(iter: I) -> Self {
        let mut set = Self::empty();
        for topology in iter {
            set.insert(topology);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_node_cost() {
        assert_eq!(internal_node_cost(0), 1);
        assert_eq!(internal_node_cost(1), 1);
        assert_eq!(internal_node_cost(2), 3);
        assert_eq!(internal_node_cost(5), 9);
    }

    #[test]
    fn test_breadth_first() {
        assert_eq!(breadth_first_proof_len(10, 9), 1);
        assert_eq!(breadth_first_proof_len(10, 8), 1);
        assert_eq!(breadth_first_proof_len(10, 6), 3);
        assert_eq!(breadth_first_proof_len(1 << 20, 0), 39);
    }

    #[test]
    fn test_names_round_trip() {
        for topology in Topology::ALL {
            assert_eq!(topology.name().parse::<Topology>().unwrap(), topology);
        }
        assert!(matches!(
            "rfc6962".parse::<Topology>(),
            Err(SimulationError::UnknownTopology(name)) if name == "rfc6962"
        ));
    }

    #[test]
    fn test_only_incremental_is_slow() {
        let slow: Vec<_> = Topology::ALL.into_iter().filter(|t| !t.is_fast()).collect();
        assert_eq!(slow, vec![Topology::Incremental]);
    }

    #[test]
    fn test_only_huffman_reads_the_cache() {
        let cached: Vec<_> = Topology::ALL.into_iter().filter(|t| t.uses_cache()).collect();
        assert_eq!(cached, vec![Topology::HuffmanMmr, Topology::HuffmanLinear]);
    }

    #[test]
    fn test_set_keeps_report_order() {
        let set: StrategySet = [Topology::Naive, Topology::Array, Topology::Naive]
            .into_iter()
            .collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Topology::Array, Topology::Naive]);

        let mut defaults = StrategySet::default();
        assert!(defaults.contains(Topology::Incremental));
        defaults.remove(Topology::Incremental);
        assert_eq!(defaults.len(), 4);
        assert_eq!(defaults.fast().len(), 4);
    }
}
