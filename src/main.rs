use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use prevtree::{
    SimulationConfig, SimulationReport, Simulator, StrategySet, Topology, DEFAULT_BATCH_SIZE,
    DEFAULT_CACHE_CAPACITY,
};

#[derive(Parser, Debug)]
#[command(
    name = "prevtree",
    about = "Compare SPV proof lengths across back-link topologies"
)]
struct Cli {
    /// Number of blocks to simulate, genesis included.
    blocks: usize,

    /// Block the proofs terminate at.
    #[arg(long, default_value_t = 0)]
    target: usize,

    /// Seed for the draw stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Big skips kept by the Huffman cache.
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    cache_size: usize,

    /// Elements per batch for the batched trees.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// In-order external-node tree.
    #[arg(long)]
    array: bool,
    /// Merkle Mountain Range with an array tree over the peaks.
    #[arg(long)]
    mmr: bool,
    /// Merkle Mountain Range with peaks chained backwards.
    #[arg(long)]
    mmr_linear: bool,
    /// Breadth-first internal-node tree.
    #[arg(long)]
    breadth: bool,
    /// Breadth-first batches.
    #[arg(long)]
    breadth_batch: bool,
    /// Breadth-first current batch, array tree over the rest.
    #[arg(long)]
    array_batch: bool,
    /// Huffman cache in front of an MMR.
    #[arg(long)]
    huffman_mmr: bool,
    /// Huffman cache in front of a linear MMR.
    #[arg(long)]
    huffman_linear: bool,
    /// Balanced tree over everything.
    #[arg(long)]
    naive: bool,
    /// Predecessor plus one structural skip link.
    #[arg(long)]
    single_backlink: bool,
    /// Every topology.
    #[arg(long)]
    all: bool,
    /// Leave out the incremental tree (slow on long chains).
    #[arg(long)]
    no_incremental: bool,

    /// Also run per-block ancestor bookkeeping.
    #[arg(long)]
    ancestry: bool,

    /// Print the chosen chain, tip first.
    #[arg(long)]
    print_path: bool,
}

impl Cli {
    fn topologies(&self) -> StrategySet {
        let flags = [
            (self.array, Topology::Array),
            (self.mmr, Topology::Mmr),
            (self.mmr_linear, Topology::MmrLinear),
            (self.breadth, Topology::Breadth),
            (self.breadth_batch, Topology::BreadthBatch),
            (self.array_batch, Topology::ArrayBatch),
            (self.huffman_mmr, Topology::HuffmanMmr),
            (self.huffman_linear, Topology::HuffmanLinear),
            (self.naive, Topology::Naive),
            (self.single_backlink, Topology::SingleBacklink),
        ];

        let mut set = if self.all {
            StrategySet::all()
        } else if flags.iter().any(|&(on, _)| on) {
            flags
                .iter()
                .filter(|&&(on, _)| on)
                .map(|&(_, topology)| topology)
                .collect()
        } else {
            StrategySet::default()
        };
        if self.no_incremental {
            set.remove(Topology::Incremental);
        }
        set
    }

    fn config(&self) -> SimulationConfig {
        SimulationConfig::new(self.blocks)
            .with_target(self.target)
            .with_seed(self.seed)
            .with_topologies(self.topologies())
            .with_cache_capacity(self.cache_size)
            .with_batch_size(self.batch_size)
            .with_ancestry(self.ancestry)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    config
        .validate()
        .context("invalid simulation parameters")?;

    info!(
        blocks = config.blocks,
        target = config.target,
        seed = config.seed,
        topologies = config.topologies.len(),
        "starting simulation"
    );
    let report = Simulator::new(config)
        .run()
        .context("simulation failed")?;

    print_report(&report, cli.print_path);
    Ok(())
}

fn print_report(report: &SimulationReport, print_path: bool) {
    for cost in &report.path_costs {
        match cost.hashes {
            Some(hashes) => println!("{}: proof hashes {}", cost.topology, hashes),
            None => println!("{}: no link along chosen path", cost.topology),
        }
    }
    for cost in &report.optimal_costs {
        println!("{}-optimal: proof hashes {}", cost.topology, cost.hashes);
    }

    println!("chain length: {} hops", report.hops);
    println!("fingerprint: {}", report.fingerprint);

    if let Some(ancestry) = &report.ancestry {
        println!(
            "ancestry: proof hashes {} via {} entries ({})",
            ancestry.hashes,
            ancestry.path_entries,
            ancestry.space.report()
        );
    }

    if print_path {
        let path: Vec<String> = report.path.iter().map(ToString::to_string).collect();
        println!("path: {}", path.join(" <- "));
    }
}
