use proptest::prelude::*;
use test_case::test_case;

use prevtree::strategy::{
    array_proof_len, batch_proof_len, breadth_first_proof_len, incremental_proof_len,
    linear_mmr_proof_len, mmr_proof_len, naive_proof_len, single_backlink_hop, BatchFlavour,
};
use prevtree::{ProofContext, TopCache, Topology, DEFAULT_BATCH_SIZE};

#[test_case(0 ; "single element")]
#[test_case(1 ; "two elements")]
#[test_case(5 ; "thirty two elements")]
#[test_case(20 ; "a million elements")]
fn mmr_of_power_of_two_is_its_height(k: u32) {
    assert_eq!(mmr_proof_len(1 << k, 0), u64::from(k));
    assert_eq!(linear_mmr_proof_len(1 << k, 0), u64::from(k));
}

#[test]
fn array_tree_of_one_is_free() {
    assert_eq!(array_proof_len(1, 0), 0);
}

#[test]
fn mmr_is_not_monotone() {
    assert_eq!(mmr_proof_len(7, 0), 4);
    assert_eq!(mmr_proof_len(8, 0), 3);
}

#[test]
fn linear_mmr_is_not_monotone() {
    // three peaks collapse into one mountain
    assert_eq!(linear_mmr_proof_len(7, 0), 4);
    assert_eq!(linear_mmr_proof_len(8, 0), 3);
}

#[test]
fn array_batch_drops_when_a_batch_completes() {
    // deep breadth-first live batch, then a shallow array tree over it
    assert_eq!(batch_proof_len(31, 0, 32, BatchFlavour::Array), 7);
    assert_eq!(batch_proof_len(32, 0, 32, BatchFlavour::Array), 6);
    assert_eq!(batch_proof_len(65_534, 0, DEFAULT_BATCH_SIZE, BatchFlavour::Array), 29);
    assert_eq!(batch_proof_len(65_535, 0, DEFAULT_BATCH_SIZE, BatchFlavour::Array), 17);
}

#[test]
fn huffman_fallback_inherits_mmr_drop() {
    // cache holds some other block, so `0` pays one hash plus the MMR
    let mut cache = TopCache::new(1);
    cache.offer(5, 5);
    let ctx = ProofContext::new(&cache, DEFAULT_BATCH_SIZE);
    assert_eq!(Topology::HuffmanMmr.proof_len(7, 0, &ctx), Some(5));
    assert_eq!(Topology::HuffmanMmr.proof_len(8, 0, &ctx), Some(4));
    assert_eq!(Topology::HuffmanLinear.proof_len(7, 0, &ctx), Some(5));
    assert_eq!(Topology::HuffmanLinear.proof_len(8, 0, &ctx), Some(4));
}

#[test]
fn single_backlink_links_come_and_go() {
    // 8 is the skip link of 12 only
    assert_eq!(single_backlink_hop(11, 8), None);
    assert_eq!(single_backlink_hop(12, 8), Some(1));
    assert_eq!(single_backlink_hop(13, 8), None);
}

#[test_case(Topology::Array, 64, 0 => Some(6))]
#[test_case(Topology::Breadth, 64, 63 => Some(1))]
#[test_case(Topology::Naive, 1000, 3 => Some(10))]
#[test_case(Topology::Mmr, 3, 2 => Some(1))]
#[test_case(Topology::MmrLinear, 7, 0 => Some(4))]
#[test_case(Topology::SingleBacklink, 12, 8 => Some(1))]
#[test_case(Topology::SingleBacklink, 12, 7 => None)]
#[test_case(Topology::Incremental, 7, 6 => Some(1))]
fn topology_dispatch(topology: Topology, from: usize, to: usize) -> Option<u64> {
    let cache = TopCache::new(4);
    topology.proof_len(from, to, &ProofContext::new(&cache, DEFAULT_BATCH_SIZE))
}

#[test]
fn small_batches_cross_over() {
    let cache = TopCache::new(4);
    let ctx = ProofContext::new(&cache, 4);
    for topology in [Topology::BreadthBatch, Topology::ArrayBatch] {
        // inside the batch under construction, one hash more than breadth
        // once an older batch exists
        assert_eq!(
            topology.proof_len(10, 9, &ctx),
            Some(1 + breadth_first_proof_len(10, 9))
        );
        assert!(topology.proof_len(10, 0, &ctx).is_some());
    }
}

#[test]
fn huffman_topologies_fall_back_on_short_chains() {
    let mut cache = TopCache::new(32);
    cache.offer(3, 3);
    let ctx = ProofContext::new(&cache, DEFAULT_BATCH_SIZE);
    assert_eq!(
        Topology::HuffmanMmr.proof_len(8, 3, &ctx),
        Some(mmr_proof_len(8, 3))
    );
    assert_eq!(
        Topology::HuffmanLinear.proof_len(8, 3, &ctx),
        Some(linear_mmr_proof_len(8, 3))
    );
}

#[test]
fn huffman_sole_entry_costs_one() {
    let mut cache = TopCache::new(1);
    cache.offer(40, 40);
    let ctx = ProofContext::new(&cache, DEFAULT_BATCH_SIZE);
    assert_eq!(Topology::HuffmanMmr.proof_len(100, 40, &ctx), Some(1));
    assert_eq!(
        Topology::HuffmanMmr.proof_len(100, 41, &ctx),
        Some(1 + mmr_proof_len(100, 41))
    );
}

proptest! {
    #[test]
    fn per_hop_costs_grow_with_from(to in 0usize..300, extra in 1usize..300) {
        let from = to + extra;
        prop_assert!(naive_proof_len(from) <= naive_proof_len(from + 1));
        prop_assert!(breadth_first_proof_len(from, to) <= breadth_first_proof_len(from + 1, to));
        prop_assert!(array_proof_len(from, to) <= array_proof_len(from + 1, to));
    }

    #[test]
    fn incremental_cost_grows_with_from(to in 0usize..60, extra in 1usize..60) {
        let from = to + extra;
        prop_assert!(
            incremental_proof_len(from, to, None) <= incremental_proof_len(from + 1, to, None)
        );
    }

    #[test]
    fn breadth_batch_cost_grows_with_from(
        to in 0usize..200,
        extra in 1usize..200,
        batch_size in 1usize..40,
    ) {
        let from = to + extra;
        prop_assert!(
            batch_proof_len(from, to, batch_size, BatchFlavour::Breadth)
                <= batch_proof_len(from + 1, to, batch_size, BatchFlavour::Breadth),
            "from {} to {} batch {}",
            from,
            to,
            batch_size
        );
    }

    #[test]
    fn predecessor_link_always_exists(from in 1usize..100_000) {
        prop_assert_eq!(single_backlink_hop(from, from - 1), Some(1));
    }
}
