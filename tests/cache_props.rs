use proptest::prelude::*;
use prevtree::cache::{huffman_depth, CacheEntry, TopCache};

proptest! {
    #[test]
    fn cache_stays_sorted_and_bounded(
        skips in proptest::collection::vec(0u64..1_000, 0..200),
        capacity in 1usize..40,
    ) {
        let mut cache = TopCache::new(capacity);
        for (blocknum, &skip) in skips.iter().enumerate() {
            cache.offer(blocknum, skip);
            prop_assert!(cache.len() <= capacity, "cache overflowed");
            prop_assert!(
                cache.entries().windows(2).all(|w| w[0].skip > w[1].skip),
                "cache must be strictly descending"
            );
        }
    }

    #[test]
    fn cache_keeps_the_largest_distinct_skips(
        skips in proptest::collection::vec(0u64..1_000, 1..200),
        capacity in 1usize..40,
    ) {
        let mut cache = TopCache::new(capacity);
        for (blocknum, &skip) in skips.iter().enumerate() {
            cache.offer(blocknum, skip);
        }

        let mut distinct = skips.clone();
        distinct.sort_unstable_by(|a, b| b.cmp(a));
        distinct.dedup();
        distinct.truncate(capacity);
        let kept: Vec<u64> = cache.entries().iter().map(|e| e.skip).collect();
        prop_assert_eq!(kept, distinct);
    }

    #[test]
    fn huffman_depths_satisfy_kraft(weights in proptest::collection::vec(1u64..500, 1..40)) {
        let entries: Vec<CacheEntry> = weights
            .iter()
            .enumerate()
            .map(|(blocknum, &skip)| CacheEntry { blocknum, skip })
            .collect();

        // a full binary code: sum of 2^-depth is exactly one
        let mut kraft = 0f64;
        for entry in &entries {
            let depth = huffman_depth(&entries, entry.blocknum);
            prop_assert!(depth.is_some());
            kraft += 0.5f64.powi(depth.unwrap_or(0) as i32);
        }
        prop_assert!((kraft - 1.0).abs() < 1e-9, "kraft sum {}", kraft);
    }
}

#[test]
fn sole_entry_sits_at_the_root() {
    let mut cache = TopCache::new(1);
    cache.offer(17, 5);
    assert_eq!(huffman_depth(cache.entries(), 17), Some(0));
}

#[test]
fn equal_skip_keeps_earlier_block() {
    let mut cache = TopCache::new(2);
    assert!(cache.offer(1, 10));
    assert!(!cache.offer(2, 10));
    assert_eq!(cache.position(1), Some(0));
    assert!(!cache.contains(2));
}
