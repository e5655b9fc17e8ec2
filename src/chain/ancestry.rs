//! Incremental ancestor bookkeeping
//!
//! Instead of one global table, every block carries its own list of
//! ancestors it can link to, committed as a mountain range:
//!
//! ```text
//! list(i) = list(i-1) cut after the entry block i-1 used
//!           + (i-1, hashes from i-1 down to the target)
//! ```
//!
//! Lists are persistent cons-lists in a refcounted arena, so siblings
//! share prefixes. Once block `i` is built nothing refers to block `i-1`'s
//! tail any more and the entries only it reached are freed at once.

use tracing::debug;

use super::Chain;
use crate::space::{SpaceProfile, SpaceTracker};
use crate::strategy::mmr_proof_len;

/// `(blocknum, hashes from that block down to the target)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct AncestorEntry {
    /// Ancestor block
    pub blocknum: usize,
    /// Its cumulative proof length
    pub hashes: u64,
}

/// Handle to an arena entry; also the tail of the list ending there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

#[derive(Debug, Clone)]
struct Slot {
    entry: AncestorEntry,
    parent: Option<EntryId>,
    /// Entries from the oldest up to and including this one
    len: usize,
    refs: usize,
}

/// Refcounted storage for shared ancestor lists
#[derive(Debug, Default)]
pub struct AncestorArena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    space: SpaceTracker,
}

impl AncestorArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` after `parent`; the caller holds one reference.
    pub fn push(&mut self, entry: AncestorEntry, parent: Option<EntryId>) -> EntryId {
        let len = match parent {
            Some(parent) => {
                self.retain(parent);
                self.slots[parent.0].len + 1
            }
            None => 1,
        };
        let slot = Slot {
            entry,
            parent,
            len,
            refs: 1,
        };
        self.space.allocate();

        match self.free.pop() {
            Some(index) => {
                self.slots[index] = slot;
                EntryId(index)
            }
            None => {
                self.slots.push(slot);
                EntryId(self.slots.len() - 1)
            }
        }
    }

    /// Take another reference
    pub fn retain(&mut self, id: EntryId) {
        debug_assert!(self.slots[id.0].refs > 0, "retain of freed entry");
        self.slots[id.0].refs += 1;
    }

    /// Drop a reference, freeing every entry no longer reachable
    pub fn release(&mut self, id: EntryId) {
        let mut next = Some(id);
        while let Some(id) = next {
            let slot = &mut self.slots[id.0];
            debug_assert!(slot.refs > 0, "release of freed entry");
            slot.refs -= 1;
            if slot.refs > 0 {
                break;
            }
            next = slot.parent.take();
            self.free.push(id.0);
            self.space.free();
        }
    }

    /// Entry stored at `id`
    pub fn entry(&self, id: EntryId) -> AncestorEntry {
        self.slots[id.0].entry
    }

    /// Length of the list ending at `id`
    pub fn list_len(&self, id: EntryId) -> usize {
        self.slots[id.0].len
    }

    /// Walk the list ending at `tail`, newest first, with positions
    pub fn walk(&self, tail: EntryId) -> impl Iterator<Item = (EntryId, usize, AncestorEntry)> + '_ {
        std::iter::successors(Some(tail), |&id| self.slots[id.0].parent).map(|id| {
            let slot = &self.slots[id.0];
            (id, slot.len - 1, slot.entry)
        })
    }

    /// List ending at `tail`, oldest first
    pub fn to_vec(&self, tail: EntryId) -> Vec<AncestorEntry> {
        let mut list: Vec<_> = self.walk(tail).map(|(_, _, entry)| entry).collect();
        list.reverse();
        list
    }

    /// Entries currently live
    pub fn live(&self) -> usize {
        self.space.live()
    }

    /// Usage so far
    pub fn profile(&self) -> SpaceProfile {
        self.space.profile()
    }
}

/// Outcome of the ancestor-bookkeeping run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct AncestryReport {
    /// Entries in the tip's ancestor list
    pub path_entries: usize,
    /// Hashes from the tip down to the target
    pub hashes: u64,
    /// Ancestor the tip links to
    pub linked: Option<usize>,
    /// Tip's ancestor list, oldest first
    pub ancestors: Vec<AncestorEntry>,
    /// Longest list any block held
    pub longest_list: usize,
    /// Entry usage over the run
    pub space: SpaceProfile,
}

/// Grow per-block ancestor lists over the draws of `chain`
pub fn track_ancestry(chain: &Chain) -> AncestryReport {
    let target = chain.target();
    let mut arena = AncestorArena::new();

    // What the previous block holds: its list, the entry it used, its cost
    let mut tail: Option<EntryId> = None;
    let mut chosen: Option<EntryId> = None;
    let mut hashes = 0u64;
    let mut longest_list = 0;

    for block in &chain.blocks()[target + 1..] {
        let i = block.index;
        let new_tail = arena.push(
            AncestorEntry {
                blocknum: i - 1,
                hashes,
            },
            chosen,
        );

        // Block i-1 is never a predecessor again
        for id in [tail, chosen].into_iter().flatten() {
            arena.release(id);
        }

        let len = arena.list_len(new_tail);
        longest_list = longest_list.max(len);
        let lowest = block.window_start(target);
        let mut best: Option<(EntryId, u64)> = None;
        for (id, position, entry) in arena.walk(new_tail) {
            if entry.blocknum < lowest {
                break;
            }
            let cost = entry.hashes + mmr_proof_len(len, position);
            if best.map_or(true, |(_, b)| cost < b) {
                best = Some((id, cost));
            }
        }

        // The predecessor entry is always inside the window
        let (best_id, best_cost) = best.unwrap_or((new_tail, hashes));
        arena.retain(best_id);
        tail = Some(new_tail);
        chosen = Some(best_id);
        hashes = best_cost;
    }

    let report = AncestryReport {
        path_entries: tail.map_or(0, |t| arena.list_len(t)),
        hashes,
        linked: chosen.map(|c| arena.entry(c).blocknum),
        ancestors: tail.map(|t| arena.to_vec(t)).unwrap_or_default(),
        longest_list,
        space: arena.profile(),
    };
    debug!(
        entries = report.path_entries,
        hashes = report.hashes,
        peak = report.space.peak_entries,
        "ancestry tracked"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ScriptedDraws;

    fn entry(blocknum: usize, hashes: u64) -> AncestorEntry {
        AncestorEntry { blocknum, hashes }
    }

    #[test]
    fn test_shared_prefix_survives_sibling_release() {
        let mut arena = AncestorArena::new();
        let root = arena.push(entry(0, 0), None);
        let left = arena.push(entry(1, 1), Some(root));
        let right = arena.push(entry(2, 1), Some(root));
        arena.release(root);
        assert_eq!(arena.live(), 3);

        arena.release(left);
        assert_eq!(arena.live(), 2);
        assert_eq!(arena.to_vec(right), vec![entry(0, 0), entry(2, 1)]);

        arena.release(right);
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.profile().peak_entries, 3);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut arena = AncestorArena::new();
        let a = arena.push(entry(0, 0), None);
        arena.release(a);
        let b = arena.push(entry(1, 0), None);
        assert_eq!(a, b);
        assert_eq!(arena.profile().allocated, 2);
    }

    #[test]
    fn test_unit_chain() {
        // skip 1 everywhere: each block links to its predecessor, whose
        // entry is the newest in a list of one-entry-per-hop
        let chain = Chain::grow(5, 0, &mut ScriptedDraws::new([])).unwrap();
        let report = track_ancestry(&chain);
        assert_eq!(report.linked, Some(3));
        assert_eq!(
            report.ancestors.iter().map(|e| e.blocknum).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        // pruning keeps only the tip's list alive
        assert_eq!(report.space.live_entries, report.path_entries);
        assert_eq!(report.longest_list, 4);
    }

    #[test]
    fn test_unit_chain_hashes() {
        // entry (i-1, h) carries block i-1's own total, no extra hop:
        // block 1: mmr(1, 0) = 0
        // block 2: 0 + mmr(2, 1) = 1
        // block 3: 1 + mmr(3, 2) = 2
        // block 4: 2 + mmr(4, 3) = 4
        let chain = Chain::grow(5, 0, &mut ScriptedDraws::new([])).unwrap();
        let report = track_ancestry(&chain);
        assert_eq!(
            report.ancestors,
            vec![entry(0, 0), entry(1, 0), entry(2, 1), entry(3, 2)]
        );
        assert_eq!(report.hashes, 4);
    }

    #[test]
    fn test_long_jump_truncates_list() {
        // block 4 could reach genesis, but block 1 is as cheap and closer;
        // block 5 inherits the list cut after block 1, plus block 4
        let draws = [u64::MAX, u64::MAX, u64::MAX, u64::MAX / 4, u64::MAX];
        let chain = Chain::grow(6, 0, &mut ScriptedDraws::new(draws)).unwrap();
        let report = track_ancestry(&chain);
        assert_eq!(
            report.ancestors.iter().map(|e| e.blocknum).collect::<Vec<_>>(),
            vec![0, 1, 4]
        );
        assert_eq!(report.linked, Some(4));

        // block 4: (1, 0) costs 0 + mmr(4, 1) = 2, beating (3, 2) and (2, 1)
        // and tying genesis; block 5: 2 + mmr(3, 2) = 3
        assert_eq!(
            report.ancestors,
            vec![entry(0, 0), entry(1, 0), entry(4, 2)]
        );
        assert_eq!(report.hashes, 3);
        assert_eq!(report.longest_list, 4);
    }

    #[test]
    fn test_target_tip_is_empty() {
        let chain = Chain::grow(3, 2, &mut ScriptedDraws::new([])).unwrap();
        let report = track_ancestry(&chain);
        assert_eq!(report.path_entries, 0);
        assert_eq!(report.hashes, 0);
        assert_eq!(report.linked, None);
    }
}
