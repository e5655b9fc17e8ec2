//! Space accounting for ancestor bookkeeping
//!
//! Counts live ancestor entries so eager pruning can be checked against
//! the O(path) bound it promises.

mod allocator;

pub use allocator::SpaceTracker;

/// Snapshot of entry usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct SpaceProfile {
    /// Most entries live at once
    pub peak_entries: usize,

    /// Entries live when the snapshot was taken
    pub live_entries: usize,

    /// Entries ever allocated
    pub allocated: usize,
}

impl SpaceProfile {
    /// Verify the peak stayed within `bound`
    pub fn satisfies_bound(&self, bound: usize) -> bool {
        self.peak_entries <= bound
    }

    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "peak {} entries, {} live, {} allocated",
            self.peak_entries, self.live_entries, self.allocated
        )
    }
}
