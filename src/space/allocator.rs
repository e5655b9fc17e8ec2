//! Live-entry tracking

use super::SpaceProfile;

/// Tracks live entries and their high-water mark
#[derive(Debug, Default)]
pub struct SpaceTracker {
    /// Currently live
    current: usize,

    /// Maximum seen
    max: usize,

    /// Ever allocated
    total: usize,
}

impl SpaceTracker {
    /// Create new tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one allocation
    pub fn allocate(&mut self) {
        self.current += 1;
        self.total += 1;
        self.max = self.max.max(self.current);
    }

    /// Record one release
    pub fn free(&mut self) {
        debug_assert!(self.current > 0, "free without allocation");
        self.current = self.current.saturating_sub(1);
    }

    /// Currently live
    pub fn live(&self) -> usize {
        self.current
    }

    /// Snapshot
    pub fn profile(&self) -> SpaceProfile {
        SpaceProfile {
            peak_entries: self.max,
            live_entries: self.current,
            allocated: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_survives_frees() {
        let mut tracker = SpaceTracker::new();
        tracker.allocate();
        tracker.allocate();
        tracker.free();
        tracker.allocate();
        tracker.free();
        tracker.free();

        let profile = tracker.profile();
        assert_eq!(profile.peak_entries, 2);
        assert_eq!(profile.live_entries, 0);
        assert_eq!(profile.allocated, 3);
        assert!(profile.satisfies_bound(2));
        assert!(!profile.satisfies_bound(1));
        assert_eq!(profile.report(), "peak 2 entries, 0 live, 3 allocated");
    }
}
