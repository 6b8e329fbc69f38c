//! Statistics snapshots.

use core::time::Duration;

use serde::Serialize;

/// Counts kept by a [`CompletionList`](crate::CompletionList).
///
/// Read with relaxed ordering, so a snapshot taken while producers are busy
/// is only approximately consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListStats {
    /// Items pushed since the list was created.
    pub pushed: usize,
    /// Items removed by steals since the list was created.
    pub drained: usize,
}

impl ListStats {
    /// Items pushed but not yet stolen.
    pub fn pending(&self) -> usize {
        self.pushed.saturating_sub(self.drained)
    }
}

/// What one call to [`CompletionList::drain`](crate::CompletionList::drain) did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Non-empty steals performed.
    pub batches: usize,
    /// Items exported and released.
    pub items: usize,
    /// Completion notifications sent. Zero in debug mode.
    pub notified: usize,
    /// Batches whose minimum identifier had to be moved to the front.
    pub reordered: usize,
    /// Wall time spent inside the exporter.
    pub export_time: Duration,
}

impl DrainReport {
    pub(crate) fn absorb(&mut self, cycle: &CycleReport) {
        self.batches += 1;
        self.items += cycle.items;
        self.notified += cycle.notified;
        self.reordered += usize::from(cycle.reordered);
        self.export_time += cycle.export_time;
    }
}

/// What one steal, export and notify cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Items in the stolen batch.
    pub items: usize,
    /// Completion notifications sent.
    pub notified: usize,
    /// Whether the minimum identifier was moved to the front.
    pub reordered: bool,
    /// Wall time spent inside the exporter.
    pub export_time: Duration,
}
