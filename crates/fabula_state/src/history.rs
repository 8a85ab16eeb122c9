//! Bounded change history.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::world::WorldState;

/// One recorded change.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// The snapshot after the change was applied.
    pub state: Arc<WorldState>,
    /// When the change was recorded, in milliseconds since the epoch.
    pub timestamp: u64,
    /// Human-readable description of the change, if one was given.
    pub description: Option<String>,
    /// The command that caused the change, if the host supplied one.
    pub command: Option<String>,
}

/// A bounded ring of [`HistoryEntry`] values, oldest first.
///
/// Pushing beyond capacity evicts the oldest entry. Snapshots share
/// structure, so a long history of a large world stays cheap.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    /// Creates an empty history holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Records an entry, evicting the oldest when full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            tracing::debug!(capacity = self.capacity, "history full, evicted oldest entry");
        }
        self.entries.push_back(entry);
    }

    /// The number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
