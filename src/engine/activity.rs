//! Activity sink: the side-effect channel every game operation writes to.

use std::collections::VecDeque;

use serde::Serialize;

use crate::engine::models::ActivityEntry;

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 25;

/// Anything that accepts activity entries.
pub trait ActivitySink {
    fn record(&mut self, entry: ActivityEntry);
}

/// Collects every entry, unbounded. Handy for inspecting a single transition.
impl ActivitySink for Vec<ActivityEntry> {
    fn record(&mut self, entry: ActivityEntry) {
        self.push(entry);
    }
}

/// Bounded feed, newest first. Older entries fall off the end.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    /// Entries newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl ActivitySink for ActivityLog {
    fn record(&mut self, entry: ActivityEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }
}
