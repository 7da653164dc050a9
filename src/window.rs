// src/window.rs

//! The sliding window of recent request timestamps

// dependencies
use std::collections::VecDeque;

/// Timestamps (nanoseconds) of recorded requests, oldest first, plus the
/// number of admitted callers that have not recorded yet.
/// Entries are never out of order; stale entries leave from the front only.
#[derive(Debug, Default)]
pub(crate) struct SlidingWindow {
    entries: VecDeque<u64>,
    pending: usize,
}

impl SlidingWindow {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Drop the stale prefix: entries that are more than `window_nanos` old.
    /// Returns how many entries were removed.
    pub(crate) fn prune(&mut self, now: u64, window_nanos: u64) -> usize {
        let mut removed = 0;
        while let Some(&oldest) = self.entries.front() {
            if now.saturating_sub(oldest) > window_nanos {
                self.entries.pop_front();
                removed += 1;
            } else {
                break;
            }
        }
        removed
    }

    /// Slots taken in the current window, counting pending reservations
    pub(crate) fn occupancy(&self) -> usize {
        self.entries.len() + self.pending
    }

    pub(crate) fn recorded(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending
    }

    /// Nanoseconds until a slot can free up: the oldest entry turns stale
    /// one nanosecond after it is exactly `window_nanos` old.
    /// With only reservations in the window, nothing can free up for at
    /// least a full window.
    pub(crate) fn wait_for_slot(&self, now: u64, window_nanos: u64) -> u64 {
        match self.entries.front() {
            Some(&oldest) => {
                let elapsed = now.saturating_sub(oldest);
                window_nanos.saturating_sub(elapsed).saturating_add(1)
            }
            None => window_nanos,
        }
    }

    pub(crate) fn reserve(&mut self) {
        self.pending += 1;
    }

    pub(crate) fn release(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    /// Append a timestamp, clamped so the queue stays non-decreasing
    /// even if the clock stepped backwards. Returns the stored timestamp.
    pub(crate) fn record(&mut self, now: u64) -> u64 {
        let stamp = self.entries.back().map_or(now, |&newest| newest.max(now));
        self.entries.push_back(stamp);
        stamp
    }

    #[cfg(test)]
    pub(crate) fn timestamps(&self) -> Vec<u64> {
        self.entries.iter().copied().collect()
    }
}
