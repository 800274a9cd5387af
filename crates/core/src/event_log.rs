//! Append-only, capacity-bounded history of device actions.
//!
//! The log never grows past its capacity: once full, each append evicts
//! the single oldest entry. Entries are immutable once appended; there is
//! no deletion API beyond eviction.

use std::collections::VecDeque;

use domo_domain::device::DeviceId;
use domo_domain::log::LogEntry;

/// Default number of entries retained.
pub const DEFAULT_CAPACITY: usize = 500;

/// Bounded FIFO event log.
///
/// Not internally synchronised; the registry serialises access behind
/// its own lock.
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventLog {
    /// Create a log retaining at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append an entry, evicting the oldest when full. O(1) amortised.
    pub fn append(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Up to `limit` entries, newest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Up to `limit` entries for one device, newest first.
    #[must_use]
    pub fn recent_for_device(&self, id: &DeviceId, limit: usize) -> Vec<LogEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| &entry.device_id == id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Current number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(device: &str, details: &str) -> LogEntry {
        LogEntry::new(DeviceId::new(device), device, "Toggle", details)
    }

    #[test]
    fn should_return_entries_newest_first() {
        let mut log = EventLog::new(10);
        log.append(entry("light1", "first"));
        log.append(entry("light1", "second"));
        log.append(entry("light1", "third"));

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].details, "third");
        assert_eq!(recent[1].details, "second");
    }

    #[test]
    fn should_evict_oldest_when_capacity_exceeded() {
        let capacity = 5;
        let mut log = EventLog::new(capacity);
        for i in 0..=capacity {
            log.append(entry("light1", &format!("entry {i}")));
        }

        assert_eq!(log.len(), capacity);
        let all = log.recent(capacity);
        assert!(all.iter().all(|e| e.details != "entry 0"));
        assert_eq!(all[0].details, format!("entry {capacity}"));
    }

    #[test]
    fn should_filter_by_device() {
        let mut log = EventLog::new(10);
        log.append(entry("light1", "light on"));
        log.append(entry("door1", "door locked"));
        log.append(entry("light1", "light off"));

        let light = log.recent_for_device(&DeviceId::new("light1"), 10);
        assert_eq!(light.len(), 2);
        assert_eq!(light[0].details, "light off");
        assert_eq!(light[1].details, "light on");

        let fan = log.recent_for_device(&DeviceId::new("fan1"), 10);
        assert!(fan.is_empty());
    }

    #[test]
    fn should_respect_limit_in_filtered_reads() {
        let mut log = EventLog::new(10);
        for i in 0..5 {
            log.append(entry("fan1", &format!("speed {i}")));
        }

        let recent = log.recent_for_device(&DeviceId::new("fan1"), 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].details, "speed 4");
    }

    #[test]
    fn should_start_empty() {
        let log = EventLog::default();
        assert!(log.is_empty());
        assert!(log.recent(10).is_empty());
    }

    #[test]
    fn should_never_exceed_capacity_under_sustained_appends() {
        let mut log = EventLog::new(3);
        for i in 0..100 {
            log.append(entry("light1", &format!("{i}")));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.recent(3)[2].details, "97");
    }
}
