//! Bounded log of recently received messages

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

use crate::domain::AgentId;

/// One received message as seen by the coordinator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    /// Time since the coordinator started
    pub elapsed: Duration,
    pub sender: AgentId,
    /// Raw body, kept even when it failed to decode
    pub body: String,
}

impl std::fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} | {} | {}", self.elapsed.as_secs_f64(), self.sender, self.body)
    }
}

/// FIFO of the last `capacity` entries; oldest evicted first
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, entry: ActivityEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    /// Entries formatted as `elapsed | sender | body`, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u64) -> ActivityEntry {
        ActivityEntry {
            elapsed: Duration::from_millis(n * 1500),
            sender: AgentId::from("unit-1"),
            body: format!("msg-{}", n),
        }
    }

    #[test]
    fn test_entry_format() {
        assert_eq!(entry(1).to_string(), "1.50 | unit-1 | msg-1");
    }

    #[test]
    fn test_oldest_evicted_first() {
        let mut log = ActivityLog::new(3);
        for n in 0..5 {
            log.record(entry(n));
        }

        assert_eq!(log.len(), 3);
        let bodies: Vec<_> = log.entries().map(|e| e.body.as_str()).collect();
        assert_eq!(bodies, vec!["msg-2", "msg-3", "msg-4"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut log = ActivityLog::new(0);
        log.record(entry(1));
        assert!(log.is_empty());
    }
}
