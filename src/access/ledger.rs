//! Append-only record of served generation requests.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub username: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default)]
pub struct RequestLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, username: &str) {
        self.record_at(username, Utc::now());
    }

    fn record_at(&self, username: &str, timestamp: DateTime<Utc>) {
        self.entries.lock().push(LedgerEntry {
            username: username.to_string(),
            timestamp,
        });
    }

    /// Copy of all entries in insertion order
    pub fn snapshot(&self) -> Vec<LedgerEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
