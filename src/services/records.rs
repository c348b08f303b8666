// src/services/records.rs

//! Shared, lock-guarded collection of project records.
//!
//! Every mutation takes the single lock for the whole read-scan-write, so
//! concurrent detail visits can merge their results without coordination.
//! The lock is never held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::ProjectRecord;

/// Ordered, append-only store of scraped records keyed by URL.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Mutex<Vec<ProjectRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProjectRecord>> {
        // Critical sections never leave the Vec half-updated.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a newly discovered project.
    ///
    /// Returns `false` without touching the store when a record with the
    /// same URL already exists.
    pub fn append(&self, name: impl Into<String>, url: impl Into<String>) -> bool {
        let url = url.into();
        let mut records = self.lock();
        if records.iter().any(|r| r.url == url) {
            return false;
        }
        records.push(ProjectRecord::new(name, url));
        true
    }

    /// Set the team of the first record whose URL equals `url`.
    ///
    /// Returns `false` when no record matches; the members are dropped.
    pub fn update_team(&self, url: &str, members: Vec<String>) -> bool {
        let mut records = self.lock();
        match records.iter_mut().find(|r| r.url == url) {
            Some(record) => {
                record.team_members = members;
                true
            }
            None => false,
        }
    }

    /// Copy of the current records in insertion order.
    pub fn snapshot(&self) -> Vec<ProjectRecord> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Consume the store and return its records.
    pub fn into_records(self) -> Vec<ProjectRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_append_keeps_discovery_order() {
        let store = RecordStore::new();
        assert!(store.append("Alpha", "http://x/1"));
        assert!(store.append("Beta", "http://x/2"));

        let records = store.snapshot();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ProjectRecord::new("Alpha", "http://x/1"));
        assert_eq!(records[1], ProjectRecord::new("Beta", "http://x/2"));
        assert!(records.iter().all(|r| r.team_members.is_empty()));
    }

    #[test]
    fn test_append_rejects_duplicate_url() {
        let store = RecordStore::new();
        assert!(store.append("Alpha", "http://x/1"));
        assert!(!store.append("Alpha again", "http://x/1"));

        let records = store.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Alpha");
    }

    #[test]
    fn test_update_team_hits_matching_record_only() {
        let store = RecordStore::new();
        store.append("Alpha", "http://x/1");
        store.append("Beta", "http://x/2");

        assert!(store.update_team("http://x/2", members(&["Carol", "Dave"])));

        let records = store.snapshot();
        assert!(records[0].team_members.is_empty());
        assert_eq!(records[1].team_members, members(&["Carol", "Dave"]));
    }

    #[test]
    fn test_update_team_without_match_is_noop() {
        let store = RecordStore::new();
        store.append("Alpha", "http://x/1");

        assert!(!store.update_team("http://x/404", members(&["Nobody"])));
        assert_eq!(store.snapshot(), vec![ProjectRecord::new("Alpha", "http://x/1")]);
    }

    #[test]
    fn test_update_team_last_write_wins() {
        let store = RecordStore::new();
        store.append("Alpha", "http://x/1");

        store.update_team("http://x/1", members(&["A"]));
        store.update_team("http://x/1", members(&["B", "C"]));

        assert_eq!(store.snapshot()[0].team_members, members(&["B", "C"]));
    }

    #[test]
    fn test_is_empty() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        store.append("Alpha", "http://x/1");
        assert!(!store.is_empty());
    }

    #[test]
    fn test_concurrent_append_and_update() {
        let store = Arc::new(RecordStore::new());
        let threads = 8;
        let per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        let url = format!("http://x/{t}/{i}");
                        store.append(format!("P{t}-{i}"), url.clone());
                        assert!(store.update_team(&url, vec![format!("M{t}-{i}")]));
                        // Misses never disturb the store.
                        assert!(!store.update_team(&format!("{url}/missing"), vec![]));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let records = store.snapshot();
        assert_eq!(records.len(), threads * per_thread);
        for record in &records {
            let suffix = record.name.trim_start_matches('P');
            assert_eq!(record.team_members, vec![format!("M{suffix}")]);
        }
    }

    #[test]
    fn test_into_records() {
        let store = RecordStore::new();
        store.append("Alpha", "http://x/1");
        assert_eq!(store.into_records().len(), 1);
    }
}
