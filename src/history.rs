// src/history.rs
//! Per-user search history behind a small store interface.

use crate::types::SearchReport;
use dashmap::DashMap;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 50;

pub trait HistoryStore: Send + Sync {
    /// Entries for `user`, oldest first.
    fn get(&self, user: &str) -> Vec<SearchReport>;
    fn set(&self, user: &str, entries: Vec<SearchReport>);
    fn evict_oldest(&self, user: &str) -> Option<SearchReport>;

    /// Append and evict oldest-first until at most `capacity` remain.
    fn append(&self, user: &str, report: SearchReport, capacity: usize) {
        let mut entries = self.get(user);
        entries.push(report);
        let len = entries.len();
        self.set(user, entries);
        for _ in capacity..len {
            self.evict_oldest(user);
        }
    }
}

/// In-process store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: DashMap<String, VecDeque<SearchReport>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> usize {
        self.entries.len()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn get(&self, user: &str) -> Vec<SearchReport> {
        self.entries
            .get(user)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn set(&self, user: &str, entries: Vec<SearchReport>) {
        self.entries.insert(user.to_string(), entries.into());
    }

    fn evict_oldest(&self, user: &str) -> Option<SearchReport> {
        self.entries.get_mut(user).and_then(|mut list| list.pop_front())
    }

    fn append(&self, user: &str, report: SearchReport, capacity: usize) {
        // The entry guard holds the shard lock, so push and evict are one step
        let mut list = self.entries.entry(user.to_string()).or_default();
        list.push_back(report);
        while list.len() > capacity {
            list.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueryType;

    fn report(n: usize) -> SearchReport {
        SearchReport {
            query: format!("user{}", n),
            query_type: QueryType::Social,
            results: Vec::new(),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    /// Store that only implements the required methods, to exercise the default `append`.
    #[derive(Default)]
    struct PlainStore(MemoryHistoryStore);

    impl HistoryStore for PlainStore {
        fn get(&self, user: &str) -> Vec<SearchReport> {
            self.0.get(user)
        }
        fn set(&self, user: &str, entries: Vec<SearchReport>) {
            self.0.set(user, entries)
        }
        fn evict_oldest(&self, user: &str) -> Option<SearchReport> {
            self.0.evict_oldest(user)
        }
    }

    #[test]
    fn test_51st_entry_evicts_oldest() {
        let store = MemoryHistoryStore::new();
        for n in 1..=51 {
            store.append("alice", report(n), DEFAULT_CAPACITY);
        }
        let entries = store.get("alice");
        assert_eq!(entries.len(), 50);
        assert_eq!(entries[0].query, "user2");
        assert_eq!(entries[49].query, "user51");
    }

    #[test]
    fn test_default_append_respects_cap() {
        let store = PlainStore::default();
        for n in 1..=51 {
            store.append("alice", report(n), DEFAULT_CAPACITY);
        }
        let entries = store.get("alice");
        assert_eq!(entries.len(), 50);
        assert_eq!(entries[0].query, "user2");
    }

    #[test]
    fn test_users_are_isolated() {
        let store = MemoryHistoryStore::new();
        store.append("alice", report(1), 2);
        store.append("bob", report(2), 2);
        assert_eq!(store.get("alice").len(), 1);
        assert_eq!(store.get("bob")[0].query, "user2");
        assert_eq!(store.users(), 2);
        assert!(store.get("carol").is_empty());
    }

    #[test]
    fn test_evict_oldest() {
        let store = MemoryHistoryStore::new();
        store.set("alice", vec![report(1), report(2)]);
        assert_eq!(store.evict_oldest("alice").map(|r| r.query), Some("user1".to_string()));
        assert_eq!(store.get("alice").len(), 1);
        assert!(store.evict_oldest("nobody").is_none());
    }
}
