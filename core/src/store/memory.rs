//! In-memory store: tests, demos, and anything ephemeral.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{StateStore, StoreError};

/// A [`StateStore`] that keeps snapshots in a process-local map.
///
/// Durable for exactly as long as the process lives. Shared freely
/// across tasks; the map is guarded by a mutex because the trait is
/// `Sync`, not because the core ever writes concurrently.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records ever written. Test convenience.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, record: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.lock().get(record).cloned())
    }

    fn write(&self, record: &str, json: &str) -> Result<(), StoreError> {
        self.records.lock().insert(record.to_string(), json.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let store = MemoryStore::new();
        store.write("transaction-storage", r#"{"transactions":[]}"#).unwrap();
        let got = store.read("transaction-storage").unwrap();
        assert_eq!(got.as_deref(), Some(r#"{"transactions":[]}"#));
    }

    #[test]
    fn unwritten_record_reads_none() {
        let store = MemoryStore::new();
        assert!(store.read("auth-storage").unwrap().is_none());
    }

    #[test]
    fn records_are_independent() {
        let store = MemoryStore::new();
        store.write("a", "1").unwrap();
        store.write("b", "2").unwrap();
        store.write("a", "3").unwrap();
        assert_eq!(store.read("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.read("b").unwrap().as_deref(), Some("2"));
    }
}
