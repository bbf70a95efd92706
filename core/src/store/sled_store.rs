//! sled-backed store: the on-disk persistence used by the wallet.

use std::path::Path;

use super::{StateStore, StoreError};

/// A [`StateStore`] over a sled database.
///
/// Each named record is one key in the default tree, value = the JSON
/// snapshot bytes. Every write is flushed before returning so the
/// queue's write-through guarantee holds across power loss, not just
/// process exit.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open or create a store at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self { db })
    }

    /// Open a throwaway store in a temporary location. Test helper.
    pub fn open_temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self { db })
    }
}

impl StateStore for SledStore {
    fn read(&self, record: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .db
            .get(record.as_bytes())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match value {
            None => Ok(None),
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    StoreError::CorruptRecord {
                        record: record.to_string(),
                        reason: "snapshot is not UTF-8".to_string(),
                    }
                })?;
                Ok(Some(text))
            }
        }
    }

    fn write(&self, record: &str, json: &str) -> Result<(), StoreError> {
        self.db
            .insert(record.as_bytes(), json.as_bytes())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}
