//! # Persistence Collaborator
//!
//! SETU persists through a deliberately dumb key-value contract: three
//! independent named records, each written as a complete JSON snapshot
//! on every mutation. No partial updates, no migrations, no cleverness.
//! Write-through (not write-behind): the queue reports a mutation as
//! done only after the snapshot landed in the store.
//!
//! | Record                | Shape                         | Owner          |
//! |-----------------------|-------------------------------|----------------|
//! | `transaction-storage` | [`QueueRecord`]               | the core queue |
//! | `auth-storage`        | [`AuthRecord`]                | auth UI glue   |
//! | `payment-reminders`   | `Vec<`[`Reminder`]`>`         | reminders glue |
//!
//! The core drives only the first; the other two shapes are defined
//! here so every collaborator agrees on them.
//!
//! Whole-snapshot writes are fine at wallet scale (tens to hundreds of
//! entries). TODO: switch the queue record to an append-only log before
//! anyone points this at a merchant-volume queue.

mod memory;
mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::queue::Transaction;

/// Errors surfaced by a [`StateStore`] implementation.
///
/// Persistence failures are a collaborator concern, but they are never
/// swallowed: the queue propagates them upward and the mutation is
/// reported as failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not read or write the record.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A record was present but its JSON snapshot did not parse.
    #[error("corrupt record {record}: {reason}")]
    CorruptRecord {
        /// Which named record failed to parse.
        record: String,
        /// Parser diagnostic.
        reason: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Backend(format!("json: {e}"))
    }
}

/// The key-value persistence contract.
///
/// Implementations must make `write` durable before returning — the
/// queue's write-through guarantee is only as good as the store's.
pub trait StateStore: Send + Sync {
    /// Read the JSON snapshot of a named record, `None` if never written.
    fn read(&self, record: &str) -> Result<Option<String>, StoreError>;

    /// Replace the JSON snapshot of a named record.
    fn write(&self, record: &str, json: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Record Shapes
// ---------------------------------------------------------------------------

/// Snapshot shape of the `transaction-storage` record: the full ordered
/// transaction collection (newest first) plus the last connectivity
/// state the device observed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    /// All transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// Last-known reachability at the time of the write.
    #[serde(default)]
    pub is_online: bool,
}

/// Snapshot shape of the `auth-storage` record. The core never writes
/// this; balance preconditions are the UI collaborator's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRecord {
    /// The signed-in user, if any.
    pub user: Option<UserProfile>,
    /// Whether a session is active.
    #[serde(default)]
    pub is_authenticated: bool,
}

/// The signed-in user's identity and displayed balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub balance: f64,
}

/// Snapshot shape of a single entry in the `payment-reminders` record.
/// Fully outside the core's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub recipient_upi: String,
    /// One of `once`, `daily`, `weekly`, `monthly`.
    pub frequency: String,
    pub next_due: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
