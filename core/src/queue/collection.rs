//! The ordered transaction collection and its write-through persistence.

use std::sync::Arc;

use chrono::Utc;

use super::types::{Transaction, TxStatus};
use crate::config;
use crate::store::{QueueRecord, StateStore, StoreError};

/// Outcome of an [`TransactionQueue::update_status`] call.
///
/// Late and duplicate updates are tolerated, not errors — a settlement
/// callback may race a local view, and an update for an id we never
/// had (or no longer a legal advance) simply does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The transition was legal and has been applied and persisted.
    Applied,
    /// The entry exists but the requested transition is not a forward
    /// move in the lattice; nothing changed.
    Ignored,
    /// No entry with that id; nothing changed.
    UnknownId,
}

/// Ordered collection of transactions with a status lifecycle.
///
/// Canonical order is newest-first. Every mutation persists the full
/// collection snapshot to the store before returning (write-through);
/// if the write fails the in-memory state is rolled back, so memory
/// and disk never disagree.
///
/// The queue is a single-actor structure: all mutation goes through
/// `&mut self`, and the surrounding [`crate::device::Device`] is the
/// one actor that holds it. No internal locking.
pub struct TransactionQueue {
    store: Arc<dyn StateStore>,
    /// Newest first.
    entries: Vec<Transaction>,
    /// Last connectivity flag recorded into the snapshot.
    last_online: bool,
}

impl std::fmt::Debug for TransactionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionQueue")
            .field("entries", &self.entries)
            .field("last_online", &self.last_online)
            .finish_non_exhaustive()
    }
}

impl TransactionQueue {
    /// Open the queue over a store, loading any prior snapshot.
    pub fn open(store: Arc<dyn StateStore>) -> Result<Self, StoreError> {
        let record = match store.read(config::RECORD_TRANSACTIONS)? {
            None => QueueRecord::default(),
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| StoreError::CorruptRecord {
                    record: config::RECORD_TRANSACTIONS.to_string(),
                    reason: e.to_string(),
                })?
            }
        };
        tracing::debug!(
            entries = record.transactions.len(),
            last_online = record.is_online,
            "transaction queue loaded"
        );
        Ok(Self {
            store,
            entries: record.transactions,
            last_online: record.is_online,
        })
    }

    /// Record a new payment instruction as the newest entry.
    ///
    /// No amount or UPI validation happens here — callers validate.
    /// The only failure mode is the persistence write, and on that
    /// failure the entry is not retained.
    pub fn enqueue(
        &mut self,
        amount: f64,
        payee_upi: impl Into<String>,
    ) -> Result<Transaction, StoreError> {
        let tx = Transaction::new(amount, payee_upi);
        self.entries.insert(0, tx.clone());
        if let Err(e) = self.persist() {
            self.entries.remove(0);
            return Err(e);
        }
        tracing::info!(
            id = %tx.id,
            amount = tx.amount,
            payee = %tx.payee_upi,
            fingerprint = %tx.fingerprint,
            "transaction queued"
        );
        Ok(tx)
    }

    /// Advance an entry's status.
    ///
    /// Unknown ids and non-forward transitions are quiet no-ops (see
    /// [`StatusUpdate`]). `synced_at` is stamped exactly once, on the
    /// first transition to [`TxStatus::Synced`].
    pub fn update_status(
        &mut self,
        id: &str,
        new_status: TxStatus,
    ) -> Result<StatusUpdate, StoreError> {
        let Some(idx) = self.entries.iter().position(|t| t.id == id) else {
            tracing::debug!(id, status = %new_status, "status update for unknown id ignored");
            return Ok(StatusUpdate::UnknownId);
        };
        let previous = self.entries[idx].clone();
        if !previous.status.can_advance_to(new_status) {
            if previous.status != new_status {
                tracing::warn!(
                    id,
                    from = %previous.status,
                    to = %new_status,
                    "illegal status transition ignored"
                );
            }
            return Ok(StatusUpdate::Ignored);
        }

        {
            let entry = &mut self.entries[idx];
            entry.status = new_status;
            if new_status == TxStatus::Synced && entry.synced_at.is_none() {
                entry.synced_at = Some(Utc::now());
            }
        }
        if let Err(e) = self.persist() {
            self.entries[idx] = previous;
            return Err(e);
        }
        tracing::info!(id, status = %new_status, "transaction status advanced");
        Ok(StatusUpdate::Applied)
    }

    /// Most-recent-first display projection, truncated to `n`.
    pub fn list_recent(&self, n: usize) -> Vec<Transaction> {
        self.entries.iter().take(n).cloned().collect()
    }

    /// All `queued` entries in canonical (newest-first) order.
    pub fn queued_entries(&self) -> Vec<Transaction> {
        self.entries
            .iter()
            .filter(|t| t.status == TxStatus::Queued)
            .cloned()
            .collect()
    }

    /// All `queued` entries oldest-first — the order the settlement
    /// authority should see them in. Consumed by the sync engine.
    pub fn settlement_batch(&self) -> Vec<Transaction> {
        self.entries
            .iter()
            .rev()
            .filter(|t| t.status == TxStatus::Queued)
            .cloned()
            .collect()
    }

    /// Look up a single entry by id.
    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.entries.iter().find(|t| t.id == id)
    }

    /// Total entries, any status.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record the last-known connectivity flag into the snapshot.
    ///
    /// The flag lives inside the queue record for compatibility with
    /// the snapshot shape; the queue is its single writer.
    pub fn record_online_flag(&mut self, online: bool) -> Result<(), StoreError> {
        if self.last_online == online {
            return Ok(());
        }
        self.last_online = online;
        if let Err(e) = self.persist() {
            self.last_online = !online;
            return Err(e);
        }
        Ok(())
    }

    /// Last connectivity flag written to the snapshot.
    pub fn last_online_flag(&self) -> bool {
        self.last_online
    }

    fn persist(&self) -> Result<(), StoreError> {
        let record = QueueRecord {
            transactions: self.entries.clone(),
            is_online: self.last_online,
        };
        let json = serde_json::to_string(&record)?;
        self.store.write(config::RECORD_TRANSACTIONS, &json)
    }
}
