//! Transaction record and status lattice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;

/// Settlement progress of a transaction. Strictly forward-moving:
///
/// ```text
///   queued ──► synced ──► completed
///      │
///      └─────► failed
/// ```
///
/// `synced` is set by the sync engine on successful submission.
/// `completed` and `failed` are set only by the external settlement
/// authority's callback — the core exposes the transition surface but
/// never drives it. There is no demotion: an entry that reached
/// `synced` stays at least `synced` even if the device goes offline
/// again, and the two terminal states are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Captured locally, not yet submitted. The initial state.
    Queued,
    /// Accepted by the settlement authority's intake.
    Synced,
    /// Terminal: financially executed.
    Completed,
    /// Terminal: explicitly rejected by the settlement authority.
    Failed,
}

impl TxStatus {
    /// Whether the lattice permits moving from `self` to `next`.
    /// Same-state "transitions" are not advances and return `false`.
    pub fn can_advance_to(self, next: TxStatus) -> bool {
        matches!(
            (self, next),
            (TxStatus::Queued, TxStatus::Synced)
                | (TxStatus::Queued, TxStatus::Failed)
                | (TxStatus::Synced, TxStatus::Completed)
        )
    }

    /// Terminal states admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, TxStatus::Completed | TxStatus::Failed)
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TxStatus::Queued => "queued",
            TxStatus::Synced => "synced",
            TxStatus::Completed => "completed",
            TxStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A single payment instruction and its settlement progress.
///
/// Serialized camelCase so the persisted snapshot matches the record
/// shape earlier generations of the app wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque unique id, assigned at creation, never reused.
    pub id: String,
    /// Positive amount in the ambient currency. Not validated against
    /// any balance here; that precondition belongs to the caller.
    pub amount: f64,
    /// Recipient UPI handle.
    pub payee_upi: String,
    /// Current settlement progress.
    pub status: TxStatus,
    /// Deterministic content fingerprint over (id, amount, payee,
    /// created_at). Usable as a dedup or audit key precisely because
    /// it is reproducible from the record.
    pub fingerprint: String,
    /// Creation time. Set exactly once, never mutated.
    pub created_at: DateTime<Utc>,
    /// Stamped the moment status first becomes `synced`; absent before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Construct a fresh queued transaction with a new id and a
    /// content-derived fingerprint.
    pub(crate) fn new(amount: f64, payee_upi: impl Into<String>) -> Self {
        let payee_upi = payee_upi.into();
        let id = format!("{}{}", config::TX_ID_PREFIX, uuid::Uuid::new_v4().simple());
        let created_at = Utc::now();
        let fingerprint = derive_fingerprint(&id, amount, &payee_upi, created_at);
        Self {
            id,
            amount,
            payee_upi,
            status: TxStatus::Queued,
            fingerprint,
            created_at,
            synced_at: None,
        }
    }
}

/// Derive the content fingerprint of a transaction record.
///
/// blake3 over the identifying fields, truncated to
/// [`config::FINGERPRINT_LEN`] hex characters. The same record always
/// yields the same fingerprint — this replaces an earlier random token
/// that could serve neither dedup nor audit.
pub fn derive_fingerprint(
    id: &str,
    amount: f64,
    payee_upi: &str,
    created_at: DateTime<Utc>,
) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(id.as_bytes());
    hasher.update(&amount.to_bits().to_le_bytes());
    hasher.update(payee_upi.as_bytes());
    hasher.update(&created_at.timestamp_millis().to_le_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest.as_bytes()[..config::FINGERPRINT_LEN / 2])
}
