//! The transient payment-intent payload.

use serde::{Deserialize, Serialize};

/// A payment instruction in transit between two devices.
///
/// Deliberately minimal: no id, no status, no sender identity. The
/// receiving device enqueues it as a fresh [`crate::queue::Transaction`]
/// with its own id and `created_at` — no causal link to the sender's
/// record is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Positive amount in the ambient currency. Carried as a JSON
    /// number on the wire, so `f64` here — the codec rejects anything
    /// non-finite or non-positive.
    pub amount: f64,
    /// Recipient UPI handle, freeform `handle@provider`. The codec only
    /// requires it to be non-empty; format validation belongs to the
    /// composing UI.
    pub payee_upi: String,
    /// Epoch milliseconds at which the sender composed the intent.
    /// Distinct from the receiver's `created_at`, which is stamped at
    /// enqueue time.
    pub timestamp: i64,
}

impl PaymentIntent {
    /// Compose an intent stamped with the current wall-clock time.
    pub fn new(amount: f64, payee_upi: impl Into<String>) -> Self {
        Self {
            amount,
            payee_upi: payee_upi.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
