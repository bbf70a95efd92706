//! The settlement authority collaborator contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::queue::Transaction;

/// Acknowledgement from the settlement authority's intake.
///
/// Intake acceptance only — final execution (`completed`) or rejection
/// (`failed`) arrives later, through the authority's callback surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementAck {
    /// Authority-assigned settlement reference for audit correlation.
    pub reference: String,
    /// Epoch milliseconds at which the authority accepted the entry.
    pub accepted_at: i64,
}

/// Why a submission did not go through. Every variant is transient:
/// the entry stays `queued` and is retried on the next online
/// transition. Rejection is *not* an error here — it is a distinct
/// authority signal delivered through the status-update surface.
#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    /// The link to the authority is down. Stops the whole drain; the
    /// remaining entries wait for the next transition.
    #[error("settlement link offline")]
    Offline,

    /// The authority could not take this entry right now. The drain
    /// continues with the next entry (independent-failure policy).
    #[error("settlement authority unavailable: {0}")]
    Unavailable(String),
}

/// External settlement collaborator: one asynchronous `submit` per
/// transaction, no batching assumed by the core.
#[async_trait]
pub trait SettlementService: Send + Sync {
    /// Submit one transaction for settlement.
    async fn submit(&self, tx: &Transaction) -> Result<SettlementAck, SettlementError>;
}

// ---------------------------------------------------------------------------
// Simulated authority
// ---------------------------------------------------------------------------

type SubmitHook = dyn Fn(&Transaction) + Send + Sync;

/// A stand-in settlement authority that acknowledges everything.
///
/// Used by the wallet binary until real rails integration lands, and
/// by tests that need to observe or interfere with the drain. The
/// optional hook runs during each submission — handy for simulating a
/// connectivity loss mid-drain.
pub struct SimulatedSettlement {
    latency: Duration,
    submitted: Mutex<Vec<String>>,
    on_submit: Option<Arc<SubmitHook>>,
}

impl SimulatedSettlement {
    /// An authority that acks instantly.
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            submitted: Mutex::new(Vec::new()),
            on_submit: None,
        }
    }

    /// Add a fixed per-submission delay, approximating network time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Run `hook` during every submission, before the ack is produced.
    pub fn with_hook(mut self, hook: impl Fn(&Transaction) + Send + Sync + 'static) -> Self {
        self.on_submit = Some(Arc::new(hook));
        self
    }

    /// Ids submitted so far, in submission order.
    pub fn submitted_ids(&self) -> Vec<String> {
        self.submitted.lock().clone()
    }

    /// Number of submissions so far.
    pub fn submit_count(&self) -> usize {
        self.submitted.lock().len()
    }
}

impl Default for SimulatedSettlement {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementService for SimulatedSettlement {
    async fn submit(&self, tx: &Transaction) -> Result<SettlementAck, SettlementError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.submitted.lock().push(tx.id.clone());
        if let Some(hook) = &self.on_submit {
            hook(tx);
        }
        Ok(SettlementAck {
            reference: format!("stl_{}", tx.fingerprint),
            accepted_at: chrono::Utc::now().timestamp_millis(),
        })
    }
}
