//! The drain engine: queued entries → settlement authority.

use std::sync::Arc;

use super::connectivity::ConnectivityMonitor;
use super::settlement::{SettlementError, SettlementService};
use crate::queue::{TransactionQueue, TxStatus};
use crate::store::StoreError;

/// What a single [`SyncEngine::drain`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries for which a submission was started.
    pub attempted: usize,
    /// Entries acknowledged and advanced to `synced`.
    pub synced: usize,
    /// Entries whose submission failed; they remain `queued`.
    pub deferred: usize,
    /// Whether the pass stopped early on a fresh offline observation.
    pub stopped_offline: bool,
}

/// Drains the queue toward the settlement authority.
///
/// The engine is deliberately dumb about scheduling: it runs one pass
/// when asked, submits strictly sequentially (one outstanding
/// submission at a time, so observable queue state advances one entry
/// at a time), and checks the connectivity monitor at every iteration
/// boundary. A mid-drain offline observation stops the pass before the
/// next submission — never during one — leaving a well-defined,
/// contiguous oldest-first tail of still-`queued` entries for the next
/// online transition. Invoking a pass redundantly is a no-op.
pub struct SyncEngine {
    monitor: ConnectivityMonitor,
    settlement: Arc<dyn SettlementService>,
}

impl SyncEngine {
    pub fn new(monitor: ConnectivityMonitor, settlement: Arc<dyn SettlementService>) -> Self {
        Self { monitor, settlement }
    }

    /// Run one drain pass over the queue's settlement batch
    /// (oldest-first).
    ///
    /// Per-entry submission failures leave that entry `queued` and the
    /// pass continues — one flaky entry must not starve the rest. The
    /// exception is [`SettlementError::Offline`], which stops the pass
    /// the same way a monitor transition does. The only hard error is
    /// a persistence failure while advancing a status.
    pub async fn drain(&self, queue: &mut TransactionQueue) -> Result<DrainReport, StoreError> {
        let mut report = DrainReport::default();

        if !self.monitor.is_online() {
            tracing::debug!("drain requested while offline; nothing to do");
            return Ok(report);
        }
        let batch = queue.settlement_batch();
        if batch.is_empty() {
            tracing::debug!("drain requested with empty batch; nothing to do");
            return Ok(report);
        }
        tracing::info!(pending = batch.len(), "drain pass started");

        for tx in &batch {
            if !self.monitor.is_online() {
                report.stopped_offline = true;
                tracing::info!(
                    remaining = batch.len() - report.attempted,
                    "connectivity lost; drain pass stopped"
                );
                break;
            }
            report.attempted += 1;
            match self.settlement.submit(tx).await {
                Ok(ack) => {
                    queue.update_status(&tx.id, TxStatus::Synced)?;
                    report.synced += 1;
                    tracing::debug!(id = %tx.id, reference = %ack.reference, "entry synced");
                }
                Err(SettlementError::Offline) => {
                    report.deferred += 1;
                    report.stopped_offline = true;
                    tracing::warn!(id = %tx.id, "authority reports offline; drain pass stopped");
                    break;
                }
                Err(e) => {
                    report.deferred += 1;
                    tracing::warn!(id = %tx.id, error = %e, "submission failed; entry stays queued");
                }
            }
        }

        tracing::info!(
            attempted = report.attempted,
            synced = report.synced,
            deferred = report.deferred,
            stopped_offline = report.stopped_offline,
            "drain pass finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::TransactionQueue;
    use crate::store::{MemoryStore, StateStore};
    use crate::sync::settlement::{SettlementAck, SimulatedSettlement};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    fn queue() -> TransactionQueue {
        TransactionQueue::open(Arc::new(MemoryStore::new()) as Arc<dyn StateStore>).unwrap()
    }

    /// Authority that fails submissions for a chosen payee.
    struct FlakyAuthority {
        reject_payee: String,
        error: SettlementError,
        submitted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SettlementService for FlakyAuthority {
        async fn submit(
            &self,
            tx: &crate::queue::Transaction,
        ) -> Result<SettlementAck, SettlementError> {
            self.submitted.lock().push(tx.id.clone());
            if tx.payee_upi == self.reject_payee {
                return Err(self.error.clone());
            }
            Ok(SettlementAck {
                reference: format!("stl_{}", tx.fingerprint),
                accepted_at: 0,
            })
        }
    }

    #[tokio::test]
    async fn drain_while_offline_is_a_noop() {
        let mut q = queue();
        q.enqueue(10.0, "a@bank").unwrap();

        let monitor = ConnectivityMonitor::new(false);
        let authority = Arc::new(SimulatedSettlement::new());
        let engine = SyncEngine::new(monitor, authority.clone());

        let report = engine.drain(&mut q).await.unwrap();
        assert_eq!(report, DrainReport::default());
        assert_eq!(authority.submit_count(), 0);
        assert_eq!(q.queued_entries().len(), 1);
    }

    #[tokio::test]
    async fn drain_with_nothing_queued_is_a_noop() {
        let mut q = queue();
        let monitor = ConnectivityMonitor::new(true);
        let authority = Arc::new(SimulatedSettlement::new());
        let engine = SyncEngine::new(monitor, authority.clone());

        let report = engine.drain(&mut q).await.unwrap();
        assert_eq!(report, DrainReport::default());
        assert_eq!(authority.submit_count(), 0);
    }

    #[tokio::test]
    async fn drain_submits_oldest_first_and_syncs() {
        let mut q = queue();
        let first = q.enqueue(1.0, "a@bank").unwrap();
        let second = q.enqueue(2.0, "b@bank").unwrap();
        let third = q.enqueue(3.0, "c@bank").unwrap();

        let monitor = ConnectivityMonitor::new(true);
        let authority = Arc::new(SimulatedSettlement::new());
        let engine = SyncEngine::new(monitor, authority.clone());

        let report = engine.drain(&mut q).await.unwrap();
        assert_eq!(report.attempted, 3);
        assert_eq!(report.synced, 3);
        assert_eq!(report.deferred, 0);

        // Settlement order is the order the user instructed.
        assert_eq!(
            authority.submitted_ids(),
            vec![first.id.clone(), second.id.clone(), third.id.clone()]
        );
        for id in [&first.id, &second.id, &third.id] {
            let tx = q.get(id).unwrap();
            assert_eq!(tx.status, TxStatus::Synced);
            assert!(tx.synced_at.is_some());
        }
    }

    #[tokio::test]
    async fn per_entry_failure_defers_and_continues() {
        let mut q = queue();
        let first = q.enqueue(1.0, "ok@bank").unwrap();
        let second = q.enqueue(2.0, "flaky@bank").unwrap();
        let third = q.enqueue(3.0, "ok@bank").unwrap();

        let authority = Arc::new(FlakyAuthority {
            reject_payee: "flaky@bank".to_string(),
            error: SettlementError::Unavailable("intake full".to_string()),
            submitted: Mutex::new(Vec::new()),
        });
        let engine = SyncEngine::new(ConnectivityMonitor::new(true), authority.clone());

        let report = engine.drain(&mut q).await.unwrap();
        assert_eq!(report.attempted, 3);
        assert_eq!(report.synced, 2);
        assert_eq!(report.deferred, 1);
        assert!(!report.stopped_offline);

        assert_eq!(q.get(&first.id).unwrap().status, TxStatus::Synced);
        assert_eq!(q.get(&second.id).unwrap().status, TxStatus::Queued);
        assert_eq!(q.get(&third.id).unwrap().status, TxStatus::Synced);
    }

    #[tokio::test]
    async fn offline_failure_stops_the_pass() {
        let mut q = queue();
        let first = q.enqueue(1.0, "dead@bank").unwrap();
        let second = q.enqueue(2.0, "never@bank").unwrap();

        let authority = Arc::new(FlakyAuthority {
            reject_payee: "dead@bank".to_string(),
            error: SettlementError::Offline,
            submitted: Mutex::new(Vec::new()),
        });
        let engine = SyncEngine::new(ConnectivityMonitor::new(true), authority.clone());

        let report = engine.drain(&mut q).await.unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.synced, 0);
        assert!(report.stopped_offline);

        // Only the oldest was ever attempted; both remain queued.
        assert_eq!(authority.submitted.lock().len(), 1);
        assert_eq!(q.get(&first.id).unwrap().status, TxStatus::Queued);
        assert_eq!(q.get(&second.id).unwrap().status, TxStatus::Queued);
    }

    #[tokio::test]
    async fn offline_transition_mid_drain_leaves_contiguous_tail() {
        let mut q = queue();
        let first = q.enqueue(1.0, "a@bank").unwrap();
        let second = q.enqueue(2.0, "b@bank").unwrap();
        let third = q.enqueue(3.0, "c@bank").unwrap();

        let monitor = ConnectivityMonitor::new(true);
        let flipper = monitor.clone();
        // The platform reports offline while the first submission is in
        // flight; the engine must stop at the next iteration boundary.
        let authority =
            Arc::new(SimulatedSettlement::new().with_hook(move |_| {
                flipper.set_online(false);
            }));
        let engine = SyncEngine::new(monitor, authority.clone());

        let report = engine.drain(&mut q).await.unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.synced, 1);
        assert!(report.stopped_offline);

        assert_eq!(q.get(&first.id).unwrap().status, TxStatus::Synced);
        assert_eq!(q.get(&second.id).unwrap().status, TxStatus::Queued);
        assert_eq!(q.get(&third.id).unwrap().status, TxStatus::Queued);
        assert_eq!(authority.submit_count(), 1);
    }
}
