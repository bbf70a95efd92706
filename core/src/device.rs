//! # The Device Composition Root
//!
//! One [`Device`] per physical device: it owns the transaction queue,
//! the connectivity monitor, and the sync engine, wired together with
//! injected collaborators (persistence store, settlement service) at
//! construction. Nothing here is a global — two devices in one process
//! are just two `Device` values, which is exactly how the exchange
//! tests run.
//!
//! The device is the system's single logical actor: all queue
//! mutations, connectivity transitions, and drain passes go through
//! `&mut self`, so no two mutations ever interleave. Suspension points
//! exist only at submission boundaries inside a drain.

use std::sync::Arc;

use thiserror::Error;

use crate::intent::{self, CodecError, PaymentIntent};
use crate::queue::{StatusUpdate, Transaction, TransactionQueue, TxStatus};
use crate::store::{StateStore, StoreError};
use crate::sync::{
    ConnectivityMonitor, DrainReport, SettlementService, SyncEngine, Transition,
};

/// Failures surfaced by the device's envelope-exchange surface.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The received envelope was rejected by the codec. Nothing was
    /// enqueued.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Final verdict from the settlement authority for an already-synced
/// (or still-queued) entry. Delivered by the external authority
/// callback; the core exposes this surface but never invokes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Financially executed.
    Completed,
    /// Explicitly rejected.
    Failed,
}

/// One device's payment core: queue + monitor + engine.
pub struct Device {
    queue: TransactionQueue,
    monitor: ConnectivityMonitor,
    engine: SyncEngine,
}

impl Device {
    /// Compose a device over a persistence store and a settlement
    /// collaborator, loading any prior queue snapshot.
    ///
    /// Reachability resumes from the snapshot's last-known flag (a
    /// fresh store means offline). Drains are edge-triggered, so
    /// resuming as online does not drain by itself — use
    /// [`Device::drain_now`] when "drain whatever is pending" is the
    /// intent regardless of transitions.
    pub fn new(
        store: Arc<dyn StateStore>,
        settlement: Arc<dyn SettlementService>,
    ) -> Result<Self, StoreError> {
        let queue = TransactionQueue::open(store)?;
        let monitor = ConnectivityMonitor::new(queue.last_online_flag());
        let engine = SyncEngine::new(monitor.clone(), settlement);
        Ok(Self {
            queue,
            monitor,
            engine,
        })
    }

    /// Record a payment instruction. Validation of amount and UPI
    /// shape is the caller's job; capture never fails locally.
    pub fn pay(
        &mut self,
        amount: f64,
        payee_upi: impl Into<String>,
    ) -> Result<Transaction, StoreError> {
        self.queue.enqueue(amount, payee_upi)
    }

    /// Feed a reachability observation from the platform.
    ///
    /// Exactly one drain pass runs per offline→online transition; all
    /// other observations (including repeats) drain nothing. The
    /// last-known flag is recorded into the queue snapshot on every
    /// actual transition.
    pub async fn set_online(&mut self, online: bool) -> Result<Option<DrainReport>, StoreError> {
        match self.monitor.set_online(online) {
            Transition::Unchanged => Ok(None),
            Transition::WentOffline => {
                self.queue.record_online_flag(false)?;
                Ok(None)
            }
            Transition::CameOnline => {
                self.queue.record_online_flag(true)?;
                let report = self.engine.drain(&mut self.queue).await?;
                Ok(Some(report))
            }
        }
    }

    /// Run a drain pass right now, regardless of transitions. Safe to
    /// invoke redundantly: offline or empty-queue passes are no-ops.
    pub async fn drain_now(&mut self) -> Result<DrainReport, StoreError> {
        self.engine.drain(&mut self.queue).await
    }

    /// Encode the newest transaction as an intent envelope for a
    /// device-to-device handoff. `None` when nothing has been queued
    /// yet. The intent carries a fresh timestamp — it is a new
    /// instruction for the peer, not a copy of our record.
    pub fn share_latest(&self) -> Option<String> {
        let newest = self.queue.list_recent(1).into_iter().next()?;
        let intent = PaymentIntent::new(newest.amount, newest.payee_upi);
        Some(intent::encode(&intent))
    }

    /// Accept an envelope from either exchange transport.
    ///
    /// Decode and validation happen before any state change; a
    /// rejected envelope mutates nothing. A valid intent becomes a
    /// brand-new queued transaction with its own id — no causal link
    /// to the sender's record.
    pub fn receive_envelope(&mut self, envelope: &str) -> Result<Transaction, DeviceError> {
        let intent = intent::decode(envelope)?;
        tracing::info!(
            amount = intent.amount,
            payee = %intent.payee_upi,
            sender_timestamp = intent.timestamp,
            "intent received from peer"
        );
        Ok(self.queue.enqueue(intent.amount, intent.payee_upi)?)
    }

    /// The settlement authority's callback surface: final outcome for
    /// one entry. The core never calls this itself.
    pub fn apply_settlement_update(
        &mut self,
        id: &str,
        outcome: SettlementOutcome,
    ) -> Result<StatusUpdate, StoreError> {
        let status = match outcome {
            SettlementOutcome::Completed => TxStatus::Completed,
            SettlementOutcome::Failed => TxStatus::Failed,
        };
        self.queue.update_status(id, status)
    }

    /// Read access to the queue.
    pub fn queue(&self) -> &TransactionQueue {
        &self.queue
    }

    /// The device's connectivity monitor, for platform glue that wants
    /// to subscribe or report observations directly.
    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::sync::SimulatedSettlement;

    fn device_with(authority: Arc<SimulatedSettlement>) -> Device {
        Device::new(Arc::new(MemoryStore::new()), authority).unwrap()
    }

    #[tokio::test]
    async fn coming_online_drains_exactly_once() {
        let authority = Arc::new(SimulatedSettlement::new());
        let mut device = device_with(authority.clone());
        device.pay(250.0, "alice@bank").unwrap();

        let report = device.set_online(true).await.unwrap().expect("drained");
        assert_eq!(report.synced, 1);
        assert_eq!(authority.submit_count(), 1);

        // A repeated equivalent observation is an idempotent no-op.
        assert!(device.set_online(true).await.unwrap().is_none());
        assert_eq!(authority.submit_count(), 1);
    }

    #[tokio::test]
    async fn going_offline_never_drains() {
        let authority = Arc::new(SimulatedSettlement::new());
        let mut device = device_with(authority.clone());
        device.pay(10.0, "a@b").unwrap();

        assert!(device.set_online(false).await.unwrap().is_none());
        device.set_online(true).await.unwrap();
        assert!(device.set_online(false).await.unwrap().is_none());
        assert_eq!(authority.submit_count(), 1);
    }

    #[tokio::test]
    async fn received_envelope_becomes_independent_transaction() {
        let authority = Arc::new(SimulatedSettlement::new());
        let mut sender = device_with(authority.clone());
        let mut receiver = device_with(authority);

        let original = sender.pay(99.5, "bob@pay").unwrap();
        let envelope = sender.share_latest().expect("something to share");
        let received = receiver.receive_envelope(&envelope).unwrap();

        assert_ne!(received.id, original.id);
        assert_eq!(received.amount, 99.5);
        assert_eq!(received.payee_upi, "bob@pay");
        assert_eq!(received.status, TxStatus::Queued);
    }

    #[tokio::test]
    async fn rejected_envelope_mutates_nothing() {
        let mut device = device_with(Arc::new(SimulatedSettlement::new()));
        let err = device.receive_envelope("!!definitely not base64!!").unwrap_err();
        assert!(matches!(err, DeviceError::Codec(_)));
        assert!(device.queue().is_empty());
    }

    #[tokio::test]
    async fn nothing_to_share_on_a_fresh_device() {
        let device = device_with(Arc::new(SimulatedSettlement::new()));
        assert!(device.share_latest().is_none());
    }

    #[tokio::test]
    async fn authority_callback_drives_terminal_states() {
        let mut device = device_with(Arc::new(SimulatedSettlement::new()));
        let tx = device.pay(5.0, "a@b").unwrap();
        device.set_online(true).await.unwrap();

        let update = device
            .apply_settlement_update(&tx.id, SettlementOutcome::Completed)
            .unwrap();
        assert_eq!(update, StatusUpdate::Applied);
        assert_eq!(device.queue().get(&tx.id).unwrap().status, TxStatus::Completed);
    }

    #[tokio::test]
    async fn transitions_record_the_flag_into_the_snapshot() {
        let mut device = device_with(Arc::new(SimulatedSettlement::new()));
        device.set_online(true).await.unwrap();
        assert!(device.queue().last_online_flag());
        device.set_online(false).await.unwrap();
        assert!(!device.queue().last_online_flag());
    }
}
