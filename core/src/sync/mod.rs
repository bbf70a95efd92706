//! # Connectivity-Driven Synchronization
//!
//! Three pieces, one job: get queued instructions to the settlement
//! authority the moment the network comes back.
//!
//! - [`ConnectivityMonitor`] — a thin edge-triggered holder of the
//!   current reachability flag. The platform network stack calls
//!   [`ConnectivityMonitor::set_online`]; interested parties subscribe
//!   and get exactly one event per actual transition.
//! - [`SettlementService`] — the external authority collaborator. One
//!   async `submit` per transaction, no batching assumed.
//! - [`SyncEngine`] — walks queued entries oldest-first, one
//!   outstanding submission at a time, and advances each to `synced`
//!   on success. Cancellable at iteration boundaries (never
//!   mid-submission) by a fresh offline observation.
//!
//! The engine owns no transport and spawns no tasks: the caller (the
//! device composition root) decides when a transition means "drain
//! now". That keeps the whole module testable with a mock settlement
//! service and a hand-driven monitor.

mod connectivity;
mod engine;
mod settlement;

pub use connectivity::{
    ConnectivityEvent, ConnectivityMonitor, ConnectivitySubscription, Transition,
};
pub use engine::{DrainReport, SyncEngine};
pub use settlement::{SettlementAck, SettlementError, SettlementService, SimulatedSettlement};
