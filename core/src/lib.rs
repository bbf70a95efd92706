//! # SETU — Offline-First Payment Core
//!
//! SETU is a payment queue built for the network that actually exists:
//! the one that drops out in elevators, basements, and half the places
//! people actually pay each other. A payment instruction is captured
//! locally the moment the user confirms it, survives any amount of
//! offline time, and is settled with the remote authority when (not if)
//! connectivity returns. Two devices can also hand an instruction to
//! each other directly — a proximity tap or a visual code — with no
//! network anywhere in the path.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of
//! an offline-first wallet:
//!
//! - **intent** — The transient payment intent and its envelope codec.
//!   The only wire format in the system; specified to the byte.
//! - **queue** — The transaction queue: the single source of truth for
//!   "what has the user instructed, and what state is it in".
//! - **sync** — Connectivity monitoring and the drain engine that walks
//!   queued entries toward the settlement authority.
//! - **channel** — The envelope contract both device-to-device
//!   transports (proximity, visual code) must honor.
//! - **store** — The key-value persistence collaborator. Whole-snapshot
//!   JSON records, nothing clever.
//! - **device** — The composition root wiring the above into one
//!   logical actor per device.
//! - **config** — Record names and protocol constants.
//!
//! ## Design Philosophy
//!
//! 1. The queue never lies: every mutation is persisted before it is
//!    reported as done.
//! 2. Offline is the normal case, not the error case.
//! 3. Collaborators (settlement authority, transports, storage) are
//!    traits injected at the edge — nothing global, nothing ambient.
//! 4. If it touches money, it has tests. Plural.

pub mod channel;
pub mod config;
pub mod device;
pub mod intent;
pub mod queue;
pub mod store;
pub mod sync;

pub use device::{Device, DeviceError, SettlementOutcome};
pub use intent::{CodecError, PaymentIntent};
pub use queue::{Transaction, TransactionQueue, TxStatus};
pub use store::{StateStore, StoreError};
pub use sync::{
    ConnectivityMonitor, DrainReport, SettlementAck, SettlementError, SettlementService,
    SyncEngine,
};
