//! # Device-to-Device Exchange Channels
//!
//! Two transports carry intent envelopes between devices: a proximity
//! tap and a visual code. The core implements neither radio — it
//! defines the contract both must honor, and ships in-process links
//! that model each transport's behavior for tests and demos.
//!
//! A channel carries opaque envelope strings, nothing else. It never
//! touches the queue: a transport failure is surfaced to the caller
//! and no state changes. Received envelopes are yielded one at a time,
//! in arrival order on that transport.

mod proximity;
mod visual;

pub use proximity::ProximityLink;
pub use visual::VisualCodeLink;

use async_trait::async_trait;
use thiserror::Error;

/// Channel-level failure. Always recoverable: surface it, change
/// nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The peer side of the link is gone.
    #[error("peer disconnected")]
    Disconnected,

    /// The underlying transport reported a failure.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// The envelope contract every exchange transport honors.
#[async_trait]
pub trait ExchangeChannel: Send {
    /// Hand one envelope to the transport.
    async fn send(&mut self, envelope: &str) -> Result<(), TransportError>;

    /// Wait for the next envelope to arrive from the peer.
    async fn recv(&mut self) -> Result<String, TransportError>;
}
