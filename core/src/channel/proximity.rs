//! In-process model of the proximity (tap) transport.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ExchangeChannel, TransportError};

/// One end of a paired proximity link.
///
/// Models the NFC tap: a duplex, ordered, unbounded stream of
/// envelopes between exactly two devices held together. Every envelope
/// sent is delivered (while the peer lives), in order — unlike the
/// visual-code link, nothing is ever replaced.
pub struct ProximityLink {
    to_peer: mpsc::UnboundedSender<String>,
    from_peer: mpsc::UnboundedReceiver<String>,
}

impl ProximityLink {
    /// Create both ends of a tap session.
    pub fn pair() -> (ProximityLink, ProximityLink) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (
            ProximityLink {
                to_peer: a_tx,
                from_peer: b_rx,
            },
            ProximityLink {
                to_peer: b_tx,
                from_peer: a_rx,
            },
        )
    }
}

#[async_trait]
impl ExchangeChannel for ProximityLink {
    async fn send(&mut self, envelope: &str) -> Result<(), TransportError> {
        self.to_peer
            .send(envelope.to_string())
            .map_err(|_| TransportError::Disconnected)
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        self.from_peer
            .recv()
            .await
            .ok_or(TransportError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn envelopes_arrive_in_order_both_directions() {
        let (mut left, mut right) = ProximityLink::pair();

        left.send("e1").await.unwrap();
        left.send("e2").await.unwrap();
        right.send("r1").await.unwrap();

        assert_eq!(right.recv().await.unwrap(), "e1");
        assert_eq!(right.recv().await.unwrap(), "e2");
        assert_eq!(left.recv().await.unwrap(), "r1");
    }

    #[tokio::test]
    async fn dropped_peer_surfaces_disconnect() {
        let (mut left, right) = ProximityLink::pair();
        drop(right);
        assert_eq!(left.send("e1").await, Err(TransportError::Disconnected));
        assert_eq!(left.recv().await, Err(TransportError::Disconnected));
    }
}
