//! In-process model of the visual-code (QR) transport.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::{ExchangeChannel, TransportError};

/// One presented code per direction. A display shows exactly one code
/// at a time, so presenting a new envelope replaces an unscanned one.
#[derive(Default)]
struct Frame {
    slot: Mutex<Option<String>>,
    presented: Notify,
}

/// One end of a paired visual-code link.
///
/// `send` presents an envelope on this device's display; `recv` scans
/// the peer's display, waiting until something is shown and consuming
/// it. The link is deliberately lossy in the one way a real screen is:
/// re-presenting before the peer scans replaces the frame. Everything
/// scanned is delivered in presentation order.
pub struct VisualCodeLink {
    display: Arc<Frame>,
    peer_display: Arc<Frame>,
}

impl VisualCodeLink {
    /// Create both ends of a display/scan session.
    pub fn pair() -> (VisualCodeLink, VisualCodeLink) {
        let a = Arc::new(Frame::default());
        let b = Arc::new(Frame::default());
        (
            VisualCodeLink {
                display: Arc::clone(&a),
                peer_display: Arc::clone(&b),
            },
            VisualCodeLink {
                display: b,
                peer_display: a,
            },
        )
    }
}

#[async_trait]
impl ExchangeChannel for VisualCodeLink {
    async fn send(&mut self, envelope: &str) -> Result<(), TransportError> {
        *self.display.slot.lock() = Some(envelope.to_string());
        self.display.presented.notify_one();
        Ok(())
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        loop {
            if let Some(envelope) = self.peer_display.slot.lock().take() {
                return Ok(envelope);
            }
            self.peer_display.presented.notified().await;
        }
    }
}
