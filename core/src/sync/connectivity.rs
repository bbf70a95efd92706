//! Edge-triggered reachability state.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// What a [`ConnectivityMonitor::set_online`] call actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// false → true. The one transition that triggers a drain.
    CameOnline,
    /// true → false.
    WentOffline,
    /// Same value observed again; nothing changed, nobody notified.
    Unchanged,
}

/// Event delivered to subscribers, one per actual transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

struct Inner {
    online: bool,
    next_subscriber: u64,
    subscribers: Vec<(u64, mpsc::UnboundedSender<ConnectivityEvent>)>,
}

/// Holds the current boolean reachability and fans transitions out to
/// subscribers.
///
/// Cheaply clonable; every clone observes and mutates the same flag.
/// That is what lets a mid-drain offline observation (reported by the
/// platform on one handle) cancel the drain loop reading another.
/// Back-to-back equivalent observations are idempotent no-ops.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<Mutex<Inner>>,
}

impl ConnectivityMonitor {
    /// A monitor starting from the given reachability state.
    pub fn new(initially_online: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                online: initially_online,
                next_subscriber: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Current reachability.
    pub fn is_online(&self) -> bool {
        self.inner.lock().online
    }

    /// Record a reachability observation from the platform.
    ///
    /// On an actual transition, every live subscriber receives exactly
    /// one event. Subscribers whose receiver is gone are dropped here.
    pub fn set_online(&self, online: bool) -> Transition {
        let mut inner = self.inner.lock();
        if inner.online == online {
            return Transition::Unchanged;
        }
        inner.online = online;
        let event = if online {
            ConnectivityEvent::Online
        } else {
            ConnectivityEvent::Offline
        };
        inner.subscribers.retain(|(_, tx)| tx.send(event).is_ok());
        tracing::info!(online, "connectivity transition");
        if online {
            Transition::CameOnline
        } else {
            Transition::WentOffline
        }
    }

    /// Register an observer. Events arrive on the returned receiver;
    /// dropping the [`ConnectivitySubscription`] handle deregisters.
    pub fn subscribe(
        &self,
    ) -> (
        ConnectivitySubscription,
        mpsc::UnboundedReceiver<ConnectivityEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push((id, tx));
        (
            ConnectivitySubscription {
                id,
                inner: Arc::downgrade(&self.inner),
            },
            rx,
        )
    }
}

/// Cancel handle for a connectivity subscription. Deregisters on drop;
/// [`ConnectivitySubscription::cancel`] is the explicit spelling.
pub struct ConnectivitySubscription {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl ConnectivitySubscription {
    /// Stop receiving events. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for ConnectivitySubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_are_edge_triggered() {
        let monitor = ConnectivityMonitor::new(false);
        assert_eq!(monitor.set_online(true), Transition::CameOnline);
        assert_eq!(monitor.set_online(true), Transition::Unchanged);
        assert_eq!(monitor.set_online(false), Transition::WentOffline);
        assert_eq!(monitor.set_online(false), Transition::Unchanged);
    }

    #[test]
    fn clones_share_the_same_flag() {
        let monitor = ConnectivityMonitor::new(false);
        let other = monitor.clone();
        monitor.set_online(true);
        assert!(other.is_online());
    }

    #[tokio::test]
    async fn subscribers_get_one_event_per_transition() {
        let monitor = ConnectivityMonitor::new(false);
        let (_sub, mut rx) = monitor.subscribe();

        monitor.set_online(true);
        monitor.set_online(true); // no event
        monitor.set_online(false);

        assert_eq!(rx.recv().await, Some(ConnectivityEvent::Online));
        assert_eq!(rx.recv().await, Some(ConnectivityEvent::Offline));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancelled_subscription_stops_delivery() {
        let monitor = ConnectivityMonitor::new(false);
        let (sub, mut rx) = monitor.subscribe();
        sub.cancel();
        monitor.set_online(true);
        assert!(rx.try_recv().is_err());
    }
}
