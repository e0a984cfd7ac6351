//! Fan-out of committed ledger changes.
//!
//! The ledger service publishes one [`LedgerEvent`] per committed
//! operation; rejected or rolled-back operations publish nothing. Each
//! WebSocket connection holds its own receiver and filters by pool.

use tokio::sync::broadcast;

use super::LedgerEvent;

/// Cloneable handle on a `tokio::broadcast` ring of [`LedgerEvent`]s.
///
/// A receiver that falls more than `capacity` events behind skips the
/// oldest ones and sees `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LedgerEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per receiver.
    /// A zero capacity is raised to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `event` to every live receiver and returns how many got it.
    /// With no receivers the event is discarded and 0 is returned.
    pub fn publish(&self, event: LedgerEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Opens a receiver that sees events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Address;
    use chrono::Utc;

    fn make_event(account: &str) -> LedgerEvent {
        let Ok(account) = Address::parse(account) else {
            panic!("valid address");
        };
        LedgerEvent::Withdrawn {
            account,
            amount: "5".to_string(),
            remaining: "0".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(100);
        assert_eq!(bus.publish(make_event("0xa")), 0);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.publish(make_event("0xa")), 1);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.publish(make_event("0xa")), 2);

        let (Ok(e1), Ok(e2)) = (rx1.recv().await, rx2.recv().await) else {
            panic!("receivers failed");
        };
        assert_eq!(e1.event_type_str(), "withdrawn");
        assert_eq!(e2.event_type_str(), "withdrawn");
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(100);
        assert_eq!(bus.receiver_count(), 0);

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }

    #[tokio::test]
    async fn lagging_receiver_skips_oldest() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for account in ["0xa", "0xb", "0xc"] {
            bus.publish(make_event(account));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        let Ok(LedgerEvent::Withdrawn { account, .. }) = rx.recv().await else {
            panic!("expected withdrawn event");
        };
        assert_eq!(account.as_str(), "0xb");
    }
}
