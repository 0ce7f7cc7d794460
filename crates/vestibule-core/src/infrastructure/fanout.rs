//! Subscriber fan-out shared by the identity provider implementations
//!
//! Every new subscriber receives the current state once, immediately,
//! then every subsequent change in order. Subscribers that dropped their
//! receiver are pruned on the next emit.

use tokio::sync::{mpsc, Mutex};

use crate::domain::session::event::{AuthStateChange, ProviderIdentity};

const SUBSCRIBER_BUFFER: usize = 16;

/// Registry of auth-state subscribers
#[derive(Debug, Default)]
pub struct StateFanout {
    subscribers: Mutex<Vec<mpsc::Sender<AuthStateChange>>>,
}

impl StateFanout {
    /// Create an empty fan-out
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber, replaying the given current state to it
    pub async fn subscribe(
        &self,
        current: Option<ProviderIdentity>,
    ) -> mpsc::Receiver<AuthStateChange> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);

        // The receiver cannot be closed yet; the send only fails if the
        // buffer were full, which a fresh channel's is not.
        let _ = tx.send(AuthStateChange::new(current)).await;

        self.subscribers.lock().await.push(tx);
        rx
    }

    /// Deliver a change to every live subscriber, pruning closed ones
    pub async fn emit(&self, change: AuthStateChange) {
        let mut subscribers = self.subscribers.lock().await;
        let mut live = Vec::with_capacity(subscribers.len());

        for tx in subscribers.drain(..) {
            if tx.send(change.clone()).await.is_ok() {
                live.push(tx);
            }
        }

        *subscribers = live;
    }

    /// Number of registered subscribers
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_replays_current_state() {
        let fanout = StateFanout::new();
        let identity = ProviderIdentity::new("uid-1", None);

        let mut rx = fanout.subscribe(Some(identity.clone())).await;
        let change = rx.recv().await.expect("replay should arrive");
        assert_eq!(change.identity, Some(identity));
    }

    #[tokio::test]
    async fn test_emit_reaches_all_subscribers_in_order() {
        let fanout = StateFanout::new();
        let mut rx_a = fanout.subscribe(None).await;
        let mut rx_b = fanout.subscribe(None).await;

        // Drain the replayed initial states.
        rx_a.recv().await.expect("replay");
        rx_b.recv().await.expect("replay");

        fanout
            .emit(AuthStateChange::signed_in(ProviderIdentity::new("uid-1", None)))
            .await;
        fanout.emit(AuthStateChange::signed_out()).await;

        assert!(rx_a.recv().await.expect("first change").is_signed_in());
        assert!(!rx_a.recv().await.expect("second change").is_signed_in());
        assert!(rx_b.recv().await.expect("first change").is_signed_in());
        assert!(!rx_b.recv().await.expect("second change").is_signed_in());
    }

    #[tokio::test]
    async fn test_closed_subscribers_are_pruned() {
        let fanout = StateFanout::new();
        let rx = fanout.subscribe(None).await;
        assert_eq!(fanout.subscriber_count().await, 1);

        drop(rx);
        fanout.emit(AuthStateChange::signed_out()).await;
        assert_eq!(fanout.subscriber_count().await, 0);
    }
}
