//! # Commit Subscriptions
//!
//! The subscribing side of the hub: one handle per transaction identifier.

use dashmap::DashMap;
use shared_types::{CommitEvent, TransactionId};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

use crate::events::HubStats;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Another live subscription already owns this identifier.
    #[error("Transaction {0} already has a live commit subscription")]
    AlreadySubscribed(TransactionId),

    /// The hub went away before an event arrived.
    #[error("Commit event stream closed")]
    Closed,

    /// The single event for this subscription was already received.
    #[error("Commit event already consumed")]
    Consumed,
}

/// Table entry for one waiting subscription.
pub(crate) struct Waiter {
    /// Distinguishes this registration from a later one under the same id.
    pub(crate) serial: u64,
    pub(crate) sender: oneshot::Sender<CommitEvent>,
}

pub(crate) type SubscriptionTable = DashMap<TransactionId, Waiter>;

/// A subscription handle for one transaction's commit event.
///
/// Released exactly once: by `close()`, or on drop if `close()` was never
/// called.
pub struct CommitSubscription {
    tx_id: TransactionId,
    serial: u64,
    /// `None` once the event has been received.
    receiver: Option<oneshot::Receiver<CommitEvent>>,
    table: Arc<SubscriptionTable>,
    stats: Arc<HubStats>,
    opened_at: Instant,
    released: bool,
}

impl CommitSubscription {
    pub(crate) fn new(
        tx_id: TransactionId,
        serial: u64,
        receiver: oneshot::Receiver<CommitEvent>,
        table: Arc<SubscriptionTable>,
        stats: Arc<HubStats>,
    ) -> Self {
        Self {
            tx_id,
            serial,
            receiver: Some(receiver),
            table,
            stats,
            opened_at: Instant::now(),
            released: false,
        }
    }

    /// The transaction this subscription listens for.
    #[must_use]
    pub fn tx_id(&self) -> &TransactionId {
        &self.tx_id
    }

    /// When the subscription was opened; deadlines are measured from here.
    #[must_use]
    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    /// Wait for the commit event.
    ///
    /// Cancel-safe: if the future is dropped before completing, a later call
    /// still receives the event.
    pub async fn recv(&mut self) -> Result<CommitEvent, SubscriptionError> {
        let receiver = self.receiver.as_mut().ok_or(SubscriptionError::Consumed)?;
        let result = receiver.await;
        self.receiver = None;
        result.map_err(|_| SubscriptionError::Closed)
    }

    /// Check for the commit event without waiting.
    ///
    /// - `Ok(Some(event))` - The event arrived
    /// - `Ok(None)` - Nothing yet
    /// - `Err(SubscriptionError::Closed)` - The hub dropped the subscription
    pub fn try_recv(&mut self) -> Result<Option<CommitEvent>, SubscriptionError> {
        let receiver = self.receiver.as_mut().ok_or(SubscriptionError::Consumed)?;
        match receiver.try_recv() {
            Ok(event) => {
                self.receiver = None;
                Ok(Some(event))
            }
            Err(oneshot::error::TryRecvError::Empty) => Ok(None),
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                Err(SubscriptionError::Closed)
            }
        }
    }

    /// Unsubscribe. Returns `true` if this call released the subscription.
    pub fn close(mut self) -> bool {
        self.release()
    }

    /// Whether the subscription has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;

        // The entry is already gone if the event was delivered.
        let serial = self.serial;
        self.table
            .remove_if(&self.tx_id, |_, waiter| waiter.serial == serial);
        self.stats.total_released.fetch_add(1, Ordering::Relaxed);

        debug!(tx_id = %self.tx_id, "Commit subscription released");
        true
    }
}

impl Drop for CommitSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CommitSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitSubscription")
            .field("tx_id", &self.tx_id)
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::{CommitEventHub, CommitEventPublisher};
    use shared_types::ValidationCode;
    use std::time::Duration;
    use tokio::time::timeout;

    fn tx(id: &str) -> TransactionId {
        TransactionId::from_hex(id)
    }

    #[tokio::test]
    async fn test_subscription_recv() {
        let hub = CommitEventHub::new();
        let mut sub = hub.subscribe(tx("aa")).unwrap();

        hub.publish(CommitEvent::new(tx("aa"), ValidationCode::Valid))
            .await;

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(received.code, ValidationCode::Valid);
    }

    #[tokio::test]
    async fn test_recv_twice_reports_consumed() {
        let hub = CommitEventHub::new();
        let mut sub = hub.subscribe(tx("aa")).unwrap();
        hub.publish(CommitEvent::new(tx("aa"), ValidationCode::Valid))
            .await;

        sub.recv().await.unwrap();
        assert_eq!(sub.recv().await, Err(SubscriptionError::Consumed));
    }

    #[tokio::test]
    async fn test_recv_is_cancel_safe() {
        let hub = CommitEventHub::new();
        let mut sub = hub.subscribe(tx("aa")).unwrap();

        // First wait gives up before anything arrives
        assert!(timeout(Duration::from_millis(10), sub.recv()).await.is_err());

        hub.publish(CommitEvent::new(tx("aa"), ValidationCode::MvccReadConflict))
            .await;
        let event = sub.recv().await.unwrap();
        assert_eq!(event.code, ValidationCode::MvccReadConflict);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let hub = CommitEventHub::new();
        let mut sub = hub.subscribe(tx("aa")).unwrap();
        assert_eq!(sub.try_recv(), Ok(None));
    }

    #[tokio::test]
    async fn test_close_releases_once() {
        let hub = CommitEventHub::new();
        let sub = hub.subscribe(tx("aa")).unwrap();
        assert!(hub.is_subscribed(&tx("aa")));

        assert!(sub.close());
        assert!(!hub.is_subscribed(&tx("aa")));
        assert_eq!(hub.stats().released(), 1);
    }

    #[tokio::test]
    async fn test_drop_releases() {
        let hub = CommitEventHub::new();
        {
            let _sub1 = hub.subscribe(tx("aa")).unwrap();
            let _sub2 = hub.subscribe(tx("bb")).unwrap();
            assert_eq!(hub.active_subscriptions(), 2);
        }

        assert_eq!(hub.active_subscriptions(), 0);
        assert_eq!(hub.stats().released(), 2);
    }

    #[tokio::test]
    async fn test_stale_release_keeps_new_registration() {
        let hub = CommitEventHub::new();
        let mut first = hub.subscribe(tx("aa")).unwrap();
        hub.publish(CommitEvent::new(tx("aa"), ValidationCode::Valid))
            .await;
        first.recv().await.unwrap();

        // Delivery freed the identifier; a new registration takes it
        let second = hub.subscribe(tx("aa")).unwrap();
        drop(first);

        assert!(hub.is_subscribed(&tx("aa")));
        drop(second);
        assert!(!hub.is_subscribed(&tx("aa")));
    }

    #[tokio::test]
    async fn test_hub_shutdown_closes_waiters() {
        let hub = CommitEventHub::new();
        let mut sub = hub.subscribe(tx("aa")).unwrap();

        hub.shutdown();

        assert_eq!(sub.recv().await, Err(SubscriptionError::Closed));
    }
}
