//! # Commit Event Publisher
//!
//! The publishing side of the hub. Ledger adapters push commit events in;
//! the hub routes each one to the subscription registered for its
//! transaction identifier.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{CommitEvent, TransactionId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::events::{DeliveryStatus, HubStats};
use crate::subscriber::{CommitSubscription, SubscriptionError, SubscriptionTable, Waiter};
use crate::DEFAULT_TABLE_CAPACITY;

/// Trait for publishing commit events.
#[async_trait]
pub trait CommitEventPublisher: Send + Sync {
    /// Publish a commit event.
    ///
    /// # Returns
    ///
    /// What happened to the event: delivered to its waiter, or dropped.
    async fn publish(&self, event: CommitEvent) -> DeliveryStatus;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory commit event hub.
///
/// Each transaction identifier maps to at most one waiting subscription,
/// backed by a `tokio::sync::oneshot` channel. Suitable for one client
/// process; the table is the only per-submission mutable state.
pub struct CommitEventHub {
    /// Live subscriptions by transaction identifier.
    table: Arc<SubscriptionTable>,

    /// Counters shared with subscription handles.
    stats: Arc<HubStats>,

    /// Serial for the next registration.
    next_serial: AtomicU64,

    /// Total events published.
    events_published: AtomicU64,
}

impl CommitEventHub {
    /// Create a hub with default table capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TABLE_CAPACITY)
    }

    /// Create a hub with the given initial table capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: Arc::new(DashMap::with_capacity(capacity)),
            stats: Arc::new(HubStats::default()),
            next_serial: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
        }
    }

    /// Register interest in the commit event for `tx_id`.
    ///
    /// Fails with `AlreadySubscribed` if a live subscription owns the id.
    pub fn subscribe(&self, tx_id: TransactionId) -> Result<CommitSubscription, SubscriptionError> {
        let (sender, receiver) = oneshot::channel();
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);

        match self.table.entry(tx_id.clone()) {
            Entry::Occupied(_) => {
                self.stats.total_duplicates.fetch_add(1, Ordering::Relaxed);
                warn!(tx_id = %tx_id, "Refused duplicate commit subscription");
                return Err(SubscriptionError::AlreadySubscribed(tx_id));
            }
            Entry::Vacant(slot) => {
                slot.insert(Waiter { serial, sender });
            }
        }

        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);
        debug!(tx_id = %tx_id, "Commit subscription opened");

        Ok(CommitSubscription::new(
            tx_id,
            serial,
            receiver,
            self.table.clone(),
            self.stats.clone(),
        ))
    }

    /// Whether a live subscription exists for `tx_id`.
    #[must_use]
    pub fn is_subscribed(&self, tx_id: &TransactionId) -> bool {
        self.table.contains_key(tx_id)
    }

    /// Number of subscriptions still waiting for their event.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.table.len()
    }

    /// Table counters.
    #[must_use]
    pub fn stats(&self) -> &HubStats {
        &self.stats
    }

    /// Drop every waiting subscription; their `recv()` returns `Closed`.
    pub fn shutdown(&self) {
        let dropped = self.table.len();
        self.table.clear();
        debug!(dropped, "Commit event hub shut down");
    }
}

impl Default for CommitEventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommitEventPublisher for CommitEventHub {
    async fn publish(&self, event: CommitEvent) -> DeliveryStatus {
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let Some((tx_id, waiter)) = self.table.remove(&event.tx_id) else {
            self.stats.total_unclaimed.fetch_add(1, Ordering::Relaxed);
            debug!(tx_id = %event.tx_id, code = %event.code, "Commit event unclaimed");
            return DeliveryStatus::Unclaimed;
        };

        let code = event.code;
        match waiter.sender.send(event) {
            Ok(()) => {
                self.stats.total_delivered.fetch_add(1, Ordering::Relaxed);
                debug!(tx_id = %tx_id, code = %code, "Commit event delivered");
                DeliveryStatus::Delivered
            }
            Err(_) => {
                warn!(tx_id = %tx_id, code = %code, "Commit event receiver dropped");
                DeliveryStatus::ReceiverGone
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
