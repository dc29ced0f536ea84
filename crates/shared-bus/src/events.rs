//! # Delivery Bookkeeping
//!
//! What happened to a published commit event, and running counters for the
//! subscription table.

use std::sync::atomic::{AtomicU64, Ordering};

/// Result of publishing one commit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Handed to the submission waiting on that transaction.
    Delivered,
    /// Nobody was subscribed to that transaction; the event was dropped.
    Unclaimed,
    /// A subscription existed but its receiver was already gone.
    ReceiverGone,
}

/// Counters for the subscription table.
#[derive(Debug, Default)]
pub struct HubStats {
    /// Subscriptions opened.
    pub total_registered: AtomicU64,
    /// Subscriptions refused because the identifier was already live.
    pub total_duplicates: AtomicU64,
    /// Events handed to a waiting subscription.
    pub total_delivered: AtomicU64,
    /// Events with no matching subscription.
    pub total_unclaimed: AtomicU64,
    /// Subscriptions released (closed or dropped).
    pub total_released: AtomicU64,
}

impl HubStats {
    #[must_use]
    pub fn registered(&self) -> u64 {
        self.total_registered.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn duplicates(&self) -> u64 {
        self.total_duplicates.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.total_delivered.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn unclaimed(&self) -> u64 {
        self.total_unclaimed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn released(&self) -> u64 {
        self.total_released.load(Ordering::Relaxed)
    }
}
