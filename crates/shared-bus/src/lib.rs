//! # Shared Bus - Commit Event Stream
//!
//! Delivers ledger commit events to the one submission waiting on each
//! transaction identifier.
//!
//! ## Subscription Table
//!
//! ```text
//! ┌──────────────┐  subscribe(tx_id)   ┌──────────────────┐
//! │ Submission A │ ──────────────────► │                  │
//! └──────────────┘                     │  CommitEventHub  │ ◄── publish(CommitEvent)
//! ┌──────────────┐  subscribe(tx_id)   │  tx_id → waiter  │       (ledger adapter)
//! │ Submission B │ ──────────────────► │                  │
//! └──────────────┘                     └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! - **One waiter per transaction:** the table is keyed by `TransactionId`;
//!   a second subscription for a live identifier is refused, so concurrent
//!   submissions never see each other's events.
//! - **Release exactly once:** a `CommitSubscription` gives its table entry
//!   back either through `close()` or on drop, never both.
//! - **No replay:** an event published before anyone subscribed is counted
//!   as unclaimed and dropped.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{DeliveryStatus, HubStats};
pub use publisher::{CommitEventHub, CommitEventPublisher};
pub use subscriber::{CommitSubscription, SubscriptionError};

/// Initial capacity of the subscription table.
pub const DEFAULT_TABLE_CAPACITY: usize = 256;
