//! Commit Listener
//!
//! Waits for the one commit event matching a transaction, bounded by a
//! deadline measured from when the subscription was opened.
//!
//! ```text
//! Subscribing ──► Waiting ──┬──► Resolved(code) ──┐
//!                           ├──► TimedOut ────────┼──► Closed
//!                           └──► Disconnected ────┘
//! ```
//!
//! The subscription is released exactly once on every path, including
//! when the listener is dropped without running.

use shared_bus::CommitSubscription;
use shared_types::{CommitEvent, TransactionId, ValidationCode};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Listener lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Subscribing,
    Waiting,
    /// A matching event arrived with this code.
    Resolved(ValidationCode),
    TimedOut,
    /// The event stream closed before a matching event.
    Disconnected,
    Closed,
}

/// What the listener learned about its transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitVerdict {
    /// The matching event, valid or not.
    Resolved(CommitEvent),
    /// Nothing arrived before the deadline.
    TimedOut,
    /// The stream closed first.
    StreamClosed,
}

impl CommitVerdict {
    /// The validation code this verdict stands for; `TIMEOUT` when no event
    /// was seen in time.
    #[must_use]
    pub fn code(&self) -> Option<ValidationCode> {
        match self {
            CommitVerdict::Resolved(event) => Some(event.code),
            CommitVerdict::TimedOut => Some(ValidationCode::Timeout),
            CommitVerdict::StreamClosed => None,
        }
    }
}

/// Result of one listener run.
#[derive(Debug, Clone)]
pub struct ListenerReport {
    pub tx_id: TransactionId,
    pub verdict: CommitVerdict,
    /// Every state the listener passed through, in order.
    pub states: Vec<ListenerState>,
    /// Time from subscription to verdict.
    pub waited: Duration,
}

/// Single-use listener for one transaction's commit event.
pub struct CommitListener {
    subscription: CommitSubscription,
    deadline: Instant,
    states: Vec<ListenerState>,
}

impl CommitListener {
    /// Take ownership of an open subscription. The deadline is
    /// `opened_at + timeout`.
    pub fn new(subscription: CommitSubscription, timeout: Duration) -> Self {
        let deadline = subscription.opened_at() + timeout;
        Self {
            subscription,
            deadline,
            states: vec![ListenerState::Subscribing],
        }
    }

    #[must_use]
    pub fn tx_id(&self) -> &TransactionId {
        self.subscription.tx_id()
    }

    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Wait for the verdict, then release the subscription.
    pub async fn run(mut self) -> ListenerReport {
        self.states.push(ListenerState::Waiting);
        let tx_id = self.subscription.tx_id().clone();
        let opened_at = self.subscription.opened_at();

        let verdict = match timeout_at(self.deadline, self.subscription.recv()).await {
            Ok(Ok(event)) => {
                debug!(tx_id = %tx_id, code = %event.code, "Commit event received");
                self.states.push(ListenerState::Resolved(event.code));
                CommitVerdict::Resolved(event)
            }
            Ok(Err(error)) => {
                warn!(tx_id = %tx_id, %error, "Commit event stream ended without a verdict");
                self.states.push(ListenerState::Disconnected);
                CommitVerdict::StreamClosed
            }
            Err(_) => {
                warn!(tx_id = %tx_id, "Commit confirmation deadline passed");
                self.states.push(ListenerState::TimedOut);
                CommitVerdict::TimedOut
            }
        };

        let waited = Instant::now().saturating_duration_since(opened_at);
        let CommitListener {
            subscription,
            mut states,
            ..
        } = self;
        subscription.close();
        states.push(ListenerState::Closed);

        ListenerReport {
            tx_id,
            verdict,
            states,
            waited,
        }
    }
}
