//! Commit event source backed by the in-process event hub.

use shared_bus::{CommitEventHub, CommitSubscription, SubscriptionError};
use shared_types::TransactionId;

use crate::ports::outbound::CommitEventSource;

impl CommitEventSource for CommitEventHub {
    fn subscribe(&self, tx_id: TransactionId) -> Result<CommitSubscription, SubscriptionError> {
        CommitEventHub::subscribe(self, tx_id)
    }
}
