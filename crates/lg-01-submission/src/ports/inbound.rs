//! Inbound Ports (Driving Ports / API)
//!
//! What callers (the registry client, an HTTP layer) see.

use async_trait::async_trait;
use shared_types::{Operation, SubmissionOutcome};

use crate::domain::errors::SubmissionError;

/// Transaction submission API
#[async_trait]
pub trait TransactionSubmissionApi: Send + Sync {
    /// Run a state-changing operation through endorsement, ordering and
    /// commit confirmation.
    ///
    /// `Ok` only when the orderer accepted the transaction and the ledger
    /// committed it as `VALID`. `CommitTimeout` and `CommitStreamClosed`
    /// mean the final state is unknown.
    async fn submit(&self, operation: Operation) -> Result<SubmissionOutcome, SubmissionError>;

    /// Run a read-only operation against the endorsing peers.
    ///
    /// Returns the first successful peer's payload. Nothing is ordered.
    async fn evaluate(&self, operation: Operation) -> Result<Vec<u8>, SubmissionError>;
}
