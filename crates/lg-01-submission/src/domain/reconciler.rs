//! Outcome Reconciler
//!
//! Combines the orderer's synchronous answer with the commit listener's
//! verdict. Both are always available: the service waits for both before
//! calling in here.
//!
//! | Order        | Commit verdict      | Outcome              |
//! |--------------|---------------------|----------------------|
//! | rejected     | anything            | `OrderRejected`      |
//! | accepted     | `VALID`             | success              |
//! | accepted     | other code          | `CommitInvalid(code)`|
//! | accepted     | deadline passed     | `CommitTimeout`      |
//! | accepted     | stream closed       | `CommitStreamClosed` |

use shared_types::{
    FailureKind, OrderAcknowledgment, OrderError, SubmissionOutcome, TransactionId,
};

use crate::domain::commit_listener::CommitVerdict;
use crate::domain::errors::SubmissionError;

/// The orderer's answer, or the transport failure that replaced it.
pub type OrderResult = Result<OrderAcknowledgment, OrderError>;

/// Decide the outcome of one write submission.
///
/// A commit event never overrides an order rejection.
pub fn reconcile(
    tx_id: &TransactionId,
    order: &OrderResult,
    verdict: &CommitVerdict,
) -> SubmissionOutcome {
    match order {
        Err(error) => {
            return SubmissionOutcome::failed(
                tx_id.clone(),
                FailureKind::OrderRejected,
                format!("orderer unavailable: {error}"),
            );
        }
        Ok(ack) if !ack.is_accepted() => {
            let reason = if ack.info.is_empty() {
                format!("orderer returned {}", ack.status)
            } else {
                format!("orderer returned {}: {}", ack.status, ack.info)
            };
            return SubmissionOutcome::failed(tx_id.clone(), FailureKind::OrderRejected, reason);
        }
        Ok(_) => {}
    }

    match verdict {
        CommitVerdict::Resolved(event) if event.code.is_valid() => {
            SubmissionOutcome::committed(tx_id.clone())
        }
        CommitVerdict::Resolved(event) => SubmissionOutcome::failed(
            tx_id.clone(),
            FailureKind::CommitInvalid(event.code),
            format!("transaction invalidated with code {}", event.code),
        ),
        CommitVerdict::TimedOut => SubmissionOutcome::failed(
            tx_id.clone(),
            FailureKind::CommitTimeout,
            "no commit event before the deadline; the transaction may still commit",
        ),
        CommitVerdict::StreamClosed => SubmissionOutcome::failed(
            tx_id.clone(),
            FailureKind::CommitStreamClosed,
            "commit event stream closed before a verdict; the transaction may still commit",
        ),
    }
}

/// Conversion from an outcome to the caller-facing result.
pub trait OutcomeExt {
    /// `Ok` only for a committed transaction; failures map onto the
    /// matching `SubmissionError` kind.
    fn into_result(self) -> Result<SubmissionOutcome, SubmissionError>;
}

impl OutcomeExt for SubmissionOutcome {
    fn into_result(self) -> Result<SubmissionOutcome, SubmissionError> {
        let tx_id = self.tx_id().clone();
        match self.failure().cloned() {
            None => Ok(self),
            Some(FailureKind::OrderRejected) => Err(SubmissionError::OrderRejected {
                tx_id,
                reason: self.reason().to_string(),
            }),
            Some(FailureKind::CommitInvalid(code)) => {
                Err(SubmissionError::CommitInvalid { tx_id, code })
            }
            Some(FailureKind::CommitTimeout) => Err(SubmissionError::CommitTimeout { tx_id }),
            Some(FailureKind::CommitStreamClosed) => {
                Err(SubmissionError::CommitStreamClosed { tx_id })
            }
        }
    }
}
