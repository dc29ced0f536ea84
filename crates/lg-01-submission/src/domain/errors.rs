//! Error types for transaction submission

use shared_types::{IdentityError, OperationError, TransactionId, ValidationCode};
use thiserror::Error;

/// Everything a submission or query can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The signing identity is missing or not enrolled. Nothing was sent.
    #[error("Signing identity unavailable: {0}")]
    IdentityUnavailable(#[from] IdentityError),

    /// No peer produced a response.
    #[error("No peer reachable ({attempted} attempted): {reason}")]
    PeerUnreachable { attempted: usize, reason: String },

    /// At least one peer refused, failed, or never answered.
    #[error("Endorsement rejected for {tx_id}: {reason}")]
    EndorsementRejected {
        tx_id: TransactionId,
        reason: String,
    },

    /// The ordering service refused the transaction or could not be reached.
    #[error("Order rejected for {tx_id}: {reason}")]
    OrderRejected {
        tx_id: TransactionId,
        reason: String,
    },

    /// The ledger recorded the transaction as invalid.
    #[error("Transaction {tx_id} committed as invalid: {code}")]
    CommitInvalid {
        tx_id: TransactionId,
        code: ValidationCode,
    },

    /// No commit event before the deadline. Final state unknown.
    #[error("Commit confirmation for {tx_id} timed out; transaction may still commit")]
    CommitTimeout { tx_id: TransactionId },

    /// The event stream went away before a verdict. Final state unknown.
    #[error("Commit event stream closed before a verdict for {tx_id}")]
    CommitStreamClosed { tx_id: TransactionId },

    /// A read produced no usable payload on any peer.
    #[error("Query returned no result: {reason}")]
    QueryNoResult { reason: String },

    /// The operation does not fit the requested path.
    #[error("Invalid operation: {0}")]
    InvalidOperation(#[from] OperationError),

    /// The commit listener could not be opened. Nothing was ordered.
    #[error("Could not listen for commit of {tx_id}: {reason}")]
    SubscriptionFailed {
        tx_id: TransactionId,
        reason: String,
    },

    /// The service no longer admits submissions.
    #[error("Submission service is shutting down")]
    ShuttingDown,
}

impl SubmissionError {
    /// True when the transaction may or may not have committed.
    ///
    /// Callers must not treat these as "not committed".
    #[must_use]
    pub fn is_final_state_unknown(&self) -> bool {
        matches!(
            self,
            SubmissionError::CommitTimeout { .. } | SubmissionError::CommitStreamClosed { .. }
        )
    }

    /// Transaction the error belongs to, when one had been assigned.
    #[must_use]
    pub fn tx_id(&self) -> Option<&TransactionId> {
        match self {
            SubmissionError::EndorsementRejected { tx_id, .. }
            | SubmissionError::OrderRejected { tx_id, .. }
            | SubmissionError::CommitInvalid { tx_id, .. }
            | SubmissionError::CommitTimeout { tx_id }
            | SubmissionError::CommitStreamClosed { tx_id }
            | SubmissionError::SubscriptionFailed { tx_id, .. } => Some(tx_id),
            _ => None,
        }
    }

    /// Metric label for this error kind.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionError::IdentityUnavailable(_) => "identity_unavailable",
            SubmissionError::PeerUnreachable { .. } => "peer_unreachable",
            SubmissionError::EndorsementRejected { .. } => "endorsement_rejected",
            SubmissionError::OrderRejected { .. } => "order_rejected",
            SubmissionError::CommitInvalid { .. } => "commit_invalid",
            SubmissionError::CommitTimeout { .. } => "commit_timeout",
            SubmissionError::CommitStreamClosed { .. } => "commit_stream_closed",
            SubmissionError::QueryNoResult { .. } => "no_result",
            SubmissionError::InvalidOperation(_) => "invalid_operation",
            SubmissionError::SubscriptionFailed { .. } => "subscription_failed",
            SubmissionError::ShuttingDown => "shutting_down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx() -> TransactionId {
        TransactionId::from_hex("ab12")
    }

    #[test]
    fn test_unknown_final_state_kinds() {
        assert!(SubmissionError::CommitTimeout { tx_id: tx() }.is_final_state_unknown());
        assert!(SubmissionError::CommitStreamClosed { tx_id: tx() }.is_final_state_unknown());
        assert!(!SubmissionError::CommitInvalid {
            tx_id: tx(),
            code: ValidationCode::MvccReadConflict,
        }
        .is_final_state_unknown());
        assert!(!SubmissionError::OrderRejected {
            tx_id: tx(),
            reason: "BAD_REQUEST".into(),
        }
        .is_final_state_unknown());
    }

    #[test]
    fn test_identity_error_converts() {
        let err: SubmissionError = IdentityError::NotEnrolled {
            label: "user1".into(),
        }
        .into();
        assert!(matches!(err, SubmissionError::IdentityUnavailable(_)));
        assert!(err.tx_id().is_none());
    }

    #[test]
    fn test_commit_invalid_display() {
        let err = SubmissionError::CommitInvalid {
            tx_id: tx(),
            code: ValidationCode::MvccReadConflict,
        };
        assert_eq!(
            err.to_string(),
            "Transaction ab12 committed as invalid: MVCC_READ_CONFLICT"
        );
        assert_eq!(err.tx_id(), Some(&tx()));
        assert_eq!(err.label(), "commit_invalid");
    }
}
