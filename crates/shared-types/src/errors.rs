//! # Error Types
//!
//! Errors reported at the boundary with the ledger network and the identity
//! store. The submission core maps these onto its own error kinds.

use thiserror::Error;

use crate::operation::OperationKind;

/// Errors building an `Operation`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// Argument count does not match the contract function.
    #[error("{kind} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        kind: OperationKind,
        expected: usize,
        actual: usize,
    },

    /// A read kind was sent down the write path, or the reverse.
    #[error("{kind} cannot be used on the {path} path")]
    WrongPath {
        kind: OperationKind,
        path: &'static str,
    },
}

/// Transport-level failure talking to one endorsing peer.
///
/// Captured per peer during fan-out; never aborts the batch on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    /// The peer could not be reached.
    #[error("Peer {peer} unreachable: {reason}")]
    Unreachable { peer: String, reason: String },

    /// The peer did not answer in time.
    #[error("Peer {peer} timed out")]
    Timeout { peer: String },

    /// The peer answered with something that could not be decoded.
    #[error("Peer {peer} sent a malformed response: {reason}")]
    Malformed { peer: String, reason: String },
}

impl PeerError {
    /// Name of the peer this error came from.
    #[must_use]
    pub fn peer(&self) -> &str {
        match self {
            PeerError::Unreachable { peer, .. }
            | PeerError::Timeout { peer }
            | PeerError::Malformed { peer, .. } => peer,
        }
    }
}

/// Transport-level failure talking to the ordering service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Orderer {orderer} unreachable: {reason}")]
    Unreachable { orderer: String, reason: String },

    #[error("Orderer {orderer} timed out")]
    Timeout { orderer: String },
}

/// Failure resolving the signing identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No enrolled identity exists under this label.
    #[error("Identity {label} is not enrolled")]
    NotEnrolled { label: String },

    /// The identity store could not be read.
    #[error("Identity store unavailable: {0}")]
    StoreUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_error_display() {
        let err = OperationError::ArityMismatch {
            kind: OperationKind::SetDomain,
            expected: 3,
            actual: 1,
        };
        assert_eq!(err.to_string(), "set-domain expects 3 arguments, got 1");
    }

    #[test]
    fn test_peer_error_names_peer() {
        let err = PeerError::Timeout {
            peer: "peer1".into(),
        };
        assert_eq!(err.peer(), "peer1");
        assert_eq!(err.to_string(), "Peer peer1 timed out");
    }

    #[test]
    fn test_identity_error_display() {
        let err = IdentityError::NotEnrolled {
            label: "user1".into(),
        };
        assert_eq!(err.to_string(), "Identity user1 is not enrolled");
    }
}
