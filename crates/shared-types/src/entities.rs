//! # Core Ledger Entities
//!
//! Types that flow through one submission attempt.
//!
//! ## Lifecycle
//!
//! ```text
//! Operation ──► TransactionProposal ──► [EndorsementResponse] ──► EndorsedBundle
//!                                                                    │
//!                                  ┌─────────────────────────────────┤
//!                                  ▼                                 ▼
//!                          OrderAcknowledgment                  CommitEvent
//!                                  └───────────────┬─────────────────┘
//!                                                  ▼
//!                                          SubmissionOutcome
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::TransactionId;
use crate::operation::Operation;
use crate::ENDORSEMENT_SUCCESS_STATUS;

// =============================================================================
// NETWORK ADDRESSING
// =============================================================================

/// An endorsing peer the proposal is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerEndpoint {
    /// Peer name, unique within the network handle.
    pub name: String,
    /// Peer URL (e.g. `grpc://localhost:7051`).
    pub url: String,
}

impl PeerEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for PeerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.url)
    }
}

/// The ordering node endorsed transactions are forwarded to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrdererEndpoint {
    pub name: String,
    pub url: String,
}

impl OrdererEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for OrdererEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.url)
    }
}

// =============================================================================
// PROPOSAL & ENDORSEMENT
// =============================================================================

/// A candidate transaction sent to endorsing peers.
///
/// Owned by exactly one submission attempt and never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionProposal {
    /// Identifier derived from `nonce` and `creator`.
    pub tx_id: TransactionId,
    /// Channel the transaction targets.
    pub channel: String,
    /// Contract the transaction invokes.
    pub chaincode_id: String,
    /// The logical operation being proposed.
    pub operation: Operation,
    /// MSP id of the signing identity.
    pub creator_msp: String,
    /// Random nonce mixed into `tx_id`.
    pub nonce: Vec<u8>,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

/// One peer's verdict on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementResponse {
    /// Name of the peer that produced this response.
    pub peer: String,
    /// Simulation status; 200 is success.
    pub status: u32,
    /// Status message from the contract.
    pub message: String,
    /// Contract return value, if any.
    pub payload: Option<Vec<u8>>,
    /// Error reported by the peer alongside the response, if any.
    pub error: Option<String>,
}

impl EndorsementResponse {
    /// A successful endorsement.
    pub fn success(peer: impl Into<String>, payload: Option<Vec<u8>>) -> Self {
        Self {
            peer: peer.into(),
            status: ENDORSEMENT_SUCCESS_STATUS,
            message: String::new(),
            payload,
            error: None,
        }
    }

    /// An endorsement carrying a non-success status.
    pub fn with_status(peer: impl Into<String>, status: u32, message: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            status,
            message: message.into(),
            payload: None,
            error: None,
        }
    }

    /// Whether this response endorses the proposal.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ENDORSEMENT_SUCCESS_STATUS && self.error.is_none()
    }
}

/// A proposal together with the endorsements that passed evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndorsedBundle {
    pub proposal: TransactionProposal,
    pub endorsements: Vec<EndorsementResponse>,
}

impl EndorsedBundle {
    #[must_use]
    pub fn tx_id(&self) -> &TransactionId {
        &self.proposal.tx_id
    }
}

// =============================================================================
// ORDERING
// =============================================================================

/// Broadcast status returned by the ordering service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Success,
    BadRequest,
    Forbidden,
    NotFound,
    RequestEntityTooLarge,
    ServiceUnavailable,
    InternalServerError,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Success => "SUCCESS",
            OrderStatus::BadRequest => "BAD_REQUEST",
            OrderStatus::Forbidden => "FORBIDDEN",
            OrderStatus::NotFound => "NOT_FOUND",
            OrderStatus::RequestEntityTooLarge => "REQUEST_ENTITY_TOO_LARGE",
            OrderStatus::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            OrderStatus::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The orderer's synchronous answer: received for sequencing, or not.
///
/// Acceptance is not a commit guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAcknowledgment {
    pub tx_id: TransactionId,
    pub status: OrderStatus,
    pub info: String,
}

impl OrderAcknowledgment {
    pub fn accepted(tx_id: TransactionId) -> Self {
        Self {
            tx_id,
            status: OrderStatus::Success,
            info: String::new(),
        }
    }

    pub fn rejected(tx_id: TransactionId, status: OrderStatus, info: impl Into<String>) -> Self {
        Self {
            tx_id,
            status,
            info: info.into(),
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == OrderStatus::Success
    }
}

// =============================================================================
// COMMIT
// =============================================================================

/// Validation code attached to a commit event.
///
/// `Timeout` never comes from the ledger; it is produced locally when no
/// event arrives before the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    Valid,
    EndorsementPolicyFailure,
    MvccReadConflict,
    PhantomReadConflict,
    DuplicateTxid,
    BadPayload,
    BadCreatorSignature,
    BadProposalTxid,
    InvalidWriteset,
    ExpiredChaincode,
    InvalidOtherReason,
    Timeout,
}

impl ValidationCode {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationCode::Valid)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::Valid => "VALID",
            ValidationCode::EndorsementPolicyFailure => "ENDORSEMENT_POLICY_FAILURE",
            ValidationCode::MvccReadConflict => "MVCC_READ_CONFLICT",
            ValidationCode::PhantomReadConflict => "PHANTOM_READ_CONFLICT",
            ValidationCode::DuplicateTxid => "DUPLICATE_TXID",
            ValidationCode::BadPayload => "BAD_PAYLOAD",
            ValidationCode::BadCreatorSignature => "BAD_CREATOR_SIGNATURE",
            ValidationCode::BadProposalTxid => "BAD_PROPOSAL_TXID",
            ValidationCode::InvalidWriteset => "INVALID_WRITESET",
            ValidationCode::ExpiredChaincode => "EXPIRED_CHAINCODE",
            ValidationCode::InvalidOtherReason => "INVALID_OTHER_REASON",
            ValidationCode::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification that a transaction was validated into a block (or rejected).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEvent {
    pub tx_id: TransactionId,
    pub code: ValidationCode,
    /// Block the transaction landed in, when known.
    pub block_number: Option<u64>,
    /// Peer that emitted the event.
    pub peer: String,
}

impl CommitEvent {
    pub fn new(tx_id: TransactionId, code: ValidationCode) -> Self {
        Self {
            tx_id,
            code,
            block_number: None,
            peer: String::new(),
        }
    }

    #[must_use]
    pub fn with_block(mut self, block_number: u64) -> Self {
        self.block_number = Some(block_number);
        self
    }

    #[must_use]
    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = peer.into();
        self
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Why a post-endorsement submission failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The orderer rejected the transaction or could not be reached.
    OrderRejected,
    /// The ledger committed the transaction as invalid.
    CommitInvalid(ValidationCode),
    /// No commit event arrived before the deadline; final state unknown.
    CommitTimeout,
    /// The event stream closed before a verdict; final state unknown.
    CommitStreamClosed,
}

/// Final verdict for one write submission.
///
/// `success` is true if and only if the orderer accepted the transaction and
/// the matched commit event reported `VALID`. Only the constructors below can
/// build one, so the flag and `failure` never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    tx_id: TransactionId,
    success: bool,
    reason: String,
    failure: Option<FailureKind>,
}

impl SubmissionOutcome {
    /// Ordered and committed as `VALID`.
    pub fn committed(tx_id: TransactionId) -> Self {
        Self {
            tx_id,
            success: true,
            reason: "transaction committed".to_string(),
            failure: None,
        }
    }

    /// Failed after endorsement.
    pub fn failed(tx_id: TransactionId, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            tx_id,
            success: false,
            reason: reason.into(),
            failure: Some(kind),
        }
    }

    #[must_use]
    pub fn tx_id(&self) -> &TransactionId {
        &self.tx_id
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Human-readable reason for the verdict.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The failure kind, `None` on success.
    #[must_use]
    pub fn failure(&self) -> Option<&FailureKind> {
        self.failure.as_ref()
    }
}
