//! Outbound Ports (Driven Ports / SPI)
//!
//! The ledger network, the identity store and the commit event stream.

use async_trait::async_trait;
use shared_bus::{CommitSubscription, SubscriptionError};
use shared_types::{
    EndorsedBundle, EndorsementResponse, IdentityError, OrderAcknowledgment, OrderError,
    OrdererEndpoint, PeerEndpoint, PeerError, SigningIdentity, TransactionId,
    TransactionProposal,
};

/// Transport to peers and the ordering service.
///
/// Calls carry no timeout of their own; the caller bounds them.
#[async_trait]
pub trait LedgerNetworkClient: Send + Sync {
    /// Ask one peer to simulate and endorse a proposal.
    async fn endorse(
        &self,
        peer: &PeerEndpoint,
        proposal: &TransactionProposal,
    ) -> Result<EndorsementResponse, PeerError>;

    /// Ask one peer to evaluate a read-only proposal.
    async fn query(
        &self,
        peer: &PeerEndpoint,
        proposal: &TransactionProposal,
    ) -> Result<EndorsementResponse, PeerError>;

    /// Forward an endorsed transaction for sequencing.
    async fn submit_ordered(
        &self,
        orderer: &OrdererEndpoint,
        bundle: &EndorsedBundle,
    ) -> Result<OrderAcknowledgment, OrderError>;
}

/// Resolves the identity that signs proposals.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The enrolled identity to sign with. Fails with `NotEnrolled` when
    /// none is available.
    async fn signing_identity(&self) -> Result<SigningIdentity, IdentityError>;
}

/// Opens per-transaction commit subscriptions.
pub trait CommitEventSource: Send + Sync {
    fn subscribe(&self, tx_id: TransactionId) -> Result<CommitSubscription, SubscriptionError>;
}
