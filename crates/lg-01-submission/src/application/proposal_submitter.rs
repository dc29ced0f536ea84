//! Proposal Submitter
//!
//! Builds the proposal for one operation and fans it out to every
//! endorsing peer at once. Per-peer failures are collected alongside the
//! successful replies; none of them aborts the batch.

use futures::future::join_all;
use shared_types::{
    generate_nonce, Operation, PeerError, SigningIdentity, TransactionId, TransactionProposal,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::debug;

use crate::domain::endorsement::PeerReply;
use crate::domain::network::NetworkHandle;
use crate::ports::outbound::LedgerNetworkClient;

#[derive(Clone, Copy)]
enum PeerCall {
    Endorse,
    Query,
}

/// Proposal construction and peer fan-out.
pub struct ProposalSubmitter {
    network: Arc<NetworkHandle>,
    client: Arc<dyn LedgerNetworkClient>,
    request_timeout: Duration,
}

impl ProposalSubmitter {
    pub fn new(
        network: Arc<NetworkHandle>,
        client: Arc<dyn LedgerNetworkClient>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            network,
            client,
            request_timeout,
        }
    }

    /// Create a proposal with a fresh nonce and the identifier derived
    /// from it.
    pub fn build_proposal(
        &self,
        operation: Operation,
        identity: &SigningIdentity,
    ) -> TransactionProposal {
        let nonce = generate_nonce();
        let tx_id = TransactionId::derive(&nonce, &identity.creator_bytes());
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();

        TransactionProposal {
            tx_id,
            channel: self.network.channel().to_string(),
            chaincode_id: self.network.chaincode_id().to_string(),
            operation,
            creator_msp: identity.msp_id.clone(),
            nonce: nonce.to_vec(),
            timestamp_ms,
        }
    }

    /// Collect one endorsement reply per peer, in peer order.
    pub async fn endorse(&self, proposal: &TransactionProposal) -> Vec<PeerReply> {
        self.fan_out(proposal, PeerCall::Endorse).await
    }

    /// Collect one query reply per peer, in peer order.
    pub async fn query(&self, proposal: &TransactionProposal) -> Vec<PeerReply> {
        self.fan_out(proposal, PeerCall::Query).await
    }

    async fn fan_out(&self, proposal: &TransactionProposal, call: PeerCall) -> Vec<PeerReply> {
        let calls = self.network.peers().iter().map(|peer| async move {
            let request = match call {
                PeerCall::Endorse => self.client.endorse(peer, proposal),
                PeerCall::Query => self.client.query(peer, proposal),
            };
            let reply = match timeout(self.request_timeout, request).await {
                Ok(reply) => reply,
                Err(_) => Err(PeerError::Timeout {
                    peer: peer.name.clone(),
                }),
            };

            match &reply {
                Ok(response) => debug!(
                    tx_id = %proposal.tx_id,
                    peer = %peer.name,
                    status = response.status,
                    "Peer replied"
                ),
                Err(error) => debug!(
                    tx_id = %proposal.tx_id,
                    peer = %peer.name,
                    %error,
                    "Peer call failed"
                ),
            }
            reply
        });

        join_all(calls).await
    }
}
