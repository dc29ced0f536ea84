//! Network Handle
//!
//! Immutable description of where a submission goes. Built once, shared
//! behind `Arc` by every submission.

use shared_types::{OrdererEndpoint, PeerEndpoint};

use crate::config::NetworkConfig;

/// Channel, contract, endorsing peers and orderer for this gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkHandle {
    channel: String,
    chaincode_id: String,
    peers: Vec<PeerEndpoint>,
    orderer: OrdererEndpoint,
}

impl NetworkHandle {
    pub fn new(
        channel: impl Into<String>,
        chaincode_id: impl Into<String>,
        peers: Vec<PeerEndpoint>,
        orderer: OrdererEndpoint,
    ) -> Self {
        Self {
            channel: channel.into(),
            chaincode_id: chaincode_id.into(),
            peers,
            orderer,
        }
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn chaincode_id(&self) -> &str {
        &self.chaincode_id
    }

    /// Endorsing peers, in configuration order.
    #[must_use]
    pub fn peers(&self) -> &[PeerEndpoint] {
        &self.peers
    }

    #[must_use]
    pub fn orderer(&self) -> &OrdererEndpoint {
        &self.orderer
    }
}

impl From<&NetworkConfig> for NetworkHandle {
    fn from(config: &NetworkConfig) -> Self {
        Self::new(
            config.channel.clone(),
            config.chaincode_id.clone(),
            config.peers.clone(),
            config.orderer.clone(),
        )
    }
}
