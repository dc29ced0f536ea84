//! Order Submitter
//!
//! Forwards an endorsed bundle to the ordering service and reports its
//! synchronous answer. Acceptance only means "received for sequencing".

use shared_types::{EndorsedBundle, OrderError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::network::NetworkHandle;
use crate::domain::reconciler::OrderResult;
use crate::ports::outbound::LedgerNetworkClient;

pub struct OrderSubmitter {
    network: Arc<NetworkHandle>,
    client: Arc<dyn LedgerNetworkClient>,
    request_timeout: Duration,
}

impl OrderSubmitter {
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

    /// Send the bundle once. No retry.
    pub async fn submit(&self, bundle: &EndorsedBundle) -> OrderResult {
        let orderer = self.network.orderer();
        let result = match timeout(self.request_timeout, self.client.submit_ordered(orderer, bundle))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(OrderError::Timeout {
                orderer: orderer.name.clone(),
            }),
        };

        match &result {
            Ok(ack) if ack.is_accepted() => {
                info!(tx_id = %bundle.tx_id(), orderer = %orderer.name, "Transaction accepted for ordering");
            }
            Ok(ack) => {
                warn!(
                    tx_id = %bundle.tx_id(),
                    orderer = %orderer.name,
                    status = %ack.status,
                    info = %ack.info,
                    "Orderer rejected transaction"
                );
            }
            Err(error) => {
                warn!(tx_id = %bundle.tx_id(), %error, "Orderer unavailable");
            }
        }
        result
    }
}
