//! Simulated Ledger
//!
//! A scripted in-process ledger network for tests and local runs. It does
//! not execute contract logic: endorsements, order answers and commit
//! events follow whatever behavior was configured, and query payloads come
//! from a lookup table.
//!
//! Commit events are published to a `CommitEventHub`, the same one the
//! submission service subscribes through.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_bus::{CommitEventHub, CommitEventPublisher};
use shared_types::{
    CommitEvent, EndorsedBundle, EndorsementResponse, OrderAcknowledgment, OrderError,
    OrderStatus, OrdererEndpoint, PeerEndpoint, PeerError, TransactionId, TransactionProposal,
    ValidationCode,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::ports::outbound::LedgerNetworkClient;

/// How a peer answers proposals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerBehavior {
    /// Status 200.
    Endorse,
    /// Answer with a non-success status.
    Refuse { status: u32, message: String },
    /// Transport failure.
    Unreachable,
    /// Never answer.
    Silent,
}

/// How the orderer answers broadcasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrdererBehavior {
    Accept,
    Reject { status: OrderStatus, info: String },
    Unreachable,
    Silent,
}

/// What the commit stream does after a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitBehavior {
    /// Publish an event with `code` once `after` has elapsed.
    Emit { code: ValidationCode, after: Duration },
    /// Publish nothing.
    Withhold,
}

impl CommitBehavior {
    pub fn valid_after(after: Duration) -> Self {
        CommitBehavior::Emit {
            code: ValidationCode::Valid,
            after,
        }
    }
}

/// Scripted ledger network.
pub struct SimulatedLedger {
    hub: Arc<CommitEventHub>,
    peers: RwLock<HashMap<String, PeerBehavior>>,
    orderer: RwLock<OrdererBehavior>,
    commit: RwLock<CommitBehavior>,
    /// Commit behavior by record id (first operation argument).
    commit_by_record: RwLock<HashMap<String, CommitBehavior>>,
    /// Query payloads by contract function and arguments.
    queries: RwLock<HashMap<(String, Vec<String>), Vec<u8>>>,
    order_calls: Mutex<Vec<TransactionId>>,
    endorse_calls: AtomicUsize,
    query_calls: AtomicUsize,
    next_block: AtomicU64,
}

impl SimulatedLedger {
    /// Every peer endorses, the orderer accepts, commits are `VALID` with
    /// no delay.
    pub fn new(hub: Arc<CommitEventHub>) -> Self {
        Self {
            hub,
            peers: RwLock::new(HashMap::new()),
            orderer: RwLock::new(OrdererBehavior::Accept),
            commit: RwLock::new(CommitBehavior::valid_after(Duration::ZERO)),
            commit_by_record: RwLock::new(HashMap::new()),
            queries: RwLock::new(HashMap::new()),
            order_calls: Mutex::new(Vec::new()),
            endorse_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            next_block: AtomicU64::new(1),
        }
    }

    /// The hub commit events are published to.
    #[must_use]
    pub fn hub(&self) -> &Arc<CommitEventHub> {
        &self.hub
    }

    /// Script one peer. Unscripted peers endorse.
    pub fn set_peer(&self, name: impl Into<String>, behavior: PeerBehavior) {
        self.peers.write().insert(name.into(), behavior);
    }

    pub fn set_orderer(&self, behavior: OrdererBehavior) {
        *self.orderer.write() = behavior;
    }

    /// Default commit behavior for every broadcast.
    pub fn set_commit(&self, behavior: CommitBehavior) {
        *self.commit.write() = behavior;
    }

    /// Commit behavior for operations whose first argument is `record_id`.
    pub fn set_commit_for(&self, record_id: impl Into<String>, behavior: CommitBehavior) {
        self.commit_by_record
            .write()
            .insert(record_id.into(), behavior);
    }

    /// Payload returned by successful queries of `function(args)`.
    pub fn set_query_result<I, S>(&self, function: impl Into<String>, args: I, payload: Vec<u8>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = (function.into(), args.into_iter().map(Into::into).collect());
        self.queries.write().insert(key, payload);
    }

    /// Transactions forwarded to the orderer, in call order.
    #[must_use]
    pub fn order_calls(&self) -> Vec<TransactionId> {
        self.order_calls.lock().clone()
    }

    #[must_use]
    pub fn endorse_calls(&self) -> usize {
        self.endorse_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::Relaxed)
    }

    fn peer_behavior(&self, peer: &PeerEndpoint) -> PeerBehavior {
        self.peers
            .read()
            .get(&peer.name)
            .cloned()
            .unwrap_or(PeerBehavior::Endorse)
    }

    fn commit_behavior(&self, bundle: &EndorsedBundle) -> CommitBehavior {
        let record = bundle.proposal.operation.args().first();
        record
            .and_then(|id| self.commit_by_record.read().get(id).copied())
            .unwrap_or_else(|| *self.commit.read())
    }

    fn schedule_commit(&self, bundle: &EndorsedBundle, orderer: &OrdererEndpoint) {
        let CommitBehavior::Emit { code, after } = self.commit_behavior(bundle) else {
            debug!(tx_id = %bundle.tx_id(), "Commit event withheld");
            return;
        };

        let block = self.next_block.fetch_add(1, Ordering::Relaxed);
        let event = CommitEvent::new(bundle.tx_id().clone(), code)
            .with_block(block)
            .with_peer(orderer.name.clone());
        let hub = self.hub.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            hub.publish(event).await;
        });
    }
}

/// Refusal, failure or silence for a scripted peer; `None` means answer.
async fn scripted_failure(
    behavior: PeerBehavior,
    peer: &PeerEndpoint,
) -> Option<Result<EndorsementResponse, PeerError>> {
    match behavior {
        PeerBehavior::Endorse => None,
        PeerBehavior::Refuse { status, message } => Some(Ok(EndorsementResponse::with_status(
            peer.name.clone(),
            status,
            message,
        ))),
        PeerBehavior::Unreachable => Some(Err(PeerError::Unreachable {
            peer: peer.name.clone(),
            reason: "connection refused".to_string(),
        })),
        PeerBehavior::Silent => std::future::pending().await,
    }
}

#[async_trait]
impl LedgerNetworkClient for SimulatedLedger {
    async fn endorse(
        &self,
        peer: &PeerEndpoint,
        proposal: &TransactionProposal,
    ) -> Result<EndorsementResponse, PeerError> {
        self.endorse_calls.fetch_add(1, Ordering::Relaxed);
        debug!(tx_id = %proposal.tx_id, peer = %peer.name, operation = %proposal.operation, "Simulated endorsement");

        if let Some(reply) = scripted_failure(self.peer_behavior(peer), peer).await {
            return reply;
        }
        Ok(EndorsementResponse::success(peer.name.clone(), None))
    }

    async fn query(
        &self,
        peer: &PeerEndpoint,
        proposal: &TransactionProposal,
    ) -> Result<EndorsementResponse, PeerError> {
        self.query_calls.fetch_add(1, Ordering::Relaxed);

        if let Some(reply) = scripted_failure(self.peer_behavior(peer), peer).await {
            return reply;
        }

        let operation = &proposal.operation;
        let key = (
            operation.function_name().to_string(),
            operation.args().to_vec(),
        );
        match self.queries.read().get(&key) {
            Some(payload) => Ok(EndorsementResponse::success(
                peer.name.clone(),
                Some(payload.clone()),
            )),
            None => Ok(EndorsementResponse::with_status(
                peer.name.clone(),
                500,
                format!("no result for {operation}"),
            )),
        }
    }

    async fn submit_ordered(
        &self,
        orderer: &OrdererEndpoint,
        bundle: &EndorsedBundle,
    ) -> Result<OrderAcknowledgment, OrderError> {
        self.order_calls.lock().push(bundle.tx_id().clone());

        // The commit stream runs independently of the orderer's answer.
        self.schedule_commit(bundle, orderer);

        let behavior = self.orderer.read().clone();
        match behavior {
            OrdererBehavior::Accept => Ok(OrderAcknowledgment::accepted(bundle.tx_id().clone())),
            OrdererBehavior::Reject { status, info } => Ok(OrderAcknowledgment::rejected(
                bundle.tx_id().clone(),
                status,
                info,
            )),
            OrdererBehavior::Unreachable => Err(OrderError::Unreachable {
                orderer: orderer.name.clone(),
                reason: "connection refused".to_string(),
            }),
            OrdererBehavior::Silent => std::future::pending().await,
        }
    }
}
