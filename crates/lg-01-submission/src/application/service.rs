//! Transaction Submission Service
//!
//! Main service implementing TransactionSubmissionApi.

use async_trait::async_trait;
use ledger_telemetry::{
    submission_span, time_histogram, GaugeGuard, ACTIVE_COMMIT_SUBSCRIPTIONS, COMMIT_TIMEOUTS,
    COMMIT_WAIT_DURATION, ENDORSEMENT_REJECTIONS, QUERIES_TOTAL, SUBMISSIONS_TOTAL,
    SUBMISSION_DURATION,
};
use shared_types::{Operation, OperationError, SubmissionOutcome};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn, Instrument};

use crate::application::order_submitter::OrderSubmitter;
use crate::application::proposal_submitter::ProposalSubmitter;
use crate::config::{ConfigError, SubmissionConfig};
use crate::domain::commit_listener::{CommitListener, CommitVerdict};
use crate::domain::endorsement::EndorsementPolicy;
use crate::domain::errors::SubmissionError;
use crate::domain::network::NetworkHandle;
use crate::domain::query::first_payload;
use crate::domain::reconciler::{reconcile, OutcomeExt};
use crate::ports::inbound::TransactionSubmissionApi;
use crate::ports::outbound::{CommitEventSource, IdentityProvider, LedgerNetworkClient};

/// Transaction Submission Service
///
/// Write pipeline:
/// 1. Resolve the signing identity
/// 2. Build the proposal and fan it out to every endorsing peer
/// 3. Apply the unanimous endorsement policy
/// 4. Open the commit subscription
/// 5. Run ordering and the commit wait concurrently, waiting for both
/// 6. Reconcile the two answers into one outcome
///
/// Concurrent submissions share nothing but the commit event source.
pub struct SubmissionService {
    network: Arc<NetworkHandle>,
    identity: Arc<dyn IdentityProvider>,
    commits: Arc<dyn CommitEventSource>,
    proposals: ProposalSubmitter,
    orders: OrderSubmitter,
    policy: EndorsementPolicy,
    config: SubmissionConfig,
    admission: Arc<Semaphore>,
}

impl SubmissionService {
    /// Create a new service with default config
    pub fn new(
        network: Arc<NetworkHandle>,
        client: Arc<dyn LedgerNetworkClient>,
        identity: Arc<dyn IdentityProvider>,
        commits: Arc<dyn CommitEventSource>,
    ) -> Self {
        Self::build(network, client, identity, commits, SubmissionConfig::default())
    }

    /// Create a new service with custom config.
    ///
    /// Fails if the limits are unusable: no admission permits would leave
    /// every submission waiting forever.
    pub fn with_config(
        network: Arc<NetworkHandle>,
        client: Arc<dyn LedgerNetworkClient>,
        identity: Arc<dyn IdentityProvider>,
        commits: Arc<dyn CommitEventSource>,
        config: SubmissionConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(network, client, identity, commits, config))
    }

    fn build(
        network: Arc<NetworkHandle>,
        client: Arc<dyn LedgerNetworkClient>,
        identity: Arc<dyn IdentityProvider>,
        commits: Arc<dyn CommitEventSource>,
        config: SubmissionConfig,
    ) -> Self {
        let request_timeout = config.request_timeout();
        Self {
            proposals: ProposalSubmitter::new(network.clone(), client.clone(), request_timeout),
            orders: OrderSubmitter::new(network.clone(), client, request_timeout),
            policy: EndorsementPolicy::unanimous(network.peers().len()),
            admission: Arc::new(Semaphore::new(config.max_in_flight)),
            network,
            identity,
            commits,
            config,
        }
    }

    #[must_use]
    pub fn network(&self) -> &NetworkHandle {
        &self.network
    }

    #[must_use]
    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    /// Submission slots currently free.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.admission.available_permits()
    }

    /// Stop admitting write submissions. Admitted ones run to completion.
    pub fn close(&self) {
        self.admission.close();
        info!("Submission service closed to new work");
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.admission.is_closed()
    }

    async fn run_write(&self, operation: Operation) -> Result<SubmissionOutcome, SubmissionError> {
        // 1. Identity
        let identity = self.identity.signing_identity().await?;

        // 2. Proposal fan-out
        let proposal = self.proposals.build_proposal(operation, &identity);
        let tx_id = proposal.tx_id.clone();
        info!(
            tx_id = %tx_id,
            operation = %proposal.operation,
            peers = self.network.peers().len(),
            "Sending proposal for endorsement"
        );
        let replies = self.proposals.endorse(&proposal).await;

        // 3. Endorsement policy
        let bundle = self.policy.evaluate(proposal, replies).inspect_err(|e| {
            if matches!(e, SubmissionError::EndorsementRejected { .. }) {
                ENDORSEMENT_REJECTIONS.inc();
            }
        })?;
        info!(tx_id = %tx_id, endorsements = bundle.endorsements.len(), "Proposal endorsed");

        // 4. Subscribe before anything reaches the orderer
        let subscription = self.commits.subscribe(tx_id.clone()).map_err(|e| {
            SubmissionError::SubscriptionFailed {
                tx_id: tx_id.clone(),
                reason: e.to_string(),
            }
        })?;
        let listener = CommitListener::new(subscription, self.config.commit_timeout());

        // 5. Order and wait; neither side is cancelled by the other
        let waiting = GaugeGuard::new(&ACTIVE_COMMIT_SUBSCRIPTIONS);
        let (order, report) = tokio::join!(self.orders.submit(&bundle), listener.run());
        drop(waiting);

        COMMIT_WAIT_DURATION.observe(report.waited.as_secs_f64());
        if report.verdict == CommitVerdict::TimedOut {
            COMMIT_TIMEOUTS.inc();
        }

        // 6. Reconcile
        let outcome = reconcile(&tx_id, &order, &report.verdict);
        let elapsed_ms = u64::try_from(report.waited.as_millis()).unwrap_or(u64::MAX);
        if outcome.is_success() {
            info!(tx_id = %tx_id, elapsed_ms, "Transaction committed");
        } else {
            warn!(
                tx_id = %tx_id,
                code = ?report.verdict.code(),
                elapsed_ms,
                reason = outcome.reason(),
                "Transaction not committed"
            );
        }
        outcome.into_result()
    }

    async fn run_read(&self, operation: Operation) -> Result<Vec<u8>, SubmissionError> {
        let identity = self.identity.signing_identity().await?;
        let proposal = self.proposals.build_proposal(operation, &identity);
        info!(tx_id = %proposal.tx_id, operation = %proposal.operation, "Evaluating query");

        let replies = self.proposals.query(&proposal).await;
        first_payload(replies)
    }
}

#[async_trait]
impl TransactionSubmissionApi for SubmissionService {
    async fn submit(&self, operation: Operation) -> Result<SubmissionOutcome, SubmissionError> {
        let kind = operation.kind();
        if !kind.is_write() {
            return Err(OperationError::WrongPath {
                kind,
                path: "write",
            }
            .into());
        }

        let _permit = self
            .admission
            .acquire()
            .await
            .map_err(|_| SubmissionError::ShuttingDown)?;
        let _timer = time_histogram!(SUBMISSION_DURATION);

        let result = self
            .run_write(operation)
            .instrument(submission_span!("submit", operation = %kind))
            .await;

        let label = match &result {
            Ok(_) => "committed",
            Err(e) => e.label(),
        };
        SUBMISSIONS_TOTAL.with_label_values(&[label]).inc();
        result
    }

    async fn evaluate(&self, operation: Operation) -> Result<Vec<u8>, SubmissionError> {
        let kind = operation.kind();
        if !kind.is_read() {
            return Err(OperationError::WrongPath { kind, path: "read" }.into());
        }

        let result = self
            .run_read(operation)
            .instrument(submission_span!("evaluate", operation = %kind))
            .await;

        let label = match &result {
            Ok(_) => "ok",
            Err(e) => e.label(),
        };
        QUERIES_TOTAL.with_label_values(&[label]).inc();
        result
    }
}
