//! Endorsement Policy
//!
//! Unanimous policy: every configured peer must answer with status 200 and
//! no error. One refusal, transport failure or missing answer rejects the
//! proposal before anything reaches the orderer.

use shared_types::{EndorsedBundle, EndorsementResponse, PeerError, TransactionProposal};
use tracing::{debug, warn};

use crate::domain::errors::SubmissionError;

/// One peer's reply, or the transport failure that replaced it.
pub type PeerReply = Result<EndorsementResponse, PeerError>;

/// Evaluates the collected replies for one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndorsementPolicy {
    required: usize,
}

impl EndorsementPolicy {
    /// All `required` peers must endorse.
    #[must_use]
    pub fn unanimous(required: usize) -> Self {
        Self { required }
    }

    /// Number of endorsements the policy needs.
    #[must_use]
    pub fn required(&self) -> usize {
        self.required
    }

    /// Accept the proposal into an endorsed bundle, or say why not.
    ///
    /// - No replies at all, or only transport failures: `PeerUnreachable`
    /// - Fewer replies than peers, any failure, any non-200: `EndorsementRejected`
    pub fn evaluate(
        &self,
        proposal: TransactionProposal,
        replies: Vec<PeerReply>,
    ) -> Result<EndorsedBundle, SubmissionError> {
        if replies.iter().all(Result::is_err) {
            let reason = replies
                .iter()
                .find_map(|r| r.as_ref().err().map(ToString::to_string))
                .unwrap_or_else(|| "no peer responses".to_string());
            warn!(tx_id = %proposal.tx_id, attempted = replies.len(), %reason, "No endorsing peer reachable");
            return Err(SubmissionError::PeerUnreachable {
                attempted: replies.len(),
                reason,
            });
        }

        if replies.len() < self.required {
            return Err(self.reject(
                &proposal,
                format!(
                    "received {} of {} endorsements",
                    replies.len(),
                    self.required
                ),
            ));
        }

        let mut endorsements = Vec::with_capacity(replies.len());
        for reply in replies {
            match reply {
                Ok(response) if response.is_success() => {
                    debug!(tx_id = %proposal.tx_id, peer = %response.peer, "Endorsement accepted");
                    endorsements.push(response);
                }
                Ok(response) => {
                    let reason = match &response.error {
                        Some(error) => format!("peer {} reported error: {}", response.peer, error),
                        None => format!(
                            "peer {} returned status {}: {}",
                            response.peer, response.status, response.message
                        ),
                    };
                    return Err(self.reject(&proposal, reason));
                }
                Err(error) => {
                    return Err(self.reject(&proposal, error.to_string()));
                }
            }
        }

        Ok(EndorsedBundle {
            proposal,
            endorsements,
        })
    }

    fn reject(&self, proposal: &TransactionProposal, reason: String) -> SubmissionError {
        warn!(tx_id = %proposal.tx_id, %reason, required = self.required, "Endorsement rejected");
        SubmissionError::EndorsementRejected {
            tx_id: proposal.tx_id.clone(),
            reason,
        }
    }
}
