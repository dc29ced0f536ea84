//! Read-path result selection
//!
//! A query goes to every peer once; the first successful reply in peer
//! order wins.

use crate::domain::endorsement::PeerReply;
use crate::domain::errors::SubmissionError;

/// Pick the payload of the first successful reply.
///
/// Only transport failures: `PeerUnreachable`. Otherwise, when no peer
/// succeeded: `QueryNoResult` carrying the first peer's complaint.
pub fn first_payload(replies: Vec<PeerReply>) -> Result<Vec<u8>, SubmissionError> {
    let attempted = replies.len();
    let mut first_refusal = None;
    let mut first_failure = None;

    for reply in replies {
        match reply {
            Ok(response) if response.is_success() => {
                return Ok(response.payload.unwrap_or_default());
            }
            Ok(response) => {
                if first_refusal.is_none() {
                    let detail = response.error.unwrap_or(response.message);
                    first_refusal = Some(format!(
                        "peer {} returned status {}: {}",
                        response.peer, response.status, detail
                    ));
                }
            }
            Err(error) => {
                if first_failure.is_none() {
                    first_failure = Some(error.to_string());
                }
            }
        }
    }

    match first_refusal {
        Some(reason) => Err(SubmissionError::QueryNoResult { reason }),
        None => Err(SubmissionError::PeerUnreachable {
            attempted,
            reason: first_failure.unwrap_or_else(|| "no peer responses".to_string()),
        }),
    }
}
