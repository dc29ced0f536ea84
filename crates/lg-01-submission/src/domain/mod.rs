//! Domain module for Transaction Submission
//!
//! Endorsement policy, commit listener, outcome reconciliation, read-path
//! result selection, and the error kinds they produce.

pub mod commit_listener;
pub mod endorsement;
pub mod errors;
pub mod network;
pub mod query;
pub mod reconciler;

pub use commit_listener::{CommitListener, CommitVerdict, ListenerReport, ListenerState};
pub use endorsement::{EndorsementPolicy, PeerReply};
pub use errors::SubmissionError;
pub use network::NetworkHandle;
pub use query::first_payload;
pub use reconciler::{reconcile, OrderResult, OutcomeExt};
