//! Application layer: the submission pipeline and its two network-facing
//! stages.

pub mod order_submitter;
pub mod proposal_submitter;
pub mod service;

pub use order_submitter::OrderSubmitter;
pub use proposal_submitter::ProposalSubmitter;
pub use service::SubmissionService;
