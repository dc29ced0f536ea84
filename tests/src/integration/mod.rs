//! # Integration Flows
//!
//! Every flow runs the real `SubmissionService` against the scripted
//! ledger. Timing flows use tokio's paused clock.

mod concurrency;
mod registry_flows;
mod submission_flows;
