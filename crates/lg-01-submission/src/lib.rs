//! # LG-01: Transaction Submission Subsystem
//!
//! Client-side orchestration of one ledger write: endorsement by every
//! configured peer, ordering, and confirmation that the transaction was
//! committed as valid. Read-only operations take a single query round trip.
//!
//! ## Architecture
//!
//! - **Domain**: endorsement policy, commit listener, outcome reconciler,
//!   network handle, `SubmissionError`
//! - **Ports**: Inbound (`TransactionSubmissionApi`) and Outbound
//!   (`LedgerNetworkClient`, `IdentityProvider`, `CommitEventSource`)
//! - **Application**: `SubmissionService` with the proposal and order
//!   submitters
//! - **Adapters**: identity providers, the commit hub source, and the
//!   scripted `SimulatedLedger`
//!
//! ## Outcome
//!
//! `submit` succeeds only when the orderer accepted the transaction **and**
//! the commit event for its identifier reported `VALID`. `CommitTimeout`
//! and `CommitStreamClosed` mean the final state is unknown.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{
    CommitBehavior, EnrollmentDirectory, OrdererBehavior, PeerBehavior, SimulatedLedger,
    StaticIdentityProvider,
};
pub use application::SubmissionService;
pub use config::{ConfigError, GatewayConfig, IdentityConfig, NetworkConfig, SubmissionConfig};
pub use domain::{
    CommitVerdict, EndorsementPolicy, ListenerState, NetworkHandle, OutcomeExt, SubmissionError,
};
pub use ports::inbound::TransactionSubmissionApi;
pub use ports::outbound::{CommitEventSource, IdentityProvider, LedgerNetworkClient};
