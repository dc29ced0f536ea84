//! Adapters for the outbound ports.

pub mod commit_hub;
pub mod identity;
pub mod simulated;

pub use identity::{EnrollmentDirectory, StaticIdentityProvider};
pub use simulated::{CommitBehavior, OrdererBehavior, PeerBehavior, SimulatedLedger};
