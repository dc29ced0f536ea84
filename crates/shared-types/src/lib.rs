//! # Shared Types Crate
//!
//! Domain entities shared by every crate in the ledger gateway.
//!
//! ## Clusters
//!
//! - **Operations**: `Operation`, `OperationKind` (the logical requests the
//!   caller can make, mapped onto contract functions)
//! - **Transactions**: `TransactionId`, `TransactionProposal`,
//!   `EndorsementResponse`, `EndorsedBundle`
//! - **Ordering & Commit**: `OrderAcknowledgment`, `CommitEvent`,
//!   `ValidationCode`, `SubmissionOutcome`
//! - **Network & Identity**: `PeerEndpoint`, `OrdererEndpoint`,
//!   `SigningIdentity`
//!
//! ## Design Principles
//!
//! - **Immutable requests**: an `Operation` is validated once at construction
//!   and never mutated afterwards.
//! - **One identifier per attempt**: every `TransactionProposal` draws a fresh
//!   nonce, so its `TransactionId` is never shared with another attempt.
//! - **Outcome invariant**: a `SubmissionOutcome` is successful only when the
//!   orderer accepted the transaction and the commit event reported `VALID`.

pub mod entities;
pub mod errors;
pub mod identity;
pub mod operation;

pub use entities::*;
pub use errors::*;
pub use identity::*;
pub use operation::*;

/// Status code an endorsing peer returns for a successful simulation.
pub const ENDORSEMENT_SUCCESS_STATUS: u32 = 200;

/// Length in bytes of the random nonce mixed into every transaction identifier.
pub const NONCE_LENGTH: usize = 24;
