//! # Ledger Gateway Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Gateway wired to a simulated ledger
//! └── integration/      # Cross-crate flows
//!     ├── submission_flows.rs
//!     ├── concurrency.rs
//!     └── registry_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p lg-tests
//!
//! # By category
//! cargo test -p lg-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p lg-tests
//! ```

pub mod harness;
pub mod integration;
