//! # Identity and Transaction Identifiers
//!
//! The signing identity authorizes proposals; the transaction identifier is
//! derived from it plus a fresh nonce, the same way the ledger derives it.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::NONCE_LENGTH;

/// The enrolled identity that signs proposals.
///
/// Enrollment itself happens elsewhere; this is the resolved result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningIdentity {
    /// Enrollment label (e.g. `user1`).
    pub label: String,
    /// Membership service provider the identity belongs to.
    pub msp_id: String,
    /// PEM-encoded enrollment certificate.
    pub certificate: String,
    /// Whether enrollment completed.
    pub enrolled: bool,
}

impl SigningIdentity {
    /// Create an enrolled identity.
    pub fn enrolled(
        label: impl Into<String>,
        msp_id: impl Into<String>,
        certificate: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            msp_id: msp_id.into(),
            certificate: certificate.into(),
            enrolled: true,
        }
    }

    /// Serialized creator bytes (`msp_id:certificate`), as mixed into the
    /// transaction identifier.
    #[must_use]
    pub fn creator_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.msp_id.len() + 1 + self.certificate.len());
        bytes.extend_from_slice(self.msp_id.as_bytes());
        bytes.push(b':');
        bytes.extend_from_slice(self.certificate.as_bytes());
        bytes
    }
}

/// Unique transaction identifier: hex SHA-256 of `nonce || creator`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Derive an identifier from a nonce and the creator bytes.
    #[must_use]
    pub fn derive(nonce: &[u8], creator: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(nonce);
        hasher.update(creator);
        Self(hex::encode(hasher.finalize()))
    }

    /// Wrap an identifier received from the network.
    pub fn from_hex(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The identifier as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Draw a fresh proposal nonce.
#[must_use]
pub fn generate_nonce() -> [u8; NONCE_LENGTH] {
    let mut nonce = [0u8; NONCE_LENGTH];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}
