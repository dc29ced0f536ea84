//! Identity adapters
//!
//! Enrollment happens elsewhere; these only hand out identities that
//! already exist.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{IdentityError, SigningIdentity};
use std::collections::HashMap;

use crate::ports::outbound::IdentityProvider;

/// Always returns the identity it was built with.
pub struct StaticIdentityProvider {
    identity: SigningIdentity,
}

impl StaticIdentityProvider {
    pub fn new(identity: SigningIdentity) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn signing_identity(&self) -> Result<SigningIdentity, IdentityError> {
        if !self.identity.enrolled {
            return Err(IdentityError::NotEnrolled {
                label: self.identity.label.clone(),
            });
        }
        Ok(self.identity.clone())
    }
}

/// In-memory label-to-identity table with one active label.
pub struct EnrollmentDirectory {
    active_label: String,
    identities: RwLock<HashMap<String, SigningIdentity>>,
}

impl EnrollmentDirectory {
    pub fn new(active_label: impl Into<String>) -> Self {
        Self {
            active_label: active_label.into(),
            identities: RwLock::new(HashMap::new()),
        }
    }

    /// Builder form of `enroll`.
    #[must_use]
    pub fn with_identity(self, identity: SigningIdentity) -> Self {
        self.enroll(identity);
        self
    }

    /// Store an identity under its label, replacing any previous one.
    pub fn enroll(&self, identity: SigningIdentity) {
        self.identities.write().insert(identity.label.clone(), identity);
    }

    /// Forget an identity. Returns it if it was present.
    pub fn revoke(&self, label: &str) -> Option<SigningIdentity> {
        self.identities.write().remove(label)
    }

    #[must_use]
    pub fn active_label(&self) -> &str {
        &self.active_label
    }
}

#[async_trait]
impl IdentityProvider for EnrollmentDirectory {
    async fn signing_identity(&self) -> Result<SigningIdentity, IdentityError> {
        match self.identities.read().get(&self.active_label) {
            Some(identity) if identity.enrolled => Ok(identity.clone()),
            _ => Err(IdentityError::NotEnrolled {
                label: self.active_label.clone(),
            }),
        }
    }
}
