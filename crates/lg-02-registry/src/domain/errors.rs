//! Registry client errors

use lg_01_submission::SubmissionError;
use shared_types::OperationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The submission pipeline failed; see the inner kind.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The contract returned a payload that is not the expected JSON.
    #[error("Failed to decode contract payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl From<OperationError> for RegistryError {
    fn from(error: OperationError) -> Self {
        RegistryError::Submission(SubmissionError::InvalidOperation(error))
    }
}

impl RegistryError {
    /// The transaction may or may not have committed.
    #[must_use]
    pub fn is_final_state_unknown(&self) -> bool {
        matches!(self, RegistryError::Submission(e) if e.is_final_state_unknown())
    }
}
