//! Workflow error taxonomy.
//!
//! Every failure crosses the workflow boundary as one of these typed values
//! so the presentation layer can render a specific message per kind. Nothing
//! is thrown or swallowed; a failed decide always leaves the request in a
//! well-defined, previously-observed state.

use thiserror::Error;

use guardpost_core::DomainError;

pub type ApprovalResult<T> = Result<T, ApprovalError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    /// Malformed input: missing payload field, empty rejection reason.
    /// Recovered locally by correcting the input; never a system fault.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The actor lacks the permission the attempted transition requires.
    #[error("not permitted: {0}")]
    Authorization(String),

    /// Transition attempted on a non-pending request (double decision, race).
    /// Surfaced as a conflict; re-fetch before retrying.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The deferred entity mutation failed during approve. The request stays
    /// `pending`; the underlying repository error is carried for the decider.
    #[error("entity write failed: {0}")]
    EntityWrite(String),

    /// Request id unknown, or outside the caller's organization.
    #[error("request not found")]
    NotFound,
}

impl From<DomainError> for ApprovalError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound => ApprovalError::NotFound,
            other => ApprovalError::Validation(other.to_string()),
        }
    }
}
