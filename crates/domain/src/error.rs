//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`VoxHubError`]
//! via `#[from]`. None of these are fatal: the core resolves them into
//! user-facing acknowledgments, and the HTTP adapter maps them to status codes.

/// Top-level error surfaced by services and adapters.
#[derive(Debug, thiserror::Error)]
pub enum VoxHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("resource not found")]
    NotFound(#[from] NotFoundError),
}

/// A domain invariant was violated by the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("vocabulary keyword must not be empty")]
    EmptyKeyword,

    #[error("vocabulary must contain at least one device")]
    EmptyVocabulary,

    #[error("scheduled time must be after the creation time")]
    FireAtNotInFuture,

    #[error("scheduled time must fall within the next 24 hours")]
    FireAtBeyondWindow,

    #[error("invalid identifier: {0}")]
    InvalidId(#[from] uuid::Error),
}

/// A lookup by id found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
