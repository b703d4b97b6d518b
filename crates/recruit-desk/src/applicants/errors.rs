use super::client::FetchError;
use super::domain::ApplicationId;

/// A derived lookup (company slug, application id) matched nothing. Terminal; callers do not retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("no company with slug '{slug}'")]
    Company { slug: String },
    #[error("no application with id '{id}'")]
    Application { id: ApplicationId },
}

/// Client-side checks that block a submission before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("an update must change the status or the notes")]
    EmptyPatch,
    #[error("notes are limited to {max} characters, got {actual}")]
    NotesTooLong { max: usize, actual: usize },
    #[error("invalid {field} filter '{value}'")]
    InvalidFilter { field: &'static str, value: String },
}

/// Error raised by the applicant directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
