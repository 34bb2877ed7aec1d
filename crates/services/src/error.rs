//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The selection is not one of the current card's choices. Recoverable:
    /// the session is unchanged and the caller should prompt again.
    #[error("not a choice of the current card: {selection}")]
    InvalidSelection { selection: String },
    #[error("session already completed")]
    Completed,
    #[error("session is still running")]
    InProgress,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True when the requested subject, file or deck does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::Storage(err) if err.is_not_found())
    }
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
