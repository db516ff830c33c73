//! Deletion service errors.

use bazaar_shared::AppError;
use thiserror::Error;

/// Errors that stop a deletion before or after the archive run.
///
/// An archive run that fails its gate is not an error here; it is reported
/// through [`super::DeletionOutcome`].
#[derive(Debug, Error)]
pub enum DeletionError {
    /// The listing or account does not exist for this owner.
    #[error("{0} not found")]
    NotFound(String),

    /// The evidence directory failed.
    #[error("evidence directory error: {0}")]
    Directory(String),

    /// The audit log failed.
    #[error("deletion audit error: {0}")]
    Audit(String),
}

impl DeletionError {
    /// Create a not-found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a directory error.
    #[must_use]
    pub fn directory(msg: impl Into<String>) -> Self {
        Self::Directory(msg.into())
    }

    /// Create an audit error.
    #[must_use]
    pub fn audit(msg: impl Into<String>) -> Self {
        Self::Audit(msg.into())
    }
}

impl From<DeletionError> for AppError {
    fn from(err: DeletionError) -> Self {
        match err {
            DeletionError::NotFound(what) => Self::NotFound(what),
            DeletionError::Directory(msg) | DeletionError::Audit(msg) => Self::Database(msg),
        }
    }
}
