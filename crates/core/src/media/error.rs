//! Media service errors.

use bazaar_shared::AppError;
use thiserror::Error;

use crate::retry::RetryError;
use crate::storage::StorageError;

/// Media upload and removal errors.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Request rejected before touching storage.
    #[error("validation error: {0}")]
    Validation(String),

    /// A storage call failed after retries.
    #[error(transparent)]
    Storage(#[from] RetryError<StorageError>),

    /// A URL did not address a stored object.
    #[error(transparent)]
    InvalidUrl(#[from] StorageError),

    /// Image processing task panicked or was cancelled.
    #[error("image processing task failed: {0}")]
    Processing(String),
}

impl MediaError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Validation(msg) => Self::Validation(msg),
            MediaError::InvalidUrl(source) => Self::Validation(source.to_string()),
            MediaError::Storage(source) => Self::ExternalService(source.to_string()),
            MediaError::Processing(msg) => Self::Internal(msg),
        }
    }
}
