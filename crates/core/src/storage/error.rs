//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
///
/// "Not found" is deliberately absent: a missing object is `Ok(None)` on
/// read and `Ok(())` on delete.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport-level failure (connection refused, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status other than an accepted 404.
    #[error("storage backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Backend answered 2xx with a body that could not be understood.
    #[error("invalid storage response: {0}")]
    InvalidResponse(String),

    /// An object URL could not be parsed into bucket and key.
    #[error("invalid object url: {0}")]
    InvalidUrl(String),

    /// Storage client configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Status code carried by the error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Configuration(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            StorageError::status(500, "boom").to_string(),
            "storage backend returned 500: boom"
        );
        assert_eq!(
            StorageError::network("connection refused").to_string(),
            "network error: connection refused"
        );
    }

    #[test]
    fn test_status_code() {
        assert_eq!(StorageError::status(403, "denied").status_code(), Some(403));
        assert_eq!(StorageError::network("x").status_code(), None);
    }
}
