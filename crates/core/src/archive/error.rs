//! Per-item archive failures.

use thiserror::Error;

use super::types::EvidenceKind;
use crate::retry::RetryError;
use crate::storage::StorageError;

/// Why an item could not be archived or deleted.
///
/// These are recorded on items and in [`super::ArchiveResult::errors`];
/// a run never returns them.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A stored evidence URL does not address an object.
    #[error("cannot resolve {kind} url {url:?}: {source}")]
    UnresolvableUrl {
        /// Evidence category.
        kind: EvidenceKind,
        /// The stored URL.
        url: String,
        /// Parse failure.
        #[source]
        source: StorageError,
    },

    /// Reading the source failed after retries.
    #[error("read {bucket}/{key}: {source}")]
    Read {
        /// Source bucket.
        bucket: String,
        /// Source key.
        key: String,
        /// Exhausted retry.
        #[source]
        source: RetryError<StorageError>,
    },

    /// Writing the archive copy failed after retries.
    #[error("archive write {bucket}/{key}: {source}")]
    Write {
        /// Archive bucket.
        bucket: String,
        /// Archive key.
        key: String,
        /// Exhausted retry.
        #[source]
        source: RetryError<StorageError>,
    },

    /// Deleting the source failed after retries.
    #[error("delete {bucket}/{key}: {source}")]
    Delete {
        /// Source bucket.
        bucket: String,
        /// Source key.
        key: String,
        /// Exhausted retry.
        #[source]
        source: RetryError<StorageError>,
    },
}
