//! Folder registry abstraction.

use std::future::Future;

use bazaar_shared::ListingId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by registry implementations.
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// Backing repository failure.
    #[error("folder registry error: {0}")]
    Registry(String),
}

impl EnumerationError {
    /// Create a registry error.
    #[must_use]
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }
}

/// A prefix known to hold objects for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    /// Listing the prefix belongs to.
    pub listing_id: ListingId,
    /// Prefix within the listing image bucket.
    pub prefix: String,
}

/// Hint store mapping listings to the prefixes their images were written under.
///
/// This is implemented by the db crate. The registry is only a hint:
/// enumeration still probes every known layout.
pub trait FolderRegistry: Send + Sync {
    /// Prefixes recorded for a listing.
    fn prefixes_for(
        &self,
        listing: ListingId,
    ) -> impl Future<Output = Result<Vec<String>, EnumerationError>> + Send;

    /// Record a prefix for a listing. Recording an existing pair is a no-op.
    fn record(
        &self,
        listing: ListingId,
        prefix: &str,
    ) -> impl Future<Output = Result<(), EnumerationError>> + Send;

    /// Forget every prefix of a listing, returning how many were removed.
    fn remove_for(
        &self,
        listing: ListingId,
    ) -> impl Future<Output = Result<u64, EnumerationError>> + Send;
}
