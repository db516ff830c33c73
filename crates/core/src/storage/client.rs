//! Object store abstraction.

use std::future::Future;

use bytes::Bytes;

use super::error::StorageError;
use super::types::ListEntry;

/// Minimal object store surface the lifecycle manager needs.
///
/// Implemented over HTTP by [`super::HttpObjectStore`]. Buckets are flat key
/// spaces; folders only exist as synthetic listing entries.
pub trait ObjectStore: Send + Sync {
    /// Write an object, overwriting any existing object at the same key.
    fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Read an object. A missing object is `Ok(None)`.
    fn get(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<Bytes>, StorageError>> + Send;

    /// Delete an object. Deleting a missing object succeeds.
    fn delete(&self, bucket: &str, key: &str)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// List the immediate children of a prefix.
    fn list_by_prefix(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<ListEntry>, StorageError>> + Send;

    /// Public URL of an object. Pure; performs no I/O.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
