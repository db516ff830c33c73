//! Object store client.
//!
//! The backend is a bucketed blob store with a REST API. Buckets are flat
//! key spaces; "folders" exist only as synthetic entries in listings.
//!
//! ```text
//! PUT|GET|DELETE {base}/storage/v1/object/{bucket}/{key}
//! POST           {base}/storage/v1/object/list/{bucket}      (JSON body)
//! GET            {base}/storage/v1/object/list/{bucket}?prefix=...  (legacy)
//! public URL     {base}/storage/v1/object/public/{bucket}/{key}
//! ```

mod client;
mod config;
mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
mod service;
mod types;
mod urls;

pub use client::ObjectStore;
pub use config::{BucketLayout, StoreConfig, retry_policy_from_settings};
pub use error::StorageError;
pub use service::{HttpObjectStore, LIST_LIMIT};
pub use types::{ListEntry, ObjectRef, file_name};
pub use urls::StorageUrls;
