//! Media storage lifecycle for Bazaar.
//!
//! This crate holds the storage logic with no web or database dependencies.
//! Persistence sits behind traits implemented by `bazaar-db`.
//!
//! # Modules
//!
//! - `retry` - Bounded exponential backoff around storage calls
//! - `storage` - Object store trait and its HTTP client
//! - `enumerate` - Depth-bounded recursive listing of key prefixes
//! - `imaging` - Resize, watermark and re-encode uploaded images
//! - `archive` - Copy evidence to the archive bucket, then delete the sources
//! - `media` - Upload path for listing images, profile photos and documents
//! - `deletion` - Listing and account deletion behind the archive gate

pub mod archive;
pub mod deletion;
pub mod enumerate;
pub mod imaging;
pub mod media;
pub mod retry;
pub mod storage;
