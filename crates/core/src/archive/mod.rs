//! Archive-then-delete of owner evidence.
//!
//! A run has four steps:
//!
//! 1. **Discovery**: listing images are enumerated by prefix; documents and
//!    the profile photo are resolved from their stored URLs.
//! 2. **Copy**: every item is read and written to
//!    `{evidence bucket}/user_{owner}/...`. Failures are recorded per item and
//!    the remaining items are still processed.
//! 3. **Gate**: if any item is in `Error`, the run stops and deletes nothing.
//! 4. **Delete**: every `Copied` or `Missing` source is deleted. Archive copies
//!    are kept whatever happens.

mod error;
mod keys;
mod orchestrator;
mod plan;
mod types;

pub use error::ArchiveError;
pub use keys::{
    archive_folder, content_type_for_key, identity_document_key, listing_image_key,
    ownership_document_key, profile_photo_key, relative_listing_path,
};
pub use orchestrator::ArchiveOrchestrator;
pub use plan::EvidencePlan;
pub use types::{
    ArchiveItem, ArchiveResult, DeletionScope, EvidenceKind, ItemStatus, ListingEvidence,
};
