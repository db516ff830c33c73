//! Repository abstractions for data access.
//!
//! Each repository implements one of the core storage-lifecycle traits on top
//! of `SeaORM`, hiding the database from the media and deletion services.

pub mod deletion_audit;
pub mod evidence;
pub mod folder_registry;

pub use deletion_audit::DeletionAuditRepository;
pub use evidence::EvidenceRepository;
pub use folder_registry::FolderRegistryRepository;
