//! Listing and account deletion behind the archive gate.
//!
//! A deletion loads the stored evidence addresses, runs the archive
//! orchestrator, and only removes folder records and relational rows once the
//! run succeeded. Every attempt is written to the audit log; a failing audit
//! write is logged and never blocks the deletion.

mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
mod service;
mod types;

pub use error::DeletionError;
pub use service::{DeletionAudit, DeletionService, EvidenceDirectory};
pub use types::{
    AccountEvidence, DeletionContext, DeletionEvent, DeletionEventKind, DeletionOutcome,
    ListingRecord, TEMPORARY_FAILURE_MESSAGE,
};

#[cfg(test)]
mod tests;
