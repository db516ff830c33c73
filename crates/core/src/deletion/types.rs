//! Deletion service types.

use std::fmt;

use bazaar_shared::{AppError, AppResult, ListingId, OwnerId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::archive::{ArchiveResult, ItemStatus, ListingEvidence};

/// Message shown to users when evidence could not be archived.
pub const TEMPORARY_FAILURE_MESSAGE: &str =
    "Temporary issue while deleting. Please try again shortly.";

/// A listing and the owner it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Owner of the listing.
    pub owner: OwnerId,
    /// Stored evidence addresses.
    pub evidence: ListingEvidence,
}

/// Everything stored for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEvidence {
    /// The owner.
    pub owner: OwnerId,
    /// Profile photo URL, if any.
    pub profile_photo_url: Option<String>,
    /// Every listing of the owner.
    pub listings: Vec<ListingEvidence>,
}

/// Who asked for a deletion, as far as the HTTP layer knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionContext {
    /// Client IP address.
    pub actor_ip: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
}

/// Kind of audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionEventKind {
    /// A listing was archived and deleted.
    ListingDeleted,
    /// A listing deletion was refused by the archive gate or failed to delete.
    ListingDeletionFailed,
    /// An account was archived and deleted.
    AccountDeleted,
    /// An account deletion was refused by the archive gate or failed to delete.
    AccountDeletionFailed,
}

impl DeletionEventKind {
    /// Snake-case name stored in the audit log.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListingDeleted => "listing_deleted",
            Self::ListingDeletionFailed => "listing_deletion_failed",
            Self::AccountDeleted => "account_deleted",
            Self::AccountDeletionFailed => "account_deletion_failed",
        }
    }
}

impl fmt::Display for DeletionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionEvent {
    /// What happened.
    pub kind: DeletionEventKind,
    /// Owner whose data was deleted.
    pub owner: OwnerId,
    /// Listing, for listing deletions.
    pub listing: Option<ListingId>,
    /// Request context.
    pub context: DeletionContext,
    /// Summary of the archive run.
    pub payload: Value,
}

impl DeletionEvent {
    /// Build an event summarising an archive run.
    #[must_use]
    pub fn from_result(
        kind: DeletionEventKind,
        owner: OwnerId,
        listing: Option<ListingId>,
        context: DeletionContext,
        result: &ArchiveResult,
    ) -> Self {
        let payload = json!({
            "success": result.success,
            "items": result.items.len(),
            "copied": result.count(ItemStatus::Copied),
            "missing": result.count(ItemStatus::Missing),
            "deleted": result.count(ItemStatus::Deleted),
            "errors": result.errors,
            "warnings": result.warnings,
            "archive_bucket": result.archive_bucket,
            "archive_folder": result.archive_folder,
        });
        Self {
            kind,
            owner,
            listing,
            context,
            payload,
        }
    }
}

/// Result of a deletion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    /// Owner whose data was targeted.
    pub owner: OwnerId,
    /// Listings covered by the run.
    pub listings: Vec<ListingId>,
    /// The archive run report.
    pub result: ArchiveResult,
    /// Registry rows removed after a successful run.
    pub folders_removed: u64,
}

impl DeletionOutcome {
    /// Whether the deletion completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.success
    }

    /// Map a failed run to a retryable error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::TemporarilyUnavailable` when the run did not succeed.
    pub fn into_app_result(self) -> AppResult<Self> {
        if self.result.success {
            Ok(self)
        } else {
            Err(AppError::TemporarilyUnavailable(
                TEMPORARY_FAILURE_MESSAGE.to_string(),
            ))
        }
    }
}
