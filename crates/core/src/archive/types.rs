//! Archive run types.

use std::fmt;

use bazaar_shared::{ListingId, OwnerId};
use serde::{Deserialize, Serialize};

/// Category of a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    /// An image of a listing.
    ListingImage,
    /// Proof-of-ownership document attached to a listing.
    OwnershipDocument,
    /// Identity document attached to a listing.
    IdentityDocument,
    /// The owner's profile photo.
    ProfilePhoto,
}

impl EvidenceKind {
    /// Snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListingImage => "listing_image",
            Self::OwnershipDocument => "ownership_document",
            Self::IdentityDocument => "identity_document",
            Self::ProfilePhoto => "profile_photo",
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one archive item.
///
/// `Pending` moves to `Copied`, `Missing` or `Error` in the copy phase.
/// Only `Copied` and `Missing` move on to `Deleted`, and only after the gate
/// passed. Nothing leaves `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Discovered, not yet copied.
    Pending,
    /// Copied into the archive bucket.
    Copied,
    /// Source was already absent.
    Missing,
    /// Copy failed, or the evidence address could not be resolved.
    Error,
    /// Source deleted after the gate passed.
    Deleted,
}

impl ItemStatus {
    /// Whether the item is safe to delete at the source.
    #[must_use]
    pub const fn is_evidence_safe(self) -> bool {
        matches!(self, Self::Copied | Self::Missing | Self::Deleted)
    }
}

/// One source object and its archive destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveItem {
    /// Evidence category.
    pub kind: EvidenceKind,
    /// Bucket of the original.
    pub source_bucket: String,
    /// Key of the original.
    pub source_key: String,
    /// Archive bucket.
    pub archive_bucket: String,
    /// Destination key inside the archive bucket.
    pub archive_key: String,
    /// Current status.
    pub status: ItemStatus,
    /// Last error, when `status` is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ArchiveItem {
    pub(crate) fn pending(
        kind: EvidenceKind,
        source_bucket: impl Into<String>,
        source_key: impl Into<String>,
        archive_bucket: impl Into<String>,
        archive_key: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source_bucket: source_bucket.into(),
            source_key: source_key.into(),
            archive_bucket: archive_bucket.into(),
            archive_key: archive_key.into(),
            status: ItemStatus::Pending,
            error: None,
        }
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.status = ItemStatus::Error;
        self.error = Some(message.into());
    }
}

/// Outcome of an archive-then-delete run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveResult {
    /// True iff no item is in `Error` and no delete failed.
    pub success: bool,
    /// Every discovered item with its final status.
    pub items: Vec<ArchiveItem>,
    /// Copy-phase and delete-phase error messages.
    pub errors: Vec<String>,
    /// Non-fatal problems, such as a candidate prefix that could not be listed.
    pub warnings: Vec<String>,
    /// Archive bucket written to.
    pub archive_bucket: String,
    /// Owner namespace inside the archive bucket, `user_{owner}`.
    pub archive_folder: String,
}

impl ArchiveResult {
    /// Number of items in `status`.
    #[must_use]
    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }

    /// Items of one evidence category.
    pub fn items_of(&self, kind: EvidenceKind) -> impl Iterator<Item = &ArchiveItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }
}

/// Stored addresses of a listing's evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEvidence {
    /// Listing identifier.
    pub listing_id: ListingId,
    /// URL of the ownership document, if any.
    pub ownership_document_url: Option<String>,
    /// URL of the identity document, if any.
    pub identity_document_url: Option<String>,
}

impl ListingEvidence {
    /// Evidence for a listing without documents.
    #[must_use]
    pub const fn images_only(listing_id: ListingId) -> Self {
        Self {
            listing_id,
            ownership_document_url: None,
            identity_document_url: None,
        }
    }
}

/// What a deletion run covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum DeletionScope {
    /// A single listing.
    Listing {
        /// Owner of the listing.
        owner: OwnerId,
        /// The listing's evidence.
        listing: ListingEvidence,
    },
    /// A whole account; every listing and the profile photo share one gate.
    Account {
        /// The owner.
        owner: OwnerId,
        /// URL of the profile photo, if any.
        profile_photo_url: Option<String>,
        /// Evidence of every listing the owner has.
        listings: Vec<ListingEvidence>,
    },
}

impl DeletionScope {
    /// Owner whose archive namespace receives the evidence.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        match self {
            Self::Listing { owner, .. } | Self::Account { owner, .. } => *owner,
        }
    }

    /// Every listing covered by the scope.
    #[must_use]
    pub fn listing_ids(&self) -> Vec<ListingId> {
        match self {
            Self::Listing { listing, .. } => vec![listing.listing_id],
            Self::Account { listings, .. } => listings.iter().map(|l| l.listing_id).collect(),
        }
    }
}
