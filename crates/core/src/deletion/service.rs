//! Listing and account deletion.

use std::future::Future;
use std::sync::Arc;

use bazaar_shared::{ListingId, OwnerId};
use tracing::{info, warn};

use super::error::DeletionError;
use super::types::{
    AccountEvidence, DeletionContext, DeletionEvent, DeletionEventKind, DeletionOutcome,
    ListingRecord,
};
use crate::archive::{ArchiveOrchestrator, DeletionScope};
use crate::enumerate::FolderRegistry;
use crate::storage::ObjectStore;

/// Source of stored evidence addresses, and owner of the relational rows
/// that go away once the evidence is archived.
///
/// This trait is implemented by the db crate.
pub trait EvidenceDirectory: Send + Sync {
    /// Load a listing with its owner.
    fn listing_evidence(
        &self,
        listing: ListingId,
    ) -> impl Future<Output = Result<Option<ListingRecord>, DeletionError>> + Send;

    /// Load the profile photo and every listing of an owner.
    fn account_evidence(
        &self,
        owner: OwnerId,
    ) -> impl Future<Output = Result<Option<AccountEvidence>, DeletionError>> + Send;

    /// Remove a listing row.
    fn remove_listing(
        &self,
        listing: ListingId,
    ) -> impl Future<Output = Result<(), DeletionError>> + Send;

    /// Remove an owner and all of their listing rows.
    fn remove_account(&self, owner: OwnerId)
    -> impl Future<Output = Result<(), DeletionError>> + Send;
}

/// Append-only log of deletion attempts.
pub trait DeletionAudit: Send + Sync {
    /// Record an event.
    fn record(
        &self,
        event: &DeletionEvent,
    ) -> impl Future<Output = Result<(), DeletionError>> + Send;
}

/// Runs the archive gate in front of listing and account deletion.
pub struct DeletionService<S, R, D, A> {
    orchestrator: ArchiveOrchestrator<S, R>,
    registry: Arc<R>,
    directory: Arc<D>,
    audit: Arc<A>,
}

impl<S, R, D, A> DeletionService<S, R, D, A>
where
    S: ObjectStore,
    R: FolderRegistry,
    D: EvidenceDirectory,
    A: DeletionAudit,
{
    /// Create a deletion service.
    #[must_use]
    pub fn new(
        orchestrator: ArchiveOrchestrator<S, R>,
        registry: Arc<R>,
        directory: Arc<D>,
        audit: Arc<A>,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            directory,
            audit,
        }
    }

    /// Archive and delete one listing of `owner`.
    ///
    /// Rows are only removed when the archive run succeeded. A refused run
    /// is returned as an unsuccessful [`DeletionOutcome`].
    ///
    /// # Errors
    ///
    /// Returns `DeletionError::NotFound` when the listing does not exist or
    /// belongs to another owner, and `DeletionError::Directory` when the
    /// directory fails.
    pub async fn delete_listing(
        &self,
        owner: OwnerId,
        listing: ListingId,
        context: DeletionContext,
    ) -> Result<DeletionOutcome, DeletionError> {
        let record = self
            .directory
            .listing_evidence(listing)
            .await?
            .filter(|record| record.owner == owner)
            .ok_or_else(|| DeletionError::not_found(format!("listing {listing}")))?;

        let scope = DeletionScope::Listing {
            owner,
            listing: record.evidence,
        };
        let result = self.orchestrator.run(&scope).await;

        let mut folders_removed = 0;
        let mut removal = Ok(());
        if result.success {
            folders_removed = self.forget_folders(&[listing]).await;
            removal = self.directory.remove_listing(listing).await;
            info!(owner = %owner, listing = %listing, "listing deleted");
        } else {
            warn!(
                owner = %owner,
                listing = %listing,
                errors = result.errors.len(),
                "listing deletion refused, evidence not fully archived"
            );
        }

        let kind = if result.success {
            DeletionEventKind::ListingDeleted
        } else {
            DeletionEventKind::ListingDeletionFailed
        };
        self.audit(DeletionEvent::from_result(kind, owner, Some(listing), context, &result))
            .await;
        removal?;

        Ok(DeletionOutcome {
            owner,
            listings: vec![listing],
            result,
            folders_removed,
        })
    }

    /// Archive and delete a whole account in a single gated run.
    ///
    /// # Errors
    ///
    /// Returns `DeletionError::NotFound` when the owner does not exist and
    /// `DeletionError::Directory` when the directory fails.
    pub async fn delete_account(
        &self,
        owner: OwnerId,
        context: DeletionContext,
    ) -> Result<DeletionOutcome, DeletionError> {
        let evidence = self
            .directory
            .account_evidence(owner)
            .await?
            .ok_or_else(|| DeletionError::not_found(format!("owner {owner}")))?;

        let scope = DeletionScope::Account {
            owner,
            profile_photo_url: evidence.profile_photo_url,
            listings: evidence.listings,
        };
        let listings = scope.listing_ids();
        let result = self.orchestrator.run(&scope).await;

        let mut folders_removed = 0;
        let mut removal = Ok(());
        if result.success {
            folders_removed = self.forget_folders(&listings).await;
            removal = self.directory.remove_account(owner).await;
            info!(owner = %owner, listings = listings.len(), "account deleted");
        } else {
            warn!(
                owner = %owner,
                errors = result.errors.len(),
                "account deletion refused, evidence not fully archived"
            );
        }

        let kind = if result.success {
            DeletionEventKind::AccountDeleted
        } else {
            DeletionEventKind::AccountDeletionFailed
        };
        self.audit(DeletionEvent::from_result(kind, owner, None, context, &result))
            .await;
        removal?;

        Ok(DeletionOutcome {
            owner,
            listings,
            result,
            folders_removed,
        })
    }

    async fn forget_folders(&self, listings: &[ListingId]) -> u64 {
        let mut removed = 0;
        for &listing in listings {
            match self.registry.remove_for(listing).await {
                Ok(count) => removed += count,
                Err(err) => {
                    warn!(listing = %listing, error = %err, "could not remove folder records");
                }
            }
        }
        removed
    }

    async fn audit(&self, event: DeletionEvent) {
        if let Err(err) = self.audit.record(&event).await {
            warn!(
                kind = %event.kind,
                owner = %event.owner,
                error = %err,
                "failed to write deletion audit record"
            );
        }
    }
}
