//! Two-phase archive-then-delete.

use std::sync::Arc;

use bazaar_shared::{ListingId, OwnerId};
use tracing::{debug, info, warn};

use super::error::ArchiveError;
use super::keys::{
    archive_folder, content_type_for_key, identity_document_key, listing_image_key,
    listing_image_key_verbatim, ownership_document_key, profile_photo_key,
};
use super::plan::EvidencePlan;
use super::types::{
    ArchiveItem, ArchiveResult, DeletionScope, EvidenceKind, ItemStatus, ListingEvidence,
};
use crate::enumerate::{FolderRegistry, PrefixEnumerator};
use crate::retry::RetryExecutor;
use crate::storage::{BucketLayout, ObjectRef, ObjectStore};

/// Copies all evidence of a scope into the archive bucket and deletes the
/// originals only if every copy succeeded.
pub struct ArchiveOrchestrator<S, R> {
    store: Arc<S>,
    registry: Arc<R>,
    enumerator: PrefixEnumerator<S>,
    retry: RetryExecutor,
    buckets: BucketLayout,
}

impl<S: ObjectStore, R: FolderRegistry> ArchiveOrchestrator<S, R> {
    /// Create an orchestrator.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        registry: Arc<R>,
        retry: RetryExecutor,
        buckets: BucketLayout,
    ) -> Self {
        let enumerator = PrefixEnumerator::new(Arc::clone(&store), retry);
        Self {
            store,
            registry,
            enumerator,
            retry,
            buckets,
        }
    }

    /// Archive and delete everything in `scope`.
    ///
    /// Never fails: per-item problems are recorded on the items and in
    /// [`ArchiveResult::errors`]. When any item ends the copy phase in
    /// `Error`, no source object is deleted.
    pub async fn run(&self, scope: &DeletionScope) -> ArchiveResult {
        let owner = scope.owner();
        let plan = self.discover(scope).await;
        let (mut items, warnings) = plan.into_parts();
        let mut errors = Vec::new();

        info!(owner = %owner, items = items.len(), "archive run started");

        for item in items.iter_mut().filter(|i| i.status == ItemStatus::Pending) {
            match self.copy_item(item).await {
                Ok(status) => item.status = status,
                Err(err) => {
                    warn!(owner = %owner, error = %err, "evidence copy failed");
                    item.fail(err.to_string());
                }
            }
        }

        errors.extend(
            items
                .iter()
                .filter(|i| i.status == ItemStatus::Error)
                .filter_map(|i| i.error.clone()),
        );

        if !errors.is_empty() {
            warn!(
                owner = %owner,
                failed = errors.len(),
                "archive gate closed, no source objects deleted"
            );
            return self.result(owner, false, items, errors, warnings);
        }

        for item in items
            .iter_mut()
            .filter(|i| i.status.is_evidence_safe() && i.status != ItemStatus::Deleted)
        {
            match self.delete_source(item).await {
                Ok(()) => item.status = ItemStatus::Deleted,
                Err(err) => {
                    warn!(owner = %owner, error = %err, "source delete failed after archive");
                    let message = err.to_string();
                    item.error = Some(message.clone());
                    errors.push(message);
                }
            }
        }

        let success = errors.is_empty();
        info!(
            owner = %owner,
            success,
            deleted = items.iter().filter(|i| i.status == ItemStatus::Deleted).count(),
            "archive run finished"
        );
        self.result(owner, success, items, errors, warnings)
    }

    /// Discover every piece of evidence in `scope` without touching it.
    pub async fn discover(&self, scope: &DeletionScope) -> EvidencePlan {
        let mut plan = EvidencePlan::default();
        match scope {
            DeletionScope::Listing { owner, listing } => {
                self.discover_listing(&mut plan, *owner, listing).await;
            }
            DeletionScope::Account {
                owner,
                profile_photo_url,
                listings,
            } => {
                if let Some(url) = non_blank(profile_photo_url.as_deref()) {
                    self.discover_single(&mut plan, EvidenceKind::ProfilePhoto, url, |key| {
                        profile_photo_key(*owner, key)
                    });
                }
                for listing in listings {
                    self.discover_listing(&mut plan, *owner, listing).await;
                }
            }
        }
        debug!(
            owner = %scope.owner(),
            items = plan.items().len(),
            warnings = plan.warnings().len(),
            "evidence discovered"
        );
        plan
    }

    async fn discover_listing(
        &self,
        plan: &mut EvidencePlan,
        owner: OwnerId,
        listing: &ListingEvidence,
    ) {
        let listing_id = listing.listing_id;
        let bucket = &self.buckets.listing_images;

        let enumeration = self
            .enumerator
            .enumerate_listing(bucket, listing_id, self.registry.as_ref())
            .await;
        for failure in &enumeration.failures {
            plan.warn(format!(
                "could not list {}/{} for listing {listing_id}: {}",
                failure.bucket, failure.prefix, failure.message
            ));
        }
        for key in &enumeration.keys {
            let item = ArchiveItem::pending(
                EvidenceKind::ListingImage,
                bucket,
                key,
                &self.buckets.evidence,
                listing_image_key(owner, listing_id, key),
            );
            plan.add(item, || listing_image_key_verbatim(owner, listing_id, key));
        }

        self.discover_document(
            plan,
            owner,
            listing_id,
            EvidenceKind::OwnershipDocument,
            listing.ownership_document_url.as_deref(),
        );
        self.discover_document(
            plan,
            owner,
            listing_id,
            EvidenceKind::IdentityDocument,
            listing.identity_document_url.as_deref(),
        );
    }

    fn discover_document(
        &self,
        plan: &mut EvidencePlan,
        owner: OwnerId,
        listing: ListingId,
        kind: EvidenceKind,
        url: Option<&str>,
    ) {
        let Some(url) = non_blank(url) else {
            return;
        };
        let key_for = |key: &str| match kind {
            EvidenceKind::IdentityDocument => identity_document_key(owner, listing, key),
            _ => ownership_document_key(owner, listing, key),
        };
        self.discover_single(plan, kind, url, key_for);
    }

    fn discover_single(
        &self,
        plan: &mut EvidencePlan,
        kind: EvidenceKind,
        url: &str,
        archive_key_for: impl Fn(&str) -> String,
    ) {
        match ObjectRef::parse_url(url) {
            Ok(object) => {
                let archive_key = archive_key_for(&object.key);
                let item = ArchiveItem::pending(
                    kind,
                    &object.bucket,
                    &object.key,
                    &self.buckets.evidence,
                    archive_key.clone(),
                );
                plan.add(item, || archive_key);
            }
            Err(source) => {
                let err = ArchiveError::UnresolvableUrl {
                    kind,
                    url: url.to_string(),
                    source,
                };
                warn!(kind = %kind, error = %err, "evidence url not resolvable");
                plan.add_unresolved(
                    kind,
                    self.bucket_for(kind),
                    url,
                    &self.buckets.evidence,
                    err.to_string(),
                );
            }
        }
    }

    fn bucket_for(&self, kind: EvidenceKind) -> &str {
        match kind {
            EvidenceKind::ListingImage => &self.buckets.listing_images,
            EvidenceKind::OwnershipDocument => &self.buckets.ownership_documents,
            EvidenceKind::IdentityDocument => &self.buckets.identity_documents,
            EvidenceKind::ProfilePhoto => &self.buckets.profile_photos,
        }
    }

    async fn copy_item(&self, item: &ArchiveItem) -> Result<ItemStatus, ArchiveError> {
        let (bucket, key) = (item.source_bucket.as_str(), item.source_key.as_str());
        let label = format!("get:{bucket}:{key}");
        let bytes = self
            .retry
            .run(&label, || self.store.get(bucket, key))
            .await
            .map_err(|source| ArchiveError::Read {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            })?;

        let Some(bytes) = bytes else {
            debug!(bucket, key, "evidence already absent");
            return Ok(ItemStatus::Missing);
        };

        let (archive_bucket, archive_key) =
            (item.archive_bucket.as_str(), item.archive_key.as_str());
        let content_type = content_type_for_key(key);
        let label = format!("put:{archive_bucket}:{archive_key}");
        self.retry
            .run(&label, || {
                self.store
                    .put(archive_bucket, archive_key, bytes.clone(), content_type)
            })
            .await
            .map_err(|source| ArchiveError::Write {
                bucket: archive_bucket.to_string(),
                key: archive_key.to_string(),
                source,
            })?;

        debug!(bucket, key, archive_key, "evidence archived");
        Ok(ItemStatus::Copied)
    }

    async fn delete_source(&self, item: &ArchiveItem) -> Result<(), ArchiveError> {
        let (bucket, key) = (item.source_bucket.as_str(), item.source_key.as_str());
        let label = format!("delete:{bucket}:{key}");
        self.retry
            .run(&label, || self.store.delete(bucket, key))
            .await
            .map_err(|source| ArchiveError::Delete {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            })
    }

    fn result(
        &self,
        owner: OwnerId,
        success: bool,
        items: Vec<ArchiveItem>,
        errors: Vec<String>,
        warnings: Vec<String>,
    ) -> ArchiveResult {
        ArchiveResult {
            success,
            items,
            errors,
            warnings,
            archive_bucket: self.buckets.evidence.clone(),
            archive_folder: archive_folder(owner),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
