//! In-memory evidence directory and audit log, for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bazaar_shared::{ListingId, OwnerId};

use super::error::DeletionError;
use super::service::{DeletionAudit, EvidenceDirectory};
use super::types::{AccountEvidence, DeletionEvent, ListingRecord};
use crate::archive::ListingEvidence;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct Directory {
    profile_photos: BTreeMap<OwnerId, Option<String>>,
    listings: BTreeMap<ListingId, ListingRecord>,
}

/// Evidence directory backed by maps.
#[derive(Debug, Default)]
pub struct InMemoryEvidenceDirectory {
    inner: Mutex<Directory>,
}

impl InMemoryEvidenceDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an owner.
    pub fn add_owner(&self, owner: OwnerId, profile_photo_url: Option<String>) {
        lock(&self.inner).profile_photos.insert(owner, profile_photo_url);
    }

    /// Add a listing for an existing owner.
    pub fn add_listing(&self, owner: OwnerId, evidence: ListingEvidence) {
        lock(&self.inner)
            .listings
            .insert(evidence.listing_id, ListingRecord { owner, evidence });
    }

    /// Whether an owner row exists.
    #[must_use]
    pub fn has_owner(&self, owner: OwnerId) -> bool {
        lock(&self.inner).profile_photos.contains_key(&owner)
    }

    /// Whether a listing row exists.
    #[must_use]
    pub fn has_listing(&self, listing: ListingId) -> bool {
        lock(&self.inner).listings.contains_key(&listing)
    }
}

impl EvidenceDirectory for InMemoryEvidenceDirectory {
    async fn listing_evidence(
        &self,
        listing: ListingId,
    ) -> Result<Option<ListingRecord>, DeletionError> {
        Ok(lock(&self.inner).listings.get(&listing).cloned())
    }

    async fn account_evidence(
        &self,
        owner: OwnerId,
    ) -> Result<Option<AccountEvidence>, DeletionError> {
        let inner = lock(&self.inner);
        let Some(profile_photo_url) = inner.profile_photos.get(&owner) else {
            return Ok(None);
        };
        let listings = inner
            .listings
            .values()
            .filter(|record| record.owner == owner)
            .map(|record| record.evidence.clone())
            .collect();
        Ok(Some(AccountEvidence {
            owner,
            profile_photo_url: profile_photo_url.clone(),
            listings,
        }))
    }

    async fn remove_listing(&self, listing: ListingId) -> Result<(), DeletionError> {
        lock(&self.inner).listings.remove(&listing);
        Ok(())
    }

    async fn remove_account(&self, owner: OwnerId) -> Result<(), DeletionError> {
        let mut inner = lock(&self.inner);
        inner.listings.retain(|_, record| record.owner != owner);
        inner.profile_photos.remove(&owner);
        Ok(())
    }
}

/// Audit log collecting events in a `Vec`.
#[derive(Debug, Default)]
pub struct InMemoryDeletionAudit {
    events: Mutex<Vec<DeletionEvent>>,
    failing: AtomicBool,
}

impl InMemoryDeletionAudit {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<DeletionEvent> {
        lock(&self.events).clone()
    }
}

impl DeletionAudit for InMemoryDeletionAudit {
    async fn record(&self, event: &DeletionEvent) -> Result<(), DeletionError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeletionError::audit("audit log unavailable"));
        }
        lock(&self.events).push(event.clone());
        Ok(())
    }
}
