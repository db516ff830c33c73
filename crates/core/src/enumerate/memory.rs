//! In-memory folder registry, for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bazaar_shared::ListingId;

use super::registry::{EnumerationError, FolderRegistry};

/// Folder registry backed by a `BTreeMap`.
#[derive(Debug, Default)]
pub struct InMemoryFolderRegistry {
    prefixes: Mutex<BTreeMap<ListingId, Vec<String>>>,
    failing: AtomicBool,
}

impl InMemoryFolderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, BTreeMap<ListingId, Vec<String>>> {
        self.prefixes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Prefixes currently recorded for a listing.
    #[must_use]
    pub fn recorded(&self, listing: ListingId) -> Vec<String> {
        self.map().get(&listing).cloned().unwrap_or_default()
    }

    fn check(&self) -> Result<(), EnumerationError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(EnumerationError::registry("registry unavailable"))
        } else {
            Ok(())
        }
    }
}

impl FolderRegistry for InMemoryFolderRegistry {
    async fn prefixes_for(&self, listing: ListingId) -> Result<Vec<String>, EnumerationError> {
        self.check()?;
        Ok(self.recorded(listing))
    }

    async fn record(&self, listing: ListingId, prefix: &str) -> Result<(), EnumerationError> {
        self.check()?;
        let mut map = self.map();
        let entry = map.entry(listing).or_default();
        if !entry.iter().any(|p| p == prefix) {
            entry.push(prefix.to_string());
        }
        Ok(())
    }

    async fn remove_for(&self, listing: ListingId) -> Result<u64, EnumerationError> {
        self.check()?;
        let removed = self.map().remove(&listing).map_or(0, |v| v.len());
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
