//! In-memory object store with fault injection, for tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use super::client::ObjectStore;
use super::error::StorageError;
use super::types::ListEntry;
use super::urls::StorageUrls;

/// Operation kinds recorded by [`InMemoryObjectStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreOp {
    /// `put`
    Put,
    /// `get`
    Get,
    /// `delete`
    Delete,
    /// `list_by_prefix`; the recorded key is the prefix.
    List,
}

/// One call made against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpRecord {
    /// Operation kind.
    pub op: StoreOp,
    /// Bucket.
    pub bucket: String,
    /// Key, or prefix for listings.
    pub key: String,
}

type Address = (String, String);

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<Address, (Bytes, String)>,
    // None fails forever, Some(n) fails the next n calls.
    faults: HashMap<(StoreOp, String, String), Option<u32>>,
    scripted: HashMap<Address, Vec<ListEntry>>,
    log: Vec<OpRecord>,
}

/// Object store backed by a `BTreeMap`, with synthetic folders derived
/// from `/` in keys the way the real backend presents them.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    state: Mutex<State>,
    urls: StorageUrls,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            urls: StorageUrls::new("https://store.test"),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed an object without recording an operation.
    pub fn insert(&self, bucket: &str, key: &str, bytes: impl Into<Bytes>) {
        self.state().objects.insert(
            (bucket.to_string(), key.to_string()),
            (bytes.into(), "application/octet-stream".to_string()),
        );
    }

    /// Whether an object exists.
    #[must_use]
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.state()
            .objects
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Bytes of an object, if present.
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.state()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(bytes, _)| bytes.clone())
    }

    /// Content type an object was stored with.
    #[must_use]
    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.state()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(_, content_type)| content_type.clone())
    }

    /// All keys in a bucket, sorted.
    #[must_use]
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.state()
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Make every call of `op` on `(bucket, key)` fail.
    pub fn fail(&self, op: StoreOp, bucket: &str, key: &str) {
        self.state()
            .faults
            .insert((op, bucket.to_string(), key.to_string()), None);
    }

    /// Make the next `times` calls of `op` on `(bucket, key)` fail.
    pub fn fail_times(&self, op: StoreOp, bucket: &str, key: &str, times: u32) {
        self.state()
            .faults
            .insert((op, bucket.to_string(), key.to_string()), Some(times));
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        self.state().faults.clear();
    }

    /// Answer listings of exactly `(bucket, prefix)` with fixed entries.
    pub fn script_listing(&self, bucket: &str, prefix: &str, entries: Vec<ListEntry>) {
        self.state()
            .scripted
            .insert((bucket.to_string(), prefix.to_string()), entries);
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<OpRecord> {
        self.state().log.clone()
    }

    /// Number of calls of `op` made so far.
    #[must_use]
    pub fn count(&self, op: StoreOp) -> usize {
        self.state().log.iter().filter(|r| r.op == op).count()
    }

    fn begin(
        &self,
        op: StoreOp,
        bucket: &str,
        key: &str,
    ) -> Result<MutexGuard<'_, State>, StorageError> {
        let mut state = self.state();
        state.log.push(OpRecord {
            op,
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        let fault_key = (op, bucket.to_string(), key.to_string());
        match state.faults.get_mut(&fault_key) {
            Some(None) => return Err(StorageError::status(503, "injected failure")),
            Some(Some(remaining)) if *remaining > 0 => {
                *remaining -= 1;
                return Err(StorageError::status(503, "injected failure"));
            }
            _ => {}
        }
        Ok(state)
    }
}

impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let mut state = self.begin(StoreOp::Put, bucket, key)?;
        state.objects.insert(
            (bucket.to_string(), key.to_string()),
            (bytes, content_type.to_string()),
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>, StorageError> {
        let state = self.begin(StoreOp::Get, bucket, key)?;
        Ok(state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(bytes, _)| bytes.clone()))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let mut state = self.begin(StoreOp::Delete, bucket, key)?;
        state.objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn list_by_prefix(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ListEntry>, StorageError> {
        let state = self.begin(StoreOp::List, bucket, prefix)?;
        if let Some(entries) = state.scripted.get(&(bucket.to_string(), prefix.to_string())) {
            return Ok(entries.clone());
        }

        let dir = prefix.trim_end_matches('/');
        let mut folders = BTreeSet::new();
        let mut files = BTreeSet::new();
        for (b, key) in state.objects.keys() {
            if b != bucket {
                continue;
            }
            let rest = if dir.is_empty() {
                key.as_str()
            } else {
                match key.strip_prefix(dir).and_then(|r| r.strip_prefix('/')) {
                    Some(rest) => rest,
                    None => continue,
                }
            };
            match rest.split_once('/') {
                Some((folder, _)) => {
                    folders.insert(folder.to_string());
                }
                None if !rest.is_empty() => {
                    files.insert(rest.to_string());
                }
                None => {}
            }
        }

        Ok(folders
            .into_iter()
            .map(ListEntry::folder)
            .chain(files.into_iter().map(ListEntry::file))
            .collect())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.urls.public_url(bucket, key)
    }
}
