//! Depth-bounded prefix walker.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use bazaar_shared::ListingId;
use serde::Serialize;
use tracing::{debug, warn};

use super::prefixes::{candidate_prefixes, normalize_prefix};
use super::registry::FolderRegistry;
use crate::retry::RetryExecutor;
use crate::storage::ObjectStore;

/// Folders nested deeper than this below a candidate are not descended into.
pub const MAX_DEPTH: usize = 12;

/// A prefix whose listing failed after retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingFailure {
    /// Bucket being listed.
    pub bucket: String,
    /// Prefix whose listing failed.
    pub prefix: String,
    /// Last error message.
    pub message: String,
}

/// Result of an enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    /// Leaf object keys, deduplicated and sorted.
    pub keys: BTreeSet<String>,
    /// Prefixes that could not be listed.
    pub failures: Vec<ListingFailure>,
}

impl Enumeration {
    /// Whether every listing call succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Walks prefixes through an [`ObjectStore`], descending into synthetic folders.
pub struct PrefixEnumerator<S> {
    store: Arc<S>,
    retry: RetryExecutor,
}

impl<S> Clone for PrefixEnumerator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            retry: self.retry,
        }
    }
}

impl<S: ObjectStore> PrefixEnumerator<S> {
    /// Create an enumerator.
    #[must_use]
    pub fn new(store: Arc<S>, retry: RetryExecutor) -> Self {
        Self { store, retry }
    }

    /// Collect every leaf key under the candidate prefixes.
    ///
    /// Blank candidates are ignored rather than treated as the bucket root.
    /// A `(bucket, prefix)` pair is listed again only when it is reached at a
    /// shallower depth than before, so cyclic listings terminate and a folder
    /// first met deep below one candidate still gets the full depth budget of
    /// a later candidate rooted closer to it. A failed listing is logged and
    /// recorded in [`Enumeration::failures`]; the rest of the walk continues.
    pub async fn enumerate(&self, bucket: &str, candidates: &[String]) -> Enumeration {
        let mut visited: HashMap<(String, String), usize> = HashMap::new();
        let mut result = Enumeration::default();

        for candidate in candidates {
            let root = normalize_prefix(candidate);
            if root.is_empty() {
                continue;
            }

            let mut stack = vec![(root, 0usize)];
            while let Some((prefix, depth)) = stack.pop() {
                if depth > MAX_DEPTH {
                    debug!(bucket, prefix = %prefix, "depth bound reached, not descending");
                    continue;
                }
                let seen = visited
                    .entry((bucket.to_string(), prefix.clone()))
                    .or_insert(usize::MAX);
                if *seen <= depth {
                    continue;
                }
                *seen = depth;

                let label = format!("list:{bucket}:{prefix}");
                let listed = self
                    .retry
                    .run(&label, || self.store.list_by_prefix(bucket, &prefix))
                    .await;

                let entries = match listed {
                    Ok(entries) => entries,
                    Err(err) => {
                        warn!(bucket, prefix = %prefix, error = %err, "prefix listing failed");
                        if result.failures.iter().any(|f| f.prefix == prefix) {
                            continue;
                        }
                        result.failures.push(ListingFailure {
                            bucket: bucket.to_string(),
                            prefix: prefix.clone(),
                            message: err.into_last_error().to_string(),
                        });
                        continue;
                    }
                };

                for entry in entries {
                    let name = entry.name.trim_matches('/');
                    if name.is_empty() {
                        continue;
                    }
                    if entry.is_folder {
                        stack.push((format!("{prefix}{name}/"), depth + 1));
                    } else {
                        result.keys.insert(format!("{prefix}{name}"));
                    }
                }
            }
        }

        debug!(
            bucket,
            keys = result.keys.len(),
            failures = result.failures.len(),
            "enumeration finished"
        );
        result
    }

    /// Enumerate every image key of a listing.
    ///
    /// A registry failure is logged and treated as "no hints"; the fixed
    /// layouts are still probed.
    pub async fn enumerate_listing<R: FolderRegistry>(
        &self,
        bucket: &str,
        listing: ListingId,
        registry: &R,
    ) -> Enumeration {
        let hints = match registry.prefixes_for(listing).await {
            Ok(hints) => hints,
            Err(err) => {
                warn!(listing = %listing, error = %err, "folder registry lookup failed");
                Vec::new()
            }
        };

        let candidates = candidate_prefixes(listing, &hints);
        self.enumerate(bucket, &candidates).await
    }
}
