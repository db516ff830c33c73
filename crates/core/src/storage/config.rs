//! Storage configuration types.

use std::time::Duration;

use bazaar_shared::StorageSettings;

use crate::retry::RetryPolicy;

/// Connection settings for the object store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Service credential sent as both `apikey` and bearer token.
    pub service_key: String,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl StoreConfig {
    /// Default request timeout: 30 seconds.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a store config with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            request_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build from application settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(&settings.base_url, &settings.service_key)
            .with_timeout(Duration::from_secs(settings.request_timeout_secs))
    }
}

/// Names of the buckets the lifecycle manager reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLayout {
    /// Listing images.
    pub listing_images: String,
    /// Profile photos.
    pub profile_photos: String,
    /// Ownership documents attached to a listing.
    pub ownership_documents: String,
    /// Identity documents attached to a listing.
    pub identity_documents: String,
    /// Private archive for evidence of deleted owners.
    pub evidence: String,
}

impl Default for BucketLayout {
    fn default() -> Self {
        Self {
            listing_images: "listing-images".to_string(),
            profile_photos: "profile-photos".to_string(),
            ownership_documents: "rc".to_string(),
            identity_documents: "dl".to_string(),
            evidence: "deleted-evidence".to_string(),
        }
    }
}

impl BucketLayout {
    /// Build from application settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self {
            listing_images: settings.listing_bucket.clone(),
            profile_photos: settings.profile_bucket.clone(),
            ownership_documents: settings.ownership_document_bucket.clone(),
            identity_documents: settings.identity_document_bucket.clone(),
            evidence: settings.evidence_bucket.clone(),
        }
    }
}

/// Retry policy from application settings.
#[must_use]
pub fn retry_policy_from_settings(settings: &StorageSettings) -> RetryPolicy {
    RetryPolicy::new(
        settings.max_retries,
        Duration::from_millis(settings.retry_backoff_ms),
    )
}
