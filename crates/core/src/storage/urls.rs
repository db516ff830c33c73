//! URL construction for the object store HTTP contract.

/// Builds backend URLs from a base URL. Pure; performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUrls {
    base: String,
}

impl StorageUrls {
    /// Create a URL builder. A trailing `/` on `base` is ignored.
    #[must_use]
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Authenticated object URL used for PUT, GET and DELETE.
    #[must_use]
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{bucket}/{}",
            self.base,
            key.trim_start_matches('/')
        )
    }

    /// Public object URL handed out to clients.
    #[must_use]
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{}",
            self.base,
            key.trim_start_matches('/')
        )
    }

    /// Listing endpoint (POST with a JSON body).
    #[must_use]
    pub fn list_url(&self, bucket: &str) -> String {
        format!("{}/storage/v1/object/list/{bucket}", self.base)
    }

    /// Legacy listing endpoint (GET with a `prefix` query parameter).
    ///
    /// The prefix is passed separately so the HTTP client can encode it.
    #[must_use]
    pub fn legacy_list_url(&self, bucket: &str) -> String {
        self.list_url(bucket)
    }

    /// URL a client reads an object from.
    #[must_use]
    pub fn build_read_url(&self, bucket: &str, key: &str) -> String {
        self.public_url(bucket, key)
    }

    /// URL the manager writes an object to.
    #[must_use]
    pub fn build_write_url(&self, bucket: &str, key: &str) -> String {
        self.object_url(bucket, key)
    }
}
