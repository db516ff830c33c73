//! Object addressing types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

const PUBLIC_MARKER: &str = "/storage/v1/object/public/";
const OBJECT_MARKER: &str = "/storage/v1/object/";

/// A single object addressed by bucket and key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Bucket name.
    pub bucket: String,
    /// Key within the bucket. Never starts with `/`.
    pub key: String,
}

impl ObjectRef {
    /// Create a new object reference.
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a public or authenticated object URL into bucket and key.
    ///
    /// Accepts `.../storage/v1/object/public/{bucket}/{key}` and
    /// `.../storage/v1/object/{bucket}/{key}`. A query string is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidUrl` when the URL does not carry both a
    /// bucket and a key.
    pub fn parse_url(url: &str) -> Result<Self, StorageError> {
        let trimmed = url.trim();
        let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();

        let tail = if let Some(idx) = without_query.find(PUBLIC_MARKER) {
            &without_query[idx + PUBLIC_MARKER.len()..]
        } else if let Some(idx) = without_query.find(OBJECT_MARKER) {
            &without_query[idx + OBJECT_MARKER.len()..]
        } else {
            return Err(StorageError::InvalidUrl(trimmed.to_string()));
        };

        let (bucket, key) = tail
            .split_once('/')
            .ok_or_else(|| StorageError::InvalidUrl(trimmed.to_string()))?;
        let key = key.trim_start_matches('/');

        if bucket.trim().is_empty() || key.trim().is_empty() {
            return Err(StorageError::InvalidUrl(trimmed.to_string()));
        }

        Ok(Self::new(bucket, key))
    }

    /// Last path segment of the key.
    #[must_use]
    pub fn file_name(&self) -> &str {
        file_name(&self.key)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Last `/`-separated segment of a key.
#[must_use]
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// One entry of a prefix listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Name relative to the listed prefix, without a trailing `/`.
    pub name: String,
    /// Whether the entry is a synthetic folder rather than an object.
    pub is_folder: bool,
}

impl ListEntry {
    /// A leaf object entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
        }
    }

    /// A synthetic folder entry.
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        "https://x.example.com/storage/v1/object/public/rc/9/rc.pdf",
        "rc",
        "9/rc.pdf"
    )]
    #[case("https://x.example.com/storage/v1/object/dl/dl_9.png", "dl", "dl_9.png")]
    #[case(
        "https://x.example.com/storage/v1/object/public/profile-photos/profile_42.jpg?t=1",
        "profile-photos",
        "profile_42.jpg"
    )]
    #[case("  https://x/storage/v1/object/public/b//nested/k.jpg  ", "b", "nested/k.jpg")]
    fn test_parse_url(#[case] url: &str, #[case] bucket: &str, #[case] key: &str) {
        let parsed = ObjectRef::parse_url(url).unwrap();
        assert_eq!(parsed.bucket, bucket);
        assert_eq!(parsed.key, key);
    }

    #[rstest]
    #[case("")]
    #[case("https://x.example.com/files/rc.pdf")]
    #[case("https://x.example.com/storage/v1/object/public/rc")]
    #[case("https://x.example.com/storage/v1/object/public/rc/")]
    #[case("https://x.example.com/storage/v1/object//key.jpg")]
    fn test_parse_url_rejects(#[case] url: &str) {
        assert!(matches!(
            ObjectRef::parse_url(url),
            Err(StorageError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ObjectRef::new("b", "7/front/a.jpg").file_name(), "a.jpg");
        assert_eq!(ObjectRef::new("b", "a.jpg").file_name(), "a.jpg");
        assert_eq!(ObjectRef::new("b", "7/a.jpg").to_string(), "b/7/a.jpg");
    }
}
