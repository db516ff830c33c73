//! Media service types.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::imaging::ImageRole;

/// One file received for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Client-supplied file name, if any.
    pub file_name: Option<String>,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw bytes.
    pub bytes: Bytes,
}

impl UploadFile {
    /// Create an upload file.
    #[must_use]
    pub fn new(file_name: Option<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name,
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// A stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Object key.
    pub key: String,
    /// Public URL.
    pub url: String,
    /// Front or other.
    pub role: ImageRole,
    /// Whether the pipeline processed the bytes.
    pub processed: bool,
}

/// Result of a listing image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingUpload {
    /// Prefix the images were written under.
    pub folder: String,
    /// Stored images, in upload order.
    pub images: Vec<StoredImage>,
}

impl ListingUpload {
    /// Public URLs in upload order.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.images.iter().map(|i| i.url.clone()).collect()
    }
}

/// Document attached to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Proof of ownership.
    Ownership,
    /// Identity document.
    Identity,
}

impl DocumentKind {
    /// Name used in object keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ownership => "ownership",
            Self::Identity => "identity",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored single object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Bucket.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Public URL.
    pub url: String,
}
