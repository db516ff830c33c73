//! Image pipeline types.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Position of an image within a listing upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    /// Thumbnail shown on listing cards.
    Front,
    /// Any later image.
    Other,
}

impl ImageRole {
    /// Role of the image at `index` in an upload batch.
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        if index == 0 { Self::Front } else { Self::Other }
    }

    /// Lowercase name used in object keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG at the configured quality.
    Jpeg,
    /// Lossless WebP.
    WebP,
    /// PNG, the last-resort fallback.
    Png,
}

impl OutputFormat {
    /// Default encoder preference.
    pub const DEFAULT_CHAIN: [Self; 3] = [Self::Jpeg, Self::WebP, Self::Png];

    /// File extension without a dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Png => "png",
        }
    }

    /// MIME type.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Png => "image/png",
        }
    }
}

/// A resized, watermarked and re-encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    /// Encoded bytes.
    pub bytes: Bytes,
    /// Encoder that produced `bytes`.
    pub format: OutputFormat,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// One image to prepare for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSpec {
    /// Front or other.
    pub role: ImageRole,
    /// Bytes as uploaded.
    pub source_bytes: Bytes,
    /// Declared MIME type, used when the bytes are stored unprocessed.
    pub content_type: String,
}

impl UploadSpec {
    /// Create an upload spec.
    #[must_use]
    pub fn new(role: ImageRole, source_bytes: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            role,
            source_bytes,
            content_type: content_type.into(),
        }
    }
}

/// Bytes ready to be stored, processed or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// Bytes to upload.
    pub bytes: Bytes,
    /// MIME type to upload with.
    pub content_type: String,
    /// File extension for the object key.
    pub extension: String,
    /// Whether the pipeline produced `bytes`.
    pub processed: bool,
}

/// File extension for a MIME type, `bin` when unknown.
#[must_use]
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}
