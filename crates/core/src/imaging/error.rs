//! Image pipeline errors.

use thiserror::Error;

/// Image processing errors.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Input bytes could not be decoded as an image.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// Every configured encoder failed.
    #[error("image encoding failed: {0}")]
    Encode(String),
}
