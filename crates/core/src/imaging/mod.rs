//! Image processing for uploads.
//!
//! Decode, downscale to a role-dependent width, stamp a diagonal tiled text
//! watermark and re-encode through an ordered chain of encoders.

mod error;
mod font;
mod pipeline;
mod types;
mod watermark;

pub use error::ImageError;
pub use pipeline::{ImagePipeline, PipelineSettings, target_dimensions};
pub use types::{
    ImageRole, OutputFormat, PreparedImage, ProcessedImage, UploadSpec, extension_for_content_type,
};
pub use watermark::Watermark;
