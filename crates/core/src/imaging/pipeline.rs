//! Resize, watermark and encode.

use bazaar_shared::MediaSettings;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::{self, FilterType};
use image::{ImageResult, RgbImage};
use tracing::{debug, warn};

use super::error::ImageError;
use super::types::{
    ImageRole, OutputFormat, PreparedImage, ProcessedImage, UploadSpec,
    extension_for_content_type,
};
use super::watermark::Watermark;

/// Image pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Maximum width of the front image.
    pub front_width: u32,
    /// Maximum width of every other image.
    pub other_width: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Watermark stamped on every image.
    pub watermark: Watermark,
    /// Encoders to try, in order.
    pub encoders: Vec<OutputFormat>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            front_width: 360,
            other_width: 1200,
            quality: 82,
            watermark: Watermark::default(),
            encoders: OutputFormat::DEFAULT_CHAIN.to_vec(),
        }
    }
}

impl PipelineSettings {
    /// Build from application settings.
    #[must_use]
    pub fn from_media(media: &MediaSettings) -> Self {
        Self {
            front_width: media.front_width,
            other_width: media.other_width,
            quality: media.quality,
            watermark: Watermark::new(media.watermark_text.clone()),
            ..Self::default()
        }
    }

    /// Replace the encoder chain.
    #[must_use]
    pub fn with_encoders(mut self, encoders: Vec<OutputFormat>) -> Self {
        self.encoders = encoders;
        self
    }

    /// Maximum width for a role.
    #[must_use]
    pub const fn max_width(&self, role: ImageRole) -> u32 {
        match role {
            ImageRole::Front => self.front_width,
            ImageRole::Other => self.other_width,
        }
    }
}

/// Output dimensions for a source image and a width cap.
///
/// Only downscales. Height keeps the aspect ratio, rounded to the nearest
/// pixel and never below one.
#[must_use]
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width == 0 || max_width == 0 || width <= max_width {
        return (width, height);
    }
    let scaled =
        (u64::from(height) * u64::from(max_width) + u64::from(width) / 2) / u64::from(width);
    let scaled = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
    (max_width, scaled)
}

/// Stateless image processor.
#[derive(Debug, Clone, Default)]
pub struct ImagePipeline {
    settings: PipelineSettings,
}

impl ImagePipeline {
    /// Create a pipeline.
    #[must_use]
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    /// Settings in effect.
    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Decode, resize, watermark and encode an image.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::UnsupportedImage` if the bytes do not decode and
    /// `ImageError::Encode` if every encoder in the chain fails.
    pub fn process(&self, bytes: &[u8], role: ImageRole) -> Result<ProcessedImage, ImageError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ImageError::UnsupportedImage(e.to_string()))?;

        let (source_width, source_height) = (decoded.width(), decoded.height());
        let (width, height) =
            target_dimensions(source_width, source_height, self.settings.max_width(role));

        let rgb = decoded.to_rgb8();
        let mut canvas = if (width, height) == (source_width, source_height) {
            rgb
        } else {
            imageops::resize(&rgb, width, height, FilterType::Triangle)
        };

        self.settings.watermark.apply(&mut canvas);

        let processed = self.encode(&canvas)?;
        debug!(
            role = %role,
            source_width,
            source_height,
            width,
            height,
            format = processed.format.extension(),
            "image processed"
        );
        Ok(processed)
    }

    /// Process an image, falling back to the original bytes on any failure.
    pub fn process_or_original(
        &self,
        bytes: &Bytes,
        role: ImageRole,
        original_content_type: &str,
    ) -> PreparedImage {
        match self.process(bytes, role) {
            Ok(processed) => PreparedImage {
                bytes: processed.bytes,
                content_type: processed.format.content_type().to_string(),
                extension: processed.format.extension().to_string(),
                processed: true,
            },
            Err(err) => {
                warn!(
                    role = %role,
                    error = %err,
                    "image processing failed, storing original bytes"
                );
                PreparedImage {
                    bytes: bytes.clone(),
                    content_type: original_content_type.to_string(),
                    extension: extension_for_content_type(original_content_type).to_string(),
                    processed: false,
                }
            }
        }
    }

    /// [`Self::process_or_original`] for an [`UploadSpec`].
    #[must_use]
    pub fn prepare(&self, spec: &UploadSpec) -> PreparedImage {
        self.process_or_original(&spec.source_bytes, spec.role, &spec.content_type)
    }

    fn encode(&self, canvas: &RgbImage) -> Result<ProcessedImage, ImageError> {
        for &format in &self.settings.encoders {
            match self.encode_as(canvas, format) {
                Ok(bytes) if !bytes.is_empty() => {
                    return Ok(ProcessedImage {
                        bytes: Bytes::from(bytes),
                        format,
                        width: canvas.width(),
                        height: canvas.height(),
                    });
                }
                Ok(_) => warn!(format = format.extension(), "encoder produced no bytes"),
                Err(err) => warn!(format = format.extension(), error = %err, "encoder failed"),
            }
        }
        Err(ImageError::Encode(format!(
            "no encoder succeeded out of {}",
            self.settings.encoders.len()
        )))
    }

    fn encode_as(&self, canvas: &RgbImage, format: OutputFormat) -> ImageResult<Vec<u8>> {
        let mut out = Vec::new();
        match format {
            OutputFormat::Jpeg => {
                let quality = self.settings.quality.clamp(1, 100);
                canvas.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
            }
            OutputFormat::WebP => {
                canvas.write_with_encoder(WebPEncoder::new_lossless(&mut out))?;
            }
            OutputFormat::Png => {
                canvas.write_with_encoder(PngEncoder::new(&mut out))?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
