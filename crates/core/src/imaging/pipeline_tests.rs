use std::io::Cursor;

use image::{ImageFormat, Rgb};
use proptest::prelude::*;
use rstest::rstest;

use super::*;

fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    Bytes::from(out.into_inner())
}

fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}

#[rstest]
#[case(2000, 3000, 360, (360, 540))]
#[case(2000, 3000, 1200, (1200, 1800))]
#[case(300, 200, 360, (300, 200))]
#[case(360, 10, 360, (360, 10))]
#[case(4000, 1, 360, (360, 1))]
#[case(1000, 333, 360, (360, 120))]
fn test_target_dimensions(
    #[case] width: u32,
    #[case] height: u32,
    #[case] max_width: u32,
    #[case] expected: (u32, u32),
) {
    assert_eq!(target_dimensions(width, height, max_width), expected);
}

#[rstest]
#[case(ImageRole::Front, (360, 540))]
#[case(ImageRole::Other, (1200, 1800))]
fn test_process_resizes_by_role(#[case] role: ImageRole, #[case] expected: (u32, u32)) {
    let pipeline = ImagePipeline::default();
    let processed = pipeline.process(&png_bytes(2000, 3000), role).unwrap();

    assert_eq!((processed.width, processed.height), expected);
    assert_eq!(processed.format, OutputFormat::Jpeg);
    assert_eq!(decoded_dimensions(&processed.bytes), expected);
}

#[test]
fn test_process_never_upscales() {
    let processed = ImagePipeline::default()
        .process(&png_bytes(120, 80), ImageRole::Front)
        .unwrap();
    assert_eq!((processed.width, processed.height), (120, 80));
}

#[test]
fn test_process_rejects_non_image() {
    let err = ImagePipeline::default()
        .process(b"%PDF-1.7 not an image", ImageRole::Other)
        .unwrap_err();
    assert!(matches!(err, ImageError::UnsupportedImage(_)));
}

#[test]
fn test_encoder_chain_order_is_respected() {
    let pipeline = ImagePipeline::new(
        PipelineSettings::default().with_encoders(vec![OutputFormat::Png, OutputFormat::Jpeg]),
    );
    let processed = pipeline.process(&png_bytes(64, 48), ImageRole::Other).unwrap();

    assert_eq!(processed.format, OutputFormat::Png);
    assert_eq!(
        image::guess_format(&processed.bytes).unwrap(),
        ImageFormat::Png
    );
}

#[test]
fn test_webp_encoder_is_lossless() {
    let pipeline = ImagePipeline::new(
        PipelineSettings::default().with_encoders(vec![OutputFormat::WebP]),
    );
    let processed = pipeline.process(&png_bytes(40, 30), ImageRole::Other).unwrap();

    assert_eq!(processed.format, OutputFormat::WebP);
    assert_eq!(decoded_dimensions(&processed.bytes), (40, 30));
}

#[test]
fn test_empty_encoder_chain_fails() {
    let pipeline = ImagePipeline::new(PipelineSettings::default().with_encoders(Vec::new()));
    let err = pipeline.process(&png_bytes(8, 8), ImageRole::Other).unwrap_err();
    assert!(matches!(err, ImageError::Encode(_)));
}

#[test]
fn test_process_or_original_falls_back() {
    let original = Bytes::from_static(b"not an image");
    let prepared =
        ImagePipeline::default().process_or_original(&original, ImageRole::Front, "image/heic");

    assert!(!prepared.processed);
    assert_eq!(prepared.bytes, original);
    assert_eq!(prepared.content_type, "image/heic");
    assert_eq!(prepared.extension, "heic");
}

#[test]
fn test_prepare_other_role_uses_wide_target() {
    let spec = UploadSpec::new(ImageRole::Other, png_bytes(2000, 3000), "image/png");

    let prepared = ImagePipeline::default().prepare(&spec);

    assert!(prepared.processed);
    assert_eq!(decoded_dimensions(&prepared.bytes), (1200, 1800));
}

#[test]
fn test_process_or_original_uses_processed_output() {
    let prepared = ImagePipeline::default().process_or_original(
        &png_bytes(500, 500),
        ImageRole::Front,
        "image/png",
    );

    assert!(prepared.processed);
    assert_eq!(prepared.content_type, "image/jpeg");
    assert_eq!(prepared.extension, "jpg");
    assert_eq!(decoded_dimensions(&prepared.bytes), (360, 360));
}

#[test]
fn test_settings_from_media() {
    let media = MediaSettings {
        watermark_text: "TEST".to_string(),
        front_width: 200,
        other_width: 800,
        quality: 70,
    };
    let settings = PipelineSettings::from_media(&media);
    assert_eq!(settings.max_width(ImageRole::Front), 200);
    assert_eq!(settings.max_width(ImageRole::Other), 800);
    assert_eq!(settings.watermark.text, "TEST");
    assert_eq!(settings.encoders, OutputFormat::DEFAULT_CHAIN.to_vec());
}

#[rstest]
#[case("image/jpeg", "jpg")]
#[case("IMAGE/PNG; charset=binary", "png")]
#[case("application/pdf", "pdf")]
#[case("", "bin")]
fn test_extension_for_content_type(#[case] content_type: &str, #[case] expected: &str) {
    assert_eq!(extension_for_content_type(content_type), expected);
}

proptest! {
    #[test]
    fn prop_target_dimensions_bounded_and_proportional(
        width in 1u32..10_000,
        height in 1u32..10_000,
        max_width in 1u32..2_000,
    ) {
        let (w, h) = target_dimensions(width, height, max_width);

        prop_assert!(w <= width.max(max_width));
        prop_assert!(w <= max_width || w == width);
        prop_assert!(h >= 1);
        prop_assert!(h <= height);
        // Rounded height is within one pixel of the exact proportion.
        let exact = u64::from(height) * u64::from(w);
        let approx = u64::from(h) * u64::from(width);
        prop_assert!(exact.abs_diff(approx) <= u64::from(width));
    }
}
