//! Diagonal tiled text watermark.

use image::RgbImage;

use super::font::{ADVANCE_COLS, GLYPH_COLS, GLYPH_ROWS, is_set};

/// Watermark appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Watermark {
    /// Text repeated across the image.
    pub text: String,
    /// Blend factor of the white ink, 0.0 to 1.0.
    pub opacity: f32,
    /// Rotation of the text baseline in degrees; negative rises to the right.
    pub angle_degrees: f32,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            text: "BZR".to_string(),
            opacity: 0.12,
            angle_degrees: -30.0,
        }
    }
}

impl Watermark {
    /// Create a watermark with the default opacity and angle.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Font size in pixels for a canvas width: `max(24, width * 0.12)`.
    #[must_use]
    pub fn font_px(width: u32) -> u32 {
        (width * 12 / 100).max(24)
    }

    /// Distance between tile origins: three font heights.
    #[must_use]
    pub fn step_px(width: u32) -> u32 {
        Self::font_px(width) * 3
    }

    /// Stamp the watermark onto `canvas` in place.
    ///
    /// Every canvas pixel is mapped back through the rotation about the
    /// centre into text space, where the text tiles on a square grid. Each
    /// pixel is sampled on a `SUBSAMPLES x SUBSAMPLES` grid and the ink is
    /// blended in proportion to the covered samples.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn apply(&self, canvas: &mut RgbImage) {
        let chars: Vec<char> = self.text.chars().collect();
        let opacity = self.opacity.clamp(0.0, 1.0);
        if chars.is_empty() || opacity <= 0.0 {
            return;
        }

        let (width, height) = canvas.dimensions();
        let font_px = Self::font_px(width) as f32;
        let layout = TextTile {
            chars: &chars,
            font_px,
            step: Self::step_px(width) as f32,
            scale: font_px / GLYPH_ROWS as f32,
            text_width: (chars.len() * ADVANCE_COLS) as f32 * font_px / GLYPH_ROWS as f32,
        };

        let (sin, cos) = self.angle_degrees.to_radians().sin_cos();
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        let cell = 1.0 / SUBSAMPLES as f32;
        let total = (SUBSAMPLES * SUBSAMPLES) as f32;

        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let mut covered = 0u32;
            for sy in 0..SUBSAMPLES {
                for sx in 0..SUBSAMPLES {
                    let dx = x as f32 + (sx as f32 + 0.5) * cell - cx;
                    let dy = y as f32 + (sy as f32 + 0.5) * cell - cy;
                    // Inverse rotation takes canvas space back to text space.
                    let u = dx * cos + dy * sin;
                    let v = dy * cos - dx * sin;
                    if layout.covers(u, v) {
                        covered += 1;
                    }
                }
            }
            if covered == 0 {
                continue;
            }

            let alpha = opacity * covered as f32 / total;
            for channel in &mut pixel.0 {
                let blended = f32::from(*channel) * (1.0 - alpha) + 255.0 * alpha;
                *channel = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Samples per pixel side.
const SUBSAMPLES: usize = 4;

/// One tile of text in unrotated text space.
struct TextTile<'a> {
    chars: &'a [char],
    font_px: f32,
    step: f32,
    scale: f32,
    text_width: f32,
}

impl TextTile<'_> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn covers(&self, u: f32, v: f32) -> bool {
        let u = u.rem_euclid(self.step);
        let v = v.rem_euclid(self.step);
        if u >= self.text_width || v >= self.font_px {
            return false;
        }

        let col = (u / self.scale) as usize;
        let row = ((v / self.scale) as usize).min(GLYPH_ROWS - 1);
        let glyph_col = col % ADVANCE_COLS;
        if glyph_col >= GLYPH_COLS {
            return false;
        }
        self.chars
            .get(col / ADVANCE_COLS)
            .is_some_and(|&c| is_set(c, row, glyph_col))
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(100, 24)]
    #[case(360, 43)]
    #[case(1200, 144)]
    fn test_font_px(#[case] width: u32, #[case] expected: u32) {
        assert_eq!(Watermark::font_px(width), expected);
        assert_eq!(Watermark::step_px(width), expected * 3);
    }

    #[test]
    fn test_apply_lightens_some_pixels_faintly() {
        let mut canvas = RgbImage::from_pixel(360, 540, Rgb([0, 0, 0]));
        Watermark::default().apply(&mut canvas);

        let inked: Vec<_> = canvas.pixels().filter(|p| p.0 != [0, 0, 0]).collect();
        assert!(!inked.is_empty());
        assert!(inked.len() < 360 * 540 / 2);
        // At most 0.12 of white over black, grey channels stay equal.
        assert!(inked.iter().all(|p| p.0[0] <= 31 && p.0[0] == p.0[1] && p.0[1] == p.0[2]));
        assert!(inked.iter().any(|p| p.0 == [31, 31, 31]));
    }

    #[test]
    fn test_glyph_edges_are_blended_partially() {
        let mut canvas = RgbImage::from_pixel(360, 540, Rgb([0, 0, 0]));
        Watermark {
            opacity: 1.0,
            ..Watermark::default()
        }
        .apply(&mut canvas);

        let levels: std::collections::BTreeSet<u8> = canvas.pixels().map(|p| p.0[0]).collect();
        assert!(levels.contains(&255));
        let partial = levels.iter().filter(|&&l| l > 0 && l < 255).count();
        assert!(partial >= 4, "only {partial} partial levels: {levels:?}");
    }

    #[test]
    fn test_apply_is_deterministic() {
        let mut a = RgbImage::from_pixel(200, 120, Rgb([10, 20, 30]));
        let mut b = a.clone();
        Watermark::new("BZR").apply(&mut a);
        Watermark::new("BZR").apply(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_text_or_zero_opacity_is_noop() {
        let original = RgbImage::from_pixel(64, 64, Rgb([90, 90, 90]));

        let mut canvas = original.clone();
        Watermark::new("").apply(&mut canvas);
        assert_eq!(canvas, original);

        let mut canvas = original.clone();
        Watermark {
            opacity: 0.0,
            ..Watermark::default()
        }
        .apply(&mut canvas);
        assert_eq!(canvas, original);
    }
}
