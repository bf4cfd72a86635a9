//! Normalising a cropped glyph into the classifier's input frame.

use crate::core::constants::{GLYPH_BOX_SIZE, GLYPH_FRAME_SIZE};
use crate::core::{OCRError, OcrResult};
use image::GrayImage;
use image::imageops::{self, FilterType};

/// Centres a glyph in a 28x28 frame with inverted polarity.
///
/// The glyph is scaled so its longer side is exactly 20 pixels,
/// inverted (ink bright, paper 0) and pasted onto a black canvas at
/// `((28 - w) / 2, (28 - h) / 2)`, rounding down.
///
/// The scaling uses `FilterType::Triangle`, whose kernel widens with the
/// scale factor when shrinking, so downscaled glyphs are area-averaged
/// (antialiased). Pixels therefore differ slightly from a plain bilinear
/// sampler such as OpenCV's `INTER_LINEAR`.
///
/// # Errors
///
/// Returns [`OCRError::InvalidSize`] for a glyph with a zero dimension.
pub fn frame_glyph(glyph: &GrayImage) -> OcrResult<GrayImage> {
    let (width, height) = glyph.dimensions();
    if width == 0 || height == 0 {
        return Err(OCRError::invalid_size((1, 1), (width, height)));
    }

    let scale = f64::from(GLYPH_BOX_SIZE) / f64::from(width.max(height));
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, GLYPH_BOX_SIZE);
    let (new_width, new_height) = (scaled(width), scaled(height));

    let mut resized = imageops::resize(glyph, new_width, new_height, FilterType::Triangle);
    imageops::invert(&mut resized);

    let mut canvas = GrayImage::new(GLYPH_FRAME_SIZE, GLYPH_FRAME_SIZE);
    let left = (GLYPH_FRAME_SIZE - new_width) / 2;
    let top = (GLYPH_FRAME_SIZE - new_height) / 2;
    imageops::replace(&mut canvas, &resized, i64::from(left), i64::from(top));
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Bounding box of the non-zero pixels as (left, top, width, height).
    fn ink_box(img: &GrayImage) -> (u32, u32, u32, u32) {
        let lit: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        let min_x = lit.iter().map(|p| p.0).min().unwrap();
        let max_x = lit.iter().map(|p| p.0).max().unwrap();
        let min_y = lit.iter().map(|p| p.1).min().unwrap();
        let max_y = lit.iter().map(|p| p.1).max().unwrap();
        (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    #[test]
    fn test_tall_glyph_is_centred() {
        let glyph = GrayImage::from_pixel(30, 80, Luma([0]));
        let framed = frame_glyph(&glyph).unwrap();
        assert_eq!(framed.dimensions(), (28, 28));
        // 30 * 20 / 80 = 7.5 rounds to 8
        assert_eq!(ink_box(&framed), (10, 4, 8, 20));
        assert_eq!(framed.get_pixel(14, 14).0[0], 255);
        assert_eq!(framed.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_wide_glyph_floors_offsets() {
        let glyph = GrayImage::from_pixel(60, 9, Luma([0]));
        let framed = frame_glyph(&glyph).unwrap();
        // 9 * 20 / 60 = 3, top = (28 - 3) / 2 = 12
        assert_eq!(ink_box(&framed), (4, 12, 20, 3));
    }

    #[test]
    fn test_small_glyph_is_upscaled() {
        let glyph = GrayImage::from_pixel(5, 10, Luma([0]));
        let framed = frame_glyph(&glyph).unwrap();
        assert_eq!(ink_box(&framed), (9, 4, 10, 20));
    }

    #[test]
    fn test_paper_becomes_background() {
        let mut glyph = GrayImage::from_pixel(20, 20, Luma([255]));
        glyph.put_pixel(10, 10, Luma([0]));
        let framed = frame_glyph(&glyph).unwrap();
        assert_eq!(framed.get_pixel(4, 4).0[0], 0);
        assert_eq!(framed.get_pixel(14, 14).0[0], 255);
    }

    #[test]
    fn test_downscaling_averages_fine_strokes() {
        // one-pixel stripes shrunk four times blend into mid grey
        let glyph = GrayImage::from_fn(80, 80, |x, _| Luma([if x % 2 == 0 { 0 } else { 255 }]));
        let framed = frame_glyph(&glyph).unwrap();
        for y in 4..24 {
            for x in 4..24 {
                let value = framed.get_pixel(x, y).0[0];
                assert!((64..=192).contains(&value), "pixel ({x}, {y}) = {value}");
            }
        }
    }

    #[test]
    fn test_empty_glyph_is_rejected() {
        assert!(matches!(
            frame_glyph(&GrayImage::new(0, 5)),
            Err(OCRError::InvalidSize { .. })
        ));
    }
}
