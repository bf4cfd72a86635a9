//! Tone operations: desaturation, linear stretch and the page threshold.

use crate::core::constants::WHITE_SPREAD;
use crate::core::{OCRError, OcrResult};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use tracing::debug;

/// Keeps the darkest channel of every pixel.
///
/// Black ink stays black and paper stays white, but coloured ink (blue and
/// red pens, highlighters) ends up dark as well, unlike a luminance
/// conversion which leaves bright inks bright.
///
/// # Errors
///
/// Returns [`OCRError::InvalidShape`] unless the image is 8-bit RGB.
pub fn desaturate(img: &DynamicImage) -> OcrResult<GrayImage> {
    match img {
        DynamicImage::ImageRgb8(rgb) => Ok(desaturate_rgb(rgb)),
        other => Err(OCRError::InvalidShape {
            channels: other.color().channel_count(),
        }),
    }
}

/// [`desaturate`] for an image already known to be 8-bit RGB.
pub fn desaturate_rgb(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        Luma([r.min(g).min(b)])
    })
}

/// Linearly maps `[black, white]` onto `[0, 255]`.
///
/// A missing level defaults to the image minimum (`black`) or maximum
/// (`white`). Values are rounded half to even and clamped into the byte range.
///
/// # Errors
///
/// Returns [`OCRError::InvalidRange`] when the effective black level is not
/// below the effective white level, which includes every single-valued image.
pub fn autostretch(img: &GrayImage, black: Option<u8>, white: Option<u8>) -> OcrResult<GrayImage> {
    let (min, max) = img
        .as_raw()
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    let black = black.unwrap_or(min);
    let white = white.unwrap_or(max);
    if black >= white {
        return Err(OCRError::InvalidRange { black, white });
    }

    let black_f = f64::from(black);
    let span = f64::from(white) - black_f;
    let lut: Vec<u8> = (0..=255u8)
        .map(|p| {
            let v = ((f64::from(p) - black_f) / span * 255.0).round_ties_even();
            v.clamp(0.0, 255.0) as u8
        })
        .collect();

    let mut out = img.clone();
    for p in out.iter_mut() {
        *p = lut[usize::from(*p)];
    }
    Ok(out)
}

/// Thresholds a page photograph to pure black and white.
///
/// See [`autothreshold_with`]; the spread is the default of two standard
/// deviations.
pub fn autothreshold(img: &GrayImage) -> GrayImage {
    autothreshold_with(img, WHITE_SPREAD)
}

/// Thresholds a page photograph to pure black and white.
///
/// The image is stretched first, so underexposed photographs behave like well
/// exposed ones. Paper dominates the histogram, putting the median close to
/// paper white; every value above `max(median - white_spread * std, median / 2)`
/// becomes 255 and everything else 0.
///
/// An image holding a single value has no ink to separate and comes back
/// entirely white.
pub fn autothreshold_with(img: &GrayImage, white_spread: f64) -> GrayImage {
    let stretched = match autostretch(img, None, None) {
        Ok(stretched) => stretched,
        Err(_) => {
            debug!("single-valued image, nothing to threshold");
            return GrayImage::from_pixel(img.width(), img.height(), Luma([255]));
        }
    };

    let mut histogram = [0u64; 256];
    for &p in stretched.as_raw() {
        histogram[usize::from(p)] += 1;
    }
    let median = histogram_median(&histogram);
    let std = histogram_std(&histogram);
    let thresh = (median - white_spread * std).max(median / 2.0);
    debug!(median, std, thresh, "threshold");

    let mut out = stretched;
    for p in out.iter_mut() {
        *p = if f64::from(*p) > thresh { 255 } else { 0 };
    }
    out
}

/// Median of the values counted in `histogram`; the mean of the two middle
/// values for an even count.
fn histogram_median(histogram: &[u64; 256]) -> f64 {
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let nth = |k: u64| -> f64 {
        let mut seen = 0;
        for (value, &count) in histogram.iter().enumerate() {
            seen += count;
            if seen > k {
                return value as f64;
            }
        }
        255.0
    };
    if total % 2 == 1 {
        nth(total / 2)
    } else {
        (nth(total / 2 - 1) + nth(total / 2)) / 2.0
    }
}

/// Population standard deviation of the values counted in `histogram`.
fn histogram_std(histogram: &[u64; 256]) -> f64 {
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let mean = histogram
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * c as f64)
        .sum::<f64>()
        / n;
    let var = histogram
        .iter()
        .enumerate()
        .map(|(v, &c)| (v as f64 - mean).powi(2) * c as f64)
        .sum::<f64>()
        / n;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, LumaA, Rgb};

    #[test]
    fn test_desaturate_keeps_darkest_channel() {
        let mut img = RgbImage::from_pixel(3, 1, Rgb([255, 255, 255]));
        img.put_pixel(0, 0, Rgb([20, 40, 230])); // blue ink
        img.put_pixel(1, 0, Rgb([210, 30, 35])); // red ink

        let gray = desaturate(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(gray.as_raw(), &vec![20, 30, 255]);
    }

    #[test]
    fn test_desaturate_rejects_other_layouts() {
        let gray = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        assert!(matches!(
            desaturate(&gray),
            Err(OCRError::InvalidShape { channels: 1 })
        ));

        let la: ImageBuffer<LumaA<u8>, Vec<u8>> = ImageBuffer::new(2, 2);
        assert!(matches!(
            desaturate(&DynamicImage::ImageLumaA8(la)),
            Err(OCRError::InvalidShape { channels: 2 })
        ));
    }

    #[test]
    fn test_autostretch_full_range() {
        let img = GrayImage::from_raw(3, 1, vec![100, 150, 200]).unwrap();
        let out = autostretch(&img, None, None).unwrap();
        // 50 / 100 * 255 = 127.5 rounds to the even neighbour
        assert_eq!(out.as_raw(), &vec![0, 128, 255]);
    }

    #[test]
    fn test_autostretch_explicit_levels_clamp() {
        let img = GrayImage::from_raw(4, 1, vec![0, 10, 110, 250]).unwrap();
        let out = autostretch(&img, Some(10), Some(110)).unwrap();
        assert_eq!(out.as_raw(), &vec![0, 0, 255, 255]);
    }

    #[test]
    fn test_autostretch_rejects_empty_range() {
        let img = GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
        assert!(matches!(
            autostretch(&img, Some(90), Some(90)),
            Err(OCRError::InvalidRange {
                black: 90,
                white: 90
            })
        ));

        let flat = GrayImage::from_pixel(4, 4, Luma([77]));
        assert!(autostretch(&flat, None, None).is_err());
    }

    #[test]
    fn test_autothreshold_is_bivalued() {
        let img = GrayImage::from_fn(40, 30, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let out = autothreshold(&img);
        assert!(out.iter().all(|&p| p == 0 || p == 255));
    }

    #[test]
    fn test_autothreshold_separates_ink_from_dim_paper() {
        // Underexposed paper around 120 with a dark stroke at 40.
        let mut img = GrayImage::from_fn(50, 50, |x, _| Luma([118 + (x % 5) as u8]));
        for y in 20..30 {
            for x in 10..40 {
                img.put_pixel(x, y, Luma([40]));
            }
        }
        let out = autothreshold(&img);
        assert_eq!(out.get_pixel(0, 0).0[0], 255);
        assert_eq!(out.get_pixel(49, 49).0[0], 255);
        assert_eq!(out.get_pixel(25, 25).0[0], 0);
        let ink = out.iter().filter(|&&p| p == 0).count();
        assert_eq!(ink, 300);
    }

    #[test]
    fn test_autothreshold_blank_page() {
        let blank = GrayImage::from_pixel(10, 10, Luma([255]));
        assert!(autothreshold(&blank).iter().all(|&p| p == 255));
    }

    #[test]
    fn test_histogram_median_even_count() {
        let mut histogram = [0u64; 256];
        histogram[10] = 1;
        histogram[20] = 1;
        assert_eq!(histogram_median(&histogram), 15.0);
        histogram[20] = 2;
        assert_eq!(histogram_median(&histogram), 20.0);
    }
}
