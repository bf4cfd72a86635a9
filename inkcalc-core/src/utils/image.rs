//! Utility functions for image loading and conversion.

use crate::core::OCRError;
use image::{DynamicImage, RgbImage};

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// Grayscale and alpha inputs are expanded to three channels, so the result
/// is always acceptable to the line extractor.
///
/// # Errors
///
/// This function will return an `OCRError::ImageLoad` error if the image cannot
/// be opened or decoded.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, OCRError> {
    let img = image::open(path).map_err(OCRError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_load_image_expands_gray_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        GrayImage::from_pixel(4, 3, Luma([200])).save(&path).unwrap();

        let rgb = load_image(&path).unwrap();
        assert_eq!(rgb.dimensions(), (4, 3));
        assert_eq!(rgb.get_pixel(0, 0).0, [200, 200, 200]);
    }

    #[test]
    fn test_load_image_missing_file() {
        let err = load_image(std::path::Path::new("does/not/exist.png")).unwrap_err();
        assert!(matches!(err, OCRError::ImageLoad(_)));
    }
}
