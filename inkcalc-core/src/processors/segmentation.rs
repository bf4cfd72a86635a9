//! Cutting a page into lines and a line into glyphs.
//!
//! Only projections are used: rows holding ink form lines, columns holding ink
//! within a line form glyphs, and each glyph is trimmed to its tallest
//! vertical run so specks above or below the stroke are left behind.

use super::levels::{autothreshold_with, desaturate_rgb};
use super::projection::{
    Axis, SplitMode, project_axis, select_cols, select_rows, sort_masks, split_mask,
};
use crate::core::config::SegmentationConfig;
use crate::core::{OCRError, OcrResult};
use image::{DynamicImage, GrayImage};
use tracing::{debug, warn};

/// The smallest expression is an operand, an operator and an operand.
const MIN_GLYPHS_PER_LINE: usize = 3;

/// Extracts the lines of content of a page with the default limits.
pub fn extract_lines(img: &DynamicImage) -> OcrResult<Vec<GrayImage>> {
    extract_lines_with(img, &SegmentationConfig::default())
}

/// Extracts the lines of content of a page, top to bottom.
///
/// The page is desaturated and thresholded; each returned line is the full
/// page width, cropped to one run of inked rows at least
/// `config.min_line_height` tall.
///
/// # Errors
///
/// * [`OCRError::InvalidShape`] unless the page is 8-bit RGB
/// * [`OCRError::InvalidSize`] when the page is below the minimum dimensions
/// * [`OCRError::NoLineFound`] when no row run is tall enough
pub fn extract_lines_with(
    img: &DynamicImage,
    config: &SegmentationConfig,
) -> OcrResult<Vec<GrayImage>> {
    let DynamicImage::ImageRgb8(rgb) = img else {
        return Err(OCRError::InvalidShape {
            channels: img.color().channel_count(),
        });
    };
    let (width, height) = rgb.dimensions();
    if width < config.min_image_width || height < config.min_image_height {
        return Err(OCRError::invalid_size(
            (config.min_image_width, config.min_image_height),
            (width, height),
        ));
    }

    let binary = autothreshold_with(&desaturate_rgb(rgb), config.white_spread);
    let row_mask = project_axis(&binary, Axis::Rows);
    let line_masks = split_mask(
        &row_mask,
        config.min_line_height as usize,
        SplitMode::Runs,
    );
    debug!(
        "{}x{} page: {} inked rows, {} line(s)",
        width,
        height,
        row_mask.count(),
        line_masks.len()
    );
    if line_masks.is_empty() {
        return Err(OCRError::NoLineFound {
            min_height: config.min_line_height,
        });
    }

    Ok(line_masks
        .iter()
        .map(|mask| select_rows(&binary, mask))
        .collect())
}

/// Extracts the glyphs of one line with the default limits.
#[doc(alias = "extract_chars")]
pub fn extract_glyphs(line: &GrayImage) -> OcrResult<Vec<GrayImage>> {
    extract_glyphs_with(line, &SegmentationConfig::default())
}

/// Extracts the glyphs of a thresholded line, left to right.
///
/// Every run of inked columns at least `config.min_glyph_width` wide is a
/// glyph candidate. Each candidate is cropped to its tallest run of inked rows
/// at least `config.min_glyph_height` tall; a candidate without one is a speck
/// and is skipped.
///
/// # Errors
///
/// * [`OCRError::InvalidSize`] when the line is narrower than
///   `config.min_image_width` or shorter than `config.min_line_height`
/// * [`OCRError::TooFewGlyphs`] when fewer than three glyphs are found
pub fn extract_glyphs_with(
    line: &GrayImage,
    config: &SegmentationConfig,
) -> OcrResult<Vec<GrayImage>> {
    let (width, height) = line.dimensions();
    if width < config.min_image_width || height < config.min_line_height {
        return Err(OCRError::invalid_size(
            (config.min_image_width, config.min_line_height),
            (width, height),
        ));
    }

    let col_mask = project_axis(line, Axis::Columns);
    let glyph_masks = split_mask(
        &col_mask,
        config.min_glyph_width as usize,
        SplitMode::Runs,
    );
    if glyph_masks.len() < MIN_GLYPHS_PER_LINE {
        return Err(OCRError::TooFewGlyphs {
            found: glyph_masks.len(),
            min_width: config.min_glyph_width,
        });
    }

    let mut glyphs = Vec::with_capacity(glyph_masks.len());
    for (idx, glyph_mask) in glyph_masks.iter().enumerate() {
        let strip = select_cols(line, glyph_mask);
        let fragments = split_mask(
            &project_axis(&strip, Axis::Rows),
            config.min_glyph_height as usize,
            SplitMode::Runs,
        );
        if fragments.len() > 1 {
            debug!("glyph {}: keeping the tallest of {} fragments", idx, fragments.len());
        }
        match sort_masks(fragments, false).first() {
            Some(tallest) => glyphs.push(select_rows(&strip, tallest)),
            None => warn!(
                "glyph {}: no ink run at least {} px tall, skipping speck",
                idx, config.min_glyph_height
            ),
        }
    }

    if glyphs.len() < MIN_GLYPHS_PER_LINE {
        return Err(OCRError::TooFewGlyphs {
            found: glyphs.len(),
            min_width: config.min_glyph_width,
        });
    }
    debug!("{} glyph(s) in a {}x{} line", glyphs.len(), width, height);
    Ok(glyphs)
}
