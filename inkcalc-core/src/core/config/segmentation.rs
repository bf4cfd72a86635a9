//! Tunables for the projection-based segmenter.

use super::{ConfigError, ConfigValidator};
use crate::core::constants::{
    MIN_GLYPH_HEIGHT, MIN_GLYPH_WIDTH, MIN_IMG_HEIGHT, MIN_IMG_WIDTH, MIN_LINE_HEIGHT,
    WHITE_SPREAD,
};
use serde::{Deserialize, Serialize};

/// Size limits and threshold spread used while cutting a page into glyphs.
///
/// Every field defaults to the value the glyph classifier was trained
/// against, so an empty JSON object deserializes to [`SegmentationConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Minimum width of an input page (and of a line bitmap).
    #[serde(default = "default_min_image_width")]
    pub min_image_width: u32,
    /// Minimum height of an input page.
    #[serde(default = "default_min_image_height")]
    pub min_image_height: u32,
    /// Row runs shorter than this are not lines.
    #[serde(default = "default_min_line_height")]
    pub min_line_height: u32,
    /// Column runs narrower than this are not glyphs.
    #[serde(default = "default_min_glyph_width")]
    pub min_glyph_width: u32,
    /// Vertical runs shorter than this inside a glyph strip are specks.
    #[serde(default = "default_min_glyph_height")]
    pub min_glyph_height: u32,
    /// How many standard deviations below the median still count as paper.
    #[serde(default = "default_white_spread")]
    pub white_spread: f64,
}

fn default_min_image_width() -> u32 {
    MIN_IMG_WIDTH
}

fn default_min_image_height() -> u32 {
    MIN_IMG_HEIGHT
}

fn default_min_line_height() -> u32 {
    MIN_LINE_HEIGHT
}

fn default_min_glyph_width() -> u32 {
    MIN_GLYPH_WIDTH
}

fn default_min_glyph_height() -> u32 {
    MIN_GLYPH_HEIGHT
}

fn default_white_spread() -> f64 {
    WHITE_SPREAD
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_image_width: MIN_IMG_WIDTH,
            min_image_height: MIN_IMG_HEIGHT,
            min_line_height: MIN_LINE_HEIGHT,
            min_glyph_width: MIN_GLYPH_WIDTH,
            min_glyph_height: MIN_GLYPH_HEIGHT,
            white_spread: WHITE_SPREAD,
        }
    }
}

impl SegmentationConfig {
    /// Creates a configuration with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum page dimensions.
    pub fn with_min_image_size(mut self, width: u32, height: u32) -> Self {
        self.min_image_width = width;
        self.min_image_height = height;
        self
    }

    /// Sets the minimum line height.
    pub fn with_min_line_height(mut self, height: u32) -> Self {
        self.min_line_height = height;
        self
    }

    /// Sets the minimum glyph width and height.
    pub fn with_min_glyph_size(mut self, width: u32, height: u32) -> Self {
        self.min_glyph_width = width;
        self.min_glyph_height = height;
        self
    }

    /// Sets the white spread used by the threshold.
    pub fn with_white_spread(mut self, spread: f64) -> Self {
        self.white_spread = spread;
        self
    }
}

impl ConfigValidator for SegmentationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_min_size(self.min_image_width, "min_image_width")?;
        self.validate_min_size(self.min_image_height, "min_image_height")?;
        self.validate_min_size(self.min_line_height, "min_line_height")?;
        self.validate_min_size(self.min_glyph_width, "min_glyph_width")?;
        self.validate_min_size(self.min_glyph_height, "min_glyph_height")?;
        self.validate_non_negative(self.white_spread, "white_spread")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
