//! Constants used throughout the pipeline.
//!
//! The size limits are tuned for phone photographs of a sheet of paper; in
//! practice input images are thousands of pixels on each side.

/// Minimum width of an input page, in pixels.
pub const MIN_IMG_WIDTH: u32 = 500;

/// Minimum height of an input page, in pixels.
pub const MIN_IMG_HEIGHT: u32 = 300;

/// Lowest allowable height of a line of content.
///
/// Everything but `+`, `-` and `*` is at least this tall, and those never
/// appear on a line of their own.
pub const MIN_LINE_HEIGHT: u32 = 50;

/// Lowest allowable width of a glyph; sized for `(` and `)`.
pub const MIN_GLYPH_WIDTH: u32 = 15;

/// Lowest allowable height of a glyph; sized for `-`.
pub const MIN_GLYPH_HEIGHT: u32 = 8;

/// Width of the white class, in standard deviations below the median.
pub const WHITE_SPREAD: f64 = 2.0;

/// Side of the square canvas a glyph is framed into.
pub const GLYPH_FRAME_SIZE: u32 = 28;

/// Side the longer dimension of a glyph is resized to before framing.
pub const GLYPH_BOX_SIZE: u32 = 20;

/// Number of labels the glyph classifier distinguishes.
pub const NUM_GLYPH_CLASSES: usize = 16;

/// Ink sum of a fully inked, unframed 20x20 glyph (20 * 20 * 255, rounded).
pub const MAX_INK_VALUE: f64 = 102_000.0;

/// File name of the classifier model looked up in the working directory.
pub const DEFAULT_MODEL_FILENAME: &str = "glyph_cnn.onnx";

/// The default threshold for parallel processing.
///
/// More images than this are processed on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1;
