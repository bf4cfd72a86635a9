//! Image processing for the glyph segmenter.
//!
//! # Modules
//!
//! * `levels` - Desaturation, linear stretch and the page threshold
//! * `projection` - Row/column projections and mask splitting
//! * `segmentation` - Line and glyph extraction
//! * `framing` - Centring a glyph into the classifier frame

mod framing;
mod levels;
mod projection;
mod segmentation;

pub use framing::frame_glyph;
pub use levels::{autostretch, autothreshold, autothreshold_with, desaturate, desaturate_rgb};
pub use projection::{
    Axis, Mask, SplitMode, project, project_axis, select_cols, select_rows, sort_masks,
    split_mask,
};
pub use segmentation::{extract_glyphs, extract_glyphs_with, extract_lines, extract_lines_with};
