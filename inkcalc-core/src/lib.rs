//! # inkcalc core
//!
//! Core types, processors and models for reading a handwritten or printed
//! arithmetic expression from a photograph and computing its value.
//!
//! This crate provides:
//! - Error handling types
//! - A projection-based segmenter cutting a page into framed glyphs
//! - The glyph classifier seam and its ONNX implementation
//! - The expression validator and evaluator
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration, constants and inference plumbing
//! * [`domain`] - Tokens and the expression validator/evaluator
//! * [`models`] - The glyph classifier
//! * [`processors`] - Thresholding, projections, segmentation and framing
//! * [`utils`] - Image loading, dataset helpers and logging setup

pub mod core;
pub mod domain;
pub mod models;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error Handling
    pub use crate::core::{OCRError, OcrResult};

    // Configuration
    pub use crate::core::config::{ConfigValidator, OrtSessionConfig, SegmentationConfig};

    // Domain types
    pub use crate::domain::{
        BadExpression, EvaluationError, Number, Token, ValidatedExpression, evaluate, validate,
    };

    // Classifier
    pub use crate::models::{GlyphClassifier, GlyphCnnConfig, GlyphCnnModel, GlyphCnnModelBuilder};

    // Segmentation
    pub use crate::processors::{extract_glyphs, extract_lines, frame_glyph};

    // Image Utilities
    pub use crate::utils::{init_tracing, load_image};
}
