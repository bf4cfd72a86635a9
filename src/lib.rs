//! # inkcalc
//!
//! Reads a handwritten or printed arithmetic expression from a photograph of
//! a sheet of paper and computes its value.
//!
//! ## Features
//!
//! - Projection-based segmentation of a page into lines and glyphs
//! - Glyph classification through an ONNX model (or any [`GlyphClassifier`])
//! - A string-rewriting validator and evaluator with correct precedence and
//!   nested unary minus
//! - Batch reading of many images, optionally in parallel
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration and inference plumbing
//! * [`domain`] - Tokens and the expression validator/evaluator
//! * [`models`] - The glyph classifier
//! * [`pipeline`] - The end-to-end reader and its reports
//! * [`processors`] - Thresholding, projections, segmentation and framing
//! * [`utils`] - Image loading, dataset helpers and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inkcalc::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = ExpressionReader::from_config(&InkCalcConfig::default())?;
//! for report in reader.read_paths(&["page1.jpg", "page2.jpg"]) {
//!     print!("{report:#}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The solver can be used on its own:
//!
//! ```rust
//! use inkcalc::prelude::*;
//!
//! let outcome = solve("2 * ( - 3 + 1 0 )");
//! assert_eq!(outcome.to_string(), "2 * ( -3 + 10 ) = 14");
//! ```
//!
//! [`GlyphClassifier`]: models::GlyphClassifier

pub use inkcalc_core::{core, domain, models, processors, utils};

pub mod pipeline;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use inkcalc_core::prelude::*;

    // Pipeline
    pub use crate::pipeline::{
        ExpressionReader, ImageReport, InkCalcConfig, LineOutcome, load_config, solve,
    };
}
