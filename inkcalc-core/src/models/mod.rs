//! Model implementations.
//!
//! * `classification` - The glyph classifier collaborator

pub mod classification;

pub use classification::{
    GlyphClassifier, GlyphCnnConfig, GlyphCnnModel, GlyphCnnModelBuilder, TensorLayout,
};
