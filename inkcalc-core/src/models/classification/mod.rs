//! Classification models.

mod glyph_cnn;

pub use glyph_cnn::{
    GlyphClassifier, GlyphCnnConfig, GlyphCnnModel, GlyphCnnModelBuilder, TensorLayout,
};
