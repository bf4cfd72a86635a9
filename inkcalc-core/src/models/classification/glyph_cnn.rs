//! Glyph CNN classification model
//!
//! A small convolutional network mapping a framed 28x28 glyph to one of the
//! sixteen expression symbols, run through ONNX Runtime.

use crate::core::config::{ConfigError, ConfigValidator, OrtSessionConfig};
use crate::core::constants::{GLYPH_FRAME_SIZE, NUM_GLYPH_CLASSES};
use crate::core::inference::OrtInfer;
use crate::core::{OCRError, OcrResult, Tensor2D, Tensor4D};
use crate::domain::{LABELS, Token};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const MODEL_NAME: &str = "glyph_cnn";

/// Anything that can name the symbol in a framed glyph.
pub trait GlyphClassifier: Send + Sync {
    /// Classifies a batch of framed 28x28 glyphs, one token per glyph.
    fn classify_batch(&self, glyphs: &[GrayImage]) -> OcrResult<Vec<Token>>;

    /// Classifies a single framed glyph.
    fn classify(&self, glyph: &GrayImage) -> OcrResult<Token> {
        self.classify_batch(std::slice::from_ref(glyph))?
            .into_iter()
            .next()
            .ok_or_else(|| OCRError::inference_contract(MODEL_NAME, "no prediction for glyph"))
    }
}

/// Memory layout of the model input tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TensorLayout {
    /// `[N, 28, 28, 1]`, as exported from Keras.
    #[default]
    #[serde(rename = "NHWC")]
    Nhwc,
    /// `[N, 1, 28, 28]`, as exported from PyTorch.
    #[serde(rename = "NCHW")]
    Nchw,
}

/// Configuration for the glyph CNN input and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphCnnConfig {
    /// Input tensor layout.
    #[serde(default)]
    pub layout: TensorLayout,
    /// Factor applied to raw pixel bytes; 1.0 feeds 0..255.
    #[serde(default = "default_pixel_scale")]
    pub pixel_scale: f32,
    /// Input tensor name; the first model input when unset.
    #[serde(default)]
    pub input_name: Option<String>,
    /// Output tensor name; the first model output when unset.
    #[serde(default)]
    pub output_name: Option<String>,
    /// Label for each output index.
    #[serde(default = "default_labels")]
    pub labels: Vec<char>,
}

fn default_pixel_scale() -> f32 {
    1.0
}

fn default_labels() -> Vec<char> {
    LABELS.to_vec()
}

impl Default for GlyphCnnConfig {
    fn default() -> Self {
        Self {
            layout: TensorLayout::default(),
            pixel_scale: default_pixel_scale(),
            input_name: None,
            output_name: None,
            labels: default_labels(),
        }
    }
}

impl GlyphCnnConfig {
    /// Output index to token table.
    fn tokens(&self) -> Result<Vec<Token>, ConfigError> {
        self.labels
            .iter()
            .map(|&c| {
                Token::from_char(c).ok_or_else(|| ConfigError::InvalidConfig {
                    message: format!("label {:?} is not an expression symbol", c),
                })
            })
            .collect()
    }
}

impl ConfigValidator for GlyphCnnConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.len() != NUM_GLYPH_CLASSES {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "expected {} labels, got {}",
                    NUM_GLYPH_CLASSES,
                    self.labels.len()
                ),
            });
        }
        self.tokens()?;
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.0) {
            return Err(ConfigError::InvalidConfig {
                message: format!("pixel_scale must be positive, got {}", self.pixel_scale),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Glyph CNN backed by an ONNX Runtime session pool.
#[derive(Debug)]
pub struct GlyphCnnModel {
    inference: OrtInfer,
    config: GlyphCnnConfig,
    tokens: Vec<Token>,
}

impl GlyphCnnModel {
    /// Stacks framed glyphs into the model input tensor.
    pub fn preprocess(&self, glyphs: &[GrayImage]) -> OcrResult<Tensor4D> {
        glyph_batch(glyphs, &self.config)
    }

    /// Runs inference on the preprocessed batch, giving `[N, 16]` scores.
    pub fn infer(&self, batch_tensor: &Tensor4D) -> OcrResult<Tensor2D> {
        self.inference.infer_2d(batch_tensor)
    }

    /// Maps the best-scoring index of every row to its token.
    pub fn postprocess(&self, scores: &Tensor2D) -> OcrResult<Vec<Token>> {
        decode_scores(scores, &self.tokens)
    }

    /// Performs complete forward pass: preprocess -> infer -> postprocess.
    pub fn forward(&self, glyphs: &[GrayImage]) -> OcrResult<Vec<Token>> {
        if glyphs.is_empty() {
            return Ok(Vec::new());
        }
        let batch = self.preprocess(glyphs)?;
        let scores = self.infer(&batch)?;
        self.postprocess(&scores)
    }

    /// The configuration the model was built with.
    pub fn config(&self) -> &GlyphCnnConfig {
        &self.config
    }
}

impl GlyphClassifier for GlyphCnnModel {
    fn classify_batch(&self, glyphs: &[GrayImage]) -> OcrResult<Vec<Token>> {
        self.forward(glyphs)
    }
}

/// Builder for the glyph CNN.
#[derive(Debug, Default)]
pub struct GlyphCnnModelBuilder {
    config: GlyphCnnConfig,
    ort_config: Option<OrtSessionConfig>,
}

impl GlyphCnnModelBuilder {
    /// Creates a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model configuration.
    pub fn config(mut self, config: GlyphCnnConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the input tensor layout.
    pub fn layout(mut self, layout: TensorLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.ort_config = Some(config);
        self
    }

    /// Builds the model from an ONNX file.
    ///
    /// # Errors
    ///
    /// [`OCRError::ConfigError`] for an invalid configuration and
    /// [`OCRError::ModelLoad`] when the file cannot be opened as a model.
    pub fn build(self, model_path: &Path) -> OcrResult<GlyphCnnModel> {
        self.config.validate()?;
        let tokens = self.config.tokens()?;
        let input_name = self.config.input_name.as_deref();
        let mut inference = match &self.ort_config {
            Some(ort_config) => OrtInfer::from_config(ort_config, model_path, input_name)?,
            None => OrtInfer::new(model_path, input_name)?,
        };
        if let Some(output_name) = &self.config.output_name {
            inference = inference.with_output_name(output_name.as_str());
        }
        debug!(
            "glyph classifier loaded from {} (input '{}', output {:?}, {:?})",
            model_path.display(),
            inference.input_name(),
            inference.output_name(),
            self.config.layout
        );
        Ok(GlyphCnnModel {
            inference,
            config: self.config,
            tokens,
        })
    }
}

/// Packs framed glyphs into a batch tensor in the configured layout.
fn glyph_batch(glyphs: &[GrayImage], config: &GlyphCnnConfig) -> OcrResult<Tensor4D> {
    let side = GLYPH_FRAME_SIZE as usize;
    let shape = match config.layout {
        TensorLayout::Nhwc => (glyphs.len(), side, side, 1),
        TensorLayout::Nchw => (glyphs.len(), 1, side, side),
    };
    let mut batch = Tensor4D::zeros(shape);
    for (n, glyph) in glyphs.iter().enumerate() {
        if glyph.dimensions() != (GLYPH_FRAME_SIZE, GLYPH_FRAME_SIZE) {
            return Err(OCRError::InvalidInput {
                message: format!(
                    "glyph {} is {}x{}, expected a framed {}x{} glyph",
                    n,
                    glyph.width(),
                    glyph.height(),
                    GLYPH_FRAME_SIZE,
                    GLYPH_FRAME_SIZE
                ),
            });
        }
        for (x, y, pixel) in glyph.enumerate_pixels() {
            let value = f32::from(pixel.0[0]) * config.pixel_scale;
            let (x, y) = (x as usize, y as usize);
            match config.layout {
                TensorLayout::Nhwc => batch[[n, y, x, 0]] = value,
                TensorLayout::Nchw => batch[[n, 0, y, x]] = value,
            }
        }
    }
    Ok(batch)
}

/// Arg-max decoding of `[N, C]` scores through the label table.
fn decode_scores(scores: &Tensor2D, tokens: &[Token]) -> OcrResult<Vec<Token>> {
    scores
        .outer_iter()
        .enumerate()
        .map(|(n, row)| {
            let best = row
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(idx, _)| idx)
                .ok_or_else(|| OCRError::inference_contract(MODEL_NAME, "empty score row"))?;
            tokens.get(best).copied().ok_or_else(|| {
                OCRError::inference_contract(
                    MODEL_NAME,
                    format!(
                        "glyph {}: class index {} is outside the {}-label table",
                        n,
                        best,
                        tokens.len()
                    ),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use ndarray::array;

    fn default_tokens() -> Vec<Token> {
        GlyphCnnConfig::default().tokens().unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = GlyphCnnConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.labels[9], '0');
    }

    #[test]
    fn test_config_rejects_bad_labels() {
        let mut config = GlyphCnnConfig::default();
        config.labels.pop();
        assert!(config.validate().is_err());

        let mut config = GlyphCnnConfig::default();
        config.labels[0] = 'x';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config: GlyphCnnConfig =
            serde_json::from_str(r#"{ "layout": "NCHW", "pixel_scale": 0.00392 }"#).unwrap();
        assert_eq!(config.layout, TensorLayout::Nchw);
        assert_eq!(config.output_name, None);
        assert_eq!(config.labels, LABELS.to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_glyph_batch_layouts() {
        let mut glyph = GrayImage::new(28, 28);
        glyph.put_pixel(3, 5, Luma([200]));
        let glyphs = vec![GrayImage::new(28, 28), glyph];

        let nhwc = glyph_batch(&glyphs, &GlyphCnnConfig::default()).unwrap();
        assert_eq!(nhwc.shape(), &[2, 28, 28, 1]);
        assert_eq!(nhwc[[1, 5, 3, 0]], 200.0);
        assert_eq!(nhwc[[0, 5, 3, 0]], 0.0);

        let config = GlyphCnnConfig {
            layout: TensorLayout::Nchw,
            pixel_scale: 0.5,
            ..GlyphCnnConfig::default()
        };
        let nchw = glyph_batch(&glyphs, &config).unwrap();
        assert_eq!(nchw.shape(), &[2, 1, 28, 28]);
        assert_eq!(nchw[[1, 0, 5, 3]], 100.0);
    }

    #[test]
    fn test_glyph_batch_rejects_unframed() {
        let glyphs = vec![GrayImage::new(20, 28)];
        assert!(matches!(
            glyph_batch(&glyphs, &GlyphCnnConfig::default()),
            Err(OCRError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_decode_scores_argmax() {
        let mut scores = Tensor2D::zeros((3, 16));
        scores[[0, 9]] = 0.9;
        scores[[1, 0]] = 0.6;
        scores[[2, 13]] = 0.7;
        let tokens = decode_scores(&scores, &default_tokens()).unwrap();
        assert_eq!(tokens, vec![Token::Digit(0), Token::Digit(1), Token::Divide]);
    }

    #[test]
    fn test_decode_scores_outside_table() {
        let scores = array![[0.0f32, 0.1, 0.9]];
        let tokens = &default_tokens()[..2];
        assert!(matches!(
            decode_scores(&scores, tokens),
            Err(OCRError::Inference { .. })
        ));
    }

    #[test]
    fn test_config_tensor_names_from_json() {
        let config: GlyphCnnConfig = serde_json::from_str(
            r#"{ "input_name": "conv2d_input", "output_name": "dense_1" }"#,
        )
        .unwrap();
        assert_eq!(config.input_name.as_deref(), Some("conv2d_input"));
        assert_eq!(config.output_name.as_deref(), Some("dense_1"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build_without_model_file() {
        let err = GlyphCnnModelBuilder::new()
            .build(Path::new("missing/glyph_cnn.onnx"))
            .unwrap_err();
        assert!(matches!(err, OCRError::ModelLoad { .. }));
    }
}
