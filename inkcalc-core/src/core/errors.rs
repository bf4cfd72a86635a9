//! Error types for the recognition pipeline.
//!
//! Every image-side stage reports failures through [`OCRError`]. Expression
//! problems are *not* errors at this level: a rejected candidate is an
//! ordinary value (see [`crate::domain::expression::BadExpression`]).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenient result alias used across the crate.
pub type OcrResult<T> = Result<T, OCRError>;

/// Enum representing the errors that can occur between decoding an image and
/// producing a label sequence.
#[derive(Error, Debug)]
pub enum OCRError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// The input is not an 8-bit three-channel image.
    #[error("the image must be an 8-bit three-channel RGB image, got {channels} channel(s)")]
    InvalidShape {
        /// Number of channels actually found.
        channels: u8,
    },

    /// The input is smaller than the stage accepts.
    #[error("minimum dimensions are {min_width} by {min_height}, got {width} by {height}")]
    InvalidSize {
        /// Required minimum width.
        min_width: u32,
        /// Required minimum height.
        min_height: u32,
        /// Actual width.
        width: u32,
        /// Actual height.
        height: u32,
    },

    /// A projection was requested along an axis other than 0 or 1.
    #[error("invalid projection axis {axis}, expected 0 or 1")]
    InvalidAxis {
        /// The rejected axis.
        axis: usize,
    },

    /// Black and white stretch levels leave no range to stretch.
    #[error("cannot stretch a single value: black level {black} >= white level {white}")]
    InvalidRange {
        /// Effective black level.
        black: u8,
        /// Effective white level.
        white: u8,
    },

    /// No row run tall enough to be a line of content.
    #[error("unable to detect a line of content at least {min_height} pixels high")]
    NoLineFound {
        /// The minimum line height that was required.
        min_height: u32,
    },

    /// Fewer glyph candidates than the smallest expression needs.
    #[error(
        "unable to detect at least 3 consecutive characters at least {min_width} pixels wide, found {found}"
    )]
    TooFewGlyphs {
        /// Number of glyph candidates that survived.
        found: usize,
        /// The minimum glyph width that was required.
        min_width: u32,
    },

    /// Error occurred while loading a classifier model.
    #[error("failed to load model '{}': {context}", path.display())]
    ModelLoad {
        /// Path of the model file.
        path: PathBuf,
        /// What was being attempted.
        context: String,
        /// The underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error occurred while running the classifier.
    #[error("inference with model '{model_name}' failed: {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// What was being attempted.
        context: String,
        /// The underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl OCRError {
    /// Creates a model loading error.
    pub fn model_load_error(
        path: &Path,
        context: &str,
        error: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            context: context.to_string(),
            source: error.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Creates an inference error wrapping an underlying cause.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates an inference error that has no underlying cause.
    pub fn inference_contract(model_name: &str, context: impl Into<String>) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.into(),
            source: None,
        }
    }

    /// Creates an invalid size error from the required and actual dimensions.
    pub fn invalid_size(min: (u32, u32), actual: (u32, u32)) -> Self {
        Self::InvalidSize {
            min_width: min.0,
            min_height: min.1,
            width: actual.0,
            height: actual.1,
        }
    }

    /// Returns true for the kinds raised by the segmentation stages.
    pub fn is_segmentation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidShape { .. }
                | Self::InvalidSize { .. }
                | Self::InvalidAxis { .. }
                | Self::InvalidRange { .. }
                | Self::NoLineFound { .. }
                | Self::TooFewGlyphs { .. }
        )
    }
}

impl From<crate::core::config::ConfigError> for OCRError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
