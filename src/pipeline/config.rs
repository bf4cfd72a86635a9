//! Configuration for the end-to-end reader and its loading from JSON.

use inkcalc_core::core::config::{
    ConfigError, ConfigValidator, OrtSessionConfig, ParallelPolicy, SegmentationConfig,
};
use inkcalc_core::core::constants::DEFAULT_MODEL_FILENAME;
use inkcalc_core::core::{OCRError, OcrResult};
use inkcalc_core::models::GlyphCnnConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the reader needs, as read from `inkcalc.json`.
///
/// Every section is optional in the file:
///
/// ```json
/// {
///   "model_path": "models/glyph_cnn.onnx",
///   "segmentation": { "min_line_height": 40 },
///   "classifier": { "layout": "NCHW" },
///   "parallel": { "max_threads": 4 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InkCalcConfig {
    /// Path of the glyph classifier ONNX model.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Segmenter limits.
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    /// Classifier input/output configuration.
    #[serde(default)]
    pub classifier: GlyphCnnConfig,
    /// ONNX Runtime session settings.
    #[serde(default)]
    pub ort_session: Option<OrtSessionConfig>,
    /// How many images are read concurrently.
    #[serde(default)]
    pub parallel: ParallelPolicy,
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_FILENAME)
}

impl Default for InkCalcConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            segmentation: SegmentationConfig::default(),
            classifier: GlyphCnnConfig::default(),
            ort_session: None,
            parallel: ParallelPolicy::default(),
        }
    }
}

impl ConfigValidator for InkCalcConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.segmentation.validate()?;
        self.classifier.validate()?;
        if let Some(threads) = self.parallel.max_threads {
            self.validate_thread_count(threads)?;
        }
        if let Some(ort) = &self.ort_session {
            if let Some(threads) = ort.intra_threads {
                self.validate_thread_count(threads)?;
            }
            if let Some(threads) = ort.inter_threads {
                self.validate_thread_count(threads)?;
            }
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Loads and validates a JSON configuration file.
pub fn load_config(path: &Path) -> OcrResult<InkCalcConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| OCRError::ConfigError {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })?;
    parse_config(&content)
}

/// Parses and validates a JSON configuration.
pub fn parse_config(content: &str) -> OcrResult<InkCalcConfig> {
    let config: InkCalcConfig =
        serde_json::from_str(content).map_err(|e| OCRError::ConfigError {
            message: format!("Failed to parse JSON config: {e}"),
        })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkcalc_core::models::TensorLayout;

    #[test]
    fn test_empty_object_is_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, InkCalcConfig::default());
        assert_eq!(config.model_path, PathBuf::from("glyph_cnn.onnx"));
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"{
                "model_path": "models/cnn.onnx",
                "segmentation": { "min_line_height": 40 },
                "classifier": { "layout": "NCHW" },
                "parallel": { "max_threads": 2 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("models/cnn.onnx"));
        assert_eq!(config.segmentation.min_line_height, 40);
        assert_eq!(config.segmentation.min_glyph_width, 15);
        assert_eq!(config.classifier.layout, TensorLayout::Nchw);
        assert_eq!(config.parallel.max_threads, Some(2));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = parse_config(r#"{ "segmentation": { "min_glyph_width": 0 } }"#).unwrap_err();
        assert!(matches!(err, OCRError::ConfigError { .. }));

        let err = parse_config(r#"{ "parallel": { "max_threads": 0 } }"#).unwrap_err();
        assert!(matches!(err, OCRError::ConfigError { .. }));

        assert!(parse_config("not json").is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inkcalc.json");
        std::fs::write(&path, r#"{ "model_path": "x.onnx" }"#).unwrap();
        assert_eq!(
            load_config(&path).unwrap().model_path,
            PathBuf::from("x.onnx")
        );
        assert!(load_config(&dir.path().join("missing.json")).is_err());
    }
}
