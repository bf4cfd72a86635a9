//! Core ONNX Runtime inference engine with support for pooling and configurable sessions.

use super::session::{apply_ort_config, load_session_with};
use crate::core::config::OrtSessionConfig;
use crate::core::errors::OCRError;
use ort::logging::LogLevel;
use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use tracing::debug;

/// A small pool of ONNX Runtime sessions for one model file.
///
/// Sessions are handed out round-robin, so several threads can classify
/// glyphs of different images at the same time.
pub struct OrtInfer {
    pub(super) sessions: Vec<Mutex<Session>>,
    pub(super) next_idx: AtomicUsize,
    pub(super) input_name: String,
    pub(super) output_name: Option<String>,
    pub(super) model_path: PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Creates a new OrtInfer instance with default ONNX Runtime settings and a single session.
    pub fn new(model_path: impl AsRef<Path>, input_name: Option<&str>) -> Result<Self, OCRError> {
        let path = model_path.as_ref();
        let session = load_session_with(path, |builder| builder.with_log_level(LogLevel::Error))?;
        Ok(Self::from_sessions(vec![session], path, input_name))
    }

    /// Creates a new OrtInfer instance, applying the session configuration to
    /// every session of the pool.
    pub fn from_config(
        cfg: &OrtSessionConfig,
        model_path: impl AsRef<Path>,
        input_name: Option<&str>,
    ) -> Result<Self, OCRError> {
        let path = model_path.as_ref();
        let sessions = (0..cfg.pool_size())
            .map(|_| load_session_with(path, |builder| apply_ort_config(builder, cfg)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "loaded {} session(s) for {}",
            sessions.len(),
            path.display()
        );
        Ok(Self::from_sessions(sessions, path, input_name))
    }

    fn from_sessions(sessions: Vec<Session>, path: &Path, input_name: Option<&str>) -> Self {
        let input_name = input_name
            .map(str::to_string)
            .or_else(|| sessions.first().and_then(|s| s.inputs.first()).map(|i| i.name.clone()))
            .unwrap_or_else(|| "x".to_string());
        let model_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown_model".to_string());

        OrtInfer {
            sessions: sessions.into_iter().map(Mutex::new).collect(),
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name: None,
            model_path: path.to_path_buf(),
            model_name,
        }
    }

    /// Overrides the output tensor read after a forward pass.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Name of the input tensor fed on every run.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Name of the output tensor read after a run, when overridden.
    pub fn output_name(&self) -> Option<&str> {
        self.output_name.as_deref()
    }

    /// Number of pooled sessions.
    pub fn pool_size(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_names_and_model_name() {
        let infer = OrtInfer::from_sessions(Vec::new(), Path::new("models/glyph_cnn.onnx"), None);
        assert_eq!(infer.input_name(), "x");
        assert_eq!(infer.output_name(), None);
        assert_eq!(infer.model_name(), "glyph_cnn");

        let infer = OrtInfer::from_sessions(Vec::new(), Path::new("cnn.onnx"), Some("conv2d_input"))
            .with_output_name("dense_1");
        assert_eq!(infer.input_name(), "conv2d_input");
        assert_eq!(infer.output_name(), Some("dense_1"));
        assert_eq!(infer.pool_size(), 0);
    }
}
