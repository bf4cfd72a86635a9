//! ONNX Runtime configuration types.

use serde::{Deserialize, Serialize};

/// Graph optimization levels for ONNX Runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum OrtGraphOptimizationLevel {
    /// Disable all optimizations.
    DisableAll,
    /// Enable basic optimizations.
    #[default]
    Level1,
    /// Enable extended optimizations.
    Level2,
    /// Enable all optimizations.
    Level3,
}

/// Configuration for ONNX Runtime sessions.
///
/// The glyph classifier is a tiny network, so the defaults leave threading to
/// ONNX Runtime and only quiet its logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrtSessionConfig {
    /// Number of threads used to parallelize execution within nodes
    #[serde(default)]
    pub intra_threads: Option<usize>,
    /// Number of threads used to parallelize execution across nodes
    #[serde(default)]
    pub inter_threads: Option<usize>,
    /// Graph optimization level
    #[serde(default)]
    pub optimization_level: Option<OrtGraphOptimizationLevel>,
    /// Number of sessions kept in the pool for concurrent predictions.
    #[serde(default)]
    pub session_pool_size: Option<usize>,
}

impl OrtSessionConfig {
    /// Creates a new OrtSessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of intra-op threads.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the number of inter-op threads.
    pub fn with_inter_threads(mut self, threads: usize) -> Self {
        self.inter_threads = Some(threads);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: OrtGraphOptimizationLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }

    /// Sets the session pool size.
    pub fn with_session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = Some(size);
        self
    }

    /// Number of sessions to create, never less than one.
    pub fn pool_size(&self) -> usize {
        self.session_pool_size.unwrap_or(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ort_session_config_builder() {
        let config = OrtSessionConfig::new()
            .with_intra_threads(2)
            .with_inter_threads(1)
            .with_optimization_level(OrtGraphOptimizationLevel::Level3)
            .with_session_pool_size(4);

        assert_eq!(config.intra_threads, Some(2));
        assert_eq!(config.inter_threads, Some(1));
        assert_eq!(
            config.optimization_level,
            Some(OrtGraphOptimizationLevel::Level3)
        );
        assert_eq!(config.pool_size(), 4);
    }

    #[test]
    fn test_pool_size_never_zero() {
        let config = OrtSessionConfig::new().with_session_pool_size(0);
        assert_eq!(config.pool_size(), 1);
        assert_eq!(OrtSessionConfig::default().pool_size(), 1);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: OrtSessionConfig =
            serde_json::from_str(r#"{ "intra_threads": 3 }"#).unwrap();
        assert_eq!(config.intra_threads, Some(3));
        assert_eq!(config.optimization_level, None);
    }
}
