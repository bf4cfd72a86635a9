//! Configuration management for the pipeline.
//!
//! This module provides configuration types, validation traits, and utilities
//! for tuning segmentation, classifier sessions and parallelism.

pub mod errors;
pub mod onnx;
pub mod parallel;
pub mod segmentation;

pub use errors::{ConfigError, ConfigValidator};
pub use onnx::{OrtGraphOptimizationLevel, OrtSessionConfig};
pub use parallel::ParallelPolicy;
pub use segmentation::SegmentationConfig;
