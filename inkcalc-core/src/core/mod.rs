//! The core module of the recognition pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Tensor aliases for batched classifier input
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling
//! - Inference engine integration

pub mod batch;
pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;

pub use crate::utils::{init_tracing, load_image};
pub use batch::{Tensor2D, Tensor4D};
pub use config::{
    ConfigError, ConfigValidator, OrtGraphOptimizationLevel, OrtSessionConfig, ParallelPolicy,
    SegmentationConfig,
};
pub use constants::*;
pub use errors::{OCRError, OcrResult};
pub use inference::{OrtInfer, load_session};
