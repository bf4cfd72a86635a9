//! Shared parallel processing configuration types.

use serde::{Deserialize, Serialize};

/// Configuration for parallel processing across input images.
///
/// The core stages are single-threaded; parallelism only ever happens across
/// independent images, and results are always reported in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of threads to use for parallel processing.
    /// If None, rayon will use the default thread pool size (typically number of CPU cores).
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Threshold for number of images to process sequentially (<= this uses sequential)
    /// Default: 1 (process single images sequentially, use parallel for multiple images)
    #[serde(default = "ParallelPolicy::default_image_threshold")]
    pub image_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that never leaves the calling thread.
    pub fn sequential() -> Self {
        Self {
            max_threads: Some(1),
            image_threshold: usize::MAX,
        }
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the image processing threshold.
    pub fn with_image_threshold(mut self, threshold: usize) -> Self {
        self.image_threshold = threshold;
        self
    }

    /// Whether a batch of `count` images should be spread over the pool.
    pub fn should_parallelize(&self, count: usize) -> bool {
        count > self.image_threshold && self.max_threads != Some(1)
    }

    /// Default value for image threshold.
    fn default_image_threshold() -> usize {
        crate::core::constants::DEFAULT_PARALLEL_THRESHOLD
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            image_threshold: Self::default_image_threshold(),
        }
    }
}
