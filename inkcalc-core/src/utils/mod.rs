//! Utility functions for the pipeline.
//!
//! This module provides image loading, dataset-building helpers used while
//! curating classifier training data, and logging setup.

pub mod dataset;
pub mod image;

pub use dataset::{InkSample, MatchedFile, find_outliers, ink_fraction, list_matching_files};
pub use image::{dynamic_to_rgb, load_image};

/// Initializes the tracing subscriber for logging.
///
/// Log records go to stderr; stdout is reserved for recognition reports.
/// Verbosity is read from `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
