//! Command-line calculator for photographed arithmetic expressions.
//!
//! Every argument is an image file. Each line of content found in an image is
//! read, validated and evaluated, and one report per line is printed to
//! stdout. Logging goes to stderr and is controlled by `RUST_LOG`.
//!
//! The classifier model and limits come from `inkcalc.json` in the working
//! directory when it exists; otherwise `glyph_cnn.onnx` is loaded from the
//! working directory with default limits.

use clap::Parser;
use inkcalc::pipeline::{ExpressionReader, InkCalcConfig, load_config};
use inkcalc::utils::init_tracing;
use std::path::{Path, PathBuf};
use tracing::{error, info};

const CONFIG_FILENAME: &str = "inkcalc.json";

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "inkcalc")]
#[command(about = "Reads arithmetic expressions from photographs and evaluates them")]
struct Args {
    /// Paths to input image files
    paths: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    if args.paths.is_empty() {
        println!("Provide valid image filenames as command line arguments.");
        return Ok(());
    }

    let (existing, missing): (Vec<&PathBuf>, Vec<&PathBuf>) =
        args.paths.iter().partition(|p| p.exists());
    if existing.is_empty() {
        println!("No existing file name was specified.");
        return Ok(());
    }
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        println!("Could not found: {}", names.join(" "));
    }

    let config_path = Path::new(CONFIG_FILENAME);
    let config = if config_path.is_file() {
        info!("Using configuration from {}", config_path.display());
        load_config(config_path)?
    } else {
        InkCalcConfig::default()
    };

    let reader = ExpressionReader::from_config(&config).inspect_err(|e| {
        error!("Failed to load the glyph classifier: {e}");
    })?;

    let several = args.paths.len() > 1;
    for report in reader.read_paths(&existing) {
        if several {
            print!("{report:#}");
        } else {
            print!("{report}");
        }
    }

    Ok(())
}
