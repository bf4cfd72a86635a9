//! The end-to-end pipeline.
//!
//! [`ExpressionReader`] wires the core stages together: each page is cut into
//! lines, each line into framed glyphs, the glyphs are classified, and the
//! joined labels are validated and evaluated. Results come back as
//! [`ImageReport`]s whose `Display` is the command-line report.

mod config;
mod reader;
mod result;

pub use config::{InkCalcConfig, load_config, parse_config};
pub use reader::ExpressionReader;
pub use result::{ImageReport, LineOutcome, solve};
