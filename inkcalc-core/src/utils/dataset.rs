//! Helpers for curating glyph training data.
//!
//! None of this runs during recognition. The functions are used when scanning
//! folders of photographed pages and pruning badly segmented glyphs from a
//! labelled set before training the classifier.

use crate::core::constants::MAX_INK_VALUE;
use crate::core::{OCRError, OcrResult};
use image::GrayImage;
use itertools::Itertools;
use regex::Regex;
use std::path::{Path, PathBuf};

/// A file whose name matched a dataset pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    /// The text captured by the first group of the pattern.
    pub id: String,
    /// Full path of the file.
    pub path: PathBuf,
}

/// Lists the files in `folder` whose names match `pattern` from the start.
///
/// The pattern must have at least one capture group; its first group becomes
/// the file id (e.g. `page_(\d+)\.jpg` yields the page number). Entries are
/// returned sorted by file name.
pub fn list_matching_files(folder: &Path, pattern: &str) -> OcrResult<Vec<MatchedFile>> {
    let regex = Regex::new(pattern).map_err(|e| OCRError::InvalidInput {
        message: format!("invalid file name pattern '{}': {}", pattern, e),
    })?;
    if regex.captures_len() < 2 {
        return Err(OCRError::InvalidInput {
            message: format!("file name pattern '{}' has no capture group", pattern),
        });
    }

    let mut matched = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(caps) = regex.captures(name) else {
            continue;
        };
        if caps.get(0).is_some_and(|m| m.start() != 0) {
            continue;
        }
        let id = caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        matched.push(MatchedFile {
            id,
            path: entry.path(),
        });
    }
    matched.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(matched)
}

/// Fraction of the maximum ink a 20x20 glyph can hold.
///
/// Works on framed glyphs (ink bright, background zero); the black frame adds
/// nothing to the sum.
pub fn ink_fraction(glyph: &GrayImage) -> f64 {
    let total: u64 = glyph.as_raw().iter().map(|&p| u64::from(p)).sum();
    total as f64 / MAX_INK_VALUE
}

/// One labelled glyph in a training set.
#[derive(Debug, Clone, PartialEq)]
pub struct InkSample {
    /// Writing style of the page the glyph came from (e.g. "print", "hand").
    pub script_style: String,
    /// Label assigned to the glyph.
    pub label: char,
    /// Value returned by [`ink_fraction`].
    pub ink_fraction: f64,
}

/// Returns the indices of samples whose ink fraction is an outlier.
///
/// Samples are grouped by style and label; within a group, a sample is an
/// outlier when it falls outside `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`. Quartiles use
/// linear interpolation between order statistics. Indices are ascending.
pub fn find_outliers(samples: &[InkSample]) -> Vec<usize> {
    let groups = samples
        .iter()
        .enumerate()
        .into_group_map_by(|&(_, s)| (s.script_style.as_str(), s.label));

    let mut outliers: Vec<usize> = groups
        .values()
        .flat_map(|members| {
            let sorted: Vec<f64> = members
                .iter()
                .map(|(_, s)| s.ink_fraction)
                .sorted_by(|a, b| a.total_cmp(b))
                .collect();
            let q1 = quantile(&sorted, 0.25);
            let q3 = quantile(&sorted, 0.75);
            let iqr = q3 - q1;
            let (low, high) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
            members
                .iter()
                .filter(move |(_, s)| s.ink_fraction < low || s.ink_fraction > high)
                .map(|(idx, _)| *idx)
                .collect::<Vec<_>>()
        })
        .collect();
    outliers.sort_unstable();
    outliers
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
