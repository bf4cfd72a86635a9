//! Row and column projections of a thresholded page, and the masks built
//! from them.
//!
//! A [`Mask`] always has the full length of the dimension it selects from, so
//! a submask can index straight back into the image it was projected from.

use crate::core::{OCRError, OcrResult};
use image::GrayImage;
use std::ops::Range;

/// The image axis collapsed by a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Axis 0: collapse every column, giving one entry per column (length W).
    Columns,
    /// Axis 1: collapse every row, giving one entry per row (length H).
    Rows,
}

impl TryFrom<usize> for Axis {
    type Error = OCRError;

    fn try_from(axis: usize) -> Result<Self, Self::Error> {
        match axis {
            0 => Ok(Axis::Columns),
            1 => Ok(Axis::Rows),
            _ => Err(OCRError::InvalidAxis { axis }),
        }
    }
}

/// A boolean selector over the rows or the columns of an image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask(Vec<bool>);

impl Mask {
    /// Wraps a boolean vector.
    pub fn new(values: Vec<bool>) -> Self {
        Self(values)
    }

    /// Number of rows or columns the mask selects from.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for a zero-length mask.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected positions.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&v| v).count()
    }

    /// Whether position `idx` is selected.
    pub fn get(&self, idx: usize) -> bool {
        self.0.get(idx).copied().unwrap_or(false)
    }

    /// The underlying values.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Indices of the selected positions, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| v.then_some(i))
    }

    /// Maximal runs of selected positions, in ascending order.
    pub fn runs(&self) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, &v) in self.0.iter().enumerate() {
            match (v, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(s..self.0.len());
        }
        runs
    }

    /// A mask of length `len` selecting exactly `range`.
    pub fn from_range(len: usize, range: Range<usize>) -> Self {
        Self((0..len).map(|i| range.contains(&i)).collect())
    }
}

impl From<Vec<bool>> for Mask {
    fn from(values: Vec<bool>) -> Self {
        Self(values)
    }
}

/// How [`split_mask`] cuts a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// One submask per run.
    #[default]
    Runs,
    /// At most one submask spanning the first to the last selected position.
    Super,
}

/// Projects `img` along `axis` (0 or 1); see [`project_axis`].
///
/// # Errors
///
/// Returns [`OCRError::InvalidAxis`] for any other axis.
pub fn project(img: &GrayImage, axis: usize) -> OcrResult<Mask> {
    Ok(project_axis(img, Axis::try_from(axis)?))
}

/// Marks every column ([`Axis::Columns`]) or row ([`Axis::Rows`]) holding at
/// least one pixel that is not pure white.
pub fn project_axis(img: &GrayImage, axis: Axis) -> Mask {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let raw = img.as_raw();
    match axis {
        Axis::Columns => {
            let mut mask = vec![false; width];
            for row in raw.chunks_exact(width.max(1)).take(height) {
                for (m, &p) in mask.iter_mut().zip(row) {
                    *m |= p != 255;
                }
            }
            Mask(mask)
        }
        Axis::Rows => Mask(
            (0..height)
                .map(|y| raw[y * width..(y + 1) * width].iter().any(|&p| p != 255))
                .collect(),
        ),
    }
}

/// Splits a mask into full-length submasks of at least `minsize` positions.
///
/// In [`SplitMode::Runs`] every run of selected positions becomes one submask,
/// in ascending order; shorter runs are dropped. In [`SplitMode::Super`] the
/// single span from the first to the last selected position is returned when
/// it is long enough. A mask with nothing selected yields no submasks.
pub fn split_mask(mask: &Mask, minsize: usize, mode: SplitMode) -> Vec<Mask> {
    let runs = mask.runs();
    match mode {
        SplitMode::Runs => runs
            .into_iter()
            .filter(|run| run.len() >= minsize)
            .map(|run| Mask::from_range(mask.len(), run))
            .collect(),
        SplitMode::Super => match (runs.first(), runs.last()) {
            (Some(first), Some(last)) if last.end - first.start >= minsize => {
                vec![Mask::from_range(mask.len(), first.start..last.end)]
            }
            _ => Vec::new(),
        },
    }
}

/// Orders masks by their number of selected positions.
///
/// Largest first unless `ascending`; equal sizes keep their original order.
pub fn sort_masks(mut masks: Vec<Mask>, ascending: bool) -> Vec<Mask> {
    if ascending {
        masks.sort_by_key(Mask::count);
    } else {
        masks.sort_by_key(|m| std::cmp::Reverse(m.count()));
    }
    masks
}

/// Copies the rows of `img` selected by `mask`, top to bottom.
pub fn select_rows(img: &GrayImage, mask: &Mask) -> GrayImage {
    let width = img.width();
    let rows: Vec<u32> = mask
        .indices()
        .filter(|&y| y < img.height() as usize)
        .map(|y| y as u32)
        .collect();
    let mut out = GrayImage::new(width, rows.len() as u32);
    for (dst_y, &src_y) in rows.iter().enumerate() {
        for x in 0..width {
            out.put_pixel(x, dst_y as u32, *img.get_pixel(x, src_y));
        }
    }
    out
}

/// Copies the columns of `img` selected by `mask`, left to right.
pub fn select_cols(img: &GrayImage, mask: &Mask) -> GrayImage {
    let height = img.height();
    let cols: Vec<u32> = mask
        .indices()
        .filter(|&x| x < img.width() as usize)
        .map(|x| x as u32)
        .collect();
    let mut out = GrayImage::new(cols.len() as u32, height);
    for y in 0..height {
        for (dst_x, &src_x) in cols.iter().enumerate() {
            out.put_pixel(dst_x as u32, y, *img.get_pixel(src_x, y));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn mask(bits: &str) -> Mask {
        Mask::new(bits.chars().map(|c| c == '1').collect())
    }

    fn page() -> GrayImage {
        let mut img = GrayImage::from_pixel(6, 4, Luma([255]));
        img.put_pixel(1, 0, Luma([0]));
        img.put_pixel(4, 2, Luma([254]));
        img
    }

    #[test]
    fn test_project_marks_any_non_white() {
        let img = page();
        assert_eq!(project(&img, 0).unwrap(), mask("010010"));
        assert_eq!(project(&img, 1).unwrap(), mask("1010"));
    }

    #[test]
    fn test_project_matches_definition() {
        let img = GrayImage::from_fn(9, 7, |x, y| {
            Luma([if (x * 3 + y * 5) % 11 == 0 { 0 } else { 255 }])
        });
        let cols = project_axis(&img, Axis::Columns);
        let rows = project_axis(&img, Axis::Rows);
        for x in 0..9 {
            let expected = (0..7).any(|y| img.get_pixel(x, y).0[0] != 255);
            assert_eq!(cols.get(x as usize), expected);
        }
        for y in 0..7 {
            let expected = (0..9).any(|x| img.get_pixel(x, y).0[0] != 255);
            assert_eq!(rows.get(y as usize), expected);
        }
    }

    #[test]
    fn test_project_invalid_axis() {
        assert!(matches!(
            project(&page(), 2),
            Err(OCRError::InvalidAxis { axis: 2 })
        ));
    }

    #[test]
    fn test_split_mask_runs() {
        let source = mask("0111001101111");
        let parts = split_mask(&source, 1, SplitMode::Runs);
        assert_eq!(
            parts,
            vec![
                mask("0111000000000"),
                mask("0000001100000"),
                mask("0000000001111")
            ]
        );

        let parts = split_mask(&source, 3, SplitMode::Runs);
        assert_eq!(parts, vec![mask("0111000000000"), mask("0000000001111")]);
    }

    #[test]
    fn test_split_mask_invariants() {
        let source = mask("1101110001011111000");
        for minsize in 1..7 {
            let parts = split_mask(&source, minsize, SplitMode::Runs);
            let mut covered = vec![false; source.len()];
            for part in &parts {
                assert_eq!(part.len(), source.len());
                let runs = part.runs();
                assert_eq!(runs.len(), 1);
                assert!(runs[0].len() >= minsize);
                for i in part.indices() {
                    assert!(source.get(i));
                    covered[i] = true;
                }
            }
            // Every dropped position sits in a run shorter than minsize.
            for run in source.runs() {
                if run.clone().any(|i| !covered[i]) {
                    assert!(run.len() < minsize);
                }
            }
        }
    }

    #[test]
    fn test_split_mask_super() {
        let source = mask("0011000110");
        assert_eq!(
            split_mask(&source, 1, SplitMode::Super),
            vec![mask("0011111110")]
        );
        assert!(split_mask(&source, 8, SplitMode::Super).is_empty());
        assert!(split_mask(&mask("0000"), 1, SplitMode::Super).is_empty());
    }

    #[test]
    fn test_split_mask_run_touching_both_ends() {
        let parts = split_mask(&mask("1111"), 4, SplitMode::Runs);
        assert_eq!(parts, vec![mask("1111")]);
    }

    #[test]
    fn test_sort_masks_is_stable() {
        let a = mask("1100000");
        let b = mask("0001110");
        let c = mask("0000001");
        let d = mask("0110000");
        let sorted = sort_masks(vec![a.clone(), b.clone(), c.clone(), d.clone()], false);
        assert_eq!(sorted, vec![b.clone(), a.clone(), d.clone(), c.clone()]);

        let sorted = sort_masks(vec![a.clone(), b.clone(), c.clone(), d.clone()], true);
        assert_eq!(sorted, vec![c, a, d, b]);
    }

    #[test]
    fn test_select_rows_and_cols() {
        let img = GrayImage::from_fn(4, 3, |x, y| Luma([(y * 4 + x) as u8]));
        let rows = select_rows(&img, &mask("101"));
        assert_eq!(rows.dimensions(), (4, 2));
        assert_eq!(rows.as_raw(), &vec![0, 1, 2, 3, 8, 9, 10, 11]);

        let cols = select_cols(&img, &mask("0110"));
        assert_eq!(cols.dimensions(), (2, 3));
        assert_eq!(cols.as_raw(), &vec![1, 2, 5, 6, 9, 10]);
    }
}
