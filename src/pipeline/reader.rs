//! The end-to-end reader: page → lines → glyphs → labels → value.

use super::config::InkCalcConfig;
use super::result::{ImageReport, LineOutcome, solve};
use image::{DynamicImage, GrayImage};
use inkcalc_core::core::config::{ConfigValidator, ParallelPolicy, SegmentationConfig};
use inkcalc_core::core::{OcrResult, load_image};
use inkcalc_core::domain::join_tokens;
use inkcalc_core::models::{GlyphClassifier, GlyphCnnModelBuilder};
use inkcalc_core::processors::{extract_glyphs_with, extract_lines_with, frame_glyph};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reads arithmetic expressions from photographs and evaluates them.
///
/// Failures are contained where they happen: a failing line is reported as
/// [`LineOutcome::Failed`] and the remaining lines are still read; a failing
/// image is reported in its [`ImageReport`] and the remaining images are still
/// read.
#[derive(Clone)]
pub struct ExpressionReader {
    classifier: Arc<dyn GlyphClassifier>,
    segmentation: SegmentationConfig,
    parallel: ParallelPolicy,
}

impl std::fmt::Debug for ExpressionReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionReader")
            .field("segmentation", &self.segmentation)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl ExpressionReader {
    /// Creates a reader around any classifier, with default limits.
    pub fn new(classifier: Arc<dyn GlyphClassifier>) -> Self {
        Self {
            classifier,
            segmentation: SegmentationConfig::default(),
            parallel: ParallelPolicy::default(),
        }
    }

    /// Validates the configuration and loads the ONNX classifier it names.
    ///
    /// # Errors
    ///
    /// Returns the validation error, or [`OCRError::ModelLoad`] when the model
    /// cannot be loaded.
    ///
    /// [`OCRError::ModelLoad`]: inkcalc_core::core::OCRError::ModelLoad
    pub fn from_config(config: &InkCalcConfig) -> OcrResult<Self> {
        config.validate()?;

        let mut builder = GlyphCnnModelBuilder::new().config(config.classifier.clone());
        if let Some(ort) = &config.ort_session {
            builder = builder.with_ort_config(ort.clone());
        }
        let model = builder.build(&config.model_path)?;
        info!("Loaded glyph classifier from {}", config.model_path.display());

        Ok(Self::new(Arc::new(model))
            .with_segmentation(config.segmentation.clone())
            .with_parallel_policy(config.parallel.clone()))
    }

    pub fn with_segmentation(mut self, segmentation: SegmentationConfig) -> Self {
        self.segmentation = segmentation;
        self
    }

    pub fn with_parallel_policy(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    /// Classifies the glyphs of one line and joins the labels with spaces.
    pub fn read_labels(&self, line: &GrayImage) -> OcrResult<String> {
        let glyphs = extract_glyphs_with(line, &self.segmentation)?;
        let framed = glyphs
            .iter()
            .map(frame_glyph)
            .collect::<OcrResult<Vec<_>>>()?;
        let tokens = self.classifier.classify_batch(&framed)?;
        Ok(join_tokens(&tokens))
    }

    /// Reads and solves one line of content.
    pub fn read_line(&self, line: &GrayImage) -> LineOutcome {
        match self.read_labels(line) {
            Ok(labels) => {
                debug!("labels: {labels}");
                solve(&labels)
            }
            Err(e) => {
                debug!("line failed: {e}");
                LineOutcome::Failed(e)
            }
        }
    }

    /// Reads every line of a decoded page, top to bottom.
    ///
    /// # Errors
    ///
    /// Line extraction errors; per-line errors are inside the outcomes.
    pub fn read_image(&self, img: &DynamicImage) -> OcrResult<Vec<LineOutcome>> {
        let lines = extract_lines_with(img, &self.segmentation)?;
        Ok(lines.iter().map(|line| self.read_line(line)).collect())
    }

    /// Decodes and reads one image file.
    pub fn read_path(&self, path: &Path) -> ImageReport {
        let outcome =
            load_image(path).and_then(|rgb| self.read_image(&DynamicImage::ImageRgb8(rgb)));
        match &outcome {
            Ok(lines) => info!(
                "{}: {} line(s), {} solved",
                path.display(),
                lines.len(),
                lines.iter().filter(|line| line.is_solved()).count()
            ),
            Err(e) => warn!("{}: {e}", path.display()),
        }
        ImageReport {
            path: path.to_path_buf(),
            outcome,
        }
    }

    /// Reads many image files; reports come back in argument order.
    ///
    /// More images than the policy threshold are read on a rayon pool,
    /// limited to `max_threads` when set.
    pub fn read_paths<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<ImageReport> {
        let sequential = || -> Vec<ImageReport> {
            paths.iter().map(|p| self.read_path(p.as_ref())).collect()
        };
        if !self.parallel.should_parallelize(paths.len()) {
            debug!("Reading {} image(s) sequentially", paths.len());
            return sequential();
        }

        debug!("Reading {} images in parallel", paths.len());
        let parallel = || -> Vec<ImageReport> {
            paths.par_iter().map(|p| self.read_path(p.as_ref())).collect()
        };
        match self.parallel.max_threads {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(parallel),
                Err(e) => {
                    warn!("Failed to build a {threads}-thread pool, reading sequentially: {e}");
                    sequential()
                }
            },
            None => parallel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;
    use inkcalc_core::core::OCRError;
    use inkcalc_core::domain::Token;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Answers each batch with the next scripted label string.
    struct ScriptedClassifier(Mutex<Vec<&'static str>>);

    impl ScriptedClassifier {
        fn new(script: &[&'static str]) -> Arc<Self> {
            Arc::new(Self(Mutex::new(script.to_vec())))
        }
    }

    impl GlyphClassifier for ScriptedClassifier {
        fn classify_batch(&self, glyphs: &[GrayImage]) -> OcrResult<Vec<Token>> {
            assert!(glyphs.iter().all(|g| g.dimensions() == (28, 28)));
            let mut script = self.0.lock().unwrap();
            if script.is_empty() {
                return Err(OCRError::inference_contract("scripted", "script exhausted"));
            }
            let labels = script.remove(0);
            Ok(labels
                .split_whitespace()
                .filter_map(|s| s.chars().next().and_then(Token::from_char))
                .collect())
        }
    }

    /// Reads every glyph as a seven.
    struct Sevens;

    impl GlyphClassifier for Sevens {
        fn classify_batch(&self, glyphs: &[GrayImage]) -> OcrResult<Vec<Token>> {
            Ok(vec![Token::Digit(7); glyphs.len()])
        }
    }

    fn ink(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32) {
        draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, h), Rgb([30, 30, 30]));
    }

    /// Two lines of three glyphs each.
    fn page() -> RgbImage {
        let mut img = RgbImage::from_pixel(600, 400, Rgb([240, 240, 240]));
        for x in [50, 200, 350] {
            ink(&mut img, x, 60, 40, 70);
            ink(&mut img, x, 220, 40, 70);
        }
        img
    }

    #[test]
    fn test_read_image_solves_each_line() {
        let reader = ExpressionReader::new(ScriptedClassifier::new(&["1 + 2", "8 / 0"]));
        let outcomes = reader
            .read_image(&DynamicImage::ImageRgb8(page()))
            .unwrap();
        let rendered: Vec<String> = outcomes.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["1 + 2 = 3", "8 / 0 = undefined (division by zero)"]
        );
    }

    #[test]
    fn test_failing_line_does_not_stop_the_image() {
        let reader = ExpressionReader::new(ScriptedClassifier::new(&["( 7 )"]));
        let outcomes = reader
            .read_image(&DynamicImage::ImageRgb8(page()))
            .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].to_string(), "( 7 ) = 7");
        assert!(matches!(
            outcomes[1],
            LineOutcome::Failed(OCRError::Inference { .. })
        ));
    }

    #[test]
    fn test_invalid_labels_are_reported_raw() {
        let reader = ExpressionReader::new(ScriptedClassifier::new(&["+ 1 2", "1 ( 2"]));
        let outcomes = reader
            .read_image(&DynamicImage::ImageRgb8(page()))
            .unwrap();
        assert_eq!(outcomes[0].to_string(), "+ 1 2\nnot a valid expression");
        assert_eq!(outcomes[1].to_string(), "1 ( 2\nnot a valid expression");
    }

    #[test]
    fn test_custom_segmentation_limits() {
        let reader = ExpressionReader::new(Arc::new(Sevens))
            .with_segmentation(SegmentationConfig::default().with_min_line_height(80));
        assert!(matches!(
            reader.read_image(&DynamicImage::ImageRgb8(page())),
            Err(OCRError::NoLineFound { min_height: 80 })
        ));
    }

    #[test]
    fn test_read_paths_keeps_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("page.png");
        page().save(&good).unwrap();
        let blank = dir.path().join("blank.png");
        RgbImage::from_pixel(600, 400, Rgb([255, 255, 255]))
            .save(&blank)
            .unwrap();
        let broken = dir.path().join("broken.jpg");
        std::fs::write(&broken, b"not an image").unwrap();

        let paths = vec![broken, good.clone(), blank, good];
        for policy in [
            ParallelPolicy::sequential(),
            ParallelPolicy::new(),
            ParallelPolicy::new().with_max_threads(Some(2)),
        ] {
            let reader = ExpressionReader::new(Arc::new(Sevens)).with_parallel_policy(policy);
            let reports = reader.read_paths(&paths);
            let order: Vec<PathBuf> = reports.iter().map(|r| r.path.clone()).collect();
            assert_eq!(order, paths);

            assert!(matches!(reports[0].outcome, Err(OCRError::ImageLoad(_))));
            assert_eq!(reports[1].to_string(), "777 = 777\n777 = 777\n");
            assert!(matches!(
                reports[2].outcome,
                Err(OCRError::NoLineFound { .. })
            ));
            assert_eq!(reports[3].solved_count(), 2);
        }
    }
}
