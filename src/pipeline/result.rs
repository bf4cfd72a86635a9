//! Per-line and per-image outcomes and their text rendering.

use inkcalc_core::core::OCRError;
use inkcalc_core::domain::{BadExpression, EvaluationError, Number, ValidatedExpression, validate};
use std::fmt;
use std::path::PathBuf;

/// What became of one line of content.
#[derive(Debug)]
pub enum LineOutcome {
    /// The labels formed a valid expression with a value.
    Solved {
        expression: ValidatedExpression,
        value: Number,
    },
    /// The labels formed a valid expression that has no value.
    Undefined {
        expression: ValidatedExpression,
        error: EvaluationError,
    },
    /// The labels did not form a valid expression.
    Invalid {
        labels: String,
        reason: BadExpression,
    },
    /// Glyph extraction or classification failed for this line.
    Failed(OCRError),
}

impl LineOutcome {
    /// True when the line produced a value.
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }

    /// The value, if the line was solved.
    pub fn value(&self) -> Option<Number> {
        match self {
            Self::Solved { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// Validates and evaluates a space-joined label string.
pub fn solve(candidate: &str) -> LineOutcome {
    match validate(candidate) {
        Ok(expression) => match expression.evaluate() {
            Ok(value) => LineOutcome::Solved { expression, value },
            Err(error) => LineOutcome::Undefined { expression, error },
        },
        Err(reason) => LineOutcome::Invalid {
            labels: candidate.to_string(),
            reason,
        },
    }
}

impl fmt::Display for LineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solved { expression, value } => write!(f, "{} = {value}", expression.inner()),
            Self::Undefined { expression, error } => {
                write!(f, "{} = undefined ({error})", expression.inner())
            }
            Self::Invalid { labels, .. } => write!(f, "{labels}\nnot a valid expression"),
            Self::Failed(error) => f.write_str(&error_chain(error)),
        }
    }
}

/// Everything read from one image file.
#[derive(Debug)]
pub struct ImageReport {
    /// The file the report is about.
    pub path: PathBuf,
    /// One outcome per line of content, or the error that stopped the image.
    pub outcome: Result<Vec<LineOutcome>, OCRError>,
}

impl ImageReport {
    /// Outcomes of the lines read, empty when the image failed.
    pub fn lines(&self) -> &[LineOutcome] {
        self.outcome.as_deref().unwrap_or(&[])
    }

    /// Number of lines that produced a value.
    pub fn solved_count(&self) -> usize {
        self.lines().iter().filter(|line| line.is_solved()).count()
    }
}

/// Renders the stdout report.
///
/// Every block ends with a newline. The alternate form (`{:#}`), used when
/// several files were given, precedes each block with a blank line and
/// `from <path>:`.
impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks: Vec<String> = match &self.outcome {
            Err(error @ (OCRError::ImageLoad(_) | OCRError::Io(_))) => {
                return writeln!(
                    f,
                    "Error reading image file: {}\n{}",
                    self.path.display(),
                    error_chain(error)
                );
            }
            Err(error) => vec![error_chain(error)],
            Ok(lines) => lines.iter().map(ToString::to_string).collect(),
        };

        for block in blocks {
            if f.alternate() {
                write!(f, "\nfrom {}:\n", self.path.display())?;
            }
            writeln!(f, "{block}")?;
        }
        Ok(())
    }
}

/// Joins an error with its sources, outermost first.
fn error_chain(error: &OCRError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_renders_value() {
        let outcome = solve("4 0 0 + 6");
        assert_eq!(outcome.value().map(f64::from), Some(406.0));
        assert_eq!(outcome.to_string(), "400 + 6 = 406");
    }

    #[test]
    fn test_solve_renders_rejection_with_raw_labels() {
        let outcome = solve("2 + * 3");
        assert!(matches!(outcome, LineOutcome::Invalid { .. }));
        assert_eq!(outcome.to_string(), "2 + * 3\nnot a valid expression");
    }

    #[test]
    fn test_solve_renders_division_by_zero() {
        let outcome = solve("1 / 0");
        assert!(!outcome.is_solved());
        assert_eq!(outcome.to_string(), "1 / 0 = undefined (division by zero)");
    }

    #[test]
    fn test_single_file_report() {
        let report = ImageReport {
            path: PathBuf::from("page.jpg"),
            outcome: Ok(vec![solve("1 + 2"), solve("( 3")]),
        };
        assert_eq!(report.solved_count(), 1);
        assert_eq!(report.to_string(), "1 + 2 = 3\n( 3\nnot a valid expression\n");
    }

    #[test]
    fn test_multi_file_report_names_the_file_per_line() {
        let report = ImageReport {
            path: PathBuf::from("a.png"),
            outcome: Ok(vec![solve("1 + 2"), solve("2 * 3")]),
        };
        assert_eq!(
            format!("{report:#}"),
            "\nfrom a.png:\n1 + 2 = 3\n\nfrom a.png:\n2 * 3 = 6\n"
        );
    }

    #[test]
    fn test_image_level_failures() {
        let report = ImageReport {
            path: PathBuf::from("blank.png"),
            outcome: Err(OCRError::NoLineFound { min_height: 50 }),
        };
        assert!(report.lines().is_empty());
        assert_eq!(
            report.to_string(),
            "unable to detect a line of content at least 50 pixels high\n"
        );

        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "truncated");
        let report = ImageReport {
            path: PathBuf::from("broken.jpg"),
            outcome: Err(OCRError::Io(io)),
        };
        assert_eq!(
            format!("{report:#}"),
            "Error reading image file: broken.jpg\nio: truncated\n"
        );
    }
}
