use super::{EvaluationError, Number, Op, ValidatedExpression};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
}

/// Parentheses with no parentheses inside.
static INNERMOST_PARENS: Lazy<Regex> = Lazy::new(|| compile(r"\(([^()]+)\)"));

/// `a * b` or `a / b`; both operands may carry a minus sign.
static MULTIPLICATIVE: Lazy<Regex> =
    Lazy::new(|| compile(r"(-?\d+(?:\.\d+)?)\s*([*/])\s*(-)?\s*(\d+(?:\.\d+)?)"));

/// `a + b` or `a - b`; both operands may carry a minus sign.
static ADDITIVE: Lazy<Regex> =
    Lazy::new(|| compile(r"(-?\d+(?:\.\d+)?)\s*([+-])\s*(-)?\s*(\d+(?:\.\d+)?)"));

static MINUS_RUN: Lazy<Regex> = Lazy::new(|| compile(r"-{2,}"));

/// Computes the value of a validated expression.
///
/// Innermost parentheses are replaced by the value of their contents until
/// none remain; within parentheses-free text, `*` and `/` are reduced left to
/// right before `+` and `-`. Between substitutions runs of minus signs
/// cancel pairwise (`--` reads as `+`).
///
/// # Errors
///
/// [`EvaluationError::DivisionByZero`] and [`EvaluationError::Overflow`] when
/// an operation leaves the finite doubles; [`EvaluationError::Unreduced`] if
/// the text does not reduce to a single number.
pub fn evaluate(expr: &ValidatedExpression) -> Result<Number, EvaluationError> {
    let mut text = tidy_signs(expr.as_str());
    while let Some((range, content)) = innermost_group(&text) {
        let value = reduce_flat(&content)?;
        text = tidy_signs(&splice(&text, range, &value.to_string()));
    }
    reduce_flat(&text)
}

fn innermost_group(text: &str) -> Option<(Range<usize>, String)> {
    let caps = INNERMOST_PARENS.captures(text)?;
    Some((caps.get(0)?.range(), caps.get(1)?.as_str().to_string()))
}

/// Reduces text without parentheses to a number.
fn reduce_flat(content: &str) -> Result<Number, EvaluationError> {
    let mut text = tidy_signs(content);
    for tier in [&*MULTIPLICATIVE, &*ADDITIVE] {
        while let Some(caps) = tier.captures(&text) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            let range = whole.range();
            let value = apply_operation(&caps)?;

            let mut replacement = value.to_string();
            // A non-negative result right after a number has absorbed the
            // binary minus before it; keep an explicit operator.
            if value.value() >= 0.0
                && text[..range.start]
                    .trim_end()
                    .ends_with(|c: char| c.is_ascii_digit() || c == '.')
            {
                replacement.insert(0, '+');
            }
            text = tidy_signs(&splice(&text, range, &replacement));
        }
    }

    let residue = text.trim();
    residue
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Number::new)
        .ok_or_else(|| EvaluationError::Unreduced {
            residue: residue.to_string(),
        })
}

/// Evaluates one `lhs op [-]rhs` match.
fn apply_operation(caps: &Captures<'_>) -> Result<Number, EvaluationError> {
    let unreduced = || EvaluationError::Unreduced {
        residue: caps
            .get(0)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    };
    let number = |idx: usize| -> Result<f64, EvaluationError> {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(unreduced)
    };

    let lhs = number(1)?;
    let op = caps
        .get(2)
        .and_then(|m| Op::from_symbol(m.as_str()))
        .ok_or_else(unreduced)?;
    let rhs = number(4)?;
    let rhs = if caps.get(3).is_some() { -rhs } else { rhs };
    Ok(Number::new(op.apply(lhs, rhs)?))
}

/// Cancels runs of minus signs pairwise and turns a leading `+` into `0+`.
fn tidy_signs(text: &str) -> String {
    let collapsed = MINUS_RUN.replace_all(text, |caps: &Captures<'_>| {
        if caps[0].len() % 2 == 0 { "+" } else { "-" }
    });
    let start = collapsed.len() - collapsed.trim_start().len();
    if collapsed[start..].starts_with('+') {
        format!("{}0{}", &collapsed[..start], &collapsed[start..])
    } else {
        collapsed.into_owned()
    }
}

fn splice(text: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    out
}
