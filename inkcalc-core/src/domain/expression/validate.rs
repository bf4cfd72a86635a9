use super::BadExpression;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
}

static STRAY_MINUS_AFTER_PAREN: Lazy<Regex> = Lazy::new(|| compile(r"\(\s*-\s+([\d(])"));
static STRAY_LEADING_MINUS: Lazy<Regex> = Lazy::new(|| compile(r"^\s*-\s+([\d(])"));
static DIGIT_GAP: Lazy<Regex> = Lazy::new(|| compile(r"([\d.])\s+([\d.])"));
static OPERATOR_GAP: Lazy<Regex> = Lazy::new(|| compile(r"([-+*/])\s+([-+*/])"));
static EMPTY_PARENS: Lazy<Regex> = Lazy::new(|| compile(r"\([\s+*/-]*\)"));
static ADJACENT_OPERATORS: Lazy<Regex> = Lazy::new(|| compile(r"[-+*/]{2,}"));
static OPERATOR_BETWEEN_PARENS: Lazy<Regex> =
    Lazy::new(|| compile(r"\(\s*[+*/]\s*\(|\)\s*[-+*/]\s*\)"));
static DANGLING_OPERATOR: Lazy<Regex> = Lazy::new(|| compile(r"[-+*/]\s*(?:\)|$)|\(\s*[*/]"));
static MISSING_OPERATOR: Lazy<Regex> = Lazy::new(|| compile(r"[\d.)]\s*\(|\)\s*[\d.]"));
static NUMERAL: Lazy<Regex> = Lazy::new(|| compile(r"[\d.]+"));
static WELL_FORMED_NUMBER: Lazy<Regex> = Lazy::new(|| compile(r"^\d+(?:\.\d+)?$"));

/// An expression accepted by [`validate`].
///
/// The text is normalised and wrapped in one outermost pair of parentheses,
/// e.g. `( 400 + 6 )`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedExpression(pub(super) String);

impl ValidatedExpression {
    /// The full normalised text, outer parentheses included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The normalised text without the outer parentheses.
    pub fn inner(&self) -> &str {
        self.0
            .strip_prefix("( ")
            .and_then(|s| s.strip_suffix(" )"))
            .unwrap_or(&self.0)
    }

    /// Computes the value; see [`super::evaluate`].
    pub fn evaluate(&self) -> Result<super::Number, super::EvaluationError> {
        super::evaluate(self)
    }
}

impl fmt::Display for ValidatedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ValidatedExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Checks and normalises a candidate expression.
///
/// The candidate is a token stream over `0-9 . + - * / ( )` separated by any
/// amount of whitespace. Normalisation, in order:
///
/// 1. a minus separated from its operand right after `(` (or at the very
///    start) is attached to it: `( - 6` becomes `( -6`
/// 2. whitespace between digits is removed, so `4 0 0` reads as `400`
/// 3. whitespace between operators is removed
/// 4. the result is wrapped in `( … )`
///
/// Anything the evaluator could not reduce to a number is rejected, with the
/// reason in the returned [`BadExpression`].
pub fn validate(candidate: &str) -> Result<ValidatedExpression, BadExpression> {
    if let Some(c) = candidate
        .chars()
        .find(|c| !(c.is_ascii_digit() || "+-*/().".contains(*c) || c.is_ascii_whitespace()))
    {
        return Err(BadExpression::AlienCharacter(c));
    }
    match candidate.trim_start().chars().next() {
        None => return Err(BadExpression::Empty),
        Some(c @ ('+' | '*' | '/')) => return Err(BadExpression::LeadingOperator(c)),
        Some(_) => {}
    }
    check_parentheses(candidate)?;

    let processed =
        replace_until_stable(&STRAY_MINUS_AFTER_PAREN, candidate.to_string(), "( -$1");
    let processed = replace_until_stable(&STRAY_LEADING_MINUS, processed, "-$1");
    let processed = replace_until_stable(&DIGIT_GAP, processed, "$1$2");
    let processed = replace_until_stable(&OPERATOR_GAP, processed, "$1$2");
    let processed = processed.trim();

    if let Some(m) = ADJACENT_OPERATORS.find(processed) {
        return Err(BadExpression::AdjacentOperators(m.as_str().to_string()));
    }
    if let Some(m) = OPERATOR_BETWEEN_PARENS.find(processed) {
        return Err(BadExpression::OperatorBetweenParentheses(
            m.as_str().to_string(),
        ));
    }
    if let Some(m) = DANGLING_OPERATOR.find(processed) {
        return Err(BadExpression::DanglingOperator(m.as_str().to_string()));
    }
    if let Some(m) = MISSING_OPERATOR.find(processed) {
        return Err(BadExpression::MissingOperator(m.as_str().to_string()));
    }
    if let Some(m) = NUMERAL
        .find_iter(processed)
        .find(|m| !WELL_FORMED_NUMBER.is_match(m.as_str()))
    {
        return Err(BadExpression::MalformedNumber(m.as_str().to_string()));
    }

    Ok(ValidatedExpression(format!("( {} )", processed)))
}

/// Rejects empty or operator-only parentheses and unbalanced nesting.
fn check_parentheses(candidate: &str) -> Result<(), BadExpression> {
    if EMPTY_PARENS.is_match(candidate) {
        return Err(BadExpression::EmptyParentheses);
    }
    let mut depth: i64 = 0;
    for c in candidate.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(BadExpression::UnbalancedParentheses);
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(BadExpression::UnbalancedParentheses);
    }
    Ok(())
}

/// Applies `pattern` until it no longer matches, so overlapping sites such
/// as the `0 0` in `4 0 0` or nested `( - ( - 6 ) )` are all rewritten.
fn replace_until_stable(pattern: &Regex, mut text: String, replacement: &str) -> String {
    loop {
        text = match pattern.replace_all(&text, replacement) {
            Cow::Borrowed(_) => return text,
            Cow::Owned(next) => next,
        };
    }
}
