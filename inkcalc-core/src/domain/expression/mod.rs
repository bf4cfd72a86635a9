//! Validation and evaluation of recognised arithmetic expressions.
//!
//! Both halves work on text. [`validate`] normalises a whitespace-separated
//! token stream (joining per-digit tokens into numerals, attaching unary
//! minus signs) and rejects anything the reducer could not finish. [`evaluate`]
//! then reduces the normalised text by successive pattern substitutions,
//! innermost parentheses first, then `*` and `/`, then `+` and `-`, each tier
//! left to right.
//!
//! ```
//! use inkcalc_core::domain::expression::{evaluate, validate};
//!
//! let expr = validate("4 0 0 + 6 - ( 1 0 0 - 3 ) * 2 / 8 * 3").unwrap();
//! assert_eq!(expr.inner(), "400 + 6 - ( 100 - 3 ) * 2 / 8 * 3");
//! assert_eq!(evaluate(&expr).unwrap().to_string(), "333.25");
//! ```

mod evaluate;
mod ops;
mod validate;

pub use evaluate::evaluate;
pub use ops::{Number, Op};
pub use validate::{ValidatedExpression, validate};

use thiserror::Error;

/// Why a candidate expression was rejected.
///
/// Rejection is an ordinary outcome for a misread line, not a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadExpression {
    #[error("the expression is empty")]
    Empty,
    #[error("character {0:?} is not part of an expression")]
    AlienCharacter(char),
    #[error("expression starts with the binary operator {0:?}")]
    LeadingOperator(char),
    #[error("parentheses enclose no operand")]
    EmptyParentheses,
    #[error("parentheses are not balanced")]
    UnbalancedParentheses,
    #[error("operators {0:?} are adjacent")]
    AdjacentOperators(String),
    #[error("operator between two matching parentheses in {0:?}")]
    OperatorBetweenParentheses(String),
    #[error("operator without a right-hand operand in {0:?}")]
    DanglingOperator(String),
    #[error("operands without an operator between them in {0:?}")]
    MissingOperator(String),
    #[error("{0:?} is not a number")]
    MalformedNumber(String),
}

/// Why a validated expression has no value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("result exceeds double precision")]
    Overflow,
    #[error("could not reduce {residue:?} to a number")]
    Unreduced { residue: String },
}
