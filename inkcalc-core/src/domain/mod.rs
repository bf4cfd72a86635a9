//! Domain types: recognised symbols and the expressions they spell.

pub mod expression;
pub mod token;

pub use expression::{
    BadExpression, EvaluationError, Number, Op, ValidatedExpression, evaluate, validate,
};
pub use token::{LABELS, Token, join_tokens};
