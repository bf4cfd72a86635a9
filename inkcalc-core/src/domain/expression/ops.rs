//! Arithmetic operators and the numbers they produce.

use super::EvaluationError;
use std::fmt;

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Parses an operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Op::Add),
            "-" => Some(Op::Sub),
            "*" => Some(Op::Mul),
            "/" => Some(Op::Div),
            _ => None,
        }
    }

    /// The symbol the operator is written as.
    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
        }
    }

    /// Applies the operator in IEEE-754 double precision.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
        let value = match self {
            Op::Add => lhs + rhs,
            Op::Sub => lhs - rhs,
            Op::Mul => lhs * rhs,
            Op::Div if rhs == 0.0 => return Err(EvaluationError::DivisionByZero),
            Op::Div => lhs / rhs,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::Overflow)
        }
    }
}

/// The value of an expression.
///
/// Whole values display without a decimal point (`7`, not `7.0`), and
/// negative zero displays as `0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Number(f64);

impl Number {
    /// Wraps a finite value.
    pub fn new(value: f64) -> Self {
        Self(if value == 0.0 { 0.0 } else { value })
    }

    /// The value as a float.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the value has no fractional part.
    pub fn is_integer(self) -> bool {
        self.0 == self.0.round()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f64's Display is the shortest round-trip form and never uses an
        // exponent, so the reducer can read it back.
        write!(f, "{}", self.0)
    }
}

impl From<Number> for f64 {
    fn from(number: Number) -> Self {
        number.0
    }
}
