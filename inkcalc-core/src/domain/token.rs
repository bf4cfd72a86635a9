//! The sixteen symbols a glyph can be classified as.

use std::fmt;

/// Labels in classifier output order.
///
/// Note that `'0'` sits at index 9, after `'9'`: this is the order the
/// bundled model was trained with.
pub const LABELS: [char; 16] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '+', '-', '*', '/', '(', ')',
];

/// One recognised symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A decimal digit, 0 to 9.
    Digit(u8),
    Plus,
    Minus,
    Times,
    Divide,
    OpenParen,
    CloseParen,
}

impl Token {
    /// Maps a character of the token alphabet to its token.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Token::Digit(d as u8)),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Times),
            '/' => Some(Token::Divide),
            '(' => Some(Token::OpenParen),
            ')' => Some(Token::CloseParen),
            _ => None,
        }
    }

    /// Maps a classifier output index through [`LABELS`].
    pub fn from_class_index(idx: usize) -> Option<Self> {
        LABELS.get(idx).copied().and_then(Self::from_char)
    }

    /// The character this token is written as.
    pub fn as_char(self) -> char {
        match self {
            Token::Digit(d) => char::from(b'0' + d.min(9)),
            Token::Plus => '+',
            Token::Minus => '-',
            Token::Times => '*',
            Token::Divide => '/',
            Token::OpenParen => '(',
            Token::CloseParen => ')',
        }
    }

    /// Returns true for the four arithmetic operators.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            Token::Plus | Token::Minus | Token::Times | Token::Divide
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Renders tokens the way the validator expects them: single spaces between.
pub fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::with_capacity(tokens.len() * 2);
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(token.as_char());
    }
    out
}
