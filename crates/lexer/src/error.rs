use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Malformed input found while scanning. A lexer emits at most one of these,
/// wrapped in an `Error` token, and then stops.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected input")]
    UnexpectedInput,
    #[error("unexpected {0}")]
    Unexpected(String),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid integer literal {text}: {source}")]
    InvalidInteger {
        text: String,
        source: ParseIntError,
    },
    #[error("invalid float literal {text}: {source}")]
    InvalidFloat {
        text: String,
        source: ParseFloatError,
    },
}
