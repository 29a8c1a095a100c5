use lexer::LexError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The production did not match at the current position. Productions
    /// restore every token they consumed before returning this.
    #[error("no match at current position")]
    NoMatch,
    /// The lexer produced an `Error` token. Always fatal.
    #[error("lexical error at position {position}: {source}")]
    Lex { position: usize, source: LexError },
}

pub type ParseResult<T> = Result<T, ParseError>;
