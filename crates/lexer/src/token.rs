use std::{fmt, ops::Range};

use crate::error::LexError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    // Statements and structure
    Up,
    Down,
    End,
    Add,
    Column,
    Table,
    Create,
    Rename,
    Remove,
    Change,
    Index,
    Name,
    Order,
    Asc,
    Desc,
    Unique,
    Raw,
    Timestamps,
    References,
    PrimaryKey,
    // Options
    Default,
    Null,
    Size,
    Precision,
    Scale,
    // Literals
    True,
    False,
    // Data types
    Binary,
    Boolean,
    Date,
    Datetime,
    Decimal,
    Float,
    Integer,
    String,
    Text,
    Time,
    Timestamp,
}

/// Every keyword and its source text, sorted by text so lookups can binary search.
pub const KEYWORDS: &[(&str, Keyword)] = &[
    ("add", Keyword::Add),
    ("asc", Keyword::Asc),
    ("binary", Keyword::Binary),
    ("boolean", Keyword::Boolean),
    ("change", Keyword::Change),
    ("column", Keyword::Column),
    ("create", Keyword::Create),
    ("date", Keyword::Date),
    ("datetime", Keyword::Datetime),
    ("decimal", Keyword::Decimal),
    ("default", Keyword::Default),
    ("desc", Keyword::Desc),
    ("down", Keyword::Down),
    ("end", Keyword::End),
    ("false", Keyword::False),
    ("float", Keyword::Float),
    ("index", Keyword::Index),
    ("integer", Keyword::Integer),
    ("name", Keyword::Name),
    ("null", Keyword::Null),
    ("order", Keyword::Order),
    ("precision", Keyword::Precision),
    ("primary_key", Keyword::PrimaryKey),
    ("raw", Keyword::Raw),
    ("references", Keyword::References),
    ("remove", Keyword::Remove),
    ("rename", Keyword::Rename),
    ("scale", Keyword::Scale),
    ("size", Keyword::Size),
    ("string", Keyword::String),
    ("table", Keyword::Table),
    ("text", Keyword::Text),
    ("time", Keyword::Time),
    ("timestamp", Keyword::Timestamp),
    ("timestamps", Keyword::Timestamps),
    ("true", Keyword::True),
    ("unique", Keyword::Unique),
    ("up", Keyword::Up),
];

pub fn lookup_keyword(text: &str) -> Option<Keyword> {
    KEYWORDS
        .binary_search_by(|&(k, _)| k.cmp(text))
        .ok()
        .map(|i| KEYWORDS[i].1)
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|&&(_, k)| k == self)
            .map_or("", |&(text, _)| text)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    EndOfInput,
    Error,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,
    StringLiteral,
    IntegerLiteral,
    FloatLiteral,
    Keyword(Keyword),
}

/// Decoded payload of a token.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Error(LexError),
    Empty,
}

/// A single lexeme. `start` and `stop` are char offsets into the input, so
/// `stop - start` is the length of `raw` in chars.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    start: usize,
    stop: usize,
    kind: TokenKind,
    raw: String,
    value: Value,
}

impl Token {
    pub fn new(
        start: usize,
        stop: usize,
        kind: TokenKind,
        raw: impl Into<String>,
        value: Value,
    ) -> Self {
        Token {
            start,
            stop,
            kind,
            raw: raw.into(),
            value,
        }
    }

    pub fn end_of_input(position: usize) -> Self {
        Token::new(position, position, TokenKind::EndOfInput, "", Value::Empty)
    }

    pub fn error(position: usize, raw: impl Into<String>, err: LexError) -> Self {
        Token::new(position, position, TokenKind::Error, raw, Value::Error(err))
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.stop
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// True for the two kinds that end a token stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfInput | TokenKind::Error)
    }

    /// Take the wrapped error out of an `Error` token.
    pub fn into_error(self) -> Option<LexError> {
        match self.value {
            Value::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.value) {
            (TokenKind::Error, Value::Error(err)) => write!(f, "{err}"),
            (TokenKind::Error, _) => f.write_str("error value is not an error"),
            (TokenKind::LeftBrace, _) => f.write_str("{"),
            (TokenKind::RightBrace, _) => f.write_str("}"),
            (TokenKind::Comma, _) => f.write_str(","),
            (TokenKind::Colon, _) => f.write_str(":"),
            (TokenKind::StringLiteral, Value::Str(s)) => f.write_str(s),
            (TokenKind::FloatLiteral, Value::Float(n)) => write!(f, "{n:.2}"),
            (TokenKind::IntegerLiteral, Value::Int(n)) => write!(f, "{n}"),
            _ => write!(f, "{:?}", self.raw),
        }
    }
}

#[cfg(test)]
mod token_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keyword_table_is_sorted() {
        let sorted = KEYWORDS.windows(2).all(|w| w[0].0 < w[1].0);

        assert!(sorted, "KEYWORDS must stay sorted for binary search");
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(lookup_keyword("add"), Some(Keyword::Add));
        assert_eq!(lookup_keyword("primary_key"), Some(Keyword::PrimaryKey));
        assert_eq!(lookup_keyword("timestamps"), Some(Keyword::Timestamps));
        assert_eq!(lookup_keyword("addx"), None);
        assert_eq!(lookup_keyword(""), None);
    }

    #[test]
    fn test_keyword_text_round_trips() {
        for &(text, keyword) in KEYWORDS {
            assert_eq!(keyword.as_str(), text);
            assert_eq!(lookup_keyword(keyword.as_str()), Some(keyword));
        }
    }

    #[test]
    fn test_render_structural() {
        let brace = Token::new(0, 1, TokenKind::LeftBrace, "{", Value::Empty);
        let colon = Token::new(1, 2, TokenKind::Colon, ":", Value::Empty);

        assert_eq!(brace.to_string(), "{");
        assert_eq!(colon.to_string(), ":");
    }

    #[test]
    fn test_render_literals() {
        let string = Token::new(
            0,
            7,
            TokenKind::StringLiteral,
            "\"users\"",
            Value::Str(String::from("users")),
        );
        let float = Token::new(0, 7, TokenKind::FloatLiteral, "1.23456", Value::Float(1.23456));
        let int = Token::new(0, 2, TokenKind::IntegerLiteral, "-7", Value::Int(-7));

        assert_eq!(string.to_string(), "users");
        assert_eq!(float.to_string(), "1.23");
        assert_eq!(int.to_string(), "-7");
    }

    #[test]
    fn test_render_keyword_is_quoted() {
        let token = Token::new(
            0,
            2,
            TokenKind::Keyword(Keyword::Up),
            "up",
            Value::Str(String::from("up")),
        );

        assert_eq!(token.to_string(), "\"up\"");
    }

    #[test]
    fn test_render_error() {
        let token = Token::error(4, "addx", LexError::Unexpected(String::from("addx")));

        assert_eq!(token.to_string(), "unexpected addx");
        assert_eq!(token.span(), 4..4);
    }

    #[test]
    fn test_into_error() {
        let token = Token::error(0, "", LexError::UnexpectedInput);
        assert_eq!(token.into_error(), Some(LexError::UnexpectedInput));

        let token = Token::end_of_input(3);
        assert_eq!(token.into_error(), None);
    }
}
