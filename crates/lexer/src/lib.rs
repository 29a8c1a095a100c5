use std::{iter::Peekable, str::Chars};

use token::*;

pub mod error;
pub mod token;

pub use error::LexError;

/// Anything the parser can pull tokens from, one at a time.
///
/// Implementations must keep returning a terminal token (`EndOfInput` or
/// `Error`) once the underlying input is done.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }
}

/// Pull-based scanner over a stream of chars.
///
/// Every call to `next_token` scans exactly one token. Once the input is
/// exhausted every call returns `EndOfInput`. The first malformed lexeme yields
/// a single `Error` token, after which the lexer halts and only returns
/// `EndOfInput`.
pub struct Lexer<I: Iterator<Item = char>> {
    input: Peekable<I>,
    lexeme: String,
    start: usize,
    pos: usize,
    halted: bool,
    drained: bool,
}

impl<'a> Lexer<Chars<'a>> {
    pub fn new(buf: &'a str) -> Self {
        Lexer::from_chars(buf.chars())
    }
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn from_chars(input: I) -> Self {
        Lexer {
            input: input.peekable(),
            lexeme: String::new(),
            start: 0,
            pos: 0,
            halted: false,
            drained: false,
        }
    }

    /// Current offset into the input, in chars.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn next_token(&mut self) -> Token {
        if self.halted {
            return Token::end_of_input(self.pos);
        }

        self.skip_whitespace();

        self.start = self.pos;
        self.lexeme.clear();

        let Some(&ch) = self.input.peek() else {
            return Token::end_of_input(self.pos);
        };

        let result = match ch {
            '{' => Ok(self.single(TokenKind::LeftBrace)),
            '}' => Ok(self.single(TokenKind::RightBrace)),
            ',' => Ok(self.single(TokenKind::Comma)),
            ':' => Ok(self.single(TokenKind::Colon)),
            '"' => self.scan_string(),
            c if c == '-' || c.is_ascii_digit() => self.scan_number(),
            c if c.is_lowercase() => self.scan_word(),
            _ => Err(LexError::UnexpectedInput),
        };

        match result {
            Ok(token) => token,
            Err(err) => {
                log::debug!("Lex error at {}: {}", self.pos, err);

                self.halted = true;
                Token::error(self.pos, std::mem::take(&mut self.lexeme), err)
            }
        }
    }

    /// Consume one char, appending it to the current lexeme.
    fn bump(&mut self) -> Option<char> {
        let ch = self.input.next()?;
        self.pos += 1;
        self.lexeme.push(ch);

        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.input.next_if(|c| c.is_whitespace()).is_some() {
            self.pos += 1;
        }
    }

    fn emit(&mut self, kind: TokenKind, value: Value) -> Token {
        let raw = std::mem::take(&mut self.lexeme);
        Token::new(self.start, self.pos, kind, raw, value)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        self.bump();
        self.emit(kind, Value::Empty)
    }

    /// Scan a double-quoted string. A backslash escapes the char after it.
    fn scan_string(&mut self) -> Result<Token, LexError> {
        // Opening quote
        self.bump();

        let mut value = String::new();

        loop {
            match self.bump() {
                Some('"') => return Ok(self.emit(TokenKind::StringLiteral, Value::Str(value))),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(LexError::UnterminatedString),
                },
                Some(ch) => value.push(ch),
                None => return Err(LexError::UnterminatedString),
            }
        }
    }

    /// Scan an integer or float literal. At most one `-` and at most one of
    /// `.`, `e` or `E` are accepted; the rest is left to `str::parse`.
    fn scan_number(&mut self) -> Result<Token, LexError> {
        let mut signed = false;
        let mut float = false;

        while let Some(&ch) = self.input.peek() {
            match ch {
                '-' if signed => return Err(LexError::UnexpectedInput),
                '-' => signed = true,
                '.' | 'e' | 'E' if float => return Err(LexError::UnexpectedInput),
                '.' | 'e' | 'E' => float = true,
                c if c.is_ascii_digit() => {}
                _ => break,
            }

            self.bump();
        }

        if float {
            let n = self
                .lexeme
                .parse::<f64>()
                .map_err(|source| LexError::InvalidFloat {
                    text: self.lexeme.clone(),
                    source,
                })?;

            Ok(self.emit(TokenKind::FloatLiteral, Value::Float(n)))
        } else {
            let n = self
                .lexeme
                .parse::<i64>()
                .map_err(|source| LexError::InvalidInteger {
                    text: self.lexeme.clone(),
                    source,
                })?;

            Ok(self.emit(TokenKind::IntegerLiteral, Value::Int(n)))
        }
    }

    /// Scan a run of lowercase letters and underscores, which must be a keyword.
    fn scan_word(&mut self) -> Result<Token, LexError> {
        while self
            .input
            .peek()
            .is_some_and(|&c| c.is_lowercase() || c == '_')
        {
            self.bump();
        }

        match lookup_keyword(&self.lexeme) {
            Some(keyword @ (Keyword::True | Keyword::False)) => Ok(self.emit(
                TokenKind::Keyword(keyword),
                Value::Bool(keyword == Keyword::True),
            )),
            Some(keyword) => {
                let text = self.lexeme.clone();
                Ok(self.emit(TokenKind::Keyword(keyword), Value::Str(text)))
            }
            None => Err(LexError::Unexpected(self.lexeme.clone())),
        }
    }
}

impl<I: Iterator<Item = char>> TokenSource for Lexer<I> {
    fn next_token(&mut self) -> Token {
        Lexer::next_token(self)
    }
}

/// Yields tokens up to and including the first `EndOfInput` or `Error`.
impl<I: Iterator<Item = char>> Iterator for Lexer<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.drained {
            return None;
        }

        let token = Lexer::next_token(self);
        self.drained = token.is_terminal();

        Some(token)
    }
}
