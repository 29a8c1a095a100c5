use std::collections::VecDeque;

use ast::{Node, NodeChild, NodeKind};
use lexer::{
    token::{Keyword, Token, TokenKind},
    LexError, Lexer, TokenSource,
};

pub mod ast;
pub mod error;
pub mod walk;

pub use error::{ParseError, ParseResult};

/// Keywords accepted by the `dataType` production.
pub const DATA_TYPES: &[Keyword] = &[
    Keyword::Binary,
    Keyword::Boolean,
    Keyword::Date,
    Keyword::Datetime,
    Keyword::Decimal,
    Keyword::Float,
    Keyword::Integer,
    Keyword::PrimaryKey,
    Keyword::References,
    Keyword::String,
    Keyword::Text,
    Keyword::Time,
    Keyword::Timestamp,
];

pub fn parse<S: TokenSource>(source: S) -> ParseResult<Node> {
    Parser::new(source).parse()
}

pub fn parse_str(input: &str) -> ParseResult<Node> {
    parse(Lexer::new(input))
}

type Production<S> = fn(&mut Parser<S>) -> ParseResult<Node>;

/// Backtracking recursive-descent parser for migration files.
///
/// Tokens are pulled from the source on demand. A production that fails
/// hands every token it took back to `pending`, so the next attempt sees
/// exactly the same input.
pub struct Parser<S> {
    source: S,
    pending: VecDeque<Token>,
}

impl<S: TokenSource> Parser<S> {
    pub fn new(source: S) -> Parser<S> {
        Parser {
            source,
            pending: VecDeque::new(),
        }
    }

    pub fn parse(mut self) -> ParseResult<Node> {
        log::debug!("Parsing migration");

        match self.parse_root() {
            Ok(root) => {
                log::debug!("Parsed migration: {} tokens", root.token_count());
                Ok(root)
            }
            Err(err) => {
                log::debug!("Failed to parse migration: {}", err);
                Err(err)
            }
        }
    }

    // root := upStatement downStatement EndOfInput
    fn parse_root(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::Root, |p, node| {
            node.push(p.parse_up_statement()?);
            node.push(p.parse_down_statement()?);
            p.expect_kind(node, TokenKind::EndOfInput)
        })
    }

    // upStatement := 'up' statement* 'end'
    fn parse_up_statement(&mut self) -> ParseResult<Node> {
        self.parse_block(NodeKind::UpStatement, Keyword::Up)
    }

    // downStatement := 'down' statement* 'end'
    fn parse_down_statement(&mut self) -> ParseResult<Node> {
        self.parse_block(NodeKind::DownStatement, Keyword::Down)
    }

    fn parse_block(&mut self, kind: NodeKind, opening: Keyword) -> ParseResult<Node> {
        self.production(kind, |p, node| {
            p.expect_keyword(node, opening)?;
            p.repeat(node, Self::parse_statement)?;
            p.expect_keyword(node, Keyword::End)
        })
    }

    /// statement := addColumn
    ///
    /// New statement forms are added to `alternatives`; they are tried in
    /// order and the first that matches wins.
    fn parse_statement(&mut self) -> ParseResult<Node> {
        let alternatives: [Production<S>; 1] = [Self::parse_add_column];

        self.production(NodeKind::Statement, |p, node| {
            node.push(p.first_match(&alternatives)?);
            Ok(())
        })
    }

    // addColumn := 'add' 'column' tableName ',' dataType (',' optionsBlock)?
    fn parse_add_column(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::AddColumn, |p, node| {
            p.expect_keyword(node, Keyword::Add)?;
            p.expect_keyword(node, Keyword::Column)?;
            node.push(p.parse_table_name()?);
            p.expect_kind(node, TokenKind::Comma)?;
            node.push(p.parse_data_type()?);

            // No comma just means there is no options block. A comma followed
            // by anything but a valid block fails the whole statement.
            if let Some(comma) = p.accept(TokenKind::Comma)? {
                node.push(comma);
                node.push(p.parse_options_block()?);
            }

            Ok(())
        })
    }

    fn parse_table_name(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::TableName, |p, node| {
            p.expect_kind(node, TokenKind::StringLiteral)
        })
    }

    fn parse_data_type(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::DataType, |p, node| {
            p.expect(node, |kind| {
                matches!(kind, TokenKind::Keyword(k) if DATA_TYPES.contains(&k))
            })
        })
    }

    // optionsBlock := '{' option (',' option)* '}'
    fn parse_options_block(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::OptionsBlock, |p, node| {
            p.expect_kind(node, TokenKind::LeftBrace)?;
            node.push(p.parse_option()?);

            while let Some(comma) = p.accept(TokenKind::Comma)? {
                node.push(comma);
                node.push(p.parse_option()?);
            }

            p.expect_kind(node, TokenKind::RightBrace)
        })
    }

    /// option := keyword ':' value, for each form in declaration order.
    fn parse_option(&mut self) -> ParseResult<Node> {
        let forms: [(Keyword, Production<S>); 5] = [
            (Keyword::Default, Self::parse_default_value),
            (Keyword::Null, Self::parse_boolean),
            (Keyword::Size, Self::parse_integer),
            (Keyword::Precision, Self::parse_integer),
            (Keyword::Scale, Self::parse_integer),
        ];

        for (keyword, value) in forms {
            let attempt = self.production(NodeKind::Option, |p, node| {
                p.expect_keyword(node, keyword)?;
                p.expect_kind(node, TokenKind::Colon)?;
                node.push(value(p)?);
                Ok(())
            });

            match attempt {
                Err(ParseError::NoMatch) => continue,
                result => return result,
            }
        }

        Err(ParseError::NoMatch)
    }

    fn parse_default_value(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::DefaultValue, |p, node| {
            p.expect(node, |kind| {
                matches!(
                    kind,
                    TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Null)
                        | TokenKind::FloatLiteral
                        | TokenKind::IntegerLiteral
                        | TokenKind::StringLiteral
                )
            })
        })
    }

    fn parse_boolean(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::Boolean, |p, node| {
            p.expect(node, |kind| {
                matches!(kind, TokenKind::Keyword(Keyword::True | Keyword::False))
            })
        })
    }

    fn parse_integer(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::Integer, |p, node| {
            p.expect_kind(node, TokenKind::IntegerLiteral)
        })
    }

    // No option takes a float yet.
    #[cfg_attr(not(test), allow(dead_code))]
    fn parse_float(&mut self) -> ParseResult<Node> {
        self.production(NodeKind::Float, |p, node| {
            p.expect_kind(node, TokenKind::FloatLiteral)
        })
    }

    /// Run `build` against a fresh node of `kind`. On `NoMatch` every token
    /// the node picked up is handed back before the error is returned.
    fn production<F>(&mut self, kind: NodeKind, build: F) -> ParseResult<Node>
    where
        F: FnOnce(&mut Self, &mut Node) -> ParseResult<()>,
    {
        let mut node = Node::new(kind);

        match build(self, &mut node) {
            Ok(()) => Ok(node),
            Err(ParseError::NoMatch) => {
                log::trace!("Backtracking {}: {} tokens", kind, node.token_count());

                self.backup(node);
                Err(ParseError::NoMatch)
            }
            Err(err) => Err(err),
        }
    }

    /// Try each alternative at the current position until one matches.
    fn first_match(&mut self, alternatives: &[Production<S>]) -> ParseResult<Node> {
        for alternative in alternatives {
            match alternative(self) {
                Err(ParseError::NoMatch) => continue,
                result => return result,
            }
        }

        Err(ParseError::NoMatch)
    }

    /// Append matches of `production` to `node` until one fails to match.
    fn repeat(&mut self, node: &mut Node, production: Production<S>) -> ParseResult<()> {
        loop {
            match production(self) {
                Ok(child) => node.push(child),
                Err(ParseError::NoMatch) => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    /// Attach the next token to `node` if its kind satisfies `matches`.
    fn expect<F>(&mut self, node: &mut Node, matches: F) -> ParseResult<()>
    where
        F: Fn(TokenKind) -> bool,
    {
        let token = self.next()?;

        if matches(token.kind()) {
            node.push(token);
            Ok(())
        } else {
            self.backup_token(token);
            Err(ParseError::NoMatch)
        }
    }

    fn expect_kind(&mut self, node: &mut Node, kind: TokenKind) -> ParseResult<()> {
        self.expect(node, |k| k == kind)
    }

    fn expect_keyword(&mut self, node: &mut Node, keyword: Keyword) -> ParseResult<()> {
        self.expect_kind(node, TokenKind::Keyword(keyword))
    }

    /// Take the next token only if it is of `kind`.
    fn accept(&mut self, kind: TokenKind) -> ParseResult<Option<Token>> {
        let token = self.next()?;

        if token.kind() == kind {
            Ok(Some(token))
        } else {
            self.backup_token(token);
            Ok(None)
        }
    }

    // Pending tokens come first, then the source. Lex errors never go back
    // in the buffer.
    fn next(&mut self) -> ParseResult<Token> {
        let token = match self.pending.pop_front() {
            Some(token) => token,
            None => self.source.next_token(),
        };

        if token.kind() == TokenKind::Error {
            let position = token.start();
            let source = token.into_error().unwrap_or(LexError::UnexpectedInput);

            return Err(ParseError::Lex { position, source });
        }

        Ok(token)
    }

    /// Return every token held under `node` to the front of the buffer,
    /// keeping their input order.
    fn backup(&mut self, node: Node) {
        for child in node.into_children().into_iter().rev() {
            match child {
                NodeChild::Leaf(token) => self.backup_token(token),
                NodeChild::Branch(node) => self.backup(node),
            }
        }
    }

    fn backup_token(&mut self, token: Token) {
        self.pending.push_front(token);
    }
}
