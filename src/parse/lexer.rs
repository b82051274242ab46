use std::ops::Range;

use winnow::combinator::{alt, repeat};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::stream::LocatingSlice;
use winnow::token::{any, one_of, take_while};

use crate::Operator;

type Input<'i> = LocatingSlice<&'i str>;

/// Lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    And,
    Or,
    LParen,
    RParen,
}

/// A single lexeme of an expression.
///
/// `position` is the 0-based character offset of the first character in the
/// source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::And => Some(Operator::And),
            TokenKind::Or => Some(Operator::Or),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_operator(&self) -> bool {
        self.operator().is_some()
    }

    /// Character offset just past the end of this token.
    #[must_use]
    pub fn end(&self) -> usize {
        self.position + self.text.chars().count()
    }
}

#[derive(Debug, Clone)]
enum Lexeme<'i> {
    Word(&'i str),
    Paren(char),
    Skipped,
}

// -- Lexemes ----------------------------------------------------------------

fn word<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn lexeme<'i>(input: &mut Input<'i>) -> ModalResult<(Lexeme<'i>, Range<usize>)> {
    alt((
        word.map(Lexeme::Word),
        one_of(['(', ')']).map(Lexeme::Paren),
        // Whitespace and anything outside the alphabet are dropped here.
        any.value(Lexeme::Skipped),
    ))
    .with_span()
    .parse_next(input)
}

fn lexemes<'i>(input: &mut Input<'i>) -> ModalResult<Vec<(Lexeme<'i>, Range<usize>)>> {
    repeat(0.., lexeme).parse_next(input)
}

// -- Top-level tokenizer ----------------------------------------------------

/// Split `source` into identifiers, `AND`, `OR` and parentheses.
///
/// Never fails. Characters outside `[A-Za-z0-9_()]` and whitespace are
/// skipped; `AND`/`OR` are matched case-insensitively as whole words.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut input = LocatingSlice::new(source);
    let lexemes = lexemes(&mut input).unwrap_or_default();

    let mut tokens = Vec::with_capacity(lexemes.len());
    let mut chars = CharOffsets::new(source);
    for (lexeme, span) in lexemes {
        let (kind, text) = match lexeme {
            Lexeme::Skipped => continue,
            Lexeme::Paren('(') => (TokenKind::LParen, "("),
            Lexeme::Paren(_) => (TokenKind::RParen, ")"),
            Lexeme::Word(w) if w.eq_ignore_ascii_case("and") => (TokenKind::And, w),
            Lexeme::Word(w) if w.eq_ignore_ascii_case("or") => (TokenKind::Or, w),
            Lexeme::Word(w) => (TokenKind::Identifier, w),
        };
        tokens.push(Token {
            kind,
            text: text.to_owned(),
            position: chars.at(span.start),
        });
    }

    tracing::trace!(tokens = tokens.len(), "tokenized expression");
    tokens
}

/// Converts ascending byte offsets into character offsets in a single pass.
struct CharOffsets<'s> {
    source: &'s str,
    byte: usize,
    chars: usize,
}

impl<'s> CharOffsets<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            byte: 0,
            chars: 0,
        }
    }

    fn at(&mut self, byte: usize) -> usize {
        self.chars += self.source[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}
