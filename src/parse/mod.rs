//! Text front end: tokenizer and parser.

mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse_tokens, MAX_NESTING};

use crate::Expression;

/// Tokenize and parse an expression string.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a well-formed expression,
/// including when it is empty or whitespace-only.
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    parse_tokens(&tokenize(source))
}
