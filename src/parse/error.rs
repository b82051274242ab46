use std::fmt;

/// Structural failure categories reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// No tokens at all.
    EmptyExpression,
    /// `(` without a matching `)`, or `)` without a matching `(`.
    UnbalancedParens,
    /// Two operators in a row, e.g. `a AND OR b`.
    ConsecutiveOperators,
    /// `()`.
    EmptyGroup,
    /// An operator missing one of its operands.
    DanglingOperator,
    /// A token that cannot appear where it was found, e.g. `a b`.
    UnexpectedToken,
    /// More nested groups than [`MAX_NESTING`](super::MAX_NESTING).
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::EmptyExpression => "empty expression",
            ParseErrorKind::UnbalancedParens => "unbalanced parentheses",
            ParseErrorKind::ConsecutiveOperators => "consecutive operators",
            ParseErrorKind::EmptyGroup => "empty group",
            ParseErrorKind::DanglingOperator => "dangling operator",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::NestingTooDeep => "nesting too deep",
        };
        f.write_str(s)
    }
}

/// A parse error with the character offset of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
    position: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, message: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Human-readable description without the position prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Format the error with a caret pointing at the error position in the input.
    #[must_use]
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!("{input}\n{caret}\n{self}")
    }
}
