use thiserror::Error;

use crate::parse::ParseError;
use crate::SemanticError;

/// Recoverable, user-facing failure of an authored expression.
///
/// Produced by [`check_local()`](crate::check_local) and folded into a
/// [`ValidationResult`](crate::ValidationResult) at the validation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl ExpressionError {
    /// Character offset to highlight in the source text.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            ExpressionError::Parse(err) => err.position(),
            ExpressionError::Semantic(err) => err.position(),
        }
    }

    /// Message suitable for inline display next to the input.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ExpressionError::Parse(err) => err.message().to_owned(),
            ExpressionError::Semantic(err) => err.to_string(),
        }
    }
}
