use thiserror::Error;

use super::signal::Signal;
use crate::ExpressionError;

/// Semantic failures found after a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// Every referenced name missing from the catalog, deduplicated, in order
    /// of first appearance. `position` is that of the first occurrence.
    #[error("{}", unknown_message(.names))]
    UnknownConditions { names: Vec<String>, position: usize },
}

impl SemanticError {
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            SemanticError::UnknownConditions { position, .. } => *position,
        }
    }
}

fn unknown_message(names: &[String]) -> String {
    let noun = if names.len() == 1 {
        "condition"
    } else {
        "conditions"
    };
    format!("unknown {noun}: {}", names.join(", "))
}

/// Evaluation failures. These indicate that the caller built its bindings
/// from something other than the expression being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("no binding supplied for condition '{name}'")]
    MissingBinding { name: String },
}

/// Errors raised while compiling [`SignalRules`](super::SignalRules).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no signal rules defined; at least one rule is required")]
    NoRules,

    #[error("duplicate rule for signal {signal}")]
    DuplicateSignal { signal: Signal },

    #[error("empty expression for signal {signal}")]
    EmptyExpression { signal: Signal },

    #[error("invalid expression for signal {signal}: {source}")]
    Invalid {
        signal: Signal,
        #[source]
        source: ExpressionError,
    },
}
