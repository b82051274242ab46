use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ExpressionError;

/// Verdict on an authored expression, ready for inline display.
///
/// Produced either by local validation or by a remote authority; a remote
/// verdict, when present, replaces the local one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub struct ValidationResult {
    valid: bool,
    error_message: Option<String>,
    error_position: Option<usize>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error_message: None,
            error_position: None,
        }
    }

    pub fn invalid(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            valid: false,
            error_message: Some(message.into()),
            error_position: position,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Character offset of the first error, for highlighting.
    #[must_use]
    pub fn error_position(&self) -> Option<usize> {
        self.error_position
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl From<&ExpressionError> for ValidationResult {
    fn from(err: &ExpressionError) -> Self {
        Self::invalid(err.message(), Some(err.position()))
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return write!(f, "valid");
        }
        write!(f, "invalid")?;
        if let Some(pos) = self.error_position {
            write!(f, " at {pos}")?;
        }
        if let Some(msg) = &self.error_message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}
