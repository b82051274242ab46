//! Local, I/O-free validation of authored expressions.

use crate::parse::{parse_tokens, tokenize, ParseError, ParseErrorKind, Token, TokenKind};
use crate::{ConditionCatalog, Expression, ExpressionError, SemanticError, ValidationResult};

/// Validate `source` against the available conditions without any I/O.
///
/// Blank input is valid: the absence of an expression is for the caller to
/// judge. Otherwise the first structural error, or the complete list of
/// unknown conditions, is reported.
pub fn validate_local(source: &str, catalog: &ConditionCatalog) -> ValidationResult {
    match check_local(source, catalog) {
        Ok(_) => ValidationResult::valid(),
        Err(err) => {
            tracing::debug!(error = %err, position = err.position(), "expression rejected locally");
            ValidationResult::from(&err)
        }
    }
}

/// Like [`validate_local`], but hands back the parsed expression on success.
///
/// Returns `Ok(None)` for blank input.
///
/// # Errors
///
/// Returns [`ExpressionError::Parse`] for structural problems and
/// [`ExpressionError::Semantic`] when conditions are missing from `catalog`.
pub fn check_local(
    source: &str,
    catalog: &ConditionCatalog,
) -> Result<Option<Expression>, ExpressionError> {
    let tokens = tokenize(source);
    if tokens.is_empty() && source.trim().is_empty() {
        return Ok(None);
    }

    prescan(&tokens)?;
    let expr = parse_tokens(&tokens)?;
    check_known(&expr, catalog)?;
    Ok(Some(expr))
}

/// Check every condition of `expr` against `catalog`, collecting all unknown
/// names rather than stopping at the first.
///
/// # Errors
///
/// Returns [`SemanticError::UnknownConditions`] listing each unknown name once.
pub fn check_known(expr: &Expression, catalog: &ConditionCatalog) -> Result<(), SemanticError> {
    let mut names: Vec<String> = Vec::new();
    let mut first_position = None;

    for (name, position) in expr.leaves() {
        if catalog.contains(name) {
            continue;
        }
        first_position.get_or_insert(position);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }

    match first_position {
        None => Ok(()),
        Some(position) => Err(SemanticError::UnknownConditions { names, position }),
    }
}

/// Flat checks that need no grammar: a `)` that closes nothing and two
/// operators in a row. These hold on any prefix, so they fire while the
/// user is still typing.
fn prescan(tokens: &[Token]) -> Result<(), ParseError> {
    let mut depth = 0_usize;
    let mut prev: Option<&Token> = None;

    for tok in tokens {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                if depth == 0 {
                    return Err(ParseError::new(
                        ParseErrorKind::UnbalancedParens,
                        "')' has no matching '('",
                        tok.position,
                    ));
                }
                depth -= 1;
            }
            _ => {}
        }

        if let Some(p) = prev {
            if p.is_operator() && tok.is_operator() {
                return Err(ParseError::new(
                    ParseErrorKind::ConsecutiveOperators,
                    format!("'{}' cannot follow '{}'", tok.text, p.text),
                    tok.position,
                ));
            }
        }
        prev = Some(tok);
    }

    Ok(())
}
