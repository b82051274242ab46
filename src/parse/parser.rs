use crate::types::{Expression, ExpressionNode, NodeId};

use super::error::{ParseError, ParseErrorKind};
use super::lexer::{Token, TokenKind};

/// Deepest parenthesis nesting the parser accepts. The opening paren one level
/// deeper is reported as [`ParseErrorKind::NestingTooDeep`].
pub const MAX_NESTING: usize = 128;

/// Recursive-descent parser over a token slice.
///
/// ```text
/// expr := term (("AND" | "OR") term)*
/// term := IDENT | "(" expr ")"
/// ```
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    nodes: Vec<ExpressionNode>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            nodes: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn end_position(&self) -> usize {
        self.tokens.last().map_or(0, Token::end)
    }

    fn push(&mut self, node: ExpressionNode) -> NodeId {
        Expression::push(&mut self.nodes, node)
    }

    fn expr(&mut self) -> Result<NodeId, ParseError> {
        let mut acc = self.term()?;

        while let Some(op_tok) = self.peek() {
            let Some(op) = op_tok.operator() else {
                break;
            };
            self.pos += 1;

            let right = match self.peek() {
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::DanglingOperator,
                        format!("expected a condition after '{}'", op_tok.text),
                        op_tok.end(),
                    ));
                }
                Some(next) if next.is_operator() => {
                    return Err(ParseError::new(
                        ParseErrorKind::ConsecutiveOperators,
                        format!("'{}' cannot follow '{}'", next.text, op_tok.text),
                        next.position,
                    ));
                }
                Some(next) if next.kind == TokenKind::RParen => {
                    return Err(ParseError::new(
                        ParseErrorKind::DanglingOperator,
                        format!("expected a condition after '{}'", op_tok.text),
                        op_tok.end(),
                    ));
                }
                Some(_) => self.term()?,
            };

            acc = self.push(ExpressionNode::Binary {
                op,
                left: acc,
                right,
                position: op_tok.position,
            });
        }

        Ok(acc)
    }

    fn term(&mut self) -> Result<NodeId, ParseError> {
        let Some(tok) = self.peek() else {
            return Err(ParseError::new(
                ParseErrorKind::EmptyExpression,
                "expected a condition, found end of input",
                self.end_position(),
            ));
        };

        match tok.kind {
            TokenKind::Identifier => {
                self.pos += 1;
                Ok(self.push(ExpressionNode::Leaf {
                    name: tok.text.clone(),
                    position: tok.position,
                }))
            }
            TokenKind::LParen => self.group(tok),
            TokenKind::RParen => Err(ParseError::new(
                ParseErrorKind::UnbalancedParens,
                "')' has no matching '('",
                tok.position,
            )),
            TokenKind::And | TokenKind::Or => Err(ParseError::new(
                ParseErrorKind::DanglingOperator,
                format!("'{}' has no condition before it", tok.text),
                tok.position,
            )),
        }
    }

    fn group(&mut self, open: &'t Token) -> Result<NodeId, ParseError> {
        if self.depth == MAX_NESTING {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep,
                format!("parentheses nested deeper than {MAX_NESTING} levels"),
                open.position,
            ));
        }
        self.pos += 1;
        match self.peek() {
            None => return Err(unclosed(open)),
            Some(next) if next.kind == TokenKind::RParen => {
                return Err(ParseError::new(
                    ParseErrorKind::EmptyGroup,
                    "empty parentheses",
                    open.position,
                ));
            }
            Some(_) => {}
        }

        self.depth += 1;
        let inner = self.expr()?;
        self.depth -= 1;

        match self.peek() {
            Some(close) if close.kind == TokenKind::RParen => {
                self.pos += 1;
                Ok(self.push(ExpressionNode::Group {
                    inner,
                    position: open.position,
                }))
            }
            Some(other) => Err(unexpected(other)),
            None => Err(unclosed(open)),
        }
    }
}

fn unclosed(open: &Token) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnbalancedParens,
        "'(' is never closed",
        open.position,
    )
}

fn unexpected(tok: &Token) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnexpectedToken,
        format!("unexpected '{}'", tok.text),
        tok.position,
    )
}

/// Parse a token stream into an [`Expression`].
///
/// # Errors
///
/// Returns the first structural [`ParseError`] encountered, left to right.
pub fn parse_tokens(tokens: &[Token]) -> Result<Expression, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::EmptyExpression,
            "expression is empty",
            0,
        ));
    }

    let mut parser = Parser::new(tokens);
    let root = parser.expr()?;

    if let Some(tok) = parser.peek() {
        return Err(match tok.kind {
            TokenKind::RParen => ParseError::new(
                ParseErrorKind::UnbalancedParens,
                "')' has no matching '('",
                tok.position,
            ),
            _ => unexpected(tok),
        });
    }

    Ok(Expression::from_parts(parser.nodes, root))
}

#[cfg(test)]
mod tests {
    use crate::parse::{parse, tokenize};
    use crate::{ExpressionNode, Operator};

    use super::*;

    fn err_of(source: &str) -> ParseError {
        parse(source).expect_err("expected parse failure")
    }

    #[test]
    fn parse_single_condition() {
        let expr = parse("rsi_oversold").unwrap();
        assert!(matches!(
            expr.root_node(),
            ExpressionNode::Leaf { name, position: 0 } if name == "rsi_oversold"
        ));
    }

    #[test]
    fn parse_and_expression() {
        let expr = parse("a AND b").unwrap();
        assert!(matches!(
            expr.root_node(),
            ExpressionNode::Binary { op: Operator::And, position: 2, .. }
        ));
    }

    #[test]
    fn parse_mixed_chain_folds_left() {
        let expr = parse("a AND b OR c").unwrap();
        match expr.root_node() {
            ExpressionNode::Binary {
                op: Operator::Or,
                left,
                right,
                ..
            } => {
                assert!(matches!(
                    expr.node(*left),
                    ExpressionNode::Binary { op: Operator::And, .. }
                ));
                assert!(matches!(
                    expr.node(*right),
                    ExpressionNode::Leaf { name, .. } if name == "c"
                ));
            }
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn or_then_and_also_folds_left() {
        let expr = parse("a OR b AND c").unwrap();
        assert!(matches!(
            expr.root_node(),
            ExpressionNode::Binary { op: Operator::And, .. }
        ));
    }

    #[test]
    fn parse_parenthesized_grouping() {
        let expr = parse("a AND (b OR c)").unwrap();
        match expr.root_node() {
            ExpressionNode::Binary {
                op: Operator::And,
                right,
                ..
            } => match expr.node(*right) {
                ExpressionNode::Group { inner, position } => {
                    assert_eq!(*position, 6);
                    assert!(matches!(
                        expr.node(*inner),
                        ExpressionNode::Binary { op: Operator::Or, .. }
                    ));
                }
                other => panic!("expected Group, got {other:?}"),
            },
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn nested_groups() {
        let expr = parse("((a))").unwrap();
        assert_eq!(expr.node_count(), 3);
        assert_eq!(expr.to_string(), "((a))");
    }

    #[test]
    fn empty_input() {
        let err = parse_tokens(&tokenize("   ")).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::EmptyExpression);
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn trailing_operator_inside_group() {
        let err = err_of("(rsi_oversold AND");
        assert_eq!(err.kind(), ParseErrorKind::DanglingOperator);
        assert_eq!(err.position(), 17);
    }

    #[test]
    fn trailing_operator() {
        let err = err_of("a OR");
        assert_eq!(err.kind(), ParseErrorKind::DanglingOperator);
        assert_eq!(err.position(), 4);
    }

    #[test]
    fn leading_operator() {
        let err = err_of("AND a");
        assert_eq!(err.kind(), ParseErrorKind::DanglingOperator);
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn operator_before_close_paren() {
        let err = err_of("(a AND ) OR b");
        assert_eq!(err.kind(), ParseErrorKind::DanglingOperator);
        assert_eq!(err.position(), 6);
    }

    #[test]
    fn consecutive_operators() {
        let err = err_of("a AND AND b");
        assert_eq!(err.kind(), ParseErrorKind::ConsecutiveOperators);
        assert_eq!(err.position(), 6);

        let err = err_of("a OR and b");
        assert_eq!(err.kind(), ParseErrorKind::ConsecutiveOperators);
    }

    #[test]
    fn empty_group() {
        let err = err_of("a AND ()");
        assert_eq!(err.kind(), ParseErrorKind::EmptyGroup);
        assert_eq!(err.position(), 6);
    }

    #[test]
    fn unclosed_group() {
        let err = err_of("(a AND (b OR c)");
        assert_eq!(err.kind(), ParseErrorKind::UnbalancedParens);
        assert_eq!(err.position(), 0);

        let err = err_of("a AND (");
        assert_eq!(err.kind(), ParseErrorKind::UnbalancedParens);
        assert_eq!(err.position(), 6);
    }

    #[test]
    fn unmatched_close() {
        let err = err_of("a AND b)");
        assert_eq!(err.kind(), ParseErrorKind::UnbalancedParens);
        assert_eq!(err.position(), 7);

        let err = err_of(") a");
        assert_eq!(err.kind(), ParseErrorKind::UnbalancedParens);
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn adjacent_conditions() {
        let err = err_of("a b");
        assert_eq!(err.kind(), ParseErrorKind::UnexpectedToken);
        assert_eq!(err.position(), 2);

        let err = err_of("(a b)");
        assert_eq!(err.kind(), ParseErrorKind::UnexpectedToken);
        assert_eq!(err.position(), 3);

        let err = err_of("a (b)");
        assert_eq!(err.kind(), ParseErrorKind::UnexpectedToken);
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let source = format!("{}a{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(parse(&source).unwrap().node_count(), MAX_NESTING + 1);
    }

    #[test]
    fn nesting_past_the_limit_is_rejected_at_the_paren() {
        let depth = MAX_NESTING + 1;
        let err = err_of(&format!("{}a{}", "(".repeat(depth), ")".repeat(depth)));
        assert_eq!(err.kind(), ParseErrorKind::NestingTooDeep);
        assert_eq!(err.position(), MAX_NESTING);

        let err = err_of(&"(".repeat(10_000));
        assert_eq!(err.kind(), ParseErrorKind::NestingTooDeep);
        assert_eq!(err.position(), MAX_NESTING);
    }

    #[test]
    fn sibling_groups_do_not_accumulate_depth() {
        let source = vec!["(a)"; MAX_NESTING * 2].join(" OR ");
        assert!(parse(&source).is_ok());
    }
}
