//! Parse, validate, evaluate and visualize boolean expressions over named
//! trading-indicator conditions such as
//! `(rsi_oversold AND macd_cross_up) OR ema_cross_up`.
//!
//! `AND` and `OR` have equal precedence and fold left; parentheses are the
//! only way to regroup. Everything except [`remote`] is pure and synchronous.

mod compile;
mod error;
mod evaluate;
mod hierarchy;
mod parse;
pub mod remote;
mod types;
mod validate;

pub use error::ExpressionError;
pub use evaluate::{enumerate_truth_table, evaluate, MAX_TRUTH_TABLE_CONDITIONS};
pub use hierarchy::{
    build_display_tree, DisplayCondition, DisplayEntry, DisplayGroup, DisplayItem,
};
pub use parse::{
    parse, parse_tokens, tokenize, ParseError, ParseErrorKind, Token, TokenKind, MAX_NESTING,
};
pub use types::{
    condition, Bindings, BindingsBuilder, CompileError, ConditionCatalog, ConditionInfo,
    ConditionSlots, EvalError, Expression, ExpressionNode, IndexedBindings, NodeId, Operator,
    RuleSource, SemanticError, Signal, SignalRule, SignalRules, SignalRulesBuilder, TruthRow,
    TruthTable, ValidationResult, Value,
};
pub use validate::{check_known, check_local, validate_local};
