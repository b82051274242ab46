mod bindings;
mod catalog;
mod error;
mod expr;
mod indexed_bindings;
mod rule;
mod ruleset;
mod signal;
mod slots;
mod truth_table;
mod validation;
mod value;

pub use bindings::Bindings;
pub use catalog::{ConditionCatalog, ConditionInfo};
pub use error::{CompileError, EvalError, SemanticError};
pub use expr::{condition, Expression, ExpressionNode, NodeId, Operator};
pub use indexed_bindings::{BindingsBuilder, IndexedBindings};
pub(crate) use rule::CompiledRule;
pub use rule::{RuleSource, SignalRule};
pub use ruleset::{SignalRules, SignalRulesBuilder};
pub use signal::Signal;
pub use slots::ConditionSlots;
pub use truth_table::{TruthRow, TruthTable};
pub use validation::ValidationResult;
pub use value::Value;
