use super::expr::Expression;
use super::signal::Signal;

/// An expression that, when true for a bar, selects `signal`.
///
/// Rules are created via [`SignalRulesBuilder`](super::SignalRulesBuilder).
/// Lower `priority` values are checked first, so a `Short` rule at priority 0
/// wins over a `Long` rule at priority 10 when both fire on the same bar.
#[derive(Debug, Clone)]
pub struct SignalRule {
    pub signal: Signal,
    pub source: RuleSource,
    pub priority: u32,
}

/// Either raw text still to be parsed, or an already-built expression.
#[derive(Debug, Clone)]
pub enum RuleSource {
    Text(String),
    Built(Expression),
}

/// A rule whose condition names have been resolved to slot indices for fast
/// per-bar evaluation.
///
/// `leaf_slots[node]` holds the slot of each leaf node, `None` for interior
/// nodes.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) signal: Signal,
    pub(crate) priority: u32,
    pub(crate) expression: Expression,
    pub(crate) leaf_slots: Vec<Option<usize>>,
}
