use std::fmt;

use super::bindings::Bindings;
use super::catalog::ConditionCatalog;
use super::error::{CompileError, EvalError};
use super::expr::Expression;
use super::indexed_bindings::{BindingsBuilder, IndexedBindings};
use super::rule::{CompiledRule, RuleSource, SignalRule};
use super::signal::Signal;
use super::slots::ConditionSlots;

/// Builder for constructing [`SignalRules`].
///
/// # Example
///
/// ```
/// use strategy_expr::{Bindings, Signal, SignalRules};
///
/// let rules = SignalRules::builder()
///     .rule(Signal::Short, "rsi_overbought AND macd_cross_down", 0)
///     .rule(Signal::Long, "(rsi_oversold AND macd_cross_up) OR ema_cross_up", 10)
///     .compile()
///     .unwrap();
///
/// let bar = Bindings::new()
///     .set("rsi_overbought", false)
///     .set("macd_cross_down", false)
///     .set("rsi_oversold", false)
///     .set("macd_cross_up", false)
///     .set("ema_cross_up", true);
/// assert_eq!(rules.signal(&bar).unwrap(), Signal::Long);
/// ```
#[derive(Debug)]
pub struct SignalRulesBuilder {
    rules: Vec<SignalRule>,
    fallback: Signal,
}

impl Default for SignalRulesBuilder {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Signal::Cash,
        }
    }
}

impl SignalRulesBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule from expression text. Lower priority numbers are checked
    /// first.
    #[must_use]
    pub fn rule(mut self, signal: Signal, source: &str, priority: u32) -> Self {
        self.rules.push(SignalRule {
            signal,
            source: RuleSource::Text(source.to_owned()),
            priority,
        });
        self
    }

    /// Add a rule from an already-built expression.
    #[must_use]
    pub fn rule_expr(mut self, signal: Signal, expression: Expression, priority: u32) -> Self {
        self.rules.push(SignalRule {
            signal,
            source: RuleSource::Built(expression),
            priority,
        });
        self
    }

    /// Signal returned when no rule fires. Defaults to [`Signal::Cash`].
    #[must_use]
    pub fn fallback(mut self, signal: Signal) -> Self {
        self.fallback = signal;
        self
    }

    /// Parse every rule and resolve its conditions to slots.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if there are no rules, a signal has two
    /// rules, or an expression is empty or fails to parse.
    pub fn compile(self) -> Result<SignalRules, CompileError> {
        crate::compile::compile(self.rules, self.fallback, None)
    }

    /// Like [`compile()`](Self::compile), but also rejects conditions missing
    /// from `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] on any structural or semantic failure.
    pub fn compile_with_catalog(
        self,
        catalog: &ConditionCatalog,
    ) -> Result<SignalRules, CompileError> {
        crate::compile::compile(self.rules, self.fallback, Some(catalog))
    }
}

/// Compiled, immutable signal rules. Thread-safe and designed to live behind
/// `Arc` so a backtest can evaluate bars from several workers.
#[derive(Debug)]
pub struct SignalRules {
    /// Sorted by ascending priority.
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) slots: ConditionSlots,
    pub(crate) fallback: Signal,
}

impl SignalRules {
    #[must_use]
    pub fn builder() -> SignalRulesBuilder {
        SignalRulesBuilder::new()
    }

    /// Derive the signal for one bar.
    ///
    /// Every rule is evaluated; the signal of the highest-priority rule that
    /// is true wins, otherwise the fallback signal is returned.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingBinding`] if `bindings` lacks a condition
    /// referenced by any rule. Treat this as a bug in the caller.
    pub fn signal(&self, bindings: &Bindings) -> Result<Signal, EvalError> {
        let values = self.flatten_bindings(bindings);
        crate::evaluate::evaluate_rules(&self.rules, &values, self.fallback)
    }

    /// Create a bindings builder for this rule set. The builder uses the slot
    /// registry to map condition names to pre-resolved indices.
    #[must_use]
    pub fn bindings_builder(&self) -> BindingsBuilder<'_> {
        BindingsBuilder::new(&self.slots)
    }

    /// Derive the signal for one bar from pre-indexed bindings.
    ///
    /// This is the fast path: no name lookup happens at evaluation time.
    ///
    /// # Errors
    ///
    /// Same as [`signal()`](Self::signal).
    pub fn signal_indexed(&self, bindings: &IndexedBindings) -> Result<Signal, EvalError> {
        crate::evaluate::evaluate_rules(&self.rules, bindings.values(), self.fallback)
    }

    /// The expression registered for `signal`, if any.
    #[must_use]
    pub fn expression(&self, signal: Signal) -> Option<&Expression> {
        self.rules
            .iter()
            .find(|r| r.signal == signal)
            .map(|r| &r.expression)
    }

    /// Signals with their priorities, in evaluation order.
    #[must_use]
    pub fn rule_order(&self) -> Vec<(Signal, u32)> {
        self.rules.iter().map(|r| (r.signal, r.priority)).collect()
    }

    /// Every condition referenced by any rule, in slot order.
    #[must_use]
    pub fn conditions(&self) -> Vec<&str> {
        self.slots.iter().collect()
    }

    #[must_use]
    pub fn fallback(&self) -> Signal {
        self.fallback
    }

    fn flatten_bindings(&self, bindings: &Bindings) -> Vec<Option<bool>> {
        self.slots.iter().map(|name| bindings.get(name)).collect()
    }
}

impl fmt::Display for SignalRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SignalRules({} rules, {} conditions, fallback {})",
            self.rules.len(),
            self.slots.len(),
            self.fallback,
        )
    }
}
