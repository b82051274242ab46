use std::collections::HashSet;

use crate::parse::parse;
use crate::types::{CompiledRule, ConditionSlots};
use crate::validate::check_known;
use crate::{
    CompileError, ConditionCatalog, Expression, ExpressionError, ExpressionNode, RuleSource,
    Signal, SignalRule, SignalRules,
};

pub(crate) fn compile(
    rules: Vec<SignalRule>,
    fallback: Signal,
    catalog: Option<&ConditionCatalog>,
) -> Result<SignalRules, CompileError> {
    if rules.is_empty() {
        return Err(CompileError::NoRules);
    }
    check_duplicates(&rules)?;

    let mut slots = ConditionSlots::new();
    let mut compiled = Vec::with_capacity(rules.len());

    for rule in rules {
        let expression = resolve_source(rule.signal, rule.source)?;
        if let Some(catalog) = catalog {
            check_known(&expression, catalog).map_err(|err| CompileError::Invalid {
                signal: rule.signal,
                source: ExpressionError::from(err),
            })?;
        }

        let leaf_slots = expression
            .nodes()
            .map(|(_, node)| match node {
                ExpressionNode::Leaf { name, .. } => Some(slots.register(name)),
                _ => None,
            })
            .collect();

        compiled.push(CompiledRule {
            signal: rule.signal,
            priority: rule.priority,
            expression,
            leaf_slots,
        });
    }

    // Stable: equal priorities keep the order they were added in.
    compiled.sort_by_key(|r| r.priority);

    tracing::debug!(
        rules = compiled.len(),
        conditions = slots.len(),
        fallback = %fallback,
        "compiled signal rules"
    );

    Ok(SignalRules {
        rules: compiled,
        slots,
        fallback,
    })
}

fn check_duplicates(rules: &[SignalRule]) -> Result<(), CompileError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.signal) {
            return Err(CompileError::DuplicateSignal {
                signal: rule.signal,
            });
        }
    }
    Ok(())
}

fn resolve_source(signal: Signal, source: RuleSource) -> Result<Expression, CompileError> {
    match source {
        RuleSource::Built(expression) => Ok(expression),
        RuleSource::Text(text) if text.trim().is_empty() => {
            Err(CompileError::EmptyExpression { signal })
        }
        RuleSource::Text(text) => parse(&text).map_err(|err| CompileError::Invalid {
            signal,
            source: ExpressionError::from(err),
        }),
    }
}
