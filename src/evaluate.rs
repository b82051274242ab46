use crate::types::CompiledRule;
use crate::{
    Bindings, EvalError, Expression, ExpressionNode, NodeId, Signal, TruthRow, TruthTable,
};

/// Largest condition set for which [`enumerate_truth_table`] produces a table
/// (2^4 = 16 rows).
pub const MAX_TRUTH_TABLE_CONDITIONS: usize = 4;

/// Evaluate `expr` against one set of bindings.
///
/// Evaluation follows the tree exactly as parsed: chains fold left, groups
/// pass their inner value through.
///
/// # Errors
///
/// Returns [`EvalError::MissingBinding`] for the first referenced condition
/// (left to right) that has no entry in `bindings`.
pub fn evaluate(expr: &Expression, bindings: &Bindings) -> Result<bool, EvalError> {
    eval_node(expr, expr.root(), &|_, name| bindings.get(name))
}

fn eval_node<F>(expr: &Expression, id: NodeId, lookup: &F) -> Result<bool, EvalError>
where
    F: Fn(NodeId, &str) -> Option<bool>,
{
    let (first, links) = expr.chain(id);
    let mut acc = eval_operand(expr, first, lookup)?;
    for (op, right) in links {
        let r = eval_operand(expr, right, lookup)?;
        acc = op.apply(acc, r);
    }
    Ok(acc)
}

fn eval_operand<F>(expr: &Expression, id: NodeId, lookup: &F) -> Result<bool, EvalError>
where
    F: Fn(NodeId, &str) -> Option<bool>,
{
    match expr.node(id) {
        ExpressionNode::Leaf { name, .. } => {
            lookup(id, name).ok_or_else(|| EvalError::MissingBinding { name: name.clone() })
        }
        ExpressionNode::Group { inner, .. } => eval_node(expr, *inner, lookup),
        ExpressionNode::Binary { .. } => eval_node(expr, id, lookup),
    }
}

/// Enumerate every assignment of `conditions` and the result of `expr` under
/// each.
///
/// Rows are ordered by binary counting with `conditions[0]` as the most
/// significant bit. A name listed twice is one column, kept at its first
/// position. Returns `Ok(None)` when more than [`MAX_TRUTH_TABLE_CONDITIONS`]
/// distinct conditions are given.
///
/// # Errors
///
/// Returns [`EvalError::MissingBinding`] if `expr` references a condition
/// not listed in `conditions`.
pub fn enumerate_truth_table(
    expr: &Expression,
    conditions: &[&str],
) -> Result<Option<TruthTable>, EvalError> {
    let mut columns: Vec<&str> = Vec::with_capacity(conditions.len());
    for &name in conditions {
        if !columns.contains(&name) {
            columns.push(name);
        }
    }

    let n = columns.len();
    if n > MAX_TRUTH_TABLE_CONDITIONS {
        return Ok(None);
    }

    let mut rows = Vec::with_capacity(1 << n);
    for combo in 0..(1_usize << n) {
        let values: Vec<bool> = (0..n).map(|i| combo & (1 << (n - 1 - i)) != 0).collect();
        let bindings: Bindings = columns.iter().copied().zip(values.iter().copied()).collect();
        let result = evaluate(expr, &bindings)?;
        rows.push(TruthRow::new(values, result));
    }

    let names = columns.iter().map(|c| (*c).to_owned()).collect();
    Ok(Some(TruthTable::new(names, rows)))
}

/// Evaluate all compiled rules against slot values and pick the signal of the
/// first rule (in priority order) that is true.
///
/// Every rule is evaluated even after one fires, so a missing binding is
/// never masked by an earlier match.
pub(crate) fn evaluate_rules(
    rules: &[CompiledRule],
    values: &[Option<bool>],
    fallback: Signal,
) -> Result<Signal, EvalError> {
    let mut chosen = None;

    for rule in rules {
        let slots = &rule.leaf_slots;
        let fired = eval_node(&rule.expression, rule.expression.root(), &|id, _| {
            slots[id.index()].and_then(|slot| values.get(slot).copied().flatten())
        })?;
        if fired && chosen.is_none() {
            chosen = Some(rule.signal);
        }
    }

    Ok(chosen.unwrap_or(fallback))
}
