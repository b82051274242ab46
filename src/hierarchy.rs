//! Display-oriented regrouping of an [`Expression`] for collapsible rendering.
//!
//! A left-folded chain such as `a AND b OR c` is one level of siblings with
//! the operator recorded between them. Parentheses in the source become
//! explicit nested groups, so nesting depth follows the parentheses and never
//! the length of a chain.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ConditionCatalog, Expression, ExpressionNode, NodeId, Operator};

/// A condition as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayCondition {
    pub name: String,
    /// Human-readable description, `None` if the catalog does not know the name.
    pub description: Option<String>,
    /// Indicator that registered the condition.
    pub indicator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DisplayItem {
    Condition(DisplayCondition),
    Group(DisplayGroup),
}

/// One sibling in a group, with the operator that joins it to the previous
/// sibling (`None` for the first).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayEntry {
    pub operator: Option<Operator>,
    pub item: DisplayItem,
}

/// A run of siblings rendered together.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayGroup {
    explicit: bool,
    entries: Vec<DisplayEntry>,
}

impl DisplayGroup {
    #[must_use]
    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    /// `true` if the group was written with parentheses.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Nesting depth; a group with no nested groups has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .entries
            .iter()
            .filter_map(|e| match &e.item {
                DisplayItem::Group(g) => Some(g.depth()),
                DisplayItem::Condition(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Number of condition occurrences at any depth.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| match &e.item {
                DisplayItem::Condition(_) => 1,
                DisplayItem::Group(g) => g.condition_count(),
            })
            .sum()
    }

    /// Render the tree back to expression text. For a tree built from an
    /// expression this equals the expression's own `Display` output.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_entries(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            if let Some(op) = entry.operator {
                write!(f, " {op} ")?;
            }
            match &entry.item {
                DisplayItem::Condition(c) => f.write_str(&c.name)?,
                DisplayItem::Group(g) => {
                    f.write_str("(")?;
                    g.write_entries(f)?;
                    f.write_str(")")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for DisplayGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_entries(f)
    }
}

/// Build the display tree for `expr`, annotating every condition from
/// `catalog`.
///
/// The returned root group is implicit. Rebuild it whenever the expression is
/// reparsed; it holds no link back to the tree it came from.
#[must_use]
pub fn build_display_tree(expr: &Expression, catalog: &ConditionCatalog) -> DisplayGroup {
    let builder = TreeBuilder { expr, catalog };
    builder.group(expr.root(), false)
}

struct TreeBuilder<'a> {
    expr: &'a Expression,
    catalog: &'a ConditionCatalog,
}

impl TreeBuilder<'_> {
    fn group(&self, id: NodeId, explicit: bool) -> DisplayGroup {
        let mut entries = Vec::new();
        self.flatten(id, &mut entries);
        DisplayGroup { explicit, entries }
    }

    fn flatten(&self, id: NodeId, out: &mut Vec<DisplayEntry>) {
        let (first, links) = self.expr.chain(id);
        self.push_operand(first, None, out);
        for (op, right) in links {
            self.push_operand(right, Some(op), out);
        }
    }

    fn push_operand(&self, id: NodeId, operator: Option<Operator>, out: &mut Vec<DisplayEntry>) {
        let item = match self.expr.node(id) {
            ExpressionNode::Leaf { name, .. } => DisplayItem::Condition(self.describe(name)),
            ExpressionNode::Group { inner, .. } => DisplayItem::Group(self.group(*inner, true)),
            ExpressionNode::Binary { .. } => DisplayItem::Group(self.group(id, false)),
        };
        out.push(DisplayEntry { operator, item });
    }

    fn describe(&self, name: &str) -> DisplayCondition {
        let info = self.catalog.get(name);
        DisplayCondition {
            name: name.to_owned(),
            description: info.map(|i| i.description().to_owned()),
            indicator: info.and_then(|i| i.indicator().map(str::to_owned)),
        }
    }
}
