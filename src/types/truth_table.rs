use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One assignment of truth values and the expression's result under it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TruthRow {
    values: Vec<bool>,
    result: bool,
}

impl TruthRow {
    pub(crate) fn new(values: Vec<bool>, result: bool) -> Self {
        Self { values, result }
    }

    /// Truth values in the table's column order.
    #[must_use]
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    #[must_use]
    pub fn result(&self) -> bool {
        self.result
    }
}

/// Exhaustive enumeration of an expression over its conditions.
///
/// Rows are in binary counting order with the first column as the most
/// significant bit, so row `i` encodes `i` in binary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TruthTable {
    conditions: Vec<String>,
    rows: Vec<TruthRow>,
}

impl TruthTable {
    pub(crate) fn new(conditions: Vec<String>, rows: Vec<TruthRow>) -> Self {
        Self { conditions, rows }
    }

    /// Column headers.
    #[must_use]
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    #[must_use]
    pub fn rows(&self) -> &[TruthRow] {
        &self.rows
    }

    /// Number of rows for which the expression is true.
    #[must_use]
    pub fn true_count(&self) -> usize {
        self.rows.iter().filter(|r| r.result).count()
    }
}

fn mark(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self.conditions.iter().map(|c| c.len().max(1)).collect();

        for (name, width) in self.conditions.iter().zip(widths.iter().copied()) {
            write!(f, "{name:<width$} | ")?;
        }
        writeln!(f, "result")?;

        for row in &self.rows {
            for (value, width) in row.values.iter().zip(widths.iter().copied()) {
                write!(f, "{:<width$} | ", mark(*value))?;
            }
            writeln!(f, "{}", mark(row.result))?;
        }
        Ok(())
    }
}
