//! Plan field resolution
//!
//! EXPLAIN JSON arrives in more than one naming convention: PostgreSQL emits
//! capitalized, space-separated keys (`"Node Type"`), while hand-written or
//! tool-generated plans often use camelCase (`"nodeType"`). Each logical field
//! therefore owns an ordered list of candidate keys; the first key holding a
//! present value wins.

use serde_json::{Map, Number, Value};

/// A logical plan-node field with its candidate JSON keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanField {
    NodeType,
    RelationName,
    Filter,
    IndexName,
    SortKey,
    Cost,
    ActualRows,
    ActualTime,
    HashJoin,
    Plans,
}

impl PlanField {
    /// Every logical field, in declaration order
    pub const ALL: [PlanField; 10] = [
        Self::NodeType,
        Self::RelationName,
        Self::Filter,
        Self::IndexName,
        Self::SortKey,
        Self::Cost,
        Self::ActualRows,
        Self::ActualTime,
        Self::HashJoin,
        Self::Plans,
    ];

    /// Fields listed in a rendered node's metadata block, in display order
    pub const METADATA: [PlanField; 6] = [
        Self::RelationName,
        Self::IndexName,
        Self::Filter,
        Self::SortKey,
        Self::ActualRows,
        Self::ActualTime,
    ];

    /// Candidate keys, primary key first
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Self::NodeType => &["Node Type", "nodeType"],
            Self::RelationName => &["Relation Name", "relation"],
            Self::Filter => &["Filter", "filter"],
            Self::IndexName => &["Index Name", "indexName"],
            Self::SortKey => &["Sort Key", "Sort Keys", "sortKey"],
            Self::Cost => &["Total Cost", "Cost", "cost"],
            Self::ActualRows => &["Actual Rows", "actualRows"],
            Self::ActualTime => &["Actual Time", "actualTime"],
            Self::HashJoin => &["Hash Join", "hashJoin"],
            Self::Plans => &["Plans", "plans"],
        }
    }

    /// Display name of the field (its primary key)
    pub fn label(self) -> &'static str {
        self.keys()[0]
    }

    /// Returns the first present value among the candidate keys
    pub fn resolve(self, object: &Map<String, Value>) -> Option<&Value> {
        self.keys()
            .iter()
            .filter_map(|key| object.get(*key))
            .find(|value| is_present(value))
    }

    /// Resolves the field and coerces it to display text
    pub fn resolve_text(self, object: &Map<String, Value>) -> Option<String> {
        self.resolve(object).map(display_text)
    }

    /// Returns true if `key` is one of the candidate keys of any field
    pub fn is_known_key(key: &str) -> bool {
        Self::ALL.iter().any(|field| field.keys().contains(&key))
    }
}

/// Returns true if the value counts as present.
///
/// `null`, `false`, `0`, `""` and `[]` are treated as absent so that a
/// fallback key gets its turn.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Coerces a JSON value to the text shown to a human.
///
/// Strings are taken verbatim, integral numbers lose their fractional part,
/// sequences are joined with `", "` and objects fall back to compact JSON.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) | Value::Object(_) => item.to_string(),
                scalar => display_text(scalar),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Formats a number the way EXPLAIN viewers show it (`1210.0` → `1210`)
pub fn format_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }

    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

#[cfg(test)]
mod tests;
