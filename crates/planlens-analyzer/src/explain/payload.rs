//! Request payload handling
//!
//! Plans reach the analyzer in several shapes:
//! - Raw PostgreSQL `EXPLAIN (FORMAT JSON)` output: `[{"Plan": {...}}]`
//! - A wrapper object: `{"Plan": {...}}` or `{"plan": {...}}`
//! - The root node itself: `{"Node Type": ..., "Plans": [...]}`
//!
//! # Examples
//!
//! ```
//! use planlens_analyzer::explain::payload::{extract_plan_root, parse_payload};
//!
//! let payload = parse_payload(r#"[{"Plan": {"Node Type": "Seq Scan"}}]"#).unwrap();
//! let root = extract_plan_root(&payload);
//! assert_eq!(root["Node Type"], "Seq Scan");
//! ```

use crate::explain::fields::is_present;
use crate::explain::plan::PlanLimits;
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use std::fmt;
use thiserror::Error;

static NULL: Value = Value::Null;

/// Errors that can occur when reading a plan payload
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Empty payload")]
    EmptyPayload,
}

/// Result type for plan payload parsing
pub type Result<T> = std::result::Result<T, PlanError>;

/// Parses a plan payload from text with default limits
pub fn parse_payload(text: &str) -> Result<Value> {
    parse_payload_with_limits(text, PlanLimits::default())
}

/// Parses a plan payload from text, see [`parse_payload_bytes_with_limits`]
pub fn parse_payload_with_limits(text: &str, limits: PlanLimits) -> Result<Value> {
    parse_payload_bytes_with_limits(text.as_bytes(), limits)
}

/// Parses a plan payload from raw bytes with default limits
pub fn parse_payload_bytes(bytes: &[u8]) -> Result<Value> {
    parse_payload_bytes_with_limits(bytes, PlanLimits::default())
}

/// Parses a plan payload from raw bytes (e.g. an HTTP request body).
///
/// Nesting depth is not an error. Arrays and objects nested deeper than
/// [`PlanLimits::max_nesting`] are skipped without recursion and replaced by
/// `null`; normalization under the same limits never looks that deep.
pub fn parse_payload_bytes_with_limits(bytes: &[u8], limits: PlanLimits) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(PlanError::EmptyPayload);
    }

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    deserializer.disable_recursion_limit();
    let value = BoundedValue {
        depth_left: limits.max_nesting(),
    }
    .deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Builds a `Value`, opening at most `depth_left` more arrays/objects
#[derive(Clone, Copy)]
struct BoundedValue {
    depth_left: usize,
}

impl BoundedValue {
    fn nested(self) -> Self {
        Self {
            depth_left: self.depth_left - 1,
        }
    }
}

impl<'de> DeserializeSeed<'de> for BoundedValue {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for BoundedValue {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        if self.depth_left == 0 {
            // IgnoredAny skips iteratively
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            return Ok(Value::Null);
        }

        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(self.nested())? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        if self.depth_left == 0 {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            return Ok(Value::Null);
        }

        let mut object = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(self.nested())?;
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

/// Picks the plan root out of a payload.
///
/// An array is unwrapped to its first element (PostgreSQL wraps EXPLAIN JSON
/// in a one-element array). Then a present `"Plan"` is preferred, then a
/// present `"plan"`, and otherwise the value itself is the root. Never fails;
/// whatever comes back is handed to the lenient normalizer.
pub fn extract_plan_root(payload: &Value) -> &Value {
    let value = match payload {
        Value::Array(items) => items.first().unwrap_or(&NULL),
        other => other,
    };

    ["Plan", "plan"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find(|plan| is_present(plan))
        .unwrap_or(value)
}
