//! Generic tree model
//!
//! Converted documents are plain `serde_json::Value` trees built with the
//! `preserve_order` feature, so object keys keep document order. Queries that
//! pick "the first matching child" depend on that order.

pub use serde_json::{Map, Value};

/// A node of the generic tree.
pub type Node = Value;

/// Shared `null` used where a borrowed node is needed but nothing exists.
pub static NULL: Value = Value::Null;

/// Canonical string form of a node.
///
/// Strings are returned unquoted, numbers and booleans in their JSON form,
/// `null` as the empty string, and containers as compact JSON text. Filter
/// comparisons and `@dedup` both key on this form.
pub fn canonical_string(node: &Value) -> String {
    match node {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Integer coercion: numbers truncate, numeric strings parse, everything else is 0.
pub fn to_int(node: &Value) -> i64 {
    match node {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Value::Bool(true) => 1,
        _ => 0,
    }
}

/// Visit `node` and every descendant in pre-order document order.
pub fn walk<'a>(node: &'a Value, visit: &mut dyn FnMut(&'a Value)) {
    visit(node);
    match node {
        Value::Array(items) => {
            for item in items {
                walk(item, visit);
            }
        }
        Value::Object(map) => {
            for value in map.values() {
                walk(value, visit);
            }
        }
        _ => {}
    }
}
