//! Query results
//!
//! A result either borrows a node of the queried tree or owns a value the
//! engine derived from it (filtered arrays, transform output). It also keeps
//! the raw-text layout chosen by `@pretty` / `@ugly`.

use crate::engine::Engine;
use crate::transforms::RawStyle;
use crate::tree::{canonical_string, to_int, Value, NULL};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    value: Option<Cow<'a, Value>>,
    style: RawStyle,
}

impl<'a> QueryResult<'a> {
    pub fn missing() -> Self {
        Self {
            value: None,
            style: RawStyle::Compact,
        }
    }

    pub(crate) fn new(value: Option<Cow<'a, Value>>, style: RawStyle) -> Self {
        Self { value, style }
    }

    pub fn owned(value: Value) -> Self {
        Self::new(Some(Cow::Owned(value)), RawStyle::Compact)
    }

    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_deref()
    }

    /// The matched node, or `null` when nothing matched.
    pub fn as_value(&self) -> &Value {
        self.value.as_deref().unwrap_or(&NULL)
    }

    pub fn into_value(self) -> Option<Value> {
        self.value.map(Cow::into_owned)
    }

    pub fn style(&self) -> RawStyle {
        self.style
    }

    /// Canonical string form; empty when nothing matched.
    pub fn string(&self) -> String {
        canonical_string(self.as_value())
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    pub fn int(&self) -> i64 {
        to_int(self.as_value())
    }

    pub fn bool(&self) -> bool {
        match self.as_value() {
            Value::Bool(b) => *b,
            Value::String(s) => matches!(s.as_str(), "true" | "1"),
            Value::Number(_) => self.int() != 0,
            _ => false,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value(), Some(Value::Array(_)))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.value(), Some(Value::Object(_)))
    }

    /// Elements of an array result; empty for anything else.
    pub fn array(&self) -> &[Value] {
        match self.value() {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.array().iter()
    }

    pub fn len(&self) -> usize {
        self.array().len()
    }

    pub fn is_empty(&self) -> bool {
        self.array().is_empty()
    }

    /// Raw JSON text in the result's layout; empty when nothing matched.
    pub fn raw(&self) -> String {
        let Some(value) = self.value() else {
            return String::new();
        };
        let text = match self.style {
            RawStyle::Compact => serde_json::to_string(value),
            RawStyle::Pretty => serde_json::to_string_pretty(value),
        };
        // Serializing a `Value` only fails for non-string map keys, which it cannot hold.
        text.unwrap_or_default()
    }

    /// Pretty-printed JSON text regardless of the recorded layout.
    pub fn pretty(&self) -> String {
        self.value()
            .and_then(|v| serde_json::to_string_pretty(v).ok())
            .unwrap_or_default()
    }

    /// Query this result; a missing result stays missing.
    pub fn get<'s>(&'s self, engine: &Engine, path: &str) -> QueryResult<'s> {
        match self.value() {
            Some(value) => engine.get(value, path),
            None => QueryResult::missing(),
        }
    }
}
