//! Transform registry for `@name` path segments
//!
//! Transforms are plain functions from a value (plus the optional `:arg`
//! text) to a new value, or `None` for "not found". The registry is an
//! ordinary value handed to [`crate::Engine::new`]; nothing is registered
//! process-wide.
//!
//! `@dig` is not in the table: it needs to evaluate a sub-path, so the
//! engine handles it directly.

use crate::tree::{canonical_string, Map, Value};
use std::collections::{HashMap, HashSet};

/// Signature of a transform implementation.
pub type TransformFn = fn(Value, Option<&str>) -> Option<Value>;

/// Layout used when a query result is turned back into raw JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawStyle {
    #[default]
    Compact,
    Pretty,
}

/// A registered transform.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub apply: TransformFn,
    /// Set by layout-only transforms (`@pretty`, `@ugly`).
    pub style: Option<RawStyle>,
}

/// Named transforms available to an engine.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Transform>,
}

impl TransformRegistry {
    /// A registry with no transforms (only `@dig` is available).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard set: `flatten`, `dedup`, `pretty`, `ugly`, `reverse`,
    /// `this`, `keys` and `values`.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry
            .register("flatten", flatten)
            .register("dedup", dedup)
            .register("reverse", reverse)
            .register("this", this)
            .register("keys", keys)
            .register("values", values)
            .register_style("pretty", RawStyle::Pretty)
            .register_style("ugly", RawStyle::Compact);
        registry
    }

    /// Add or replace a transform.
    pub fn register(&mut self, name: impl Into<String>, apply: TransformFn) -> &mut Self {
        self.transforms
            .insert(name.into(), Transform { apply, style: None });
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, apply: TransformFn) -> Self {
        self.register(name, apply);
        self
    }

    fn register_style(&mut self, name: &str, style: RawStyle) -> &mut Self {
        self.transforms.insert(
            name.to_string(),
            Transform {
                apply: this,
                style: Some(style),
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&Transform> {
        self.transforms.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Remove one level of array nesting; non-array elements are kept as they are.
pub fn flatten(value: Value, _arg: Option<&str>) -> Option<Value> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Array(inner) => out.extend(inner),
                    other => out.push(other),
                }
            }
            Some(Value::Array(out))
        }
        other => Some(other),
    }
}

/// Drop elements whose canonical string form was already seen. Arrays only.
pub fn dedup(value: Value, _arg: Option<&str>) -> Option<Value> {
    let Value::Array(items) = value else {
        return None;
    };
    let mut seen = HashSet::with_capacity(items.len());
    let out: Vec<Value> = items
        .into_iter()
        .filter(|item| seen.insert(canonical_string(item)))
        .collect();
    Some(Value::Array(out))
}

pub fn reverse(value: Value, _arg: Option<&str>) -> Option<Value> {
    match value {
        Value::Array(mut items) => {
            items.reverse();
            Some(Value::Array(items))
        }
        Value::Object(map) => {
            let entries: Vec<(String, Value)> = map.into_iter().collect();
            Some(Value::Object(entries.into_iter().rev().collect::<Map<_, _>>()))
        }
        other => Some(other),
    }
}

pub fn this(value: Value, _arg: Option<&str>) -> Option<Value> {
    Some(value)
}

pub fn keys(value: Value, _arg: Option<&str>) -> Option<Value> {
    match value {
        Value::Object(map) => Some(Value::Array(map.into_iter().map(|(k, _)| Value::String(k)).collect())),
        _ => None,
    }
}

pub fn values(value: Value, _arg: Option<&str>) -> Option<Value> {
    match value {
        Value::Object(map) => Some(Value::Array(map.into_iter().map(|(_, v)| v).collect())),
        _ => None,
    }
}
