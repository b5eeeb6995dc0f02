//! Path evaluation
//!
//! Every segment either narrows the current value or yields "not found";
//! nothing here returns an error. Values borrowed from the queried tree stay
//! borrowed as long as a segment only selects a child; anything derived
//! (filtered arrays, transform output) becomes owned.

use crate::ast::{Path, Predicate, Segment, Test};
use crate::transforms::{RawStyle, TransformRegistry};
use crate::tree::{canonical_string, walk, Value};
use std::borrow::Cow;

pub(crate) struct Evaluator<'e> {
    transforms: &'e TransformRegistry,
}

impl<'e> Evaluator<'e> {
    pub(crate) fn new(transforms: &'e TransformRegistry) -> Self {
        Self { transforms }
    }

    pub(crate) fn eval_path<'a>(
        &self,
        path: &Path,
        root: Cow<'a, Value>,
    ) -> (Option<Cow<'a, Value>>, RawStyle) {
        let mut style = RawStyle::Compact;
        let mut current = Some(root);
        for stage in &path.stages {
            let Some(value) = current else {
                break;
            };
            current = self.eval_segments(value, &stage.segments, &mut style);
        }
        (current, style)
    }

    fn eval_segments<'a>(
        &self,
        mut current: Cow<'a, Value>,
        segments: &[Segment],
        style: &mut RawStyle,
    ) -> Option<Cow<'a, Value>> {
        for (i, segment) in segments.iter().enumerate() {
            let rest = &segments[i + 1..];
            current = match segment {
                Segment::Field(name) => select(current, |v| v.as_object()?.get(name), |v| {
                    match v {
                        Value::Object(mut map) => map.remove(name),
                        _ => None,
                    }
                })?,
                Segment::Index(index) => select(current, |v| index_ref(v, *index), |v| {
                    index_owned(v, *index)
                })?,
                Segment::Count => match &*current {
                    Value::Array(items) => Cow::Owned(Value::from(items.len())),
                    _ => return None,
                },
                Segment::Map => {
                    let items = elements(current)?;
                    return Some(Cow::Owned(self.map_rest(items, rest, style)));
                }
                Segment::Filter {
                    predicate,
                    all: false,
                } => match current {
                    Cow::Borrowed(Value::Array(items)) => items
                        .iter()
                        .find(|item| self.matches(item, predicate))
                        .map(Cow::Borrowed)?,
                    Cow::Owned(Value::Array(items)) => items
                        .into_iter()
                        .find(|item| self.matches(item, predicate))
                        .map(Cow::Owned)?,
                    _ => return None,
                },
                Segment::Filter {
                    predicate,
                    all: true,
                } => {
                    let items: Vec<Cow<'a, Value>> = elements(current)?
                        .into_iter()
                        .filter(|item| self.matches(item, predicate))
                        .collect();
                    return Some(Cow::Owned(self.map_rest(items, rest, style)));
                }
                Segment::Dig(path) => Cow::Owned(self.dig(&current, path)),
                Segment::Transform { name, arg } => {
                    let transform = self.transforms.get(name)?;
                    match transform.style {
                        Some(layout) => {
                            *style = layout;
                            current
                        }
                        None => Cow::Owned((transform.apply)(
                            current.into_owned(),
                            arg.as_deref(),
                        )?),
                    }
                }
            };
        }
        Some(current)
    }

    /// Apply `rest` to every item, keeping only the items where it exists.
    fn map_rest<'a>(
        &self,
        items: Vec<Cow<'a, Value>>,
        rest: &[Segment],
        style: &mut RawStyle,
    ) -> Value {
        let out = items
            .into_iter()
            .filter_map(|item| {
                if rest.is_empty() {
                    Some(item.into_owned())
                } else {
                    self.eval_segments(item, rest, style)
                        .map(Cow::into_owned)
                }
            })
            .collect();
        Value::Array(out)
    }

    /// Every node of the subtree (pre-order) where `path` exists.
    fn dig(&self, root: &Value, path: &Path) -> Value {
        let mut found = Vec::new();
        walk(root, &mut |node| {
            if let (Some(hit), _) = self.eval_path(path, Cow::Borrowed(node)) {
                found.push(hit.into_owned());
            }
        });
        Value::Array(found)
    }

    fn matches(&self, element: &Value, predicate: &Predicate) -> bool {
        let (found, _) = self.eval_path(&predicate.lhs, Cow::Borrowed(element));
        let Some(found) = found else {
            return false;
        };
        match &predicate.test {
            Test::Exists => true,
            Test::Equals { value, negate } => (canonical_string(&found) == *value) != *negate,
            Test::Matches { pattern, negate } => {
                let hit = match &*found {
                    Value::Array(items) => items
                        .iter()
                        .any(|item| pattern.matches(&canonical_string(item))),
                    other => pattern.matches(&canonical_string(other)),
                };
                hit != *negate
            }
        }
    }
}

/// Select a child, staying borrowed when the parent is borrowed.
fn select<'a>(
    current: Cow<'a, Value>,
    by_ref: impl FnOnce(&'a Value) -> Option<&'a Value>,
    by_value: impl FnOnce(Value) -> Option<Value>,
) -> Option<Cow<'a, Value>> {
    match current {
        Cow::Borrowed(v) => by_ref(v).map(Cow::Borrowed),
        Cow::Owned(v) => by_value(v).map(Cow::Owned),
    }
}

fn index_ref(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(index),
        Value::Object(map) => map.get(&index.to_string()),
        _ => None,
    }
}

fn index_owned(value: Value, index: usize) -> Option<Value> {
    match value {
        Value::Array(items) => items.into_iter().nth(index),
        Value::Object(mut map) => map.remove(&index.to_string()),
        _ => None,
    }
}

fn elements(current: Cow<'_, Value>) -> Option<Vec<Cow<'_, Value>>> {
    match current {
        Cow::Borrowed(Value::Array(items)) => Some(items.iter().map(Cow::Borrowed).collect()),
        Cow::Owned(Value::Array(items)) => Some(items.into_iter().map(Cow::Owned).collect()),
        _ => None,
    }
}
