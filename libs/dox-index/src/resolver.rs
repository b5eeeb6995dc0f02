//! Symbol resolution against the merged compound document.
//!
//! The resolver finds the public header, gathers every refid reachable from
//! it (plus all groups), and resolves each one, in parallel, to a
//! [`Definition`]. Unnamed refids, file compounds and names outside the
//! namespace are skipped silently.

use crate::definition::{Definition, Kind};
use crate::error::{IndexError, IndexResult};
use crate::ordering::order_definitions;
use crate::pool;
use doxmd_path::{Engine, QueryResult};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

/// File compounds that look like a public header: first child is `<name>` ending in `.h`.
const PUBLIC_HEADERS: &str = "index.children.#(name=compound)#|#(attrs.kind=file)#\
                              |#(children.0.name=name)#|#(children.0.children.0%*.h)#";
const COMPOUND_NAME_TEXT: &str = "children.0.children.0";
const INNER_CLASSES: &str = "children.#(name=compounddef)#|#.children.#(name=innerclass)#|@flatten";
const EMBEDDED_REFIDS: &str = "@dig:refid";
const GROUP_REFIDS: &str = "index.children.#(name=compound)#|#(attrs.kind=group)#|#.attrs.refid";
const MEMBER_DEFS: &str = "@dig:#(name=memberdef)#|@flatten";
const COMPOUND_DEF: &str = "children.#(name=compounddef)";
const MEMBER_NAME: &str = "children.#(name=name)|children.0";
const COMPOUNDDEF_NAME: &str = "children.#(name=compoundname)|children.0";

#[derive(Debug, Clone)]
pub struct Resolver {
    engine: Engine,
    namespace: String,
    header: Option<String>,
    workers: usize,
}

impl Resolver {
    pub fn new(engine: Engine, namespace: impl Into<String>) -> Self {
        Self {
            engine,
            namespace: namespace.into(),
            header: None,
            workers: default_workers(),
        }
    }

    /// Pick this header when more than one file qualifies as the public header.
    pub fn with_header(mut self, header: Option<String>) -> Self {
        self.header = header;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resolve and sort by source line.
    pub fn definitions(&self, root: &Value) -> IndexResult<Vec<Definition>> {
        let defs = self.resolve(root)?;
        Ok(order_definitions(&self.engine, defs))
    }

    /// Resolve every reachable refid, in refid-set order.
    pub fn resolve(&self, root: &Value) -> IndexResult<Vec<Definition>> {
        let started = Instant::now();

        let header = self.public_header(root)?;
        let header_id = self.engine.get(&header, "attrs.refid").string();
        let details = root.get(header_id.as_str());
        if details.is_none() {
            tracing::warn!(refid = %header_id, "Public header has no compound file");
        }

        let public_types = self.public_types(details)?;
        let refids = self.collect_refids(root, &header, details)?;
        if refids.is_empty() {
            tracing::warn!("No refids reachable from the public header");
        }
        tracing::debug!(
            header = %header_id,
            refids = refids.len(),
            public_types = public_types.len(),
            "Collected refids"
        );

        let member_defs = self.engine.query(root, MEMBER_DEFS)?;
        let member_defs = member_defs.as_value();

        let mut resolved = pool::resolve_all(&refids, self.workers, |refid| {
            self.resolve_refid(root, member_defs, &public_types, refid)
        })?;
        let defs: Vec<Definition> = refids
            .iter()
            .filter_map(|refid| resolved.remove(refid))
            .collect();

        tracing::info!(
            refids = refids.len(),
            definitions = defs.len(),
            workers = self.workers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Resolved definitions"
        );
        Ok(defs)
    }

    /// The index entry of the public header file.
    pub fn public_header(&self, root: &Value) -> IndexResult<Value> {
        let candidates = match self.engine.query(root, PUBLIC_HEADERS)?.into_value() {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        let name_of = |compound: &Value| self.engine.get(compound, COMPOUND_NAME_TEXT).string();

        let chosen = match &self.header {
            Some(wanted) => candidates
                .into_iter()
                .find(|c| name_of(c) == *wanted)
                .ok_or_else(|| IndexError::HeaderNotFound(wanted.clone()))?,
            None => {
                let mut candidates = candidates;
                match candidates.len() {
                    0 => return Err(IndexError::NoPublicHeader),
                    1 => candidates.remove(0),
                    _ => {
                        return Err(IndexError::AmbiguousPublicHeader(
                            candidates.iter().map(name_of).collect(),
                        ))
                    }
                }
            }
        };

        tracing::info!(header = %name_of(&chosen), "Selected public header");
        Ok(chosen)
    }

    /// Struct name → protection for every `innerclass` of the header.
    fn public_types(&self, details: Option<&Value>) -> IndexResult<HashMap<String, String>> {
        let mut types = HashMap::new();
        let Some(details) = details else {
            return Ok(types);
        };
        let inner = self.engine.query(details, INNER_CLASSES)?;
        for class in inner.iter() {
            let name = self.engine.get(class, "children.0").string();
            let prot = self.engine.get(class, "attrs.prot").string();
            types.entry(name).or_insert(prot);
        }
        Ok(types)
    }

    /// Refids under the header's index entry, its compound file, and of every group;
    /// flattened and deduplicated.
    fn collect_refids(
        &self,
        root: &Value,
        header: &Value,
        details: Option<&Value>,
    ) -> IndexResult<Vec<String>> {
        let from_header = self.engine.query(header, EMBEDDED_REFIDS)?;
        let from_details = match details {
            Some(details) => self.engine.query(details, EMBEDDED_REFIDS)?,
            None => QueryResult::missing(),
        };
        let from_groups = self.engine.query(root, GROUP_REFIDS)?;

        let sources: Vec<Value> = [from_header, from_details, from_groups]
            .into_iter()
            .map(|res| res.into_value().unwrap_or_else(|| Value::Array(Vec::new())))
            .collect();
        let plan = self.engine.compile("@flatten|@dedup")?;
        let all = self.engine.evaluate_owned(&plan, Value::Array(sources));

        Ok(all
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }

    fn resolve_refid(
        &self,
        root: &Value,
        member_defs: &Value,
        public_types: &HashMap<String, String>,
        refid: &str,
    ) -> Option<Definition> {
        let member_filter = format!("#(attrs.id={})", quote(refid));
        let hdef = self.engine.get(member_defs, &member_filter);
        let cdef = match root.get(refid) {
            Some(compound) => self.engine.get(compound, COMPOUND_DEF),
            None => QueryResult::missing(),
        };

        let (name, kind) = if hdef.exists() {
            (
                hdef.get(&self.engine, MEMBER_NAME).string(),
                hdef.get(&self.engine, "attrs.kind").string(),
            )
        } else if cdef.exists() {
            (
                cdef.get(&self.engine, COMPOUNDDEF_NAME).string(),
                cdef.get(&self.engine, "attrs.kind").string(),
            )
        } else {
            tracing::trace!(refid, "Skipping refid without a definition");
            return None;
        };

        if name.is_empty() || kind == "file" {
            tracing::trace!(refid, kind = %kind, "Skipping unnamed or file refid");
            return None;
        }
        let kind = Kind::from(kind);
        if kind != Kind::Group && !name.starts_with(&self.namespace) {
            tracing::trace!(refid, name = %name, "Skipping name outside the namespace");
            return None;
        }

        let show_full_layout = public_types.get(&name).is_some_and(|prot| prot == "public");
        let (header_def, compound_def) = if hdef.exists() {
            (hdef.into_value(), None)
        } else {
            (None, cdef.into_value())
        };

        Some(Definition {
            name,
            kind,
            refid: refid.to_string(),
            header_def,
            compound_def,
            show_full_layout,
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Quote a refid as a JSON string literal for use in a filter.
fn quote(refid: &str) -> String {
    Value::String(refid.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(name: &str, attrs: Value, children: Vec<Value>) -> Value {
        json!({"name": name, "attrs": attrs, "children": children})
    }

    fn file_compound(refid: &str, name: &str) -> Value {
        element(
            "compound",
            json!({"refid": refid, "kind": "file"}),
            vec![element("name", json!({}), vec![json!(name)])],
        )
    }

    fn index_with(compounds: Vec<Value>) -> Value {
        json!({"index": element("doxygenindex", json!({}), compounds)})
    }

    #[test]
    fn single_header_is_selected() {
        let root = index_with(vec![
            file_compound("foo_8c", "foo.c"),
            file_compound("foo_8h", "foo.h"),
        ]);
        let resolver = Resolver::new(Engine::default(), "");
        let header = resolver.public_header(&root).unwrap();
        assert_eq!(header["attrs"]["refid"], "foo_8h");
    }

    #[test]
    fn no_header_is_an_error() {
        let root = index_with(vec![file_compound("foo_8c", "foo.c")]);
        let resolver = Resolver::new(Engine::default(), "");
        assert!(matches!(
            resolver.public_header(&root),
            Err(IndexError::NoPublicHeader)
        ));
    }

    #[test]
    fn several_headers_need_a_choice() {
        let root = index_with(vec![
            file_compound("a_8h", "a.h"),
            file_compound("b_8h", "b.h"),
        ]);
        let resolver = Resolver::new(Engine::default(), "");
        match resolver.public_header(&root) {
            Err(IndexError::AmbiguousPublicHeader(names)) => assert_eq!(names, ["a.h", "b.h"]),
            other => panic!("unexpected: {other:?}"),
        }

        let picked = resolver
            .clone()
            .with_header(Some("b.h".into()))
            .public_header(&root)
            .unwrap();
        assert_eq!(picked["attrs"]["refid"], "b_8h");

        assert!(matches!(
            resolver.with_header(Some("c.h".into())).public_header(&root),
            Err(IndexError::HeaderNotFound(name)) if name == "c.h"
        ));
    }

    #[test]
    fn quoting_survives_special_characters() {
        assert_eq!(quote("a\"b"), r#""a\"b""#);
        let engine = Engine::default();
        let defs = json!([{"attrs": {"id": "x.y|z"}}]);
        let hit = engine.get(&defs, &format!("#(attrs.id={})", quote("x.y|z")));
        assert!(hit.exists());
    }
}
