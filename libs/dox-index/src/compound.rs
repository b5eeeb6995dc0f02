//! The merged compound document.
//!
//! Every `*.xml` file of a Doxygen output directory is converted and stored
//! under its file stem (`index`, `foo_8h`, `group__core`, ...). Files are
//! visited in name order so the document, and everything dug out of it, has
//! a stable order.

use crate::error::{IndexError, IndexResult};
use doxmd_format::xml_bytes_to_tree;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the merged document artifact.
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundIndex {
    root: Value,
}

impl CompoundIndex {
    /// Convert every compound file in `xml_dir`. One bad file fails the whole build.
    pub fn from_directory(xml_dir: &Path) -> IndexResult<Self> {
        let mut files = Vec::new();
        let entries = fs::read_dir(xml_dir).map_err(|e| IndexError::io(xml_dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| IndexError::io(xml_dir, e))?.path();
            if path.is_file() && path.extension() == Some("xml".as_ref()) {
                files.push(path);
            }
        }
        files.sort();

        let mut root = Map::new();
        for path in files {
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "Skipping compound file with a non UTF-8 name");
                continue;
            };
            let bytes = fs::read(&path).map_err(|e| IndexError::io(&path, e))?;
            let tree = xml_bytes_to_tree(&bytes).map_err(|source| IndexError::Format {
                path: path.clone(),
                source,
            })?;
            tracing::trace!(compound = key, "Converted compound file");
            root.insert(key.to_string(), tree);
        }

        tracing::debug!(
            dir = %xml_dir.display(),
            compounds = root.len(),
            "Built compound index"
        );
        Ok(Self {
            root: Value::Object(root),
        })
    }

    /// Read a previously written `index.json`.
    pub fn load(path: &Path) -> IndexResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
        let root = serde_json::from_str(&text)?;
        Ok(Self { root })
    }

    /// Write the document, pretty-printed, as `index.json` under `out_dir`.
    pub fn write_to(&self, out_dir: &Path) -> IndexResult<PathBuf> {
        let path = out_dir.join(INDEX_FILE);
        write_pretty_json(&path, &self.root)?;
        Ok(path)
    }

    /// Write, then read back the written file as the new query root.
    pub fn persist(&self, out_dir: &Path) -> IndexResult<Self> {
        let path = self.write_to(out_dir)?;
        Self::load(&path)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.root.as_object().map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Value> for CompoundIndex {
    fn from(root: Value) -> Self {
        Self { root }
    }
}

pub(crate) fn write_pretty_json<T: serde::Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> IndexResult<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text).map_err(|e| IndexError::io(path, e))
}
