use crate::compound::write_pretty_json;
use crate::error::IndexResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the resolved definitions artifact.
pub const DEFS_FILE: &str = "defs.json";

/// Doxygen `kind` of a resolved symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Kind {
    Struct,
    Enum,
    Function,
    Typedef,
    Group,
    /// Any other Doxygen kind (`define`, `variable`, `union`, ...).
    Other(String),
}

impl Kind {
    pub fn as_str(&self) -> &str {
        match self {
            Kind::Struct => "struct",
            Kind::Enum => "enum",
            Kind::Function => "function",
            Kind::Typedef => "typedef",
            Kind::Group => "group",
            Kind::Other(kind) => kind,
        }
    }
}

impl From<&str> for Kind {
    fn from(kind: &str) -> Self {
        match kind {
            "struct" => Kind::Struct,
            "enum" => Kind::Enum,
            "function" => Kind::Function,
            "typedef" => Kind::Typedef,
            "group" => Kind::Group,
            other => Kind::Other(other.to_string()),
        }
    }
}

impl From<String> for Kind {
    fn from(kind: String) -> Self {
        Kind::from(kind.as_str())
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved symbol.
///
/// Members carry their `memberdef` node in `header_def`; compounds (structs,
/// groups) carry their `compounddef` node in `compound_def`. Never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: Kind,
    pub refid: String,
    #[serde(rename = "hdef", default, skip_serializing_if = "Option::is_none")]
    pub header_def: Option<Value>,
    #[serde(rename = "cdef", default, skip_serializing_if = "Option::is_none")]
    pub compound_def: Option<Value>,
    /// Render the full field layout (public struct declared in the header).
    #[serde(rename = "showdef", default, skip_serializing_if = "std::ops::Not::not")]
    pub show_full_layout: bool,
}

impl Definition {
    /// The definition node that is present, member first.
    pub fn def(&self) -> Option<&Value> {
        self.header_def.as_ref().or(self.compound_def.as_ref())
    }
}

/// Write definitions, pretty-printed, as `defs.json` under `out_dir`.
pub fn write_definitions(defs: &[Definition], out_dir: &Path) -> IndexResult<PathBuf> {
    let path = out_dir.join(DEFS_FILE);
    write_pretty_json(&path, defs)?;
    Ok(path)
}
