//! Path syntax tree
//!
//! A path is a pipeline of stages separated by `|`. Each stage is a list of
//! dot-separated segments. After a plural segment (`#` or `#(...)#`) the
//! remaining segments of the stage are applied to every element; a `|`
//! applies the next stage to the whole result instead.
//!
//! ```text
//! index.children.#(name=compound)#|#(attrs.kind=group)#|#.attrs.refid
//! └──── stage 1 ─────────────────┘ └──── stage 2 ────┘ └─ stage 3 ──┘
//! ```

use glob::Pattern;

/// A compiled path expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub stages: Vec<Stage>,
}

/// One `|`-delimited stage of a path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stage {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Named field of an object.
    Field(String),
    /// All-digit segment: array index, or the literal key on objects.
    Index(usize),
    /// Trailing `#`: length of an array.
    Count,
    /// Non-trailing `#`: apply the rest of the stage to every element.
    Map,
    /// `#(...)` (first match) or `#(...)#` (all matches).
    Filter { predicate: Predicate, all: bool },
    /// `@dig:<path>`: every node in the subtree where `<path>` exists.
    Dig(Box<Path>),
    /// `@name` or `@name:arg`, resolved through the transform registry.
    Transform { name: String, arg: Option<String> },
}

impl Segment {
    /// Whether this segment turns the rest of the stage into a per-element map.
    pub fn is_plural(&self) -> bool {
        matches!(self, Segment::Map | Segment::Filter { all: true, .. })
    }
}

/// Condition inside `#( ... )`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Path evaluated against each candidate element.
    pub lhs: Path,
    pub test: Test,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    /// `#(field)`: the field exists.
    Exists,
    /// `#(field=value)` / `#(field!=value)` on the canonical string form.
    Equals { value: String, negate: bool },
    /// `#(field%pattern)`, `#(field!%pattern)` or an unquoted `#(field=*...)`.
    Matches { pattern: Pattern, negate: bool },
}
