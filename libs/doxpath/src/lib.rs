//! Path queries over ordered JSON trees
//!
//! A small, gjson-flavoured query language for [`serde_json::Value`] trees:
//!
//! ```text
//! index.children.#(name=compound)#|#(attrs.kind=file)#
//!      |                         |
//!   Parser -> Path (stages / segments, LRU-cached)
//!      |
//!   Evaluator -> QueryResult (borrowed where possible)
//! ```
//!
//! # Example
//!
//! ```
//! use doxmd_path::Engine;
//! use serde_json::json;
//!
//! let engine = Engine::default();
//! let doc = json!({"files": [{"name": "a.h"}, {"name": "b.c"}, {"name": "c.h"}]});
//!
//! let headers = engine.get(&doc, "files.#(name%*.h)#.name");
//! assert_eq!(headers.value(), Some(&json!(["a.h", "c.h"])));
//! assert_eq!(engine.get(&doc, "files.#").int(), 3);
//! ```

pub mod ast;
pub mod engine;
pub mod error;
mod eval;
pub mod parser;
pub mod result;
pub mod transforms;
pub mod tree;

// Re-export main types
pub use engine::Engine;
pub use error::{Error, Result};
pub use result::QueryResult;
pub use transforms::{RawStyle, TransformFn, TransformRegistry};
pub use tree::Value;
