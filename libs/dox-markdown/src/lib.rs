//! Markdown rendering for resolved Doxygen definitions.
//!
//! ```text
//! ## Enums                      index: enums, then functions grouped
//! - [my_ns_mode](#foo_8h_1a03)  under their Doxygen group
//!
//! <a name='foo_8h_1a01'></a>    one section per definition:
//! ## my_ns_init()               anchor, heading, C signature, details
//! ```
//!
//! Nodes are read through the path engine; the definitions themselves come
//! from `doxmd-index`.

pub mod desc;
pub mod render;
pub mod signature;

pub use desc::{markdown_desc, simple_text};
pub use render::MarkdownRenderer;
pub use signature::{enum_signature, function_signature, struct_signature};
