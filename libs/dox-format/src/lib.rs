//! XML → generic tree conversion.
//!
//! The mapping is schema-agnostic. Every element becomes an object with
//! exactly three fields, always in this order:
//! - `name`: the tag name, prefix included (`xsi:type`).
//! - `attrs`: attribute name → string value (an empty object when none).
//! - `children`: text runs (as strings) and child elements, in document order.
//!
//! Whitespace-only text is kept as is. Comments and processing instructions
//! are dropped; CDATA sections are ordinary text.

use roxmltree::{Document, Node, ParsingOptions};
use serde_json::{Map, Value};
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert raw XML bytes into a tree. A leading UTF-8 BOM is ignored.
pub fn xml_bytes_to_tree(bytes: &[u8]) -> Result<Value, FormatError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)?;
    xml_to_tree(text)
}

/// Convert an XML document into a tree rooted at its document element.
///
/// A DOCTYPE is accepted. Entities declared in its internal subset are
/// expanded; external DTDs are never fetched.
pub fn xml_to_tree(input: &str) -> Result<Value, FormatError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(input, options)?;
    Ok(element_to_value(&doc.root_element()))
}

/// Convert an XML document into pretty-printed JSON text.
pub fn xml_to_json(input: &str) -> Result<String, FormatError> {
    let tree = xml_to_tree(input)?;
    Ok(serde_json::to_string_pretty(&tree)?)
}

fn element_to_value(node: &Node) -> Value {
    let mut attrs = Map::new();
    for attr in node.attributes() {
        let name = qualified_name(node, attr.namespace(), attr.name());
        attrs.insert(name, Value::String(attr.value().to_string()));
    }

    let children: Vec<Value> = node
        .children()
        .filter_map(|child| {
            if child.is_element() {
                Some(element_to_value(&child))
            } else if child.is_text() {
                child.text().map(|text| Value::String(text.to_string()))
            } else {
                None
            }
        })
        .collect();

    let mut obj = Map::new();
    obj.insert("name".to_string(), Value::String(element_name(node)));
    obj.insert("attrs".to_string(), Value::Object(attrs));
    obj.insert("children".to_string(), Value::Array(children));
    Value::Object(obj)
}

fn element_name(node: &Node) -> String {
    let tag = node.tag_name();
    qualified_name(node, tag.namespace(), tag.name())
}

/// Rebuild `prefix:local` from a namespace URI. Default-namespace names stay bare.
fn qualified_name(node: &Node, namespace: Option<&str>, local: &str) -> String {
    let prefix = namespace.and_then(|uri| {
        if uri == XML_NS {
            Some("xml")
        } else {
            node.lookup_prefix(uri)
        }
    });
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
        _ => local.to_string(),
    }
}
