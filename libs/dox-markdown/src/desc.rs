//! Doxygen description markup → Markdown.
//!
//! Descriptions are lists of text runs and elements (`para`, `ref`,
//! `simplesect`, ...). Unknown elements contribute their children.

use doxmd_path::tree::canonical_string;
use doxmd_path::{Engine, Value};

/// Concatenated text of a node list, markup dropped.
pub fn simple_text(list: &Value) -> String {
    let mut out = String::new();
    push_text(list, &mut out);
    out
}

fn push_text(list: &Value, out: &mut String) {
    let Some(items) = list.as_array() else {
        return;
    };
    for item in items {
        match item {
            Value::Object(_) => push_text(&item["children"], out),
            other => out.push_str(&canonical_string(other)),
        }
    }
}

/// Render a node list as Markdown. `plain` drops links and emphasis markers.
pub fn markdown_desc(engine: &Engine, list: &Value, plain: bool) -> String {
    let mut md = String::new();
    let mut last_section = None;

    let Some(items) = list.as_array() else {
        return md;
    };
    for item in items {
        let Value::Object(element) = item else {
            md.push_str(&canonical_string(item));
            continue;
        };
        let name = element.get("name").and_then(Value::as_str).unwrap_or_default();
        let children = &item["children"];

        match name {
            "para" => {
                md.push_str(&markdown_desc(engine, children, plain));
                md.push_str("\n\n");
            }
            "parameterlist" => {
                md.push_str("\n\n**Parameters**\n\n");
                let params = engine.get(item, "children.#(name=parameteritem)#");
                for param in params.iter() {
                    let names = engine.get(
                        param,
                        "children.#(name=parameternamelist).children.#(name=parametername).children",
                    );
                    let desc = engine.get(param, "children.#(name=parameterdescription).children");
                    let names = markdown_desc(engine, names.as_value(), plain);
                    let desc = markdown_desc(engine, desc.as_value(), plain);
                    md.push_str(&format!("- **{}**: {}\n", names.trim(), desc.trim()));
                }
                md.push('\n');
            }
            "simplesect" => {
                let title = section_title(&engine.get(item, "attrs.kind").string());
                if last_section.as_deref() != Some(title.as_str()) {
                    md.push_str(&format!("\n\n**{}**\n\n", title));
                }
                let line = markdown_desc(engine, children, plain);
                md.push_str(&format!("- {}\n", line.trim()));
                last_section = Some(title);
            }
            "ref" => link(&mut md, &engine.get(item, "attrs.refid").string(), "#", item, plain),
            "ulink" => link(&mut md, &engine.get(item, "attrs.url").string(), "", item, plain),
            "computeroutput" => wrap(&mut md, engine, children, "`", "`", plain),
            "emphasis" => wrap(&mut md, engine, children, "*", "*", plain),
            "bold" => wrap(&mut md, engine, children, "**", "**", plain),
            "programlisting" => wrap(&mut md, engine, children, "```c\n", "```\n", plain),
            "codeline" => {
                md.push_str(&markdown_desc(engine, children, true));
                md.push('\n');
            }
            "sp" => md.push(' '),
            _ => md.push_str(&markdown_desc(engine, children, plain)),
        }
    }
    md
}

/// `see` → `See also`, otherwise the kind with its first letter upper-cased.
fn section_title(kind: &str) -> String {
    let kind = if kind == "see" { "See also" } else { kind };
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn link(md: &mut String, target: &str, anchor: &str, item: &Value, plain: bool) {
    let text = canonical_string(&item["children"][0]);
    if !plain && !target.is_empty() && !text.is_empty() {
        md.push_str(&format!("[{}]({}{})", text, anchor, target));
    } else {
        md.push_str(&text);
    }
}

fn wrap(md: &mut String, engine: &Engine, children: &Value, start: &str, end: &str, plain: bool) {
    if !plain {
        md.push_str(start);
    }
    md.push_str(&markdown_desc(engine, children, plain));
    if !plain {
        md.push_str(end);
    }
}
