//! C declarations shown in each definition's code block.

use crate::desc::simple_text;
use doxmd_index::Definition;
use doxmd_path::{Engine, Value};

const BRIEF_TEXT: &str = "children.#(name=briefdescription).children.#(name=para).children";

/// `struct name;`, or the full member layout when the struct is public.
pub fn struct_signature(engine: &Engine, def: &Definition) -> String {
    let mut sig = format!("struct {}", def.name);
    if def.show_full_layout {
        let members: Vec<(String, String)> = def
            .compound_def
            .as_ref()
            .map(|cdef| {
                engine
                    .get(cdef, "children.#(name=sectiondef).children.#(name=memberdef)#")
                    .iter()
                    .map(|mdef| {
                        let ty = simple_text(engine.get(mdef, "children.#(name=type).children").as_value());
                        let name = engine.get(mdef, "children.#(name=name).children.0").string();
                        let brief = simple_text(engine.get(mdef, BRIEF_TEXT).as_value());
                        (format!("{} {};", ty, name), brief.trim().to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();

        let width = members.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        sig.push_str(" {\n");
        for (label, brief) in &members {
            let mut line = format!("    {:<width$}", label, width = width);
            if !brief.is_empty() {
                line.push_str(" // ");
                line.push_str(brief);
            }
            sig.push_str(line.trim_end());
            sig.push('\n');
        }
        sig.push('}');
    }
    sig.push(';');
    sig
}

/// Enum body with names and initializers aligned into columns.
pub fn enum_signature(engine: &Engine, def: &Definition) -> String {
    let empty = Value::Array(Vec::new());
    let hdef = def.header_def.as_ref().unwrap_or(&empty);
    let values: Vec<(String, String, String)> = engine
        .get(hdef, "children.#(name=enumvalue)#")
        .iter()
        .map(|value| {
            (
                engine.get(value, "children.#(name=name).children.0").string(),
                engine.get(value, "children.#(name=initializer).children.0").string(),
                simple_text(engine.get(value, BRIEF_TEXT).as_value()),
            )
        })
        .collect();

    let name_width = values.iter().map(|(n, _, _)| n.len()).max().unwrap_or(0);
    let init_width = values.iter().map(|(_, i, _)| i.len()).max().unwrap_or(0);

    let mut sig = format!("enum {} {{\n", def.name);
    for (name, init, brief) in &values {
        // Padding goes after the comma so the commas hug their values.
        let mut label = if init_width > 0 {
            let pad = init_width - init.len();
            format!("{:<nw$} {},{:pad$}", name, init, "", nw = name_width, pad = pad)
        } else {
            let pad = name_width - name.len();
            format!("{},{:pad$}", name, "", pad = pad)
        };
        let brief = brief.trim();
        if !brief.is_empty() {
            label.push_str(" // ");
            label.push_str(brief);
        }
        sig.push_str("    ");
        sig.push_str(label.trim());
        sig.push('\n');
    }
    sig.push_str("};");
    sig
}

/// `type name(args);` with `(void)` shown as `()`.
pub fn function_signature(engine: &Engine, def: &Definition) -> String {
    let empty = Value::Array(Vec::new());
    let hdef = def.header_def.as_ref().unwrap_or(&empty);
    let ty = simple_text(engine.get(hdef, "children.#(name=type).children").as_value());
    let name = engine.get(hdef, "children.#(name=name).children.0").string();
    let args = engine.get(hdef, "children.#(name=argsstring).children.0").string();

    let mut args = args.trim();
    if args == "(void)" {
        args = "()";
    }
    let mut sig = ty;
    if !sig.ends_with('*') {
        sig.push(' ');
    }
    sig.push_str(name.trim());
    sig.push_str(args);
    sig.push(';');
    sig
}
