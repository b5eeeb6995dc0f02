use crate::desc::{markdown_desc, simple_text};
use crate::signature::{enum_signature, function_signature, struct_signature};
use doxmd_index::{Definition, Kind};
use doxmd_path::Engine;
use std::fmt::{self, Write};

const DETAIL_PATHS: [&str; 2] = [
    "children.#(name=detaileddescription).children",
    "children.#(name=briefdescription).children",
];

/// Renders ordered definitions into one Markdown document.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    engine: Engine,
}

impl MarkdownRenderer {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn render(&self, defs: &[Definition]) -> Result<String, fmt::Error> {
        let mut output = String::new();
        self.render_to(&mut output, defs)?;
        Ok(output)
    }

    /// Index first, then structs, objects (structs without `includes`), enums and functions.
    pub fn render_to<W: Write>(&self, output: &mut W, defs: &[Definition]) -> fmt::Result {
        self.write_index(output, defs)?;

        let (structs, objects): (Vec<&Definition>, Vec<&Definition>) = of_kind(defs, Kind::Struct)
            .partition(|def| self.has_includes(def));
        for def in structs.into_iter().chain(objects) {
            self.write_definition(output, def, &struct_signature(&self.engine, def), false)?;
        }
        for def in of_kind(defs, Kind::Enum) {
            self.write_definition(output, def, &enum_signature(&self.engine, def), false)?;
        }
        for def in of_kind(defs, Kind::Function) {
            self.write_definition(output, def, &function_signature(&self.engine, def), true)?;
        }
        Ok(())
    }

    fn write_index<W: Write>(&self, output: &mut W, defs: &[Definition]) -> fmt::Result {
        let enums: Vec<&Definition> = of_kind(defs, Kind::Enum).collect();
        if !enums.is_empty() {
            writeln!(output, "## Enums")?;
            writeln!(output)?;
            for def in enums {
                writeln!(output, "- [{}](#{})", def.name, def.refid)?;
            }
        }
        writeln!(output)?;
        writeln!(output)?;

        let groups: Vec<&Definition> = of_kind(defs, Kind::Group).collect();
        let mut current_group = "";
        let mut listed = 0;
        for def in of_kind(defs, Kind::Function) {
            let group = owning_group(&groups, &def.refid);
            let group_id = group.map_or("", |g| g.refid.as_str());
            if group_id != current_group {
                if listed > 0 {
                    writeln!(output)?;
                    writeln!(output)?;
                }
                writeln!(output, "<a name='{}'></a>", group_id)?;
                let title = group.map(|g| self.group_title(g)).unwrap_or_default();
                writeln!(output, "## {}", title)?;
                writeln!(output)?;
                let desc = group.map(|g| self.details(g)).unwrap_or_default();
                if !desc.is_empty() {
                    writeln!(output, "{}", desc)?;
                    writeln!(output)?;
                }
                current_group = group_id;
                listed = 0;
            }
            writeln!(output, "- [{}()](#{})", def.name, def.refid)?;
            listed += 1;
        }
        writeln!(output)
    }

    fn write_definition<W: Write>(
        &self,
        output: &mut W,
        def: &Definition,
        signature: &str,
        is_function: bool,
    ) -> fmt::Result {
        writeln!(output, "<a name='{}'></a>", def.refid)?;
        let parens = if is_function { "()" } else { "" };
        writeln!(output, "## {}{}", def.name, parens)?;
        writeln!(output, "```c")?;
        writeln!(output, "{}", signature)?;
        writeln!(output, "```")?;
        let details = self.details(def);
        if !details.is_empty() {
            writeln!(output, "{}", details)?;
        }
        writeln!(output)
    }

    /// Member detailed, compound detailed, member brief, compound brief; first non-blank wins.
    pub fn details(&self, def: &Definition) -> String {
        DETAIL_PATHS
            .iter()
            .flat_map(|path| {
                [def.header_def.as_ref(), def.compound_def.as_ref()]
                    .into_iter()
                    .flatten()
                    .map(move |node| (node, *path))
            })
            .map(|(node, path)| {
                let list = self.engine.get(node, path);
                markdown_desc(&self.engine, list.as_value(), false)
            })
            .map(|md| md.trim().to_string())
            .find(|md| !md.is_empty())
            .unwrap_or_default()
    }

    fn group_title(&self, group: &Definition) -> String {
        group
            .compound_def
            .as_ref()
            .map(|cdef| simple_text(self.engine.get(cdef, "children.#(name=title).children").as_value()))
            .unwrap_or_default()
    }

    fn has_includes(&self, def: &Definition) -> bool {
        def.compound_def
            .as_ref()
            .is_some_and(|cdef| self.engine.get(cdef, "children.#(name=includes)").exists())
    }
}

fn of_kind(defs: &[Definition], kind: Kind) -> impl Iterator<Item = &Definition> {
    defs.iter().filter(move |def| def.kind == kind)
}

/// The group with the longest refid prefixing a `group__` member refid.
fn owning_group<'d>(groups: &[&'d Definition], refid: &str) -> Option<&'d Definition> {
    if !refid.starts_with("group__") {
        return None;
    }
    groups
        .iter()
        .copied()
        .filter(|g| refid.starts_with(g.refid.as_str()))
        .max_by_key(|g| g.refid.len())
}
