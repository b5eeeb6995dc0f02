use crate::definition::Definition;
use doxmd_path::Engine;

const LOCATION_LINE: &str = "children.#(name=location).attrs.line";

/// Stable sort by declaration line. Definitions without a location sort as line 0.
pub fn order_definitions(engine: &Engine, defs: Vec<Definition>) -> Vec<Definition> {
    let mut keyed: Vec<(i64, Definition)> = defs
        .into_iter()
        .map(|def| (source_line(engine, &def), def))
        .collect();
    keyed.sort_by_key(|(line, _)| *line);
    keyed.into_iter().map(|(_, def)| def).collect()
}

/// Line of the first `location` of the member definition, else of the compound definition.
pub fn source_line(engine: &Engine, def: &Definition) -> i64 {
    [def.header_def.as_ref(), def.compound_def.as_ref()]
        .into_iter()
        .flatten()
        .map(|node| engine.get(node, LOCATION_LINE))
        .find(|line| line.exists())
        .map_or(0, |line| line.int())
}
