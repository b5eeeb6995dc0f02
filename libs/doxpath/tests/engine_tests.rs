//! End-to-end queries against documents shaped like converted Doxygen XML

use doxmd_path::{Engine, Error, RawStyle, TransformRegistry, Value};
use serde_json::json;

fn element(name: &str, attrs: Value, children: Vec<Value>) -> Value {
    json!({"name": name, "attrs": attrs, "children": children})
}

fn sample_index() -> Value {
    json!({
        "index": element("doxygenindex", json!({}), vec![
            element("compound", json!({"refid": "foo_8h", "kind": "file"}), vec![
                element("name", json!({}), vec![json!("foo.h")]),
                element("member", json!({"refid": "foo_8h_1a01", "kind": "function"}), vec![
                    element("name", json!({}), vec![json!("my_ns_init")]),
                ]),
            ]),
            element("compound", json!({"refid": "foo_8c", "kind": "file"}), vec![
                element("name", json!({}), vec![json!("foo.c")]),
            ]),
            element("compound", json!({"refid": "group__core", "kind": "group"}), vec![
                element("name", json!({}), vec![json!("core")]),
            ]),
        ])
    })
}

#[test]
fn test_filter_first_and_all() {
    let engine = Engine::default();
    let doc = json!({"a": [{"k": "x", "v": 1}, {"k": "y", "v": 2}, {"k": "x", "v": 3}]});

    assert_eq!(engine.get(&doc, "a.#(k=x).v").int(), 1);
    assert_eq!(
        engine.get(&doc, "a.#(k=x)#.v").value(),
        Some(&json!([1, 3]))
    );
    assert_eq!(
        engine.get(&doc, "a.#(k!=x)#.v").value(),
        Some(&json!([2]))
    );
}

#[test]
fn test_filter_without_match() {
    let engine = Engine::default();
    let doc = json!({"a": [{"k": "x"}]});

    assert!(!engine.get(&doc, "a.#(k=zzz)").exists());
    assert_eq!(engine.get(&doc, "a.#(k=zzz)#").value(), Some(&json!([])));
}

#[test]
fn test_existence_filter() {
    let engine = Engine::default();
    let doc = json!({"a": [{"k": 1}, {"j": 2}, {"k": 3}]});
    assert_eq!(engine.get(&doc, "a.#(k)#.k").value(), Some(&json!([1, 3])));
}

#[test]
fn test_count_and_map() {
    let engine = Engine::default();
    let doc = json!({"a": [{"n": "one"}, {"n": "two"}, {"m": "three"}]});

    assert_eq!(engine.get(&doc, "a.#").int(), 3);
    assert_eq!(
        engine.get(&doc, "a.#.n").value(),
        Some(&json!(["one", "two"]))
    );
}

#[test]
fn test_glob_filters() {
    let engine = Engine::default();
    let doc = json!({"files": ["foo.h", "foo.c", "bar.h"]});

    // An unquoted `=` value with `*` is a pattern; a quoted one is literal.
    assert_eq!(
        engine.get(&doc, "files.#(@this=*.h)#").value(),
        Some(&json!(["foo.h", "bar.h"]))
    );
    assert_eq!(
        engine.get(&doc, "files.#(@this%*.c)#").value(),
        Some(&json!(["foo.c"]))
    );
    assert_eq!(
        engine.get(&doc, r#"files.#(@this="*.h")#"#).value(),
        Some(&json!([]))
    );
    assert_eq!(
        engine.get(&doc, "files.#(@this!%*.h)#").value(),
        Some(&json!(["foo.c"]))
    );
}

#[test]
fn test_glob_filter_looks_one_level_into_arrays() {
    let engine = Engine::default();
    let doc = json!([{"n": ["a.c", "b.h"]}, {"n": ["c.c"]}, {"n": [["d.h"]]}]);

    assert_eq!(
        engine.get(&doc, "#(n=*.h)#").value(),
        Some(&json!([{"n": ["a.c", "b.h"]}]))
    );
    assert_eq!(
        engine.get(&doc, "#(n!%*.h)#").value(),
        Some(&json!([{"n": ["c.c"]}, {"n": [["d.h"]]}]))
    );
}

#[test]
fn test_quoted_values_with_special_characters() {
    let engine = Engine::default();
    let doc = json!({"m": [{"id": "a.b|c"}, {"id": "x"}]});
    assert_eq!(
        engine.get(&doc, r#"m.#(id="a.b|c").id"#).as_str(),
        Some("a.b|c")
    );
}

#[test]
fn test_pipes_apply_to_whole_result() {
    let engine = Engine::default();
    let index = sample_index();

    let files = engine.get(&index, "index.children.#(name=compound)#|#(attrs.kind=file)#");
    assert_eq!(files.len(), 2);

    let names = engine.get(
        &index,
        "index.children.#(name=compound)#|#(attrs.kind=file)#|#.children.0.children.0",
    );
    assert_eq!(names.value(), Some(&json!(["foo.h", "foo.c"])));

    let groups = engine.get(
        &index,
        "index.children.#(name=compound)#|#(attrs.kind=group)#|#.attrs.refid",
    );
    assert_eq!(groups.value(), Some(&json!(["group__core"])));
}

#[test]
fn test_nested_filters() {
    let engine = Engine::default();
    let index = sample_index();

    let header = engine.get(
        &index,
        "index.children.#(children.#(name=member))#|#.attrs.refid",
    );
    assert_eq!(header.value(), Some(&json!(["foo_8h"])));
}

#[test]
fn test_dig_collects_in_preorder() {
    let engine = Engine::default();
    let index = sample_index();

    let refids = engine.get(&index, "@dig:refid");
    assert_eq!(
        refids.value(),
        Some(&json!(["foo_8h", "foo_8h_1a01", "foo_8c", "group__core"]))
    );

    let kinds = engine.get(&index, "@dig:kind|@dedup");
    assert_eq!(kinds.value(), Some(&json!(["file", "function", "group"])));
}

#[test]
fn test_dig_argument_stops_at_pipe() {
    let engine = Engine::default();
    let doc = json!({"a": {"m": [1, 2]}, "b": {"m": [2, 3]}});
    assert_eq!(
        engine.get(&doc, "@dig:m|@flatten|@dedup").value(),
        Some(&json!([1, 2, 3]))
    );
}

#[test]
fn test_flatten_then_dedup() {
    let engine = Engine::default();
    let doc = json!([["a", "b"], ["b", "c"], ["a"]]);
    assert_eq!(
        engine.get(&doc, "@flatten|@dedup").value(),
        Some(&json!(["a", "b", "c"]))
    );
}

#[test]
fn test_missing_paths_yield_no_value() {
    let engine = Engine::default();
    let doc = json!({"a": {"b": 1}});

    assert!(!engine.get(&doc, "a.c").exists());
    assert!(!engine.get(&doc, "a.b.c").exists());
    assert!(!engine.get(&doc, "a.0").exists());
    assert!(!engine.get(&doc, "a.c|@flatten").exists());
    assert_eq!(engine.get(&doc, "a.c").string(), "");
}

#[test]
fn test_result_chaining() {
    let engine = Engine::default();
    let index = sample_index();

    let compound = engine.get(&index, "index.children.#(attrs.refid=foo_8h)");
    assert_eq!(compound.get(&engine, "attrs.kind").as_str(), Some("file"));
    assert!(!compound.get(&engine, "attrs.nope").exists());
    assert!(!engine
        .get(&index, "nope")
        .get(&engine, "attrs")
        .exists());
}

#[test]
fn test_pretty_and_ugly() {
    let engine = Engine::default();
    let doc = json!({"a": {"b": [1, 2]}});

    let pretty = engine.get(&doc, "a|@pretty");
    assert_eq!(pretty.style(), RawStyle::Pretty);
    assert!(pretty.raw().contains("\n"));

    let ugly = engine.get(&doc, "a|@pretty|@ugly");
    assert_eq!(ugly.raw(), r#"{"b":[1,2]}"#);
}

#[test]
fn test_syntax_errors() {
    let engine = Engine::default();
    let doc = json!({});

    assert!(matches!(engine.query(&doc, ""), Err(Error::ParseError(_))));
    assert!(matches!(engine.query(&doc, "a..b"), Err(Error::ParseError(_))));
    assert!(matches!(engine.query(&doc, "a.#(b=1"), Err(Error::ParseError(_))));
    assert!(matches!(engine.query(&doc, "@dig"), Err(Error::ParseError(_))));
    assert!(matches!(
        engine.query(&doc, "a|@nope"),
        Err(Error::TransformNotFound(name)) if name == "nope"
    ));
}

#[test]
fn test_registry_is_per_engine() {
    fn shout(value: Value, _arg: Option<&str>) -> Option<Value> {
        value.as_str().map(|s| Value::String(s.to_uppercase()))
    }

    let custom = Engine::new(TransformRegistry::builtin().with("shout", shout));
    let plain = Engine::default();
    let doc = json!({"a": "hi"});

    assert_eq!(custom.get(&doc, "a|@shout").as_str(), Some("HI"));
    assert!(plain.query(&doc, "a|@shout").is_err());
}

#[test]
fn test_transform_arguments_reach_the_function() {
    fn take(value: Value, arg: Option<&str>) -> Option<Value> {
        let n: usize = arg?.parse().ok()?;
        match value {
            Value::Array(items) => Some(Value::Array(items.into_iter().take(n).collect())),
            _ => None,
        }
    }

    let engine = Engine::new(TransformRegistry::builtin().with("take", take));
    let doc = json!([1, 2, 3, 4]);
    assert_eq!(engine.get(&doc, "@take:2").value(), Some(&json!([1, 2])));
    assert!(!engine.get(&doc, "@take:x").exists());
}
