use doxmd_format::{xml_bytes_to_tree, xml_to_json, xml_to_tree};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Helper to get test data directory
fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
}

/// Discover all test file base names that have both an `.xml` and a `.json` file
fn discover_test_cases() -> Vec<String> {
    let data_dir = test_data_dir();
    let mut cases = Vec::new();

    if let Ok(entries) = fs::read_dir(&data_dir) {
        for entry in entries.flatten() {
            if let Some(stem) = entry.file_name().to_str().and_then(|n| n.strip_suffix(".xml")) {
                if data_dir.join(format!("{}.json", stem)).exists() {
                    cases.push(stem.to_string());
                }
            }
        }
    }

    cases.sort();
    cases
}

/// Helper to load test files
fn load_test_files(base_name: &str) -> (Vec<u8>, String) {
    let xml_path = test_data_dir().join(format!("{}.xml", base_name));
    let json_path = test_data_dir().join(format!("{}.json", base_name));

    let xml = fs::read(&xml_path)
        .unwrap_or_else(|_| panic!("Failed to read {}", xml_path.display()));
    let json = fs::read_to_string(&json_path)
        .unwrap_or_else(|_| panic!("Failed to read {}", json_path.display()));

    (xml, json)
}

/// Object keys in document order, recursively
fn key_order(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                out.push(k.clone());
                key_order(v, out);
            }
        }
        Value::Array(items) => items.iter().for_each(|v| key_order(v, out)),
        _ => {}
    }
}

// ============================================================================
// Fixture Conversion
// ============================================================================

#[test]
fn test_data_files_exist() {
    let test_cases = discover_test_cases();
    assert!(
        !test_cases.is_empty(),
        "No test cases found in {}",
        test_data_dir().display()
    );
}

#[test]
fn test_all_xml_matches_expected_tree() {
    for base_name in discover_test_cases() {
        let (xml, json) = load_test_files(&base_name);
        let expected: Value = serde_json::from_str(&json)
            .unwrap_or_else(|e| panic!("{}: bad expected JSON: {}", base_name, e));

        let actual = xml_bytes_to_tree(&xml)
            .unwrap_or_else(|e| panic!("{}: conversion failed: {}", base_name, e));

        assert_eq!(actual, expected, "{}: tree mismatch", base_name);
    }
}

#[test]
fn test_all_round_trip_tree_json_tree() {
    for base_name in discover_test_cases() {
        let (xml, _) = load_test_files(&base_name);
        let text = String::from_utf8(xml).unwrap();

        let tree = xml_to_tree(&text).unwrap();
        let json = xml_to_json(&text).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(back, tree, "{}: values differ after re-parse", base_name);

        let mut before = Vec::new();
        let mut after = Vec::new();
        key_order(&tree, &mut before);
        key_order(&back, &mut after);
        assert_eq!(before, after, "{}: key order changed", base_name);
    }
}

#[test]
fn test_every_element_has_three_fields() {
    fn check(value: &Value) {
        if let Value::Object(map) = value {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            assert_eq!(keys, ["name", "attrs", "children"]);
            assert!(map["name"].is_string());
            assert!(map["attrs"].as_object().unwrap().values().all(Value::is_string));
            map["children"].as_array().unwrap().iter().for_each(check);
        }
    }

    for base_name in discover_test_cases() {
        let (xml, _) = load_test_files(&base_name);
        check(&xml_bytes_to_tree(&xml).unwrap());
    }
}
