use lingo_tools::flatten::{self, ConflictPolicy, UnflattenOptions};
use lingo_tools::io::excel_read;
use lingo_tools::io::excel_write;
use lingo_tools::io::{self, QuoteStyle, RenderOptions, YamlStyle};
use lingo_tools::model::TreeValue;
use lingo_tools::sync::{self, ConvertOptions};
use lingo_tools::table::{self, SheetTable, VALUE_COLUMN};
use lingo_tools::ToolError;
use std::fs;
use tempfile::tempdir;

fn sample() -> serde_json::Value {
    serde_json::json!({
        "name": "John Doe",
        "age": 30,
        "city": "New York",
        "address": {
            "street": "123 Main St",
            "zip": "10001"
        }
    })
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("JSON file read");
    serde_json::from_str(&text).expect("JSON parsed")
}

#[test]
fn json_excel_roundtrip_coerces_leaves_to_text() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("sample.json");
    let xlsx_path = temp_dir.path().join("sample.xlsx");
    let restored_path = temp_dir.path().join("sample3.json");
    fs::write(&json_path, serde_json::to_string_pretty(&sample()).unwrap())
        .expect("JSON input written");

    let options = ConvertOptions::default();
    sync::convert(&json_path, &xlsx_path, &options).expect("JSON to Excel");
    sync::convert(&xlsx_path, &restored_path, &options).expect("Excel to JSON");

    assert_eq!(
        read_json(&restored_path),
        serde_json::json!({
            "address": {"street": "123 Main St", "zip": "10001"},
            "age": "30",
            "city": "New York",
            "name": "John Doe"
        })
    );
}

#[test]
fn excel_rows_are_sorted_by_key() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("sample.json");
    let xlsx_path = temp_dir.path().join("sample.xlsx");
    fs::write(&json_path, serde_json::to_string(&sample()).unwrap()).expect("JSON input written");

    sync::convert(&json_path, &xlsx_path, &ConvertOptions::default()).expect("JSON to Excel");

    let sheet = excel_read::read_sheet(&xlsx_path, None).expect("Excel read");
    assert_eq!(sheet.sheet_name, "Sheet1");
    assert_eq!(sheet.columns, ["key", "value"]);
    let keys: Vec<&str> = sheet.rows.iter().map(|row| row[0].as_str()).collect();
    assert_eq!(keys, ["address.street", "address.zip", "age", "city", "name"]);
}

#[test]
fn json_yaml_json_roundtrip_preserves_types_and_order() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("sample.json");
    let yaml_path = temp_dir.path().join("sample.yaml");
    let back_path = temp_dir.path().join("sample2.json");
    let source = serde_json::json!({
        "zeta": "last letter",
        "alpha": {"enabled": true, "ratio": 0.5, "items": ["x", "y"], "none": null}
    });
    fs::write(&json_path, serde_json::to_string(&source).unwrap()).expect("JSON input written");

    let options = ConvertOptions::default();
    sync::convert(&json_path, &yaml_path, &options).expect("JSON to YAML");
    let yaml = fs::read_to_string(&yaml_path).expect("YAML read");
    assert!(yaml.starts_with("'zeta': 'last letter'\n'alpha':\n"));

    sync::convert(&yaml_path, &back_path, &options).expect("YAML to JSON");
    let text = fs::read_to_string(&back_path).expect("JSON read");
    assert!(text.starts_with("{\n    \"zeta\""));
    assert_eq!(read_json(&back_path), source);
}

#[test]
fn excel_to_yaml_uses_single_quotes() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("messages.xlsx");
    let yaml_path = temp_dir.path().join("messages.yml");

    let sheet = SheetTable {
        sheet_name: "Sheet1".to_string(),
        columns: vec!["key".into(), "value".into()],
        rows: vec![
            vec!["menu.open".into(), "Open".into()],
            vec!["count".into(), "3".into()],
            vec!["menu.quit".into(), "Don't go".into()],
        ],
    };
    excel_write::write_sheet(&xlsx_path, &sheet).expect("Excel written");

    sync::convert(&xlsx_path, &yaml_path, &ConvertOptions::default()).expect("Excel to YAML");
    let yaml = fs::read_to_string(&yaml_path).expect("YAML read");
    assert_eq!(
        yaml,
        "'count': '3'\n'menu':\n  'open': 'Open'\n  'quit': 'Don''t go'\n"
    );
}

#[test]
fn plain_yaml_style_is_available() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("sample.json");
    let yaml_path = temp_dir.path().join("sample.yaml");
    fs::write(&json_path, r#"{"name": "John", "age": 30}"#).expect("JSON input written");

    let options = ConvertOptions {
        render: RenderOptions {
            yaml: YamlStyle {
                quotes: QuoteStyle::Plain,
                ..YamlStyle::default()
            },
            ..RenderOptions::default()
        },
        ..ConvertOptions::default()
    };
    sync::convert(&json_path, &yaml_path, &options).expect("JSON to YAML");
    assert_eq!(
        fs::read_to_string(&yaml_path).expect("YAML read"),
        "name: John\nage: 30\n"
    );
}

#[test]
fn empty_document_produces_header_only_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("empty.json");
    let xlsx_path = temp_dir.path().join("empty.xlsx");
    let back_path = temp_dir.path().join("back.json");
    fs::write(&json_path, "{}").expect("JSON input written");

    let options = ConvertOptions::default();
    sync::convert(&json_path, &xlsx_path, &options).expect("JSON to Excel");

    let sheet = excel_read::read_sheet(&xlsx_path, None).expect("Excel read");
    assert_eq!(sheet.columns, ["key", "value"]);
    assert!(sheet.rows.is_empty());

    sync::convert(&xlsx_path, &back_path, &options).expect("Excel to JSON");
    assert_eq!(read_json(&back_path), serde_json::json!({}));
}

#[test]
fn blank_cells_survive_as_empty_strings() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("blank.xlsx");
    let json_path = temp_dir.path().join("blank.json");

    let sheet = SheetTable {
        sheet_name: "Sheet1".to_string(),
        columns: vec!["key".into(), "value".into()],
        rows: vec![
            vec!["k".into(), String::new()],
            vec!["other".into(), "set".into()],
        ],
    };
    excel_write::write_sheet(&xlsx_path, &sheet).expect("Excel written");
    sync::convert(&xlsx_path, &json_path, &ConvertOptions::default()).expect("Excel to JSON");

    assert_eq!(
        read_json(&json_path),
        serde_json::json!({"k": "", "other": "set"})
    );
}

#[test]
fn sheet_without_key_column_is_rejected_and_nothing_is_written() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("wrong.xlsx");
    let json_path = temp_dir.path().join("wrong.json");

    let sheet = SheetTable {
        sheet_name: "Sheet1".to_string(),
        columns: vec!["id".into(), "value".into()],
        rows: vec![vec!["a".into(), "1".into()]],
    };
    excel_write::write_sheet(&xlsx_path, &sheet).expect("Excel written");

    let error = sync::convert(&xlsx_path, &json_path, &ConvertOptions::default())
        .expect_err("schema mismatch");
    assert!(matches!(error.root(), ToolError::SchemaMismatch { .. }));
    assert!(!json_path.exists());
}

#[test]
fn unsupported_pairs_fail_without_output() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("a.json");
    fs::write(&json_path, "{}").expect("JSON input written");

    let same = temp_dir.path().join("b.json");
    let unknown = temp_dir.path().join("b.csv");
    let options = ConvertOptions::default();

    assert!(matches!(
        sync::convert(&json_path, &same, &options),
        Err(ToolError::UnsupportedConversion { .. })
    ));
    assert!(matches!(
        sync::convert(&json_path, &unknown, &options),
        Err(ToolError::UnsupportedFormat(_))
    ));
    assert!(!same.exists());
    assert!(!unknown.exists());
}

#[test]
fn malformed_input_leaves_previous_output_untouched() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("broken.json");
    let yaml_path = temp_dir.path().join("out.yaml");
    fs::write(&json_path, "{\"a\": ").expect("JSON input written");
    fs::write(&yaml_path, "'keep': 'me'\n").expect("previous output written");

    let error = sync::convert(&json_path, &yaml_path, &ConvertOptions::default())
        .expect_err("parse error");
    assert!(matches!(error.root(), ToolError::Parse { .. }));
    assert_eq!(
        fs::read_to_string(&yaml_path).expect("YAML read"),
        "'keep': 'me'\n"
    );
}

#[test]
fn conflict_policy_applies_to_excel_import() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("conflict.xlsx");
    let json_path = temp_dir.path().join("conflict.json");

    let sheet = SheetTable {
        sheet_name: "Sheet1".to_string(),
        columns: vec!["key".into(), "value".into()],
        rows: vec![
            vec!["a.b".into(), "nested".into()],
            vec!["a".into(), "scalar".into()],
        ],
    };
    excel_write::write_sheet(&xlsx_path, &sheet).expect("Excel written");

    sync::convert(&xlsx_path, &json_path, &ConvertOptions::default()).expect("overwrite");
    assert_eq!(
        read_json(&json_path),
        serde_json::json!({"a": {"b": "nested"}})
    );

    let strict = ConvertOptions {
        unflatten: UnflattenOptions {
            on_conflict: ConflictPolicy::Reject,
            ..UnflattenOptions::default()
        },
        ..ConvertOptions::default()
    };
    let error = sync::convert(&xlsx_path, &json_path, &strict).expect_err("conflict");
    assert!(matches!(
        error.root(),
        ToolError::StructuralConflict { key, path } if key == "a.b" && path == "a"
    ));
}

#[test]
fn named_sheet_is_written_and_read() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("sample.json");
    let xlsx_path = temp_dir.path().join("sample.xlsx");
    let back_path = temp_dir.path().join("back.json");
    fs::write(&json_path, r#"{"a": {"b": 1}}"#).expect("JSON input written");

    let options = ConvertOptions {
        sheet_name: Some("messages".to_string()),
        ..ConvertOptions::default()
    };
    sync::convert(&json_path, &xlsx_path, &options).expect("JSON to Excel");
    sync::convert(&xlsx_path, &back_path, &options).expect("Excel to JSON");
    assert_eq!(read_json(&back_path), serde_json::json!({"a": {"b": "1"}}));

    let missing = ConvertOptions {
        sheet_name: Some("absent".to_string()),
        ..ConvertOptions::default()
    };
    let error = sync::convert(&xlsx_path, &back_path, &missing).expect_err("missing sheet");
    assert!(matches!(error.root(), ToolError::InvalidWorkbook(_)));
}

#[test]
fn in_memory_pipeline_matches_scenario() {
    let tree = io::parse_tree(r#"{"a": {"b": 1}}"#, io::TreeFormat::Json).expect("parsed");
    let map = flatten::flatten(&tree).expect("flattened");
    let sheet = table::to_rows(&map, VALUE_COLUMN, "Sheet1").expect("tabulated");
    assert_eq!(sheet.rows, vec![vec!["a.b".to_string(), "1".to_string()]]);

    let back = table::from_rows(&sheet, VALUE_COLUMN).expect("read back");
    let restored = flatten::unflatten(&back).expect("unflattened");
    assert_eq!(
        restored,
        TreeValue::from(serde_json::json!({"a": {"b": "1"}}))
    );
}

#[test]
fn empty_keys_are_rejected_before_writing() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("out.xlsx");

    let inputs = [
        ("empty.json", r#"{"": "v", "a": "x"}"#),
        ("scalar.json", r#""alone""#),
    ];
    for (name, text) in inputs {
        let json_path = temp_dir.path().join(name);
        fs::write(&json_path, text).expect("JSON input written");
        let error = sync::convert(&json_path, &xlsx_path, &ConvertOptions::default())
            .expect_err("empty key path");
        assert!(matches!(error.root(), ToolError::EmptyKeyPath));
        assert!(!xlsx_path.exists());
    }
}

#[test]
fn whitespace_keys_survive_excel_roundtrip() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("space.json");
    let xlsx_path = temp_dir.path().join("space.xlsx");
    let restored_path = temp_dir.path().join("space-back.json");
    let source = serde_json::json!({" ": "v", "a": "x"});
    fs::write(&json_path, source.to_string()).expect("JSON input written");

    let options = ConvertOptions::default();
    sync::convert(&json_path, &xlsx_path, &options).expect("JSON to Excel");
    sync::convert(&xlsx_path, &restored_path, &options).expect("Excel to JSON");
    assert_eq!(read_json(&restored_path), source);
}

#[test]
fn escaped_cell_text_survives_excel_roundtrip() {
    let temp_dir = tempdir().expect("temporary directory");
    let json_path = temp_dir.path().join("escapes.json");
    let xlsx_path = temp_dir.path().join("escapes.xlsx");
    let restored_path = temp_dir.path().join("escapes-back.json");
    let source = serde_json::json!({
        "a": "x\u{0001}y",
        "b": "_x0041_",
        "c": "line\nbreak\ttab"
    });
    fs::write(&json_path, source.to_string()).expect("JSON input written");

    let options = ConvertOptions::default();
    sync::convert(&json_path, &xlsx_path, &options).expect("JSON to Excel");
    sync::convert(&xlsx_path, &restored_path, &options).expect("Excel to JSON");
    assert_eq!(read_json(&restored_path), source);
}
