//! Tests for loading files from disk.

use std::fs;

use semlens_ingest::{IngestError, IngestOptions, load_path};
use semlens_model::{SourceType, Value};

#[test]
fn test_load_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.csv");
    fs::write(&path, "\u{feff}id,total,paid\n1, 9.5 ,TRUE\n2,,false\n").unwrap();

    let source = load_path(&path, &IngestOptions::default()).unwrap();

    assert_eq!(source.source_type, SourceType::Csv);
    assert_eq!(source.file_name, "orders.csv");
    assert_eq!(source.columns, vec!["id", "total", "paid"]);
    assert_eq!(source.parsed_data[0]["total"], Value::Number(9.5));
    assert_eq!(source.parsed_data[1]["total"], Value::Null);
    assert_eq!(source.parsed_data[1]["paid"], Value::Bool(false));
    assert!(!source.raw_data.is_empty());
}

#[test]
fn test_load_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.JSON");
    fs::write(&path, r#"[{"name": "Ada", "age": 36}]"#).unwrap();

    let source = load_path(&path, &IngestOptions::default().with_keep_raw(false)).unwrap();

    assert_eq!(source.source_type, SourceType::Json);
    assert_eq!(source.parsed_data[0]["age"], Value::Number(36.0));
    assert!(source.raw_data.is_empty());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_path(&dir.path().join("nope.csv"), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn test_size_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.csv");
    fs::write(&path, "a\n1\n2\n3\n").unwrap();

    let options = IngestOptions::default().with_max_file_size(4);
    let err = load_path(&path, &options).unwrap_err();

    assert!(matches!(err, IngestError::FileTooLarge { max_size: 4, .. }));
}

#[test]
fn test_rejects_unknown_extension_and_utf16() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("notes.txt");
    fs::write(&txt, "a\n").unwrap();
    assert!(matches!(
        load_path(&txt, &IngestOptions::default()),
        Err(IngestError::UnsupportedFormat { .. })
    ));

    let utf16 = dir.path().join("wide.csv");
    fs::write(&utf16, [0xFF, 0xFE, b'a', 0]).unwrap();
    assert!(matches!(
        load_path(&utf16, &IngestOptions::default()),
        Err(IngestError::UnsupportedEncoding { encoding: "UTF-16 LE", .. })
    ));
}
