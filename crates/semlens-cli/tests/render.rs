//! Tests for CLI table rendering and argument parsing.

use comfy_table::Table;
use semlens_cli::render::{parse_mapping, profile_table, schema_table};
use semlens_model::{DataSource, SourceType, Value, builtin_schemas};
use semlens_transform::{TransformOptions, profile_columns};

fn plain(mut table: Table) -> String {
    table.force_no_tty();
    table.to_string()
}

#[test]
fn test_schema_table_marks_required_roles() {
    let text = plain(schema_table(&builtin_schemas()));

    assert!(text.contains("builtin-flow"));
    assert!(text.contains("source*"));
    assert!(text.contains("parent_id"));
    assert!(!text.contains("parent_id*"));
}

#[test]
fn test_profile_table_lists_columns() {
    let rows = vec![
        [("city".to_string(), Value::from("Oslo"))].into_iter().collect(),
        [("city".to_string(), Value::Null)].into_iter().collect(),
    ];
    let source = DataSource::new(SourceType::Csv, "c.csv", vec!["city".to_string()], rows);
    let profiles = profile_columns(&source, &[], &TransformOptions::default());

    let text = plain(profile_table(&profiles));

    assert!(text.contains("city"));
    assert!(text.contains("50%"));
    assert!(text.contains("Oslo (1)"));
}

#[test]
fn test_parse_mapping() {
    let mapping = parse_mapping(" from = source ").unwrap();
    assert_eq!(mapping.source_column, "from");
    assert_eq!(mapping.role_id, "source");

    assert!(parse_mapping("from").is_err());
    assert!(parse_mapping("=source").is_err());
}
