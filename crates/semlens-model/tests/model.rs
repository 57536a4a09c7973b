//! Tests for semlens-model types.

use chrono::{TimeZone, Utc};
use semlens_model::{
    ColumnMapping, DataBundle, DataSource, DataType, JoinCondition, JoinDefinition, JoinOperator,
    JoinType, Row, SchemaRegistry, SourceType, Value, VirtualBundle, VirtualBundleKind,
    builtin_schema_id, roles, validate_mappings,
};

fn sample_bundle() -> DataBundle {
    let mut row = Row::new();
    row.insert("id".to_string(), Value::Number(1.0));
    row.insert("name".to_string(), Value::from("alpha"));
    let source = DataSource::new(
        SourceType::Csv,
        "people.csv",
        vec!["id".to_string(), "name".to_string()],
        vec![row],
    );
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    DataBundle::new("b1", "People", builtin_schema_id(DataType::Tabular), source, created)
}

#[test]
fn test_bundle_round_trips_through_json() {
    let bundle = sample_bundle();
    let json = serde_json::to_value(&bundle).expect("serialize bundle");
    assert_eq!(json["schemaId"], "builtin-tabular");
    assert_eq!(json["source"]["type"], "csv");
    assert_eq!(json["source"]["parsedData"][0]["id"], 1.0);
    assert!(json.get("description").is_none());
    let back: DataBundle = serde_json::from_value(json).expect("deserialize bundle");
    assert_eq!(back, bundle);
}

#[test]
fn test_with_mappings_returns_updated_copy() {
    let bundle = sample_bundle();
    let later = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
    let updated = bundle.with_mappings(vec![ColumnMapping::new("id", roles::COLUMN)], later);
    assert!(bundle.mappings.is_empty());
    assert_eq!(updated.mappings.len(), 1);
    assert_eq!(updated.created_at, bundle.created_at);
    assert_eq!(updated.updated_at, later);
}

#[test]
fn test_join_definition_uses_operator_symbols() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let join = JoinDefinition::new(
        "j1",
        "People to orders",
        "b1",
        "b2",
        JoinType::Left,
        vec![
            JoinCondition::eq("id", "person_id"),
            JoinCondition::new("age", JoinOperator::Ge, "min_age"),
        ],
        now,
    );
    let json = serde_json::to_value(&join).expect("serialize join");
    assert_eq!(json["joinType"], "left");
    assert_eq!(json["conditions"][0]["operator"], "=");
    assert_eq!(json["conditions"][1]["operator"], ">=");
    assert_eq!(json["conditions"][1]["leftRoleId"], "age");
    let back: JoinDefinition = serde_json::from_value(json).expect("deserialize join");
    assert_eq!(back, join);
    assert!(back.references_bundle("b2"));
}

#[test]
fn test_virtual_bundle_serializes_type_tag() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let vb = VirtualBundle {
        id: "v1".to_string(),
        name: "Joined".to_string(),
        description: None,
        kind: VirtualBundleKind::Join,
        source_join_ids: vec!["j1".to_string()],
        schema_id: builtin_schema_id(DataType::Tabular),
        created_at: now,
        updated_at: now,
    };
    let json = serde_json::to_value(&vb).expect("serialize virtual bundle");
    assert_eq!(json["type"], "join");
    assert_eq!(json["sourceJoinIds"][0], "j1");
}

#[test]
fn test_builtin_tabular_schema_accepts_empty_mappings() {
    let registry = SchemaRegistry::builtin();
    let schema = registry
        .get(&builtin_schema_id(DataType::Tabular))
        .expect("tabular schema");
    let bundle = sample_bundle();
    let report = validate_mappings(schema, &bundle.source, &bundle.mappings);
    assert!(report.is_usable());
    assert!(report.issues.is_empty());
}
