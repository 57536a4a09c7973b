//! Tests for the view transforms.

use proptest::prelude::*;
use semlens_model::{ColumnMapping, DataSource, DataType, Row, SourceType, Value, roles};
use semlens_transform::{InferredType, TransformOptions, ViewData, transform};

fn source(columns: &[&str], rows: Vec<Vec<Value>>) -> DataSource {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let parsed = rows
        .into_iter()
        .map(|values| columns.iter().cloned().zip(values).collect::<Row>())
        .collect();
    DataSource::new(SourceType::Csv, "test.csv", columns, parsed)
}

fn s(text: &str) -> Value {
    Value::from(text)
}

#[test]
fn test_hierarchy_promotes_orphans() {
    let data = source(
        &["id", "parent"],
        vec![
            vec![s("a"), s("")],
            vec![s("b"), s("a")],
            vec![s("c"), s("zzz")],
        ],
    );
    let mappings = vec![
        ColumnMapping::new("id", roles::NODE_ID),
        ColumnMapping::new("parent", roles::PARENT_ID),
    ];

    let forest = semlens_transform::to_hierarchy(&data, &mappings);

    let roots: Vec<&str> = forest.roots.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(roots, vec!["a", "c"]);
    assert_eq!(forest.roots[0].children.len(), 1);
    assert_eq!(forest.roots[0].children[0].id, "b");
    assert!(forest.roots[1].children.is_empty());
    assert!(forest.promoted_cycle_nodes.is_empty());
}

#[test]
fn test_hierarchy_breaks_parent_cycles() {
    let data = source(
        &["id", "parent"],
        vec![vec![s("a"), s("b")], vec![s("b"), s("a")]],
    );
    let mappings = vec![
        ColumnMapping::new("id", roles::NODE_ID),
        ColumnMapping::new("parent", roles::PARENT_ID),
    ];

    let forest = semlens_transform::to_hierarchy(&data, &mappings);

    assert_eq!(forest.node_count(), 2);
    assert_eq!(forest.promoted_cycle_nodes, vec!["a".to_string()]);
}

#[test]
fn test_hierarchy_collects_every_metric_mapping() {
    let data = source(
        &["id", "cost", "size"],
        vec![vec![s("a"), Value::Number(3.0), s("12")]],
    );
    let mappings = vec![
        ColumnMapping::new("id", roles::NODE_ID),
        ColumnMapping::new("cost", roles::METRICS).with_display_name("Cost"),
        ColumnMapping::new("size", roles::METRICS),
    ];

    let forest = semlens_transform::to_hierarchy(&data, &mappings);

    let metrics = &forest.roots[0].metrics;
    assert_eq!(metrics.get("Cost"), Some(&3.0));
    assert_eq!(metrics.get("size"), Some(&12.0));
}

#[test]
fn test_profile_counts_nulls_and_uniques() {
    let data = source(
        &["n"],
        vec![
            vec![Value::Number(1.0)],
            vec![Value::Number(2.0)],
            vec![Value::Number(2.0)],
            vec![Value::Null],
            vec![Value::Number(4.0)],
        ],
    );

    let profiles = semlens_transform::profile_columns(&data, &[], &TransformOptions::default());

    let profile = &profiles[0];
    assert_eq!(profile.total_count, 5);
    assert_eq!(profile.null_count, 1);
    assert_eq!(profile.unique_count, 3);
    assert_eq!(profile.data_type, InferredType::Number);
    let stats = profile.numeric_stats.as_ref().expect("numeric stats");
    assert_eq!(stats.mean, 2.25);
    assert_eq!(stats.median, 2.0);
    assert_eq!((stats.min, stats.max), (1.0, 4.0));
}

#[test]
fn test_profile_covers_unmapped_columns() {
    let data = source(&["a", "b"], vec![vec![s("x"), s("y")]]);
    let mappings = vec![ColumnMapping::new("b", roles::COLUMN).with_display_name("Bee")];

    let profiles = semlens_transform::profile_columns(&data, &mappings, &TransformOptions::default());

    let names: Vec<&str> = profiles.iter().map(|p| p.display_name.as_str()).collect();
    assert_eq!(names, vec!["a", "Bee"]);
}

#[test]
fn test_profile_respects_top_values_limit() {
    let rows = (0..20).map(|i| vec![Value::Number(f64::from(i))]).collect();
    let data = source(&["n"], rows);
    let options = TransformOptions::default().with_top_values_limit(3);

    let profiles = semlens_transform::profile_columns(&data, &[], &options);

    assert_eq!(profiles[0].top_values.len(), 3);
}

#[test]
fn test_timeline_sorts_and_drops_bad_ends() {
    let data = source(
        &["start", "end", "what"],
        vec![
            vec![s("2024-05-01"), s("2024-04-01"), s("late")],
            vec![s("not a date"), s(""), s("skipped")],
            vec![s("2024-01-01"), s("2024-02-01"), s("early")],
        ],
    );
    let mappings = vec![
        ColumnMapping::new("start", roles::START_DATE),
        ColumnMapping::new("end", roles::END_DATE),
        ColumnMapping::new("what", roles::EVENT_LABEL),
    ];

    let events = semlens_transform::to_timeline(&data, &mappings);

    let labels: Vec<&str> = events.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["early", "late"]);
    assert!(events[0].end.is_some());
    assert!(events[1].end.is_none());
    assert_eq!(events[1].id, "event-0");
}

#[test]
fn test_geographic_skips_zero_and_out_of_range() {
    let data = source(
        &["lat", "lon"],
        vec![
            vec![Value::Number(48.85), Value::Number(2.35)],
            vec![Value::Number(0.0), Value::Number(10.0)],
            vec![Value::Number(95.0), Value::Number(10.0)],
            vec![Value::Null, Value::Number(10.0)],
            vec![s("north"), Value::Number(10.0)],
        ],
    );
    let mappings = vec![
        ColumnMapping::new("lat", roles::LATITUDE),
        ColumnMapping::new("lon", roles::LONGITUDE),
    ];

    let points = semlens_transform::to_geographic(&data, &mappings);

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].latitude, 48.85);
}

#[test]
fn test_heatmap_sums_duplicate_cells() {
    let data = source(
        &["r", "c", "v"],
        vec![
            vec![s("x"), s("p"), Value::Number(1.0)],
            vec![s("y"), s("q"), Value::Number(5.0)],
            vec![s("x"), s("p"), Value::Number(2.0)],
            vec![s("x"), s("q"), s("n/a")],
        ],
    );
    let mappings = vec![
        ColumnMapping::new("r", roles::ROW_LABEL),
        ColumnMapping::new("c", roles::COLUMN_LABEL),
        ColumnMapping::new("v", roles::VALUE),
    ];

    let matrix = semlens_transform::to_heatmap(&data, &mappings).expect("mapped heatmap");

    assert_eq!(matrix.rows, vec!["x", "y"]);
    assert_eq!(matrix.columns, vec!["p", "q"]);
    assert_eq!(matrix.get("x", "p"), Some(3.0));
    assert_eq!(matrix.get("x", "q"), None);
    assert_eq!((matrix.min, matrix.max), (Some(3.0), Some(5.0)));
}

#[test]
fn test_heatmap_skips_infinite_values() {
    let data = source(
        &["r", "c", "v"],
        vec![
            vec![s("x"), s("p"), Value::Number(f64::INFINITY)],
            vec![s("x"), s("p"), Value::Number(f64::NEG_INFINITY)],
            vec![s("x"), s("p"), Value::Number(4.0)],
            vec![s("y"), s("p"), Value::Number(f64::INFINITY)],
        ],
    );
    let mappings = vec![
        ColumnMapping::new("r", roles::ROW_LABEL),
        ColumnMapping::new("c", roles::COLUMN_LABEL),
        ColumnMapping::new("v", roles::VALUE),
    ];

    let matrix = semlens_transform::to_heatmap(&data, &mappings).expect("mapped heatmap");

    assert_eq!(matrix.rows, vec!["x"]);
    assert_eq!(matrix.get("x", "p"), Some(4.0));
    assert_eq!((matrix.min, matrix.max), (Some(4.0), Some(4.0)));
}

#[test]
fn test_treemap_rolls_up_totals() {
    let data = source(
        &["id", "parent", "size"],
        vec![
            vec![s("root"), s(""), Value::Number(1.0)],
            vec![s("a"), s("root"), Value::Number(2.0)],
            vec![s("b"), s("a"), Value::Number(-4.0)],
            vec![s("c"), s("a"), Value::Number(3.0)],
        ],
    );
    let mappings = vec![
        ColumnMapping::new("id", roles::NODE_ID),
        ColumnMapping::new("parent", roles::PARENT_ID),
        ColumnMapping::new("size", roles::VALUE),
    ];

    let roots = semlens_transform::to_treemap(&data, &mappings);

    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].total, 6.0);
    assert_eq!(roots[0].children[0].total, 5.0);
    assert_eq!(roots[0].children[0].children[0].value, 0.0);
}

#[test]
fn test_flow_aggregates_and_skips_self_loops() {
    let data = source(
        &["from", "to", "amount"],
        vec![
            vec![s("a"), s("b"), Value::Number(2.0)],
            vec![s("a"), s("a"), Value::Number(9.0)],
            vec![s("a"), s("b"), Value::Number(3.0)],
            vec![s("b"), s("c"), Value::Number(0.0)],
            vec![s("b"), s("c"), Value::Number(1.0)],
        ],
    );
    let mappings = vec![
        ColumnMapping::new("from", roles::SOURCE),
        ColumnMapping::new("to", roles::TARGET),
        ColumnMapping::new("amount", roles::VALUE),
    ];

    let flow = semlens_transform::to_flow(&data, &mappings);

    let nodes: Vec<&str> = flow.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(nodes, vec!["a", "b", "c"]);
    assert_eq!(flow.links.len(), 2);
    assert_eq!(flow.links[0].value, 5.0);
    assert_eq!(flow.total(), 6.0);
}

#[test]
fn test_network_keeps_parallel_edges_until_merged() {
    let data = source(
        &["from", "to", "w"],
        vec![
            vec![s("a"), s("b"), Value::Number(2.0)],
            vec![s("a"), s("b"), Value::Null],
            vec![s("b"), s(""), Value::Number(1.0)],
        ],
    );
    let mappings = vec![
        ColumnMapping::new("from", roles::SOURCE_NODE),
        ColumnMapping::new("to", roles::TARGET_NODE),
        ColumnMapping::new("w", roles::EDGE_WEIGHT),
    ];

    let graph = semlens_transform::to_network(&data, &mappings);

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 2);
    let merged = graph.merge_parallel_edges();
    assert_eq!(merged.edges.len(), 1);
    assert_eq!(merged.edges[0].weight, Some(3.0));
}

#[test]
fn test_unmapped_required_roles_soft_fail() {
    let data = source(&["x"], vec![vec![s("1")]]);
    let stale = vec![ColumnMapping::new("gone", roles::NODE_ID)];
    let options = TransformOptions::default();

    for data_type in DataType::ALL {
        let view = transform(data_type, &data, &stale, &options);
        assert_eq!(view.data_type(), data_type);
        if data_type != DataType::Tabular {
            assert!(view.is_empty(), "{data_type} should be empty");
        }
    }
    assert_eq!(
        transform(DataType::Heatmap, &data, &stale, &options),
        ViewData::Heatmap(None)
    );
}

#[test]
fn test_view_data_serializes_with_view_tag() {
    let data = source(&["from", "to"], vec![vec![s("a"), s("b")]]);
    let mappings = vec![
        ColumnMapping::new("from", roles::SOURCE),
        ColumnMapping::new("to", roles::TARGET),
    ];

    let view = transform(DataType::Flow, &data, &mappings, &TransformOptions::default());
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["view"], "flow");
    assert_eq!(json["data"]["links"][0]["value"], 1.0);
}

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-50i32..50).prop_map(|n| Value::Number(f64::from(n))),
        "[a-d]{0,2}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn prop_transforms_are_deterministic(
        rows in prop::collection::vec(prop::collection::vec(cell(), 3), 0..12),
        data_index in 0usize..DataType::ALL.len(),
    ) {
        let data = source(&["a", "b", "c"], rows);
        let data_type = DataType::ALL[data_index];
        let mappings = vec![
            ColumnMapping::new("a", roles::NODE_ID),
            ColumnMapping::new("b", roles::PARENT_ID),
            ColumnMapping::new("a", roles::SOURCE_NODE),
            ColumnMapping::new("b", roles::TARGET_NODE),
            ColumnMapping::new("a", roles::SOURCE),
            ColumnMapping::new("b", roles::TARGET),
            ColumnMapping::new("a", roles::ROW_LABEL),
            ColumnMapping::new("b", roles::COLUMN_LABEL),
            ColumnMapping::new("c", roles::VALUE),
            ColumnMapping::new("c", roles::START_DATE),
            ColumnMapping::new("b", roles::LATITUDE),
            ColumnMapping::new("c", roles::LONGITUDE),
        ];
        let options = TransformOptions::default();

        let first = transform(data_type, &data, &mappings, &options);
        let second = transform(data_type, &data, &mappings, &options);

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_hierarchy_places_every_distinct_id_once(
        links in prop::collection::vec((0u8..8, 0u8..8), 0..16),
    ) {
        let rows = links
            .iter()
            .map(|(id, parent)| vec![Value::from(format!("n{id}")), Value::from(format!("n{parent}"))])
            .collect();
        let data = source(&["id", "parent"], rows);
        let mappings = vec![
            ColumnMapping::new("id", roles::NODE_ID),
            ColumnMapping::new("parent", roles::PARENT_ID),
        ];
        let distinct: std::collections::BTreeSet<u8> = links.iter().map(|(id, _)| *id).collect();

        let forest = semlens_transform::to_hierarchy(&data, &mappings);

        prop_assert_eq!(forest.node_count(), distinct.len());
    }
}
