//! Tests for lineage graph construction and queries.

use chrono::{TimeZone, Utc};
use semlens_lineage::{EdgeKind, LineageGraph, NodeKind, schema_node_id};
use semlens_model::{
    DataBundle, DataSource, DataType, JoinCondition, JoinDefinition, JoinType, SemanticRole,
    SemanticSchema, SourceType, VirtualBundle, VirtualBundleKind,
};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn bundle(id: &str) -> DataBundle {
    let source = DataSource::new(SourceType::Csv, format!("{id}.csv"), vec!["k".to_string()], vec![]);
    DataBundle::new(id, id.to_uppercase(), "s", source, now())
}

fn join(id: &str, left: &str, right: &str) -> JoinDefinition {
    JoinDefinition::new(
        id,
        id,
        left,
        right,
        JoinType::Inner,
        vec![JoinCondition::eq("k", "k")],
        now(),
    )
}

fn virtual_bundle(id: &str, joins: &[&str]) -> VirtualBundle {
    VirtualBundle {
        id: id.to_string(),
        name: id.to_uppercase(),
        description: None,
        kind: VirtualBundleKind::Join,
        source_join_ids: joins.iter().map(|j| j.to_string()).collect(),
        schema_id: "s".to_string(),
        created_at: now(),
        updated_at: now(),
    }
}

fn schema() -> SemanticSchema {
    SemanticSchema {
        id: "s".to_string(),
        name: "Keys".to_string(),
        description: String::new(),
        data_type: DataType::Tabular,
        roles: vec![SemanticRole::new("k", "Key")],
    }
}

fn sample() -> LineageGraph {
    LineageGraph::build(
        &[bundle("a"), bundle("b"), bundle("c")],
        &[join("j1", "a", "b")],
        &[virtual_bundle("v", &["j1"])],
        &[schema()],
    )
}

#[test]
fn test_build_adds_nodes_and_edges_in_order() {
    let graph = sample();

    assert_eq!(graph.node_count(), 5);
    // 3 uses_schema + 1 join + 2 derived_from
    assert_eq!(graph.edge_count(), 6);
    let kinds: Vec<NodeKind> = graph.nodes().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Bundle,
            NodeKind::Bundle,
            NodeKind::Bundle,
            NodeKind::Schema,
            NodeKind::VirtualBundle
        ]
    );
    assert_eq!(graph.node(&schema_node_id("s")).unwrap().label, "Keys");
    assert_eq!(graph.node("a").unwrap().metadata.column_count, Some(1));
}

#[test]
fn test_traversals_skip_schema_nodes() {
    let graph = sample();

    assert_eq!(graph.downstream_bundles("a"), vec!["b", "v"]);
    assert_eq!(graph.upstream_bundles("v"), vec!["a", "b"]);
    assert!(graph.downstream_bundles("c").is_empty());
    assert!(graph.upstream_bundles("missing").is_empty());
}

#[test]
fn test_find_path_is_shortest_and_directed() {
    let graph = sample();

    assert_eq!(
        graph.find_path("a", "v"),
        Some(vec!["a".to_string(), "v".to_string()])
    );
    assert_eq!(graph.find_path("a", "a"), Some(vec!["a".to_string()]));
    assert_eq!(graph.find_path("v", "a"), None);
    assert_eq!(graph.find_path("c", "v"), None);
    assert_eq!(graph.find_path("a", "nowhere"), None);
}

#[test]
fn test_cycle_detection() {
    assert!(!sample().has_circular_dependencies());

    let cyclic = LineageGraph::build(
        &[bundle("a"), bundle("b")],
        &[join("j1", "a", "b"), join("j2", "b", "a")],
        &[],
        &[],
    );
    assert!(cyclic.has_circular_dependencies());
}

#[test]
fn test_dangling_references_are_omitted() {
    // Bundle "b" was deleted but the join and virtual bundle remain.
    let graph = LineageGraph::build(
        &[bundle("a")],
        &[join("j1", "a", "b")],
        &[virtual_bundle("v", &["j1", "j-gone"])],
        &[],
    );

    assert_eq!(graph.node_count(), 2);
    let edges: Vec<(EdgeKind, &str, &str)> = graph
        .edges()
        .map(|e| (e.kind, e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(edges, vec![(EdgeKind::DerivedFrom, "a", "v")]);
    assert!(!graph.has_circular_dependencies());
}

#[test]
fn test_duplicate_ids_keep_first_node() {
    let graph = LineageGraph::build(
        &[bundle("a"), bundle("a")],
        &[],
        &[virtual_bundle("a", &[])],
        &[],
    );

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.node("a").unwrap().kind, NodeKind::Bundle);
}

#[test]
fn test_impact_lists_dependents_and_joins() {
    let graph = sample();

    let impact = graph.impact_of("b");
    assert_eq!(impact.downstream, vec!["v"]);
    assert_eq!(impact.join_ids, vec!["j1"]);
    assert!(graph.impact_of("c").is_empty());
    assert_eq!(graph.edges_of("b").len(), 3);
}

#[test]
fn test_visualization_export_uses_type_tags() {
    let export = sample().to_visualization();
    let json = serde_json::to_value(&export).unwrap();

    assert_eq!(json["nodes"][4]["type"], "virtual_bundle");
    assert_eq!(json["edges"][3]["type"], "join");
    assert_eq!(json["edges"][3]["joinId"], "j1");
    assert_eq!(json["nodes"][0]["metadata"]["rowCount"], 0);
}

#[test]
fn test_knowledge_graph_relationships() {
    let graph = LineageGraph::build(
        &[bundle("a"), bundle("b")],
        &[join("j1", "a", "b")],
        &[virtual_bundle("v", &["j1"])],
        &[schema()],
    );

    let export = graph.to_knowledge_graph();
    let types: Vec<&str> = export.entities.iter().map(|e| e.entity_type.as_str()).collect();
    assert_eq!(types, vec!["Dataset", "Dataset", "Schema", "DerivedDataset"]);

    insta::assert_json_snapshot!(export.relationships, @r#"
    [
      {
        "sourceId": "a",
        "targetId": "schema:s",
        "relationshipType": "USES_SCHEMA",
        "properties": {
          "label": "uses schema"
        }
      },
      {
        "sourceId": "b",
        "targetId": "schema:s",
        "relationshipType": "USES_SCHEMA",
        "properties": {
          "label": "uses schema"
        }
      },
      {
        "sourceId": "a",
        "targetId": "b",
        "relationshipType": "JOIN",
        "properties": {
          "joinId": "j1",
          "label": "inner join"
        }
      },
      {
        "sourceId": "a",
        "targetId": "v",
        "relationshipType": "DERIVED_FROM",
        "properties": {
          "joinId": "j1",
          "label": "derived from"
        }
      },
      {
        "sourceId": "b",
        "targetId": "v",
        "relationshipType": "DERIVED_FROM",
        "properties": {
          "joinId": "j1",
          "label": "derived from"
        }
      }
    ]
    "#);
}
