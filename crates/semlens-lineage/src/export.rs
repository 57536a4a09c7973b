//! Read-only projections of a lineage graph.

use std::collections::BTreeMap;

use crate::graph::LineageGraph;
use crate::types::{KgEntity, KgRelationship, KnowledgeGraphExport, LineageExport, NodeKind};

impl LineageGraph {
    /// Node and edge arrays for a graph renderer.
    pub fn to_visualization(&self) -> LineageExport {
        LineageExport {
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().cloned().collect(),
        }
    }

    /// Entities and relationships for an external knowledge-graph indexer.
    pub fn to_knowledge_graph(&self) -> KnowledgeGraphExport {
        let entities = self
            .nodes()
            .map(|node| {
                let mut properties = BTreeMap::new();
                let meta = &node.metadata;
                if let Some(rows) = meta.row_count {
                    properties.insert("rowCount".to_string(), rows.to_string());
                }
                if let Some(columns) = meta.column_count {
                    properties.insert("columnCount".to_string(), columns.to_string());
                }
                if let Some(schema_id) = &meta.schema_id
                    && node.kind != NodeKind::Schema
                {
                    properties.insert("schemaId".to_string(), schema_id.clone());
                }
                if let Some(data_type) = meta.data_type {
                    properties.insert("dataType".to_string(), data_type.to_string());
                }
                if !meta.source_join_ids.is_empty() {
                    properties.insert("sourceJoinIds".to_string(), meta.source_join_ids.join(","));
                }
                if let Some(updated_at) = meta.updated_at {
                    properties.insert("updatedAt".to_string(), updated_at.to_rfc3339());
                }
                KgEntity {
                    id: node.id.clone(),
                    name: node.label.clone(),
                    entity_type: entity_type(node.kind).to_string(),
                    properties,
                }
            })
            .collect();

        let relationships = self
            .edges()
            .map(|edge| {
                let mut properties = BTreeMap::new();
                properties.insert("label".to_string(), edge.label.clone());
                if let Some(join_id) = &edge.join_id {
                    properties.insert("joinId".to_string(), join_id.clone());
                }
                KgRelationship {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    relationship_type: edge.kind.as_str().to_uppercase(),
                    properties,
                }
            })
            .collect();

        KnowledgeGraphExport {
            entities,
            relationships,
        }
    }
}

fn entity_type(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Bundle => "Dataset",
        NodeKind::VirtualBundle => "DerivedDataset",
        NodeKind::Schema => "Schema",
    }
}
