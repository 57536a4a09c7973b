//! Lineage node and edge types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use semlens_model::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Bundle,
    VirtualBundle,
    Schema,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bundle => "bundle",
            Self::VirtualBundle => "virtual_bundle",
            Self::Schema => "schema",
        }
    }

    /// Bundles and virtual bundles; schemas are excluded from traversals.
    pub fn is_dataset(&self) -> bool {
        matches!(self, Self::Bundle | Self::VirtualBundle)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Left bundle to right bundle of a join definition.
    Join,
    /// Source bundle to the virtual bundle built from it.
    DerivedFrom,
    /// Bundle to the schema it is mapped against.
    UsesSchema,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::DerivedFrom => "derived_from",
            Self::UsesSchema => "uses_schema",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive fields carried on a node. Which ones are set depends on the
/// node kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_join_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineageNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub metadata: NodeMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_id: Option<String>,
}

/// Visualization export: plain node and edge arrays in build order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineageExport {
    pub nodes: Vec<LineageNode>,
    pub edges: Vec<LineageEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KgEntity {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KgRelationship {
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: String,
    pub properties: BTreeMap<String, String>,
}

/// Entity/relationship projection for external knowledge-graph indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeGraphExport {
    pub entities: Vec<KgEntity>,
    pub relationships: Vec<KgRelationship>,
}

/// What depends on a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageImpact {
    /// Bundles and virtual bundles reachable downstream, sorted by id.
    pub downstream: Vec<String>,
    /// Joins with an edge touching the bundle, in build order.
    pub join_ids: Vec<String>,
}

impl LineageImpact {
    pub fn is_empty(&self) -> bool {
        self.downstream.is_empty() && self.join_ids.is_empty()
    }
}
