//! Lineage graph for semlens.
//!
//! Tracks how bundles relate: which schema each bundle uses, which bundles
//! are joined, and which virtual bundles are derived from those joins. The
//! graph is rebuilt from the catalog on every query and tolerates dangling
//! references left behind by deletions.

#![deny(unsafe_code)]

mod export;
pub mod graph;
pub mod types;

pub use graph::{LineageGraph, schema_node_id};
pub use types::{
    EdgeKind, KgEntity, KgRelationship, KnowledgeGraphExport, LineageEdge, LineageExport,
    LineageImpact, LineageNode, NodeKind, NodeMetadata,
};
