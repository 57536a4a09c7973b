//! Hierarchy (tree) view.

use std::collections::BTreeMap;

use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, resolve_columns, roles};

use crate::extract::{RoleColumn, optional_text};
use crate::forest::{ForestEntry, build_forest};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub id: String,
    pub label: String,
    /// Parent id as stated in the data, even when it did not resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Metric values keyed by the mapping's display name.
    pub metrics: BTreeMap<String, f64>,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(HierarchyNode::size).sum::<usize>()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyForest {
    pub roots: Vec<HierarchyNode>,
    /// Nodes promoted to roots to break parent cycles in the data.
    pub promoted_cycle_nodes: Vec<String>,
}

impl HierarchyForest {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(HierarchyNode::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

struct Payload {
    label: String,
    parent_id: Option<String>,
    metrics: BTreeMap<String, f64>,
}

/// Build a forest from `node_id`, `parent_id`, `label` and `metrics` roles.
///
/// Returns an empty forest when `node_id` is unmapped. Rows with a blank id
/// are skipped.
pub fn to_hierarchy(source: &DataSource, mappings: &[ColumnMapping]) -> HierarchyForest {
    let Some(node_id) = RoleColumn::resolve(source, mappings, roles::NODE_ID) else {
        tracing::debug!("hierarchy transform skipped: node_id is not mapped");
        return HierarchyForest::default();
    };
    let parent_id = RoleColumn::resolve(source, mappings, roles::PARENT_ID);
    let label = RoleColumn::resolve(source, mappings, roles::LABEL);
    let metrics = resolve_columns(source, mappings, roles::METRICS);

    let entries = source
        .parsed_data
        .iter()
        .filter_map(|row| {
            let id = node_id.text(row);
            if id.is_empty() {
                return None;
            }
            let metrics = metrics
                .iter()
                .filter_map(|mapping| {
                    let value = DataSource::cell(row, &mapping.source_column).to_number();
                    value
                        .is_finite()
                        .then(|| (mapping.label().to_string(), value))
                })
                .collect();
            let parent = optional_text(parent_id, row);
            Some(ForestEntry {
                payload: Payload {
                    label: optional_text(label, row).unwrap_or_else(|| id.clone()),
                    parent_id: parent.clone(),
                    metrics,
                },
                id,
                parent_id: parent,
            })
        })
        .collect::<Vec<_>>();

    let forest = build_forest(entries, |id, payload: Payload, children| HierarchyNode {
        id,
        label: payload.label,
        parent_id: payload.parent_id,
        metrics: payload.metrics,
        children,
    });

    if !forest.promoted.is_empty() {
        tracing::warn!(
            promoted = forest.promoted.len(),
            "hierarchy contains parent cycles; promoted nodes to roots"
        );
    }

    HierarchyForest {
        roots: forest.roots,
        promoted_cycle_nodes: forest.promoted,
    }
}
