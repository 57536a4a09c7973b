//! Treemap view.

use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, roles};

use crate::extract::{RoleColumn, optional_text};
use crate::forest::{ForestEntry, build_forest};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapNode {
    pub id: String,
    pub label: String,
    /// Own size, clamped to be non-negative.
    pub value: f64,
    /// Own size plus every descendant's.
    pub total: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreemapNode>,
}

/// Parent-linked size tree. Shares the hierarchy linking rules, including
/// cycle breaking. Unmapped or invalid sizes count as `0`.
pub fn to_treemap(source: &DataSource, mappings: &[ColumnMapping]) -> Vec<TreemapNode> {
    let Some(node_id) = RoleColumn::resolve(source, mappings, roles::NODE_ID) else {
        tracing::debug!("treemap transform skipped: node id is not mapped");
        return Vec::new();
    };
    let parent_id = RoleColumn::resolve(source, mappings, roles::PARENT_ID);
    let label = RoleColumn::resolve(source, mappings, roles::LABEL);
    let value = RoleColumn::resolve(source, mappings, roles::VALUE);

    let entries = source
        .parsed_data
        .iter()
        .map(|row| {
            let id = node_id.text(row);
            let size = value.map_or(0.0, |column| column.number(row));
            let size = if size.is_finite() { size.max(0.0) } else { 0.0 };
            ForestEntry {
                parent_id: optional_text(parent_id, row),
                payload: (optional_text(label, row).unwrap_or_else(|| id.clone()), size),
                id,
            }
        })
        .collect();

    let forest = build_forest(entries, |id, (label, value), children: Vec<TreemapNode>| {
        let total = value + children.iter().map(|child| child.total).sum::<f64>();
        TreemapNode {
            id,
            label,
            value,
            total,
            children,
        }
    });
    if !forest.promoted.is_empty() {
        tracing::warn!(
            promoted = forest.promoted.len(),
            "treemap parent cycle broken by promoting nodes to roots"
        );
    }
    forest.roots
}
