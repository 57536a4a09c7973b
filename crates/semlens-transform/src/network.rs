//! Network (node-link) view.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, roles};

use crate::extract::{RoleColumn, optional_number, optional_text};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkGraph {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

impl NetworkGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Collapse parallel edges (same source and target) into one, summing
    /// their weights. An edge without a weight counts as `1`. The first
    /// edge of each pair keeps its label and relationship metadata.
    #[must_use]
    pub fn merge_parallel_edges(&self) -> NetworkGraph {
        let mut index: HashMap<(&str, &str), usize> = HashMap::new();
        let mut merged: Vec<NetworkEdge> = Vec::new();
        for edge in &self.edges {
            let key = (edge.source.as_str(), edge.target.as_str());
            let weight = edge.weight.unwrap_or(1.0);
            match index.get(&key) {
                Some(&position) => {
                    let existing = &mut merged[position];
                    existing.weight = Some(existing.weight.unwrap_or(1.0) + weight);
                }
                None => {
                    index.insert(key, merged.len());
                    merged.push(edge.clone());
                }
            }
        }
        NetworkGraph {
            nodes: self.nodes.clone(),
            edges: merged,
        }
    }
}

/// Build a graph from `source_node`/`target_node` and the optional edge and
/// node roles.
///
/// Nodes are deduplicated by id with the first occurrence winning label and
/// group; `node_group` describes the row's source node. Edges are kept as
/// given, so repeated pairs become parallel edges.
pub fn to_network(source: &DataSource, mappings: &[ColumnMapping]) -> NetworkGraph {
    let (Some(source_node), Some(target_node)) = (
        RoleColumn::resolve(source, mappings, roles::SOURCE_NODE),
        RoleColumn::resolve(source, mappings, roles::TARGET_NODE),
    ) else {
        tracing::debug!("network transform skipped: source/target node is not mapped");
        return NetworkGraph::default();
    };
    let weight = RoleColumn::resolve(source, mappings, roles::EDGE_WEIGHT);
    let edge_label = RoleColumn::resolve(source, mappings, roles::EDGE_LABEL);
    let group = RoleColumn::resolve(source, mappings, roles::NODE_GROUP);
    let relationship = RoleColumn::resolve(source, mappings, roles::RELATIONSHIP_TYPE);
    let cardinality = RoleColumn::resolve(source, mappings, roles::CARDINALITY);

    let mut graph = NetworkGraph::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut skipped = 0usize;

    for row in &source.parsed_data {
        let from = source_node.text(row);
        let to = target_node.text(row);
        if from.is_empty() || to.is_empty() {
            skipped += 1;
            continue;
        }
        add_node(&mut graph, &mut seen, &from, optional_text(group, row));
        add_node(&mut graph, &mut seen, &to, None);
        graph.edges.push(NetworkEdge {
            source: from,
            target: to,
            weight: optional_number(weight, row),
            label: optional_text(edge_label, row),
            relationship_type: optional_text(relationship, row),
            cardinality: optional_text(cardinality, row),
        });
    }

    if skipped > 0 {
        tracing::debug!(skipped, "network rows without both endpoints were skipped");
    }
    graph
}

fn add_node(
    graph: &mut NetworkGraph,
    seen: &mut HashSet<String>,
    id: &str,
    group: Option<String>,
) {
    if !seen.insert(id.to_string()) {
        return;
    }
    graph.nodes.push(NetworkNode {
        id: id.to_string(),
        label: id.to_string(),
        group,
    });
}
