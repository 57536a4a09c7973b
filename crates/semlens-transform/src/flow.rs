//! Flow (Sankey) view.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, roles};

use crate::extract::RoleColumn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowData {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl FlowData {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.links.iter().map(|link| link.value).sum()
    }
}

/// Aggregate source to target flows.
///
/// Rows sharing a pair are summed. Without a mapped value each row counts
/// `1`. Self-loops and rows with a non-positive value are skipped since a
/// Sankey layout cannot draw them. Nodes and links keep first-seen order.
pub fn to_flow(source: &DataSource, mappings: &[ColumnMapping]) -> FlowData {
    let (Some(from_column), Some(to_column)) = (
        RoleColumn::resolve(source, mappings, roles::SOURCE),
        RoleColumn::resolve(source, mappings, roles::TARGET),
    ) else {
        tracing::debug!("flow transform skipped: source/target is not mapped");
        return FlowData::default();
    };
    let value = RoleColumn::resolve(source, mappings, roles::VALUE);

    let mut flow = FlowData::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut links: HashMap<(String, String), usize> = HashMap::new();

    for row in &source.parsed_data {
        let from = from_column.text(row);
        let to = to_column.text(row);
        let amount = value.map_or(1.0, |column| column.number(row));
        if from.is_empty() || to.is_empty() || from == to {
            continue;
        }
        if !amount.is_finite() || amount <= 0.0 {
            continue;
        }
        for id in [&from, &to] {
            if seen.insert(id.clone()) {
                flow.nodes.push(FlowNode {
                    id: id.clone(),
                    name: id.clone(),
                });
            }
        }
        match links.get(&(from.clone(), to.clone())) {
            Some(&position) => flow.links[position].value += amount,
            None => {
                links.insert((from.clone(), to.clone()), flow.links.len());
                flow.links.push(FlowLink {
                    source: from,
                    target: to,
                    value: amount,
                });
            }
        }
    }
    flow
}
