//! Lineage graph construction and queries.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use semlens_model::{DataBundle, JoinDefinition, SemanticSchema, VirtualBundle};

use crate::types::{EdgeKind, LineageEdge, LineageImpact, LineageNode, NodeKind, NodeMetadata};

/// Node id of a schema, namespaced so it cannot collide with bundle ids.
pub fn schema_node_id(schema_id: &str) -> String {
    format!("schema:{schema_id}")
}

/// Directed multigraph over bundles, virtual bundles and schemas.
///
/// Built from scratch for every query; never updated incrementally.
/// References to entities that no longer exist are skipped during
/// construction, so a graph can always be built.
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    graph: StableDiGraph<LineageNode, LineageEdge>,
    index: HashMap<String, NodeIndex>,
}

impl LineageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph. Order matters: edges may only reference nodes added
    /// in an earlier step.
    ///
    /// 1. one node per bundle
    /// 2. one node per schema, then a `uses_schema` edge per bundle
    /// 3. a `join` edge from left to right bundle per join
    /// 4. one node per virtual bundle, then two `derived_from` edges per
    ///    source join
    pub fn build(
        bundles: &[DataBundle],
        joins: &[JoinDefinition],
        virtual_bundles: &[VirtualBundle],
        schemas: &[SemanticSchema],
    ) -> Self {
        let _span = tracing::debug_span!(
            "build_lineage",
            bundles = bundles.len(),
            joins = joins.len(),
            virtual_bundles = virtual_bundles.len(),
            schemas = schemas.len()
        )
        .entered();

        let mut lineage = Self::new();

        for bundle in bundles {
            lineage.add_node(LineageNode {
                id: bundle.id.clone(),
                kind: NodeKind::Bundle,
                label: bundle.name.clone(),
                metadata: NodeMetadata {
                    row_count: Some(bundle.row_count()),
                    column_count: Some(bundle.column_count()),
                    schema_id: Some(bundle.schema_id.clone()),
                    created_at: Some(bundle.created_at),
                    updated_at: Some(bundle.updated_at),
                    ..NodeMetadata::default()
                },
            });
        }

        for schema in schemas {
            lineage.add_node(LineageNode {
                id: schema_node_id(&schema.id),
                kind: NodeKind::Schema,
                label: schema.name.clone(),
                metadata: NodeMetadata {
                    schema_id: Some(schema.id.clone()),
                    data_type: Some(schema.data_type),
                    ..NodeMetadata::default()
                },
            });
        }
        for bundle in bundles {
            let schema_node = schema_node_id(&bundle.schema_id);
            lineage.add_edge(&bundle.id, &schema_node, EdgeKind::UsesSchema, None, "uses schema");
        }

        let joins_by_id: HashMap<&str, &JoinDefinition> =
            joins.iter().map(|join| (join.id.as_str(), join)).collect();
        for join in joins {
            lineage.add_edge(
                &join.left_bundle_id,
                &join.right_bundle_id,
                EdgeKind::Join,
                Some(&join.id),
                &format!("{} join", join.join_type),
            );
        }

        for virtual_bundle in virtual_bundles {
            let added = lineage.add_node(LineageNode {
                id: virtual_bundle.id.clone(),
                kind: NodeKind::VirtualBundle,
                label: virtual_bundle.name.clone(),
                metadata: NodeMetadata {
                    schema_id: Some(virtual_bundle.schema_id.clone()),
                    source_join_ids: virtual_bundle.source_join_ids.clone(),
                    created_at: Some(virtual_bundle.created_at),
                    updated_at: Some(virtual_bundle.updated_at),
                    ..NodeMetadata::default()
                },
            });
            if !added {
                continue;
            }
            for join_id in &virtual_bundle.source_join_ids {
                let Some(join) = joins_by_id.get(join_id.as_str()) else {
                    tracing::debug!(
                        virtual_bundle = %virtual_bundle.id,
                        join_id = %join_id,
                        "skipping unknown source join"
                    );
                    continue;
                };
                for source in [&join.left_bundle_id, &join.right_bundle_id] {
                    lineage.add_edge(
                        source,
                        &virtual_bundle.id,
                        EdgeKind::DerivedFrom,
                        Some(&join.id),
                        "derived from",
                    );
                }
            }
        }

        tracing::debug!(
            nodes = lineage.node_count(),
            edges = lineage.edge_count(),
            "lineage graph built"
        );
        lineage
    }

    /// Add a node unless its id is taken. Returns whether it was added.
    fn add_node(&mut self, node: LineageNode) -> bool {
        if self.index.contains_key(&node.id) {
            tracing::warn!(node_id = %node.id, kind = %node.kind, "duplicate lineage node skipped");
            return false;
        }
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.index.insert(id, index);
        true
    }

    /// Add an edge when both endpoints exist. Dangling references are
    /// skipped silently.
    fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        kind: EdgeKind,
        join_id: Option<&str>,
        label: &str,
    ) -> Option<EdgeIndex> {
        let (Some(&from), Some(&to)) = (self.index.get(source), self.index.get(target)) else {
            tracing::debug!(source, target, kind = %kind, "skipping dangling lineage edge");
            return None;
        };
        let id = match join_id {
            Some(join_id) => format!("{kind}:{join_id}:{source}->{target}"),
            None => format!("{kind}:{source}->{target}"),
        };
        Some(self.graph.add_edge(
            from,
            to,
            LineageEdge {
                id,
                source: source.to_string(),
                target: target.to_string(),
                kind,
                label: label.to_string(),
                join_id: join_id.map(str::to_string),
            },
        ))
    }

    pub fn node(&self, id: &str) -> Option<&LineageNode> {
        self.index
            .get(id)
            .and_then(|&index| self.graph.node_weight(index))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in build order.
    pub fn nodes(&self) -> impl Iterator<Item = &LineageNode> {
        self.graph
            .node_indices()
            .filter_map(|index| self.graph.node_weight(index))
    }

    /// Edges in build order.
    pub fn edges(&self) -> impl Iterator<Item = &LineageEdge> {
        self.graph
            .edge_indices()
            .filter_map(|index| self.graph.edge_weight(index))
    }

    /// Incoming and outgoing edges of a node, in build order.
    pub fn edges_of(&self, id: &str) -> Vec<&LineageEdge> {
        let Some(&index) = self.index.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<(EdgeIndex, &LineageEdge)> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .chain(self.graph.edges_directed(index, Direction::Incoming))
            .map(|edge| (edge.id(), edge.weight()))
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        // A self-loop shows up in both directions.
        edges.dedup_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, weight)| weight).collect()
    }

    /// Every bundle or virtual bundle the node is derived from, directly or
    /// transitively, sorted by id. Unknown ids yield an empty list.
    pub fn upstream_bundles(&self, id: &str) -> Vec<String> {
        self.reachable_datasets(id, Direction::Incoming)
    }

    /// Every bundle or virtual bundle derived from the node, sorted by id.
    pub fn downstream_bundles(&self, id: &str) -> Vec<String> {
        self.reachable_datasets(id, Direction::Outgoing)
    }

    fn reachable_datasets(&self, id: &str, direction: Direction) -> Vec<String> {
        let Some(&start) = self.index.get(id) else {
            return Vec::new();
        };
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut stack = vec![start];
        let mut found = BTreeSet::new();

        while let Some(current) = stack.pop() {
            for neighbor in self.graph.neighbors_directed(current, direction) {
                if !visited.insert(neighbor) {
                    continue;
                }
                let Some(node) = self.graph.node_weight(neighbor) else {
                    continue;
                };
                if node.kind.is_dataset() {
                    found.insert(node.id.clone());
                }
                stack.push(neighbor);
            }
        }
        found.into_iter().collect()
    }

    /// Shortest path from `from` to `to` following edge direction, counted
    /// in edges. `None` when either id is unknown or no path exists.
    pub fn find_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let (&start, &goal) = (self.index.get(from)?, self.index.get(to)?);
        let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if current == goal {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(&before) = previous.get(&cursor) {
                    path.push(before);
                    cursor = before;
                }
                path.reverse();
                return Some(
                    path.into_iter()
                        .filter_map(|index| self.graph.node_weight(index))
                        .map(|node| node.id.clone())
                        .collect(),
                );
            }
            for neighbor in self.successors(current) {
                if visited.insert(neighbor) {
                    previous.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }

    /// True when any directed cycle exists, checked over every node.
    ///
    /// Iterative white/gray/black depth-first search: reaching a gray node
    /// (one still on the current path) is a back edge.
    pub fn has_circular_dependencies(&self) -> bool {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut color: HashMap<NodeIndex, Color> = self
            .graph
            .node_indices()
            .map(|index| (index, Color::White))
            .collect();

        for root in self.graph.node_indices() {
            if color.get(&root) != Some(&Color::White) {
                continue;
            }
            color.insert(root, Color::Gray);
            let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = vec![(root, self.successors(root))];

            while let Some((node, pending)) = stack.last_mut() {
                let node = *node;
                match pending.pop() {
                    Some(next) => match color.get(&next).copied().unwrap_or(Color::White) {
                        Color::Gray => return true,
                        Color::Black => {}
                        Color::White => {
                            color.insert(next, Color::Gray);
                            let successors = self.successors(next);
                            stack.push((next, successors));
                        }
                    },
                    None => {
                        color.insert(node, Color::Black);
                        stack.pop();
                    }
                }
            }
        }
        false
    }

    /// Dependents of a bundle, for warning before it is deleted.
    pub fn impact_of(&self, bundle_id: &str) -> LineageImpact {
        let mut join_ids: Vec<String> = Vec::new();
        for edge in self.edges_of(bundle_id) {
            if let Some(join_id) = &edge.join_id
                && !join_ids.contains(join_id)
            {
                join_ids.push(join_id.clone());
            }
        }
        LineageImpact {
            downstream: self.downstream_bundles(bundle_id),
            join_ids,
        }
    }

    /// Direct successors in edge build order.
    fn successors(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, target)| target).collect()
    }
}
