//! View transforms for semlens.
//!
//! Each transform turns a [`DataSource`] and its column mappings into the
//! typed structure one view renders:
//!
//! - **hierarchy**: parent-linked forest with metrics
//! - **network**: deduplicated nodes and per-row edges
//! - **profile**: per-column statistics and quality score (tabular view)
//! - **timeline**: dated events sorted by start
//! - **geo**: latitude/longitude points
//! - **heatmap**: row by column value matrix
//! - **treemap**: parent-linked size tree with rolled-up totals
//! - **flow**: aggregated source to target links
//!
//! Transforms are pure and never fail. Unmapped required roles produce an
//! empty result, and rows missing required values are skipped.

#![deny(unsafe_code)]

mod dates;
mod extract;
mod forest;

pub mod flow;
pub mod geo;
pub mod heatmap;
pub mod hierarchy;
pub mod network;
pub mod options;
pub mod profile;
pub mod timeline;
pub mod treemap;

use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, DataType};

pub use dates::parse_date;
pub use flow::{FlowData, FlowLink, FlowNode, to_flow};
pub use geo::{GeoPoint, to_geographic};
pub use heatmap::{HeatmapMatrix, to_heatmap};
pub use hierarchy::{HierarchyForest, HierarchyNode, to_hierarchy};
pub use network::{NetworkEdge, NetworkGraph, NetworkNode, to_network};
pub use options::TransformOptions;
pub use profile::{
    ColumnProfile, InferredType, NumericStats, QualityIssue, TopValue, profile_columns,
};
pub use timeline::{TimelineEvent, to_timeline};
pub use treemap::{TreemapNode, to_treemap};

/// Output of [`transform`], one variant per data type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "lowercase")]
pub enum ViewData {
    Hierarchy(HierarchyForest),
    Tabular(Vec<ColumnProfile>),
    Network(NetworkGraph),
    Timeline(Vec<TimelineEvent>),
    Treemap(Vec<TreemapNode>),
    Heatmap(Option<HeatmapMatrix>),
    Geographic(Vec<GeoPoint>),
    Flow(FlowData),
}

impl ViewData {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Hierarchy(_) => DataType::Hierarchy,
            Self::Tabular(_) => DataType::Tabular,
            Self::Network(_) => DataType::Network,
            Self::Timeline(_) => DataType::Timeline,
            Self::Treemap(_) => DataType::Treemap,
            Self::Heatmap(_) => DataType::Heatmap,
            Self::Geographic(_) => DataType::Geographic,
            Self::Flow(_) => DataType::Flow,
        }
    }

    /// Nothing to render.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Hierarchy(forest) => forest.is_empty(),
            Self::Tabular(profiles) => profiles.is_empty(),
            Self::Network(graph) => graph.is_empty(),
            Self::Timeline(events) => events.is_empty(),
            Self::Treemap(nodes) => nodes.is_empty(),
            Self::Heatmap(matrix) => matrix.as_ref().is_none_or(HeatmapMatrix::is_empty),
            Self::Geographic(points) => points.is_empty(),
            Self::Flow(flow) => flow.is_empty(),
        }
    }
}

/// Run the transform a schema's data type selects.
pub fn transform(
    data_type: DataType,
    source: &DataSource,
    mappings: &[ColumnMapping],
    options: &TransformOptions,
) -> ViewData {
    let _span = tracing::debug_span!(
        "transform",
        data_type = %data_type,
        rows = source.row_count(),
        mappings = mappings.len()
    )
    .entered();

    match data_type {
        DataType::Hierarchy => ViewData::Hierarchy(to_hierarchy(source, mappings)),
        DataType::Tabular => ViewData::Tabular(profile_columns(source, mappings, options)),
        DataType::Network => ViewData::Network(to_network(source, mappings)),
        DataType::Timeline => ViewData::Timeline(to_timeline(source, mappings)),
        DataType::Treemap => ViewData::Treemap(to_treemap(source, mappings)),
        DataType::Heatmap => ViewData::Heatmap(to_heatmap(source, mappings)),
        DataType::Geographic => ViewData::Geographic(to_geographic(source, mappings)),
        DataType::Flow => ViewData::Flow(to_flow(source, mappings)),
    }
}
