//! Role ids looked up by the transforms.
//!
//! Role ids are schema-scoped; these are the ids used by the built-in
//! schemas and expected by the view transforms for each data type.

// hierarchy / treemap
pub const NODE_ID: &str = "node_id";
pub const PARENT_ID: &str = "parent_id";
pub const LABEL: &str = "label";
pub const METRICS: &str = "metrics";

// network
pub const SOURCE_NODE: &str = "source_node";
pub const TARGET_NODE: &str = "target_node";
pub const EDGE_WEIGHT: &str = "edge_weight";
pub const EDGE_LABEL: &str = "edge_label";
pub const NODE_GROUP: &str = "node_group";
pub const RELATIONSHIP_TYPE: &str = "relationship_type";
pub const CARDINALITY: &str = "cardinality";

// timeline
pub const EVENT_ID: &str = "event_id";
pub const EVENT_LABEL: &str = "event_label";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const DESCRIPTION: &str = "description";

// geographic
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const LOCATION_NAME: &str = "location_name";

// heatmap
pub const ROW_LABEL: &str = "row_label";
pub const COLUMN_LABEL: &str = "column_label";

// flow
pub const SOURCE: &str = "source";
pub const TARGET: &str = "target";

// tabular
pub const COLUMN: &str = "column";

// shared
pub const VALUE: &str = "value";
pub const CATEGORY: &str = "category";
