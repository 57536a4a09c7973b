//! Data model shared by the transform library, join engine and lineage graph.
//!
//! Every type here is plain serializable data so bundles, joins, virtual
//! bundles and schemas round-trip through JSON persistence unchanged.

#![deny(unsafe_code)]

pub mod bundle;
pub mod error;
pub mod issue;
pub mod join;
pub mod mapping;
pub mod registry;
pub mod roles;
pub mod schema;
pub mod source;
pub mod value;

pub use bundle::{DataBundle, VirtualBundle, VirtualBundleKind};
pub use error::{ModelError, Result};
pub use issue::Severity;
pub use join::{JoinCondition, JoinDefinition, JoinOperator, JoinType};
pub use mapping::{
    ColumnMapping, MappingIssue, MappingReport, find_mapping, mappings_for_role, resolve_column,
    resolve_columns, validate_mappings,
};
pub use registry::{SchemaRegistry, builtin_schema_id, builtin_schemas};
pub use schema::{DataType, RoleDataType, SchemaIssue, SemanticRole, SemanticSchema, validate_schema};
pub use source::{DataSource, SourceType};
pub use value::{Row, Value, ValueKey, row_key};
