//! Uploaded and derived datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::{ColumnMapping, resolve_column};
use crate::source::DataSource;

/// A user-uploaded dataset plus its schema mapping.
///
/// Bundles are treated as immutable values: the `with_*` methods return an
/// updated copy with `updated_at` bumped instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBundle {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema_id: String,
    pub source: DataSource,
    #[serde(default)]
    pub mappings: Vec<ColumnMapping>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DataBundle {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        schema_id: impl Into<String>,
        source: DataSource,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            schema_id: schema_id.into(),
            source,
            mappings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_mappings(&self, mappings: Vec<ColumnMapping>, now: DateTime<Utc>) -> Self {
        Self {
            mappings,
            updated_at: now,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_source(&self, source: DataSource, now: DateTime<Utc>) -> Self {
        Self {
            source,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Column a role resolves to in this bundle, if mapped to a live column.
    pub fn column_for_role(&self, role_id: &str) -> Option<&str> {
        resolve_column(&self.source, &self.mappings, role_id)
    }

    pub fn row_count(&self) -> usize {
        self.source.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.source.column_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VirtualBundleKind {
    #[default]
    Join,
}

/// A derived dataset defined by one or more joins. Rows are never stored;
/// they are recomputed from the current source bundles on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualBundle {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: VirtualBundleKind,
    pub source_join_ids: Vec<String>,
    pub schema_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
