//! The in-memory project: every schema, bundle, join and virtual bundle.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use semlens_join::{JoinResult, validate_join};
use semlens_lineage::LineageGraph;
use semlens_model::{
    ColumnMapping, DataBundle, DataSource, JoinDefinition, MappingReport, SchemaRegistry,
    SemanticSchema, VirtualBundle, builtin_schemas, validate_mappings,
};
use semlens_transform::{TransformOptions, ViewData};

use crate::cache::JoinCache;
use crate::catalog::Catalog;
use crate::error::{ProjectError, Result};
use crate::{io, ops};

/// Current project file version.
///
/// Increment when making breaking changes to the persisted layout.
pub const CURRENT_PROJECT_VERSION: u32 = 1;

/// Catalog of everything a user has loaded and defined.
///
/// Entities are replaced wholesale on edit; nothing holds references into
/// the lists across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub schemas: Vec<SemanticSchema>,
    #[serde(default)]
    pub bundles: Vec<DataBundle>,
    #[serde(default)]
    pub joins: Vec<JoinDefinition>,
    #[serde(default)]
    pub virtual_bundles: Vec<VirtualBundle>,
}

/// What changed when a bundle's source file was reloaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadReport {
    pub added_columns: Vec<String>,
    pub removed_columns: Vec<String>,
    /// Mappings removed because their column no longer exists.
    pub dropped_mappings: Vec<ColumnMapping>,
    /// Required roles left without a mapping after the reload.
    pub unmapped_required: Vec<String>,
    pub row_count: usize,
}

/// Entities that reference a bundle and would break if it were deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionImpact {
    pub joins: Vec<String>,
    pub virtual_bundles: Vec<String>,
}

impl DeletionImpact {
    pub fn is_empty(&self) -> bool {
        self.joins.is_empty() && self.virtual_bundles.is_empty()
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Project {
    /// Empty project seeded with the built-in schemas.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: CURRENT_PROJECT_VERSION,
            name: name.into(),
            schemas: builtin_schemas(),
            bundles: Vec::new(),
            joins: Vec::new(),
            virtual_bundles: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        io::load_project(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        io::save_project(self, path)
    }

    // === Schemas ===

    /// Add a custom schema. Invalid definitions and reused ids are rejected.
    pub fn add_schema(&mut self, schema: SemanticSchema) -> Result<()> {
        let mut registry: SchemaRegistry = self.schemas.iter().cloned().collect();
        registry.register(schema.clone())?;
        self.schemas.push(schema);
        Ok(())
    }

    // === Bundles ===

    /// Add a bundle and report how well its mappings fit the schema.
    pub fn add_bundle(&mut self, bundle: DataBundle) -> Result<MappingReport> {
        self.ensure_dataset_id_free(&bundle.id)?;
        let schema = self
            .schema(&bundle.schema_id)
            .ok_or_else(|| ProjectError::not_found("Schema", &bundle.schema_id))?;
        let report = validate_mappings(schema, &bundle.source, &bundle.mappings);

        tracing::info!(
            bundle_id = %bundle.id,
            rows = bundle.row_count(),
            columns = bundle.column_count(),
            "bundle added"
        );
        self.bundles.push(bundle);
        Ok(report)
    }

    /// Replace a bundle's mappings.
    pub fn update_mappings(
        &mut self,
        bundle_id: &str,
        mappings: Vec<ColumnMapping>,
        now: DateTime<Utc>,
    ) -> Result<MappingReport> {
        let position = self.bundle_position(bundle_id)?;
        let updated = self.bundles[position].with_mappings(mappings, now);
        let schema = self
            .schema(&updated.schema_id)
            .ok_or_else(|| ProjectError::not_found("Schema", &updated.schema_id))?;
        let report = validate_mappings(schema, &updated.source, &updated.mappings);
        self.bundles[position] = updated;
        Ok(report)
    }

    /// Swap in a freshly parsed source for a bundle.
    ///
    /// Mappings whose column disappeared are dropped; the rest are kept.
    pub fn reload_bundle_source(
        &mut self,
        bundle_id: &str,
        source: DataSource,
        now: DateTime<Utc>,
    ) -> Result<ReloadReport> {
        let position = self.bundle_position(bundle_id)?;
        let current = &self.bundles[position];

        let added_columns = source
            .columns
            .iter()
            .filter(|column| !current.source.has_column(column))
            .cloned()
            .collect();
        let removed_columns = current
            .source
            .columns
            .iter()
            .filter(|column| !source.has_column(column))
            .cloned()
            .collect();
        let (kept, dropped_mappings): (Vec<ColumnMapping>, Vec<ColumnMapping>) = current
            .mappings
            .iter()
            .cloned()
            .partition(|mapping| source.has_column(&mapping.source_column));

        let updated = current.with_source(source, now).with_mappings(kept, now);
        let unmapped_required = match self.schema(&updated.schema_id) {
            Some(schema) => validate_mappings(schema, &updated.source, &updated.mappings)
                .unmapped_required()
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        let report = ReloadReport {
            added_columns,
            removed_columns,
            dropped_mappings,
            unmapped_required,
            row_count: updated.row_count(),
        };
        if !report.dropped_mappings.is_empty() || !report.unmapped_required.is_empty() {
            tracing::warn!(
                bundle_id,
                dropped = report.dropped_mappings.len(),
                unmapped_required = ?report.unmapped_required,
                "reload invalidated mappings"
            );
        }
        self.bundles[position] = updated;
        Ok(report)
    }

    /// Joins that reference the bundle and virtual bundles built on them.
    pub fn deletion_impact(&self, bundle_id: &str) -> DeletionImpact {
        let joins: Vec<String> = self
            .joins
            .iter()
            .filter(|join| join.references_bundle(bundle_id))
            .map(|join| join.id.clone())
            .collect();
        let virtual_bundles = self
            .virtual_bundles
            .iter()
            .filter(|vb| vb.source_join_ids.iter().any(|id| joins.contains(id)))
            .map(|vb| vb.id.clone())
            .collect();
        DeletionImpact {
            joins,
            virtual_bundles,
        }
    }

    /// Remove a bundle. Dependents are left in place and returned so the
    /// caller can warn or clean up.
    pub fn remove_bundle(&mut self, bundle_id: &str) -> Result<(DataBundle, DeletionImpact)> {
        let position = self.bundle_position(bundle_id)?;
        let impact = self.deletion_impact(bundle_id);
        if !impact.is_empty() {
            tracing::warn!(
                bundle_id,
                joins = ?impact.joins,
                virtual_bundles = ?impact.virtual_bundles,
                "removed bundle still has dependents"
            );
        }
        Ok((self.bundles.remove(position), impact))
    }

    // === Joins ===

    /// Add a join after checking both bundles and every condition.
    pub fn add_join(&mut self, join: JoinDefinition) -> Result<()> {
        if self.join(&join.id).is_some() {
            return Err(ProjectError::DuplicateId {
                kind: "Join",
                id: join.id,
            });
        }
        let validation = validate_join(
            self.bundle(&join.left_bundle_id),
            self.bundle(&join.right_bundle_id),
            &join,
        );
        if !validation.valid {
            return Err(ProjectError::InvalidJoin {
                join_id: join.id,
                errors: validation.errors,
            });
        }
        self.joins.push(join);
        Ok(())
    }

    /// Remove a join. Virtual bundles that name it keep the dangling id.
    pub fn remove_join(&mut self, join_id: &str) -> Result<JoinDefinition> {
        let position = self
            .joins
            .iter()
            .position(|join| join.id == join_id)
            .ok_or_else(|| ProjectError::not_found("Join", join_id))?;
        Ok(self.joins.remove(position))
    }

    pub fn execute_join(&self, join_id: &str) -> Result<JoinResult> {
        ops::execute_join(self, join_id)
    }

    // === Virtual bundles ===

    pub fn add_virtual_bundle(&mut self, virtual_bundle: VirtualBundle) -> Result<()> {
        self.ensure_dataset_id_free(&virtual_bundle.id)?;
        if virtual_bundle.source_join_ids.is_empty() {
            return Err(ProjectError::NoSourceJoins(virtual_bundle.id));
        }
        if let Some(missing) = virtual_bundle
            .source_join_ids
            .iter()
            .find(|id| self.join(id).is_none())
        {
            return Err(ProjectError::not_found("Join", missing));
        }
        self.virtual_bundles.push(virtual_bundle);
        Ok(())
    }

    pub fn remove_virtual_bundle(&mut self, virtual_bundle_id: &str) -> Result<VirtualBundle> {
        let position = self
            .virtual_bundles
            .iter()
            .position(|vb| vb.id == virtual_bundle_id)
            .ok_or_else(|| ProjectError::not_found("Virtual bundle", virtual_bundle_id))?;
        Ok(self.virtual_bundles.remove(position))
    }

    pub fn materialize_virtual_bundle(
        &self,
        virtual_bundle_id: &str,
        cache: &mut JoinCache,
    ) -> Result<Arc<JoinResult>> {
        ops::materialize_virtual_bundle(self, virtual_bundle_id, cache)
    }

    // === Views ===

    pub fn view(&self, bundle_id: &str, options: &TransformOptions) -> Result<ViewData> {
        ops::view(self, bundle_id, options)
    }

    pub fn lineage(&self) -> LineageGraph {
        ops::lineage(self)
    }

    fn bundle_position(&self, bundle_id: &str) -> Result<usize> {
        self.bundles
            .iter()
            .position(|bundle| bundle.id == bundle_id)
            .ok_or_else(|| ProjectError::not_found("Bundle", bundle_id))
    }

    /// Bundles and virtual bundles share one id space in the lineage graph.
    fn ensure_dataset_id_free(&self, id: &str) -> Result<()> {
        let kind = if self.bundle(id).is_some() {
            "Bundle"
        } else if self.virtual_bundle(id).is_some() {
            "Virtual bundle"
        } else {
            return Ok(());
        };
        Err(ProjectError::DuplicateId {
            kind,
            id: id.to_string(),
        })
    }
}

impl Catalog for Project {
    fn bundles(&self) -> &[DataBundle] {
        &self.bundles
    }

    fn joins(&self) -> &[JoinDefinition] {
        &self.joins
    }

    fn virtual_bundles(&self) -> &[VirtualBundle] {
        &self.virtual_bundles
    }

    fn schemas(&self) -> &[SemanticSchema] {
        &self.schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use semlens_model::{DataType, SemanticRole, SourceType, builtin_schema_id};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn source(columns: &[&str]) -> DataSource {
        DataSource::new(
            SourceType::Csv,
            "data.csv",
            columns.iter().map(|c| c.to_string()).collect(),
            Vec::new(),
        )
    }

    #[test]
    fn test_new_project_has_builtin_schemas() {
        let project = Project::new("Demo");
        assert_eq!(project.schemas.len(), DataType::ALL.len());
        assert!(project.schema(&builtin_schema_id(DataType::Flow)).is_some());
    }

    #[test]
    fn test_add_schema_rejects_duplicate_id() {
        let mut project = Project::new("Demo");
        let schema = SemanticSchema {
            id: "custom".to_string(),
            name: "Custom".to_string(),
            description: String::new(),
            data_type: DataType::Tabular,
            roles: vec![SemanticRole::new("k", "Key")],
        };
        project.add_schema(schema.clone()).unwrap();
        let err = project.add_schema(schema).unwrap_err();
        assert!(matches!(err, ProjectError::Model(_)));
    }

    #[test]
    fn test_reload_drops_vanished_mappings() {
        let mut project = Project::new("Demo");
        let schema_id = builtin_schema_id(DataType::Flow);
        let bundle = DataBundle::new("b", "B", &schema_id, source(&["from", "to", "n"]), now())
            .with_mappings(
                vec![
                    ColumnMapping::new("from", "source"),
                    ColumnMapping::new("to", "target"),
                    ColumnMapping::new("n", "value"),
                ],
                now(),
            );
        project.add_bundle(bundle).unwrap();

        let later = now() + chrono::Duration::hours(1);
        let report = project
            .reload_bundle_source("b", source(&["from", "dest", "n"]), later)
            .unwrap();

        assert_eq!(report.added_columns, vec!["dest"]);
        assert_eq!(report.removed_columns, vec!["to"]);
        assert_eq!(report.dropped_mappings, vec![ColumnMapping::new("to", "target")]);
        assert_eq!(report.unmapped_required, vec!["target"]);
        let bundle = project.bundle("b").unwrap();
        assert_eq!(bundle.mappings.len(), 2);
        assert_eq!(bundle.updated_at, later);
        assert_eq!(bundle.created_at, now());
    }
}
