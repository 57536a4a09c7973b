//! Catalogue of semantic schemas.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::roles;
use crate::schema::{DataType, RoleDataType, SemanticRole, SemanticSchema, validate_schema};

/// Schemas keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, SemanticSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with one default schema per data type.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for schema in builtin_schemas() {
            registry.schemas.insert(schema.id.clone(), schema);
        }
        registry
    }

    /// Add a new schema. Fails on invalid definitions and on id reuse.
    pub fn register(&mut self, schema: SemanticSchema) -> Result<()> {
        ensure_valid(&schema)?;
        if self.schemas.contains_key(&schema.id) {
            return Err(ModelError::DuplicateSchema(schema.id));
        }
        self.schemas.insert(schema.id.clone(), schema);
        Ok(())
    }

    /// Replace (or insert) a schema through an explicit edit.
    pub fn upsert(&mut self, schema: SemanticSchema) -> Result<Option<SemanticSchema>> {
        ensure_valid(&schema)?;
        Ok(self.schemas.insert(schema.id.clone(), schema))
    }

    pub fn remove(&mut self, schema_id: &str) -> Result<SemanticSchema> {
        self.schemas
            .remove(schema_id)
            .ok_or_else(|| ModelError::SchemaNotFound(schema_id.to_string()))
    }

    pub fn get(&self, schema_id: &str) -> Option<&SemanticSchema> {
        self.schemas.get(schema_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemanticSchema> {
        self.schemas.values()
    }

    pub fn by_data_type(&self, data_type: DataType) -> impl Iterator<Item = &SemanticSchema> {
        self.schemas
            .values()
            .filter(move |schema| schema.data_type == data_type)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl FromIterator<SemanticSchema> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = SemanticSchema>>(iter: I) -> Self {
        Self {
            schemas: iter
                .into_iter()
                .map(|schema| (schema.id.clone(), schema))
                .collect(),
        }
    }
}

fn ensure_valid(schema: &SemanticSchema) -> Result<()> {
    let issues = validate_schema(schema);
    if issues.is_empty() {
        return Ok(());
    }
    Err(ModelError::InvalidSchema {
        schema_id: schema.id.clone(),
        reason: issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    })
}

/// Id of the built-in schema for a data type.
pub fn builtin_schema_id(data_type: DataType) -> String {
    format!("builtin-{data_type}")
}

/// Default schema for every data type; role ids match [`crate::roles`].
pub fn builtin_schemas() -> Vec<SemanticSchema> {
    DataType::ALL
        .into_iter()
        .map(|data_type| SemanticSchema {
            id: builtin_schema_id(data_type),
            name: builtin_name(data_type).to_string(),
            description: builtin_description(data_type).to_string(),
            data_type,
            roles: builtin_roles(data_type),
        })
        .collect()
}

fn builtin_name(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Hierarchy => "Hierarchy",
        DataType::Tabular => "Table",
        DataType::Network => "Network",
        DataType::Timeline => "Timeline",
        DataType::Treemap => "Treemap",
        DataType::Heatmap => "Heatmap",
        DataType::Geographic => "Map",
        DataType::Flow => "Flow",
    }
}

fn builtin_description(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Hierarchy => "Parent/child records rendered as a tree",
        DataType::Tabular => "Column-oriented records with per-column profiling",
        DataType::Network => "Edge list rendered as a node-link graph",
        DataType::Timeline => "Dated events on a time axis",
        DataType::Treemap => "Nested sizes rendered as nested rectangles",
        DataType::Heatmap => "Row by column value matrix",
        DataType::Geographic => "Latitude/longitude points on a map",
        DataType::Flow => "Weighted source to target flows (Sankey)",
    }
}

fn builtin_roles(data_type: DataType) -> Vec<SemanticRole> {
    use RoleDataType as T;

    match data_type {
        DataType::Hierarchy => vec![
            SemanticRole::new(roles::NODE_ID, "Node ID").required().with_type(T::String),
            SemanticRole::new(roles::PARENT_ID, "Parent ID").with_type(T::String),
            SemanticRole::new(roles::LABEL, "Label").with_type(T::String),
            SemanticRole::new(roles::METRICS, "Metrics").multiple().with_type(T::Number),
        ],
        DataType::Tabular => vec![
            SemanticRole::new(roles::COLUMN, "Column")
                .multiple()
                .with_type(T::Any)
                .with_description("Columns to label in the profile"),
        ],
        DataType::Network => vec![
            SemanticRole::new(roles::SOURCE_NODE, "Source node").required().with_type(T::String),
            SemanticRole::new(roles::TARGET_NODE, "Target node").required().with_type(T::String),
            SemanticRole::new(roles::EDGE_WEIGHT, "Edge weight").with_type(T::Number),
            SemanticRole::new(roles::EDGE_LABEL, "Edge label").with_type(T::String),
            SemanticRole::new(roles::NODE_GROUP, "Node group").with_type(T::String),
            SemanticRole::new(roles::RELATIONSHIP_TYPE, "Relationship type").with_type(T::String),
            SemanticRole::new(roles::CARDINALITY, "Cardinality").with_type(T::String),
        ],
        DataType::Timeline => vec![
            SemanticRole::new(roles::START_DATE, "Start date").required().with_type(T::Date),
            SemanticRole::new(roles::END_DATE, "End date").with_type(T::Date),
            SemanticRole::new(roles::EVENT_LABEL, "Event label").with_type(T::String),
            SemanticRole::new(roles::EVENT_ID, "Event ID").with_type(T::String),
            SemanticRole::new(roles::CATEGORY, "Category").with_type(T::String),
            SemanticRole::new(roles::DESCRIPTION, "Description").with_type(T::String),
        ],
        DataType::Treemap => vec![
            SemanticRole::new(roles::NODE_ID, "Node ID").required().with_type(T::String),
            SemanticRole::new(roles::PARENT_ID, "Parent ID").with_type(T::String),
            SemanticRole::new(roles::LABEL, "Label").with_type(T::String),
            SemanticRole::new(roles::VALUE, "Size").with_type(T::Number),
        ],
        DataType::Heatmap => vec![
            SemanticRole::new(roles::ROW_LABEL, "Row").required().with_type(T::String),
            SemanticRole::new(roles::COLUMN_LABEL, "Column").required().with_type(T::String),
            SemanticRole::new(roles::VALUE, "Value").required().with_type(T::Number),
        ],
        DataType::Geographic => vec![
            SemanticRole::new(roles::LATITUDE, "Latitude").required().with_type(T::Number),
            SemanticRole::new(roles::LONGITUDE, "Longitude").required().with_type(T::Number),
            SemanticRole::new(roles::LOCATION_NAME, "Location name").with_type(T::String),
            SemanticRole::new(roles::VALUE, "Value").with_type(T::Number),
            SemanticRole::new(roles::CATEGORY, "Category").with_type(T::String),
        ],
        DataType::Flow => vec![
            SemanticRole::new(roles::SOURCE, "Source").required().with_type(T::String),
            SemanticRole::new(roles::TARGET, "Target").required().with_type(T::String),
            SemanticRole::new(roles::VALUE, "Value").with_type(T::Number),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_data_type() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.len(), DataType::ALL.len());
        for data_type in DataType::ALL {
            let schema = registry
                .get(&builtin_schema_id(data_type))
                .expect("builtin schema");
            assert_eq!(schema.data_type, data_type);
            assert!(validate_schema(schema).is_empty());
        }
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = SchemaRegistry::builtin();
        let existing = registry
            .get(&builtin_schema_id(DataType::Flow))
            .cloned()
            .unwrap();
        assert!(matches!(
            registry.register(existing.clone()),
            Err(ModelError::DuplicateSchema(_))
        ));
        assert!(registry.upsert(existing).unwrap().is_some());
    }
}
