//! Column-to-role mappings.
//!
//! A bundle carries an ordered list of [`ColumnMapping`]s binding its raw
//! columns to the roles of its schema. Nothing upstream validates them, so
//! every lookup here tolerates stale columns, duplicates and gaps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::issue::Severity;
use crate::schema::SemanticSchema;
use crate::source::DataSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub source_column: String,
    pub role_id: String,
    #[serde(default)]
    pub display_name: String,
}

impl ColumnMapping {
    pub fn new(source_column: impl Into<String>, role_id: impl Into<String>) -> Self {
        let source_column = source_column.into();
        Self {
            display_name: source_column.clone(),
            source_column,
            role_id: role_id.into(),
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Display name, falling back to the source column when blank.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.source_column
        } else {
            &self.display_name
        }
    }
}

/// First mapping for a role, regardless of whether its column exists.
pub fn find_mapping<'a>(mappings: &'a [ColumnMapping], role_id: &str) -> Option<&'a ColumnMapping> {
    mappings.iter().find(|m| m.role_id == role_id)
}

/// Every mapping for a role, in declaration order.
pub fn mappings_for_role<'a>(mappings: &'a [ColumnMapping], role_id: &str) -> Vec<&'a ColumnMapping> {
    mappings.iter().filter(|m| m.role_id == role_id).collect()
}

/// Column a single-valued role resolves to, or `None` when the role is
/// unmapped or its mapping points at a column the source does not have.
pub fn resolve_column<'a>(
    source: &DataSource,
    mappings: &'a [ColumnMapping],
    role_id: &str,
) -> Option<&'a str> {
    find_mapping(mappings, role_id)
        .map(|m| m.source_column.as_str())
        .filter(|column| !column.is_empty() && source.has_column(column))
}

/// All live mappings for a multi-valued role.
pub fn resolve_columns<'a>(
    source: &DataSource,
    mappings: &'a [ColumnMapping],
    role_id: &str,
) -> Vec<&'a ColumnMapping> {
    mappings_for_role(mappings, role_id)
        .into_iter()
        .filter(|m| source.has_column(&m.source_column))
        .collect()
}

/// Problem found when checking a bundle's mappings against its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingIssue {
    /// Mapping refers to a role the schema does not define.
    UnknownRole { role_id: String, source_column: String },
    /// Mapping refers to a column that is not in the source.
    StaleColumn { role_id: String, source_column: String },
    /// A single-valued role has more than one mapping.
    DuplicateRole { role_id: String, count: usize },
    /// A required role has no usable mapping.
    RequiredUnmapped { role_id: String, role_name: String },
}

impl MappingIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::RequiredUnmapped { .. } => Severity::Error,
            Self::StaleColumn { .. } | Self::DuplicateRole { .. } => Severity::Warning,
            Self::UnknownRole { .. } => Severity::Info,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::UnknownRole {
                role_id,
                source_column,
            } => format!("Column '{source_column}' is mapped to unknown role '{role_id}'"),
            Self::StaleColumn {
                role_id,
                source_column,
            } => format!(
                "Role '{role_id}' is mapped to column '{source_column}', which is not in the data"
            ),
            Self::DuplicateRole { role_id, count } => {
                format!("Role '{role_id}' accepts one column but has {count} mappings")
            }
            Self::RequiredUnmapped { role_id, role_name } => {
                format!("Required role '{role_name}' ({role_id}) is not mapped")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    pub issues: Vec<MappingIssue>,
}

impl MappingReport {
    /// Transforms can produce output: no required role is unmapped.
    pub fn is_usable(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| matches!(issue, MappingIssue::RequiredUnmapped { .. }))
    }

    pub fn unmapped_required(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().filter_map(|issue| match issue {
            MappingIssue::RequiredUnmapped { role_id, .. } => Some(role_id.as_str()),
            _ => None,
        })
    }

    pub fn count_by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.severity()).or_insert(0) += 1;
        }
        counts
    }
}

/// Check mappings against a schema and the source's current columns.
pub fn validate_mappings(
    schema: &SemanticSchema,
    source: &DataSource,
    mappings: &[ColumnMapping],
) -> MappingReport {
    let mut issues = Vec::new();
    let mut per_role: BTreeMap<&str, usize> = BTreeMap::new();

    for mapping in mappings {
        if schema.role(&mapping.role_id).is_none() {
            issues.push(MappingIssue::UnknownRole {
                role_id: mapping.role_id.clone(),
                source_column: mapping.source_column.clone(),
            });
            continue;
        }
        if !source.has_column(&mapping.source_column) {
            issues.push(MappingIssue::StaleColumn {
                role_id: mapping.role_id.clone(),
                source_column: mapping.source_column.clone(),
            });
            continue;
        }
        *per_role.entry(mapping.role_id.as_str()).or_insert(0) += 1;
    }

    for role in &schema.roles {
        let count = per_role.get(role.id.as_str()).copied().unwrap_or(0);
        if count > 1 && !role.multiple {
            issues.push(MappingIssue::DuplicateRole {
                role_id: role.id.clone(),
                count,
            });
        }
        if count == 0 && role.required {
            issues.push(MappingIssue::RequiredUnmapped {
                role_id: role.id.clone(),
                role_name: role.name.clone(),
            });
        }
    }

    MappingReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DataType, SemanticRole};
    use crate::source::SourceType;

    fn schema() -> SemanticSchema {
        SemanticSchema {
            id: "net".to_string(),
            name: "Net".to_string(),
            description: String::new(),
            data_type: DataType::Network,
            roles: vec![
                SemanticRole::new("source_node", "Source").required(),
                SemanticRole::new("target_node", "Target").required(),
                SemanticRole::new("tags", "Tags").multiple(),
            ],
        }
    }

    fn source() -> DataSource {
        DataSource::new(
            SourceType::Csv,
            "edges.csv",
            vec!["from".to_string(), "to".to_string(), "t1".to_string()],
            Vec::new(),
        )
    }

    #[test]
    fn stale_and_missing_required_are_reported() {
        let mappings = vec![
            ColumnMapping::new("from", "source_node"),
            ColumnMapping::new("gone", "target_node"),
            ColumnMapping::new("t1", "tags"),
            ColumnMapping::new("t1", "tags"),
            ColumnMapping::new("to", "nope"),
        ];
        let report = validate_mappings(&schema(), &source(), &mappings);
        assert!(!report.is_usable());
        assert_eq!(report.unmapped_required().collect::<Vec<_>>(), vec!["target_node"]);
        assert!(report.issues.contains(&MappingIssue::StaleColumn {
            role_id: "target_node".to_string(),
            source_column: "gone".to_string(),
        }));
        assert!(
            !report
                .issues
                .iter()
                .any(|i| matches!(i, MappingIssue::DuplicateRole { .. }))
        );
    }

    #[test]
    fn resolve_column_ignores_stale_mappings() {
        let mappings = vec![ColumnMapping::new("gone", "source_node")];
        assert_eq!(resolve_column(&source(), &mappings, "source_node"), None);
        let mappings = vec![ColumnMapping::new("from", "source_node")];
        assert_eq!(resolve_column(&source(), &mappings, "source_node"), Some("from"));
    }
}
