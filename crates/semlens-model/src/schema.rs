//! Semantic schema definitions.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// View family a schema feeds. Determines which transform applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Hierarchy,
    Tabular,
    Network,
    Timeline,
    Treemap,
    Heatmap,
    Geographic,
    Flow,
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Hierarchy,
        DataType::Tabular,
        DataType::Network,
        DataType::Timeline,
        DataType::Treemap,
        DataType::Heatmap,
        DataType::Geographic,
        DataType::Flow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hierarchy => "hierarchy",
            Self::Tabular => "tabular",
            Self::Network => "network",
            Self::Timeline => "timeline",
            Self::Treemap => "treemap",
            Self::Heatmap => "heatmap",
            Self::Geographic => "geographic",
            Self::Flow => "flow",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        DataType::ALL
            .into_iter()
            .find(|dt| dt.as_str() == normalized)
            .ok_or_else(|| format!("Unknown data type: {s}"))
    }
}

/// Expected value type of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleDataType {
    String,
    Number,
    Boolean,
    Date,
    #[default]
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticRole {
    /// Stable key the transforms look up (e.g. `node_id`).
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub required: bool,
    /// Several columns may be mapped onto this role.
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub data_type: RoleDataType,
}

impl SemanticRole {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            required: false,
            multiple: false,
            data_type: RoleDataType::Any,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    #[must_use]
    pub fn with_type(mut self, data_type: RoleDataType) -> Self {
        self.data_type = data_type;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSchema {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub data_type: DataType,
    pub roles: Vec<SemanticRole>,
}

impl SemanticSchema {
    pub fn role(&self, role_id: &str) -> Option<&SemanticRole> {
        self.roles.iter().find(|role| role.id == role_id)
    }

    pub fn required_roles(&self) -> impl Iterator<Item = &SemanticRole> {
        self.roles.iter().filter(|role| role.required)
    }
}

/// Structural problem found in a schema definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    EmptyId,
    EmptyName,
    NoRoles,
    EmptyRoleId { index: usize },
    DuplicateRole { role_id: String },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Schema id is empty"),
            Self::EmptyName => write!(f, "Schema name is empty"),
            Self::NoRoles => write!(f, "Schema defines no roles"),
            Self::EmptyRoleId { index } => write!(f, "Role #{} has an empty id", index + 1),
            Self::DuplicateRole { role_id } => write!(f, "Role id '{role_id}' is defined twice"),
        }
    }
}

/// Check a schema definition before it is registered or edited.
pub fn validate_schema(schema: &SemanticSchema) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    if schema.id.trim().is_empty() {
        issues.push(SchemaIssue::EmptyId);
    }
    if schema.name.trim().is_empty() {
        issues.push(SchemaIssue::EmptyName);
    }
    if schema.roles.is_empty() {
        issues.push(SchemaIssue::NoRoles);
    }
    let mut seen = BTreeSet::new();
    for (index, role) in schema.roles.iter().enumerate() {
        if role.id.trim().is_empty() {
            issues.push(SchemaIssue::EmptyRoleId { index });
            continue;
        }
        if !seen.insert(role.id.as_str()) {
            issues.push(SchemaIssue::DuplicateRole {
                role_id: role.id.clone(),
            });
        }
    }
    issues
}
