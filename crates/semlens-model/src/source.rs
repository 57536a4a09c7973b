use serde::{Deserialize, Serialize};

use crate::value::{Row, Value};

/// File format a bundle was uploaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Csv,
    Json,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Parsed contents of an uploaded file.
///
/// `columns` is authoritative: a mapping that references a column missing
/// from it is stale and is treated as unmapped by every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub file_name: String,
    pub raw_data: String,
    pub parsed_data: Vec<Row>,
    pub columns: Vec<String>,
}

impl DataSource {
    pub fn new(
        source_type: SourceType,
        file_name: impl Into<String>,
        columns: Vec<String>,
        parsed_data: Vec<Row>,
    ) -> Self {
        Self {
            source_type,
            file_name: file_name.into(),
            raw_data: String::new(),
            parsed_data,
            columns,
        }
    }

    pub fn row_count(&self) -> usize {
        self.parsed_data.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Cell lookup that treats an absent key as `Null`.
    pub fn cell<'a>(row: &'a Row, column: &str) -> &'a Value {
        const NULL: &Value = &Value::Null;
        row.get(column).unwrap_or(NULL)
    }
}
