//! Defensive cell extraction shared by the view transforms.

use semlens_model::{ColumnMapping, DataSource, Row, Value, resolve_column};

/// A role resolved to a live source column.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoleColumn<'a> {
    pub column: &'a str,
}

impl<'a> RoleColumn<'a> {
    pub fn resolve(
        source: &DataSource,
        mappings: &'a [ColumnMapping],
        role_id: &str,
    ) -> Option<Self> {
        resolve_column(source, mappings, role_id).map(|column| Self { column })
    }

    pub fn value<'r>(&self, row: &'r Row) -> &'r Value {
        DataSource::cell(row, self.column)
    }

    /// `String(value ?? '')`, trimmed.
    pub fn text(&self, row: &Row) -> String {
        self.value(row).to_display_string().trim().to_string()
    }

    /// `Number(value ?? 0)`.
    pub fn number(&self, row: &Row) -> f64 {
        self.value(row).to_number()
    }
}

/// Text of an optional role; `None` when unmapped or blank.
pub(crate) fn optional_text(role: Option<RoleColumn<'_>>, row: &Row) -> Option<String> {
    role.map(|r| r.text(row)).filter(|text| !text.is_empty())
}

/// Number of an optional role; `None` when unmapped or not finite.
pub(crate) fn optional_number(role: Option<RoleColumn<'_>>, row: &Row) -> Option<f64> {
    role.map(|r| r.number(row)).filter(|n| n.is_finite())
}
