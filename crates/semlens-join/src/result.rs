//! Join output types.

use std::collections::HashSet;

use serde::Serialize;

use semlens_model::{Row, Value, row_key};

/// One output row. Each side holds exactly its bundle's columns, with keys a
/// source row lacks set to `Null`. A padded side is all `Null` and has no
/// index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRow {
    pub left: Row,
    pub right: Row,
    pub left_index: Option<usize>,
    pub right_index: Option<usize>,
}

impl JoinedRow {
    /// Both sides come from real input rows.
    pub fn is_matched(&self) -> bool {
        self.left_index.is_some() && self.right_index.is_some()
    }

    /// Flat export form with `left_`/`right_` prefixed keys.
    pub fn to_flat(&self) -> Row {
        let left = self
            .left
            .iter()
            .map(|(column, value)| (format!("left_{column}"), value.clone()));
        let right = self
            .right
            .iter()
            .map(|(column, value)| (format!("right_{column}"), value.clone()));
        left.chain(right).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinStats {
    pub left_rows: usize,
    pub right_rows: usize,
    pub result_rows: usize,
    /// Distinct left rows (by value) paired with a real right row.
    pub matched_left_rows: usize,
    /// Distinct right rows (by value) paired with a real left row.
    pub matched_right_rows: usize,
}

impl JoinStats {
    pub(crate) fn compute(left_rows: usize, right_rows: usize, rows: &[JoinedRow]) -> Self {
        let mut left_keys = HashSet::new();
        let mut right_keys = HashSet::new();
        for row in rows.iter().filter(|row| row.is_matched()) {
            left_keys.insert(row_key(&row.left));
            right_keys.insert(row_key(&row.right));
        }
        Self {
            left_rows,
            right_rows,
            result_rows: rows.len(),
            matched_left_rows: left_keys.len(),
            matched_right_rows: right_keys.len(),
        }
    }

    /// Share of left rows that found a match, `0.0` for an empty side.
    pub fn match_rate_left(&self) -> f64 {
        rate(self.matched_left_rows, self.left_rows)
    }

    pub fn match_rate_right(&self) -> f64 {
        rate(self.matched_right_rows, self.right_rows)
    }
}

fn rate(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResult {
    pub rows: Vec<JoinedRow>,
    pub left_columns: Vec<String>,
    pub right_columns: Vec<String>,
    pub stats: JoinStats,
}

impl JoinResult {
    /// Prefixed column names in export order.
    pub fn flat_columns(&self) -> Vec<String> {
        self.left_columns
            .iter()
            .map(|column| format!("left_{column}"))
            .chain(self.right_columns.iter().map(|column| format!("right_{column}")))
            .collect()
    }

    /// Every row in flat form. Columns a source row lacks are filled with
    /// `Null` so each flat row has the full column set.
    pub fn to_flat_rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|row| {
                let mut flat = row.to_flat();
                for column in self.flat_columns() {
                    flat.entry(column).or_insert(Value::Null);
                }
                flat
            })
            .collect()
    }
}

/// A row holding exactly the given columns; absent keys become `Null`.
pub(crate) fn shaped_row(row: &Row, columns: &[String]) -> Row {
    columns
        .iter()
        .map(|column| {
            let value = row.get(column).cloned().unwrap_or(Value::Null);
            (column.clone(), value)
        })
        .collect()
}

/// A row with every given column set to `Null`.
pub(crate) fn null_row(columns: &[String]) -> Row {
    columns
        .iter()
        .map(|column| (column.clone(), Value::Null))
        .collect()
}
