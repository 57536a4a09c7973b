//! Heatmap (row by column matrix) view.

use std::collections::HashMap;

use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, roles};

use crate::extract::RoleColumn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `cells[row][column]`; `None` where no input row contributed.
    pub cells: Vec<Vec<Option<f64>>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl HeatmapMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|label| label == row)?;
        let c = self.columns.iter().position(|label| label == column)?;
        self.cells[r][c]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the matrix, or `None` when a required role is unmapped.
///
/// Labels appear in first-seen order. Values of rows sharing a cell are
/// summed; a null value counts as `0` and a non-numeric one is skipped.
pub fn to_heatmap(source: &DataSource, mappings: &[ColumnMapping]) -> Option<HeatmapMatrix> {
    let (Some(row_label), Some(column_label), Some(value)) = (
        RoleColumn::resolve(source, mappings, roles::ROW_LABEL),
        RoleColumn::resolve(source, mappings, roles::COLUMN_LABEL),
        RoleColumn::resolve(source, mappings, roles::VALUE),
    ) else {
        tracing::debug!("heatmap transform skipped: row/column/value is not mapped");
        return None;
    };

    let mut rows = Labels::default();
    let mut columns = Labels::default();
    let mut sums: HashMap<(usize, usize), f64> = HashMap::new();

    for row in &source.parsed_data {
        let r = row_label.text(row);
        let c = column_label.text(row);
        let v = value.number(row);
        if r.is_empty() || c.is_empty() || !v.is_finite() {
            continue;
        }
        let key = (rows.index_of(r), columns.index_of(c));
        *sums.entry(key).or_insert(0.0) += v;
    }

    let mut cells = vec![vec![None; columns.labels.len()]; rows.labels.len()];
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    for ((r, c), sum) in sums {
        cells[r][c] = Some(sum);
        min = Some(min.map_or(sum, |m| m.min(sum)));
        max = Some(max.map_or(sum, |m| m.max(sum)));
    }

    Some(HeatmapMatrix {
        rows: rows.labels,
        columns: columns.labels,
        cells,
        min,
        max,
    })
}

#[derive(Default)]
struct Labels {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Labels {
    fn index_of(&mut self, label: String) -> usize {
        if let Some(&position) = self.index.get(&label) {
            return position;
        }
        let position = self.labels.len();
        self.index.insert(label.clone(), position);
        self.labels.push(label);
        position
    }
}
