//! Tabular column profiling.
//!
//! Every raw column is profiled, mapped or not. Null handling: `Null` and
//! blank strings count as null; `unique_count` counts distinct non-null
//! values (so `[1, 2, 2, null, 4]` has three unique values).
//!
//! # Quality score
//!
//! ```text
//! score = (70 * non_null + 20 * dominant_type + 10 * uniqueness_fit) / total
//! ```
//!
//! `dominant_type` is the number of values of the most common type and
//! `uniqueness_fit` is `non_null`, halved for constant columns. None of the
//! three terms can grow when a value is replaced by (or padded with) a null,
//! so the score never rises as nulls are added. The result is clamped to
//! `0..=100` and rounded.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, Severity, Value, ValueKey};

use crate::options::TransformOptions;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .expect("valid ISO date pattern")
});

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredType {
    Number,
    Date,
    Boolean,
    String,
    /// No single type reaches the dominance threshold.
    Mixed,
    /// Every value is null.
    Empty,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Mixed => "mixed",
            Self::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopValue {
    pub value: Value,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub column: String,
    pub display_name: String,
    pub data_type: InferredType,
    pub total_count: usize,
    pub null_count: usize,
    pub unique_count: usize,
    pub top_values: Vec<TopValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<NumericStats>,
    pub quality_score: u8,
    pub quality_issues: Vec<QualityIssue>,
}

impl ColumnProfile {
    pub fn completeness(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            (self.total_count - self.null_count) as f64 / self.total_count as f64
        }
    }
}

/// Profile every column of the source, in column order.
pub fn profile_columns(
    source: &DataSource,
    mappings: &[ColumnMapping],
    options: &TransformOptions,
) -> Vec<ColumnProfile> {
    source
        .columns
        .iter()
        .map(|column| {
            let display_name = mappings
                .iter()
                .find(|m| &m.source_column == column)
                .map_or_else(|| column.clone(), |m| m.label().to_string());
            let values = source
                .parsed_data
                .iter()
                .map(|row| DataSource::cell(row, column));
            profile_values(column, display_name, values, options)
        })
        .collect()
}

/// Profile one column given its values.
pub fn profile_values<'a>(
    column: &str,
    display_name: String,
    values: impl IntoIterator<Item = &'a Value>,
    options: &TransformOptions,
) -> ColumnProfile {
    let mut total = 0usize;
    let mut non_null: Vec<&Value> = Vec::new();
    for value in values {
        total += 1;
        if !value.is_blank() {
            non_null.push(value);
        }
    }
    let null_count = total - non_null.len();

    // Distinct values with first-seen representative and count.
    let mut counts: HashMap<ValueKey, (usize, &Value)> = HashMap::new();
    let mut type_counts: HashMap<InferredType, usize> = HashMap::new();
    for value in &non_null {
        counts
            .entry(value.key())
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, value));
        *type_counts.entry(classify(value)).or_insert(0) += 1;
    }
    let unique_count = counts.len();

    let mut top: Vec<(usize, String, &Value)> = counts
        .into_values()
        .map(|(count, value)| (count, value.to_display_string(), value))
        .collect();
    top.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    let top_values = top
        .into_iter()
        .take(options.top_values_limit)
        .map(|(count, _, value)| TopValue {
            value: value.clone(),
            count,
        })
        .collect();

    let (dominant_type, dominant_count) = dominant(&type_counts);
    let data_type = if non_null.is_empty() {
        InferredType::Empty
    } else if dominant_count as f64 / non_null.len() as f64 >= options.type_dominance_threshold {
        dominant_type
    } else {
        InferredType::Mixed
    };

    let numeric_stats = if data_type == InferredType::Number {
        numeric_stats(non_null.iter().filter_map(|v| v.as_finite_number()))
    } else {
        None
    };

    let constant = non_null.len() > 1 && unique_count == 1;
    let quality_score = quality_score(total, non_null.len(), dominant_count, constant);
    let quality_issues = quality_issues(
        total,
        null_count,
        unique_count,
        non_null.len(),
        data_type,
        constant,
    );

    ColumnProfile {
        column: column.to_string(),
        display_name,
        data_type,
        total_count: total,
        null_count,
        unique_count,
        top_values,
        numeric_stats,
        quality_score,
        quality_issues,
    }
}

/// Type of a single non-null value.
pub fn classify(value: &Value) -> InferredType {
    match value {
        Value::Null => InferredType::Empty,
        Value::Number(_) => InferredType::Number,
        Value::Bool(_) => InferredType::Boolean,
        Value::String(text) => {
            let trimmed = text.trim();
            if value.as_finite_number().is_some() {
                InferredType::Number
            } else if ISO_DATE.is_match(trimmed) {
                InferredType::Date
            } else if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false")
            {
                InferredType::Boolean
            } else {
                InferredType::String
            }
        }
    }
}

fn dominant(type_counts: &HashMap<InferredType, usize>) -> (InferredType, usize) {
    // Fixed priority keeps ties deterministic.
    [
        InferredType::Number,
        InferredType::Date,
        InferredType::Boolean,
        InferredType::String,
    ]
    .into_iter()
    .map(|t| (t, type_counts.get(&t).copied().unwrap_or(0)))
    .fold((InferredType::Empty, 0), |best, candidate| {
        if candidate.1 > best.1 { candidate } else { best }
    })
}

fn numeric_stats(values: impl Iterator<Item = f64>) -> Option<NumericStats> {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let len = sorted.len();
    let mean = sorted.iter().sum::<f64>() / len as f64;
    let median = if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    };
    Some(NumericStats {
        min: sorted[0],
        max: sorted[len - 1],
        mean,
        median,
    })
}

fn quality_score(total: usize, non_null: usize, dominant_count: usize, constant: bool) -> u8 {
    if total == 0 {
        return 0;
    }
    let fit = if constant {
        non_null as f64 / 2.0
    } else {
        non_null as f64
    };
    let raw = (70.0 * non_null as f64 + 20.0 * dominant_count as f64 + 10.0 * fit) / total as f64;
    raw.clamp(0.0, 100.0).round() as u8
}

fn quality_issues(
    total: usize,
    null_count: usize,
    unique_count: usize,
    non_null: usize,
    data_type: InferredType,
    constant: bool,
) -> Vec<QualityIssue> {
    let mut issues = Vec::new();
    if total == 0 {
        issues.push(issue(Severity::Info, "Column has no rows".to_string()));
        return issues;
    }
    let null_ratio = null_count as f64 / total as f64;
    let percent = (null_ratio * 100.0).round();
    if null_ratio > 0.5 {
        issues.push(issue(
            Severity::Error,
            format!("{percent}% of values are missing"),
        ));
    } else if null_ratio > 0.1 {
        issues.push(issue(
            Severity::Warning,
            format!("{percent}% of values are missing"),
        ));
    } else if null_count > 0 {
        issues.push(issue(
            Severity::Info,
            format!("{null_count} missing value(s)"),
        ));
    }
    if data_type == InferredType::Mixed {
        issues.push(issue(
            Severity::Warning,
            "Values have mixed types".to_string(),
        ));
    }
    if constant {
        issues.push(issue(
            Severity::Info,
            "Column has a single distinct value".to_string(),
        ));
    } else if non_null > 1
        && unique_count == non_null
        && matches!(data_type, InferredType::String | InferredType::Number)
    {
        issues.push(issue(
            Severity::Info,
            "All values are distinct (possible identifier)".to_string(),
        ));
    }
    issues
}

fn issue(severity: Severity, message: String) -> QualityIssue {
    QualityIssue { severity, message }
}
