//! Nested-loop join execution.

use semlens_model::{DataBundle, JoinDefinition, JoinType, Row};

use crate::error::{JoinError, JoinSide, Result};
use crate::predicate::rows_match;
use crate::resolve::{ResolvedCondition, resolve_conditions};
use crate::result::{JoinResult, JoinStats, JoinedRow, null_row, shaped_row};

/// Execute a join between two bundles.
///
/// Configuration is checked before any row is scanned: the bundles must be
/// the ones the join names, there must be at least one condition, and every
/// condition role must resolve to an existing column on its side.
///
/// Output order: left rows in input order, each followed by its matches in
/// right input order. Right and full joins then append unmatched right rows
/// in input order.
pub fn execute_join(
    left: &DataBundle,
    right: &DataBundle,
    join: &JoinDefinition,
) -> Result<JoinResult> {
    let _span = tracing::info_span!(
        "execute_join",
        join_id = %join.id,
        join_type = %join.join_type,
        left_rows = left.row_count(),
        right_rows = right.row_count()
    )
    .entered();

    check_bundle(JoinSide::Left, &join.left_bundle_id, left)?;
    check_bundle(JoinSide::Right, &join.right_bundle_id, right)?;
    if join.conditions.is_empty() {
        return Err(JoinError::NoConditions(join.id.clone()));
    }
    let conditions = resolve_conditions(left, right, join)
        .map_err(|missing| JoinError::UnresolvedColumns { missing })?;

    let left_rows = &left.source.parsed_data;
    let right_rows = &right.source.parsed_data;
    let rows = nested_loop(
        join.join_type,
        &conditions,
        left_rows,
        right_rows,
        &left.source.columns,
        &right.source.columns,
    );
    let stats = JoinStats::compute(left_rows.len(), right_rows.len(), &rows);

    tracing::debug!(
        result_rows = stats.result_rows,
        matched_left = stats.matched_left_rows,
        matched_right = stats.matched_right_rows,
        "join executed"
    );

    Ok(JoinResult {
        rows,
        left_columns: left.source.columns.clone(),
        right_columns: right.source.columns.clone(),
        stats,
    })
}

fn check_bundle(side: JoinSide, expected: &str, bundle: &DataBundle) -> Result<()> {
    if bundle.id == expected {
        Ok(())
    } else {
        Err(JoinError::BundleMismatch {
            side,
            expected: expected.to_string(),
            actual: bundle.id.clone(),
        })
    }
}

fn nested_loop(
    join_type: JoinType,
    conditions: &[ResolvedCondition],
    left_rows: &[Row],
    right_rows: &[Row],
    left_columns: &[String],
    right_columns: &[String],
) -> Vec<JoinedRow> {
    let mut output = Vec::new();
    let mut right_matched = vec![false; right_rows.len()];

    for (li, left_row) in left_rows.iter().enumerate() {
        let mut found = false;
        for (ri, right_row) in right_rows.iter().enumerate() {
            if !rows_match(conditions, left_row, right_row) {
                continue;
            }
            found = true;
            right_matched[ri] = true;
            output.push(JoinedRow {
                left: shaped_row(left_row, left_columns),
                right: shaped_row(right_row, right_columns),
                left_index: Some(li),
                right_index: Some(ri),
            });
        }
        if !found && join_type.preserves_left() {
            output.push(JoinedRow {
                left: shaped_row(left_row, left_columns),
                right: null_row(right_columns),
                left_index: Some(li),
                right_index: None,
            });
        }
    }

    if join_type.preserves_right() {
        for (ri, right_row) in right_rows.iter().enumerate() {
            if right_matched[ri] {
                continue;
            }
            output.push(JoinedRow {
                left: null_row(left_columns),
                right: shaped_row(right_row, right_columns),
                left_index: None,
                right_index: Some(ri),
            });
        }
    }

    output
}
