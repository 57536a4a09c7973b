//! Role to column resolution for join conditions.

use semlens_model::{DataBundle, JoinDefinition, JoinOperator, find_mapping};

use crate::error::{JoinSide, UnresolvedColumn, UnresolvedReason};

/// A condition with both roles bound to source columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCondition {
    pub left_column: String,
    pub right_column: String,
    pub operator: JoinOperator,
}

/// Resolve a role against one bundle's mappings and columns.
pub fn resolve_role(
    bundle: &DataBundle,
    side: JoinSide,
    role_id: &str,
) -> Result<String, UnresolvedColumn> {
    let unresolved = |reason| UnresolvedColumn {
        side,
        bundle_name: bundle.name.clone(),
        role_id: role_id.to_string(),
        reason,
    };
    let column = find_mapping(&bundle.mappings, role_id)
        .map(|m| m.source_column.as_str())
        .filter(|column| !column.is_empty())
        .ok_or_else(|| unresolved(UnresolvedReason::Unmapped))?;
    if !bundle.source.has_column(column) {
        return Err(unresolved(UnresolvedReason::MissingColumn {
            column: column.to_string(),
        }));
    }
    Ok(column.to_string())
}

/// Resolve every condition, collecting all failures instead of stopping at
/// the first one.
pub fn resolve_conditions(
    left: &DataBundle,
    right: &DataBundle,
    join: &JoinDefinition,
) -> Result<Vec<ResolvedCondition>, Vec<UnresolvedColumn>> {
    let mut resolved = Vec::with_capacity(join.conditions.len());
    let mut missing = Vec::new();
    for condition in &join.conditions {
        let left_column = resolve_role(left, JoinSide::Left, &condition.left_role_id);
        let right_column = resolve_role(right, JoinSide::Right, &condition.right_role_id);
        match (left_column, right_column) {
            (Ok(left_column), Ok(right_column)) => resolved.push(ResolvedCondition {
                left_column,
                right_column,
                operator: condition.operator,
            }),
            (left_column, right_column) => {
                missing.extend(left_column.err());
                missing.extend(right_column.err());
            }
        }
    }
    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(missing)
    }
}
