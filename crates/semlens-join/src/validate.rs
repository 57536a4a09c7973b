//! Pre-flight join validation.

use serde::Serialize;

use semlens_model::{DataBundle, JoinDefinition};

use crate::error::JoinSide;
use crate::resolve::resolve_role;

/// Outcome of [`validate_join`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Non-failing counterpart of the checks `execute_join` performs, for use
/// before a join is saved. Bundles are optional since the caller may no
/// longer have one of them.
pub fn validate_join(
    left: Option<&DataBundle>,
    right: Option<&DataBundle>,
    join: &JoinDefinition,
) -> JoinValidation {
    let mut errors = Vec::new();

    if left.is_none() {
        errors.push(format!("Left bundle '{}' not found", join.left_bundle_id));
    }
    if right.is_none() {
        errors.push(format!("Right bundle '{}' not found", join.right_bundle_id));
    }
    if join.conditions.is_empty() {
        errors.push("Join must have at least one condition".to_string());
    }

    for condition in &join.conditions {
        if let Some(bundle) = left
            && let Err(unresolved) = resolve_role(bundle, JoinSide::Left, &condition.left_role_id)
        {
            errors.push(unresolved.to_string());
        }
        if let Some(bundle) = right
            && let Err(unresolved) = resolve_role(bundle, JoinSide::Right, &condition.right_role_id)
        {
            errors.push(unresolved.to_string());
        }
    }

    JoinValidation {
        valid: errors.is_empty(),
        errors,
    }
}
