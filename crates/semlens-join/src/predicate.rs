//! Row matching predicate.

use semlens_model::{DataSource, JoinOperator, Row, Value};

use crate::resolve::ResolvedCondition;

/// Compare two cells.
///
/// `=` and `!=` use strict equality on the raw values, so `1` and `"1"`
/// differ. Ordering operators compare numeric coercions; a non-numeric
/// operand coerces to NaN and fails every comparison.
pub fn compare(operator: JoinOperator, left: &Value, right: &Value) -> bool {
    match operator {
        JoinOperator::Eq => left.strict_eq(right),
        JoinOperator::Ne => !left.strict_eq(right),
        JoinOperator::Gt => left.to_number() > right.to_number(),
        JoinOperator::Lt => left.to_number() < right.to_number(),
        JoinOperator::Ge => left.to_number() >= right.to_number(),
        JoinOperator::Le => left.to_number() <= right.to_number(),
    }
}

/// All conditions hold for the pair.
pub fn rows_match(conditions: &[ResolvedCondition], left: &Row, right: &Row) -> bool {
    conditions.iter().all(|condition| {
        compare(
            condition.operator,
            DataSource::cell(left, &condition.left_column),
            DataSource::cell(right, &condition.right_column),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_strict() {
        assert!(compare(JoinOperator::Eq, &Value::Number(1.0), &Value::Number(1.0)));
        assert!(!compare(JoinOperator::Eq, &Value::Number(1.0), &Value::from("1")));
        assert!(compare(JoinOperator::Ne, &Value::Number(1.0), &Value::from("1")));
        assert!(compare(JoinOperator::Eq, &Value::Null, &Value::Null));
    }

    #[test]
    fn ordering_coerces_and_nan_fails() {
        assert!(compare(JoinOperator::Gt, &Value::from("10"), &Value::Number(9.0)));
        assert!(compare(JoinOperator::Le, &Value::Null, &Value::Number(0.0)));
        assert!(!compare(JoinOperator::Gt, &Value::from("ten"), &Value::Number(1.0)));
        assert!(!compare(JoinOperator::Le, &Value::from("ten"), &Value::Number(1.0)));
    }
}
