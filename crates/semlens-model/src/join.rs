//! Join definitions between two bundles.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub const ALL: [JoinType; 4] = [Self::Inner, Self::Left, Self::Right, Self::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Left => "left",
            Self::Right => "right",
            Self::Full => "full",
        }
    }

    /// Every left row appears in the output at least once.
    pub fn preserves_left(&self) -> bool {
        matches!(self, Self::Left | Self::Full)
    }

    /// Every right row appears in the output at least once.
    pub fn preserves_right(&self) -> bool {
        matches!(self, Self::Right | Self::Full)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl JoinOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }

    /// Operators that compare numerically rather than by strict equality.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Self::Eq | Self::Ne)
    }
}

impl fmt::Display for JoinOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One role-to-role comparison. Conditions of a join are ANDed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCondition {
    pub left_role_id: String,
    pub right_role_id: String,
    pub operator: JoinOperator,
}

impl JoinCondition {
    pub fn new(
        left_role_id: impl Into<String>,
        operator: JoinOperator,
        right_role_id: impl Into<String>,
    ) -> Self {
        Self {
            left_role_id: left_role_id.into(),
            right_role_id: right_role_id.into(),
            operator,
        }
    }

    pub fn eq(left_role_id: impl Into<String>, right_role_id: impl Into<String>) -> Self {
        Self::new(left_role_id, JoinOperator::Eq, right_role_id)
    }
}

impl fmt::Display for JoinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left.{} {} right.{}",
            self.left_role_id, self.operator, self.right_role_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDefinition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub left_bundle_id: String,
    pub right_bundle_id: String,
    pub join_type: JoinType,
    pub conditions: Vec<JoinCondition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JoinDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        left_bundle_id: impl Into<String>,
        right_bundle_id: impl Into<String>,
        join_type: JoinType,
        conditions: Vec<JoinCondition>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            left_bundle_id: left_bundle_id.into(),
            right_bundle_id: right_bundle_id.into(),
            join_type,
            conditions,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when either side is the given bundle.
    pub fn references_bundle(&self, bundle_id: &str) -> bool {
        self.left_bundle_id == bundle_id || self.right_bundle_id == bundle_id
    }
}
