//! Join error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Side of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinSide {
    Left,
    Right,
}

impl JoinSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a condition role did not resolve to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The bundle has no mapping for the role.
    Unmapped,
    /// The role is mapped to a column the bundle's source does not have.
    MissingColumn { column: String },
}

/// A condition role that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedColumn {
    pub side: JoinSide,
    pub bundle_name: String,
    pub role_id: String,
    #[serde(flatten)]
    pub reason: UnresolvedReason,
}

impl fmt::Display for UnresolvedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            UnresolvedReason::Unmapped => write!(
                f,
                "{} role '{}' is not mapped in bundle '{}'",
                self.side.title(),
                self.role_id,
                self.bundle_name
            ),
            UnresolvedReason::MissingColumn { column } => write!(
                f,
                "{} role '{}' is mapped to column '{}', which does not exist in bundle '{}'",
                self.side.title(),
                self.role_id,
                column,
                self.bundle_name
            ),
        }
    }
}

/// Join execution error. Every variant is raised before any row is scanned.
#[derive(Debug, Error)]
pub enum JoinError {
    /// A bundle the join refers to is not in the catalog.
    #[error("{side} bundle '{bundle_id}' not found")]
    BundleNotFound { side: JoinSide, bundle_id: String },

    /// The bundle passed for a side is not the one the join names.
    #[error("{side} bundle '{actual}' does not match join bundle '{expected}'")]
    BundleMismatch {
        side: JoinSide,
        expected: String,
        actual: String,
    },

    /// The join has no conditions.
    #[error("Join '{0}' has no conditions")]
    NoConditions(String),

    /// One or more condition roles do not resolve to an existing column.
    #[error("join condition references missing columns: {}", join_messages(.missing))]
    UnresolvedColumns { missing: Vec<UnresolvedColumn> },
}

fn join_messages(missing: &[UnresolvedColumn]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, JoinError>;
