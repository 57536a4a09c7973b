//! Project error types.
//!
//! Operations return structured errors with user-facing messages and
//! optional remediation hints.

use std::path::PathBuf;

use thiserror::Error;

use semlens_join::JoinError;
use semlens_model::ModelError;

/// Project operation error.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a project file.
    #[error("Invalid project file format")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Project file written by a newer version.
    #[error("Project file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Serialization error.
    #[error("Failed to serialize project data")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Temp file could not be renamed over the target.
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entity with this id already exists.
    #[error("{kind} '{id}' already exists")]
    DuplicateId { kind: &'static str, id: String },

    /// A referenced entity does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// A virtual bundle must name at least one source join.
    #[error("Virtual bundle '{0}' has no source joins")]
    NoSourceJoins(String),

    /// A join definition failed pre-flight validation.
    #[error("Join '{join_id}' is invalid: {}", .errors.join("; "))]
    InvalidJoin {
        join_id: String,
        errors: Vec<String>,
    },

    /// Join execution failed.
    #[error(transparent)]
    Join(#[from] JoinError),

    /// Schema catalogue error.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ProjectError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { path, source } => {
                format!(
                    "The file at {} is not a valid project file: {}",
                    path.display(),
                    source
                )
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This project file was created with a newer version of semlens \
                    (file version {found}, this version supports up to {max_supported}). \
                    Please update the application."
                )
            }
            Self::Serialization { .. } => {
                "An error occurred while saving the project data.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::DuplicateId { kind, id } => {
                format!("A {} with id '{}' already exists in this project.", kind.to_lowercase(), id)
            }
            Self::NotFound { kind, id } => {
                format!("No {} with id '{}' exists in this project.", kind.to_lowercase(), id)
            }
            Self::NoSourceJoins(id) => {
                format!("Virtual bundle '{id}' must be built from at least one join.")
            }
            Self::InvalidJoin { errors, .. } => {
                format!("The join cannot be saved: {}", errors.join("; "))
            }
            Self::Join(error) => format!("The join could not run: {error}"),
            Self::Model(error) => error.to_string(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => Some("Make sure you selected a semlens project file.".into()),
            Self::UnsupportedVersion { .. } => Some("Install the latest semlens release.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
            Self::InvalidJoin { .. } | Self::Join(JoinError::UnresolvedColumns { .. }) => {
                Some("Map every role used in the join conditions to a column in its bundle.".into())
            }
            Self::Serialization { .. }
            | Self::DuplicateId { .. }
            | Self::NotFound { .. }
            | Self::NoSourceJoins(_)
            | Self::Join(_)
            | Self::Model(_) => None,
        }
    }
}

/// Result type alias for project operations.
pub type Result<T> = std::result::Result<T, ProjectError>;
