//! Project loading.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ProjectError, Result};
use crate::project::{CURRENT_PROJECT_VERSION, Project};

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Load a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project> {
    let bytes = fs::read(path).map_err(|e| ProjectError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let project = parse_project(&bytes, path)?;
    tracing::info!(
        bundles = project.bundles.len(),
        joins = project.joins.len(),
        virtual_bundles = project.virtual_bundles.len(),
        "Loaded project from {}",
        path.display()
    );
    Ok(project)
}

/// Parse project bytes. The version is checked before the body so a file
/// from a newer release reports the version instead of a field error.
pub fn parse_project(bytes: &[u8], path: &Path) -> Result<Project> {
    let invalid = |source| ProjectError::InvalidFormat {
        path: path.to_path_buf(),
        source,
    };

    let probe: VersionProbe = serde_json::from_slice(bytes).map_err(invalid)?;
    if probe.version > CURRENT_PROJECT_VERSION {
        return Err(ProjectError::UnsupportedVersion {
            found: probe.version,
            max_supported: CURRENT_PROJECT_VERSION,
            path: path.to_path_buf(),
        });
    }

    serde_json::from_slice(bytes).map_err(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_newer_version() {
        let err = parse_project(br#"{"version": 99, "name": "x"}"#, Path::new("p.json"))
            .unwrap_err();
        assert!(matches!(
            err,
            ProjectError::UnsupportedVersion {
                found: 99,
                max_supported: 1,
                ..
            }
        ));
        assert!(err.user_message().contains("newer version"));
    }

    #[test]
    fn test_rejects_non_project_json() {
        let err = parse_project(br#""just text""#, Path::new("p.json")).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidFormat { .. }));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let project = parse_project(br#"{"version": 1, "name": "x"}"#, Path::new("p.json"))
            .unwrap();
        assert!(project.bundles.is_empty());
        assert!(project.schemas.is_empty());
    }
}
