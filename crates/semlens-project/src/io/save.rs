//! Project saving.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{ProjectError, Result};
use crate::project::Project;

/// Save a project as pretty-printed JSON.
///
/// Writes a temp file next to the target and renames it over the target,
/// so a crash mid-save leaves the previous file intact.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(project)
        .map_err(|source| ProjectError::Serialization { source })?;

    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ProjectError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| ProjectError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(&bytes).map_err(|e| ProjectError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| ProjectError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| ProjectError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!("Saved project to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("project.json");

        save_project(&Project::new("Demo"), &path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"version\": 1"));
    }
}
