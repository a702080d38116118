//! Workspace folder utilities.

use std::path::{Path, PathBuf};

use lsp_types::WorkspaceFolder;

use crate::error::LaunchError;

/// Local path of a workspace folder. Only `file` URIs resolve.
pub fn folder_path(folder: &WorkspaceFolder) -> Result<PathBuf, LaunchError> {
    folder.uri.to_file_path().map_err(|()| {
        LaunchError::Resolution(format!(
            "workspace folder '{}' is not a local path: {}",
            folder.name, folder.uri
        ))
    })
}

/// Resolve a launch path against the workspace folder, folding `..` and `.`.
///
/// Paths holding editor variables such as `${workspaceFolder}` are returned
/// as written; the editor expands them.
#[must_use]
pub fn resolve_path(base_dir: &Path, relative_path: &str) -> PathBuf {
    if relative_path.contains("${") {
        return PathBuf::from(relative_path);
    }
    let absolute = if Path::new(relative_path).is_absolute() {
        PathBuf::from(relative_path)
    } else {
        base_dir.join(relative_path)
    };

    let mut components = Vec::new();
    for component in absolute.components() {
        match component {
            std::path::Component::ParentDir => {
                components.pop();
            }
            std::path::Component::Normal(_) | std::path::Component::RootDir => {
                components.push(component);
            }
            _ => {}
        }
    }

    PathBuf::from_iter(components)
}
