use std::{path::PathBuf, sync::Arc};

use lsp_types::WorkspaceFolder;

use crate::{TestItem, TestKind, error::LaunchError, run::RunTracker, workspace};

/// Everything known about one run before it is launched.
///
/// Built once per run and only ever borrowed afterwards.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub is_debug: bool,
    pub kind: TestKind,
    pub project_name: String,
    pub test_items: Vec<TestItem>,
    pub test_run: Arc<dyn RunTracker>,
    pub workspace_folder: Option<WorkspaceFolder>,
}

impl RunContext {
    /// Local path of the workspace folder the run belongs to.
    pub fn workspace_path(&self) -> Result<PathBuf, LaunchError> {
        let folder = self
            .workspace_folder
            .as_ref()
            .ok_or(LaunchError::NoWorkspaceFolder)?;
        workspace::folder_path(folder)
    }

    /// Label of the first selected item, used to name the launch.
    #[must_use]
    pub fn first_label(&self) -> Option<&str> {
        self.test_items.first().map(|item| item.label.as_str())
    }
}
