//! Project metadata needed to launch a test run.
//!
//! In an editor this is answered by the Java language server, which knows the
//! project's classpath and the main class of the framework's test launcher.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{TestKind, TestLevel, context::RunContext, error::LaunchError};

/// What the metadata source is asked for.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LaunchArgumentsRequest {
    pub project_name: String,
    pub test_kind: TestKind,
    pub test_level: TestLevel,
    pub test_names: Vec<String>,
    pub test_handlers: Vec<String>,
}

impl LaunchArgumentsRequest {
    #[must_use]
    pub fn from_context(context: &RunContext) -> Self {
        let items = &context.test_items;
        Self {
            project_name: context.project_name.clone(),
            test_kind: context.kind,
            test_level: items
                .first()
                .map_or(TestLevel::Method, |item| item.data.test_level),
            test_names: items
                .iter()
                .map(|item| item.data.full_name.clone())
                .filter(|name| !name.is_empty())
                .collect(),
            test_handlers: items
                .iter()
                .filter_map(|item| item.data.jdt_handler.clone())
                .collect(),
        }
    }
}

/// Launch arguments computed from the project.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LaunchArguments {
    pub project_name: String,
    pub main_class: String,
    pub working_directory: Option<String>,
    pub classpath: Vec<String>,
    pub modulepath: Vec<String>,
    pub vm_arguments: Vec<String>,
    pub program_arguments: Vec<String>,
    /// Java home the project is built with. Informational only; `javaExec`
    /// in the launch configuration comes from the caller alone.
    pub java_home: Option<String>,
}

/// Source of project metadata.
#[async_trait]
pub trait ProjectMetadata: Send + Sync {
    async fn resolve_launch_arguments(
        &self,
        request: &LaunchArgumentsRequest,
    ) -> Result<LaunchArguments, LaunchError>;
}

/// Metadata known up front, answered without suspending.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    pub arguments: LaunchArguments,
}

impl StaticMetadata {
    #[must_use]
    pub fn new(arguments: LaunchArguments) -> Self {
        Self { arguments }
    }
}

#[async_trait]
impl ProjectMetadata for StaticMetadata {
    async fn resolve_launch_arguments(
        &self,
        request: &LaunchArgumentsRequest,
    ) -> Result<LaunchArguments, LaunchError> {
        tracing::debug!("static launch arguments for {}", request.project_name);
        Ok(self.arguments.clone())
    }
}
