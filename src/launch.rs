//! Turning a caller's partial configuration into a launch configuration.

use std::{collections::BTreeMap, path::PathBuf, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    context::RunContext,
    error::LaunchError,
    metadata::{LaunchArgumentsRequest, ProjectMetadata},
    runner::Runner,
    workspace,
};

const ENCODING_FLAG: &str = "-Dfile.encoding=";

static VM_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:[^\s"]+|"[^"]*")+"#).expect("valid vm argument pattern"));

/// Partial configuration supplied by the caller, usually from the user's
/// settings. Empty lists and maps count as not supplied.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionConfig {
    pub name: Option<String>,
    pub working_directory: Option<String>,
    pub class_paths: Vec<String>,
    pub module_paths: Vec<String>,
    pub source_paths: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub env_file: Option<String>,
    pub java_exec: Option<String>,
    pub encoding: Option<String>,
    pub vm_args: Vec<String>,
    /// JVM arguments as a single command line, used when `vm_args` is empty.
    pub vmargs: Option<String>,
    pub args: Vec<String>,
    pub pre_launch_task: Option<String>,
    pub post_debug_task: Option<String>,
}

/// A complete configuration for the Java debugger to launch a test run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfiguration {
    pub name: String,
    #[serde(rename = "type")]
    pub launch_type: String,
    pub request: String,
    pub project_name: String,
    pub main_class: String,
    pub cwd: String,
    pub class_paths: Vec<String>,
    pub module_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_paths: Vec<String>,
    pub args: Vec<String>,
    pub vm_args: Vec<String>,
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_exec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    pub no_debug: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_launch_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_debug_task: Option<String>,
}

/// Split a JVM command line on whitespace, keeping double-quoted parts
/// together and dropping the quotes.
#[must_use]
pub fn split_vm_args(line: &str) -> Vec<String> {
    VM_ARG
        .find_iter(line)
        .map(|token| token.as_str().replace('"', ""))
        .collect()
}

/// Caller entries first and unchanged, then the runner's entries not
/// already listed.
fn caller_first(supplied: &[String], defaults: Vec<String>) -> Vec<String> {
    let mut paths = supplied.to_vec();
    for path in defaults {
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

/// Resolve the launch configuration for one run.
///
/// Fields the caller supplied are kept verbatim; everything else comes from
/// the runner's defaults over the project's launch arguments. Class and
/// module paths are the exception: the runner's entries are appended after
/// the caller's so the launcher and project classes stay reachable. The only
/// suspension point is the metadata query, which is abandoned with
/// [`LaunchError::Cancelled`] once the run is cancelled.
#[tracing::instrument(skip_all, fields(kind = %context.kind, project = %context.project_name))]
pub async fn resolve_launch_configuration_for_runner(
    runner: &Runner,
    context: &RunContext,
    config: &ExecutionConfig,
    metadata: &dyn ProjectMetadata,
) -> Result<LaunchConfiguration, LaunchError> {
    let defaults = runner.defaults();
    if !defaults.supports(context.kind) {
        return Err(LaunchError::UnsupportedKind(context.kind));
    }
    let workspace_path = context.workspace_path()?;

    let token = context.test_run.cancellation();
    if token.is_cancelled() {
        return Err(LaunchError::Cancelled);
    }
    let request = LaunchArgumentsRequest::from_context(context);
    let arguments = tokio::select! {
        biased;
        () = token.cancelled() => {
            tracing::info!("run cancelled while querying project metadata");
            return Err(LaunchError::Cancelled);
        }
        arguments = metadata.resolve_launch_arguments(&request) => arguments?,
    };
    tracing::debug!("launch arguments: {:#?}", arguments);

    let mut vm_args = defaults.vm_arguments(&arguments);
    if config.vm_args.is_empty() {
        if let Some(line) = &config.vmargs {
            vm_args.extend(split_vm_args(line));
        }
    } else {
        vm_args.extend(config.vm_args.iter().filter(|arg| !arg.is_empty()).cloned());
    }
    if let Some(encoding) = &config.encoding {
        if !vm_args.iter().any(|arg| arg.starts_with(ENCODING_FLAG)) {
            vm_args.push(format!("{ENCODING_FLAG}{encoding}"));
        }
    }

    let mut args = defaults.program_arguments(context, &arguments);
    args.extend(config.args.iter().cloned());

    let cwd = match config.working_directory.as_deref() {
        Some(dir) if !dir.is_empty() => workspace::resolve_path(&workspace_path, dir),
        _ => arguments
            .working_directory
            .as_deref()
            .map_or_else(|| workspace_path.clone(), PathBuf::from),
    };

    let name = config.name.clone().unwrap_or_else(|| match context.first_label() {
        Some(label) => format!("Launch Java Tests - {label}"),
        None => "Launch Java Tests".to_string(),
    });

    let project_name = if arguments.project_name.is_empty() {
        context.project_name.clone()
    } else {
        arguments.project_name.clone()
    };

    let configuration = LaunchConfiguration {
        name,
        launch_type: "java".to_string(),
        request: "launch".to_string(),
        project_name,
        main_class: defaults.main_class(&arguments),
        cwd: cwd.to_string_lossy().to_string(),
        class_paths: caller_first(&config.class_paths, defaults.class_paths(&arguments)),
        module_paths: caller_first(&config.module_paths, defaults.module_paths(&arguments)),
        source_paths: config.source_paths.clone(),
        args,
        vm_args,
        env: if config.env.is_empty() {
            defaults.environment()
        } else {
            config.env.clone()
        },
        env_file: config.env_file.clone(),
        java_exec: config.java_exec.clone(),
        encoding: config.encoding.clone(),
        no_debug: !context.is_debug,
        pre_launch_task: config.pre_launch_task.clone(),
        post_debug_task: config.post_debug_task.clone(),
    };
    tracing::info!("resolved launch configuration '{}'", configuration.name);
    Ok(configuration)
}
