//! Launch configuration resolution for Java test runs started from an editor.
//!
//! A run starts from [`TestItem`]s wrapped in a [`TestRunRequest`]. The
//! controller hands out a [`TestRun`] handle, a [`RunContext`] bundles the
//! selection with that handle, and a [`Runner`] for the context's test kind
//! fills in the framework-specific defaults when
//! [`resolve_launch_configuration_for_runner`] turns a partial
//! [`ExecutionConfig`] into a complete [`LaunchConfiguration`].

use lsp_types::{Range, Url};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod launch;
pub mod log;
pub mod metadata;
pub mod run;
pub mod runner;
pub mod workspace;

// Framework-specific runners
pub mod junit;
pub mod testng;

pub use context::RunContext;
pub use controller::{TestController, TestRunRequest};
pub use launch::{ExecutionConfig, LaunchConfiguration, resolve_launch_configuration_for_runner};
pub use run::{CancellationToken, RunTracker, TestRun, TestState};
pub use runner::Runner;

// --- Core Types ---

/// Test framework a test item belongs to.
#[derive(
    Serialize, Deserialize, Display, EnumString, Debug, Eq, PartialEq, Hash, Clone, Copy, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TestKind {
    JUnit5,
    JUnit,
    TestNG,
    #[default]
    None,
}

/// Granularity of a test item in the test tree.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub enum TestLevel {
    Root,
    Workspace,
    WorkspaceFolder,
    Project,
    Package,
    Class,
    #[default]
    Method,
    Invocation,
}

/// Framework data attached to a test item by discovery or by the caller.
///
/// Nothing here is derived from [`TestItem::id`]; the id stays opaque.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TestItemData {
    pub test_kind: TestKind,
    pub test_level: TestLevel,
    pub project_name: String,
    /// Fully qualified name, e.g. `junit4.TestAnnotation#shouldPass`.
    pub full_name: String,
    /// Encoded element handle understood by the Java language server.
    pub jdt_handler: Option<String>,
}

/// A test or test container in the editor's test tree.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TestItem {
    pub id: String,
    pub label: String,
    pub uri: Option<Url>,
    pub range: Range,
    pub data: TestItemData,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children: Vec<TestItem>,
}

impl TestItem {
    #[must_use]
    pub fn kind(&self) -> TestKind {
        self.data.test_kind
    }

    /// Find an item by id in this subtree, depth first.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&TestItem> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}
