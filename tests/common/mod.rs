//! Shared fixture for launch configuration tests.
//!
//! Mirrors what an editor does before launching: create the item, wrap it in
//! a request, open a run and bundle everything into a context.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use java_test_launch::{
    RunContext, TestController, TestItem, TestKind, TestRun, TestRunRequest,
    error::LaunchError,
    metadata::{LaunchArguments, LaunchArgumentsRequest, ProjectMetadata},
    TestItemData, TestLevel,
};
use lsp_types::{Url, WorkspaceFolder};

/// Encoded element handle of `junit4.TestAnnotation` in the demo project.
pub const TEST_ANNOTATION_HANDLER: &str = "=junit/src\\/test\\/java=/optional=/true=/=/maven.pomderived=/true=/=/test=/true=/<junit4{TestAnnotation.java[TestAnnotation~shouldPass";

/// Metadata source that counts queries and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingMetadata {
    pub calls: AtomicUsize,
    pub fail: bool,
    pub java_home: Option<String>,
}

impl RecordingMetadata {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Reports the JDK the project is built with, as language servers do.
    pub fn with_java_home(java_home: &str) -> Self {
        Self {
            java_home: Some(java_home.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectMetadata for RecordingMetadata {
    async fn resolve_launch_arguments(
        &self,
        request: &LaunchArgumentsRequest,
    ) -> Result<LaunchArguments, LaunchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail {
            return Err(LaunchError::Resolution(format!(
                "project '{}' is not imported",
                request.project_name
            )));
        }
        Ok(LaunchArguments {
            project_name: request.project_name.clone(),
            main_class: "org.eclipse.jdt.internal.junit.runner.RemoteTestRunner".to_string(),
            working_directory: Some("/home/dev/junit".to_string()),
            classpath: vec!["/home/dev/junit/target/test-classes".to_string()],
            modulepath: vec!["/home/dev/junit/target/mods".to_string()],
            vm_arguments: vec!["-ea".to_string()],
            program_arguments: request.test_names.clone(),
            java_home: self.java_home.clone(),
        })
    }
}

/// One controller with a single run of one JUnit method.
pub struct Session {
    pub controller: TestController,
    pub item: TestItem,
    pub run: TestRun,
    pub context: RunContext,
}

impl Session {
    pub fn new(id: &str, full_name: &str, label: &str) -> Self {
        Self::for_kind(TestKind::JUnit, id, full_name, label)
    }

    pub fn for_kind(kind: TestKind, id: &str, full_name: &str, label: &str) -> Self {
        let mut controller = TestController::new("testController", "Mock Test");
        let item = controller.create_test_item_with(
            id,
            label,
            TestItemData {
                test_kind: kind,
                test_level: TestLevel::Method,
                project_name: "junit".to_string(),
                full_name: full_name.to_string(),
                jdt_handler: None,
            },
            None,
            Some(TEST_ANNOTATION_HANDLER),
        );
        let request = TestRunRequest::new(vec![item.clone()], vec![]);
        let run = controller.create_test_run(&request);
        let context = RunContext {
            is_debug: false,
            kind,
            project_name: "junit".to_string(),
            test_items: vec![item.clone()],
            test_run: Arc::new(run.clone()),
            workspace_folder: Some(WorkspaceFolder {
                uri: Url::parse("file:///home/dev/junit").unwrap(),
                name: "junit".to_string(),
            }),
        };
        Self {
            controller,
            item,
            run,
            context,
        }
    }

    pub fn teardown(mut self) {
        self.run.dispose();
        self.controller.dispose();
    }
}
