use std::collections::BTreeMap;

use crate::{
    TestKind, config::RunnerSettings, context::RunContext, metadata::LaunchArguments,
    runner::LaunchDefaults,
};

/// Launcher used by the Eclipse JUnit runtime when the project does not
/// report one.
pub const REMOTE_TEST_RUNNER: &str = "org.eclipse.jdt.internal.junit.runner.RemoteTestRunner";

/// Runner for JUnit 4 and JUnit 5 (Jupiter) tests.
///
/// Classpath, module path and launcher arguments come from the project
/// metadata; the configuration file only adds environment and JVM flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JUnitRunner {
    kind: TestKind,
    settings: RunnerSettings,
}

impl JUnitRunner {
    #[must_use]
    pub fn new(kind: TestKind, settings: RunnerSettings) -> Self {
        Self { kind, settings }
    }

    #[must_use]
    pub fn kind(&self) -> TestKind {
        self.kind
    }
}

impl LaunchDefaults for JUnitRunner {
    fn supports(&self, kind: TestKind) -> bool {
        matches!(kind, TestKind::JUnit | TestKind::JUnit5)
    }

    fn main_class(&self, arguments: &LaunchArguments) -> String {
        if arguments.main_class.is_empty() {
            REMOTE_TEST_RUNNER.to_string()
        } else {
            arguments.main_class.clone()
        }
    }

    fn class_paths(&self, arguments: &LaunchArguments) -> Vec<String> {
        arguments.classpath.clone()
    }

    fn environment(&self) -> BTreeMap<String, String> {
        self.settings.env.clone()
    }

    fn program_arguments(&self, _context: &RunContext, arguments: &LaunchArguments) -> Vec<String> {
        arguments.program_arguments.clone()
    }

    fn vm_arguments(&self, arguments: &LaunchArguments) -> Vec<String> {
        arguments
            .vm_arguments
            .iter()
            .chain(&self.settings.vm_args)
            .cloned()
            .collect()
    }
}
