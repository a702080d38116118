use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    TestKind, config::RunnerSettings, context::RunContext, metadata::LaunchArguments,
    runner::LaunchDefaults,
};

/// Entry point of the bundled runner jar.
pub const LAUNCHER_MAIN_CLASS: &str = "com.microsoft.java.test.runner.Launcher";

/// Runner for TestNG tests, launched through the bundled runner jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestNgRunner {
    settings: RunnerSettings,
    runner_jar: PathBuf,
}

impl TestNgRunner {
    #[must_use]
    pub fn new(settings: RunnerSettings, runner_jar: PathBuf) -> Self {
        Self {
            settings,
            runner_jar,
        }
    }
}

impl LaunchDefaults for TestNgRunner {
    fn supports(&self, kind: TestKind) -> bool {
        kind == TestKind::TestNG
    }

    fn main_class(&self, _arguments: &LaunchArguments) -> String {
        LAUNCHER_MAIN_CLASS.to_string()
    }

    fn class_paths(&self, arguments: &LaunchArguments) -> Vec<String> {
        let mut class_paths = arguments.classpath.clone();
        class_paths.push(self.runner_jar.to_string_lossy().to_string());
        class_paths
    }

    fn environment(&self) -> BTreeMap<String, String> {
        self.settings.env.clone()
    }

    /// `testng` followed by the selected tests' fully qualified names.
    fn program_arguments(&self, context: &RunContext, _arguments: &LaunchArguments) -> Vec<String> {
        std::iter::once("testng".to_string())
            .chain(
                context
                    .test_items
                    .iter()
                    .map(|item| item.data.full_name.clone())
                    .filter(|name| !name.is_empty()),
            )
            .collect()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::{context_for, method_item};

    #[test]
    fn launches_through_runner_jar() {
        let runner = TestNgRunner::new(
            RunnerSettings::default(),
            PathBuf::from("/opt/java-test/runner.jar"),
        );
        let arguments = LaunchArguments {
            main_class: "ignored.Main".to_string(),
            classpath: vec!["/home/dev/junit/target/test-classes".to_string()],
            program_arguments: vec!["-port".to_string()],
            ..Default::default()
        };
        let context = context_for(
            TestKind::TestNG,
            vec![
                method_item(TestKind::TestNG, "testng.Smoke#starts"),
                method_item(TestKind::TestNG, "testng.Smoke#stops"),
            ],
        );

        assert_eq!(runner.main_class(&arguments), LAUNCHER_MAIN_CLASS);
        assert_eq!(
            runner.class_paths(&arguments),
            vec!["/home/dev/junit/target/test-classes", "/opt/java-test/runner.jar"]
        );
        assert_eq!(
            runner.program_arguments(&context, &arguments),
            vec!["testng", "testng.Smoke#starts", "testng.Smoke#stops"]
        );
        assert!(runner.supports(TestKind::TestNG));
        assert!(!runner.supports(TestKind::JUnit));
    }
}
