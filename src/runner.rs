//! Runner capability trait and the closed set of supported runners.

use std::collections::BTreeMap;

use crate::{
    TestKind, config::Config, context::RunContext, error::LaunchError, junit::JUnitRunner,
    metadata::LaunchArguments, testng::TestNgRunner,
};

/// Framework-specific defaults for fields the caller left out.
///
/// Each supported framework implements this trait; the resolver only talks
/// to runners through it.
pub trait LaunchDefaults: Send + Sync {
    /// Kinds this runner can launch.
    fn supports(&self, kind: TestKind) -> bool;

    fn main_class(&self, arguments: &LaunchArguments) -> String;

    fn class_paths(&self, arguments: &LaunchArguments) -> Vec<String>;

    fn module_paths(&self, arguments: &LaunchArguments) -> Vec<String> {
        arguments.modulepath.clone()
    }

    fn environment(&self) -> BTreeMap<String, String>;

    fn program_arguments(&self, context: &RunContext, arguments: &LaunchArguments) -> Vec<String>;

    fn vm_arguments(&self, arguments: &LaunchArguments) -> Vec<String>;
}

/// A runner for one test framework.
#[derive(Debug, Clone)]
pub enum Runner {
    JUnit(JUnitRunner),
    TestNg(TestNgRunner),
}

impl Runner {
    /// Pick the runner for the context's test kind.
    pub fn new(context: &RunContext, config: &Config) -> Result<Self, LaunchError> {
        get(context.kind, config)
    }

    #[must_use]
    pub fn kind(&self) -> TestKind {
        match self {
            Self::JUnit(runner) => runner.kind(),
            Self::TestNg(_) => TestKind::TestNG,
        }
    }

    #[must_use]
    pub fn defaults(&self) -> &dyn LaunchDefaults {
        match self {
            Self::JUnit(runner) => runner,
            Self::TestNg(runner) => runner,
        }
    }
}

/// Get a runner by test kind.
pub fn get(kind: TestKind, config: &Config) -> Result<Runner, LaunchError> {
    let settings = config
        .runner_settings(kind)
        .cloned()
        .ok_or(LaunchError::UnsupportedKind(kind))?;
    match kind {
        TestKind::JUnit | TestKind::JUnit5 => Ok(Runner::JUnit(JUnitRunner::new(kind, settings))),
        TestKind::TestNG => Ok(Runner::TestNg(TestNgRunner::new(
            settings,
            config.runner_jar(),
        ))),
        TestKind::None => Err(LaunchError::UnsupportedKind(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_per_kind() {
        let config = Config::default();
        assert!(matches!(get(TestKind::JUnit, &config), Ok(Runner::JUnit(_))));
        assert_eq!(get(TestKind::JUnit5, &config).unwrap().kind(), TestKind::JUnit5);
        assert!(matches!(get(TestKind::TestNG, &config), Ok(Runner::TestNg(_))));
        assert!(matches!(
            get(TestKind::None, &config),
            Err(LaunchError::UnsupportedKind(TestKind::None))
        ));
    }

    #[test]
    fn junit_runner_does_not_launch_testng() {
        let runner = get(TestKind::JUnit, &Config::default()).unwrap();
        assert!(runner.defaults().supports(TestKind::JUnit5));
        assert!(!runner.defaults().supports(TestKind::TestNG));
    }
}
