use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{TestKind, error::LaunchError};

/// Name of the per-workspace configuration file.
pub const CONFIG_FILE_NAME: &str = ".java-test.toml";

/// File name of the bundled TestNG launcher jar.
pub const RUNNER_JAR_NAME: &str = "com.microsoft.java.test.runner-jar-with-dependencies.jar";

/// Defaults applied by one runner when the caller leaves a field out.
#[derive(Debug, Deserialize, Clone, Serialize, Default, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Environment variables for the test process
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Extra JVM arguments
    #[serde(default)]
    pub vm_args: Vec<String>,
}

/// Per-framework runner settings.
#[derive(Debug, Deserialize, Clone, Serialize, Default, PartialEq, Eq)]
pub struct RunnerTable {
    /// Used for both JUnit 4 and JUnit 5 runs
    #[serde(default)]
    pub junit: RunnerSettings,
    #[serde(default)]
    pub testng: RunnerSettings,
}

/// Main configuration, read from [`CONFIG_FILE_NAME`] in the workspace
/// folder.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Directory holding the TestNG launcher jar
    #[serde(default = "default_runner_jar_dir")]
    pub runner_jar_dir: String,

    /// Runner defaults per test framework
    #[serde(default)]
    pub runner: RunnerTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            runner_jar_dir: default_runner_jar_dir(),
            runner: RunnerTable::default(),
        }
    }
}

fn default_log_dir() -> String {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("java-test-launch/logs")
        .to_string_lossy()
        .to_string()
}

fn default_runner_jar_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("java-test-launch/server")
        .to_string_lossy()
        .to_string()
}

impl Config {
    /// Read the configuration file of a workspace folder.
    pub fn from_file(workspace_dir: &Path) -> Result<Self, LaunchError> {
        let path = workspace_dir.join(CONFIG_FILE_NAME);
        let content = std::fs::read_to_string(&path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                LaunchError::ConfigNotFound(path.clone())
            } else {
                LaunchError::IO(error)
            }
        })?;
        Ok(toml::from_str::<Config>(&content)?)
    }

    /// Like [`Config::from_file`], falling back to defaults when the file is
    /// missing.
    pub fn load(workspace_dir: &Path) -> Result<Self, LaunchError> {
        match Self::from_file(workspace_dir) {
            Err(LaunchError::ConfigNotFound(path)) => {
                tracing::debug!("no configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.log_dir)
    }

    #[must_use]
    pub fn runner_jar(&self) -> PathBuf {
        PathBuf::from(&self.runner_jar_dir).join(RUNNER_JAR_NAME)
    }

    /// Settings of the runner serving `kind`, if any runner does.
    #[must_use]
    pub fn runner_settings(&self, kind: TestKind) -> Option<&RunnerSettings> {
        match kind {
            TestKind::JUnit | TestKind::JUnit5 => Some(&self.runner.junit),
            TestKind::TestNG => Some(&self.runner.testng),
            TestKind::None => None,
        }
    }

    /// Validate configuration and return warnings.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let uses_testng = self.runner.testng != RunnerSettings::default();
        if uses_testng && !self.runner_jar().exists() {
            warnings.push(format!(
                "TestNG runner jar not found at '{}'",
                self.runner_jar().display()
            ));
        }

        for (kind, settings) in [("junit", &self.runner.junit), ("testng", &self.runner.testng)] {
            if let Some(arg) = settings.vm_args.iter().find(|arg| !arg.starts_with('-')) {
                warnings.push(format!(
                    "Runner '{kind}': vm argument '{arg}' does not start with '-'"
                ));
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(dir.path()),
            Err(LaunchError::ConfigNotFound(_))
        ));
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn reads_runner_tables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
runner_jar_dir = "/opt/java-test"

[runner.junit]
vm_args = ["-Xmx512m"]

[runner.junit.env]
JUNIT_PLATFORM = "on"
"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(
            config.runner_jar(),
            PathBuf::from("/opt/java-test").join(RUNNER_JAR_NAME)
        );
        let junit = config.runner_settings(TestKind::JUnit5).unwrap();
        assert_eq!(junit.vm_args, vec!["-Xmx512m"]);
        assert_eq!(junit.env.get("JUNIT_PLATFORM").map(String::as_str), Some("on"));
        assert!(config.runner_settings(TestKind::None).is_none());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn warns_about_suspicious_settings() {
        let config = Config {
            runner_jar_dir: "/nonexistent".to_string(),
            runner: RunnerTable {
                junit: RunnerSettings::default(),
                testng: RunnerSettings {
                    vm_args: vec!["Xmx1g".to_string()],
                    ..Default::default()
                },
            },
            ..Default::default()
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("TestNG runner jar not found"));
        assert!(warnings[1].contains("'Xmx1g'"));
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "runner = 3").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(LaunchError::Toml(_))));
    }
}
