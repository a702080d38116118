use std::{io, path::PathBuf};

use thiserror::Error;

use crate::TestKind;

#[derive(Error, Debug)]
pub enum LaunchError {
    // Standard errors with From implementations
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // Resolution errors
    #[error("Unsupported test kind: {0}")]
    UnsupportedKind(TestKind),

    #[error("Failed to resolve launch configuration: {0}")]
    Resolution(String),

    #[error("Launch configuration resolution was cancelled")]
    Cancelled,

    // Configuration errors
    #[error("No workspace folder found")]
    NoWorkspaceFolder,

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),
}

impl LaunchError {
    /// Whether the failure comes from workspace or project metadata rather
    /// than from the runner or the caller.
    #[must_use]
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::Resolution(_) | Self::NoWorkspaceFolder)
    }
}
