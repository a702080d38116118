use std::{fs, path::PathBuf, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::LaunchError};

/// Install a global subscriber writing to `<log_dir>/<name>.log`.
///
/// Returns the log file path. A subscriber installed earlier is left in
/// place.
pub fn init_logging(config: &Config, name: &str) -> Result<PathBuf, LaunchError> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join(format!("{name}.log"));
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("subscriber already installed, keeping it");
    }

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_log_file_in_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            log_dir: dir.path().join("logs").to_string_lossy().to_string(),
            ..Default::default()
        };
        let path = init_logging(&config, "launch").unwrap();
        assert_eq!(path, dir.path().join("logs/launch.log"));
        assert!(path.exists());

        // A second call keeps the first subscriber.
        init_logging(&config, "launch").unwrap();
    }
}
