//! TOML configuration for the CLI.
//!
//! A config file is never required. When one is named on the command line
//! it must exist and parse; otherwise the loader quietly falls through a
//! short list of conventional locations and settles on defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::CliError;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

/// Settings loadable from a `config.toml`.
///
/// Every field here has a command-line counterpart, and the flag wins
/// when both are given.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Unknown-child policy: `permissive`, `capture` or `strict`.
    pub strictness: Option<String>,
    /// Emit JSON by default.
    #[serde(default)]
    pub json: bool,
    /// Default log level when `--log-level` is not given.
    pub log_level: Option<String>,
}

/// Locates and reads the configuration.
///
/// An explicit path is authoritative: naming a file that does not exist
/// is an error. Without one, a `copperline/config.toml` in the working
/// directory takes precedence over the per-user config directory, and if
/// neither exists the defaults apply.
///
/// # Errors
///
/// Fails when the explicit path is missing, or when any found file cannot
/// be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CliError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("copperline/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "copperline", "copperline") {
        let user_config = proj_dirs.config_dir().join("config.toml");

        if user_config.exists() {
            info!(path = user_config.display().to_string(); "Loading configuration from user config directory");
            return load_config_file(user_config);
        }

        debug!(path = user_config.display().to_string(); "No user configuration file");
    } else {
        debug!("Could not determine the user config directory");
    }

    debug!("No configuration file found, using defaults");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, CliError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "strictness = \"capture\"\njson = true\nlog_level = \"debug\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.strictness.as_deref(), Some("capture"));
        assert!(config.json);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_omitted_fields_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "json = true").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!(config.strictness.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let err = load_config(Some("/nonexistent/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_unknown_key_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strctness = \"strict\"").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }
}
