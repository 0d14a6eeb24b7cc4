//! Runtime settings for the `seat-match` binary.
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `seat-match.toml` (or the file named with `--config`)
//! 3. environment: [`ENV_CATALOG`], [`ENV_POLICY`], [`ENV_LOG`]
//! 4. command-line flags (applied by the binary)
//!
//! ```toml
//! catalog_path = "data/catalog.toml"
//! policy = "lenient"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared_utils::{config::ConfigError, env};
use thiserror::Error;

use crate::catalog::normalize::LoadPolicy;

/// Default settings file, looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "seat-match.toml";
/// Overrides [`Settings::catalog_path`].
pub const ENV_CATALOG: &str = "SEAT_MATCH_CATALOG";
/// Overrides [`Settings::policy`] (`strict` or `lenient`).
pub const ENV_POLICY: &str = "SEAT_MATCH_POLICY";
/// Overrides [`LoggingConfig::level`].
pub const ENV_LOG: &str = "SEAT_MATCH_LOG";

/// Settings could not be loaded.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for [`Settings`].
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
    /// An environment override is malformed.
    #[error(transparent)]
    Env(#[from] ConfigError),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// `[logging]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `"info"` or
    /// `"seat_match=debug"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Catalog file used when a command is not given `--file`.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// How bad catalog records are handled.
    #[serde(default)]
    pub policy: LoadPolicy,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from `explicit`, or from [`DEFAULT_SETTINGS_FILE`] when it exists,
    /// then apply environment overrides.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file just means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_SETTINGS_FILE)).filter(|p| p.is_file()),
        };
        let mut settings = match path {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| SettingsError::Read { path, source })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        settings.apply_env()?;
        Ok(settings)
    }

    /// Apply environment overrides in place.
    pub fn apply_env(&mut self) -> Result<(), SettingsError> {
        if let Some(path) = env::get_env_var_opt(ENV_CATALOG)? {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(policy) = env::parse_env_var::<LoadPolicy>(ENV_POLICY)? {
            self.policy = policy;
        }
        if let Some(level) = env::get_env_var_opt(ENV_LOG)? {
            self.logging.level = level;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn empty_file_yields_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.policy, LoadPolicy::Strict);
        assert_eq!(s.logging.level, "info");
        assert_eq!(s.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn full_file_parses() {
        let s = Settings::from_toml_str(
            r#"
            catalog_path = "data/catalog.toml"
            policy = "lenient"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(s.catalog_path.as_deref(), Some(Path::new("data/catalog.toml")));
        assert_eq!(s.policy, LoadPolicy::Lenient);
        assert_eq!(s.logging.format, LogFormat::Json);
        assert_eq!(s.logging.level, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Settings::from_toml_str("catalog = \"x\""),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    #[serial]
    fn environment_overrides_file_values() {
        // SAFETY: serialized with every other test touching these variables.
        unsafe {
            std::env::set_var(ENV_CATALOG, "/tmp/other.json");
            std::env::set_var(ENV_POLICY, "lenient");
            std::env::set_var(ENV_LOG, "seat_match=debug");
        }
        let mut s = Settings::from_toml_str("catalog_path = \"a.toml\"").unwrap();
        let applied = s.apply_env();
        unsafe {
            std::env::remove_var(ENV_CATALOG);
            std::env::remove_var(ENV_POLICY);
            std::env::remove_var(ENV_LOG);
        }
        applied.unwrap();
        assert_eq!(s.catalog_path.as_deref(), Some(Path::new("/tmp/other.json")));
        assert_eq!(s.policy, LoadPolicy::Lenient);
        assert_eq!(s.logging.level, "seat_match=debug");
    }

    #[test]
    #[serial]
    fn malformed_policy_override_is_reported() {
        unsafe { std::env::set_var(ENV_POLICY, "sloppy") };
        let result = Settings::default().apply_env();
        unsafe { std::env::remove_var(ENV_POLICY) };
        assert!(matches!(
            result,
            Err(SettingsError::Env(ConfigError::InvalidEnvVar { .. }))
        ));
    }
}
