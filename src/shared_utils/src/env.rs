//! Environment variable access with structured errors.

use std::{env::VarError, str::FromStr};

use crate::config::ConfigError;

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, ConfigError> {
    get_env_var_opt(name)?.ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Reads an optional environment variable.
///
/// Unset and blank variables both yield `Ok(None)`; a value that is not valid
/// unicode is an error rather than being silently ignored.
pub fn get_env_var_opt(name: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v.trim().to_string())),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            reason: "value is not valid unicode".into(),
        }),
    }
}

/// Reads an optional environment variable and parses it with [`FromStr`].
pub fn parse_env_var<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = get_env_var_opt(name)? else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            reason: e.to_string(),
        })
}
