//! Drain configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable read by [`DrainOptions::from_env`].
pub const DEBUG_MODE_ENV: &str = "DONELIST_DEBUG_MODE";

/// Options controlling a drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrainOptions {
    /// Skip every completion notification. Items are still exported and
    /// released.
    pub debug_mode: bool,
}

impl DrainOptions {
    /// Options with debug mode switched on.
    pub const fn debug() -> Self {
        Self { debug_mode: true }
    }

    /// Parses options from a JSON object. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] for malformed JSON or unknown fields.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Json)
    }

    /// Reads options from the process environment.
    ///
    /// An unset [`DEBUG_MODE_ENV`] leaves debug mode off.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] when the variable holds something
    /// other than a boolean word.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// # Errors
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(value) = lookup(DEBUG_MODE_ENV) {
            options.debug_mode = parse_flag(&value).ok_or_else(|| ConfigError::InvalidEnv {
                var: DEBUG_MODE_ENV,
                value,
            })?;
        }
        Ok(options)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
