//! Environment-based configuration overrides.

use std::collections::HashMap;
use std::str::FromStr;

use super::AsciicastConfig;
use crate::error::{CastError, Result};

/// Environment configuration prefix.
pub const DEFAULT_PREFIX: &str = "ASCIICAST";

/// Recognized variable names, without the prefix.
pub mod vars {
    /// Playback speed factor.
    pub const SPEED: &str = "SPEED";
    /// Idle time limit in seconds.
    pub const IDLE_TIME_LIMIT: &str = "IDLE_TIME_LIMIT";
    /// Batch worker limit.
    pub const PARALLEL: &str = "PARALLEL";
    /// Keep going after failed files.
    pub const SKIP_ERRORS: &str = "SKIP_ERRORS";
    /// Batch file pattern.
    pub const PATTERN: &str = "PATTERN";
    /// Batch work distribution.
    pub const DISTRIBUTION: &str = "DISTRIBUTION";
    /// Batch output directory.
    pub const OUTPUT_DIR: &str = "OUTPUT_DIR";
    /// Log level filter.
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Log format.
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Environment variable reader.
///
/// Values set with [`EnvConfig::set`] shadow the process environment, which
/// lets tests exercise overrides without touching global state.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Prefix for environment variables.
    prefix: String,
    /// Values that shadow the process environment.
    overrides: HashMap<String, Option<String>>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvConfig {
    /// Create a new environment config reader.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            overrides: HashMap::new(),
        }
    }

    /// Build the full environment variable name.
    fn var_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, name.to_uppercase())
        }
    }

    /// Get a string value. Empty values count as unset.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let var_name = self.var_name(name);
        let value = match self.overrides.get(&var_name) {
            Some(value) => value.clone(),
            None => std::env::var(&var_name).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Get a parsed value, failing on values that do not parse.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(name)
            .map(|v| {
                v.trim().parse().map_err(|e| {
                    CastError::config(format!("invalid {}={v:?}: {e}", self.var_name(name)))
                })
            })
            .transpose()
    }

    /// Get a boolean value.
    pub fn bool(&self, name: &str) -> Result<Option<bool>> {
        self.get(name)
            .map(|v| match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" | "enabled" => Ok(true),
                "0" | "false" | "no" | "off" | "disabled" => Ok(false),
                _ => Err(CastError::config(format!(
                    "invalid {}={v:?}: expected a boolean",
                    self.var_name(name)
                ))),
            })
            .transpose()
    }

    /// Check if a variable is set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Shadow a variable.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let var_name = self.var_name(name);
        self.overrides.insert(var_name, Some(value.into()));
    }

    /// Hide a variable, even if the process environment has it.
    pub fn unset(&mut self, name: &str) {
        let var_name = self.var_name(name);
        self.overrides.insert(var_name, None);
    }

    /// Apply every recognized override to `config`.
    pub fn apply(&self, config: &mut AsciicastConfig) -> Result<()> {
        if let Some(speed) = self.parse(vars::SPEED)? {
            config.playback.speed = speed;
        }
        if let Some(limit) = self.parse(vars::IDLE_TIME_LIMIT)? {
            config.playback.idle_time_limit = Some(limit);
        }
        if let Some(parallel) = self.parse(vars::PARALLEL)? {
            config.batch.parallel = Some(parallel);
        }
        if let Some(skip) = self.bool(vars::SKIP_ERRORS)? {
            config.batch.skip_errors = skip;
        }
        if let Some(pattern) = self.get(vars::PATTERN) {
            config.batch.pattern = Some(pattern);
        }
        if let Some(distribution) = self.parse(vars::DISTRIBUTION)? {
            config.batch.distribution = distribution;
        }
        if let Some(dir) = self.get(vars::OUTPUT_DIR) {
            config.batch.output_dir = Some(dir.into());
        }
        if let Some(level) = self.get(vars::LOG_LEVEL) {
            config.logging.level = level;
        }
        if let Some(format) = self.get(vars::LOG_FORMAT) {
            config.logging.format = match format.trim().to_lowercase().as_str() {
                "plaintext" | "text" | "plain" => super::LogFormat::Plaintext,
                "json" => super::LogFormat::Json,
                _ => {
                    return Err(CastError::config(format!(
                        "invalid {}={format:?}: expected \"plaintext\" or \"json\"",
                        self.var_name(vars::LOG_FORMAT)
                    )));
                }
            };
        }
        Ok(())
    }
}
