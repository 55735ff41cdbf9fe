//! Configuration types for rust-asciicast.
//!
//! Configuration is read from a TOML file (see [`file`]) and then overridden
//! from `ASCIICAST_*` environment variables (see [`env`]). Each section
//! converts into the options type the matching component takes.
//!
//! ```toml
//! [playback]
//! speed = 2.0
//! idle_time_limit = 1.5
//!
//! [batch]
//! parallel = 8
//! skip_errors = true
//! pattern = "**/*.cast"
//! distribution = "chunked"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

pub mod env;
pub mod file;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::batch::{BatchOptions, DEFAULT_EXTENSION, Distribution};
use crate::error::{CastError, Result};
use crate::player::{PlaybackOptions, PlaybackSpeed};

pub use env::EnvConfig;
pub use file::{load, parse_toml};

/// Default log level filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AsciicastConfig {
    /// Playback settings.
    pub playback: PlaybackConfig,
    /// Batch settings.
    pub batch: BatchConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AsciicastConfig {
    /// Load a TOML file and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        file::load(path)?.with_env(&EnvConfig::default())
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env(&EnvConfig::default())
    }

    /// Apply overrides from `env`.
    pub fn with_env(mut self, env: &EnvConfig) -> Result<Self> {
        env.apply(&mut self)?;
        Ok(self)
    }
}

/// Playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Speed factor; larger is faster.
    pub speed: f64,
    /// Ceiling in seconds on any single wait between events.
    pub idle_time_limit: Option<f64>,
    /// Skip all waits.
    pub instant: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            idle_time_limit: None,
            instant: false,
        }
    }
}

impl PlaybackConfig {
    /// Convert into player options.
    pub fn to_options(&self) -> Result<PlaybackOptions> {
        let speed = if self.instant {
            PlaybackSpeed::Instant
        } else {
            PlaybackSpeed::factor(self.speed)
        };
        let mut options = PlaybackOptions::new().with_speed(speed);
        if let Some(secs) = self.idle_time_limit {
            let limit = Duration::try_from_secs_f64(secs).map_err(|_| {
                CastError::config(format!(
                    "idle_time_limit must be a non-negative number of seconds, got {secs}"
                ))
            })?;
            // Zero means no limit, as in cast headers.
            if !limit.is_zero() {
                options = options.with_idle_time_limit(limit);
            }
        }
        options.validate()?;
        Ok(options)
    }
}

/// Batch settings. The input directory is supplied per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Where artifacts are written.
    pub output_dir: Option<PathBuf>,
    /// File glob relative to the input directory.
    pub pattern: Option<String>,
    /// Worker limit.
    pub parallel: Option<usize>,
    /// Keep going after a failed file.
    pub skip_errors: bool,
    /// Work distribution strategy.
    pub distribution: Distribution,
    /// Extension of produced artifacts.
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            pattern: None,
            parallel: None,
            skip_errors: false,
            distribution: Distribution::default(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl BatchConfig {
    /// Convert into batch options for `input_dir`.
    pub fn to_options(&self, input_dir: impl Into<PathBuf>) -> BatchOptions {
        BatchOptions {
            input_dir: input_dir.into(),
            output_dir: self.output_dir.clone(),
            pattern: self.pattern.clone(),
            parallel: self.parallel,
            skip_errors: self.skip_errors,
            distribution: self.distribution,
            extension: self.extension.clone(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plaintext,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `rust_asciicast=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Set the level filter.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the format.
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_defaults_to_realtime() {
        let options = PlaybackConfig::default().to_options().unwrap();
        assert_eq!(options, PlaybackOptions::new());
    }

    #[test]
    fn playback_conversion() {
        let config = PlaybackConfig {
            speed: 2.0,
            idle_time_limit: Some(0.5),
            instant: false,
        };
        let options = config.to_options().unwrap();
        assert_eq!(options.speed, PlaybackSpeed::Speed(2.0));
        assert_eq!(options.idle_time_limit, Some(Duration::from_millis(500)));
    }

    #[test]
    fn zero_idle_limit_means_unlimited() {
        let config = PlaybackConfig {
            idle_time_limit: Some(0.0),
            ..PlaybackConfig::default()
        };
        assert_eq!(config.to_options().unwrap().idle_time_limit, None);
    }

    #[test]
    fn instant_wins_over_speed() {
        let config = PlaybackConfig {
            speed: 3.0,
            instant: true,
            ..PlaybackConfig::default()
        };
        assert_eq!(config.to_options().unwrap().speed, PlaybackSpeed::Instant);
    }

    #[test]
    fn bad_playback_values_rejected() {
        let zero = PlaybackConfig {
            speed: 0.0,
            ..PlaybackConfig::default()
        };
        assert!(zero.to_options().is_err());

        let negative_limit = PlaybackConfig {
            idle_time_limit: Some(-1.0),
            ..PlaybackConfig::default()
        };
        assert!(negative_limit.to_options().is_err());
    }

    #[test]
    fn batch_conversion() {
        let config = BatchConfig {
            parallel: Some(2),
            skip_errors: true,
            ..BatchConfig::default()
        };
        let options = config.to_options("/casts");
        assert_eq!(options.input_dir, PathBuf::from("/casts"));
        assert_eq!(options.parallel, Some(2));
        assert!(options.skip_errors);
        assert_eq!(options.extension, DEFAULT_EXTENSION);
    }
}
