//! File-based configuration loading.

use std::path::{Path, PathBuf};

use super::AsciicastConfig;
use crate::error::{CastError, Result};

/// File name searched for by [`find`].
pub const CONFIG_FILE_NAME: &str = "asciicast.toml";

/// Parse a TOML document.
///
/// Missing sections and keys take their defaults; unknown keys are errors.
pub fn parse_toml(content: &str) -> Result<AsciicastConfig> {
    toml::from_str(content).map_err(|e| CastError::config(e.to_string()))
}

/// Read and parse a TOML file.
pub fn load(path: impl AsRef<Path>) -> Result<AsciicastConfig> {
    let path = path.as_ref();
    let content = CastError::with_io_context(
        std::fs::read_to_string(path),
        format!("reading config file {}", path.display()),
    )?;
    parse_toml(&content).map_err(|e| match e {
        CastError::Config { message } => {
            CastError::config(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

/// Serialize a configuration back to TOML.
pub fn to_toml(config: &AsciicastConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| CastError::config(e.to_string()))
}

/// Look for [`CONFIG_FILE_NAME`] in each directory, in order.
#[must_use]
pub fn find<P: AsRef<Path>>(dirs: &[P]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.as_ref().join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Distribution;
    use crate::config::LogFormat;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_toml("").unwrap(), AsciicastConfig::default());
    }

    #[test]
    fn partial_sections() {
        let config = parse_toml(
            r#"
            [batch]
            parallel = 8
            distribution = "chunked"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.batch.parallel, Some(8));
        assert_eq!(config.batch.distribution, Distribution::Chunked);
        assert!(!config.batch.skip_errors);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert!((config.playback.speed - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_key_is_error() {
        let err = parse_toml("[playback]\nsped = 2.0\n").unwrap_err();
        assert!(matches!(err, CastError::Config { .. }));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = AsciicastConfig::default();
        config.playback.idle_time_limit = Some(2.5);
        config.batch.pattern = Some("**/*.cast".into());
        let text = to_toml(&config).unwrap();
        assert_eq!(parse_toml(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_has_context() {
        let err = load("/no/such/asciicast.toml").unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}
