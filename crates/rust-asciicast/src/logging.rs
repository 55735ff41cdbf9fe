//! Log subscriber setup.
//!
//! The library only emits `tracing` events; applications that want them on
//! stderr call [`init`] once at startup. `RUST_LOG`, when set, takes
//! precedence over the configured level.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{CastError, Result};

/// Install a global subscriber writing to stderr.
///
/// Fails with [`CastError::Config`] when the level does not parse or a
/// global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    init_with_writer(config, std::io::stderr)
}

/// Install a global subscriber writing to `writer`.
pub fn init_with_writer<W>(config: &LoggingConfig, writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer).json())
            .try_init(),
        LogFormat::Plaintext => registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer).with_target(true))
            .try_init(),
    };
    installed.map_err(|e| CastError::config(format!("failed to install log subscriber: {e}")))
}

/// Build the level filter, preferring `RUST_LOG`.
fn filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| CastError::config(format!("invalid log level {:?}: {e}", config.level)))
}

/// A subscriber for tests, not installed globally.
///
/// Use it with [`tracing::subscriber::with_default`].
pub fn test_subscriber(config: &LoggingConfig) -> Result<impl tracing::Subscriber + Send + Sync> {
    Ok(Registry::default()
        .with(EnvFilter::try_new(&config.level).map_err(|e| CastError::config(e.to_string()))?)
        .with(tracing_subscriber::fmt::layer().with_test_writer()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_rejected() {
        let config = LoggingConfig::default().with_level("rust_asciicast=verbose");
        assert!(test_subscriber(&config).is_err());
    }

    #[test]
    fn test_subscriber_captures_events() {
        let subscriber = test_subscriber(&LoggingConfig::default().with_level("debug")).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("inside test subscriber");
        });
    }
}
