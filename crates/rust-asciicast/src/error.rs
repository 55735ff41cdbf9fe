//! Error types for rust-asciicast.
//!
//! Every failure the crate can report is one variant of [`CastError`], and
//! each variant carries exactly the context a caller needs to act on it: the
//! offending line for parse errors, the directory for discovery errors, the
//! accumulated counts for an aborted batch.

use std::path::PathBuf;

use thiserror::Error;

use crate::batch::BatchResult;
use crate::cast::CastFormat;

/// Maximum length of a failure reason shown in a batch abort message.
const MAX_REASON_DISPLAY: usize = 200;

/// Shorten a reason string for display, keeping it on one line.
fn format_reason(reason: &str) -> String {
    let first_line = reason.lines().next().unwrap_or_default();
    if first_line.chars().count() <= MAX_REASON_DISPLAY {
        return first_line.to_string();
    }
    let truncated: String = first_line.chars().take(MAX_REASON_DISPLAY).collect();
    format!("{truncated}...")
}

/// Format a parse failure, naming the line when one is known.
fn format_parse_error(format: CastFormat, line: Option<usize>, reason: &str) -> String {
    match line {
        Some(line) => format!("failed to parse {format} cast at line {line}: {reason}"),
        None => format!("failed to parse {format} cast: {reason}"),
    }
}

/// Format a strict-mode batch abort with the counts reached so far.
fn format_batch_aborted(file: &std::path::Path, message: &str, partial: &BatchResult) -> String {
    format!(
        "batch aborted on {}: {}\n\
         \n\
         Progress: {} of {} files converted, {} failed\n\
         \n\
         Tip: set skip_errors to keep converting after a failure.",
        file.display(),
        format_reason(message),
        partial.succeeded,
        partial.processed,
        partial.failed,
    )
}

/// Format a failed recording, with the exit code when the tool reported one.
fn format_recording_failed(status: Option<i32>, message: &str) -> String {
    match status {
        Some(code) => format!("recording failed (exit code {code}): {}", format_reason(message)),
        None => format!("recording failed: {}", format_reason(message)),
    }
}

/// The main error type for rust-asciicast operations.
#[derive(Debug, Error)]
pub enum CastError {
    /// The input resembles neither asciicast generation.
    #[error("unknown or invalid cast file format")]
    InvalidFormat,

    /// The input matched a generation's envelope but broke its rules.
    #[error("{}", format_parse_error(*format, *line, reason))]
    Parse {
        /// Generation the input was detected as.
        format: CastFormat,
        /// 1-based line number of the offending record, when known.
        line: Option<usize>,
        /// What was wrong.
        reason: String,
    },

    /// `play` was called on a player that is already playing.
    #[error("player is already playing")]
    AlreadyPlaying,

    /// The output sink failed during playback.
    #[error("playback failed: {source}")]
    PlaybackFailed {
        /// The sink's error.
        #[source]
        source: std::io::Error,
    },

    /// The batch input directory could not be enumerated.
    #[error("failed to discover cast files in {}: {source}", path.display())]
    DiscoveryFailed {
        /// The directory being enumerated.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A per-file conversion failed.
    #[error("failed to convert {}: {message}", file.display())]
    Conversion {
        /// The file being converted.
        file: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A batch run in strict mode stopped at its first failure.
    #[error("{}", format_batch_aborted(file, message, partial))]
    BatchAborted {
        /// The first file that failed.
        file: PathBuf,
        /// Why it failed.
        message: String,
        /// Everything accumulated by all workers up to the abort.
        partial: Box<BatchResult>,
    },

    /// The `asciinema` program could not be run.
    #[error(
        "{program} is not installed or could not be run\n\n\
         Tip: see https://asciinema.org/docs/installation"
    )]
    NotInstalled {
        /// The program that was looked up.
        program: String,
    },

    /// `asciinema rec` failed or left no readable recording.
    #[error("{}", format_recording_failed(*status, message))]
    RecordingFailed {
        /// Exit code, when the process exited with one.
        status: Option<i32>,
        /// The tool's diagnostic output or the read failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    IoWithContext {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Result type alias for rust-asciicast operations.
pub type Result<T> = std::result::Result<T, CastError>;

impl CastError {
    /// Create a parse error without a line number.
    pub fn parse(format: CastFormat, reason: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line: None,
            reason: reason.into(),
        }
    }

    /// Create a parse error for a specific 1-based line.
    pub fn parse_at(format: CastFormat, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line: Some(line),
            reason: reason.into(),
        }
    }

    /// Create a playback failure wrapping a sink error.
    #[must_use]
    pub const fn playback_failed(source: std::io::Error) -> Self {
        Self::PlaybackFailed { source }
    }

    /// Create a discovery failure.
    pub fn discovery_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DiscoveryFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a conversion failure for a file.
    pub fn conversion(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Conversion {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a missing-recorder error.
    pub fn not_installed(program: impl Into<String>) -> Self {
        Self::NotInstalled {
            program: program.into(),
        }
    }

    /// Create a recording failure.
    pub fn recording_failed(status: Option<i32>, message: impl Into<String>) -> Self {
        Self::RecordingFailed {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoWithContext {
            context: context.into(),
            source,
        }
    }

    /// Wrap an I/O result with context.
    pub fn with_io_context<T>(result: std::io::Result<T>, context: impl Into<String>) -> Result<T> {
        result.map_err(|e| Self::io_context(context, e))
    }

    /// Check if this is an unknown-format error.
    #[must_use]
    pub const fn is_invalid_format(&self) -> bool {
        matches!(self, Self::InvalidFormat)
    }

    /// Check if this is a structural parse error.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if this error came from a busy player.
    #[must_use]
    pub const fn is_already_playing(&self) -> bool {
        matches!(self, Self::AlreadyPlaying)
    }

    /// Check if the recorder program is missing.
    #[must_use]
    pub const fn is_not_installed(&self) -> bool {
        matches!(self, Self::NotInstalled { .. })
    }

    /// Line number attached to a parse error.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => *line,
            _ => None,
        }
    }

    /// Counts accumulated before a strict batch run aborted.
    #[must_use]
    pub fn partial_result(&self) -> Option<&BatchResult> {
        match self {
            Self::BatchAborted { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_line() {
        let err = CastError::parse_at(CastFormat::V2, 2, "expected value at line 1 column 5");
        let msg = err.to_string();
        assert!(msg.contains("v2"));
        assert!(msg.contains("line 2"));
        assert_eq!(err.line(), Some(2));
        assert!(err.is_parse());
    }

    #[test]
    fn parse_error_without_line() {
        let err = CastError::parse(CastFormat::V1, "expected array with at least 2 elements");
        assert_eq!(
            err.to_string(),
            "failed to parse v1 cast: expected array with at least 2 elements"
        );
        assert_eq!(err.line(), None);
    }

    #[test]
    fn batch_aborted_shows_progress() {
        let partial = BatchResult {
            processed: 5,
            succeeded: 2,
            failed: 1,
            errors: Vec::new(),
        };
        let err = CastError::BatchAborted {
            file: PathBuf::from("/casts/bad.cast"),
            message: "boom".into(),
            partial: Box::new(partial),
        };
        let msg = err.to_string();
        assert!(msg.contains("bad.cast"));
        assert!(msg.contains("2 of 5"));
        assert!(msg.contains("Tip:"));
        assert_eq!(err.partial_result().map(|r| r.failed), Some(1));
    }

    #[test]
    fn format_reason_truncates_long_lines() {
        let long = "x".repeat(500);
        let shown = format_reason(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), MAX_REASON_DISPLAY + 3);
    }

    #[test]
    fn format_reason_keeps_first_line() {
        assert_eq!(format_reason("first\nsecond"), "first");
        assert_eq!(format_reason(""), "");
    }

    #[test]
    fn io_with_context_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CastError::io_context("reading cast file", io_err);
        let msg = err.to_string();
        assert!(msg.contains("reading cast file"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn with_io_context_success() {
        let result: std::io::Result<i32> = Ok(42);
        let value = CastError::with_io_context(result, "some operation").unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn recording_errors() {
        let err = CastError::not_installed("asciinema");
        assert!(err.is_not_installed());
        assert!(err.to_string().starts_with("asciinema is not installed"));
        assert!(err.to_string().contains("Tip:"));

        let err = CastError::recording_failed(Some(3), "device busy\nmore detail");
        assert_eq!(err.to_string(), "recording failed (exit code 3): device busy");
        assert!(!err.is_not_installed());

        let err = CastError::recording_failed(None, "killed");
        assert_eq!(err.to_string(), "recording failed: killed");
    }

    #[test]
    fn predicates() {
        assert!(CastError::InvalidFormat.is_invalid_format());
        assert!(CastError::AlreadyPlaying.is_already_playing());
        assert!(!CastError::config("x").is_parse());
        assert!(CastError::config("x").partial_result().is_none());
    }
}
