//! Error handling tests.

use std::io;
use std::path::PathBuf;

use rust_asciicast::error::CastError;
use rust_asciicast::{BatchResult, CastFormat};

#[test]
fn parse_error_introspection() {
    let err = CastError::parse_at(CastFormat::V2, 7, "failed to parse event: EOF");
    assert!(err.is_parse());
    assert!(!err.is_invalid_format());
    assert_eq!(err.line(), Some(7));

    let CastError::Parse { format, reason, .. } = err else {
        panic!("expected Parse");
    };
    assert_eq!(format, CastFormat::V2);
    assert!(reason.contains("EOF"));
}

#[test]
fn playback_failed_keeps_source() {
    let err = CastError::playback_failed(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
    assert!(err.to_string().contains("pipe closed"));
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "pipe closed");
}

#[test]
fn discovery_failed_names_directory() {
    let err = CastError::discovery_failed(
        "/recordings",
        io::Error::new(io::ErrorKind::NotFound, "not found"),
    );
    assert!(err.to_string().contains("/recordings"));
}

#[test]
fn conversion_error_display() {
    let err = CastError::conversion("demo.cast", "render failed");
    assert_eq!(err.to_string(), "failed to convert demo.cast: render failed");
}

#[test]
fn batch_aborted_exposes_partial_counts() {
    let partial = BatchResult {
        processed: 10,
        succeeded: 4,
        failed: 1,
        errors: Vec::new(),
    };
    let err = CastError::BatchAborted {
        file: PathBuf::from("bad.cast"),
        message: "line one\nline two".into(),
        partial: Box::new(partial.clone()),
    };
    assert_eq!(err.partial_result(), Some(&partial));
    let msg = err.to_string();
    assert!(msg.contains("line one"));
    assert!(!msg.contains("line two"));
    assert!(msg.contains("4 of 10"));
}

#[test]
fn io_errors_convert() {
    fn fails() -> rust_asciicast::Result<()> {
        Err(io::Error::other("disk on fire"))?;
        Ok(())
    }
    assert!(matches!(fails(), Err(CastError::Io(_))));
}

#[test]
fn json_errors_convert() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = CastError::from(json_err);
    assert!(err.to_string().starts_with("JSON error"));
}
