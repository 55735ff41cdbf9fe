//! rust-asciicast: asciicast parsing, playback and batch conversion
//!
//! This crate reads terminal-session recordings in both asciicast
//! generations, replays them with their recorded timing, and converts whole
//! directories of them concurrently.
//!
//! # Features
//!
//! - **Strict parsing** of v1 (single JSON document) and v2 (header line plus
//!   event lines) recordings into one [`ParsedCast`] model
//! - **Streaming v2 reader** for recordings too large to hold as one string
//! - **Async playback** with speed scaling, idle-time clamping and
//!   pause/resume/stop from other tasks
//! - **Batch conversion** with bounded workers and partial-failure accounting
//! - **Recording** by driving an installed `asciinema rec`
//! - **TOML configuration** with `ASCIICAST_*` environment overrides
//! - **Log setup** via `tracing-subscriber` (feature: `logging`)
//!
//! # Example
//!
//! ```ignore
//! use rust_asciicast::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let content = std::fs::read_to_string("demo.cast")?;
//!     let cast = parse(&content)?;
//!     let options = PlaybackOptions::from_header(&cast.header)
//!         .with_speed(PlaybackSpeed::Speed(2.0));
//!     play_to_stdout(&cast, options).await?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cast;
pub mod config;
pub mod error;
pub mod player;
pub mod prelude;
pub mod record;

/// Log subscriber setup.
#[cfg(feature = "logging")]
pub mod logging;

pub use batch::{
    BatchFailure, BatchOptions, BatchProcessor, BatchResult, Converter, Distribution,
    NormalizeConverter,
};
pub use cast::{
    CastEvent, CastFormat, CastHeader, DetectedFormat, EventKind, ParsedCast, V2Reader, detect,
    parse, parse_as, read_v2, to_v2_string, validate, write_v2,
};
pub use config::{AsciicastConfig, BatchConfig, LogFormat, LoggingConfig, PlaybackConfig};
pub use error::{CastError, Result};
pub use record::{RecordOptions, Recorder};
pub use player::{
    CLEAR_SCREEN, PlaybackOptions, PlaybackOutcome, PlaybackReport, PlaybackSpeed, Player,
    PlayerState, Timeline, play_to_stdout,
};
