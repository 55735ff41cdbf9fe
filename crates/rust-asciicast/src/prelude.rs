//! Convenient re-exports for common rust-asciicast usage.
//!
//! ```ignore
//! use rust_asciicast::prelude::*;
//! ```

// Error handling
pub use crate::error::{CastError, Result};

// Parsing
pub use crate::cast::{
    CastEvent, CastFormat, CastHeader, DetectedFormat, EventKind, ParsedCast, detect, parse,
    read_v2, to_v2_string, validate,
};

// Playback
pub use crate::player::{
    PlaybackOptions, PlaybackOutcome, PlaybackSpeed, Player, PlayerState, play_to_stdout,
};

// Batch conversion
pub use crate::batch::{
    BatchOptions, BatchProcessor, BatchResult, Converter, Distribution, NormalizeConverter,
};

// Recording
pub use crate::record::{RecordOptions, Recorder};

// Configuration
pub use crate::config::AsciicastConfig;
