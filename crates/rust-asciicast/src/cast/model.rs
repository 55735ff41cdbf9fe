//! Generation-independent cast data model.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Default terminal width when a header omits it.
pub const DEFAULT_WIDTH: u16 = 80;

/// Default terminal height when a header omits it.
pub const DEFAULT_HEIGHT: u16 = 24;

/// On-disk generation of a parsed cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastFormat {
    /// Asciicast v1: a single JSON array.
    V1,
    /// Asciicast v2: newline-delimited JSON records.
    V2,
}

impl CastFormat {
    /// The header `version` number of this generation.
    #[must_use]
    pub const fn version(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

impl fmt::Display for CastFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::V2 => f.write_str("v2"),
        }
    }
}

/// Kind of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Output written by the recorded program.
    Output,
    /// Input sent to the recorded program.
    Input,
}

impl EventKind {
    /// Map an on-disk type tag to a kind.
    ///
    /// Only `"o"` is output; every other tag, including resize and marker
    /// tags, is classified as input.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("o") => Self::Output,
            _ => Self::Input,
        }
    }

    /// The on-disk tag written for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Output => "o",
            Self::Input => "i",
        }
    }
}

/// Cast header metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CastHeader {
    /// Format version (1 or 2).
    pub version: u8,
    /// Terminal width in cells.
    pub width: u16,
    /// Terminal height in cells.
    pub height: u16,
    /// Recording start, seconds since the Unix epoch.
    pub timestamp: Option<u64>,
    /// Total duration in seconds.
    pub duration: Option<f64>,
    /// Idle time limit the recording was made with, in seconds.
    pub idle_time_limit: Option<f64>,
    /// Recorded command.
    pub command: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Captured environment (v2 only).
    pub env: HashMap<String, String>,
}

impl Default for CastHeader {
    fn default() -> Self {
        Self {
            version: 2,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            timestamp: None,
            duration: None,
            idle_time_limit: None,
            command: None,
            title: None,
            env: HashMap::new(),
        }
    }
}

impl CastHeader {
    /// Create a v2 header with the given dimensions.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the command.
    #[must_use]
    pub fn with_command(mut self, cmd: impl Into<String>) -> Self {
        self.command = Some(cmd.into());
        self
    }

    /// Set the idle time limit in seconds.
    #[must_use]
    pub const fn with_idle_time_limit(mut self, secs: f64) -> Self {
        self.idle_time_limit = Some(secs);
        self
    }

    /// Idle time limit as a duration, when set to a usable value.
    #[must_use]
    pub fn idle_limit(&self) -> Option<Duration> {
        self.idle_time_limit
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(Duration::from_secs_f64)
    }
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq)]
pub struct CastEvent {
    /// Seconds since the start of the recording.
    pub time: f64,
    /// Event kind.
    pub kind: EventKind,
    /// Text emitted or sent.
    pub data: String,
}

impl CastEvent {
    /// Create an output event.
    #[must_use]
    pub fn output(time: f64, data: impl Into<String>) -> Self {
        Self {
            time,
            kind: EventKind::Output,
            data: data.into(),
        }
    }

    /// Create an input event.
    #[must_use]
    pub fn input(time: f64, data: impl Into<String>) -> Self {
        Self {
            time,
            kind: EventKind::Input,
            data: data.into(),
        }
    }

    /// Whether this event is replayed to a terminal.
    #[must_use]
    pub fn is_output(&self) -> bool {
        self.kind == EventKind::Output
    }
}

/// A validated cast: one header and its events in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCast {
    /// Header metadata.
    pub header: CastHeader,
    /// Events, in the order they appeared in the source.
    pub events: Vec<CastEvent>,
    /// Generation the cast was parsed from.
    pub format: CastFormat,
}

impl ParsedCast {
    /// Create a cast from parts.
    #[must_use]
    pub const fn new(header: CastHeader, events: Vec<CastEvent>, format: CastFormat) -> Self {
        Self {
            header,
            events,
            format,
        }
    }

    /// Length of the recording.
    ///
    /// Uses the last event's time, falling back to the header's duration
    /// for casts without events.
    #[must_use]
    pub fn duration(&self) -> Duration {
        let secs = self
            .events
            .last()
            .map(|e| e.time)
            .or(self.header.duration)
            .unwrap_or(0.0);
        if secs > 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    /// All output concatenated.
    #[must_use]
    pub fn output_text(&self) -> String {
        self.text_of(EventKind::Output)
    }

    /// All input concatenated.
    #[must_use]
    pub fn input_text(&self) -> String {
        self.text_of(EventKind::Input)
    }

    /// Events of one kind.
    #[must_use]
    pub fn events_of(&self, kind: EventKind) -> Vec<&CastEvent> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }

    fn text_of(&self, kind: EventKind) -> String {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.data.as_str())
            .collect()
    }
}
