//! Time-accurate playback of parsed casts.
//!
//! [`Timeline`] turns a cast and [`PlaybackOptions`] into a schedule of
//! delays; [`Player`] walks that schedule against an output sink while
//! honoring pause, resume and stop requests from other tasks.

pub mod engine;
pub mod options;
pub mod state;
pub mod timeline;

pub use engine::{CLEAR_SCREEN, PlaybackOutcome, PlaybackReport, Player, play_to_stdout};
pub use options::{PlaybackOptions, PlaybackSpeed};
pub use state::PlayerState;
pub use timeline::{Frame, Timeline};
