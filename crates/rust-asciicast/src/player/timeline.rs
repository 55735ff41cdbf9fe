//! Playback schedule for a cast.

use std::time::Duration;

use super::options::PlaybackOptions;
use crate::cast::{CastEvent, ParsedCast};

/// One scheduled event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    /// Position of the event in the cast.
    pub index: usize,
    /// The event.
    pub event: &'a CastEvent,
    /// Wait before emitting the event; zero for the first one.
    pub delay: Duration,
}

/// Cursor over a cast's events yielding each with its scaled delay.
///
/// Input events are yielded too: they are not replayed, but their
/// timestamps still shape the gaps around them.
#[derive(Debug, Clone)]
pub struct Timeline<'a> {
    events: &'a [CastEvent],
    index: usize,
    options: PlaybackOptions,
}

impl<'a> Timeline<'a> {
    /// Create a timeline over `cast`.
    #[must_use]
    pub fn new(cast: &'a ParsedCast, options: PlaybackOptions) -> Self {
        Self::from_events(&cast.events, options)
    }

    /// Create a timeline over a slice of events.
    #[must_use]
    pub const fn from_events(events: &'a [CastEvent], options: PlaybackOptions) -> Self {
        Self {
            events,
            index: 0,
            options,
        }
    }

    /// Index of the next event to be yielded.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.index
    }

    /// Total number of events.
    #[must_use]
    pub const fn total_events(&self) -> usize {
        self.events.len()
    }

    /// Skip ahead (or back) to an event.
    pub fn seek(&mut self, index: usize) {
        self.index = index.min(self.events.len());
    }

    /// Wait before the next event.
    #[must_use]
    pub fn delay_to_next(&self) -> Duration {
        match (self.index.checked_sub(1), self.events.get(self.index)) {
            (Some(prev), Some(next)) => self
                .options
                .delay_between(self.events[prev].time, next.time),
            _ => Duration::ZERO,
        }
    }

    /// Sum of all remaining waits.
    #[must_use]
    pub fn remaining_duration(&self) -> Duration {
        self.clone()
            .map(|frame| frame.delay)
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl<'a> Iterator for Timeline<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let events = self.events;
        let event = events.get(self.index)?;
        let frame = Frame {
            index: self.index,
            event,
            delay: self.delay_to_next(),
        };
        self.index += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.events.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Timeline<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::{CastFormat, CastHeader};
    use crate::player::options::PlaybackSpeed;

    fn cast() -> ParsedCast {
        ParsedCast::new(
            CastHeader::new(80, 24),
            vec![
                CastEvent::output(0.0, "a"),
                CastEvent::input(1.0, "b"),
                CastEvent::output(4.0, "c"),
            ],
            CastFormat::V2,
        )
    }

    #[test]
    fn first_frame_has_no_delay() {
        let cast = cast();
        let delays: Vec<_> = Timeline::new(&cast, PlaybackOptions::new())
            .map(|f| f.delay)
            .collect();
        assert_eq!(
            delays,
            vec![Duration::ZERO, Duration::from_secs(1), Duration::from_secs(3)]
        );
    }

    #[test]
    fn remaining_duration_applies_options() {
        let cast = cast();
        let opts = PlaybackOptions::new()
            .with_speed(PlaybackSpeed::Speed(2.0))
            .with_idle_time_limit(Duration::from_secs(1));
        let timeline = Timeline::new(&cast, opts);
        // 0.5s, then min(1.5s, 1s)
        assert_eq!(timeline.remaining_duration(), Duration::from_millis(1500));
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn seek_moves_cursor() {
        let cast = cast();
        let mut timeline = Timeline::new(&cast, PlaybackOptions::new());
        timeline.seek(2);
        assert_eq!(timeline.delay_to_next(), Duration::from_secs(3));
        let frame = timeline.next().unwrap();
        assert_eq!(frame.index, 2);
        assert!(timeline.next().is_none());
        timeline.seek(99);
        assert_eq!(timeline.position(), 3);
    }
}
