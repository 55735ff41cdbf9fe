//! Asynchronous playback engine.
//!
//! A [`Player`] owns a single state cell. `play` claims it with an atomic
//! compare-and-swap and tags it with a fresh session id, so concurrent calls
//! on one player cannot both run, and a stopped playback that has not yet
//! returned can never act on its successor. Waits race a timer against
//! state-change notifications, which lets `pause` and `stop` take effect in
//! the middle of a long gap.

use std::io::Write;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::options::PlaybackOptions;
use super::state::{PlayerState, Slot};
use super::timeline::Timeline;
use crate::cast::ParsedCast;
use crate::error::{CastError, Result};

/// Clear the screen and home the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every event was played.
    Completed,
    /// `stop` was called before the end.
    Stopped,
}

/// Summary of a finished playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    /// How the playback ended.
    pub outcome: PlaybackOutcome,
    /// Output events written to the sink.
    pub events_written: usize,
}

/// Result of waiting on the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// A cast player with pause/resume/stop control.
///
/// Share it behind an `Arc` to control a playback from another task.
#[derive(Debug)]
pub struct Player {
    slot: watch::Sender<Slot>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Create an idle player.
    #[must_use]
    pub fn new() -> Self {
        let (slot, _) = watch::channel(Slot::default());
        Self { slot }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.slot.borrow().state
    }

    /// Whether a playback is in progress, paused or not.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state().is_active()
    }

    /// Suspend playback. No-op unless playing.
    pub fn pause(&self) -> bool {
        let changed = self.slot.send_if_modified(|slot| slot.state.pause());
        if changed {
            debug!("playback paused");
        }
        changed
    }

    /// Continue a paused playback. No-op unless paused.
    pub fn resume(&self) -> bool {
        let changed = self.slot.send_if_modified(|slot| slot.state.resume());
        if changed {
            debug!("playback resumed");
        }
        changed
    }

    /// Abort playback. Idempotent; `play` returns normally.
    pub fn stop(&self) -> bool {
        let changed = self.slot.send_if_modified(|slot| slot.state.stop());
        if changed {
            debug!("playback stop requested");
        }
        changed
    }

    /// Play `cast` to `sink`, reproducing its timing.
    ///
    /// The sink first receives [`CLEAR_SCREEN`], then the data of every
    /// output event in order. Input events are not written.
    ///
    /// Fails with [`CastError::AlreadyPlaying`] when another playback owns
    /// this player and with [`CastError::PlaybackFailed`] when the sink
    /// errors. Whatever the outcome, the player is back at rest when this
    /// returns or when the future is dropped.
    pub async fn play<W>(
        &self,
        cast: &ParsedCast,
        options: &PlaybackOptions,
        sink: &mut W,
    ) -> Result<PlaybackReport>
    where
        W: Write + ?Sized,
    {
        options.validate()?;
        let mut claimed = None;
        self.slot.send_if_modified(|slot| {
            claimed = slot.claim();
            claimed.is_some()
        });
        let Some(id) = claimed else {
            return Err(CastError::AlreadyPlaying);
        };
        let _session = Session {
            slot: &self.slot,
            id,
        };
        let mut control = Control {
            receiver: self.slot.subscribe(),
            session: id,
        };

        debug!(
            session = id,
            events = cast.events.len(),
            speed = ?options.speed,
            idle_time_limit = ?options.idle_time_limit,
            "playback started"
        );

        let result = run(cast, *options, sink, &mut control).await;
        match &result {
            Ok(report) => debug!(
                outcome = ?report.outcome,
                events_written = report.events_written,
                "playback finished"
            ),
            Err(e) => debug!(error = %e, "playback failed"),
        }
        result
    }
}

/// Claimed playback slot; returns the player to rest when dropped.
struct Session<'a> {
    slot: &'a watch::Sender<Slot>,
    id: u64,
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.slot.send_if_modified(|slot| slot.release(self.id));
    }
}

/// One playback's view of the control channel.
struct Control {
    receiver: watch::Receiver<Slot>,
    session: u64,
}

impl Control {
    /// Latest state for this playback, marking it seen.
    fn current(&mut self) -> Option<PlayerState> {
        self.receiver.borrow_and_update().state_for(self.session)
    }
}

async fn run<W>(
    cast: &ParsedCast,
    options: PlaybackOptions,
    sink: &mut W,
    control: &mut Control,
) -> Result<PlaybackReport>
where
    W: Write + ?Sized,
{
    let stopped = |events_written| PlaybackReport {
        outcome: PlaybackOutcome::Stopped,
        events_written,
    };

    emit(sink, CLEAR_SCREEN)?;

    let mut events_written = 0;
    for frame in Timeline::new(cast, options) {
        if !frame.delay.is_zero() && wait(control, frame.delay).await == Flow::Stop {
            return Ok(stopped(events_written));
        }
        if gate(control).await == Flow::Stop {
            return Ok(stopped(events_written));
        }
        if frame.event.is_output() {
            emit(sink, &frame.event.data)?;
            events_written += 1;
            trace!(index = frame.index, time = frame.event.time, "event written");
        }
    }

    Ok(PlaybackReport {
        outcome: PlaybackOutcome::Completed,
        events_written,
    })
}

fn emit<W: Write + ?Sized>(sink: &mut W, data: &str) -> Result<()> {
    sink.write_all(data.as_bytes())
        .and_then(|()| sink.flush())
        .map_err(CastError::playback_failed)
}

/// Block while paused; report whether playback should go on.
async fn gate(control: &mut Control) -> Flow {
    loop {
        match control.current() {
            Some(PlayerState::Playing) => return Flow::Continue,
            Some(PlayerState::Paused) => {
                if control.receiver.changed().await.is_err() {
                    return Flow::Stop;
                }
            }
            Some(PlayerState::Idle | PlayerState::Stopped) | None => return Flow::Stop,
        }
    }
}

/// Sleep for `delay` of playing time.
///
/// Time spent paused does not count toward the delay.
async fn wait(control: &mut Control, delay: Duration) -> Flow {
    let mut remaining = delay;
    loop {
        if gate(control).await == Flow::Stop {
            return Flow::Stop;
        }
        let started = Instant::now();
        tokio::select! {
            () = tokio::time::sleep(remaining) => return Flow::Continue,
            changed = control.receiver.changed() => {
                if changed.is_err() {
                    return Flow::Stop;
                }
                remaining = remaining.saturating_sub(started.elapsed());
            }
        }
    }
}

/// Play `cast` to standard output with a fresh player.
pub async fn play_to_stdout(
    cast: &ParsedCast,
    options: PlaybackOptions,
) -> Result<PlaybackReport> {
    let player = Player::new();
    let mut stdout = std::io::stdout();
    player.play(cast, &options, &mut stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::{CastEvent, CastFormat, CastHeader};
    use crate::player::PlaybackSpeed;

    fn cast(events: Vec<CastEvent>) -> ParsedCast {
        ParsedCast::new(CastHeader::new(80, 24), events, CastFormat::V2)
    }

    #[tokio::test(start_paused = true)]
    async fn writes_clear_then_output_only() {
        let cast = cast(vec![
            CastEvent::output(0.0, "a"),
            CastEvent::input(0.1, "ignored"),
            CastEvent::output(0.2, "b"),
        ]);
        let player = Player::new();
        let mut out = Vec::new();

        let report = player.play(&cast, &PlaybackOptions::new(), &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), format!("{CLEAR_SCREEN}ab"));
        assert_eq!(report.outcome, PlaybackOutcome::Completed);
        assert_eq!(report.events_written, 2);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_speed_does_not_claim() {
        let player = Player::new();
        let opts = PlaybackOptions::new().with_speed(PlaybackSpeed::Speed(0.0));
        let err = player
            .play(&cast(vec![]), &opts, &mut Vec::<u8>::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CastError::Config { .. }));
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn sink_error_is_wrapped_and_state_restored() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let player = Player::new();
        let err = player
            .play(&cast(vec![CastEvent::output(0.0, "x")]), &PlaybackOptions::new(), &mut Broken)
            .await
            .unwrap_err();
        assert!(matches!(err, CastError::PlaybackFailed { .. }));
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn controls_are_noops_when_idle() {
        let player = Player::new();
        assert!(!player.pause());
        assert!(!player.resume());
        assert!(!player.stop());
        assert_eq!(player.state(), PlayerState::Idle);
    }
}
