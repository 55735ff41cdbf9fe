//! Player state machine.

/// Player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Never played, or finished normally.
    #[default]
    Idle,
    /// Emitting events.
    Playing,
    /// Playing, but suspended until resumed.
    Paused,
    /// Stopped by request.
    Stopped,
}

impl PlayerState {
    /// Whether a new playback may be started from this state.
    #[must_use]
    pub const fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Stopped)
    }

    /// Whether a playback currently owns the player.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }

    /// `Idle|Stopped -> Playing`. Returns whether the transition happened.
    pub(crate) fn start(&mut self) -> bool {
        self.transition(Self::can_start, Self::Playing)
    }

    /// `Playing -> Paused`.
    pub(crate) fn pause(&mut self) -> bool {
        self.transition(|s| s == Self::Playing, Self::Paused)
    }

    /// `Paused -> Playing`.
    pub(crate) fn resume(&mut self) -> bool {
        self.transition(|s| s == Self::Paused, Self::Playing)
    }

    /// `Playing|Paused -> Stopped`.
    pub(crate) fn stop(&mut self) -> bool {
        self.transition(Self::is_active, Self::Stopped)
    }

    /// `Playing|Paused -> Idle`, used when a playback ends on its own.
    pub(crate) fn finish(&mut self) -> bool {
        self.transition(Self::is_active, Self::Idle)
    }

    fn transition(&mut self, allowed: impl FnOnce(Self) -> bool, next: Self) -> bool {
        if allowed(*self) {
            *self = next;
            true
        } else {
            false
        }
    }
}

/// The shared cell behind a player: the visible state plus the id of the
/// playback that owns it.
///
/// A stopped playback may still be unwinding when a new one claims the
/// player. Its checks and its cleanup compare `session` against its own id,
/// so it neither resumes on the new playback's `Playing` nor resets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Slot {
    pub(crate) state: PlayerState,
    pub(crate) session: u64,
}

impl Slot {
    /// Start a new playback, returning its id.
    pub(crate) fn claim(&mut self) -> Option<u64> {
        if !self.state.start() {
            return None;
        }
        self.session = self.session.wrapping_add(1);
        Some(self.session)
    }

    /// State as seen by playback `session`; `None` once it has been replaced.
    pub(crate) const fn state_for(self, session: u64) -> Option<PlayerState> {
        if self.session == session {
            Some(self.state)
        } else {
            None
        }
    }

    /// Return to rest, unless another playback owns the slot by now.
    pub(crate) fn release(&mut self, session: u64) -> bool {
        self.session == session && self.state.finish()
    }
}
