//! Playback options.

use std::time::Duration;

use crate::cast::CastHeader;
use crate::error::{CastError, Result};

/// Playback speed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlaybackSpeed {
    /// Recorded timing.
    #[default]
    Realtime,
    /// Divide every recorded gap by this factor; larger is faster.
    Speed(f64),
    /// No waiting at all.
    Instant,
}

impl PlaybackSpeed {
    /// Build a speed from a plain factor, treating 1 as realtime.
    #[must_use]
    pub fn factor(factor: f64) -> Self {
        if (factor - 1.0).abs() < f64::EPSILON {
            Self::Realtime
        } else {
            Self::Speed(factor)
        }
    }

    /// Scale a recorded gap in seconds.
    #[must_use]
    pub fn scale(self, secs: f64) -> f64 {
        match self {
            Self::Realtime => secs,
            Self::Speed(factor) => secs / factor,
            Self::Instant => 0.0,
        }
    }
}

/// Playback options.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackOptions {
    /// Playback speed.
    pub speed: PlaybackSpeed,
    /// Ceiling on any single wait between events.
    pub idle_time_limit: Option<Duration>,
}

impl PlaybackOptions {
    /// Create default options: realtime, no idle limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed options from a cast header's recorded idle time limit.
    #[must_use]
    pub fn from_header(header: &CastHeader) -> Self {
        Self {
            idle_time_limit: header.idle_limit(),
            ..Self::default()
        }
    }

    /// Set playback speed.
    #[must_use]
    pub const fn with_speed(mut self, speed: PlaybackSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Set the idle time limit.
    #[must_use]
    pub const fn with_idle_time_limit(mut self, limit: Duration) -> Self {
        self.idle_time_limit = Some(limit);
        self
    }

    /// Reject speeds that cannot scale a delay.
    pub fn validate(&self) -> Result<()> {
        if let PlaybackSpeed::Speed(factor) = self.speed {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(CastError::config(format!(
                    "playback speed must be a positive number, got {factor}"
                )));
            }
        }
        Ok(())
    }

    /// Wait between two events recorded at `from` and `to` seconds.
    ///
    /// Negative gaps (out-of-order timestamps) wait for nothing.
    #[must_use]
    pub fn delay_between(&self, from: f64, to: f64) -> Duration {
        let gap = to - from;
        if gap.is_nan() || gap <= 0.0 {
            return Duration::ZERO;
        }
        let delay = Duration::try_from_secs_f64(self.speed.scale(gap)).unwrap_or(Duration::MAX);
        match self.idle_time_limit {
            Some(limit) => delay.min(limit),
            None => delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realtime_delay() {
        let opts = PlaybackOptions::new();
        assert_eq!(opts.delay_between(0.0, 2.0), Duration::from_secs(2));
    }

    #[test]
    fn speed_divides_delay() {
        let opts = PlaybackOptions::new().with_speed(PlaybackSpeed::Speed(2.0));
        assert_eq!(opts.delay_between(0.0, 2.0), Duration::from_secs(1));
    }

    #[test]
    fn idle_limit_caps_delay() {
        let opts = PlaybackOptions::new().with_idle_time_limit(Duration::from_millis(500));
        assert_eq!(opts.delay_between(1.0, 11.0), Duration::from_millis(500));
        assert_eq!(opts.delay_between(1.0, 1.25), Duration::from_millis(250));
    }

    #[test]
    fn negative_gap_is_zero() {
        let opts = PlaybackOptions::new();
        assert_eq!(opts.delay_between(5.0, 1.0), Duration::ZERO);
        assert_eq!(opts.delay_between(f64::NAN, 1.0), Duration::ZERO);
    }

    #[test]
    fn instant_never_waits() {
        let opts = PlaybackOptions::new().with_speed(PlaybackSpeed::Instant);
        assert_eq!(opts.delay_between(0.0, 100.0), Duration::ZERO);
    }

    #[test]
    fn invalid_speed_rejected() {
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let opts = PlaybackOptions::new().with_speed(PlaybackSpeed::Speed(factor));
            assert!(opts.validate().is_err(), "{factor}");
        }
        assert!(PlaybackOptions::new().validate().is_ok());
    }

    #[test]
    fn factor_one_is_realtime() {
        assert_eq!(PlaybackSpeed::factor(1.0), PlaybackSpeed::Realtime);
        assert_eq!(PlaybackSpeed::factor(3.0), PlaybackSpeed::Speed(3.0));
    }

    #[test]
    fn options_from_header() {
        let header = CastHeader::new(80, 24).with_idle_time_limit(1.5);
        let opts = PlaybackOptions::from_header(&header);
        assert_eq!(opts.idle_time_limit, Some(Duration::from_millis(1500)));
    }
}
