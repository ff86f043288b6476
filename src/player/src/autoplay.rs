use std::{
    fmt,
    str::FromStr,
    time::{Duration, Instant},
};

use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The named playback speeds
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Lazy,
    #[default]
    Normal,
    Swift,
    Expert,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown speed {0:?}, expected one of lazy, normal, swift, expert")]
pub struct UnknownSpeed(pub String);

impl Speed {
    pub const ALL: [Self; 4] = [Speed::Lazy, Speed::Normal, Speed::Swift, Speed::Expert];

    /// Time between two automatic steps
    #[must_use]
    pub fn interval(self) -> Duration {
        Duration::from_millis(match self {
            Speed::Lazy => 1000,
            Speed::Normal => 600,
            Speed::Swift => 300,
            Speed::Expert => 150,
        })
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Speed::Lazy => "lazy",
            Speed::Normal => "normal",
            Speed::Swift => "swift",
            Speed::Expert => "expert",
        }
    }
}

impl FromStr for Speed {
    type Err = UnknownSpeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Speed::ALL
            .into_iter()
            .find(|speed| speed.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSpeed(s.to_owned()))
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Timer {
    Stopped,
    /// The single outstanding advance
    Pending(Instant),
    /// Playing, but a manual step discarded the pending advance. The next poll
    /// schedules a fresh one.
    Rearm,
}

/// Schedules automatic steps. At most one advance is ever outstanding and the
/// scheduler never reads the clock itself.
#[derive(Debug, Clone)]
pub struct AutoPlay {
    interval: Duration,
    timer: Timer,
}

impl Default for AutoPlay {
    fn default() -> Self {
        AutoPlay::new(Speed::default().interval())
    }
}

impl AutoPlay {
    #[must_use]
    pub fn new(interval: Duration) -> AutoPlay {
        AutoPlay {
            interval,
            timer: Timer::Stopped,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.timer != Timer::Stopped
    }

    /// When the pending advance is due, if there is one
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match self.timer {
            Timer::Pending(at) => Some(at),
            Timer::Stopped | Timer::Rearm => None,
        }
    }

    /// Whether a poll is needed before `deadline` can be trusted
    #[must_use]
    pub fn needs_rearm(&self) -> bool {
        self.timer == Timer::Rearm
    }

    pub(crate) fn start(&mut self, now: Instant) {
        trace!(target: "autoplay", "Next step in {:?}", self.interval);
        self.timer = Timer::Pending(now + self.interval);
    }

    pub(crate) fn stop(&mut self) {
        self.timer = Timer::Stopped;
    }

    pub(crate) fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        if self.is_playing() {
            self.start(now);
        }
    }

    /// Drop the pending advance without stopping playback
    pub(crate) fn interrupt(&mut self) {
        if self.is_playing() {
            self.timer = Timer::Rearm;
        }
    }

    /// Returns whether an advance is due at `now`. When it is, the following
    /// advance is scheduled one interval later.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.timer {
            Timer::Stopped => false,
            Timer::Rearm => {
                self.start(now);
                false
            }
            Timer::Pending(at) if now >= at => {
                self.start(now);
                true
            }
            Timer::Pending(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(Speed::default(), Speed::Normal);
        assert_eq!(Speed::Lazy.interval(), Duration::from_millis(1000));
        assert_eq!(Speed::Normal.interval(), Duration::from_millis(600));
        assert_eq!(Speed::Swift.interval(), Duration::from_millis(300));
        assert_eq!(Speed::Expert.interval(), Duration::from_millis(150));

        assert_eq!("Swift".parse::<Speed>(), Ok(Speed::Swift));
        assert_eq!(" expert".parse::<Speed>(), Ok(Speed::Expert));
        assert_eq!(
            "ludicrous".parse::<Speed>(),
            Err(UnknownSpeed("ludicrous".to_owned()))
        );
        for speed in Speed::ALL {
            assert_eq!(speed.to_string().parse::<Speed>(), Ok(speed));
        }
    }

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut autoplay = AutoPlay::new(ms(100));

        assert!(!autoplay.fire(t0 + ms(500)));
        assert_eq!(autoplay.deadline(), None);

        autoplay.start(t0);
        assert_eq!(autoplay.deadline(), Some(t0 + ms(100)));
        assert!(!autoplay.fire(t0 + ms(99)));
        assert!(autoplay.fire(t0 + ms(100)));
        assert_eq!(autoplay.deadline(), Some(t0 + ms(200)));

        // A late poll still only yields one advance
        assert!(autoplay.fire(t0 + ms(450)));
        assert!(!autoplay.fire(t0 + ms(450)));
        assert_eq!(autoplay.deadline(), Some(t0 + ms(550)));
    }

    #[test]
    fn interrupt_rearms_on_the_next_poll() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut autoplay = AutoPlay::new(ms(100));

        autoplay.interrupt();
        assert!(!autoplay.is_playing());

        autoplay.start(t0);
        autoplay.interrupt();
        assert!(autoplay.is_playing());
        assert!(autoplay.needs_rearm());
        assert_eq!(autoplay.deadline(), None);

        assert!(!autoplay.fire(t0 + ms(150)));
        assert_eq!(autoplay.deadline(), Some(t0 + ms(250)));

        autoplay.set_interval(ms(20), t0 + ms(160));
        assert_eq!(autoplay.deadline(), Some(t0 + ms(180)));

        autoplay.stop();
        autoplay.set_interval(ms(40), t0);
        assert_eq!(autoplay.deadline(), None);
        assert_eq!(autoplay.interval(), ms(40));
    }
}
