use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use cubix_core::{CubeOrder, CubeState, Token, parse_algorithm};
use log::{debug, info, trace};
use thiserror::Error;

mod autoplay;

pub use autoplay::{AutoPlay, Speed, UnknownSpeed};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Cannot go to step {step}, the algorithm only has {len} steps")]
    StepOutOfRange { step: usize, len: usize },
}

/// Memoized states taken every `interval` steps. `states[i]` is the cube after
/// the first `(i + 1) * interval` steps.
#[derive(Debug, Clone)]
struct Checkpoints {
    interval: NonZeroUsize,
    states: Vec<CubeState>,
}

impl Checkpoints {
    /// Remember `state` if it was reached by applying exactly `applied` steps
    /// and it is the next checkpoint in line
    fn record(&mut self, applied: usize, state: &CubeState) {
        let interval = self.interval.get();
        if applied % interval == 0 && applied / interval == self.states.len() + 1 {
            trace!(target: "player", "Checkpoint after {applied} steps");
            self.states.push(state.clone());
        }
    }

    /// The latest checkpoint at or below `applied` steps, with its step count
    fn nearest(&self, applied: usize) -> Option<(usize, &CubeState)> {
        let available = (applied / self.interval.get()).min(self.states.len());
        let i = available.checked_sub(1)?;
        Some(((i + 1) * self.interval.get(), &self.states[i]))
    }
}

/// Steps through a parsed algorithm one move at a time.
///
/// The player is either idle, showing the solved cube before any step, or
/// positioned on a step, showing the cube after that step and every step
/// before it.
#[derive(Debug, Clone)]
pub struct Player {
    order: CubeOrder,
    steps: Vec<Token>,
    current: Option<usize>,
    state: CubeState,
    checkpoints: Option<Checkpoints>,
    autoplay: AutoPlay,
}

impl Player {
    #[must_use]
    pub fn new(algorithm: &str, order: CubeOrder) -> Player {
        let steps = parse_algorithm(algorithm);
        info!(target: "player", "Loaded {} steps on a {order} cube", steps.len());

        Player {
            order,
            steps,
            current: None,
            state: CubeState::solved(order),
            checkpoints: None,
            autoplay: AutoPlay::default(),
        }
    }

    /// Memoize the cube every `interval` steps so that going backwards only
    /// replays from the closest checkpoint
    #[must_use]
    pub fn with_checkpoint_interval(mut self, interval: NonZeroUsize) -> Player {
        self.checkpoints = Some(Checkpoints {
            interval,
            states: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Player {
        self.autoplay = AutoPlay::new(interval);
        self
    }

    /// Replace the algorithm and cube order. Playback stops and the player
    /// goes back to idle.
    pub fn load(&mut self, algorithm: &str, order: CubeOrder) {
        let checkpoints = self.checkpoints.as_ref().map(|checkpoints| checkpoints.interval);
        let interval = self.autoplay.interval();

        let mut player = Player::new(algorithm, order).with_interval(interval);
        if let Some(checkpoints) = checkpoints {
            player = player.with_checkpoint_interval(checkpoints);
        }
        *self = player;
    }

    #[must_use]
    pub fn steps(&self) -> &[Token] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn order(&self) -> CubeOrder {
        self.order
    }

    /// The index of the last applied step, `None` when idle
    #[must_use]
    pub fn step_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Token> {
        self.current.map(|k| &self.steps[k])
    }

    #[must_use]
    pub fn state(&self) -> &CubeState {
        &self.state
    }

    /// Whether every step has been applied. An empty algorithm is always
    /// complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.applied() == self.steps.len()
    }

    fn applied(&self) -> usize {
        self.current.map_or(0, |k| k + 1)
    }

    fn advance(&mut self) -> bool {
        let applied = self.applied();
        let Some(token) = self.steps.get(applied) else {
            return false;
        };

        self.state = self.state.apply(token.as_move());
        self.current = Some(applied);
        if let Some(checkpoints) = &mut self.checkpoints {
            checkpoints.record(applied + 1, &self.state);
        }

        debug!(target: "player", "Step {applied}: {token}");
        true
    }

    /// The cube after the first `applied` steps, replayed from the closest
    /// starting point
    fn replay(&mut self, applied: usize) -> CubeState {
        let (start, mut state) = match self
            .checkpoints
            .as_ref()
            .and_then(|checkpoints| checkpoints.nearest(applied))
        {
            Some((start, state)) => (start, state.clone()),
            None => (0, CubeState::solved(self.order)),
        };
        trace!(target: "player", "Replaying steps {start}..{applied}");

        for (i, token) in self.steps[start..applied].iter().enumerate() {
            state = state.apply(token.as_move());
            if let Some(checkpoints) = &mut self.checkpoints {
                checkpoints.record(start + i + 1, &state);
            }
        }

        state
    }

    /// Apply the following step. Returns `false` when already complete.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        let moved = self.advance();
        if moved {
            self.autoplay.interrupt();
        }
        moved
    }

    /// Go back one step by replaying everything before it. Returns `false`
    /// when idle.
    pub fn previous(&mut self) -> bool {
        let Some(k) = self.current else {
            return false;
        };

        self.state = self.replay(k);
        self.current = k.checked_sub(1);
        self.autoplay.interrupt();

        debug!(target: "player", "Back to {:?}", self.current);
        true
    }

    /// Return to the solved cube before the first step and stop playing
    pub fn reset(&mut self) {
        self.current = None;
        self.state = CubeState::solved(self.order);
        self.autoplay.stop();

        debug!(target: "player", "Reset");
    }

    /// Jump to `target`, or to idle for `None`
    ///
    /// # Errors
    ///
    /// If `target` is not the index of a step
    pub fn seek(&mut self, target: Option<usize>) -> Result<(), PlayerError> {
        let applied = match target {
            Some(step) if step >= self.steps.len() => {
                return Err(PlayerError::StepOutOfRange {
                    step,
                    len: self.steps.len(),
                });
            }
            Some(step) => step + 1,
            None => 0,
        };

        if applied >= self.applied() {
            while self.applied() < applied {
                self.advance();
            }
        } else {
            self.state = self.replay(applied);
            self.current = target;
        }
        self.autoplay.interrupt();

        debug!(target: "player", "Seeked to {target:?}");
        Ok(())
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.autoplay.is_playing()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.autoplay.interval()
    }

    /// Start stepping automatically. Returns `false` without scheduling
    /// anything when there is no step left to play.
    pub fn play(&mut self, now: Instant) -> bool {
        if self.is_complete() {
            debug!(target: "autoplay", "Nothing left to play");
            self.autoplay.stop();
            return false;
        }

        info!(target: "autoplay", "Playing every {:?}", self.autoplay.interval());
        self.autoplay.start(now);
        true
    }

    pub fn pause(&mut self) {
        if self.autoplay.is_playing() {
            info!(target: "autoplay", "Paused");
        }
        self.autoplay.stop();
    }

    /// Pause if playing, play otherwise. Returns whether the player is now
    /// playing.
    pub fn toggle_play(&mut self, now: Instant) -> bool {
        if self.is_playing() {
            self.pause();
            false
        } else {
            self.play(now)
        }
    }

    /// Change the time between automatic steps. A pending step is rescheduled
    /// one new interval from `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        debug!(target: "autoplay", "Interval is now {interval:?}");
        self.autoplay.set_interval(interval, now);
    }

    /// Run the automatic step that is due at `now`, if any. Returns the index
    /// of the step that was applied.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        if self.is_complete() {
            if self.autoplay.is_playing() {
                info!(target: "autoplay", "Finished");
                self.autoplay.stop();
            }
            return None;
        }

        if !self.autoplay.fire(now) {
            return None;
        }

        self.advance();
        if self.is_complete() {
            info!(target: "autoplay", "Finished");
            self.autoplay.stop();
        }

        self.current
    }

    /// When `poll` should next be called. `None` while stopped. While a fresh
    /// advance still has to be scheduled this is `now`.
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        if self.autoplay.needs_rearm() {
            Some(now)
        } else {
            self.autoplay.deadline()
        }
    }
}
