//! Rate-limited, ping-pong advancement of the playback position.

use pulse_core::{Duration, PlayerConfig, Timestamp};

use crate::position::{Direction, PlaybackPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    /// Terminal: there is no pause or stop.
    Running,
}

/// State to render for an accepted tick (taken before advancing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickFrame {
    pub position: PlaybackPosition,
    pub direction: Direction,
}

/// Turns display-refresh callbacks into fixed-rate position updates.
///
/// Ticks closer together than the minimum interval are dropped, never
/// queued, so motion speed does not depend on the display's refresh rate
/// and a stalled tab does not replay missed updates.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: SchedulerState,
    position: PlaybackPosition,
    direction: Direction,
    step: f64,
    min_interval: Duration,
    last_tick: Option<Timestamp>,
}

impl Scheduler {
    /// `last_index` is N-1; `step` is the fraction of a frame per accepted
    /// tick.
    pub fn new(last_index: usize, target_fps: f64, step: f64) -> Self {
        Self {
            state: SchedulerState::Idle,
            position: PlaybackPosition::start(last_index),
            direction: Direction::Forward,
            step,
            min_interval: Duration::per_second(target_fps),
            last_tick: None,
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.last_index(), config.target_fps, config.step)
    }

    /// Idle → Running. Calling it again has no effect.
    pub fn start(&mut self) {
        if self.state == SchedulerState::Idle {
            tracing::debug!("scheduler running at one update per {}", self.min_interval);
            self.state = SchedulerState::Running;
        }
    }

    /// Offer a display-refresh opportunity at `now`.
    ///
    /// Returns the frame to render when the tick is accepted, and advances
    /// the position for the next one. Returns `None` while idle or when the
    /// tick comes too soon after the last accepted one.
    pub fn tick(&mut self, now: Timestamp) -> Option<TickFrame> {
        if self.state != SchedulerState::Running {
            return None;
        }
        if let Some(last) = self.last_tick {
            if now.since(last) < self.min_interval {
                return None;
            }
        }
        self.last_tick = Some(now);

        let frame = TickFrame {
            position: self.position,
            direction: self.direction,
        };
        self.advance();
        Some(frame)
    }

    /// Move one step in the current direction and bounce off the ends.
    pub fn advance(&mut self) {
        let delta = self.direction.sign() as f64 * self.step;
        self.position = self.position.offset(delta);
        if self.position.is_at_end() {
            self.direction = Direction::Backward;
        } else if self.position.is_at_start() {
            self.direction = Direction::Forward;
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
