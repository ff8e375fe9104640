//! Per-word countdown.
//!
//! The countdown is driven by explicit [`SessionTimer::tick`] calls so the
//! session logic stays deterministic; [`crate::live`] supplies real ticks.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running; nothing changed.
    Idle,
    Running { remaining: Duration },
    /// Reached zero on this tick. Reported exactly once.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    Stopped,
    Running,
    Expired,
}

#[derive(Debug, Clone)]
pub struct SessionTimer {
    remaining: Duration,
    step: Duration,
    status: TimerStatus,
}

impl SessionTimer {
    /// A stopped timer that loses `step` per tick once started.
    pub fn new(seconds: u32, step: Duration) -> Self {
        Self {
            remaining: Duration::from_secs(u64::from(seconds)),
            step,
            status: TimerStatus::Stopped,
        }
    }

    /// Start or resume. An expired timer stays expired until [`reset`].
    ///
    /// [`reset`]: SessionTimer::reset
    pub fn start(&mut self) {
        if self.status == TimerStatus::Stopped {
            self.status = TimerStatus::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Stopped;
        }
    }

    /// Stop and set the remaining time.
    pub fn reset(&mut self, seconds: u32) {
        self.remaining = Duration::from_secs(u64::from(seconds));
        self.status = TimerStatus::Stopped;
    }

    pub fn tick(&mut self) -> Tick {
        if self.status != TimerStatus::Running {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(self.step);
        if self.remaining.is_zero() {
            self.status = TimerStatus::Expired;
            Tick::Expired
        } else {
            Tick::Running {
                remaining: self.remaining,
            }
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Remaining time rounded up to whole seconds.
    pub fn remaining_secs(&self) -> u32 {
        let millis = self.remaining.as_millis();
        u32::try_from(millis.div_ceil(1000)).unwrap_or(u32::MAX)
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }
}
