//! Per-round countdown. Ticks come from outside (see [`crate::ticker`]), so
//! the state machine itself is synchronous.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Ignored,
    Running { remaining: u32 },
    Expired,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    duration: u32,
    warning_at: u32,
    remaining: u32,
    state: TimerState,
}

impl Countdown {
    pub fn new(duration: u32, warning_at: u32) -> Self {
        Self {
            duration,
            warning_at,
            remaining: duration,
            state: TimerState::Idle,
        }
    }

    /// Restarts from the full duration regardless of the current state.
    pub fn start(&mut self) {
        self.remaining = self.duration;
        self.state = TimerState::Running;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TimerState::Running {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Freezes the countdown. Returns `false` when it was not running.
    pub fn stop(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Stopped;
        true
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_critical(&self) -> bool {
        self.remaining <= self.warning_at
    }

    /// Fraction of the round still left, from 1.0 down to 0.0.
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        self.remaining as f32 / self.duration as f32
    }
}
