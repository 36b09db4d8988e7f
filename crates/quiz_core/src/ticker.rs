use std::time::Duration;

use shared::{
    domain::RoundId,
    protocol::{GameEvent, GameUpdate},
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the periodic tick task of the current round. At most one task runs;
/// dropping the ticker cancels it.
pub struct RoundTicker {
    period: Duration,
    task: Option<(RoundId, JoinHandle<()>)>,
}

impl Default for RoundTicker {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl RoundTicker {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    pub fn active_round(&self) -> Option<RoundId> {
        self.task.as_ref().map(|(round_id, _)| *round_id)
    }

    /// Sends `GameEvent::Tick` for `round_id` once per period, starting one
    /// period from now. Any previous task is cancelled first.
    pub fn start(&mut self, round_id: RoundId, events: mpsc::Sender<GameEvent>) {
        self.stop();

        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if events.send(GameEvent::Tick { round_id }).await.is_err() {
                    break;
                }
            }
        });
        debug!(round_id = round_id.0, "round ticker started");
        self.task = Some((round_id, handle));
    }

    /// Returns `false` when no task was running.
    pub fn stop(&mut self) -> bool {
        let Some((round_id, handle)) = self.task.take() else {
            return false;
        };
        handle.abort();
        debug!(round_id = round_id.0, "round ticker stopped");
        true
    }

    /// Starts or cancels the tick task as a session update requires.
    pub fn follow(&mut self, update: &GameUpdate, events: &mpsc::Sender<GameEvent>) {
        match update {
            GameUpdate::TimerStarted { round_id, .. } => self.start(*round_id, events.clone()),
            GameUpdate::TimerStopped { .. } | GameUpdate::RoundResolved { .. } => {
                self.stop();
            }
            _ => {}
        }
    }
}

impl Drop for RoundTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "tests/ticker_tests.rs"]
mod tests;
