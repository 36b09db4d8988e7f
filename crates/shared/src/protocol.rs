use serde::{Deserialize, Serialize};

use crate::{
    domain::{Controls, HintKind, Outcome, RoundId},
    error::GameError,
};

/// Input events dispatched into a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GameEvent {
    OptionSelected { name: String },
    HintRequested { kind: HintKind },
    Tick { round_id: RoundId },
    /// For front ends that run their own clock instead of sending ticks.
    TimerExpired { round_id: RoundId },
    NextRequested,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub name: String,
    pub eliminated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    pub round_id: RoundId,
    pub flag_url: String,
    pub options: Vec<OptionView>,
    pub score: u32,
    pub eliminate_hints_left: u32,
    pub capital_hints_left: u32,
    pub seconds: u32,
    pub controls: Controls,
}

/// Output of a quiz session, in the order a front end should apply it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GameUpdate {
    RoundStarted {
        round: RoundView,
    },
    TimerStarted {
        round_id: RoundId,
        seconds: u32,
    },
    TimerTicked {
        round_id: RoundId,
        remaining: u32,
        /// Share of the round left, 1.0 down to 0.0.
        progress: f32,
        critical: bool,
    },
    TimerStopped {
        round_id: RoundId,
        remaining: u32,
    },
    OptionEliminated {
        round_id: RoundId,
        name: String,
        eliminate_hints_left: u32,
    },
    CapitalRevealed {
        round_id: RoundId,
        message: String,
        hint_used: bool,
        capital_hints_left: u32,
    },
    RoundResolved {
        round_id: RoundId,
        outcome: Outcome,
        correct_answer: String,
        score: u32,
    },
    ControlsChanged {
        controls: Controls,
    },
    Error(GameError),
}
