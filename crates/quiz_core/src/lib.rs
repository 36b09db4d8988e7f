//! Round, timer and hint state machine for the flag quiz.
//!
//! All mutation goes through [`QuizSession`]; front ends feed it
//! [`GameEvent`](shared::protocol::GameEvent)s and render the returned
//! [`GameUpdate`](shared::protocol::GameUpdate)s.

pub mod hints;
pub mod round;
pub mod session;
pub mod ticker;
pub mod timer;

pub use hints::{HintBudget, HintManager};
pub use round::{Round, RoundOption};
pub use session::QuizSession;
pub use ticker::{RoundTicker, TICK_PERIOD};
pub use timer::{Countdown, TickOutcome, TimerState};

pub const DEFAULT_OPTIONS_PER_ROUND: usize = 4;
pub const DEFAULT_ROUND_SECONDS: u32 = 15;
pub const DEFAULT_WARNING_SECONDS: u32 = 5;
pub const DEFAULT_ELIMINATE_HINTS: u32 = 3;
pub const DEFAULT_CAPITAL_HINTS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub options_per_round: usize,
    pub round_seconds: u32,
    /// The countdown is critical once remaining time is at or below this.
    pub warning_seconds: u32,
    pub eliminate_hints: u32,
    pub capital_hints: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            options_per_round: DEFAULT_OPTIONS_PER_ROUND,
            round_seconds: DEFAULT_ROUND_SECONDS,
            warning_seconds: DEFAULT_WARNING_SECONDS,
            eliminate_hints: DEFAULT_ELIMINATE_HINTS,
            capital_hints: DEFAULT_CAPITAL_HINTS,
        }
    }
}
