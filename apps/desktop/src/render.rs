//! Turns session updates into terminal output.

use shared::{domain::Outcome, protocol::GameUpdate};

const BAR_WIDTH: usize = 15;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load the game. Please reload.";
pub const USAGE: &str = "[1-4] answer  [e] eliminate a wrong option  [c] show the capital  [n] next round  [q] quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct Renderer {
    mode: OutputMode,
}

impl Renderer {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn render(&self, update: &GameUpdate) -> Option<String> {
        match self.mode {
            OutputMode::Json => serde_json::to_string(update).ok(),
            OutputMode::Text => self.render_text(update),
        }
    }

    fn render_text(&self, update: &GameUpdate) -> Option<String> {
        let text = match update {
            GameUpdate::RoundStarted { round } => {
                let mut lines = vec![
                    String::new(),
                    format!(
                        "Round {} | score {} | eliminate hints {} | capital hints {}",
                        round.round_id.0,
                        round.score,
                        round.eliminate_hints_left,
                        round.capital_hints_left
                    ),
                    format!("Flag: {}", round.flag_url),
                ];
                lines.extend(
                    round
                        .options
                        .iter()
                        .enumerate()
                        .map(|(idx, option)| format!("  {}) {}", idx + 1, option.name)),
                );
                lines.push(USAGE.to_string());
                lines.join("\n")
            }
            GameUpdate::TimerStarted { seconds, .. } => countdown_line(*seconds, 1.0, false),
            GameUpdate::TimerTicked {
                remaining,
                progress,
                critical,
                ..
            } => countdown_line(*remaining, *progress, *critical),
            GameUpdate::TimerStopped { .. } => return None,
            GameUpdate::OptionEliminated {
                name,
                eliminate_hints_left,
                ..
            } => format!("  x {name} is not it ({eliminate_hints_left} eliminate hints left)"),
            GameUpdate::CapitalRevealed { message, .. } => message.clone(),
            GameUpdate::RoundResolved {
                outcome,
                correct_answer,
                score,
                ..
            } => match outcome {
                Outcome::Correct => format!("{} Score: {score}", outcome.feedback()),
                _ => format!(
                    "{} It was {correct_answer}. Score: {score}",
                    outcome.feedback()
                ),
            },
            GameUpdate::ControlsChanged { controls } if controls.next => {
                "Press [n] for the next round.".to_string()
            }
            GameUpdate::ControlsChanged { .. } => return None,
            GameUpdate::Error(err) => format!("error: {}", err.message),
        };
        Some(text)
    }
}

/// `remaining` seconds with a bar filled to `progress`; `!` marks the
/// critical stretch. Any time left keeps at least one cell filled.
pub fn countdown_line(remaining: u32, progress: f32, critical: bool) -> String {
    let filled = (progress.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    let filled = if remaining > 0 { filled.max(1) } else { filled };
    let filled = filled.min(BAR_WIDTH);
    let fill = if critical { '!' } else { '#' };
    format!(
        "  {remaining:>2}s [{}{}]",
        fill.to_string().repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
