//! Keyboard commands typed at the prompt.

use quiz_core::QuizSession;
use rand::Rng;
use shared::{domain::HintKind, protocol::GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 1-based option number as displayed.
    Select(usize),
    Hint(HintKind),
    Next,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "e" | "eliminate" => Some(Command::Hint(HintKind::Eliminate)),
        "c" | "capital" => Some(Command::Hint(HintKind::Capital)),
        "n" | "next" => Some(Command::Next),
        "q" | "quit" | "exit" => Some(Command::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|idx| *idx >= 1)
            .map(Command::Select),
    }
}

/// Maps a command onto a session event. `None` for `Quit` and for option
/// numbers outside the current round.
pub fn to_event<R: Rng>(command: Command, session: &QuizSession<R>) -> Option<GameEvent> {
    match command {
        Command::Select(idx) => {
            let option = session.round()?.options().get(idx.checked_sub(1)?)?;
            Some(GameEvent::OptionSelected {
                name: option.country.name.clone(),
            })
        }
        Command::Hint(kind) => Some(GameEvent::HintRequested { kind }),
        Command::Next => Some(GameEvent::NextRequested),
        Command::Quit => None,
    }
}
