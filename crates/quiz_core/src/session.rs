use rand::Rng;
use shared::{
    domain::{Catalog, Controls, HintKind, Outcome, RoundId},
    error::QuizError,
    protocol::{GameEvent, GameUpdate, RoundView},
};
use tracing::{debug, info};

use crate::{
    hints::HintManager,
    round::Round,
    timer::{Countdown, TickOutcome},
    GameRules,
};

/// One player's quiz: catalog, score, hint budgets and the current round.
pub struct QuizSession<R> {
    catalog: Catalog,
    rules: GameRules,
    rng: R,
    score: u32,
    hints: HintManager,
    round: Option<Round>,
    timer: Countdown,
    last_round_id: RoundId,
}

impl<R: Rng> QuizSession<R> {
    pub fn new(catalog: Catalog, rules: GameRules, rng: R) -> Result<Self, QuizError> {
        if rules.options_per_round == 0 || catalog.len() < rules.options_per_round {
            return Err(QuizError::NotEnoughCountries {
                required: rules.options_per_round,
                available: catalog.len(),
            });
        }

        Ok(Self {
            catalog,
            rules,
            rng,
            score: 0,
            hints: HintManager::new(rules.eliminate_hints, rules.capital_hints),
            round: None,
            timer: Countdown::new(rules.round_seconds, rules.warning_seconds),
            last_round_id: RoundId(0),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hints(&self) -> &HintManager {
        &self.hints
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn controls(&self) -> Controls {
        let Some(round) = &self.round else {
            return Controls::default();
        };
        let answered = round.is_answered();
        Controls {
            options: !answered,
            eliminate: self.hints.can_eliminate(round),
            capital: self.hints.can_reveal_capital(round),
            next: answered,
        }
    }

    pub fn view(&self) -> Option<RoundView> {
        let round = self.round.as_ref()?;
        Some(RoundView {
            round_id: round.id(),
            flag_url: round.correct().flag_url.clone(),
            options: round.option_views(),
            score: self.score,
            eliminate_hints_left: self.hints.eliminate_left(),
            capital_hints_left: self.hints.capital_left(),
            seconds: self.timer.duration(),
            controls: self.controls(),
        })
    }

    pub fn dispatch(&mut self, event: GameEvent) -> Result<Vec<GameUpdate>, QuizError> {
        match event {
            GameEvent::OptionSelected { name } => self.resolve(Some(&name)),
            GameEvent::HintRequested { kind } => self.request_hint(kind),
            GameEvent::Tick { round_id } => self.tick(round_id),
            GameEvent::TimerExpired { round_id } => {
                if !self.is_current(round_id) {
                    debug!(round_id = round_id.0, "ignoring expiry for another round");
                    return Ok(Vec::new());
                }
                self.resolve(None)
            }
            GameEvent::NextRequested => self.next_round(),
        }
    }

    /// Draws a fresh round from the full catalog and starts its countdown.
    pub fn start_round(&mut self) -> Result<Vec<GameUpdate>, QuizError> {
        let round_id = self.last_round_id.next();
        let round = Round::draw(
            round_id,
            &self.catalog,
            self.rules.options_per_round,
            &mut self.rng,
        )?;

        self.timer.stop();
        self.last_round_id = round_id;
        self.hints.start_round();
        self.round = Some(round);

        let Some(view) = self.view() else {
            return Err(QuizError::NoActiveRound);
        };
        info!(round_id = round_id.0, score = self.score, "round started");

        self.timer.start();
        Ok(vec![
            GameUpdate::RoundStarted { round: view },
            GameUpdate::TimerStarted {
                round_id,
                seconds: self.timer.duration(),
            },
        ])
    }

    /// Starts the next round once the current one is resolved.
    pub fn next_round(&mut self) -> Result<Vec<GameUpdate>, QuizError> {
        if self.round.as_ref().is_some_and(|round| !round.is_answered()) {
            debug!("ignoring next round request while the round is open");
            return Ok(Vec::new());
        }
        self.start_round()
    }

    /// Resolves the current round; `None` means the player ran out of time.
    /// A round resolves at most once; later calls return no updates.
    pub fn resolve(&mut self, selected: Option<&str>) -> Result<Vec<GameUpdate>, QuizError> {
        let Some(round) = self.round.as_mut() else {
            return Err(QuizError::NoActiveRound);
        };
        if round.is_answered() {
            debug!(round_id = round.id().0, "round already resolved");
            return Ok(Vec::new());
        }
        if let Some(name) = selected {
            if round.option(name).is_none() {
                return Err(QuizError::UnknownOption {
                    name: name.to_string(),
                });
            }
        }

        let round_id = round.id();
        let mut updates = Vec::new();
        if self.timer.stop() {
            updates.push(GameUpdate::TimerStopped {
                round_id,
                remaining: self.timer.remaining(),
            });
        }

        let outcome = match selected {
            Some(name) if round.is_correct(name) => Outcome::Correct,
            Some(name) => Outcome::Wrong {
                selected: name.to_string(),
            },
            None => Outcome::TimedOut,
        };
        if outcome.is_correct() {
            self.score += 1;
        }
        round.record_outcome(outcome.clone());

        updates.push(GameUpdate::RoundResolved {
            round_id,
            outcome: outcome.clone(),
            correct_answer: round.correct().name.clone(),
            score: self.score,
        });

        if !outcome.is_correct() {
            if let Some(message) = self.hints.auto_reveal_capital(round) {
                updates.push(GameUpdate::CapitalRevealed {
                    round_id,
                    message,
                    hint_used: false,
                    capital_hints_left: self.hints.capital_left(),
                });
            }
        }

        info!(
            round_id = round_id.0,
            outcome = outcome.feedback(),
            score = self.score,
            "round resolved"
        );
        updates.push(GameUpdate::ControlsChanged {
            controls: self.controls(),
        });
        Ok(updates)
    }

    pub fn request_hint(&mut self, kind: HintKind) -> Result<Vec<GameUpdate>, QuizError> {
        let Some(round) = self.round.as_mut() else {
            return Err(QuizError::NoActiveRound);
        };
        let round_id = round.id();

        let update = match kind {
            HintKind::Eliminate => {
                self.hints
                    .eliminate(round)
                    .map(|name| GameUpdate::OptionEliminated {
                        round_id,
                        name,
                        eliminate_hints_left: self.hints.eliminate_left(),
                    })
            }
            HintKind::Capital => {
                self.hints
                    .reveal_capital(round)
                    .map(|message| GameUpdate::CapitalRevealed {
                        round_id,
                        message,
                        hint_used: true,
                        capital_hints_left: self.hints.capital_left(),
                    })
            }
        };

        let Some(update) = update else {
            debug!(round_id = round_id.0, ?kind, "hint control disabled, ignoring");
            return Ok(Vec::new());
        };
        info!(round_id = round_id.0, ?kind, "hint used");

        Ok(vec![
            update,
            GameUpdate::ControlsChanged {
                controls: self.controls(),
            },
        ])
    }

    /// Advances the countdown of `round_id`. Ticks for any other round, or
    /// after the timer stopped, are dropped.
    pub fn tick(&mut self, round_id: RoundId) -> Result<Vec<GameUpdate>, QuizError> {
        if !self.is_current(round_id) {
            debug!(round_id = round_id.0, "dropping stale tick");
            return Ok(Vec::new());
        }

        match self.timer.tick() {
            TickOutcome::Ignored => Ok(Vec::new()),
            TickOutcome::Running { remaining } => Ok(vec![GameUpdate::TimerTicked {
                round_id,
                remaining,
                progress: self.timer.progress(),
                critical: self.timer.is_critical(),
            }]),
            TickOutcome::Expired => {
                let mut updates = vec![GameUpdate::TimerTicked {
                    round_id,
                    remaining: 0,
                    progress: 0.0,
                    critical: true,
                }];
                updates.extend(self.resolve(None)?);
                Ok(updates)
            }
        }
    }

    fn is_current(&self, round_id: RoundId) -> bool {
        self.round.as_ref().is_some_and(|round| round.id() == round_id)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
