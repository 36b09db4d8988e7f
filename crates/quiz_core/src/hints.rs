use shared::domain::Country;

use crate::round::Round;

/// Session-wide uses of one hint type plus its once-per-round latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintBudget {
    remaining: u32,
    latched: bool,
}

impl HintBudget {
    pub fn new(uses: u32) -> Self {
        Self {
            remaining: uses,
            latched: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_available(&self) -> bool {
        self.remaining > 0 && !self.latched
    }

    fn consume(&mut self) -> bool {
        if !self.is_available() {
            return false;
        }
        self.remaining -= 1;
        self.latched = true;
        true
    }

    fn reset_round(&mut self) {
        self.latched = false;
    }
}

#[derive(Debug, Clone)]
pub struct HintManager {
    eliminate: HintBudget,
    capital: HintBudget,
}

impl HintManager {
    pub fn new(eliminate_uses: u32, capital_uses: u32) -> Self {
        Self {
            eliminate: HintBudget::new(eliminate_uses),
            capital: HintBudget::new(capital_uses),
        }
    }

    pub fn eliminate_left(&self) -> u32 {
        self.eliminate.remaining
    }

    pub fn capital_left(&self) -> u32 {
        self.capital.remaining
    }

    pub fn capital_shown(&self) -> bool {
        self.capital.latched
    }

    pub(crate) fn start_round(&mut self) {
        self.eliminate.reset_round();
        self.capital.reset_round();
    }

    pub fn can_eliminate(&self, round: &Round) -> bool {
        !round.is_answered() && self.eliminate.is_available() && round.has_eliminable()
    }

    pub fn can_reveal_capital(&self, round: &Round) -> bool {
        !round.is_answered() && self.capital.is_available()
    }

    /// Strikes one wrong option. Returns its name, or `None` if the control
    /// is disabled.
    pub(crate) fn eliminate(&mut self, round: &mut Round) -> Option<String> {
        if !self.can_eliminate(round) {
            return None;
        }
        let name = round.eliminate_first_wrong()?.to_string();
        self.eliminate.consume();
        Some(name)
    }

    pub(crate) fn reveal_capital(&mut self, round: &Round) -> Option<String> {
        if !self.can_reveal_capital(round) || !self.capital.consume() {
            return None;
        }
        Some(capital_message(round.correct(), true))
    }

    /// Free reveal after a wrong answer or timeout.
    pub(crate) fn auto_reveal_capital(&mut self, round: &Round) -> Option<String> {
        if self.capital.latched {
            return None;
        }
        self.capital.latched = true;
        Some(capital_message(round.correct(), false))
    }
}

pub fn capital_message(country: &Country, hint_used: bool) -> String {
    let mut message = format!("Hint: the capital is {}.", country.capital());
    if hint_used {
        message.push_str(" (hint used!)");
    }
    message
}
