use rand::Rng;
use shared::{
    domain::{Catalog, Country, Outcome, RoundId},
    error::QuizError,
    protocol::OptionView,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOption {
    pub country: Country,
    /// Struck through by the elimination hint. Still selectable.
    pub eliminated: bool,
}

#[derive(Debug, Clone)]
pub struct Round {
    id: RoundId,
    options: Vec<RoundOption>,
    correct: usize,
    outcome: Option<Outcome>,
}

impl Round {
    /// Samples `count` countries with distinct names from a fresh copy of the
    /// catalog, then picks the answer among those options.
    pub fn draw<R: Rng + ?Sized>(
        id: RoundId,
        catalog: &Catalog,
        count: usize,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        let not_enough = |available: usize| QuizError::NotEnoughCountries {
            required: count,
            available,
        };
        if count == 0 || catalog.len() < count {
            return Err(not_enough(catalog.len()));
        }

        let mut pool: Vec<&Country> = catalog.countries().iter().collect();
        let mut options: Vec<RoundOption> = Vec::with_capacity(count);
        while options.len() < count {
            if pool.is_empty() {
                return Err(not_enough(options.len()));
            }
            let candidate = pool.swap_remove(rng.gen_range(0..pool.len()));
            if options.iter().any(|opt| opt.country.name == candidate.name) {
                continue;
            }
            options.push(RoundOption {
                country: candidate.clone(),
                eliminated: false,
            });
        }

        let correct = rng.gen_range(0..options.len());
        Ok(Self {
            id,
            options,
            correct,
            outcome: None,
        })
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn options(&self) -> &[RoundOption] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&RoundOption> {
        self.options.iter().find(|opt| opt.country.name == name)
    }

    pub fn correct(&self) -> &Country {
        &self.options[self.correct].country
    }

    pub fn is_correct(&self, name: &str) -> bool {
        self.correct().name == name
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_answered(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn has_eliminable(&self) -> bool {
        self.first_eliminable().is_some()
    }

    fn first_eliminable(&self) -> Option<usize> {
        self.options
            .iter()
            .enumerate()
            .position(|(idx, opt)| idx != self.correct && !opt.eliminated)
    }

    /// Marks the first wrong, not yet eliminated option in display order.
    pub(crate) fn eliminate_first_wrong(&mut self) -> Option<&str> {
        let idx = self.first_eliminable()?;
        let option = &mut self.options[idx];
        option.eliminated = true;
        Some(option.country.name.as_str())
    }

    pub(crate) fn record_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    pub fn option_views(&self) -> Vec<OptionView> {
        self.options
            .iter()
            .map(|opt| OptionView {
                name: opt.country.name.clone(),
                eliminated: opt.eliminated,
            })
            .collect()
    }
}
