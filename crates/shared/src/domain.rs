use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(RoundId);

impl RoundId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A country eligible for the quiz. Built only by the catalog loader after
/// filtering, so `capitals` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub flag_url: String,
    pub capitals: Vec<String>,
}

impl Country {
    pub fn new(
        name: impl Into<String>,
        flag_url: impl Into<String>,
        capitals: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            flag_url: flag_url.into(),
            capitals,
        }
    }

    pub fn capital(&self) -> &str {
        self.capitals.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    countries: Vec<Country>,
}

impl Catalog {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl FromIterator<Country> for Catalog {
    fn from_iter<T: IntoIterator<Item = Country>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Eliminate,
    Capital,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Wrong { selected: String },
    TimedOut,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            Outcome::Correct => "Correct!",
            Outcome::Wrong { .. } => "Wrong!",
            Outcome::TimedOut => "Time's up!",
        }
    }
}

/// Which controls a front end should currently offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub options: bool,
    pub eliminate: bool,
    pub capital: bool,
    pub next: bool,
}
