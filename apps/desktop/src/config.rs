use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use catalog::{
    CatalogFilter, DEFAULT_ENDPOINTS, DEFAULT_MAX_NAME_CHARS, DEFAULT_MIN_CATALOG_SIZE,
    DEFAULT_REQUEST_TIMEOUT,
};
use quiz_core::GameRules;
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "flag_quiz.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoints: Vec<String>,
    pub min_catalog_size: usize,
    pub max_name_chars: usize,
    pub request_timeout_seconds: u64,
    pub round_seconds: u32,
    pub warning_seconds: u32,
    pub eliminate_hints: u32,
    pub capital_hints: u32,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let rules = GameRules::default();
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|url| url.to_string()).collect(),
            min_catalog_size: DEFAULT_MIN_CATALOG_SIZE,
            max_name_chars: DEFAULT_MAX_NAME_CHARS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            round_seconds: rules.round_seconds,
            warning_seconds: rules.warning_seconds,
            eliminate_hints: rules.eliminate_hints,
            capital_hints: rules.capital_hints,
            log_level: "warn".into(),
        }
    }
}

impl Settings {
    pub fn rules(&self) -> GameRules {
        GameRules {
            round_seconds: self.round_seconds,
            warning_seconds: self.warning_seconds,
            eliminate_hints: self.eliminate_hints,
            capital_hints: self.capital_hints,
            ..GameRules::default()
        }
    }

    pub fn catalog_filter(&self) -> CatalogFilter {
        CatalogFilter {
            max_name_chars: self.max_name_chars,
            min_size: self.min_catalog_size,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    endpoints: Option<Vec<String>>,
    min_catalog_size: Option<usize>,
    max_name_chars: Option<usize>,
    request_timeout_seconds: Option<u64>,
    round_seconds: Option<u32>,
    warning_seconds: Option<u32>,
    eliminate_hints: Option<u32>,
    capital_hints: Option<u32>,
    log_level: Option<String>,
}

/// Defaults, then the settings file, then `APP__*` environment variables.
/// A missing default file is fine; a missing explicit file is an error.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_SETTINGS_FILE), false),
    };

    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    let mut settings = match raw {
        Some(raw) => settings_from_toml(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        None => Settings::default(),
    };
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub(crate) fn settings_from_toml(raw: &str) -> anyhow::Result<Settings> {
    let file: FileSettings = toml::from_str(raw)?;
    let mut settings = Settings::default();

    if let Some(v) = file.endpoints {
        settings.endpoints = v;
    }
    if let Some(v) = file.min_catalog_size {
        settings.min_catalog_size = v;
    }
    if let Some(v) = file.max_name_chars {
        settings.max_name_chars = v;
    }
    if let Some(v) = file.request_timeout_seconds {
        settings.request_timeout_seconds = v;
    }
    if let Some(v) = file.round_seconds {
        settings.round_seconds = v;
    }
    if let Some(v) = file.warning_seconds {
        settings.warning_seconds = v;
    }
    if let Some(v) = file.eliminate_hints {
        settings.eliminate_hints = v;
    }
    if let Some(v) = file.capital_hints {
        settings.capital_hints = v;
    }
    if let Some(v) = file.log_level {
        settings.log_level = v;
    }

    Ok(settings)
}

pub(crate) fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("APP__ENDPOINTS") {
        let endpoints: Vec<String> = v
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();
        if !endpoints.is_empty() {
            settings.endpoints = endpoints;
        }
    }

    override_parsed(&mut settings.min_catalog_size, var("APP__MIN_CATALOG_SIZE"));
    override_parsed(&mut settings.max_name_chars, var("APP__MAX_NAME_CHARS"));
    override_parsed(
        &mut settings.request_timeout_seconds,
        var("APP__REQUEST_TIMEOUT_SECONDS"),
    );
    override_parsed(&mut settings.round_seconds, var("APP__ROUND_SECONDS"));
    override_parsed(&mut settings.warning_seconds, var("APP__WARNING_SECONDS"));
    override_parsed(&mut settings.eliminate_hints, var("APP__ELIMINATE_HINTS"));
    override_parsed(&mut settings.capital_hints, var("APP__CAPITAL_HINTS"));

    if let Some(v) = var("APP__LOG_LEVEL") {
        settings.log_level = v;
    }
}

fn override_parsed<T: std::str::FromStr>(slot: &mut T, raw: Option<String>) {
    if let Some(parsed) = raw.and_then(|v| v.trim().parse().ok()) {
        *slot = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
