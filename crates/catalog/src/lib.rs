//! Country catalog loading: ordered endpoint fallback, record decoding and
//! eligibility filtering.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use shared::domain::{Catalog, Country};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://restcountries.com/v3.1/region/europe?fields=name,flags,capital",
    "https://restcountries.com/v3.1/region/americas?fields=name,flags,capital",
    "https://restcountries.com/v3.1/all?fields=name,flags,capital",
];
pub const DEFAULT_MIN_CATALOG_SIZE: usize = 10;
/// Names must be strictly shorter than this many characters.
pub const DEFAULT_MAX_NAME_CHARS: usize = 20;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid endpoint url '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("{url} returned an unexpected body: {reason}")]
    Decode { url: String, reason: String },
    #[error("{url} yielded {found} usable countries, need at least {required}")]
    TooFewCountries {
        url: String,
        found: usize,
        required: usize,
    },
    #[error("no endpoint produced a usable catalog ({} attempted)", .failures.len())]
    Exhausted { failures: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogFilter {
    pub max_name_chars: usize,
    pub min_size: usize,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            max_name_chars: DEFAULT_MAX_NAME_CHARS,
            min_size: DEFAULT_MIN_CATALOG_SIZE,
        }
    }
}

impl CatalogFilter {
    pub fn accepts(&self, country: &Country) -> bool {
        let name = &country.name;
        !name.trim().is_empty()
            && name.chars().count() < self.max_name_chars
            && !country.flag_url.trim().is_empty()
            && !country.capital().trim().is_empty()
    }

    /// Decodes a JSON array of country records, dropping every record that is
    /// malformed or not eligible.
    pub fn apply(&self, body: Value) -> Result<Vec<Country>, String> {
        let Value::Array(records) = body else {
            return Err("expected a JSON array of countries".to_string());
        };

        let total = records.len();
        let countries: Vec<Country> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<CountryRecord>(record) {
                Ok(record) => record.into_country(),
                Err(err) => {
                    debug!(error = %err, "skipping malformed country record");
                    None
                }
            })
            .filter(|country| self.accepts(country))
            .collect();

        debug!(total, kept = countries.len(), "filtered country records");
        Ok(countries)
    }
}

#[derive(Debug, Deserialize)]
struct CountryRecord {
    name: RecordName,
    #[serde(default)]
    flags: RecordFlags,
    #[serde(default)]
    capital: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RecordName {
    common: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecordFlags {
    #[serde(default)]
    svg: Option<String>,
    #[serde(default)]
    png: Option<String>,
}

impl CountryRecord {
    fn into_country(self) -> Option<Country> {
        let flag_url = self.flags.svg.or(self.flags.png)?;
        let capitals = self.capital.filter(|capitals| !capitals.is_empty())?;
        let name = self.name.common.trim().to_string();
        Some(Country::new(name, flag_url, capitals))
    }
}

#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch(&self, endpoint: &Url) -> Result<Value, CatalogError>;
}

pub struct HttpCountrySource {
    http: Client,
}

impl HttpCountrySource {
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogError::ClientBuild)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl CountrySource for HttpCountrySource {
    async fn fetch(&self, endpoint: &Url) -> Result<Value, CatalogError> {
        let response = self
            .http
            .get(endpoint.clone())
            .send()
            .await
            .map_err(|source| CatalogError::Http {
                url: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: endpoint.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| CatalogError::Http {
            url: endpoint.to_string(),
            source,
        })
    }
}

pub struct CatalogLoader<S> {
    source: S,
    endpoints: Vec<String>,
    filter: CatalogFilter,
}

impl<S: CountrySource> CatalogLoader<S> {
    /// Endpoints are kept as given and parsed on use, so a malformed entry
    /// only costs its own turn in the fallback order.
    pub fn new<I, E>(source: S, endpoints: I, filter: CatalogFilter) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        Self {
            source,
            endpoints: endpoints
                .into_iter()
                .map(|raw| raw.as_ref().trim().to_string())
                .collect(),
            filter,
        }
    }

    /// Tries each endpoint in order and returns the first catalog that meets
    /// the minimum size. Endpoints are never retried.
    pub async fn load(&self) -> Result<Catalog, CatalogError> {
        let mut failures = Vec::with_capacity(self.endpoints.len());

        for endpoint in &self.endpoints {
            let attempt = match Url::parse(endpoint) {
                Ok(url) => self.load_from(&url).await,
                Err(source) => Err(CatalogError::InvalidEndpoint {
                    url: endpoint.clone(),
                    source,
                }),
            };
            match attempt {
                Ok(catalog) => {
                    info!(%endpoint, countries = catalog.len(), "catalog loaded");
                    return Ok(catalog);
                }
                Err(err) => {
                    warn!(%endpoint, error = %err, "catalog endpoint failed, trying next");
                    failures.push(err.to_string());
                }
            }
        }

        Err(CatalogError::Exhausted { failures })
    }

    async fn load_from(&self, endpoint: &Url) -> Result<Catalog, CatalogError> {
        let body = self.source.fetch(endpoint).await?;
        let countries = self
            .filter
            .apply(body)
            .map_err(|reason| CatalogError::Decode {
                url: endpoint.to_string(),
                reason,
            })?;

        if countries.len() < self.filter.min_size {
            return Err(CatalogError::TooFewCountries {
                url: endpoint.to_string(),
                found: countries.len(),
                required: self.filter.min_size,
            });
        }

        Ok(Catalog::new(countries))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
