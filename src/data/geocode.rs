//! Open-Meteo geocoding client
//!
//! Looks up U.S. places by name, narrows the candidates by the state the
//! user typed, and decides whether a single place can be chosen
//! automatically or the user has to pick from a list.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{GeocodeCandidate, StateTable};

/// Base URL for the Open-Meteo geocoding API
pub const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Maximum number of candidates requested per lookup
const CANDIDATE_COUNT: u8 = 8;

/// Country the lookup is restricted to
const COUNTRY: &str = "US";

/// Errors that can occur while geocoding
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("Geocoding endpoint returned status {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// What a lookup produced
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    /// Exactly one plausible place
    AutoSelected(GeocodeCandidate),
    /// Several places; the user must choose one
    CandidateList(Vec<GeocodeCandidate>),
    /// The endpoint knows no place by that name
    NotFound,
}

/// Geocoding response body; `results` is absent or null when nothing matched
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<GeocodeCandidate>>,
}

/// Client for the geocoding endpoint
#[derive(Debug, Clone)]
pub struct GeocoderClient {
    client: Client,
    base_url: String,
    states: StateTable,
}

impl Default for GeocoderClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocoderClient {
    /// Creates a client against the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(GEOCODING_BASE_URL)
    }

    /// Creates a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            states: StateTable::US,
        }
    }

    /// Looks up `city` and selects among the candidates using `state`
    ///
    /// # Returns
    /// * `Ok(GeocodeOutcome)` - A chosen place, a list to choose from, or `NotFound`
    /// * `Err(GeocodeError)` - If the request or parsing fails
    pub async fn resolve(&self, city: &str, state: &str) -> Result<GeocodeOutcome, GeocodeError> {
        let results = self.search(city, state).await?;
        tracing::debug!(city, state, count = results.len(), "geocoding results");
        Ok(select_candidates(results, state, self.states))
    }

    /// Fetches the raw candidate list from the endpoint
    async fn search(&self, city: &str, state: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let count = CANDIDATE_COUNT.to_string();
        let mut params = vec![("name", city), ("country", COUNTRY), ("count", count.as_str())];
        if !state.is_empty() {
            params.push(("state", state));
        }

        let response = self.client.get(&self.base_url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let body: SearchResponse = serde_json::from_str(&text)?;
        Ok(body.results.unwrap_or_default())
    }
}

/// Narrows candidates to the requested state and decides the outcome.
///
/// When `state` is non-empty, candidates whose region matches it (directly
/// or after abbreviating either side, ignoring case) are kept. If none match,
/// the unfiltered list is used instead of reporting `NotFound`.
pub fn select_candidates(
    results: Vec<GeocodeCandidate>,
    state: &str,
    states: StateTable,
) -> GeocodeOutcome {
    if results.is_empty() {
        return GeocodeOutcome::NotFound;
    }

    let mut remaining = results;
    if !state.is_empty() {
        let matching: Vec<GeocodeCandidate> = remaining
            .iter()
            .filter(|c| states.same_state(c.match_region(), state))
            .cloned()
            .collect();
        if matching.is_empty() {
            tracing::debug!(state, "no candidate matches the state, keeping all");
        } else {
            remaining = matching;
        }
    }

    if remaining.len() == 1 {
        if let Some(only) = remaining.pop() {
            return GeocodeOutcome::AutoSelected(only);
        }
    }
    GeocodeOutcome::CandidateList(remaining)
}

/// Formats the label shown for a place, e.g. "Austin, TX"
pub fn place_display(candidate: &GeocodeCandidate, states: StateTable) -> String {
    let region = candidate.region().unwrap_or_default();

    if candidate.is_us() {
        let abbr = states.to_abbreviation(region);
        return if abbr.is_empty() {
            candidate.name.clone()
        } else {
            format!("{}, {}", candidate.name, abbr)
        };
    }

    if !region.is_empty() {
        return format!("{}, {}", candidate.name, region);
    }
    match candidate.country.as_deref().filter(|c| !c.is_empty()) {
        Some(country) => format!("{}, {}", candidate.name, country),
        None => candidate.name.clone(),
    }
}
