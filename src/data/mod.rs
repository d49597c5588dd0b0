//! Core data models for citywx
//!
//! This module contains the types passed between the location parser, the
//! geocoding and forecast clients, and the presentation layer.

pub mod geocode;
pub mod location;
pub mod states;
pub mod weather;
pub mod weather_codes;

pub use geocode::{place_display, select_candidates, GeocodeError, GeocodeOutcome, GeocoderClient};
pub use location::parse_location;
pub use states::StateTable;
pub use weather::{hourly_window, ForecastClient, ForecastError, HOURLY_WINDOW};
pub use weather_codes::{Sky, WeatherCodeEntry, WeatherCodeTable};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// City and state tokens split out of free-text input
///
/// No normalization is applied: `state` is whatever the last token was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationQuery {
    /// Everything before the last token, joined by single spaces
    pub city: String,
    /// The last token, or empty when the input had a single token
    pub state: String,
}

/// A single place returned by the geocoding endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    /// Place name
    pub name: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// ISO country code ("US")
    #[serde(default)]
    pub country_code: Option<String>,
    /// Country name
    #[serde(default)]
    pub country: Option<String>,
    /// State name, when the endpoint reports one under this key
    #[serde(default)]
    pub state: Option<String>,
    /// First-level administrative area (the state for U.S. places)
    #[serde(default)]
    pub admin1: Option<String>,
    /// Code for the first-level administrative area
    #[serde(default)]
    pub admin1_code: Option<String>,
}

impl GeocodeCandidate {
    /// Returns the state-level region shown to the user
    pub fn region(&self) -> Option<&str> {
        self.state
            .as_deref()
            .or(self.admin1.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Returns the region used when matching against a user-supplied state
    fn match_region(&self) -> &str {
        self.region()
            .or(self.admin1_code.as_deref())
            .unwrap_or_default()
    }

    /// Whether the candidate is a U.S. place
    pub fn is_us(&self) -> bool {
        self.country_code.as_deref() == Some("US")
            || self
                .country
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains("united states"))
    }
}

/// The location the user settled on; the unit persisted between runs
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// The raw text that was searched
    pub raw: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// Formatted label, e.g. "Austin, TX"
    pub display: String,
}

impl ResolvedLocation {
    /// Builds the resolved location for a chosen candidate
    pub fn from_candidate(raw: &str, candidate: &GeocodeCandidate, states: StateTable) -> Self {
        Self {
            raw: raw.to_string(),
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            display: place_display(candidate, states),
        }
    }
}

/// Current conditions at the location
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Fahrenheit
    pub temperature: f64,
    /// WMO weather code
    pub code: i32,
}

/// One day of the 10-day forecast
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    /// Local calendar date
    pub date: NaiveDate,
    /// High temperature in Fahrenheit
    pub max: Option<f64>,
    /// Low temperature in Fahrenheit
    pub min: Option<f64>,
    /// WMO weather code
    pub code: Option<i32>,
}

/// One hour of the hourly forecast
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecast {
    /// Local time at the location
    pub time: NaiveDateTime,
    /// Temperature in Fahrenheit
    pub temperature: Option<f64>,
    /// WMO weather code
    pub code: Option<i32>,
    /// Precipitation probability (0-100)
    pub precip_probability: Option<f64>,
    /// Precipitation amount in mm
    pub precipitation: Option<f64>,
    /// Relative humidity (0-100)
    pub humidity: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
}

/// Everything one forecast fetch returns; replaced wholesale on every fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastSnapshot {
    /// Current conditions, if the endpoint reported them
    pub current: Option<CurrentConditions>,
    /// Daily forecasts, in date order
    pub daily: Vec<DailyForecast>,
    /// Hourly forecasts, in time order
    pub hourly: Vec<HourlyForecast>,
    /// Offset of the location's local time from UTC
    pub utc_offset_seconds: i32,
}

impl ForecastSnapshot {
    /// The current wall-clock time at the forecast location
    pub fn local_now(&self) -> NaiveDateTime {
        chrono::Utc::now().naive_utc() + chrono::Duration::seconds(i64::from(self.utc_offset_seconds))
    }
}
