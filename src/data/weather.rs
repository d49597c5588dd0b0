//! Open-Meteo forecast client
//!
//! This module fetches current conditions plus a 10-day daily and hourly
//! forecast from the Open-Meteo API and parses it into a `ForecastSnapshot`.

use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{CurrentConditions, DailyForecast, ForecastSnapshot, HourlyForecast};

/// Base URL for the Open-Meteo forecast API
pub const FORECAST_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Daily variables requested from the API
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";

/// Hourly variables requested from the API
const HOURLY_FIELDS: &str =
    "temperature_2m,weathercode,precipitation_probability,precipitation,relativehumidity_2m,windspeed_10m";

/// Number of forecast days requested
const FORECAST_DAYS: u8 = 10;

/// Number of hours shown in the hourly strip
pub const HOURLY_WINDOW: usize = 24;

/// Errors that can occur when fetching forecast data
#[derive(Debug, Error)]
pub enum ForecastError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API answered with an error status
    #[error("Forecast API returned status {status}: {reason}")]
    Api { status: u16, reason: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

/// Client for fetching forecasts from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    /// Create a new ForecastClient against the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(FORECAST_BASE_URL)
    }

    /// Create a new ForecastClient against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the forecast for the given coordinates
    ///
    /// Temperatures are in Fahrenheit and times are in the location's own
    /// time zone.
    ///
    /// # Returns
    /// * `Ok(ForecastSnapshot)` - Current, daily and hourly data
    /// * `Err(ForecastError)` - If the request or parsing fails
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<ForecastSnapshot, ForecastError> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        let days = FORECAST_DAYS.to_string();
        let params = [
            ("latitude", lat.as_str()),
            ("longitude", lon.as_str()),
            ("current_weather", "true"),
            ("daily", DAILY_FIELDS),
            ("hourly", HOURLY_FIELDS),
            ("temperature_unit", "fahrenheit"),
            ("forecast_days", days.as_str()),
            ("timezone", "auto"),
        ];

        let response = self.client.get(&self.base_url).query(&params).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|body| body.reason)
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(ForecastError::Api {
                status: status.as_u16(),
                reason,
            });
        }

        let api_response: ForecastResponse = serde_json::from_str(&text)?;
        parse_response(api_response)
    }
}

/// Parse the API response into a snapshot
fn parse_response(response: ForecastResponse) -> Result<ForecastSnapshot, ForecastError> {
    let current = response.current_weather.map(|c| CurrentConditions {
        temperature: c.temperature,
        code: c.weathercode,
    });

    let daily = match response.daily {
        Some(daily) => parse_daily_data(&daily)?,
        None => Vec::new(),
    };

    let hourly = match response.hourly {
        Some(hourly) => parse_hourly_data(&hourly)?,
        None => Vec::new(),
    };

    Ok(ForecastSnapshot {
        current,
        daily,
        hourly,
        utc_offset_seconds: response.utc_offset_seconds,
    })
}

/// Parse daily arrays; values are aligned by index to `time`
fn parse_daily_data(daily: &DailyWeather) -> Result<Vec<DailyForecast>, ForecastError> {
    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| {
            Ok(DailyForecast {
                date: parse_date(date)?,
                max: value_at(&daily.temperature_2m_max, i),
                min: value_at(&daily.temperature_2m_min, i),
                code: value_at(&daily.weathercode, i),
            })
        })
        .collect()
}

/// Parse hourly arrays; values are aligned by index to `time`
fn parse_hourly_data(hourly: &HourlyWeather) -> Result<Vec<HourlyForecast>, ForecastError> {
    hourly
        .time
        .iter()
        .enumerate()
        .map(|(i, time)| {
            Ok(HourlyForecast {
                time: parse_datetime(time)?,
                temperature: value_at(&hourly.temperature_2m, i),
                code: value_at(&hourly.weathercode, i),
                precip_probability: value_at(&hourly.precipitation_probability, i),
                precipitation: value_at(&hourly.precipitation, i),
                humidity: value_at(&hourly.relativehumidity_2m, i),
                wind_speed: value_at(&hourly.windspeed_10m, i),
            })
        })
        .collect()
}

/// Reads index `i` of a column that may be short or contain nulls
fn value_at<T: Copy>(column: &[Option<T>], i: usize) -> Option<T> {
    column.get(i).copied().flatten()
}

/// Parse a date string (e.g., "2024-07-15") to NaiveDate
fn parse_date(date_str: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ForecastError::InvalidTimeFormat(date_str.to_string()))
}

/// Parse a datetime string in ISO 8601 format (e.g., "2024-07-15T05:00") to NaiveDateTime
fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, ForecastError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M")
        .map_err(|_| ForecastError::InvalidTimeFormat(datetime_str.to_string()))
}

/// Picks the hours shown in the hourly strip.
///
/// The window starts at the first hour at or after `now` (or at the first
/// hour when every entry is in the past) and spans up to `HOURLY_WINDOW`
/// consecutive entries.
pub fn hourly_window(hours: &[HourlyForecast], now: NaiveDateTime) -> Range<usize> {
    let start = hours.iter().position(|h| h.time >= now).unwrap_or(0);
    let end = (start + HOURLY_WINDOW).min(hours.len());
    start..end
}

/// Body the API sends with an error status
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: Option<String>,
}

/// Open-Meteo forecast response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current_weather: Option<CurrentWeather>,
    daily: Option<DailyWeather>,
    hourly: Option<HourlyWeather>,
}

/// Current weather block from Open-Meteo
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct DailyWeather {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<i32>>,
}

/// Hourly weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct HourlyWeather {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<i32>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    relativehumidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m: Vec<Option<f64>>,
}
