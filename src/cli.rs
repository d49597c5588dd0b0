//! Command-line interface parsing for citywx
//!
//! This module handles parsing of CLI arguments using clap: an optional
//! location to search at startup, the storage and log locations, and the
//! two API endpoints (overridable from the environment for testing).

use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::data::geocode::GEOCODING_BASE_URL;
use crate::data::weather::FORECAST_BASE_URL;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// An endpoint is not an absolute http(s) URL
    #[error("Invalid {name} URL: '{value}' (expected an absolute http or https URL)")]
    InvalidUrl { name: &'static str, value: String },
}

/// citywx - City weather dashboard for the terminal
#[derive(Parser, Debug)]
#[command(name = "citywx")]
#[command(about = "Current conditions, 10-day and 24-hour forecasts for a city")]
#[command(version)]
pub struct Cli {
    /// Location to search at startup, e.g. "Austin, TX" or "Portland Oregon"
    ///
    /// Takes precedence over the remembered location.
    #[arg(value_name = "LOCATION")]
    pub location: Option<String>,

    /// Forget the remembered location before starting
    #[arg(long)]
    pub forget: bool,

    /// Directory for the remembered location (defaults to the XDG data dir)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log file path (defaults to citywx.log in the data directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Geocoding search endpoint
    #[arg(long, value_name = "URL", env = "CITYWX_GEOCODING_URL", default_value = GEOCODING_BASE_URL)]
    pub geocoding_url: String,

    /// Forecast endpoint
    #[arg(long, value_name = "URL", env = "CITYWX_FORECAST_URL", default_value = FORECAST_BASE_URL)]
    pub forecast_url: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Location to search immediately, if one was given
    pub initial_location: Option<String>,
    /// Whether to clear the remembered location first
    pub forget: bool,
    /// Storage directory override
    pub data_dir: Option<PathBuf>,
    /// Log file override
    pub log_file: Option<PathBuf>,
    /// Validated geocoding endpoint
    pub geocoding_url: String,
    /// Validated forecast endpoint
    pub forecast_url: String,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with a blank location dropped
    /// * `Err(CliError)` if either endpoint is not a usable URL
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_location = cli
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Ok(StartupConfig {
            initial_location,
            forget: cli.forget,
            data_dir: cli.data_dir.clone(),
            log_file: cli.log_file.clone(),
            geocoding_url: validate_url("geocoding", &cli.geocoding_url)?,
            forecast_url: validate_url("forecast", &cli.forecast_url)?,
        })
    }
}

/// Checks that `value` is an absolute http or https URL
fn validate_url(name: &'static str, value: &str) -> Result<String, CliError> {
    let invalid = || CliError::InvalidUrl {
        name,
        value: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(value.to_string()),
        _ => Err(invalid()),
    }
}
