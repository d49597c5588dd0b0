//! Presentation state
//!
//! `Presenter` owns the text of every output panel (header, temperature,
//! description, 10-day grid, 24-hour strip) and moves between the idle,
//! searching, resolved and error states in response to pipeline results.
//! The renderer in `ui` only reads these panels.

use chrono::NaiveDateTime;

use crate::data::{
    hourly_window, DailyForecast, ForecastSnapshot, HourlyForecast, Sky, WeatherCodeEntry,
    WeatherCodeTable,
};

/// Header shown before any search
pub const IDLE_HEADER: &str = "Search a city to begin";
/// Header shown while a search is running
pub const SEARCHING_HEADER: &str = "Searching…";
/// Header shown when geocoding found nothing
pub const NOT_FOUND_HEADER: &str = "Location not found";
/// Header shown when geocoding failed
pub const FIND_ERROR_HEADER: &str = "Error finding location";
/// Description shown when the forecast could not be loaded
pub const FORECAST_ERROR_TEXT: &str = "Error loading weather";

/// Which failure put the display into the error state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Geocoding returned no places
    NotFound,
    /// Geocoding request failed
    GeocodeFailed,
    /// Forecast request failed
    ForecastFailed,
}

/// Display state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    /// No location yet
    Idle,
    /// A search or forecast fetch is running
    Searching,
    /// Panels show a forecast
    Resolved,
    /// The last request failed
    Error(ErrorKind),
}

/// Current-conditions description: icon plus label, or a plain message
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    /// Weather entry the description was built from, if any
    pub entry: Option<&'static WeatherCodeEntry>,
    /// Text to show
    pub text: String,
}

/// One cell of the 10-day grid
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    /// e.g. "Tue, Jul 15"
    pub day: String,
    pub entry: &'static WeatherCodeEntry,
    /// Label shown under the icon
    pub label: &'static str,
    /// e.g. "High: 96°F"
    pub high: String,
    /// e.g. "Low: 75°F"
    pub low: String,
    /// Rounded high, for coloring
    pub high_value: Option<f64>,
}

/// One cell of the 24-hour strip
#[derive(Debug, Clone, PartialEq)]
pub struct HourCell {
    /// e.g. "3 PM"
    pub time: String,
    pub entry: &'static WeatherCodeEntry,
    /// Label shown next to the icon
    pub label: &'static str,
    /// Available parts among temperature, precipitation chance and wind
    pub details: String,
    /// Raw temperature, for the sparkline
    pub temperature: Option<f64>,
}

/// The output panels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panels {
    pub header: String,
    pub temperature: String,
    pub description: Option<Description>,
    pub sky: Option<Sky>,
    pub forecast: Vec<DayCell>,
    pub hourly: Vec<HourCell>,
}

impl Panels {
    fn clear_forecast_and_hourly(&mut self) {
        self.forecast.clear();
        self.hourly.clear();
    }

    fn clear_current(&mut self) {
        self.temperature.clear();
        self.description = None;
        self.sky = None;
    }
}

/// Owns the panels and the display state
#[derive(Debug, Clone)]
pub struct Presenter {
    state: UiState,
    panels: Panels,
    codes: WeatherCodeTable,
}

impl Presenter {
    /// Creates a presenter in the idle state
    pub fn new(codes: WeatherCodeTable) -> Self {
        Self {
            state: UiState::Idle,
            panels: Panels {
                header: IDLE_HEADER.to_string(),
                ..Panels::default()
            },
            codes,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    /// Clears every panel and shows the searching header
    pub fn show_searching(&mut self) {
        self.state = UiState::Searching;
        self.panels.header = SEARCHING_HEADER.to_string();
        self.panels.clear_current();
        self.panels.clear_forecast_and_hourly();
    }

    /// Shows a chosen location's label while its forecast loads
    pub fn show_location(&mut self, display: &str) {
        self.state = UiState::Searching;
        self.panels.header = display.to_string();
    }

    pub fn show_not_found(&mut self) {
        self.state = UiState::Error(ErrorKind::NotFound);
        self.panels.header = NOT_FOUND_HEADER.to_string();
        self.panels.clear_current();
        self.panels.clear_forecast_and_hourly();
    }

    pub fn show_find_error(&mut self) {
        self.state = UiState::Error(ErrorKind::GeocodeFailed);
        self.panels.header = FIND_ERROR_HEADER.to_string();
        self.panels.clear_forecast_and_hourly();
    }

    /// Keeps the header; replaces the description with an error message
    pub fn show_forecast_error(&mut self) {
        self.state = UiState::Error(ErrorKind::ForecastFailed);
        self.panels.temperature.clear();
        self.panels.sky = None;
        self.panels.description = Some(Description {
            entry: None,
            text: FORECAST_ERROR_TEXT.to_string(),
        });
        self.panels.clear_forecast_and_hourly();
    }

    /// Replaces every panel below the header with `snapshot`
    ///
    /// `now` is the wall-clock time at the location and picks the first hour
    /// of the 24-hour strip.
    pub fn show_snapshot(&mut self, snapshot: &ForecastSnapshot, now: NaiveDateTime) {
        self.state = UiState::Resolved;

        match &snapshot.current {
            Some(current) => {
                let entry = self.codes.resolve(current.code);
                self.panels.temperature = fahrenheit(current.temperature);
                self.panels.description = Some(Description {
                    entry: Some(entry),
                    text: entry.label.to_string(),
                });
                self.panels.sky = Some(Sky::from_code(current.code));
            }
            None => self.panels.clear_current(),
        }

        self.panels.forecast = snapshot
            .daily
            .iter()
            .map(|day| self.day_cell(day))
            .collect();

        let window = hourly_window(&snapshot.hourly, now);
        self.panels.hourly = snapshot.hourly[window]
            .iter()
            .map(|hour| self.hour_cell(hour))
            .collect();
    }

    fn day_cell(&self, day: &DailyForecast) -> DayCell {
        let entry = self.codes.resolve_opt(day.code);
        DayCell {
            day: day.date.format("%a, %b %-d").to_string(),
            entry,
            label: entry.short_label(),
            high: format!("High: {}", fahrenheit_opt(day.max)),
            low: format!("Low: {}", fahrenheit_opt(day.min)),
            high_value: day.max,
        }
    }

    fn hour_cell(&self, hour: &HourlyForecast) -> HourCell {
        let entry = self.codes.resolve_opt(hour.code);
        let label = if entry.is_unknown() { "—" } else { entry.label };

        let details = [
            hour.temperature.map(fahrenheit),
            hour.precip_probability.map(|p| format!("{}%", round(p))),
            hour.wind_speed.map(|w| format!("{} km/h", round(w))),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");

        HourCell {
            time: hour.time.format("%-I %p").to_string(),
            entry,
            label,
            details,
            temperature: hour.temperature,
        }
    }
}

/// Rounds to the nearest integer, halves toward positive infinity, never "-0"
fn round(value: f64) -> i64 {
    let rounded = (value + 0.5).floor() as i64;
    if rounded == 0 {
        0
    } else {
        rounded
    }
}

/// Formats a Fahrenheit temperature, e.g. "72°F"
fn fahrenheit(value: f64) -> String {
    format!("{}°F", round(value))
}

fn fahrenheit_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), fahrenheit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CurrentConditions;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid datetime")
    }

    fn snapshot(hours: usize) -> ForecastSnapshot {
        ForecastSnapshot {
            current: Some(CurrentConditions {
                temperature: 71.6,
                code: 61,
            }),
            daily: (0..10)
                .map(|i| DailyForecast {
                    date: start().date() + Duration::days(i),
                    max: Some(95.5),
                    min: Some(74.4),
                    code: Some(2),
                })
                .collect(),
            hourly: (0..hours)
                .map(|i| HourlyForecast {
                    time: start() + Duration::hours(i as i64),
                    temperature: Some(80.0 + i as f64 / 10.0),
                    code: Some(0),
                    precip_probability: Some(20.0),
                    precipitation: Some(0.0),
                    humidity: Some(50.0),
                    wind_speed: Some(8.4),
                })
                .collect(),
            utc_offset_seconds: -18000,
        }
    }

    #[test]
    fn test_new_presenter_is_idle() {
        let presenter = Presenter::new(WeatherCodeTable::WMO);
        assert_eq!(presenter.state(), UiState::Idle);
        assert_eq!(presenter.panels().header, IDLE_HEADER);
    }

    #[test]
    fn test_searching_clears_all_panels() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        presenter.show_snapshot(&snapshot(48), start());
        presenter.show_searching();

        let panels = presenter.panels();
        assert_eq!(presenter.state(), UiState::Searching);
        assert_eq!(panels.header, SEARCHING_HEADER);
        assert!(panels.temperature.is_empty());
        assert!(panels.description.is_none());
        assert!(panels.forecast.is_empty());
        assert!(panels.hourly.is_empty());
    }

    #[test]
    fn test_snapshot_populates_panels() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        presenter.show_location("Austin, TX");
        presenter.show_snapshot(&snapshot(240), start() + Duration::minutes(30));

        let panels = presenter.panels();
        assert_eq!(presenter.state(), UiState::Resolved);
        assert_eq!(panels.header, "Austin, TX");
        assert_eq!(panels.temperature, "72°F");
        let description = panels.description.as_ref().expect("description");
        assert_eq!(description.text, "Slight rain");
        assert_eq!(panels.sky, Some(Sky::Rain));

        assert_eq!(panels.forecast.len(), 10);
        assert_eq!(panels.forecast[0].day, "Mon, Jul 15");
        assert_eq!(panels.forecast[0].high, "High: 96°F");
        assert_eq!(panels.forecast[0].low, "Low: 74°F");

        assert_eq!(panels.hourly.len(), 24);
        assert_eq!(panels.hourly[0].time, "1 AM");
        assert_eq!(panels.hourly[0].details, "80°F · 20% · 8 km/h");
    }

    #[test]
    fn test_hourly_strip_starts_at_first_future_hour() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        let now = start() + Duration::hours(49) + Duration::minutes(1);
        presenter.show_snapshot(&snapshot(240), now);

        let hourly = &presenter.panels().hourly;
        assert_eq!(hourly.len(), 24);
        // Entry 50 is 02:00 on the third day
        assert_eq!(hourly[0].time, "2 AM");
        assert_eq!(hourly[0].temperature, Some(85.0));
    }

    #[test]
    fn test_hourly_strip_all_past_starts_at_beginning() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        presenter.show_snapshot(&snapshot(240), start() + Duration::days(60));

        let hourly = &presenter.panels().hourly;
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly[0].time, "12 AM");
    }

    #[test]
    fn test_hourly_strip_shorter_than_window() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        presenter.show_snapshot(&snapshot(5), start());
        assert_eq!(presenter.panels().hourly.len(), 5);
    }

    #[test]
    fn test_snapshot_without_current_clears_current_panels() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        presenter.show_snapshot(&snapshot(24), start());

        let mut no_current = snapshot(24);
        no_current.current = None;
        presenter.show_snapshot(&no_current, start());

        assert!(presenter.panels().temperature.is_empty());
        assert!(presenter.panels().description.is_none());
        assert_eq!(presenter.state(), UiState::Resolved);
    }

    #[test]
    fn test_unknown_codes_and_missing_values() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        let mut snap = snapshot(1);
        snap.daily[0].code = Some(42);
        snap.daily[0].min = None;
        snap.hourly[0] = HourlyForecast {
            time: start(),
            temperature: None,
            code: None,
            precip_probability: Some(0.0),
            precipitation: None,
            humidity: None,
            wind_speed: None,
        };
        presenter.show_snapshot(&snap, start());

        let panels = presenter.panels();
        assert_eq!(panels.forecast[0].label, "Unknown");
        assert_eq!(panels.forecast[0].low, "Low: --");
        assert_eq!(panels.hourly[0].label, "—");
        assert_eq!(panels.hourly[0].details, "0%");
    }

    #[test]
    fn test_not_found_clears_everything() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        presenter.show_snapshot(&snapshot(24), start());
        presenter.show_not_found();

        let panels = presenter.panels();
        assert_eq!(presenter.state(), UiState::Error(ErrorKind::NotFound));
        assert_eq!(panels.header, NOT_FOUND_HEADER);
        assert!(panels.temperature.is_empty());
        assert!(panels.forecast.is_empty());
    }

    #[test]
    fn test_find_error_sets_header() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        presenter.show_searching();
        presenter.show_find_error();
        assert_eq!(presenter.state(), UiState::Error(ErrorKind::GeocodeFailed));
        assert_eq!(presenter.panels().header, FIND_ERROR_HEADER);
    }

    #[test]
    fn test_forecast_error_keeps_header() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        presenter.show_location("Boise, ID");
        presenter.show_snapshot(&snapshot(24), start());
        presenter.show_forecast_error();

        let panels = presenter.panels();
        assert_eq!(presenter.state(), UiState::Error(ErrorKind::ForecastFailed));
        assert_eq!(panels.header, "Boise, ID");
        assert!(panels.temperature.is_empty());
        assert_eq!(
            panels.description.as_ref().map(|d| d.text.as_str()),
            Some(FORECAST_ERROR_TEXT)
        );
        assert!(panels.forecast.is_empty());
        assert!(panels.hourly.is_empty());
    }

    #[test]
    fn test_round_never_negative_zero() {
        assert_eq!(fahrenheit(-0.4), "0°F");
        assert_eq!(fahrenheit(-0.6), "-1°F");
        assert_eq!(fahrenheit(72.5), "73°F");
    }

    #[test]
    fn test_negative_halves_round_up() {
        assert_eq!(fahrenheit(-2.5), "-2°F");
        assert_eq!(fahrenheit(-0.5), "0°F");
        assert_eq!(fahrenheit(-2.6), "-3°F");
        assert_eq!(round(-7.5), -7);
    }

    #[test]
    fn test_snapshot_icons_come_from_code_table() {
        let mut presenter = Presenter::new(WeatherCodeTable::WMO);
        let mut snap = snapshot(1);
        snap.daily[0].code = Some(42);
        presenter.show_snapshot(&snap, start());

        let panels = presenter.panels();
        let current = panels.description.as_ref().and_then(|d| d.entry);
        assert_eq!(current.map(|e| e.icon_asset), Some("61.png"));
        assert_eq!(panels.forecast[0].entry.icon_asset, "unknown.png");
        assert_eq!(panels.forecast[1].entry.icon_asset, "2.png");
        assert_eq!(panels.hourly[0].entry.icon_asset, "0.png");
    }
}
