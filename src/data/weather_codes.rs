//! WMO weather code table
//!
//! Maps the numeric codes Open-Meteo reports to a display label, an icon
//! asset name and a terminal glyph. Lookup is total: codes missing from the
//! table resolve to a fixed "unknown" entry.

/// A single row of the weather code table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCodeEntry {
    /// WMO weather code
    pub code: i32,
    /// Human-readable description
    pub label: &'static str,
    /// Icon asset file name
    pub icon_asset: &'static str,
    /// Glyph drawn in the terminal in place of the icon
    pub glyph: &'static str,
}

impl WeatherCodeEntry {
    /// Whether this is the fallback entry for unmapped codes
    pub fn is_unknown(&self) -> bool {
        self.code == UNKNOWN.code && self.icon_asset == UNKNOWN.icon_asset
    }

    /// Label for compact cells; the fallback entry reads "Unknown"
    pub fn short_label(&self) -> &'static str {
        if self.is_unknown() {
            "Unknown"
        } else {
            self.label
        }
    }
}

const fn entry(
    code: i32,
    icon_asset: &'static str,
    glyph: &'static str,
    label: &'static str,
) -> WeatherCodeEntry {
    WeatherCodeEntry {
        code,
        label,
        icon_asset,
        glyph,
    }
}

const SUN: &str = "\u{2600}"; // ☀
const SUN_CLOUD: &str = "\u{26C5}"; // ⛅
const CLOUD: &str = "\u{2601}"; // ☁
const FOG: &str = "\u{1F32B}"; // 🌫
const DRIZZLE: &str = "\u{1F326}"; // 🌦
const RAIN: &str = "\u{1F327}"; // 🌧
const SNOW: &str = "\u{2744}"; // ❄
const THUNDER: &str = "\u{26C8}"; // ⛈

const WMO_CODES: &[WeatherCodeEntry] = &[
    entry(0, "0.png", SUN, "Clear sky"),
    entry(1, "2.png", SUN_CLOUD, "Mainly Clear"),
    entry(2, "2.png", SUN_CLOUD, "Partly cloudy"),
    entry(3, "3.png", CLOUD, "Overcast"),
    entry(45, "0.png", FOG, "Fog"),
    entry(48, "0.png", FOG, "Depositing rime fog"),
    entry(51, "0.png", DRIZZLE, "Light drizzle"),
    entry(53, "0.png", DRIZZLE, "Moderate drizzle"),
    entry(55, "0.png", DRIZZLE, "Dense drizzle"),
    entry(56, "0.png", DRIZZLE, "Light freezing drizzle"),
    entry(57, "0.png", DRIZZLE, "Dense freezing drizzle"),
    entry(61, "61.png", RAIN, "Slight rain"),
    entry(63, "61.png", RAIN, "Moderate rain"),
    entry(65, "65.png", RAIN, "Heavy rain"),
    entry(66, "65.png", RAIN, "Light freezing rain"),
    entry(67, "65.png", RAIN, "Heavy freezing rain"),
    entry(71, "71.png", SNOW, "Slight snow"),
    entry(73, "73.png", SNOW, "Moderate snow"),
    entry(75, "73.png", SNOW, "Heavy snow"),
    entry(77, "73.png", SNOW, "Snow grains"),
    entry(80, "73.png", RAIN, "Slight rain showers"),
    entry(81, "73.png", RAIN, "Moderate rain showers"),
    entry(82, "73.png", RAIN, "Violent rain showers"),
    entry(85, "73.png", SNOW, "Slight snow showers"),
    entry(86, "73.png", SNOW, "Heavy snow showers"),
    entry(95, "95.png", THUNDER, "Thunderstorm"),
    entry(96, "95.png", THUNDER, "Thunderstorm with slight hail"),
    entry(99, "95.png", THUNDER, "Thunderstorm with heavy hail"),
];

/// Returned for any code the table does not list
const UNKNOWN: WeatherCodeEntry = entry(-1, "unknown.png", "?", "Unknown conditions");

/// Sky category used to tint the current-conditions panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sky {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Thunder,
    Default,
}

impl Sky {
    /// Groups a weather code into a sky category
    pub fn from_code(code: i32) -> Self {
        match code {
            0 | 1 => Sky::Clear,
            2 | 3 | 45 | 48 => Sky::Cloudy,
            51 | 53 | 55 | 61 | 63 | 65 | 80..=82 => Sky::Rain,
            71 | 73 | 75 | 77 | 85 | 86 => Sky::Snow,
            95 | 96 | 99 => Sky::Thunder,
            _ => Sky::Default,
        }
    }
}

/// Immutable weather code mapping handed to the components that render codes
#[derive(Debug, Clone, Copy)]
pub struct WeatherCodeTable {
    entries: &'static [WeatherCodeEntry],
    unknown: &'static WeatherCodeEntry,
}

impl WeatherCodeTable {
    /// The Open-Meteo WMO code table
    pub const WMO: WeatherCodeTable = WeatherCodeTable {
        entries: WMO_CODES,
        unknown: &UNKNOWN,
    };

    /// Looks up a code, falling back to the unknown entry
    pub fn resolve(&self, code: i32) -> &'static WeatherCodeEntry {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .unwrap_or(self.unknown)
    }

    /// Looks up an optional code; a missing code resolves to the unknown entry
    pub fn resolve_opt(&self, code: Option<i32>) -> &'static WeatherCodeEntry {
        code.map_or(self.unknown, |c| self.resolve(c))
    }
}
