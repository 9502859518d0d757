use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// Normalized weather condition shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Thunderstorm,
    Snow,
}

/// Provider condition keyword (lowercase) -> normalized condition.
const CONDITION_TABLE: &[(&str, Condition)] = &[
    ("clear", Condition::Clear),
    ("clouds", Condition::Cloudy),
    ("rain", Condition::Rain),
    ("drizzle", Condition::Rain),
    ("thunderstorm", Condition::Thunderstorm),
    ("snow", Condition::Snow),
    ("mist", Condition::Cloudy),
    ("fog", Condition::Cloudy),
    ("haze", Condition::Cloudy),
    ("smoke", Condition::Cloudy),
    ("dust", Condition::Cloudy),
    ("sand", Condition::Cloudy),
    ("ash", Condition::Cloudy),
    ("squall", Condition::Rain),
    ("tornado", Condition::Thunderstorm),
    // Normalized names map onto themselves.
    ("cloudy", Condition::Cloudy),
];

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "clear",
            Condition::Cloudy => "cloudy",
            Condition::Rain => "rain",
            Condition::Thunderstorm => "thunderstorm",
            Condition::Snow => "snow",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Cloudy,
            Condition::Rain,
            Condition::Thunderstorm,
            Condition::Snow,
        ]
    }

    /// Map a provider's free-text primary condition (e.g. OpenWeather's
    /// `weather[].main`) onto the fixed vocabulary. Case-insensitive;
    /// anything unrecognized is `Clear`.
    pub fn normalize(raw: &str) -> Condition {
        let key = raw.trim().to_lowercase();

        CONDITION_TABLE
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, condition)| *condition)
            .unwrap_or_default()
    }

    /// Like [`Condition::normalize`], treating a missing value as `Clear`.
    pub fn from_optional(raw: Option<&str>) -> Condition {
        raw.map(Condition::normalize).unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Cloudy => "Cloudy",
            Condition::Rain => "Rain",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Snow => "Snow",
        }
    }

    /// Glyph used by the terminal views.
    pub fn symbol(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Cloudy => "☁️",
            Condition::Rain => "🌧️",
            Condition::Thunderstorm => "⛈️",
            Condition::Snow => "❄️",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Condition::normalize(s))
    }
}
