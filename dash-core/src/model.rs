use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::condition::Condition;

/// Icon code used when a provider sample carries none.
pub const DEFAULT_ICON: &str = "01d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// Unit system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Imperial => "mph",
        }
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// Which dashboard panel is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Current,
    Weekly,
}

impl View {
    pub fn toggle(self) -> View {
        match self {
            View::Current => View::Weekly,
            View::Weekly => View::Current,
        }
    }
}

/// One 3-hour observation from the upstream forecast feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Local date and time as reported by the provider; no timezone applied.
    pub timestamp: NaiveDateTime,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition: Option<String>,
    pub icon: Option<String>,
}

/// One finalized day of the forecast summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: String,
    pub high: i64,
    pub low: i64,
    pub condition: Condition,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub location: String,
    pub temperature: i64,
    pub condition: Condition,
    pub humidity: u8,
    pub wind_speed: i64,
    pub description: String,
    pub icon: String,
}

/// Everything the dashboard displays for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Unit system the temperatures and wind speed are expressed in.
    #[serde(default)]
    pub units: Units,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

/// Round half towards positive infinity, so `2.5 -> 3` and `-2.5 -> -2`.
pub(crate) fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}
