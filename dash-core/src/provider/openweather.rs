use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    aggregate::aggregate,
    condition::Condition,
    model::{
        Coordinates, CurrentConditions, DEFAULT_ICON, Sample, Units, WeatherReport,
        round_half_up,
    },
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: Units,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, units: Units) -> Self {
        Self::with_base_url(api_key, units, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(api_key: String, units: Units, base_url: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            units,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, what, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }

    fn point_query(&self, coords: Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("units", self.units.as_str().to_string()),
        ]
    }

    async fn fetch_current(&self, coords: Coordinates) -> Result<CurrentConditions> {
        let parsed: OwCurrentResponse = self
            .get_json("/data/2.5/weather", "current weather", &self.point_query(coords))
            .await?;

        Ok(current_from_response(parsed, self.units))
    }

    async fn fetch_forecast(&self, coords: Coordinates) -> Result<Vec<Sample>> {
        let parsed: OwForecastResponse = self
            .get_json("/data/2.5/forecast", "5-day forecast", &self.point_query(coords))
            .await?;

        Ok(samples_from_entries(parsed.list))
    }

    /// Resolve a place name to coordinates with the direct geocoding API.
    /// `Ok(None)` means the lookup worked but nothing matched.
    pub async fn geocode(&self, place: &str) -> Result<Option<Coordinates>> {
        let matches: Vec<OwGeocodeEntry> = self
            .get_json(
                "/geo/1.0/direct",
                "geocoding",
                &[("q", place.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        Ok(matches.into_iter().next().map(|entry| {
            tracing::debug!(place, name = %entry.name, "geocoded place");
            Coordinates::new(entry.lat, entry.lon)
        }))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: Option<String>,
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: Option<i64>,
    dt_txt: Option<String>,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeocodeEntry {
    name: String,
    lat: f64,
    lon: f64,
}

fn current_from_response(parsed: OwCurrentResponse, units: Units) -> CurrentConditions {
    let weather = parsed.weather.into_iter().next();

    let location = match parsed.sys.country {
        Some(country) if !country.is_empty() => format!("{}, {}", parsed.name, country),
        _ => parsed.name,
    };

    // Metric speeds arrive in m/s; imperial already in mph.
    let wind_speed = match units {
        Units::Metric => parsed.wind.speed * 3.6,
        Units::Imperial => parsed.wind.speed,
    };

    let (condition, description, icon) = match weather {
        Some(w) => (
            Condition::from_optional(w.main.as_deref()),
            w.description,
            w.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        ),
        None => (Condition::Clear, String::new(), DEFAULT_ICON.to_string()),
    };

    CurrentConditions {
        location,
        temperature: round_half_up(parsed.main.temp),
        condition,
        humidity: parsed.main.humidity,
        wind_speed: round_half_up(wind_speed),
        description,
        icon,
    }
}

/// `None` when neither `dt_txt` nor `dt` yields a timestamp.
fn sample_from_entry(entry: OwForecastEntry) -> Option<Sample> {
    let timestamp = entry
        .dt_txt
        .as_deref()
        .and_then(|txt| NaiveDateTime::parse_from_str(txt, DT_TXT_FORMAT).ok())
        .or_else(|| entry.dt.and_then(unix_to_naive))?;

    let weather = entry.weather.into_iter().next();

    Some(Sample {
        timestamp,
        temp_min: entry.main.temp_min,
        temp_max: entry.main.temp_max,
        condition: weather.as_ref().and_then(|w| w.main.clone()),
        icon: weather.and_then(|w| w.icon),
    })
}

fn samples_from_entries(entries: Vec<OwForecastEntry>) -> Vec<Sample> {
    let total = entries.len();
    let samples: Vec<Sample> = entries.into_iter().filter_map(sample_from_entry).collect();

    if samples.len() < total {
        tracing::warn!(
            skipped = total - samples.len(),
            "dropped forecast entries without a usable timestamp"
        );
    }

    samples
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_report(&self, coords: Coordinates) -> Result<WeatherReport> {
        let (current, samples) =
            tokio::try_join!(self.fetch_current(coords), self.fetch_forecast(coords))?;

        let forecast = aggregate(&samples);
        tracing::debug!(
            location = %current.location,
            days = forecast.len(),
            "OpenWeather report ready"
        );

        Ok(WeatherReport { units: self.units, current, forecast })
    }
}

/// Parse a raw `/data/2.5/forecast` payload into samples.
pub fn samples_from_forecast_json(body: &str) -> Result<Vec<Sample>> {
    let parsed: OwForecastResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather forecast JSON")?;

    Ok(samples_from_entries(parsed.list))
}

fn unix_to_naive(ts: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
