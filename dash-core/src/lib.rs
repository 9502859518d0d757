//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - The forecast aggregator that turns 3-hour samples into daily summaries
//! - Condition normalization onto a small fixed vocabulary
//! - Weather providers (OpenWeather, static demo data) and location resolution
//! - The load cycle that falls back to demo data on failure
//! - Configuration & credentials handling
//!
//! It is used by `weather-dash-cli`, but can also be reused by other front-ends.

pub mod aggregate;
pub mod condition;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;

pub use aggregate::{FORECAST_DAYS, aggregate, aggregate_days};
pub use condition::Condition;
pub use config::{Config, ProviderConfig};
pub use dashboard::{Dashboard, DashboardState};
pub use error::{DashboardError, LocationError};
pub use location::{LocationSource, Locator};
pub use model::{
    Coordinates, CurrentConditions, ForecastDay, Sample, Units, View, WeatherReport,
};
pub use provider::{ProviderId, WeatherProvider};
