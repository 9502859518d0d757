use serde::Serialize;

use crate::{
    error::DashboardError,
    location::{LocationSource, Locator},
    model::{Coordinates, WeatherReport},
    provider::{WeatherProvider, demo::demo_report},
};

/// What the dashboard shows after one load cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub report: WeatherReport,
    /// User-facing message when demo data is shown instead of live data.
    pub error: Option<String>,
    pub location_error: bool,
}

impl DashboardState {
    pub fn live(report: WeatherReport) -> Self {
        Self { report, error: None, location_error: false }
    }

    /// Demo report plus the message explaining why.
    pub fn fallback(err: &DashboardError) -> Self {
        Self {
            report: demo_report(),
            error: Some(err.user_message().to_string()),
            location_error: err.is_location_error(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// One locate-then-fetch cycle against a provider.
#[derive(Debug)]
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
    locator: Locator,
    source: LocationSource,
}

impl Dashboard {
    pub fn new(provider: Box<dyn WeatherProvider>, locator: Locator, source: LocationSource) -> Self {
        Self { provider, locator, source }
    }

    /// Like [`Dashboard::load`], but surfaces the failure instead of falling back.
    pub async fn try_load(&self) -> Result<(Coordinates, WeatherReport), DashboardError> {
        let coords = self.locator.resolve(&self.source).await?;
        tracing::debug!(%coords, "location resolved");

        let report = self
            .provider
            .fetch_report(coords)
            .await
            .map_err(DashboardError::Provider)?;

        Ok((coords, report))
    }

    /// Never fails: any error yields the demo report with a message attached.
    pub async fn load(&self) -> DashboardState {
        match self.try_load().await {
            Ok((coords, report)) => {
                tracing::info!(
                    %coords,
                    location = %report.current.location,
                    days = report.forecast.len(),
                    "weather loaded"
                );
                DashboardState::live(report)
            }
            Err(err) => {
                tracing::warn!(error = %err, "weather load failed, showing demo data");
                DashboardState::fallback(&err)
            }
        }
    }
}
