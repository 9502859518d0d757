use thiserror::Error;

/// Failure to determine where the user is.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("No location available: {0}")]
    Unavailable(String),

    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("No place found matching '{0}'")]
    NotFound(String),

    #[error("Location lookup failed: {0:#}")]
    Lookup(anyhow::Error),
}

/// Why a dashboard load fell back to demo data.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Weather provider failed: {0:#}")]
    Provider(anyhow::Error),
}

impl DashboardError {
    /// Message shown to the user next to the fallback data.
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::Location(_) => {
                "Unable to retrieve location. Please enable location services or pass --lat/--lon."
            }
            DashboardError::Provider(_) => "Unable to load weather data",
        }
    }

    pub fn is_location_error(&self) -> bool {
        matches!(self, DashboardError::Location(_))
    }
}
