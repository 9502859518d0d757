//! Works out which point on the map the dashboard reports on.

use crate::{
    Config, ProviderId,
    error::LocationError,
    model::Coordinates,
    provider::openweather::OpenWeatherProvider,
};

/// Where the user's position comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Coordinates(Coordinates),
    Place(String),
    None,
}

impl LocationSource {
    /// Explicit coordinates win, then an explicit place, then the configured default place.
    pub fn pick(
        coordinates: Option<Coordinates>,
        place: Option<String>,
        config: &Config,
    ) -> LocationSource {
        match (coordinates, place.or_else(|| config.default_place.clone())) {
            (Some(coords), _) => LocationSource::Coordinates(coords),
            (None, Some(place)) => LocationSource::Place(place),
            (None, None) => LocationSource::None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Locator {
    geocoder: Option<OpenWeatherProvider>,
}

impl Locator {
    pub fn new(geocoder: Option<OpenWeatherProvider>) -> Self {
        Self { geocoder }
    }

    /// Locator that geocodes through OpenWeather when a key is configured.
    pub fn from_config(config: &Config) -> Self {
        let geocoder = config
            .provider_api_key(ProviderId::OpenWeather)
            .map(|key| OpenWeatherProvider::new(key.to_owned(), config.units));

        Self::new(geocoder)
    }

    pub async fn resolve(&self, source: &LocationSource) -> Result<Coordinates, LocationError> {
        match source {
            LocationSource::Coordinates(coords) => validate(*coords),
            LocationSource::Place(place) => {
                let place = place.trim();
                if place.is_empty() {
                    return Err(LocationError::Unavailable("empty place name".into()));
                }

                let geocoder = self.geocoder.as_ref().ok_or_else(|| {
                    LocationError::Unavailable(
                        "place lookup needs an OpenWeather API key".into(),
                    )
                })?;

                let coords = geocoder
                    .geocode(place)
                    .await
                    .map_err(LocationError::Lookup)?
                    .ok_or_else(|| LocationError::NotFound(place.to_string()))?;

                validate(coords)
            }
            LocationSource::None => Err(LocationError::Unavailable(
                "no coordinates or place given".into(),
            )),
        }
    }
}

fn validate(coords: Coordinates) -> Result<Coordinates, LocationError> {
    let Coordinates { latitude, longitude } = coords;

    if latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
    {
        Ok(coords)
    } else {
        Err(LocationError::InvalidCoordinates { latitude, longitude })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Units;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn explicit_coordinates_are_validated() {
        let locator = Locator::default();

        let ok = locator
            .resolve(&LocationSource::Coordinates(Coordinates::new(47.6, -122.3)))
            .await;
        assert_eq!(ok.unwrap(), Coordinates::new(47.6, -122.3));

        let err = locator
            .resolve(&LocationSource::Coordinates(Coordinates::new(91.0, 0.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::InvalidCoordinates { .. }));

        let err = locator
            .resolve(&LocationSource::Coordinates(Coordinates::new(f64::NAN, 0.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::InvalidCoordinates { .. }));
    }

    #[tokio::test]
    async fn no_source_is_unavailable() {
        let err = Locator::default()
            .resolve(&LocationSource::None)
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
    }

    #[tokio::test]
    async fn place_without_geocoder_is_unavailable() {
        let err = Locator::default()
            .resolve(&LocationSource::Place("Paris".into()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn place_is_geocoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "Paris", "lat": 48.8589, "lon": 2.32, "country": "FR" }
            ])))
            .mount(&server)
            .await;

        let locator = Locator::new(Some(OpenWeatherProvider::with_base_url(
            "KEY".into(),
            Units::Metric,
            &server.uri(),
        )));

        let coords = locator
            .resolve(&LocationSource::Place("Paris".into()))
            .await
            .unwrap();
        assert_eq!(coords, Coordinates::new(48.8589, 2.32));
    }

    #[tokio::test]
    async fn unknown_place_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let locator = Locator::new(Some(OpenWeatherProvider::with_base_url(
            "KEY".into(),
            Units::Metric,
            &server.uri(),
        )));

        let err = locator
            .resolve(&LocationSource::Place("Atlantis".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::NotFound(ref p) if p == "Atlantis"));
    }

    #[test]
    fn pick_prefers_coordinates_then_place_then_config() {
        let mut cfg = Config::default();
        cfg.default_place = Some("Oslo".into());

        let coords = Coordinates::new(1.0, 2.0);
        assert_eq!(
            LocationSource::pick(Some(coords), Some("Rome".into()), &cfg),
            LocationSource::Coordinates(coords)
        );
        assert_eq!(
            LocationSource::pick(None, Some("Rome".into()), &cfg),
            LocationSource::Place("Rome".into())
        );
        assert_eq!(
            LocationSource::pick(None, None, &cfg),
            LocationSource::Place("Oslo".into())
        );
        assert_eq!(
            LocationSource::pick(None, None, &Config::default()),
            LocationSource::None
        );
    }
}
