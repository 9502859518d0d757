use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};

use crate::{
    condition::Condition,
    model::{Coordinates, CurrentConditions, ForecastDay, Units, WeatherReport},
};

use super::WeatherProvider;

/// Serves the static demo report regardless of location.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoProvider;

#[async_trait]
impl WeatherProvider for DemoProvider {
    async fn fetch_report(&self, _coords: Coordinates) -> Result<WeatherReport> {
        Ok(demo_report())
    }
}

/// Fixed report shown when location or provider lookups fail. Always metric.
pub fn demo_report() -> WeatherReport {
    demo_report_from(Local::now().date_naive())
}

/// Demo report with forecast dates counted from `today`. The day labels are
/// fixed and do not follow the real calendar.
pub fn demo_report_from(today: NaiveDate) -> WeatherReport {
    let days = [
        ("Today", 24, 18, Condition::Clear, "01d"),
        ("Tomorrow", 26, 19, Condition::Cloudy, "02d"),
        ("Wednesday", 23, 17, Condition::Cloudy, "03d"),
        ("Thursday", 21, 16, Condition::Rain, "09d"),
        ("Friday", 25, 20, Condition::Clear, "01d"),
    ];

    let forecast = days
        .into_iter()
        .zip(0..)
        .map(|((day, high, low, condition, icon), offset)| ForecastDay {
            date: today + Duration::days(offset),
            day: day.to_string(),
            high,
            low,
            condition,
            icon: icon.to_string(),
        })
        .collect();

    WeatherReport {
        units: Units::Metric,
        current: CurrentConditions {
            location: "San Francisco, CA".to_string(),
            temperature: 22,
            condition: Condition::Clear,
            humidity: 65,
            wind_speed: 12,
            description: "Clear skies with gentle breeze".to_string(),
            icon: "01d".to_string(),
        },
        forecast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_report_has_five_days() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let report = demo_report_from(today);

        assert_eq!(report.current.location, "San Francisco, CA");
        assert_eq!(report.units, Units::Metric);
        assert_eq!(report.forecast.len(), 5);
        assert_eq!(report.forecast[0].day, "Today");
        assert_eq!(report.forecast[0].date, today);
        assert_eq!(report.forecast[3].condition, Condition::Rain);
        assert_eq!(
            report.forecast[4].date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[tokio::test]
    async fn demo_provider_ignores_coordinates() {
        let report = DemoProvider
            .fetch_report(Coordinates::new(51.5, -0.12))
            .await
            .unwrap();
        assert_eq!(report.current.temperature, 22);
    }
}
