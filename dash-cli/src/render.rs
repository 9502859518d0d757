use std::fmt::Write;

use weather_dash_core::{View, WeatherReport};

/// Plain-text rendering of one dashboard panel, labelled in the report's own units.
pub fn render(report: &WeatherReport, view: View) -> String {
    match view {
        View::Current => render_current(report),
        View::Weekly => render_weekly(report),
    }
}

fn render_current(report: &WeatherReport) -> String {
    let current = &report.current;
    let units = report.units;
    let mut out = String::new();

    let _ = writeln!(out, "{}", current.location);
    if !current.description.is_empty() {
        let _ = writeln!(out, "{}", current.description);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}  {}{}  {}",
        current.condition.symbol(),
        current.temperature,
        units.temperature_suffix(),
        current.condition.label()
    );
    let _ = writeln!(out, "Humidity  {}%", current.humidity);
    let _ = writeln!(out, "Wind      {} {}", current.wind_speed, units.speed_suffix());

    out
}

fn render_weekly(report: &WeatherReport) -> String {
    let mut out = String::new();

    if report.forecast.is_empty() {
        out.push_str("No forecast available\n");
        return out;
    }

    for day in &report.forecast {
        let _ = writeln!(
            out,
            "{:<10} {}  {:<13} {:>4}° / {}°",
            day.day,
            day.condition.symbol(),
            day.condition.label(),
            day.high,
            day.low
        );
    }

    out
}
