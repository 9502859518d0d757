use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::{
    fmt,
    io::{self, Read},
    path::{Path, PathBuf},
};
use weather_dash_core::{
    Config, Coordinates, Dashboard, DashboardState, LocationSource, Locator, ProviderId, Units,
    View, WeatherProvider, aggregate,
    provider::{
        default_provider_from_config, demo::DemoProvider, openweather::samples_from_forecast_json,
        provider_from_config,
    },
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Current,
    Weekly,
}

impl From<ViewArg> for View {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Current => View::Current,
            ViewArg::Weekly => View::Weekly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for Units {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Metric => Units::Metric,
            UnitsArg::Imperial => Units::Imperial,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferences.
    Configure {
        /// Unit system to request from the provider.
        #[arg(long, value_enum)]
        units: Option<UnitsArg>,
    },

    /// Load the dashboard once and print it.
    Show {
        /// Latitude in degrees; requires --lon.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees; requires --lat.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Place name to geocode, e.g. "Berlin, DE".
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        place: Option<String>,

        /// Panel to print.
        #[arg(long, value_enum, default_value = "current")]
        view: ViewArg,

        /// Provider short name: "openweather" or "demo".
        #[arg(long)]
        provider: Option<String>,

        /// Override the configured unit system.
        #[arg(long, value_enum)]
        units: Option<UnitsArg>,

        /// Print the whole dashboard state as JSON.
        #[arg(long)]
        json: bool,

        /// Keep the dashboard open to toggle the view or refresh.
        #[arg(long, short, conflicts_with = "json")]
        interactive: bool,
    },

    /// Aggregate a saved OpenWeather forecast payload into daily summaries.
    Aggregate {
        /// Path to the JSON payload, or "-" for stdin.
        file: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { units } => configure(units),
            Command::Show { lat, lon, place, view, provider, units, json, interactive } => {
                let mut config = Config::load()?;
                if let Some(units) = units {
                    config.units = units.into();
                }

                let coordinates = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                let source = LocationSource::pick(coordinates, place, &config);
                let provider = select_provider(provider.as_deref(), &config)?;

                let dashboard = Dashboard::new(provider, Locator::from_config(&config), source);
                let state = dashboard.load().await;

                if interactive {
                    run_interactive(&dashboard, state, view.into()).await
                } else {
                    print_state(&state, view.into(), json)
                }
            }
            Command::Aggregate { file } => {
                let body = read_input(&file)?;
                let samples = samples_from_forecast_json(&body)?;
                let days = aggregate(&samples);

                println!("{}", serde_json::to_string_pretty(&days)?);
                Ok(())
            }
        }
    }
}

/// Explicit provider names must resolve; an unset default falls back to demo data.
fn select_provider(name: Option<&str>, config: &Config) -> Result<Box<dyn WeatherProvider>> {
    match name {
        Some(name) => provider_from_config(ProviderId::try_from(name)?, config),
        None => Ok(default_provider_from_config(config).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "no usable provider configured, using demo data");
            let fallback: Box<dyn WeatherProvider> = Box::new(DemoProvider);
            fallback
        })),
    }
}

fn print_state(state: &DashboardState, view: View, json: bool) -> Result<()> {
    if state.is_fallback() {
        let message = state.error.as_deref().unwrap_or_default();
        eprintln!("{message} (showing demo data)");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
    } else {
        print!("{}", render::render(&state.report, view));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ToggleView,
    Refresh,
    Quit,
}

impl Action {
    const ALL: [Action; 3] = [Action::ToggleView, Action::Refresh, Action::Quit];

    /// View shown after the action; refreshing keeps the current one.
    fn next_view(self, view: View) -> View {
        match self {
            Action::ToggleView => view.toggle(),
            Action::Refresh | Action::Quit => view,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ToggleView => "Toggle current/weekly",
            Action::Refresh => "Refresh",
            Action::Quit => "Quit",
        })
    }
}

async fn run_interactive(
    dashboard: &Dashboard,
    mut state: DashboardState,
    mut view: View,
) -> Result<()> {
    loop {
        print_state(&state, view, false)?;
        println!();

        let action = Select::new("Next:", Action::ALL.to_vec())
            .prompt()
            .context("Failed to read dashboard action")?;

        view = action.next_view(view);
        match action {
            Action::Refresh => state = dashboard.load().await,
            Action::Quit => return Ok(()),
            Action::ToggleView => {}
        }
    }
}

fn configure(units: Option<UnitsArg>) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(ProviderId::OpenWeather, api_key.to_string());
    config.set_default_provider(ProviderId::OpenWeather);

    let place = Text::new("Default place (leave empty to skip):")
        .with_default(config.default_place.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read default place")?;
    let place = place.trim();
    config.default_place = (!place.is_empty()).then(|| place.to_string());

    if let Some(units) = units {
        config.units = units.into();
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read forecast payload from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read forecast payload: {}", file.display()))
    }
}
