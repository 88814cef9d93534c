use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::{info, warn};
use weatherapp_core::{
    ApiUrlBuilder, Config, Coordinates, Units, WeatherProvider, WeatherSession, WeatherView,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherapp", version, about = "Weather home screen for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure API key, units and language.
    Configure,

    /// Show current weather and forecasts for a location.
    Show {
        /// Latitude in degrees, -90 to 90.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees, -180 to 180.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Number of hourly entries to show.
        #[arg(long, default_value_t = 6)]
        hours: usize,

        /// Number of daily entries to show.
        #[arg(long, default_value_t = 7)]
        days: usize,

        /// Re-fetch every N seconds until interrupted.
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        refresh: Option<u64>,
    },

    /// Print the image URL for a condition icon code, e.g. "10d".
    Icon { code: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                lat,
                lon,
                hours,
                days,
                refresh,
            } => {
                let limits = render::Limits { hours, days };
                show(Coordinates::new(lat, lon)?, limits, refresh).await
            }
            Command::Icon { code } => {
                let config = Config::load()?;
                let urls = ApiUrlBuilder::new(&config)?;
                println!("{}", urls.build_icon_url(&code));
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let start = Units::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or_default();
    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    let language = Text::new("Language:")
        .with_default(&config.language)
        .prompt()
        .context("Failed to read language")?;

    config.api_key = Some(api_key.trim().to_string());
    config.units = units;
    config.language = language.trim().to_string();
    config.validate()?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(coords: Coordinates, limits: render::Limits, refresh: Option<u64>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let session = WeatherSession::new(&config)?;

    let Some(secs) = refresh else {
        let info = tokio::select! {
            result = session.fetch_weather(coords) => result?,
            _ = tokio::signal::ctrl_c() => {
                session.end();
                return Ok(());
            }
        };
        print!("{}", render::render(&WeatherView::new(&info, session.urls()), limits));
        return Ok(());
    };

    let urls = session.urls().clone();
    let _subscription = session.store().subscribe(move |info| {
        print!("{}", render::render(&WeatherView::new(info, &urls), limits));
    });

    refresh_loop(session.client(), coords, Duration::from_secs(secs)).await;

    session.end();
    Ok(())
}

/// Fetch on every tick until Ctrl-C. Failures are logged and the previous
/// screen stays up; the next tick tries again.
async fn refresh_loop(provider: &dyn WeatherProvider, coords: Coordinates, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        let tick = async {
            ticker.tick().await;
            if let Err(e) = provider.fetch_weather(coords).await {
                warn!(error = %e, "refresh failed, keeping last result");
            }
        };

        tokio::select! {
            _ = tick => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping refresh");
                break;
            }
        }
    }
}
