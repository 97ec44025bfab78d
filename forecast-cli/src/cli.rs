use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use std::sync::Arc;

use forecast_core::{
    App, Config, DAYS_FORECASTED, FileLocationStore, MeasurementSystem, Outcome, UnitsOutcome,
    provider::client_from_config,
};

use crate::terminal::TerminalRenderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Five-day weather card")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Look up a location and show its forecast.
    Show {
        city: String,

        #[arg(long, default_value = "")]
        state: String,

        #[arg(long, default_value = "")]
        country: String,

        /// "imperial" or "metric"; overrides the configured units.
        #[arg(long)]
        units: Option<String>,

        /// Day to show, 0 (today) to 4.
        #[arg(long)]
        day: Option<usize>,
    },

    /// Show the forecast for the last searched location.
    Last {
        #[arg(long)]
        day: Option<usize>,
    },

    /// Browse days and change location from a menu.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                state,
                country,
                units,
                day,
            } => {
                check_day(day)?;
                let app = build_app()?;
                if let Some(units) = units {
                    warn_if_rejected(app.set_measurement_system(&units), &app);
                }
                if let Some(day) = day {
                    app.preselect_day(day);
                }
                report(app.submit(&city, &state, &country).await)
            }
            Command::Last { day } => {
                check_day(day)?;
                let app = build_app()?;
                if let Some(day) = day {
                    app.preselect_day(day);
                }
                report(app.restore().await)
            }
            Command::Interactive => interactive(build_app()?).await,
        }
    }
}

fn build_app() -> anyhow::Result<App> {
    let config = Config::load()?;
    let client = Arc::new(client_from_config(&config)?);
    let store = Arc::new(FileLocationStore::new(Config::data_dir()?));

    let app = App::new(
        client.clone(),
        client,
        store,
        Box::new(TerminalRenderer::new()),
    );

    if let Some(units) = config.units.as_deref() {
        let _ = app.set_measurement_system(units);
    }

    Ok(app)
}

fn warn_if_rejected(outcome: UnitsOutcome, app: &App) {
    if let UnitsOutcome::Rejected { value } = outcome {
        eprintln!(
            "Unknown unit system '{value}', keeping {}.",
            app.forecast().measurement_system()
        );
    }
}

fn check_day(day: Option<usize>) -> anyhow::Result<()> {
    match day {
        Some(day) if day >= DAYS_FORECASTED => Err(anyhow!(
            "Day {day} is out of range; pick 0 (today) to {}.",
            DAYS_FORECASTED - 1
        )),
        _ => Ok(()),
    }
}

fn report(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Rendered => Ok(()),
        Outcome::NothingStored => {
            println!("No saved location yet. Run `forecast show <city>` first.");
            Ok(())
        }
        Outcome::Failed(err) => Err(anyhow!(err).context("Weather lookup failed")),
        Outcome::Superseded => Ok(()),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_help_message("https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let current = config.measurement_system().unwrap_or_default();
    let start = MeasurementSystem::all()
        .iter()
        .position(|s| *s == current)
        .unwrap_or(0);
    let units = Select::new("Units:", MeasurementSystem::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;
    config.set_measurement_system(units);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

enum MenuItem {
    Day(usize),
    ChangeLocation,
    SwitchUnits,
    Quit,
}

impl std::fmt::Display for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuItem::Day(0) => f.write_str("Today"),
            MenuItem::Day(d) => write!(f, "Day {d}"),
            MenuItem::ChangeLocation => f.write_str("Change location"),
            MenuItem::SwitchUnits => f.write_str("Switch units"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

async fn interactive(app: App) -> anyhow::Result<()> {
    if matches!(app.restore().await, Outcome::NothingStored) {
        app.change_location();
        prompt_location(&app).await?;
    }

    loop {
        let days = app.forecast().list().len();
        let mut items: Vec<MenuItem> = (0..days).map(MenuItem::Day).collect();
        items.extend([MenuItem::ChangeLocation, MenuItem::SwitchUnits, MenuItem::Quit]);

        let choice = match Select::new("What next?", items).prompt() {
            Ok(choice) => choice,
            Err(err) if is_cancel(&err) => return Ok(()),
            Err(err) => return Err(err).context("Failed to read menu choice"),
        };

        match choice {
            MenuItem::Day(day) => {
                app.select_day(day);
            }
            MenuItem::ChangeLocation => {
                app.change_location();
                prompt_location(&app).await?;
            }
            MenuItem::SwitchUnits => {
                let units =
                    match Select::new("Units:", MeasurementSystem::all().to_vec()).prompt() {
                        Ok(units) => units,
                        Err(err) if is_cancel(&err) => continue,
                        Err(err) => return Err(err).context("Failed to read units"),
                    };
                warn_if_rejected(app.set_measurement_system(units.as_str()), &app);
                match app.refresh().await {
                    Outcome::NothingStored => println!("Choose a location first."),
                    Outcome::Failed(err) => eprintln!("Weather lookup failed: {err}"),
                    Outcome::Rendered | Outcome::Superseded => {}
                }
            }
            MenuItem::Quit => return Ok(()),
        }
    }
}

async fn prompt_location(app: &App) -> anyhow::Result<()> {
    let read = |label: &str| -> anyhow::Result<Option<String>> {
        match Text::new(label).prompt() {
            Ok(value) => Ok(Some(value)),
            Err(err) if is_cancel(&err) => Ok(None),
            Err(err) => Err(err).context("Failed to read location"),
        }
    };

    let Some(city) = read("City:")? else {
        return Ok(());
    };
    let state = read("State (optional):")?.unwrap_or_default();
    let country = read("Country code (optional):")?.unwrap_or_default();

    app.clear_feedback();
    // Failures are already shown on the card; stay in the menu.
    let _ = app.submit(&city, &state, &country).await;
    Ok(())
}
