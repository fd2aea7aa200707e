use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use clima_core::{
    Config, Coordinates, LoadState, RequestKey, TomorrowClient, WeatherLoader, WeatherReading,
    condition,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Realtime weather viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Tomorrow.io API key and a default location.
    Configure,

    /// Show current weather for a location.
    Show {
        /// Provider-accepted location, e.g. "20.2767,-97.960".
        location: Option<String>,

        /// Display name shown above the reading.
        #[arg(long)]
        name: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, name } => show(location, name).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("Tomorrow.io API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let location = inquire::Text::new("Default location (lat,lon or place name):")
        .prompt()
        .context("Failed to read location")?;
    if !location.is_empty() {
        config.location = Some(location);
    }

    let name = inquire::Text::new("Display name for that location:")
        .prompt()
        .context("Failed to read display name")?;
    if !name.is_empty() {
        config.name = Some(name);
    }

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(location: Option<String>, name: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let api_key = config.api_key()?;

    let location = location.or(config.location).context(
        "No location given.\nHint: pass one as an argument or run `clima configure`.",
    )?;
    let name = name.or(config.name).unwrap_or_else(|| location.clone());

    let key = RequestKey::new(Coordinates::new(location), name);

    let loader = WeatherLoader::new(Arc::new(TomorrowClient::new(api_key)));
    let mut states = loader.subscribe();

    loader.start(key.clone());
    println!("Cargando clima...");

    let state = states
        .wait_for(LoadState::is_terminal)
        .await
        .context("weather task ended without a result")?
        .clone();

    match state {
        LoadState::Loaded(reading) => print_reading(&key.name, &reading),
        // The fixed "Error:" prefix comes from the anyhow reporter in main.
        LoadState::Failed(message) => bail!(message),
        LoadState::Loading => {}
    }

    Ok(())
}

/// Render one reading: name, truncated temperature with icon,
/// description, then humidity and wind.
fn print_reading(name: &str, reading: &WeatherReading) {
    println!("{name}");
    println!(
        "{}° {}",
        reading.temperature_c as i32,
        condition::icon(reading.condition_code)
    );
    println!("{}", condition::describe(reading.condition_code));
    println!("Humedad: {}%", reading.humidity_pct);
    println!("Viento: {} km/h", reading.wind_speed_kmh);
}
