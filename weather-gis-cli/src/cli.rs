use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Select, Text};
use log::info;
use weather_gis_core::{
    BackendClient, Config, Dashboard, Screen,
    chart::HourlyChart,
    location::{LocationResolver, presets::REGIONS},
    provider::client_from_config,
};

use crate::{render, svg};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-gis", version, about = "Vietnam weather dashboard")]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the dashboard for a place.
    Show {
        /// Place name; the configured default location if absent.
        query: Option<String>,

        /// Also write the 12-hour chart as SVG to this path.
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Show the 24-hour detail table for a place.
    Hourly {
        /// Place name; the configured default location if absent.
        query: Option<String>,
    },

    /// Pick a province or city from the built-in list.
    Provinces,

    /// Configure the API address and default location.
    Configure,
}

pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Show { query, svg } => {
                let dashboard = open_dashboard(&config, query.as_deref()).await?;
                print_screen(&dashboard, &config)?;

                if let Some(path) = svg {
                    export_chart(&dashboard, &path)?;
                }
            }
            Command::Hourly { query } => {
                let dashboard = open_dashboard(&config, query.as_deref()).await?;
                dashboard.show_screen(Screen::HourlyDetail);
                print_screen(&dashboard, &config)?;
            }
            Command::Provinces => {
                let dashboard = Dashboard::new(client_from_config(&config), config.start_location()?);
                dashboard.toggle_province_picker();

                let place = pick_province()?;
                dashboard.select_province(&place).await?;
                print_screen(&dashboard, &config)?;
            }
            Command::Configure => configure(config).await?,
        }

        Ok(())
    }
}

/// Build the dashboard and run the first fetch cycle, for `query` if given.
async fn open_dashboard(config: &Config, query: Option<&str>) -> Result<Dashboard<BackendClient>> {
    let dashboard = Dashboard::new(client_from_config(config), config.start_location()?);

    match query {
        Some(query) => {
            dashboard.search(query).await?;
        }
        None => {
            dashboard.refresh().await;
        }
    }

    Ok(dashboard)
}

fn print_screen(dashboard: &Dashboard<BackendClient>, config: &Config) -> Result<()> {
    let ctx = render::Context::now(config.map_zoom)?;
    let state = dashboard.snapshot();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::screen(&state, &ctx, &mut out)?;
    out.flush()?;
    Ok(())
}

fn export_chart(dashboard: &Dashboard<BackendClient>, path: &Path) -> Result<()> {
    let state = dashboard.snapshot();
    let chart = state
        .view()
        .predict
        .as_ref()
        .and_then(HourlyChart::build)
        .ok_or_else(|| anyhow!("No hourly prediction available to chart"))?;

    let document = svg::hourly_chart(&chart).context("Failed to render chart")?;
    fs::write(path, document)
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    info!("Wrote chart to {}", path.display());
    Ok(())
}

fn pick_province() -> Result<String> {
    let region_names: Vec<&str> = REGIONS.iter().map(|r| r.name).collect();
    let region_name = Select::new("Region:", region_names).prompt()?;

    let region = REGIONS
        .iter()
        .find(|r| r.name == region_name)
        .ok_or_else(|| anyhow!("Unknown region '{region_name}'"))?;

    let places: Vec<&str> = region.places.iter().map(|p| p.name).collect();
    let place = Select::new("Province / city:", places).prompt()?;
    Ok(place.to_string())
}

async fn configure(mut config: Config) -> Result<()> {
    let base_url = Text::new("API base URL:").with_default(&config.api.base_url).prompt()?;
    if base_url.trim().is_empty() {
        return Err(anyhow!("API base URL must not be empty"));
    }
    config.api.base_url = base_url.trim().to_string();

    let current = config.start_location()?;
    let place = Text::new("Default location (blank keeps current):")
        .with_placeholder(&current.name)
        .prompt()?;

    if !place.trim().is_empty() {
        let client = client_from_config(&config);
        let record = LocationResolver::new(&client).resolve(&place).await?;
        println!("Default location: {} ({})", record.name, record.coordinate);
        config.set_default_location(&record);
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
