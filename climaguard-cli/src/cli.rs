use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use climaguard_core::{
    Activity, ArtifactStore, ClimateService, Config, Coordinates, ExportError, ExportFormat,
    QueryError, RiskRequest, YearRange,
};
use inquire::{CustomType, Text};
use std::{fs, path::PathBuf};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "climaguard",
    version,
    about = "Historical weather risk for a place and calendar day"
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

fn parse_format(value: &str) -> Result<ExportFormat, ExportError> {
    ExportFormat::try_from(value)
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit the year range, artifact directory and geocoder identity.
    Configure,

    /// Assess historical weather risk for a location on a calendar day.
    Query {
        /// City name or "latitude,longitude".
        #[arg(allow_hyphen_values = true)]
        location: String,

        /// Date in YYYY-MM-DD; only month and day are used.
        #[arg(long)]
        date: String,

        /// Planned activity, e.g. hiking or outdoor_event.
        #[arg(long, default_value = "other")]
        activity: Activity,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Skip writing the chart artifact.
        #[arg(long)]
        no_chart: bool,
    },

    /// Download the raw per-year values for a calendar day.
    Export {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Date in YYYY-MM-DD; only month and day are used.
        #[arg(long)]
        date: String,

        /// csv or json.
        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: ExportFormat,

        /// Write to this file (or directory) instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Query {
                location,
                date,
                activity,
                json,
                no_chart,
            } => {
                let config = Config::load()?;
                let store = if no_chart {
                    None
                } else {
                    Some(ArtifactStore::new(config.artifact_dir()?))
                };

                let mut service = ClimateService::from_config(&config)?;
                if let Some(store) = &store {
                    service = service.with_artifacts(store.clone());
                }

                let request = RiskRequest {
                    location,
                    date,
                    activity,
                };
                let report = service.assess(&request).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    let chart_path = report
                        .chart_artifact
                        .zip(store.as_ref())
                        .map(|(key, store)| store.chart_path(key));
                    print!("{}", output::render_report(&report, chart_path.as_deref()));
                }
                Ok(())
            }
            Command::Export {
                lat,
                lon,
                date,
                format,
                output,
            } => {
                let coordinates = Coordinates::parse(&format!("{lat},{lon}"))
                    .with_context(|| format!("Invalid lat/lon: {lat},{lon}"))?;

                let config = Config::load()?;
                let service = ClimateService::from_config(&config)?;
                let rows = service.export(coordinates, &date).await?;

                let encoded = format.encode(&rows).map_err(QueryError::from)?;

                match output {
                    Some(path) => {
                        let path = if path.is_dir() {
                            path.join(format.file_name())
                        } else {
                            path
                        };
                        fs::write(&path, &encoded).with_context(|| {
                            format!("Failed to write export file: {}", path.display())
                        })?;
                        eprintln!("Wrote {} {format} rows to {}", rows.len(), path.display());
                    }
                    None => print!("{encoded}"),
                }
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;
    let current = config.year_range()?;

    let start: i32 = CustomType::new("First year of history:")
        .with_default(current.start)
        .with_error_message("Please enter a year, e.g. 2000")
        .prompt()?;
    let end: i32 = CustomType::new("Last year of history:")
        .with_default(current.end)
        .with_error_message("Please enter a year, e.g. 2020")
        .prompt()?;
    config.set_year_range(YearRange::new(start, end)?);

    let current_dir = config.artifact_dir()?;
    let dir = Text::new("Directory for chart artifacts:")
        .with_default(&current_dir.display().to_string())
        .prompt()?;
    config.artifacts.dir = Some(PathBuf::from(dir));

    let agent = Text::new("User-Agent sent to the geocoder:")
        .with_default(&config.geocoder.user_agent)
        .prompt()?;
    config.geocoder.user_agent = agent;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
