use std::fs;
use std::path::Path;

use anyhow::{Context as AnyhowContext, Result};
use tracing::info;

use crate::cli::{self, Cli, Command};
use crate::configuration::Settings;
use crate::ingest;
use crate::logging;
use crate::report;
use crate::source::Resolver;
use crate::types::Dataset;

/// Entry point for the binary: parse the CLI, set up logging, build settings
/// once at the edge and dispatch the requested command.
pub fn run() -> Result<()> {
    let cli = cli::parse();
    logging::init(cli.log_file.as_deref().map(Path::new));

    let settings = Settings::from_cli(&cli)?;
    log_startup_info(&settings);

    match &cli.cmd {
        Some(Command::Check) => check(&settings),
        Some(Command::Export { output }) => export(&cli, &settings, output.as_deref()),
        Some(Command::Import { input, output }) => import(input, output.as_deref()),
        None => summary(&cli, &settings),
    }
}

fn log_startup_info(settings: &Settings) {
    info!("data file: {}", settings.data_file.display());
    info!("collection: {}", settings.collection);
    info!(
        "remote store: {}",
        if settings.credentials.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );
}

fn resolve_filtered(cli: &Cli, settings: &Settings) -> Dataset {
    let dataset = Resolver::from_settings(settings).resolve();
    dataset.filtered(cli.from_year, cli.to_year, &cli.pathogens)
}

fn summary(cli: &Cli, settings: &Settings) -> Result<()> {
    let dataset = resolve_filtered(cli, settings);
    print!("{}", report::render(&dataset));
    Ok(())
}

/// Advisory probe of every tier. Always exits successfully: a dead tier is
/// reported, not treated as a failure.
fn check(settings: &Settings) -> Result<()> {
    let resolver = Resolver::from_settings(settings);
    for (origin, outcome) in resolver.probe() {
        match outcome {
            Ok(count) => println!("{origin}: ok ({count} records)"),
            Err(err) => println!("{origin}: unavailable ({err})"),
        }
    }
    Ok(())
}

fn export(cli: &Cli, settings: &Settings, output: Option<&str>) -> Result<()> {
    let dataset = resolve_filtered(cli, settings);
    let json = serde_json::to_string_pretty(&dataset.records)
        .context("failed to serialize the dataset")?;
    info!("exporting {} records from {}", dataset.len(), dataset.origin);
    write_output(output, &json)
}

fn import(input: &str, output: Option<&str>) -> Result<()> {
    let contents = fs::read_to_string(input)
        .with_context(|| format!("failed to read raw export {input}"))?;
    let records = ingest::parse_raw_export(&contents)
        .with_context(|| format!("failed to convert raw export {input}"))?;
    info!("converted {} records from {}", records.len(), input);
    let json = serde_json::to_string_pretty(&records)
        .context("failed to serialize converted records")?;
    write_output(output, &json)
}

fn write_output(output: Option<&str>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("failed to write {path}"))?
        }
        None => println!("{contents}"),
    }
    Ok(())
}
