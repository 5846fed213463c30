mod args;
mod flow_counts;
mod lookup_table;
mod output;
mod parsers;
mod protocol_map;
mod records;

use anyhow::Context;
use args::{Cli, ConfigFile, OutputConfig};
use clap::Parser;
use log::{debug, error, info, warn};
use output::ReportWriter;
use parsers::{flow_log_parser::process, lookup_parser::LookupParser};
use protocol_map::ProtocolMap;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let output = output_config(cli)?;
    let start = Instant::now();

    let protocol_map = load_protocol_map(cli.protocol_map.as_deref())?;

    let lookup_table = LookupParser
        .load(&cli.lookup_path)
        .with_context(|| format!("failed to load lookup table {}", cli.lookup_path.display()))?;

    if lookup_table.is_empty() {
        warn!("Lookup table is empty, every flow will be tagged as Untagged");
    }

    let counts = process(&cli.flowlog_path, &lookup_table, &protocol_map)
        .with_context(|| format!("failed to parse flow log {}", cli.flowlog_path.display()))?;

    if counts.is_empty() {
        warn!("No flow records were counted");
    }

    if let Some(dump_path) = &cli.dump_lookup {
        lookup_table
            .save(dump_path)
            .with_context(|| format!("failed to write lookup table {}", dump_path.display()))?;
        info!("Wrote normalized lookup table to {}", dump_path.display());
    }

    let mut writer = ReportWriter::new(output.output, output.format, &output.export_path)
        .with_context(|| format!("failed to create report {}", output.export_path.display()))?;
    writer
        .write_report(&counts)
        .context("failed to write report")?;

    debug!("Duration: {:?} milliseconds", start.elapsed().as_millis());
    Ok(())
}

/// Output options from the config file when one is given, otherwise from the CLI.
fn output_config(cli: &Cli) -> anyhow::Result<OutputConfig> {
    match &cli.config_file {
        Some(config_path) => {
            // confy would otherwise create the file with defaults
            if !config_path.is_file() {
                anyhow::bail!("configuration file {} not found", config_path.display());
            }
            let cfg_file: ConfigFile = confy::load_path(config_path).with_context(|| {
                format!("failed to load configuration file {}", config_path.display())
            })?;
            Ok(cfg_file.output)
        }
        None => Ok(cli.output.clone()),
    }
}

fn load_protocol_map(path: Option<&Path>) -> anyhow::Result<ProtocolMap> {
    match path {
        Some(path) => ProtocolMap::from_path(path)
            .with_context(|| format!("failed to load protocol map {}", path.display())),
        None => ProtocolMap::bundled().context("failed to load the bundled protocol map"),
    }
}
