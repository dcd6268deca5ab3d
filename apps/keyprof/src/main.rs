//! CLI for schema key profiling and collection maintenance.
//!
//! Reads collections from JSON-lines files and provides commands for:
//! - Field discovery and frequency reports
//! - Group counts, orphan detection and joins
//! - Field copy, duplicate removal and array extraction

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use keyprof_core::config::ProfilerConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => ProfilerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ProfilerConfig::default(),
    };
    if let Some(partitions) = cli.partitions {
        config.partitions = partitions;
    }
    config.validate()?;
    tracing::debug!("Using configuration {:?}", config);

    match cli.command {
        Commands::Schema {
            input,
            level_max,
            include_container_keys,
            signatures,
            json,
        } => {
            if let Some(level_max) = level_max {
                config.level_max = level_max;
            }
            config.include_container_keys |= include_container_keys;
            commands::schema(&config, &input, signatures, json)
        }
        Commands::ExportFields {
            input,
            output,
            exclude,
        } => commands::export_fields(&config, &input, &output, &exclude),
        Commands::GroupCounts { input, field, json } => {
            commands::group_counts(&config, &input, &field, json)
        }
        Commands::Orphans { a, a_key, b, b_key } => commands::orphans(&config, &a, &a_key, &b, &b_key),
        Commands::Join {
            a,
            a_key,
            b,
            b_key,
            output,
        } => commands::join(&config, &a, &a_key, &b, &b_key, &output),
        Commands::CopyField {
            input,
            from,
            to,
            output,
        } => commands::copy_field(&config, &input, &from, &to, output.as_deref()),
        Commands::RemoveDupls { input, key, output } => {
            commands::remove_dupls(&config, &input, &key, output.as_deref())
        }
        Commands::ExtractArray {
            input,
            field,
            output,
        } => commands::extract_array(&config, &input, &field, &output),
    }
}
