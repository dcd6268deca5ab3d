//! Throughput benchmarks for keyprof.
//!
//! - Inserts of fixed-shape documents into an in-memory collection
//! - Random `_id` lookups, including misses
//! - Two-pass schema profiling at several partition counts

mod benchmarks;
mod cli;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Insert {
            count,
            fields,
            prefill,
        } => insert(count, fields, prefill, cli.json),
        Commands::Fetch {
            count,
            record_count,
        } => fetch(count, record_count, cli.json),
        Commands::Profile {
            count,
            fields,
            partitions,
        } => {
            let partitions = utils::parse_comma_separated(&partitions)?;
            profile(count, fields, &partitions, cli.json)
        }
        Commands::All => {
            tracing::info!("Running all benchmarks");
            insert(100_000, 10, 0, cli.json)?;
            println!();
            fetch(100_000, 10_000, cli.json)?;
            println!();
            profile(100_000, 5, &[1, 0], cli.json)
        }
    }
}

fn insert(count: usize, fields: usize, prefill: usize, json: bool) -> Result<()> {
    let result = benchmarks::insert_throughput::run_insert_throughput_test(count, fields, prefill)?;
    if json {
        utils::print_json(&result)
    } else {
        result.print();
        Ok(())
    }
}

fn fetch(count: usize, record_count: usize, json: bool) -> Result<()> {
    let result = benchmarks::fetch_throughput::run_fetch_throughput_test(count, record_count)?;
    if json {
        utils::print_json(&result)
    } else {
        result.print();
        Ok(())
    }
}

fn profile(count: usize, fields: usize, partitions: &[usize], json: bool) -> Result<()> {
    let results = benchmarks::profile_throughput::run_profile_throughput_test(count, fields, partitions);
    if json {
        utils::print_json(&results)
    } else {
        benchmarks::profile_throughput::print_results(&results);
        Ok(())
    }
}
