//! Command implementations.

use anyhow::{Context, Result};
use std::path::Path;

use keyprof_core::collection::{read_jsonl, write_jsonl, Collection};
use keyprof_core::config::ProfilerConfig;
use keyprof_core::jobs::{self, GroupCounts};
use keyprof_core::maintenance;
use keyprof_core::mapreduce::Engine;
use keyprof_core::report::{self, FieldReport};
use keyprof_core::{Record, SchemaProfiler, Value};

fn load(path: &Path) -> Result<Vec<Record>> {
    read_jsonl(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_collection(path: &Path) -> Result<Collection> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Collection::load_jsonl(name, path).with_context(|| format!("Failed to load {}", path.display()))
}

/// Parse comma-separated string into trimmed, non-empty names
pub fn parse_comma_separated(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn schema(config: &ProfilerConfig, input: &Path, signatures: bool, json: bool) -> Result<()> {
    let records = load(input)?;
    let profile = SchemaProfiler::new(config.clone()).profile(&records);

    if signatures {
        if json {
            println!("{}", serde_json::to_string_pretty(&profile.signatures)?);
        } else {
            for (signature, agg) in &profile.signatures {
                println!(
                    "{:>12} {:>10} {:>7.2}% depth={} [{}]",
                    signature,
                    report::thousands(agg.cnt),
                    agg.percent,
                    agg.depth,
                    agg.fields.join(" ")
                );
            }
        }
        return Ok(());
    }

    let report = FieldReport::build(&profile, &config.hidden_fields);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_table());
    }
    Ok(())
}

pub fn export_fields(config: &ProfilerConfig, input: &Path, output: &Path, exclude: &str) -> Result<()> {
    let records = load(input)?;
    let profile = SchemaProfiler::new(config.clone()).profile(&records);
    let exclude = parse_comma_separated(exclude);
    let written = report::export_fields(output, &profile, &exclude)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("{} fields written to {}", written.len(), output.display());
    Ok(())
}

pub fn group_counts(config: &ProfilerConfig, input: &Path, field: &str, json: bool) -> Result<()> {
    let records = load(input)?;
    let job = GroupCounts {
        field: field.to_string(),
    };
    let out = Engine::new(config.partitions).run(&job, &records);

    let mut rows: Vec<_> = out.results.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if json {
        let value: Vec<_> = rows
            .iter()
            .map(|(k, v)| serde_json::json!({"_id": k, "value": v}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for (key, count) in rows {
            println!("{:<30} {:>12}", key, report::thousands(count));
        }
    }
    Ok(())
}

pub fn orphans(config: &ProfilerConfig, a: &Path, a_key: &str, b: &Path, b_key: &str) -> Result<()> {
    let (a_records, b_records) = (load(a)?, load(b)?);
    let out = jobs::orphans(
        &Engine::new(config.partitions),
        &a_records,
        a_key,
        &b_records,
        b_key,
    );

    let missing_a = out.results.values().filter(|c| c.a == 0).count();
    let missing_b = out.results.values().filter(|c| c.b == 0).count();
    for (key, counts) in &out.results {
        println!("{:<30} a={:<8} b={:<8} sum={}", key, counts.a, counts.b, counts.sum);
    }
    println!(
        "{} keys, {} missing from A, {} missing from B",
        out.results.len(),
        missing_a,
        missing_b
    );
    Ok(())
}

pub fn join(
    config: &ProfilerConfig,
    a: &Path,
    a_key: &str,
    b: &Path,
    b_key: &str,
    output: &Path,
) -> Result<()> {
    let (a_records, b_records) = (load(a)?, load(b)?);
    let out = jobs::join(
        &Engine::new(config.partitions),
        &a_records,
        a_key,
        &b_records,
        b_key,
    );

    let mut joined = Vec::with_capacity(out.results.len());
    for (key, pair) in out.results {
        let mut value = Record::new();
        value.insert("a", pair.a.map(Value::Record).unwrap_or_else(Value::null));
        value.insert("b", pair.b.map(Value::Record).unwrap_or_else(Value::null));
        let mut row = Record::new();
        row.insert("_id", Value::from(serde_json::to_value(&key)?));
        row.insert("value", value);
        joined.push(row);
    }
    write_jsonl(output, &joined).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("{} joined keys written to {}", joined.len(), output.display());
    Ok(())
}

pub fn copy_field(
    config: &ProfilerConfig,
    input: &Path,
    from: &str,
    to: &str,
    output: Option<&Path>,
) -> Result<()> {
    let mut coll = load_collection(input)?;
    let stats = maintenance::copy_field(&mut coll, |_| true, from, to, config.report_every)?;
    coll.write_jsonl(output.unwrap_or(input))?;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}

pub fn remove_dupls(config: &ProfilerConfig, input: &Path, key: &str, output: Option<&Path>) -> Result<()> {
    let mut coll = load_collection(input)?;
    let stats = maintenance::remove_duplicates(&mut coll, key, config.report_every)?;
    coll.write_jsonl(output.unwrap_or(input))?;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}

pub fn extract_array(config: &ProfilerConfig, input: &Path, field: &str, output: &Path) -> Result<()> {
    let source = load_collection(input)?;
    let mut target = Collection::new(field);
    let stats = maintenance::extract_array_field(&source, field, &mut target, config.report_every)?;
    target.write_jsonl(output)?;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}
