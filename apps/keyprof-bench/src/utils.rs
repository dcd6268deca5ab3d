use anyhow::{Context, Result};
use keyprof_core::collection::Collection;
use keyprof_core::testdoc::bench_doc;
use serde::Serialize;
use std::time::Duration;

/// Creates a collection holding `count` bench documents with `_id` 0..count
pub fn create_bench_collection(name: &str, count: usize, fields: usize) -> Result<Collection> {
    let mut coll = Collection::new(name);
    let template = bench_doc(fields);
    for i in 0..count {
        let mut doc = template.clone();
        doc.insert("_id", i as i64);
        coll.insert(doc)
            .with_context(|| format!("Failed to prefill document {}", i))?;
    }
    Ok(coll)
}

/// Parse comma-separated string into vector of usize
pub fn parse_comma_separated(input: &str) -> Result<Vec<usize>> {
    input
        .split(',')
        .map(|s| {
            s.trim()
                .parse()
                .with_context(|| format!("Invalid value '{}': must be a non-negative integer", s))
        })
        .collect()
}

/// Operations per second, 0 when no time elapsed
pub fn per_second(ops: usize, elapsed: Duration) -> f64 {
    if elapsed.as_secs_f64() == 0.0 {
        0.0
    } else {
        ops as f64 / elapsed.as_secs_f64()
    }
}

/// Prints a benchmark result as pretty JSON
pub fn print_json<T: Serialize>(result: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
