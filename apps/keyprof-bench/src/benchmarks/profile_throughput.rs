use crate::utils::per_second;
use keyprof_core::config::ProfilerConfig;
use keyprof_core::testdoc::test_doc;
use keyprof_core::{Record, SchemaProfiler};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct ProfileResult {
    pub partitions: usize,
    pub seconds: f64,
    pub docs_per_sec: f64,
    pub signatures: usize,
    pub fields: usize,
}

/// Profiles `count` synthetic documents once per partition count.
pub fn run_profile_throughput_test(count: usize, fields: usize, partitions: &[usize]) -> Vec<ProfileResult> {
    println!("Running profile throughput test...");
    println!("Documents: {}, fields: {}", count, fields);

    let mut rng = rand::thread_rng();
    let records: Vec<Record> = (0..count).map(|_| test_doc(&mut rng, fields)).collect();

    let mut results = Vec::with_capacity(partitions.len());
    for &p in partitions {
        let profiler = SchemaProfiler::new(ProfilerConfig {
            partitions: p,
            ..Default::default()
        });

        let start = Instant::now();
        let profile = profiler.profile(&records);
        let elapsed = start.elapsed();

        results.push(ProfileResult {
            partitions: p,
            seconds: elapsed.as_secs_f64(),
            docs_per_sec: per_second(count, elapsed),
            signatures: profile.signatures.len(),
            fields: profile.fields.len(),
        });
    }
    results
}

pub fn print_results(results: &[ProfileResult]) {
    println!("Results:");
    println!("  Partitions | Time (s) | Docs/sec | Signatures | Fields");
    println!("  -----------|----------|----------|------------|-------");
    for r in results {
        println!(
            "  {:10} | {:8.3} | {:8.0} | {:10} | {:6}",
            r.partitions, r.seconds, r.docs_per_sec, r.signatures, r.fields
        );
    }
}
