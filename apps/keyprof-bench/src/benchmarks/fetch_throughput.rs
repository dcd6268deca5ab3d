use crate::utils::{create_bench_collection, per_second};
use anyhow::Result;
use keyprof_core::jobs::KeyValue;
use rand::Rng;
use serde::Serialize;
use std::time::Instant;

const FETCH_FIELDS: usize = 10;

#[derive(Debug, Serialize)]
pub struct FetchResult {
    pub seconds: f64,
    pub reads_per_sec: f64,
    pub docs_on_start: usize,
    pub docs_read: usize,
    pub docs_missed: usize,
}

impl FetchResult {
    pub fn print(&self) {
        println!("Results:");
        println!("  Total time: {:.3}s", self.seconds);
        println!("  Reads per second: {:.2}", self.reads_per_sec);
        println!("  Documents in collection: {}", self.docs_on_start);
        println!("  Documents read: {}", self.docs_read);
        println!("  Missed lookups: {}", self.docs_missed);
    }
}

/// Looks up `count` random ids drawn from `0..=record_count`.
///
/// The upper bound is inclusive, so some lookups miss.
pub fn run_fetch_throughput_test(count: usize, record_count: usize) -> Result<FetchResult> {
    println!("Running fetch throughput test...");
    println!("Lookups: {}, documents: {}", count, record_count);

    let coll = create_bench_collection("bm_reads", record_count, FETCH_FIELDS)?;
    let mut rng = rand::thread_rng();
    let ids: Vec<KeyValue> = (0..count)
        .map(|_| KeyValue::Int(rng.gen_range(0..=record_count as i64)))
        .collect();

    let mut docs_read = 0usize;
    let start = Instant::now();
    for id in &ids {
        if let Some(doc) = coll.find_one(id) {
            std::hint::black_box(doc);
            docs_read += 1;
        }
    }
    let elapsed = start.elapsed();

    Ok(FetchResult {
        seconds: elapsed.as_secs_f64(),
        reads_per_sec: per_second(count, elapsed),
        docs_on_start: coll.len(),
        docs_read,
        docs_missed: count - docs_read,
    })
}
