use crate::utils::{create_bench_collection, per_second};
use anyhow::Result;
use keyprof_core::testdoc::bench_doc;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Serialize)]
pub struct InsertResult {
    pub seconds: f64,
    pub inserts_per_sec: f64,
    pub docs_on_start: usize,
    pub docs_on_end: usize,
    pub docs_inserted: usize,
    pub docs_missed: usize,
}

impl InsertResult {
    pub fn print(&self) {
        println!("Results:");
        println!("  Total time: {:.3}s", self.seconds);
        println!("  Inserts per second: {:.2}", self.inserts_per_sec);
        println!("  Documents on start: {}", self.docs_on_start);
        println!("  Documents on end: {}", self.docs_on_end);
        println!("  Documents inserted: {}", self.docs_inserted);
        if self.docs_missed == 0 {
            println!("  ✅ PASS: Every insert landed");
        } else {
            println!("  ❌ FAIL: {} inserts missing", self.docs_missed);
        }
    }
}

/// Inserts `count` copies of a `fields`-wide document into a collection
/// prefilled with `prefill` documents.
pub fn run_insert_throughput_test(count: usize, fields: usize, prefill: usize) -> Result<InsertResult> {
    println!("Running insert throughput test...");
    println!("Documents: {}, fields: {}, prefill: {}", count, fields, prefill);

    let mut coll = create_bench_collection("bm_inserts", prefill, fields)?;
    let template = bench_doc(fields);
    let docs_on_start = coll.len();

    let start = Instant::now();
    for _ in 0..count {
        // Ids are auto-assigned past the prefilled range
        let id = coll.insert(template.clone())?;
        std::hint::black_box(id);
    }
    let elapsed = start.elapsed();
    if elapsed > Duration::from_secs(30) {
        println!("Warning: test took longer than 30 seconds");
    }

    let docs_on_end = coll.len();
    let docs_inserted = docs_on_end - docs_on_start;
    Ok(InsertResult {
        seconds: elapsed.as_secs_f64(),
        inserts_per_sec: per_second(count, elapsed),
        docs_on_start,
        docs_on_end,
        docs_inserted,
        docs_missed: count.saturating_sub(docs_inserted),
    })
}
