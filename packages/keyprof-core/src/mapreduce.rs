//! In-process map/reduce engine.
//!
//! Jobs implement [`MapReduce`]. The [`Engine`] splits the input into
//! partitions and maps each partition into its own key-grouped accumulator.
//! The groups are concatenated in partition order, so every key sees its
//! values in input order, and reduced once per key. Results, including
//! floating-point sums, do not depend on the partition count.
//!
//! Reduce is only called for keys with two or more values. [`JobOutput::merge`]
//! reduces a key's two partial results together, so reduce must also accept
//! its own output as input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Collects `(key, value)` pairs emitted by a map call.
#[derive(Debug)]
pub struct Emitter<K, V> {
    pairs: Vec<(K, V)>,
}

impl<K, V> Emitter<K, V> {
    fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn emit(&mut self, key: K, value: V) {
        self.pairs.push((key, value));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A map/reduce job over a slice of inputs.
pub trait MapReduce: Sync {
    type Input: Sync;
    type Key: Ord + Clone + Send;
    type Value: Clone + Send;

    /// Emits zero or more pairs for one input.
    fn map(&self, input: &Self::Input, emit: &mut Emitter<Self::Key, Self::Value>);

    /// Merges all values seen for `key` into one.
    fn reduce(&self, key: &Self::Key, values: Vec<Self::Value>) -> Self::Value;
}

/// Counters reported for one job run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    /// Inputs mapped
    pub input: usize,
    /// Pairs emitted by map
    pub emit: usize,
    /// Reduce invocations
    pub reduce: usize,
    /// Distinct keys in the result
    pub output: usize,
    /// Wall time in milliseconds
    pub time_millis: u64,
}

/// Result of a job run: one reduced value per distinct key.
#[derive(Debug, Clone)]
pub struct JobOutput<K, V> {
    pub results: BTreeMap<K, V>,
    pub stats: JobStats,
}

impl<K: Ord + Clone, V: Clone> JobOutput<K, V> {
    /// Merges another partial output into this one with `job`'s reduce.
    pub fn merge<J>(mut self, other: JobOutput<K, V>, job: &J) -> JobOutput<K, V>
    where
        J: MapReduce<Key = K, Value = V>,
    {
        let reduced = merge_into(&mut self.results, other.results, job);
        self.stats.input += other.stats.input;
        self.stats.emit += other.stats.emit;
        self.stats.reduce += other.stats.reduce + reduced;
        self.stats.time_millis += other.stats.time_millis;
        self.stats.output = self.results.len();
        self
    }
}

/// Partition-then-merge executor.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    partitions: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(0)
    }
}

struct Partial<K, V> {
    groups: BTreeMap<K, Vec<V>>,
    emit: usize,
}

impl Engine {
    /// Creates an engine splitting input into `partitions` chunks.
    ///
    /// 0 picks one partition per worker thread (one partition without the
    /// `parallel` feature).
    pub fn new(partitions: usize) -> Self {
        Self { partitions }
    }

    /// Single-partition engine; results are identical to any other setting.
    pub fn sequential() -> Self {
        Self { partitions: 1 }
    }

    fn partition_count(&self) -> usize {
        if self.partitions > 0 {
            return self.partitions;
        }
        #[cfg(feature = "parallel")]
        {
            rayon::current_num_threads().max(1)
        }
        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }

    /// Runs `job` over `inputs`.
    pub fn run<J: MapReduce>(&self, job: &J, inputs: &[J::Input]) -> JobOutput<J::Key, J::Value> {
        let start = Instant::now();
        let chunk_size = inputs.len().div_ceil(self.partition_count()).max(1);

        let partials = self.run_partitions(job, inputs, chunk_size);

        let mut grouped: BTreeMap<J::Key, Vec<J::Value>> = BTreeMap::new();
        let mut stats = JobStats {
            input: inputs.len(),
            ..Default::default()
        };
        for partial in partials {
            stats.emit += partial.emit;
            for (key, values) in partial.groups {
                grouped.entry(key).or_default().extend(values);
            }
        }

        let mut results = BTreeMap::new();
        for (key, mut values) in grouped {
            let value = if values.len() == 1 {
                values.pop()
            } else {
                stats.reduce += 1;
                Some(job.reduce(&key, values))
            };
            if let Some(value) = value {
                results.insert(key, value);
            }
        }
        stats.output = results.len();
        stats.time_millis = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "Map/reduce finished: input={} emit={} reduce={} output={} in {}ms",
            stats.input,
            stats.emit,
            stats.reduce,
            stats.output,
            stats.time_millis
        );

        JobOutput { results, stats }
    }

    #[cfg(feature = "parallel")]
    fn run_partitions<J: MapReduce>(
        &self,
        job: &J,
        inputs: &[J::Input],
        chunk_size: usize,
    ) -> Vec<Partial<J::Key, J::Value>> {
        use rayon::prelude::*;

        inputs
            .par_chunks(chunk_size)
            .map(|chunk| run_partition(job, chunk))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_partitions<J: MapReduce>(
        &self,
        job: &J,
        inputs: &[J::Input],
        chunk_size: usize,
    ) -> Vec<Partial<J::Key, J::Value>> {
        inputs
            .chunks(chunk_size)
            .map(|chunk| run_partition(job, chunk))
            .collect()
    }
}

fn run_partition<J: MapReduce>(job: &J, chunk: &[J::Input]) -> Partial<J::Key, J::Value> {
    let mut emitter = Emitter::new();
    for input in chunk {
        job.map(input, &mut emitter);
    }
    let emit = emitter.len();

    let mut groups: BTreeMap<J::Key, Vec<J::Value>> = BTreeMap::new();
    for (key, value) in emitter.pairs {
        groups.entry(key).or_default().push(value);
    }

    Partial { groups, emit }
}

/// Folds `incoming` into `acc`, returning how many reduce calls it took.
fn merge_into<J: MapReduce>(
    acc: &mut BTreeMap<J::Key, J::Value>,
    incoming: BTreeMap<J::Key, J::Value>,
    job: &J,
) -> usize {
    let mut reduced = 0;
    for (key, value) in incoming {
        match acc.remove(&key) {
            Some(existing) => {
                let merged = job.reduce(&key, vec![existing, value]);
                acc.insert(key, merged);
                reduced += 1;
            }
            None => {
                acc.insert(key, value);
            }
        }
    }
    reduced
}
