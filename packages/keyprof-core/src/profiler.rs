//! Two-pass schema key-frequency profiler.
//!
//! Pass 1 ([`KeysJob`]) groups records by the signature of their sorted field
//! paths. Percentages are then normalized against the input count, and
//! pass 2 ([`KeysMetaJob`]) explodes every signature into per-field counts.
//!
//! Signatures are 32-bit hashes; two different field sets that collide are
//! merged and carry the first contributor's field list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ProfilerConfig;
use crate::flatten::{flatten, FlattenOptions};
use crate::hash::{segment_depth, Signature};
use crate::mapreduce::{Emitter, Engine, JobOutput, JobStats, MapReduce};
use crate::value::Record;

/// Records sharing one field-path signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureAggregate {
    pub cnt: u64,
    pub percent: f64,
    /// Deepest nesting level descended while flattening
    pub depth: usize,
    /// Sorted field paths
    pub fields: Vec<String>,
}

/// Occurrences of one field path across the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAggregate {
    pub cnt: u64,
    pub percent: f64,
    /// Number of path segments
    pub depth: usize,
}

/// Pass 1: record to signature.
#[derive(Debug, Clone, Default)]
pub struct KeysJob {
    pub options: FlattenOptions,
}

impl MapReduce for KeysJob {
    type Input = Record;
    type Key = Signature;
    type Value = SignatureAggregate;

    fn map(&self, record: &Record, emit: &mut Emitter<Signature, SignatureAggregate>) {
        let flat = flatten(record, &self.options);
        let depth = flat.max_depth;
        let fields = flat.into_sorted();
        emit.emit(
            Signature::from_sorted(&fields),
            SignatureAggregate {
                cnt: 1,
                percent: 0.0,
                depth,
                fields,
            },
        );
    }

    fn reduce(&self, _key: &Signature, values: Vec<SignatureAggregate>) -> SignatureAggregate {
        let cnt = values.iter().map(|v| v.cnt).sum();
        let mut values = values.into_iter();
        let first = values.next();
        match first {
            Some(first) => SignatureAggregate {
                cnt,
                percent: 0.0,
                ..first
            },
            None => SignatureAggregate {
                cnt,
                percent: 0.0,
                depth: 0,
                fields: Vec::new(),
            },
        }
    }
}

/// Pass 2: signature to per-field counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeysMetaJob;

impl MapReduce for KeysMetaJob {
    type Input = (Signature, SignatureAggregate);
    type Key = String;
    type Value = FieldAggregate;

    fn map(
        &self,
        (_, aggregate): &(Signature, SignatureAggregate),
        emit: &mut Emitter<String, FieldAggregate>,
    ) {
        for field in &aggregate.fields {
            emit.emit(
                field.clone(),
                FieldAggregate {
                    cnt: aggregate.cnt,
                    percent: aggregate.percent,
                    depth: segment_depth(field),
                },
            );
        }
    }

    fn reduce(&self, key: &String, values: Vec<FieldAggregate>) -> FieldAggregate {
        let depth = values
            .first()
            .map(|v| v.depth)
            .unwrap_or_else(|| segment_depth(key));
        FieldAggregate {
            cnt: values.iter().map(|v| v.cnt).sum(),
            percent: values.iter().map(|v| v.percent).sum(),
            depth,
        }
    }
}

/// Sets each signature's percent to its share of `total` records.
///
/// Leaves percents untouched when `total` is 0. Returns the summed counts.
pub fn normalize_percent(signatures: &mut BTreeMap<Signature, SignatureAggregate>, total: u64) -> u64 {
    let mut counted = 0;
    for aggregate in signatures.values_mut() {
        if total > 0 {
            aggregate.percent = aggregate.cnt as f64 / total as f64 * 100.0;
        }
        counted += aggregate.cnt;
    }
    counted
}

/// Full result of a profiling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaProfile {
    pub total_records: u64,
    pub signatures: BTreeMap<Signature, SignatureAggregate>,
    pub fields: BTreeMap<String, FieldAggregate>,
    pub signature_stats: JobStats,
    pub field_stats: JobStats,
}

/// Runs both passes with normalization in between.
#[derive(Debug, Clone)]
pub struct SchemaProfiler {
    config: ProfilerConfig,
    engine: Engine,
}

impl SchemaProfiler {
    pub fn new(config: ProfilerConfig) -> Self {
        let engine = Engine::new(config.partitions);
        Self { config, engine }
    }

    /// Pass 1 only; percents are left at 0.
    pub fn signatures(&self, records: &[Record]) -> JobOutput<Signature, SignatureAggregate> {
        let job = KeysJob {
            options: self.config.flatten_options(),
        };
        self.engine.run(&job, records)
    }

    /// Pass 2 over (possibly normalized) signatures.
    pub fn field_meta(
        &self,
        signatures: &BTreeMap<Signature, SignatureAggregate>,
    ) -> JobOutput<String, FieldAggregate> {
        let inputs: Vec<(Signature, SignatureAggregate)> = signatures
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        self.engine.run(&KeysMetaJob, &inputs)
    }

    pub fn profile(&self, records: &[Record]) -> SchemaProfile {
        tracing::info!("Discovering fields in {} records", records.len());
        let pass1 = self.signatures(records);
        let total_records = pass1.stats.input as u64;
        let mut signatures = pass1.results;

        tracing::info!("Calculating percentages for {} signatures", signatures.len());
        let counted = normalize_percent(&mut signatures, total_records);
        if counted != total_records {
            tracing::warn!(
                "Signature counts ({}) differ from input records ({})",
                counted,
                total_records
            );
        }

        let pass2 = self.field_meta(&signatures);
        tracing::info!("Found {} distinct fields", pass2.results.len());

        SchemaProfile {
            total_records,
            signatures,
            fields: pass2.results,
            signature_stats: pass1.stats,
            field_stats: pass2.stats,
        }
    }
}

impl Default for SchemaProfiler {
    fn default() -> Self {
        Self::new(ProfilerConfig::default())
    }
}
