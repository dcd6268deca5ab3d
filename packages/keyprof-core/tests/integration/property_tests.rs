//! Order, partition and hashing properties of the profiler.

use ntest::timeout;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::json;

use keyprof_core::flatten::{flatten, FlattenOptions};
use keyprof_core::mapreduce::Engine;
use keyprof_core::config::ProfilerConfig;
use keyprof_core::profiler::{KeysJob, SchemaProfiler};
use keyprof_core::testdoc::test_doc;
use keyprof_core::{segment_depth, str_hash, Record, Signature, Value};

fn mixed_records(rng: &mut StdRng, count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let mut doc = test_doc(rng, i % 4);
            if i % 3 == 0 {
                doc.insert(
                    "person",
                    Record::from_json(json!({"email": "x", "name": {"first": "y"}})).unwrap(),
                );
            }
            if i % 5 == 0 {
                doc.insert("tags", Value::Sequence(vec![Value::from(1)]));
            }
            doc
        })
        .collect()
}

/// Rebuilds a record with its keys (recursively) in reverse order.
fn reversed(record: &Record) -> Record {
    let mut out = Record::new();
    let fields: Vec<_> = record.iter().collect();
    for (key, value) in fields.into_iter().rev() {
        let value = match value {
            Value::Record(sub) => Value::Record(reversed(sub)),
            other => other.clone(),
        };
        out.insert(key, value);
    }
    out
}

#[test]
fn test_key_order_does_not_change_signature() {
    let mut rng = StdRng::seed_from_u64(42);
    let options = FlattenOptions {
        level_max: -1,
        include_container_keys: true,
    };
    for record in mixed_records(&mut rng, 50) {
        let a = flatten(&record, &options).into_sorted();
        let b = flatten(&reversed(&record), &options).into_sorted();
        assert_eq!(a, b);
        assert_eq!(Signature::from_sorted(&a), Signature::from_sorted(&b));
    }
}

#[test]
fn test_sort_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(3);
    for record in mixed_records(&mut rng, 20) {
        let sorted = flatten(&record, &FlattenOptions::default()).into_sorted();
        let mut again = sorted.clone();
        again.sort();
        assert_eq!(sorted, again);
    }
}

#[test]
fn test_hash_is_deterministic() {
    for s in ["a", "a b", "person.email person.name", "lang fld_0 fld_1", "ünïcode"] {
        assert_eq!(str_hash(s), str_hash(s));
    }
    assert_eq!(str_hash(""), 0);
}

#[test]
fn test_depth_counts_segments() {
    assert_eq!(segment_depth("a.b.c"), 3);
    assert_eq!(segment_depth("a"), 1);
}

#[test]
#[timeout(10000)]
fn test_partitioned_runs_match_whole_input() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut input = mixed_records(&mut rng, 500);
    let job = KeysJob::default();
    let whole = Engine::sequential().run(&job, &input).results;

    for partitions in [0, 2, 7, 64] {
        let out = Engine::new(partitions).run(&job, &input);
        assert_eq!(out.results, whole, "partitions={}", partitions);
    }

    // Arbitrary split, shuffled, merged by summing counts
    input.shuffle(&mut rng);
    let (left, right) = input.split_at(173);
    let merged = Engine::new(3)
        .run(&job, left)
        .merge(Engine::new(2).run(&job, right), &job);
    assert_eq!(merged.results.len(), whole.len());
    for (key, agg) in &whole {
        let got = &merged.results[key];
        assert_eq!(got.cnt, agg.cnt);
        assert_eq!(got.fields, agg.fields);
    }
    assert_eq!(merged.stats.input, 500);
}

#[test]
#[timeout(10000)]
fn test_field_percents_bitwise_equal_across_partitions() {
    let mut rng = StdRng::seed_from_u64(7);
    let input = mixed_records(&mut rng, 997);
    let profile_with = |partitions: usize| {
        SchemaProfiler::new(ProfilerConfig {
            partitions,
            ..Default::default()
        })
        .profile(&input)
    };
    let expected = profile_with(1);
    assert!(expected.signatures.len() > 1);

    for partitions in [2, 3, 7, 13, 64] {
        let profile = profile_with(partitions);
        assert_eq!(profile.fields.len(), expected.fields.len());
        for (field, agg) in &expected.fields {
            let got = &profile.fields[field];
            assert_eq!(got.cnt, agg.cnt, "partitions={} field={}", partitions, field);
            assert_eq!(
                got.percent.to_bits(),
                agg.percent.to_bits(),
                "partitions={} field={}",
                partitions,
                field
            );
        }
    }
}
