//! Profiler scenarios over hand-written records.

use std::collections::BTreeMap;

use serde_json::json;

use keyprof_core::config::ProfilerConfig;
use keyprof_core::flatten::{flatten, FlattenOptions};
use keyprof_core::mapreduce::Engine;
use keyprof_core::profiler::{KeysJob, SchemaProfiler, SignatureAggregate};
use keyprof_core::{Record, Signature};

fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|v| Record::from_json(v).unwrap())
        .collect()
}

fn fields_by_count(profiler: &SchemaProfiler, input: &[Record]) -> Vec<(Vec<String>, u64)> {
    let mut out: Vec<_> = profiler
        .signatures(input)
        .results
        .into_values()
        .map(|agg| (agg.fields, agg.cnt))
        .collect();
    out.sort();
    out
}

/// Two distinct signatures, counted 2 and 1
#[test]
fn test_flat_records_group_by_field_set() {
    let input = records(vec![
        json!({"a": 1, "b": 2}),
        json!({"a": 3, "b": 4}),
        json!({"a": 5, "c": 6}),
    ]);
    let got = fields_by_count(&SchemaProfiler::default(), &input);
    assert_eq!(
        got,
        vec![
            (vec!["a".to_string(), "b".to_string()], 2),
            (vec!["a".to_string(), "c".to_string()], 1),
        ]
    );
}

/// level_max = 0 keeps nested records opaque
#[test]
fn test_level_zero_flattening() {
    let input = records(vec![json!({"a": {"b": 1}})]);
    let options = FlattenOptions {
        level_max: 0,
        include_container_keys: false,
    };
    assert_eq!(flatten(&input[0], &options).into_sorted(), vec!["a"]);

    let profiler = SchemaProfiler::new(ProfilerConfig {
        level_max: 0,
        ..Default::default()
    });
    let profile = profiler.profile(&input);
    assert_eq!(profile.fields.keys().collect::<Vec<_>>(), vec!["a"]);
}

/// Container keys listed alongside their leaves
#[test]
fn test_container_keys_flattening() {
    let input = records(vec![json!({"a": {"b": 1}})]);
    let options = FlattenOptions {
        level_max: -1,
        include_container_keys: true,
    };
    assert_eq!(flatten(&input[0], &options).into_sorted(), vec!["a", "a.b"]);

    let out = Engine::sequential().run(&KeysJob { options }, &input);
    let agg = out.results.values().next().unwrap();
    assert_eq!(agg.fields, vec!["a", "a.b"]);
    assert_eq!(agg.depth, 1);
}

/// Pass 2 sums signature counts per field
#[test]
fn test_field_pass_over_signatures() {
    let mut signatures = BTreeMap::new();
    for (i, (fields, cnt)) in [(vec!["a", "b"], 2u64), (vec!["a", "c"], 1)]
        .into_iter()
        .enumerate()
    {
        signatures.insert(
            Signature(i as i32),
            SignatureAggregate {
                cnt,
                percent: 0.0,
                depth: 0,
                fields: fields.into_iter().map(String::from).collect(),
            },
        );
    }

    let out = SchemaProfiler::default().field_meta(&signatures);
    assert_eq!(out.results["a"].cnt, 3);
    assert_eq!(out.results["b"].cnt, 2);
    assert_eq!(out.results["c"].cnt, 1);
    assert_eq!(out.stats.input, 2);
    assert_eq!(out.stats.emit, 4);
    assert_eq!(out.stats.output, 3);
}

#[test]
fn test_sequence_contents_do_not_change_signature() {
    let input = records(vec![
        json!({"tags": [], "user": {"id": 1}}),
        json!({"tags": [{"x": 1}, 2, "three"], "user": {"id": "u"}}),
        json!({"user": {"id": null}, "tags": [[1]]}),
    ]);
    let out = SchemaProfiler::default().signatures(&input);
    assert_eq!(out.results.len(), 1);
    let agg = out.results.values().next().unwrap();
    assert_eq!(agg.cnt, 3);
    assert_eq!(agg.fields, vec!["tags", "user.id"]);
}

#[test]
fn test_signature_key_is_hash_of_joined_paths() {
    let input = records(vec![json!({"b": 1, "a": {"c": 2}})]);
    let out = SchemaProfiler::default().signatures(&input);
    let (key, agg) = out.results.iter().next().unwrap();
    assert_eq!(*key, Signature(keyprof_core::str_hash("a.c b")));
    assert_eq!(agg.fields, vec!["a.c", "b"]);
}

#[test]
fn test_empty_record_signature() {
    let input = records(vec![json!({}), json!({})]);
    let out = SchemaProfiler::default().signatures(&input);
    let agg = &out.results[&Signature(0)];
    assert_eq!(agg.cnt, 2);
    assert!(agg.fields.is_empty());
}
