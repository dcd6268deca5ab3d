//! General-purpose map/reduce jobs over records.
//!
//! [`GroupCounts`] counts records per distinct value of a field. [`Orphans`]
//! and [`Join`] run in two phases, one per collection, over a shared key
//! field; the phase outputs are combined with [`JobOutput::merge`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mapreduce::{Emitter, Engine, JobOutput, MapReduce};
use crate::value::{Record, Scalar, Value};

/// Orderable grouping key derived from a field value.
///
/// Floats and composite values group by their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Text(String),
}

impl KeyValue {
    /// Key for the value at `path`, `Null` when missing.
    pub fn from_path(record: &Record, path: &str) -> Self {
        record.get_path(path).map(KeyValue::from).unwrap_or(KeyValue::Null)
    }
}

impl From<&Value> for KeyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Scalar(Scalar::Null) => KeyValue::Null,
            Value::Scalar(Scalar::Bool(b)) => KeyValue::Bool(*b),
            Value::Scalar(Scalar::Int(i)) => KeyValue::Int(*i),
            Value::Scalar(Scalar::UInt(u)) => KeyValue::UInt(*u),
            Value::Scalar(Scalar::Str(s)) => KeyValue::Text(s.clone()),
            other => KeyValue::Text(other.to_json().to_string()),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Null => f.pad("null"),
            KeyValue::Bool(b) => fmt::Display::fmt(b, f),
            KeyValue::Int(i) => fmt::Display::fmt(i, f),
            KeyValue::UInt(u) => fmt::Display::fmt(u, f),
            KeyValue::Text(s) => f.pad(s),
        }
    }
}

/// Counts records per distinct value of `field`.
#[derive(Debug, Clone)]
pub struct GroupCounts {
    pub field: String,
}

impl MapReduce for GroupCounts {
    type Input = Record;
    type Key = KeyValue;
    type Value = u64;

    fn map(&self, record: &Record, emit: &mut Emitter<KeyValue, u64>) {
        emit.emit(KeyValue::from_path(record, &self.field), 1);
    }

    fn reduce(&self, _key: &KeyValue, values: Vec<u64>) -> u64 {
        values.into_iter().sum()
    }
}

/// Which collection a two-phase job is mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    A,
    B,
}

/// Per-key presence counts across two collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanCounts {
    /// Records in collection A
    pub a: u64,
    /// Records in collection B
    pub b: u64,
    pub sum: u64,
}

/// Counts records per key field value in each of two collections.
///
/// Keys with `a == 0` exist only in B, keys with `b == 0` only in A.
#[derive(Debug, Clone)]
pub struct Orphans {
    pub key_field: String,
    pub phase: Phase,
}

impl MapReduce for Orphans {
    type Input = Record;
    type Key = KeyValue;
    type Value = OrphanCounts;

    fn map(&self, record: &Record, emit: &mut Emitter<KeyValue, OrphanCounts>) {
        let counts = match self.phase {
            Phase::A => OrphanCounts { a: 1, b: 0, sum: 1 },
            Phase::B => OrphanCounts { a: 0, b: 1, sum: 1 },
        };
        emit.emit(KeyValue::from_path(record, &self.key_field), counts);
    }

    fn reduce(&self, _key: &KeyValue, values: Vec<OrphanCounts>) -> OrphanCounts {
        values.into_iter().fold(OrphanCounts::default(), |acc, v| OrphanCounts {
            a: acc.a + v.a,
            b: acc.b + v.b,
            sum: acc.sum + v.sum,
        })
    }
}

/// Pair of records sharing a key; either side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinPair {
    pub a: Option<Record>,
    pub b: Option<Record>,
}

/// Joins two collections on a key field.
///
/// When several records share a key on one side, the last one seen wins.
#[derive(Debug, Clone)]
pub struct Join {
    pub key_field: String,
    pub phase: Phase,
}

impl MapReduce for Join {
    type Input = Record;
    type Key = KeyValue;
    type Value = JoinPair;

    fn map(&self, record: &Record, emit: &mut Emitter<KeyValue, JoinPair>) {
        let pair = match self.phase {
            Phase::A => JoinPair {
                a: Some(record.clone()),
                b: None,
            },
            Phase::B => JoinPair {
                a: None,
                b: Some(record.clone()),
            },
        };
        emit.emit(KeyValue::from_path(record, &self.key_field), pair);
    }

    fn reduce(&self, _key: &KeyValue, values: Vec<JoinPair>) -> JoinPair {
        values.into_iter().fold(JoinPair::default(), |acc, v| JoinPair {
            a: v.a.or(acc.a),
            b: v.b.or(acc.b),
        })
    }
}

/// Runs a two-phase job: `a_key` over collection A, then `b_key` over B.
pub fn orphans(
    engine: &Engine,
    a: &[Record],
    a_key: &str,
    b: &[Record],
    b_key: &str,
) -> JobOutput<KeyValue, OrphanCounts> {
    let job_a = Orphans {
        key_field: a_key.to_string(),
        phase: Phase::A,
    };
    let job_b = Orphans {
        key_field: b_key.to_string(),
        phase: Phase::B,
    };
    engine.run(&job_a, a).merge(engine.run(&job_b, b), &job_b)
}

/// Joins collection A on `a_key` with collection B on `b_key`.
pub fn join(
    engine: &Engine,
    a: &[Record],
    a_key: &str,
    b: &[Record],
    b_key: &str,
) -> JobOutput<KeyValue, JoinPair> {
    let job_a = Join {
        key_field: a_key.to_string(),
        phase: Phase::A,
    };
    let job_b = Join {
        key_field: b_key.to_string(),
        phase: Phase::B,
    };
    engine.run(&job_a, a).merge(engine.run(&job_b, b), &job_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| Record::from_json(v).unwrap())
            .collect()
    }

    #[test]
    fn test_group_counts() {
        let input = records(vec![
            json!({"lang": "en"}),
            json!({"lang": "ja"}),
            json!({"lang": "en"}),
            json!({"other": 1}),
        ]);
        let out = Engine::sequential().run(
            &GroupCounts {
                field: "lang".to_string(),
            },
            &input,
        );
        assert_eq!(out.results[&KeyValue::Text("en".to_string())], 2);
        assert_eq!(out.results[&KeyValue::Text("ja".to_string())], 1);
        assert_eq!(out.results[&KeyValue::Null], 1);
    }

    #[test]
    fn test_group_counts_nested_path() {
        let input = records(vec![
            json!({"user": {"id": 1}}),
            json!({"user": {"id": 1}}),
            json!({"user": {"id": 2}}),
        ]);
        let out = Engine::new(2).run(
            &GroupCounts {
                field: "user.id".to_string(),
            },
            &input,
        );
        assert_eq!(out.results[&KeyValue::Int(1)], 2);
        assert_eq!(out.results[&KeyValue::Int(2)], 1);
    }

    #[test]
    fn test_orphans() {
        let tweets = records(vec![
            json!({"user": {"screen_name": "ann"}}),
            json!({"user": {"screen_name": "bob"}}),
            json!({"user": {"screen_name": "ann"}}),
        ]);
        let users = records(vec![
            json!({"screen_name": "ann"}),
            json!({"screen_name": "cat"}),
        ]);

        let out = orphans(
            &Engine::sequential(),
            &tweets,
            "user.screen_name",
            &users,
            "screen_name",
        );
        let key = |s: &str| KeyValue::Text(s.to_string());
        assert_eq!(out.results[&key("ann")], OrphanCounts { a: 2, b: 1, sum: 3 });
        assert_eq!(out.results[&key("bob")], OrphanCounts { a: 1, b: 0, sum: 1 });
        assert_eq!(out.results[&key("cat")], OrphanCounts { a: 0, b: 1, sum: 1 });
    }

    #[test]
    fn test_join() {
        let orders = records(vec![
            json!({"id": 1, "customer": "c1"}),
            json!({"id": 2, "customer": "c2"}),
        ]);
        let customers = records(vec![json!({"cid": "c1", "name": "Ann"})]);

        let out = join(&Engine::sequential(), &orders, "customer", &customers, "cid");
        let c1 = &out.results[&KeyValue::Text("c1".to_string())];
        assert_eq!(c1.a.as_ref().and_then(|r| r.get("id")), Some(&Value::from(1)));
        assert_eq!(
            c1.b.as_ref().and_then(|r| r.get("name")),
            Some(&Value::from("Ann"))
        );
        let c2 = &out.results[&KeyValue::Text("c2".to_string())];
        assert!(c2.a.is_some());
        assert!(c2.b.is_none());
    }

    #[test]
    fn test_key_value_for_composites() {
        let record = Record::from_json(json!({"tags": [1, 2], "f": 1.5})).unwrap();
        assert_eq!(KeyValue::from_path(&record, "tags"), KeyValue::Text("[1,2]".to_string()));
        assert_eq!(KeyValue::from_path(&record, "f"), KeyValue::Text("1.5".to_string()));
        assert_eq!(KeyValue::from_path(&record, "missing"), KeyValue::Null);
    }
}
