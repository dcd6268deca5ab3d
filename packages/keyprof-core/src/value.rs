//! Record value model.
//!
//! A [`Record`] is an insertion-ordered mapping of field names to [`Value`]s.
//! Values form an owned tree: every sub-record belongs to exactly one parent,
//! so traversal always terminates.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{KeyprofError, Result};

/// Leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    Str(String),
}

/// A field value: scalar, sequence, or nested record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Record(Record),
}

/// Ordered field-name to value mapping with unique keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Value {
    /// Shorthand for a null scalar.
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Converts back into a `serde_json::Value`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Scalar(Scalar::Null) => JsonValue::Null,
            Value::Scalar(Scalar::Bool(b)) => JsonValue::Bool(*b),
            Value::Scalar(Scalar::Int(i)) => JsonValue::from(*i),
            Value::Scalar(Scalar::UInt(u)) => JsonValue::from(*u),
            // Non-finite floats have no JSON form
            Value::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Scalar(Scalar::Str(s)) => JsonValue::String(s.clone()),
            Value::Sequence(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Record(r) => r.to_json(),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Scalar(Scalar::Null),
            JsonValue::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            JsonValue::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Scalar(Scalar::Int(i)),
                (None, Some(u)) => Value::Scalar(Scalar::UInt(u)),
                (None, None) => Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            JsonValue::String(s) => Value::Scalar(Scalar::Str(s)),
            JsonValue::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Record(Record::from(map)),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i as i64))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Builds a record from a JSON value; `None` unless it is an object.
    pub fn from_json(json: JsonValue) -> Option<Self> {
        match json {
            JsonValue::Object(map) => Some(Record::from(map)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Inserts a field, replacing and returning any previous value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves a dotted path such as `person.email` through nested records.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.as_record()?.get(segment)?;
        }
        Some(current)
    }

    /// Sets the value at a dotted path, creating intermediate records.
    ///
    /// Fails with `InvalidPath` for empty segments or when an intermediate
    /// field exists but is not a record.
    pub fn set_path(&mut self, path: &str, value: Value) -> Result<Option<Value>> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(KeyprofError::InvalidPath(path.to_string()));
        }
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| KeyprofError::InvalidPath(path.to_string()))?;

        let mut current = self;
        for segment in parents {
            if !current.contains_key(segment) {
                current.insert(*segment, Record::new());
            }
            current = current
                .get_mut(segment)
                .and_then(Value::as_record_mut)
                .ok_or_else(|| KeyprofError::InvalidPath(path.to_string()))?;
        }
        Ok(current.insert(*last, value))
    }

    pub fn to_json(&self) -> JsonValue {
        let map: serde_json::Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        JsonValue::Object(map)
    }
}

impl From<serde_json::Map<String, JsonValue>> for Record {
    fn from(map: serde_json::Map<String, JsonValue>) -> Self {
        let mut record = Record::with_capacity(map.len());
        for (k, v) in map {
            record.fields.push((k, Value::from(v)));
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, &v.to_json())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = serde_json::Map::deserialize(deserializer)?;
        Ok(Record::from(map))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Value::from(JsonValue::deserialize(deserializer)?))
    }
}
