//! In-memory record collection keyed by `_id`, plus JSON-lines I/O.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{KeyprofError, Result};
use crate::jobs::KeyValue;
use crate::value::{Record, Value};

/// Name of the identity field.
pub const ID_FIELD: &str = "_id";

/// Ordered records with a unique `_id` index.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    name: String,
    records: Vec<Record>,
    index: BTreeMap<KeyValue, usize>,
    next_auto_id: i64,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builds a collection, assigning `_id`s where missing.
    pub fn from_records(name: impl Into<String>, records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let mut collection = Self::new(name);
        for record in records {
            collection.insert(record)?;
        }
        Ok(collection)
    }

    /// Loads a JSON-lines file into a new collection.
    pub fn load_jsonl(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        Self::from_records(name, read_jsonl(path)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Inserts a record, returning its `_id`.
    ///
    /// Records without `_id` get the next free integer id.
    pub fn insert(&mut self, mut record: Record) -> Result<KeyValue> {
        let id = match record.get(ID_FIELD) {
            Some(value) => KeyValue::from(value),
            None => {
                let id = self.next_free_id();
                record.insert(ID_FIELD, id);
                KeyValue::Int(id)
            }
        };
        if self.index.contains_key(&id) {
            return Err(KeyprofError::DuplicateId(id.to_string()));
        }
        if let KeyValue::Int(i) = id {
            self.next_auto_id = self.next_auto_id.max(i.saturating_add(1));
        }
        self.index.insert(id.clone(), self.records.len());
        self.records.push(record);
        Ok(id)
    }

    fn next_free_id(&mut self) -> i64 {
        while self.index.contains_key(&KeyValue::Int(self.next_auto_id)) {
            match self.next_auto_id.checked_add(1) {
                Some(next) => self.next_auto_id = next,
                None => return self.lowest_free_id(),
            }
        }
        self.next_auto_id
    }

    /// Smallest non-negative integer id not in use.
    ///
    /// At most `len()` ids are taken, so one of `0..=len()` is free.
    fn lowest_free_id(&self) -> i64 {
        let mut candidate = 0i64;
        for (key, _) in self.index.range(KeyValue::Int(0)..) {
            match key {
                KeyValue::Int(i) if *i == candidate => candidate += 1,
                _ => break,
            }
        }
        candidate
    }

    pub fn find_one(&self, id: &KeyValue) -> Option<&Record> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Sets `path` on the record with `id`, returning the previous value.
    pub fn set_path(&mut self, id: &KeyValue, path: &str, value: Value) -> Result<Option<Value>> {
        if path == ID_FIELD || path.starts_with("_id.") {
            return Err(KeyprofError::InvalidPath(path.to_string()));
        }
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| KeyprofError::RecordNotFound(id.to_string()))?;
        self.records[pos].set_path(path, value)
    }

    pub fn remove(&mut self, id: &KeyValue) -> Option<Record> {
        let pos = self.index.remove(id)?;
        let record = self.records.remove(pos);
        self.reindex();
        Some(record)
    }

    /// Removes every record whose `_id` is in `ids`; returns how many went.
    pub fn remove_many(&mut self, ids: &BTreeSet<KeyValue>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|r| !ids.contains(&KeyValue::from_path(r, ID_FIELD)));
        self.reindex();
        before - self.records.len()
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, r)| (KeyValue::from_path(r, ID_FIELD), pos))
            .collect();
    }

    /// Writes the collection as JSON lines.
    pub fn write_jsonl(&self, path: impl AsRef<Path>) -> Result<()> {
        write_jsonl(path, &self.records)
    }
}

/// Reads one JSON object per line; blank lines are skipped.
pub fn read_jsonl(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| KeyprofError::Io(format!("{}: {}", path.display(), e)))?;
    parse_jsonl(BufReader::new(file))
}

/// Parses JSON lines from any buffered reader.
pub fn parse_jsonl(reader: impl BufRead) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let json: serde_json::Value =
            serde_json::from_str(&line).map_err(|e| KeyprofError::Parse {
                line: line_no,
                message: e.to_string(),
            })?;
        let record = Record::from_json(json).ok_or(KeyprofError::NotARecord { line: line_no })?;
        records.push(record);
    }
    tracing::debug!("Parsed {} records", records.len());
    Ok(records)
}

pub fn write_jsonl(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).map_err(|e| KeyprofError::Io(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(|e| KeyprofError::Io(e.to_string()))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
