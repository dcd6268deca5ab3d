//! Collection maintenance utilities: field copy, array extraction and
//! duplicate removal.
//!
//! Each utility walks the collection once, logs progress every
//! `report_every` records and returns its counters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::collection::{Collection, ID_FIELD};
use crate::error::{KeyprofError, Result};
use crate::jobs::KeyValue;
use crate::value::{Record, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyStats {
    /// Records matching the filter
    pub docs_processed: usize,
    /// Records where the source field existed and was copied
    pub docs_copied: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Source records holding the field
    pub input: usize,
    /// Elements inserted into the target
    pub inserted: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    pub docs_cnt: usize,
    pub docs_removed: usize,
}

fn should_report(counter: usize, report_every: usize) -> bool {
    report_every > 0 && counter % report_every == 0
}

/// Copies the value at `from` to `to` on every record matching `filter`.
///
/// Both are dotted paths, e.g. `person.email` to `person.email_new`.
pub fn copy_field<F>(
    collection: &mut Collection,
    filter: F,
    from: &str,
    to: &str,
    report_every: usize,
) -> Result<CopyStats>
where
    F: Fn(&Record) -> bool,
{
    if from.is_empty() || to.is_empty() {
        return Err(KeyprofError::InvalidPath(format!("{} -> {}", from, to)));
    }

    let mut stats = CopyStats::default();
    let mut updates: Vec<(KeyValue, Value)> = Vec::new();
    for record in collection.iter().filter(|&r| filter(r)) {
        stats.docs_processed += 1;
        if let Some(value) = record.get_path(from) {
            updates.push((KeyValue::from_path(record, ID_FIELD), value.clone()));
        }
    }

    for (id, value) in updates {
        collection.set_path(&id, to, value)?;
        stats.docs_copied += 1;
        if should_report(stats.docs_copied, report_every) {
            tracing::info!("copy_field: doc #{} _id={}", stats.docs_copied, id);
        }
    }

    tracing::debug!(
        "copy_field {} -> {} on '{}': {:?}",
        from,
        to,
        collection.name(),
        stats
    );
    Ok(stats)
}

/// Inserts every element of the array at `field` into `target`.
///
/// Record elements are inserted as-is; scalars and nested arrays are
/// wrapped as `{ value: x }`. Elements whose `_id` already exists in the
/// target are skipped.
pub fn extract_array_field(
    source: &Collection,
    field: &str,
    target: &mut Collection,
    report_every: usize,
) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();
    for record in source.iter() {
        let Some(value) = record.get_path(field) else {
            continue;
        };
        let items = value.as_sequence().ok_or_else(|| KeyprofError::NotASequence {
            field: field.to_string(),
        })?;
        stats.input += 1;

        for item in items {
            let element = match item {
                Value::Record(r) => r.clone(),
                other => {
                    let mut wrapped = Record::new();
                    wrapped.insert("value", other.clone());
                    wrapped
                }
            };
            match target.insert(element) {
                Ok(_) => stats.inserted += 1,
                Err(KeyprofError::DuplicateId(id)) => {
                    tracing::warn!("extract_array_field: skipping duplicate _id={}", id);
                }
                Err(e) => return Err(e),
            }
        }

        if should_report(stats.input, report_every) {
            tracing::info!("extract_array_field: {:?}", stats);
        }
    }
    Ok(stats)
}

/// Removes records whose `key_field` repeats, keeping the first in key order.
///
/// Records lacking the key group together under null.
pub fn remove_duplicates(
    collection: &mut Collection,
    key_field: &str,
    report_every: usize,
) -> Result<DedupStats> {
    if key_field.is_empty() {
        return Err(KeyprofError::InvalidPath(key_field.to_string()));
    }

    let mut keyed: Vec<(KeyValue, KeyValue)> = collection
        .iter()
        .map(|r| (KeyValue::from_path(r, key_field), KeyValue::from_path(r, ID_FIELD)))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut stats = DedupStats::default();
    let mut doomed = BTreeSet::new();
    let mut last: Option<&KeyValue> = None;
    for (key, id) in &keyed {
        stats.docs_cnt += 1;
        if last == Some(key) {
            doomed.insert(id.clone());
        } else {
            last = Some(key);
        }
        if should_report(stats.docs_cnt, report_every) {
            tracing::info!("remove_duplicates: {:?}", stats);
        }
    }

    stats.docs_removed = collection.remove_many(&doomed);
    tracing::debug!("remove_duplicates on '{}': {:?}", collection.name(), stats);
    Ok(stats)
}
