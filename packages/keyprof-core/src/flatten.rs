//! Field-path flattening.
//!
//! Turns a record's field-name tree into dotted paths by depth-first
//! traversal. Nested records are descended up to `level_max`; sequences are
//! always leaves.

use serde::{Deserialize, Serialize};

use crate::value::{Record, Value};

/// Traversal options for [`flatten`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenOptions {
    /// Maximum nesting level to descend into; negative means unbounded,
    /// 0 means top-level keys only.
    pub level_max: i32,
    /// Also emit the path of every descended nested record.
    pub include_container_keys: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            level_max: -1,
            include_container_keys: false,
        }
    }
}

impl FlattenOptions {
    fn descends_to(&self, level: usize) -> bool {
        self.level_max < 0 || level <= self.level_max as usize
    }
}

/// Flattened field paths of one record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Flattened {
    /// Paths in discovery order.
    pub paths: Vec<String>,
    /// Deepest nesting level descended (0 for a flat record).
    pub max_depth: usize,
}

impl Flattened {
    /// Consumes self, returning the paths sorted ascending.
    pub fn into_sorted(mut self) -> Vec<String> {
        self.paths.sort();
        self.paths
    }
}

/// Flattens `record` into dotted field paths.
///
/// A descended sub-record that is empty emits its own path even when
/// `include_container_keys` is off, so `{a: {}}` flattens to `["a"]` and
/// gets a different signature than `{}`.
pub fn flatten(record: &Record, options: &FlattenOptions) -> Flattened {
    let mut out = Flattened::default();
    walk(record, "", 0, options, &mut out);
    out
}

fn walk(record: &Record, prefix: &str, level: usize, options: &FlattenOptions, out: &mut Flattened) {
    for (key, value) in record.iter() {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Record(sub) if options.descends_to(level + 1) => {
                out.max_depth = out.max_depth.max(level + 1);
                // An empty sub-record has no leaves to record its presence
                if options.include_container_keys || sub.is_empty() {
                    out.paths.push(path.clone());
                }
                walk(sub, &path, level + 1, options, out);
            }
            _ => out.paths.push(path),
        }
    }
}
