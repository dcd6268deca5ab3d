//! Field statistics report built from a [`SchemaProfile`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{KeyprofError, Result};
use crate::profiler::SchemaProfile;

/// Note attached to fields the storage engine creates internally.
pub const HIDDEN_FIELD_NOTE: &str = "-hidden mongo field";

const FIELD_WIDTH: usize = 50;
const CNT_WIDTH: usize = 16;
const PERCENT_WIDTH: usize = 7;
const DEPTH_WIDTH: usize = 5;
const NOTES_WIDTH: usize = 20;

/// One line of the field report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    pub field: String,
    pub cnt: u64,
    pub percent: f64,
    pub depth: usize,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub max_depth: usize,
    pub total_fields: usize,
}

/// Per-field rows sorted by field name, plus summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    pub rows: Vec<FieldRow>,
    pub summary: ReportSummary,
}

impl FieldReport {
    pub fn build(profile: &SchemaProfile, hidden_fields: &[String]) -> Self {
        let rows: Vec<FieldRow> = profile
            .fields
            .iter()
            .map(|(field, agg)| FieldRow {
                field: field.clone(),
                cnt: agg.cnt,
                percent: agg.percent,
                depth: agg.depth,
                notes: if is_hidden(field, agg.depth, hidden_fields) {
                    HIDDEN_FIELD_NOTE.to_string()
                } else {
                    String::new()
                },
            })
            .collect();

        let summary = ReportSummary {
            max_depth: rows.iter().map(|r| r.depth).max().unwrap_or(0),
            total_fields: rows.len(),
        };
        Self { rows, summary }
    }

    /// Renders rows as a fixed-width table framed by dotted rules.
    pub fn render_table(&self) -> String {
        let header = format!(
            "|{:^fw$}|{:^cw$}|{:^pw$}|{:^dw$}|{:^nw$}|",
            "field",
            "cnt",
            "percent",
            "depth",
            "notes",
            fw = FIELD_WIDTH,
            cw = CNT_WIDTH,
            pw = PERCENT_WIDTH,
            dw = DEPTH_WIDTH,
            nw = NOTES_WIDTH
        );
        let rule = ".".repeat(header.chars().count());

        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&header);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "|{:^fw$}|{:>cw$}|{:>pw$.2}|{:>dw$}|{:^nw$}|\n",
                row.field,
                thousands(row.cnt),
                row.percent,
                row.depth,
                row.notes,
                fw = FIELD_WIDTH,
                cw = CNT_WIDTH,
                pw = PERCENT_WIDTH,
                dw = DEPTH_WIDTH,
                nw = NOTES_WIDTH
            ));
        }
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "max depth: {}, total fields: {}\n",
            self.summary.max_depth, self.summary.total_fields
        ));
        out
    }
}

fn is_hidden(field: &str, depth: usize, hidden_fields: &[String]) -> bool {
    if depth <= 1 {
        return false;
    }
    if field == "_id.str" {
        return true;
    }
    let last = field.rsplit('.').next().unwrap_or(field);
    hidden_fields.iter().any(|h| h == last)
}

/// Formats `n` with comma thousands separators.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Keeps only fields that are not the parent of another field.
pub fn exclude_parents(fields: &[String]) -> Vec<String> {
    let parents: BTreeSet<&str> = fields
        .iter()
        .flat_map(|f| f.match_indices('.').map(move |(i, _)| &f[..i]))
        .collect();
    fields
        .iter()
        .filter(|f| !parents.contains(f.as_str()))
        .cloned()
        .collect()
}

/// Writes leaf fields of `profile`, minus `exclude`, one per line.
///
/// Returns the written field names.
pub fn export_fields(
    path: impl AsRef<Path>,
    profile: &SchemaProfile,
    exclude: &[String],
) -> Result<Vec<String>> {
    let path = path.as_ref();
    let all: Vec<String> = profile.fields.keys().cloned().collect();
    let fields: Vec<String> = exclude_parents(&all)
        .into_iter()
        .filter(|f| !exclude.contains(f))
        .collect();

    let file =
        File::create(path).map_err(|e| KeyprofError::Io(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    for field in &fields {
        writeln!(writer, "{}", field)?;
    }
    writer.flush()?;
    tracing::info!("Exported {} fields to {}", fields.len(), path.display());
    Ok(fields)
}
