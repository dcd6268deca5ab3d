//! File-based pipeline: JSON lines in, field report and export out.

use std::io::Write;

use tempfile::tempdir;

use keyprof_core::collection::{read_jsonl, Collection};
use keyprof_core::config::ProfilerConfig;
use keyprof_core::error::KeyprofError;
use keyprof_core::maintenance::{copy_field, remove_duplicates};
use keyprof_core::report::{export_fields, FieldReport, HIDDEN_FIELD_NOTE};
use keyprof_core::SchemaProfiler;

const TWEETS: &str = r#"{"_id": 1, "id": {"floatApprox": 1, "bottom": 2}, "coordinates": null, "entities": {"hashtags": [], "urls": []}}
{"_id": 2, "id": {"floatApprox": 3, "bottom": 4}, "coordinates": {"type": "Point", "coordinates": [1, 2]}, "entities": {"hashtags": [], "urls": []}}

{"_id": 3, "id": {"floatApprox": 5, "bottom": 6}, "coordinates": null, "entities": {"hashtags": ["x"], "urls": [], "media": [{}]}}
{"_id": 4, "id": {"floatApprox": 7, "bottom": 8}, "coordinates": null, "entities": {"hashtags": [], "urls": []}}
"#;

fn write_input(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("tweets.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(TWEETS.as_bytes()).unwrap();
    path
}

#[test]
fn test_profile_jsonl_file() {
    let dir = tempdir().unwrap();
    let records = read_jsonl(write_input(dir.path())).unwrap();
    assert_eq!(records.len(), 4);

    let config = ProfilerConfig {
        include_container_keys: true,
        ..Default::default()
    };
    let profiler = SchemaProfiler::new(config.clone());
    let profile = profiler.profile(&records);

    assert_eq!(profile.total_records, 4);
    assert_eq!(profile.signatures.len(), 3);
    assert_eq!(profile.fields["coordinates"].cnt, 4);
    assert_eq!(profile.fields["coordinates.type"].cnt, 1);
    assert!((profile.fields["coordinates.type"].percent - 25.0).abs() < 1e-9);
    assert!((profile.fields["entities"].percent - 100.0).abs() < 1e-9);
    assert_eq!(profile.fields["entities.media"].cnt, 1);
    assert_eq!(profile.fields["entities.media"].depth, 2);

    let report = FieldReport::build(&profile, &config.hidden_fields);
    let bottom = report.rows.iter().find(|r| r.field == "id.bottom").unwrap();
    assert_eq!(bottom.notes, HIDDEN_FIELD_NOTE);
    assert_eq!(report.summary.max_depth, 2);

    let table = report.render_table();
    assert!(table.contains("coordinates.coordinates"));
}

#[test]
fn test_export_leaf_fields() {
    let dir = tempdir().unwrap();
    let records = read_jsonl(write_input(dir.path())).unwrap();
    let profile = SchemaProfiler::new(ProfilerConfig {
        include_container_keys: true,
        ..Default::default()
    })
    .profile(&records);

    let out = dir.path().join("fields.txt");
    let fields = export_fields(&out, &profile, &["_id".to_string()]).unwrap();
    assert!(!fields.contains(&"entities".to_string()));
    assert!(!fields.contains(&"_id".to_string()));
    assert!(fields.contains(&"entities.hashtags".to_string()));
    assert!(fields.contains(&"coordinates.type".to_string()));

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), fields.len());
}

#[test]
fn test_maintenance_then_reprofile() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut coll = Collection::load_jsonl("tweets", write_input(dir.path()))?;

    let stats = copy_field(&mut coll, |_| true, "coordinates.type", "geo.type", 1000)?;
    assert_eq!(stats.docs_processed, 4);
    assert_eq!(stats.docs_copied, 1);

    let dedup = remove_duplicates(&mut coll, "coordinates", 1000)?;
    assert_eq!(dedup.docs_removed, 2);
    assert_eq!(coll.len(), 2);

    let saved = dir.path().join("out.jsonl");
    coll.write_jsonl(&saved)?;
    let profile = SchemaProfiler::default().profile(&read_jsonl(&saved)?);
    assert_eq!(profile.total_records, 2);
    assert_eq!(profile.fields["geo.type"].cnt, 1);
    Ok(())
}

#[test]
fn test_bad_line_reports_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.jsonl");
    std::fs::write(&path, "{\"a\": 1}\n42\n").unwrap();
    assert_eq!(read_jsonl(&path), Err(KeyprofError::NotARecord { line: 2 }));
}
