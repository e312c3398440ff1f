use std::fs;

use fieldsift_core::{project, project_cloned, FilterValue, MatchOptions, Operator};
use fieldsift_io::{
    export, ConditionStore, ExportFormat, FileSource, SourceChain, TextSource, DEFAULT_BASE_NAME,
};
use serde_json::Value;
use tempfile::TempDir;

fn embedded() -> fieldsift_io::Dataset {
    SourceChain::new()
        .with_embedded_fallback()
        .resolve()
        .unwrap()
        .dataset
}

fn ids(records: &[&Value]) -> Vec<i64> {
    records.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

#[test]
fn embedded_fields_form_a_valid_schema() {
    let dataset = embedded();
    let schema = dataset.schema().unwrap();
    assert_eq!(schema.len(), 13);
    assert_eq!(schema.first().unwrap().name, "name");
    assert_eq!(dataset.records.len(), 12);
}

#[test]
fn missing_files_fall_back_to_embedded() {
    let dir = TempDir::new().unwrap();
    let resolved = SourceChain::new()
        .try_source(FileSource::new(
            Some(dir.path().join("records.json")),
            Some(dir.path().join("fields.json")),
        ))
        .with_embedded_fallback()
        .resolve()
        .unwrap();
    assert_eq!(resolved.records_from, "embedded");
    assert_eq!(resolved.fields_from, "embedded");
}

#[test]
fn empty_record_file_falls_back_but_fields_file_is_used() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("records.json");
    let fields = dir.path().join("fields.json");
    fs::write(&records, "[]").unwrap();
    fs::write(
        &fields,
        r#"[{"name": "name", "label": "Name", "type": "text", "operators": ["equals"]}]"#,
    )
    .unwrap();

    let resolved = SourceChain::new()
        .try_source(FileSource::new(Some(records), Some(fields)))
        .with_embedded_fallback()
        .resolve()
        .unwrap();
    assert_eq!(resolved.records_from, "embedded");
    assert_eq!(resolved.fields_from, "file");
    assert_eq!(resolved.dataset.fields.len(), 1);
}

#[test]
fn malformed_text_source_is_skipped() {
    let resolved = SourceChain::new()
        .try_source(TextSource::new(Some("{oops".into()), None))
        .with_embedded_fallback()
        .resolve()
        .unwrap();
    assert_eq!(resolved.records_from, "embedded");
}

#[test]
fn saved_conditions_filter_embedded_records() {
    let dataset = embedded();
    let schema = dataset.schema().unwrap();
    let dir = TempDir::new().unwrap();
    let store = ConditionStore::new(dir.path().join("state.json"));

    let department = schema.get("department").unwrap();
    let set = store.load().with_added(
        fieldsift_core::FilterCondition::for_field("filter-1", department)
            .with_operator(Operator::Is)
            .with_value(FilterValue::select("Engineering")),
    );
    store.save(&set).unwrap();

    let restored = schema.reconcile(&store.load());
    assert_eq!(restored, set);
    assert_eq!(restored.next_id(), "filter-2");

    let matched = project(&dataset.records, restored.as_slice());
    assert_eq!(ids(&matched), vec![1, 2, 5, 8, 11]);
}

#[test]
fn export_projection_as_csv() {
    let dataset = embedded();
    let schema = dataset.schema().unwrap();
    let active = schema.get("isActive").unwrap();
    let set = fieldsift_core::ConditionSet::new().with_added(
        fieldsift_core::FilterCondition::for_field("filter-1", active)
            .with_value(FilterValue::boolean(false)),
    );

    let inactive = project_cloned(&dataset.records, set.as_slice(), MatchOptions::default());
    let out = export(&inactive, ExportFormat::Csv, DEFAULT_BASE_NAME).unwrap();
    assert_eq!(out.format, ExportFormat::Csv);

    let text = String::from_utf8(out.bytes).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,name,email"));
    assert!(header.contains("address.city"));
    assert_eq!(lines.count(), 3);
}
