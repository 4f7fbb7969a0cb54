use std::fs;

use mvh_ingest::{IngestError, load_source, read_table};
use mvh_model::{SourceConfig, SourceKind};
use tempfile::TempDir;

#[test]
fn loads_configured_source_from_data_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("human-development-index.csv"),
        "Entity,Code,Year,Human Development Index\nNorway,NOR,2019,0.957\nChad,TCD,2019,0.398\n",
    )
    .unwrap();
    let config = SourceConfig::with_data_dir(dir.path());

    let raw = load_source(&config, SourceKind::Hdi).unwrap();

    assert_eq!(raw.source, SourceKind::Hdi);
    assert_eq!(raw.frame.height(), 2);
    assert_eq!(
        raw.frame.get_column_names_str(),
        vec!["Entity", "Code", "Year", "Human Development Index"]
    );
}

#[test]
fn override_path_is_used() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("custom.tsv"), "Entity\tYear\nChad\t2010\n").unwrap();
    let config = SourceConfig::with_data_dir(dir.path()).with_source(SourceKind::Food, "custom.tsv");

    let raw = load_source(&config, SourceKind::Food).unwrap();

    assert_eq!(raw.frame.width(), 2);
    assert!(raw.path.ends_with("custom.tsv"));
}

#[test]
fn missing_source_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = SourceConfig::with_data_dir(dir.path());

    let err = load_source(&config, SourceKind::Energy).unwrap_err();

    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert!(err.to_string().contains("energy.csv"));
}

#[test]
fn header_only_source_is_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("median-age.csv"), "Entity,Year\n").unwrap();
    let config = SourceConfig::with_data_dir(dir.path());

    let err = load_source(&config, SourceKind::MedianAge).unwrap_err();

    assert!(matches!(err, IngestError::EmptyTable { .. }));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("energy.parquet");
    fs::write(&path, b"PAR1").unwrap();

    let err = read_table(&path).unwrap_err();

    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
}
