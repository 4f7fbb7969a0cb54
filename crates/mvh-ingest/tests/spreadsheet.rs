//! Reading a real workbook: numeric year headers, sparse cells, and the
//! democracy reshape on top of it.

use std::fs;
use std::path::PathBuf;

use mvh_common::{column_f64, column_strings};
use mvh_ingest::{load_source, read_spreadsheet};
use mvh_model::columns::{COUNTRY, DEMOCRACY_INDEX, YEAR};
use mvh_model::{DuplicateKeyPolicy, SourceConfig, SourceKind};
use mvh_transform::normalize_source;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/democracy_index.xlsx")
}

#[test]
fn numeric_year_headers_read_as_plain_years() {
    let df = read_spreadsheet(&fixture()).unwrap();

    assert_eq!(
        df.get_column_names_str(),
        vec!["Country", "Regime type", "2006", "2019", "2020"]
    );
    assert_eq!(df.height(), 3);
    assert_eq!(
        column_strings(&df, "2019").unwrap(),
        vec![Some("9.87".to_string()), None, Some("1.61".to_string())]
    );
    assert_eq!(
        column_strings(&df, "Regime type").unwrap()[1].as_deref(),
        Some("Flawed democracy")
    );
}

#[test]
fn workbook_source_normalizes_without_gap_year() {
    let dir = TempDir::new().unwrap();
    let config = SourceConfig::with_data_dir(dir.path());
    fs::copy(fixture(), config.path_for(SourceKind::Tedi)).unwrap();

    let raw = load_source(&config, SourceKind::Tedi).unwrap();
    let table = normalize_source(raw.source, &raw.frame, DuplicateKeyPolicy::Reject).unwrap();

    assert_eq!(table.frame.height(), 6);
    let years = table.frame.column(YEAR).unwrap().i64().unwrap();
    assert!(years.into_iter().all(|y| matches!(y, Some(2019 | 2020))));
    assert_eq!(
        column_strings(&table.frame, COUNTRY).unwrap(),
        ["Chad", "Chad", "Norway", "Norway", "USA", "USA"]
            .map(|c| Some(c.to_string()))
            .to_vec()
    );
    assert_eq!(
        column_f64(table.frame.column(DEMOCRACY_INDEX).unwrap()).unwrap(),
        vec![
            Some(1.61),
            Some(1.55),
            Some(9.87),
            Some(9.81),
            None,
            Some(7.92)
        ]
    );
}
