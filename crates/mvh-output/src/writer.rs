//! Atomic CSV writer.

use std::fs;
use std::path::{Path, PathBuf};

use mvh_common::any_to_string;
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use crate::error::{OutputError, Result};

/// File name of the sanitized, joined table.
pub const RECONCILED_FILE: &str = "Money_vs_Happiness_dataset.csv";

/// File name of the table with derived features.
pub const ENGINEERED_FILE: &str = "Money_vs_Happiness_feature_engineered_dataset.csv";

/// Output locations under one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub reconciled: PathBuf,
    pub engineered: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            reconciled: dir.join(RECONCILED_FILE),
            engineered: dir.join(ENGINEERED_FILE),
        }
    }
}

/// Writes `df` to `path` as CSV, replacing any existing file only once the
/// new one is complete.
pub fn write_table(df: &DataFrame, path: &Path) -> Result<()> {
    write_tables(&[(df, path)])
}

/// Writes several tables as one unit.
///
/// Every table is first written to a temporary sibling. Files are moved into
/// place only after all of them are complete; if a move fails, the tables
/// already moved are removed again, so the set is either fully present or
/// absent.
pub fn write_tables(tables: &[(&DataFrame, &Path)]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(tables.len());
    for (df, path) in tables {
        match stage(df, path) {
            Ok(tmp) => staged.push((tmp, *path)),
            Err(err) => {
                for (tmp, _) in &staged {
                    let _ = fs::remove_file(tmp);
                }
                return Err(err);
            }
        }
    }

    let mut placed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (idx, (tmp, path)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, path) {
            for (tmp, _) in &staged[idx..] {
                let _ = fs::remove_file(tmp);
            }
            for path in &placed {
                let _ = fs::remove_file(path);
            }
            if !placed.is_empty() {
                warn!(removed = placed.len(), "output set incomplete, written tables removed");
            }
            return Err(OutputError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
        placed.push(path);
    }

    for (df, path) in tables {
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "table written"
        );
    }
    Ok(())
}

/// Writes `df` to the temporary sibling of `path` and returns its location.
fn stage(df: &DataFrame, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = temp_sibling(path);
    if let Err(err) = write_csv(df, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(tmp)
}

fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    writer
        .write_record(df.get_column_names_str())
        .map_err(csv_error)?;

    let columns = df.get_columns();
    let mut record = Vec::with_capacity(columns.len());
    for row in 0..df.height() {
        record.clear();
        for column in columns {
            record.push(any_to_string(column.get(row)?));
        }
        writer.write_record(&record).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "temporary file complete");
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvh_common::{float_column, int_column, string_column};
    use tempfile::TempDir;

    #[test]
    fn writes_formatted_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let df = DataFrame::new(vec![
            string_column("Country", vec![Some("Korea Rep".to_string()), Some("USA".to_string())]),
            int_column("Year", vec![2019, 2020]),
            float_column(
                "Generosity_Per_Dollar",
                vec![Some(f64::INFINITY), Some(0.250)],
            ),
            float_column("Hedonic_Growth_Rate", vec![None, Some(f64::NAN)]),
        ])
        .unwrap();

        write_table(&df, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Country,Year,Generosity_Per_Dollar,Hedonic_Growth_Rate\n\
             Korea Rep,2019,inf,\n\
             USA,2020,0.25,NaN\n"
        );
        assert!(!temp_sibling(&path).exists());
    }

    #[test]
    fn quotes_fields_with_commas() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let df = DataFrame::new(vec![string_column(
            "Urban Population (%)",
            vec![Some("a,b".to_string())],
        )])
        .unwrap();
        write_table(&df, &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Urban Population (%)\n\"a,b\"\n"
        );
    }

    #[test]
    fn failed_move_removes_every_table_of_the_set() {
        let dir = TempDir::new().unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        fs::create_dir_all(paths.engineered.join("occupied")).unwrap();
        let df = DataFrame::new(vec![int_column("Year", vec![2019])]).unwrap();

        let err = write_tables(&[(&df, &paths.reconciled), (&df, &paths.engineered)]).unwrap_err();

        assert!(matches!(err, OutputError::Io { ref path, .. } if path == &paths.engineered));
        assert!(!paths.reconciled.exists());
        assert!(!temp_sibling(&paths.reconciled).exists());
        assert!(!temp_sibling(&paths.engineered).exists());
    }

    #[test]
    fn output_paths_use_published_names() {
        let paths = OutputPaths::in_dir("out");
        assert_eq!(paths.reconciled, Path::new("out").join(RECONCILED_FILE));
        assert_eq!(paths.engineered, Path::new("out").join(ENGINEERED_FILE));
    }
}
