use std::path::PathBuf;

use mvh_model::SourceKind;
use mvh_transform::{FeatureReport, SanitizeReport};

#[derive(Debug)]
pub struct BuildResult {
    pub output_dir: PathBuf,
    pub sources: Vec<SourceSummary>,
    pub stages: Vec<StageSummary>,
    pub sanitize: SanitizeReport,
    pub features: Option<FeatureReport>,
    /// Stray columns removed after the join.
    pub dropped_columns: Vec<String>,
    /// `None` on a dry run.
    pub reconciled: Option<PathBuf>,
    /// `None` on a dry run or with features disabled.
    pub engineered: Option<PathBuf>,
}

#[derive(Debug)]
pub struct SourceSummary {
    pub source: SourceKind,
    pub path: PathBuf,
    pub rows_loaded: usize,
    pub rows_normalized: usize,
    pub duplicates_dropped: usize,
    /// Rows left after this source was folded into the join.
    pub rows_after_join: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: &'static str,
    pub rows: usize,
    pub duration_ms: u128,
}

#[derive(Debug)]
pub struct EngineerResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sanitize: SanitizeReport,
    pub features: FeatureReport,
}
