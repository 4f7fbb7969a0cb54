//! Reconciliation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read every configured source file
//! 2. **Normalize**: project each source to the canonical `(Country, Year)` shape
//! 3. **Join**: inner-join the normalized tables in source order
//! 4. **Sanitize**: coerce required columns to numbers, drop incomplete rows
//! 5. **Engineer**: append the derived indicators
//! 6. **Output**: write the reconciled and engineered tables
//!
//! Each stage runs in its own span and reports its row count and duration.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use mvh_ingest::{RawTable, load_source};
use mvh_model::columns::REQUIRED_NUMERIC;
use mvh_model::{DuplicateKeyPolicy, SourceConfig, SourceKind};
use mvh_output::{ENGINEERED_FILE, OutputPaths, read_reconciled, write_tables};
use mvh_transform::{
    FeatureReport, JoinOutcome, NormalizedTable, SanitizeReport, engineer_features, join_sources,
    normalize_source,
};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use crate::types::{BuildResult, EngineerResult, SourceSummary, StageSummary};

/// Everything `run_build` needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub config: SourceConfig,
    pub output_dir: PathBuf,
    pub features: bool,
    pub dry_run: bool,
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Loads every source in join order. The first failure aborts the run.
pub fn ingest(config: &SourceConfig) -> Result<Vec<RawTable>> {
    let span = info_span!("ingest");
    let _guard = span.enter();
    SourceKind::ALL
        .iter()
        .map(|kind| load_source(config, *kind).with_context(|| format!("load source {kind}")))
        .collect()
}

// ============================================================================
// Stage 2: Normalize
// ============================================================================

pub fn normalize(raw: &[RawTable], policy: DuplicateKeyPolicy) -> Result<Vec<NormalizedTable>> {
    let span = info_span!("normalize", policy = %policy);
    let _guard = span.enter();
    raw.iter()
        .map(|table| {
            normalize_source(table.source, &table.frame, policy)
                .with_context(|| format!("normalize source {}", table.source))
        })
        .collect()
}

// ============================================================================
// Stage 3: Join
// ============================================================================

pub fn join(tables: Vec<NormalizedTable>) -> Result<JoinOutcome> {
    let span = info_span!("join", tables = tables.len());
    let _guard = span.enter();
    join_sources(tables).context("join sources")
}

// ============================================================================
// Stage 4: Sanitize
// ============================================================================

pub fn sanitize(df: DataFrame) -> Result<(DataFrame, SanitizeReport)> {
    let span = info_span!("sanitize");
    let _guard = span.enter();
    mvh_transform::sanitize(df, &REQUIRED_NUMERIC).context("sanitize reconciled table")
}

// ============================================================================
// Stage 5: Engineer
// ============================================================================

pub fn engineer(df: DataFrame) -> Result<(DataFrame, FeatureReport)> {
    let span = info_span!("engineer");
    let _guard = span.enter();
    engineer_features(df).context("derive features")
}

// ============================================================================
// Stage 6: Output
// ============================================================================

/// Writes every table as one set unless this is a dry run. Returns whether
/// anything was written.
pub fn output(tables: &[(&DataFrame, &Path)], dry_run: bool) -> Result<bool> {
    let span = info_span!("output", tables = tables.len());
    let _guard = span.enter();
    if dry_run {
        for (df, path) in tables {
            debug!(path = %path.display(), rows = df.height(), "dry run, table not written");
        }
        return Ok(false);
    }
    write_tables(tables).context("write output tables")?;
    Ok(true)
}

fn finish(stage: &'static str, rows: usize, start: Instant) -> StageSummary {
    let duration_ms = start.elapsed().as_millis();
    info!(stage, rows, duration_ms, "stage complete");
    StageSummary {
        stage,
        rows,
        duration_ms,
    }
}

/// Runs all stages from the configured sources to the output files.
pub fn run_build(options: &BuildOptions) -> Result<BuildResult> {
    let span = info_span!(
        "build",
        data_dir = %options.config.data_dir().display(),
        dry_run = options.dry_run
    );
    let _guard = span.enter();
    let paths = OutputPaths::in_dir(&options.output_dir);
    let mut stages = Vec::with_capacity(6);

    let start = Instant::now();
    let raw = ingest(&options.config)?;
    stages.push(finish(
        "ingest",
        raw.iter().map(|table| table.frame.height()).sum(),
        start,
    ));

    let start = Instant::now();
    let normalized = normalize(&raw, options.config.duplicate_keys)?;
    stages.push(finish(
        "normalize",
        normalized.iter().map(|table| table.frame.height()).sum(),
        start,
    ));
    let mut sources: Vec<SourceSummary> = raw
        .iter()
        .zip(&normalized)
        .map(|(raw, table)| SourceSummary {
            source: raw.source,
            path: raw.path.clone(),
            rows_loaded: raw.frame.height(),
            rows_normalized: table.frame.height(),
            duplicates_dropped: table.duplicates_dropped,
            rows_after_join: table.frame.height(),
        })
        .collect();
    drop(raw);

    let start = Instant::now();
    let joined = join(normalized)?;
    for (summary, step) in sources.iter_mut().skip(1).zip(&joined.steps) {
        summary.rows_after_join = step.rows_after;
    }
    stages.push(finish("join", joined.frame.height(), start));

    let start = Instant::now();
    let (clean, sanitize_report) = sanitize(joined.frame)?;
    stages.push(finish("sanitize", clean.height(), start));

    let (features, engineered_df) = if options.features {
        let start = Instant::now();
        let (engineered_df, report) = engineer(clean.clone())?;
        stages.push(finish("engineer", engineered_df.height(), start));
        (Some(report), Some(engineered_df))
    } else {
        debug!("feature stage disabled");
        (None, None)
    };

    let start = Instant::now();
    let mut tables = vec![(&clean, paths.reconciled.as_path())];
    if let Some(df) = &engineered_df {
        tables.push((df, paths.engineered.as_path()));
    }
    let written = output(&tables, options.dry_run)?;
    stages.push(finish(
        "output",
        if written { tables.len() } else { 0 },
        start,
    ));
    let reconciled = written.then(|| paths.reconciled.clone());
    let engineered = (written && engineered_df.is_some()).then(|| paths.engineered.clone());

    Ok(BuildResult {
        output_dir: options.output_dir.clone(),
        sources,
        stages,
        sanitize: sanitize_report,
        features,
        dropped_columns: joined.dropped_columns,
        reconciled,
        engineered,
    })
}

/// Re-reads a reconciled table and runs only the sanitize and engineer
/// stages. Without `output` the engineered table lands next to the input.
pub fn run_engineer(input: &Path, output_path: Option<&Path>) -> Result<EngineerResult> {
    let span = info_span!("engineer_file", input = %input.display());
    let _guard = span.enter();
    let df = read_reconciled(input).with_context(|| format!("read {}", input.display()))?;
    let (clean, sanitize_report) = sanitize(df)?;
    let (engineered, features) = engineer(clean)?;

    let target = match output_path {
        Some(path) => path.to_path_buf(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(ENGINEERED_FILE),
    };
    output(&[(&engineered, target.as_path())], false)?;
    Ok(EngineerResult {
        input: input.to_path_buf(),
        output: target,
        sanitize: sanitize_report,
        features,
    })
}
