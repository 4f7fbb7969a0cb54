use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info_span;

use mvh_cli::describe::{DescribeFilter, describe, filter_rows};
use mvh_cli::pipeline::{self, BuildOptions};
use mvh_cli::types::{BuildResult, EngineerResult};
use mvh_model::{FileFormat, SourceConfig, SourceKind};
use mvh_output::read_reconciled;

use crate::cli::{BuildArgs, DescribeArgs, EngineerArgs};
use crate::summary::{apply_table_style, print_describe};

pub fn run_sources() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Description", "Default file", "Format", "Normalizer"]);
    apply_table_style(&mut table);
    for kind in SourceKind::ALL {
        let file = kind.default_file();
        let format = FileFormat::from_path(Path::new(file)).map_or("unknown", FileFormat::label);
        table.add_row(vec![
            kind.key(),
            kind.description(),
            file,
            format,
            kind.category().label(),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Resolves the source configuration (flags override the config file) and
/// runs the full pipeline.
pub fn run_build(args: &BuildArgs) -> Result<BuildResult> {
    let mut config = match &args.config {
        Some(path) => {
            SourceConfig::load(path).with_context(|| format!("load config {}", path.display()))?
        }
        None => SourceConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir_override(dir);
    }
    if let Some(policy) = args.duplicate_keys {
        config = config.with_duplicate_keys(policy.into());
    }
    let options = BuildOptions {
        config,
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
        features: !args.no_features,
        dry_run: args.dry_run,
    };
    pipeline::run_build(&options)
}

pub fn run_engineer(args: &EngineerArgs) -> Result<EngineerResult> {
    pipeline::run_engineer(&args.input, args.output.as_deref())
}

pub fn run_describe(args: &DescribeArgs) -> Result<()> {
    let span = info_span!("describe", input = %args.input.display());
    let _guard = span.enter();
    let df = read_reconciled(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let filter = DescribeFilter {
        countries: args.countries.clone(),
        from_year: args.from_year,
        to_year: args.to_year,
    };
    let filtered = filter_rows(&df, &filter)?;
    let stats = describe(&filtered)?;
    print_describe(filtered.height(), &stats);
    Ok(())
}
