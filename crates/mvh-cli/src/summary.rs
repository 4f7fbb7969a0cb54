use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mvh_cli::describe::ColumnStats;
use mvh_cli::types::{BuildResult, EngineerResult};
use mvh_common::format_numeric;
use mvh_transform::{FeatureReport, SanitizeReport};

pub fn print_build_summary(result: &BuildResult) {
    println!("Output: {}", result.output_dir.display());
    match (&result.reconciled, &result.engineered) {
        (None, None) => println!("Dry run: no files written"),
        (reconciled, engineered) => {
            for path in [reconciled, engineered].into_iter().flatten() {
                println!("Wrote: {}", path.display());
            }
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Description"),
        header_cell("Loaded"),
        header_cell("Normalized"),
        header_cell("Duplicates"),
        header_cell("After join"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_loaded = 0usize;
    let mut total_normalized = 0usize;
    let mut total_duplicates = 0usize;
    for summary in &result.sources {
        total_loaded += summary.rows_loaded;
        total_normalized += summary.rows_normalized;
        total_duplicates += summary.duplicates_dropped;
        table.add_row(vec![
            Cell::new(summary.source.key()).add_attribute(Attribute::Bold),
            Cell::new(summary.source.description()),
            Cell::new(summary.rows_loaded),
            Cell::new(summary.rows_normalized),
            count_cell(summary.duplicates_dropped, Color::Yellow),
            Cell::new(summary.rows_after_join),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All sources")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_loaded).add_attribute(Attribute::Bold),
        Cell::new(total_normalized).add_attribute(Attribute::Bold),
        count_cell(total_duplicates, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");

    let mut stages = Table::new();
    stages.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Time (ms)"),
    ]);
    apply_table_style(&mut stages);
    align_column(&mut stages, 1, CellAlignment::Right);
    align_column(&mut stages, 2, CellAlignment::Right);
    for stage in &result.stages {
        stages.add_row(vec![
            Cell::new(stage.stage),
            Cell::new(stage.rows),
            dim_cell(stage.duration_ms),
        ]);
    }
    println!("{stages}");

    if !result.dropped_columns.is_empty() {
        println!("Dropped columns: {}", result.dropped_columns.join(", "));
    }
    print_sanitize_table(&result.sanitize);
    if let Some(features) = &result.features {
        print_feature_table(features);
    }
}

pub fn print_engineer_summary(result: &EngineerResult) {
    println!("Input: {}", result.input.display());
    println!("Wrote: {}", result.output.display());
    print_sanitize_table(&result.sanitize);
    print_feature_table(&result.features);
}

/// Columns that lost values during sanitization. Silent when nothing was lost.
fn print_sanitize_table(report: &SanitizeReport) {
    println!(
        "Sanitized: {} of {} rows kept ({} dropped)",
        report.rows_out,
        report.rows_in,
        report.rows_dropped()
    );
    let lossy: Vec<_> = report
        .missing
        .iter()
        .filter(|(_, missing)| **missing > 0)
        .collect();
    if lossy.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Missing"),
        header_cell("Non-numeric"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (column, missing) in lossy {
        let coerced = report.coerced_to_missing.get(column).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(column),
            count_cell(*missing, Color::Yellow),
            count_cell(coerced, Color::Red),
        ]);
    }
    println!("{table}");
}

fn print_feature_table(report: &FeatureReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Feature"), header_cell("Non-finite")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (feature, count) in &report.non_finite {
        table.add_row(vec![Cell::new(*feature), count_cell(*count, Color::Red)]);
    }
    println!("{table}");
}

pub fn print_describe(rows: usize, stats: &[ColumnStats]) {
    println!("Rows: {rows}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Count"),
        header_cell("Mean"),
        header_cell("Std"),
        header_cell("Min"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in stats {
        table.add_row(vec![
            Cell::new(&column.column),
            Cell::new(column.count),
            stat_cell(column.mean),
            stat_cell(column.std),
            stat_cell(column.min),
            stat_cell(column.max),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn stat_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format_numeric((value * 1e4).round() / 1e4)),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
