//! Nationality coverage inspection subcommand

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{
    clean_value, load_dataset_with_progress, rank_by_frequency, CaseStyle, CategoryShare,
};
use crate::utils::create_spinner;

/// Print the frequency ranking of a nationality column and mark which labels
/// a `coverage` threshold keeps
///
/// Values are cleaned the same way the frequency pipeline cleans them before
/// ranking.
pub fn run_coverage(
    input: &Path,
    column: &str,
    coverage: f64,
    infer_schema_length: usize,
) -> Result<()> {
    println!(
        "\n {} Nationality coverage",
        style("◆").cyan().bold()
    );
    println!("   Input:  {}", style(input.display()).dim());
    println!("   Column: {}", style(column).dim());
    println!();

    let spinner = create_spinner("Loading dataset...");
    let (df, rows, _, _) = load_dataset_with_progress(input, infer_schema_length)?;
    spinner.finish_with_message(format!("{} Loaded {} rows", style("✓").green(), rows));

    let col = df
        .column(column)
        .with_context(|| format!("Column '{}' not found in {}", column, input.display()))?;
    let as_str = col.cast(&polars::prelude::DataType::String)?;
    let values: Vec<Option<String>> = as_str
        .str()?
        .into_iter()
        .map(|v| v.map(|s| clean_value(s, CaseStyle::Lower)))
        .collect();

    let ranked = rank_by_frequency(&values);
    let kept = ranked.iter().filter(|c| c.cumulative <= coverage).count();

    println!();
    println!("{}", coverage_table(&ranked, coverage));
    println!();
    println!(
        "   {} of {} distinct values kept at {:.1}% coverage, {} bucketed into \"other\"",
        style(kept).green().bold(),
        style(ranked.len()).yellow(),
        coverage * 100.0,
        style(ranked.len() - kept).yellow()
    );

    Ok(())
}

fn coverage_table(ranked: &[CategoryShare], coverage: f64) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
        Cell::new("Rows").add_attribute(Attribute::Bold),
        Cell::new("Share").add_attribute(Attribute::Bold),
        Cell::new("Cumulative").add_attribute(Attribute::Bold),
    ]);

    for (rank, share) in ranked.iter().enumerate() {
        let color = if share.cumulative <= coverage {
            Color::Green
        } else {
            Color::DarkGrey
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&share.value).fg(color),
            Cell::new(share.count),
            Cell::new(format!("{:.2}%", share.share * 100.0)),
            Cell::new(format!("{:.2}%", share.cumulative * 100.0)).fg(color),
        ]);
    }

    table
}
