//! wageprep: Feature Preprocessing CLI Tool
//!
//! Loads a player dataset, runs one of the nationality-reduction pipelines
//! and writes the model-ready feature matrix with the target appended.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use wageprep::cli::{self, Cli, Commands};
use wageprep::pipeline::{
    features_with_target, load_dataset_with_progress, run_pipeline, save_dataset,
};
use wageprep::report::{export_transformer_report, PreprocessSummary};
use wageprep::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Coverage {
                input,
                column,
                coverage,
                infer_schema_length,
            } => cli::coverage::run_coverage(input, column, *coverage, *infer_schema_length),
        };
    }

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let output_path = cli
        .output_path()
        .context("Could not derive an output path from the input file")?;
    let config = cli.pipeline_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, &output_path, cli.pipeline, &config);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let (df, rows, cols, memory_mb) = load_dataset_with_progress(input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let mut summary = PreprocessSummary::new(cli.pipeline, rows, cols);
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Reduce nationality and fit the transformer
    print_step_header(2, "Preprocess Features");
    let step_start = Instant::now();
    let spinner = create_spinner("Fitting scaler and encoder...");
    let output = run_pipeline(cli.pipeline, &df, &config)
        .with_context(|| format!("{} pipeline failed", cli.pipeline))?;
    if output.dropped_columns.is_empty() {
        finish_with_success(&spinner, "Column transformer fitted");
        print_info("All feature columns are numeric or text");
    } else {
        finish_with_warning(&spinner, "Column transformer fitted, some columns dropped");
        print_count(
            "column(s) dropped",
            output.dropped_columns.len(),
            Some("(neither numeric nor text)"),
        );
        if !config.warn_on_dropped_columns {
            print_warning("Dropped columns were not logged (--quiet-dropped)");
        }
    }
    print_count("output feature(s)", output.features.width(), None);

    summary.record_output(&output);
    let transform_elapsed = step_start.elapsed();
    summary.set_transform_time(transform_elapsed);
    print_step_time(transform_elapsed);

    // Step 3: Save output
    print_step_header(3, "Save Results");
    let step_start = Instant::now();
    let spinner = create_spinner("Writing output file...");
    let mut result = features_with_target(&output.features, &output.target)?;
    save_dataset(&mut result, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));

    if let Some(report_path) = &cli.report {
        export_transformer_report(
            &output,
            report_path,
            &input.display().to_string(),
            cli.pipeline,
            &config,
        )?;
        print_success(&format!("Transformer report written to {}", report_path.display()));
    }

    let save_elapsed = step_start.elapsed();
    summary.set_save_time(save_elapsed);
    print_step_time(save_elapsed);

    summary.display();
    print_completion();

    Ok(())
}
