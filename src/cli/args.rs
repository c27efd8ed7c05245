//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{
    PipelineConfig, PipelineKind, UnknownCategoryPolicy, DEFAULT_NATIONALITY_COLUMN,
    DEFAULT_TARGET_COLUMN,
};

/// wageprep - Prepare player datasets for log-wage regression
#[derive(Parser, Debug)]
#[command(name = "wageprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Holds the transformed features with the target as the last column.
    /// Defaults to input directory with '_features' suffix (e.g., players.csv → players_features.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Nationality reduction: "frequency" (keep the most common nationalities,
    /// bucket the rest into "other") or "continent" (map to continent codes)
    #[arg(short, long, default_value = "frequency")]
    pub pipeline: PipelineKind,

    /// Target column name (separated before transformation)
    #[arg(short, long, default_value = DEFAULT_TARGET_COLUMN)]
    pub target: String,

    /// Free-text nationality column. Skipped silently if absent.
    #[arg(long, default_value = DEFAULT_NATIONALITY_COLUMN)]
    pub nationality_column: String,

    /// Share of rows the kept nationalities must cover (frequency pipeline only)
    #[arg(long, default_value = "0.9", value_parser = validate_coverage)]
    pub coverage: f64,

    /// Handling of categories unseen during fit: "error" or "ignore".
    /// Defaults to "error" for the frequency pipeline and "ignore" for continent.
    #[arg(long)]
    pub unknown_categories: Option<UnknownCategoryPolicy>,

    /// Write a JSON report of the fitted transformer to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Do not warn about columns dropped for having an unsupported type
    #[arg(long, default_value = "false")]
    pub quiet_dropped: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the nationality frequency ranking and which labels a coverage
    /// threshold keeps
    Coverage {
        /// Input file path (CSV or Parquet)
        input: PathBuf,

        /// Nationality column to rank
        #[arg(long, default_value = DEFAULT_NATIONALITY_COLUMN)]
        column: String,

        /// Coverage threshold to mark kept labels against
        #[arg(long, default_value = "0.9", value_parser = validate_coverage)]
        coverage: f64,

        /// Number of rows to use for schema inference (CSV only)
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Get the output path, deriving from input if not explicitly provided.
    /// The derived path will be in the same directory as the input with a '_features' suffix.
    pub fn output_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(self.output.clone().unwrap_or_else(|| {
            let parent = input.parent().unwrap_or_else(|| std::path::Path::new("."));
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            let extension = input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("parquet");
            parent.join(format!("{}_features.{}", stem, extension))
        }))
    }

    /// Pipeline configuration assembled from the arguments
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::for_kind(self.pipeline)
            .with_target_column(self.target.clone())
            .with_nationality_column(self.nationality_column.clone())
            .with_coverage(self.coverage)
            .with_warn_on_dropped_columns(!self.quiet_dropped);
        if let Some(policy) = self.unknown_categories {
            config = config.with_unknown_categories(policy);
        }
        config
    }
}

/// Validator for coverage thresholds
fn validate_coverage(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "coverage must be greater than 0.0 and at most 1.0, got {}",
            value
        ))
    }
}
