//! Fitted transformer export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{ColumnTransformer, PipelineConfig, PipelineKind, PipelineOutput, Reduction};

/// Metadata about the preprocessing run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// wageprep version
    pub wageprep_version: String,
    /// Input file path
    pub input_file: String,
    /// Which pipeline produced the transformer
    pub pipeline: PipelineKind,
    /// Configuration the pipeline ran with
    pub config: PipelineConfig,
}

/// How the nationality column was reduced
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReductionExport {
    Skipped,
    Coverage {
        kept: Vec<String>,
        bucketed_values: usize,
        bucketed_rows: usize,
    },
    Continent {
        resolved_rows: usize,
        override_rows: usize,
        fallback_rows: usize,
        unresolved: Vec<String>,
    },
}

impl From<&Reduction> for ReductionExport {
    fn from(reduction: &Reduction) -> Self {
        match reduction {
            Reduction::Skipped => ReductionExport::Skipped,
            Reduction::Coverage(c) => ReductionExport::Coverage {
                kept: c.kept.clone(),
                bucketed_values: c.bucketed,
                bucketed_rows: c.rows_bucketed,
            },
            Reduction::Continent(c) => ReductionExport::Continent {
                resolved_rows: c.resolved_rows,
                override_rows: c.override_rows,
                fallback_rows: c.fallback_rows,
                unresolved: c.unresolved.clone(),
            },
        }
    }
}

/// Complete transformer report
#[derive(Serialize)]
pub struct TransformerReport<'a> {
    pub metadata: RunMetadata,
    pub reduction: ReductionExport,
    pub dropped_columns: &'a [String],
    pub feature_names: Vec<String>,
    pub transformer: &'a ColumnTransformer,
}

/// Build the report for a pipeline run
pub fn build_transformer_report<'a>(
    output: &'a PipelineOutput,
    input_file: &str,
    kind: PipelineKind,
    config: &PipelineConfig,
) -> TransformerReport<'a> {
    TransformerReport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            wageprep_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            pipeline: kind,
            config: config.clone(),
        },
        reduction: ReductionExport::from(&output.reduction),
        dropped_columns: &output.dropped_columns,
        feature_names: output.transformer.feature_names_out(),
        transformer: &output.transformer,
    }
}

/// Export the fitted transformer and run metadata to a JSON file
pub fn export_transformer_report(
    output: &PipelineOutput,
    output_path: &Path,
    input_file: &str,
    kind: PipelineKind,
    config: &PipelineConfig,
) -> Result<()> {
    let report = build_transformer_report(output, input_file, kind, config);

    let json = serde_json::to_string_pretty(&report)
        .context("Failed to serialize transformer report to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write transformer report to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
