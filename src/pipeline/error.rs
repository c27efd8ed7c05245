//! Error types for the preprocessing pipelines.
//!
//! `PrepError` covers every failure a pipeline call can surface. Country
//! resolution failures are not part of it: they are always recovered inside
//! the continent pipeline (see [`crate::pipeline::continent::ResolveError`]).

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while preparing features.
#[derive(Debug, Error)]
pub enum PrepError {
    /// A required column (the target, or a column the transformer was fit on)
    /// is absent from the input frame.
    #[error("Column '{column}' not found. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A categorical value was not part of the vocabulary learned during fit
    /// and the encoder is configured to reject unknown categories.
    #[error("Found unknown category '{value}' in column '{column}' during transform")]
    UnknownCategory { column: String, value: String },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `transform` was called before `fit`.
    #[error("{0} is not fitted yet. Call fit before transform")]
    NotFitted(&'static str),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Result alias used throughout the pipeline module.
pub type Result<T> = std::result::Result<T, PrepError>;

impl PrepError {
    /// Build a `MissingColumn` error listing the columns that do exist.
    pub fn missing_column(column: &str, df: &polars::prelude::DataFrame) -> Self {
        PrepError::MissingColumn {
            column: column.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
