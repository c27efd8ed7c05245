//! Target separation and numeric/categorical column partitioning

use polars::prelude::*;

use super::error::{PrepError, Result};

/// How a feature column is treated by the column transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer or floating point: standardized
    Numeric,
    /// Text: one-hot encoded
    Categorical,
    /// Anything else (boolean, temporal, nested): dropped
    Unsupported,
}

impl ColumnKind {
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            ColumnKind::Numeric
        } else {
            match dtype {
                DataType::String | DataType::Categorical(_, _) => ColumnKind::Categorical,
                _ => ColumnKind::Unsupported,
            }
        }
    }
}

/// Feature columns grouped by kind, each in frame order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPartition {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    /// Columns with an unsupported dtype, as `(name, dtype)`
    pub dropped: Vec<(String, String)>,
}

impl ColumnPartition {
    pub fn dropped_names(&self) -> Vec<String> {
        self.dropped.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// Partition every column of `df` by its dtype
pub fn partition_columns(df: &DataFrame) -> ColumnPartition {
    let mut partition = ColumnPartition::default();

    for col in df.get_columns() {
        let name = col.name().to_string();
        match ColumnKind::of(col.dtype()) {
            ColumnKind::Numeric => partition.numeric.push(name),
            ColumnKind::Categorical => partition.categorical.push(name),
            ColumnKind::Unsupported => partition.dropped.push((name, col.dtype().to_string())),
        }
    }

    partition
}

/// Split the target off the feature frame.
///
/// Fails with `MissingColumn` when the target is absent.
pub fn split_target(df: &DataFrame, target: &str) -> Result<(DataFrame, Series)> {
    let y = df
        .column(target)
        .map_err(|_| PrepError::missing_column(target, df))?
        .as_materialized_series()
        .clone();
    let x = df.drop(target)?;
    Ok((x, y))
}
