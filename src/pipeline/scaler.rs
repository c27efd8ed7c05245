//! Standardization of numeric columns to zero mean and unit variance

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PrepError, Result};

/// Learned statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub mean: f64,
    /// Population variance (ddof = 0)
    pub variance: f64,
    /// Divisor applied in transform; 1.0 when the column has no spread
    pub scale: f64,
    /// Non-null, non-NaN values seen during fit
    pub n_samples: usize,
}

impl ColumnStats {
    fn from_values(values: &[Option<f64>]) -> Self {
        let observed: Vec<f64> = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();
        let n = observed.len();
        if n == 0 {
            return Self {
                mean: 0.0,
                variance: 0.0,
                scale: 1.0,
                n_samples: 0,
            };
        }

        let mean = observed.iter().sum::<f64>() / n as f64;
        let variance = observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        let std = variance.sqrt();

        Self {
            mean,
            variance,
            // Near-zero spread would blow values up; treat it as constant
            scale: if std < 10.0 * f64::EPSILON { 1.0 } else { std },
            n_samples: n,
        }
    }

    #[inline]
    fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}

/// Per-column z-score scaler.
///
/// Nulls and NaNs are ignored when fitting and pass through transform
/// unchanged. Integer columns are cast to `Float64`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    columns: Vec<String>,
    stats: Vec<ColumnStats>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn mean and scale for each of `columns`
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let stats = columns
            .par_iter()
            .map(|name| column_values(df, name).map(|values| ColumnStats::from_values(&values)))
            .collect::<Result<Vec<_>>>()?;

        self.columns = columns.to_vec();
        self.stats = stats;
        self.is_fitted = true;
        Ok(self)
    }

    /// Scaled `Float64` columns, in fit order
    pub fn transform(&self, df: &DataFrame) -> Result<Vec<Column>> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted("StandardScaler"));
        }

        self.columns
            .iter()
            .zip(&self.stats)
            .map(|(name, stats)| {
                let values = column_values(df, name)?;
                let scaled: Float64Chunked = values
                    .into_iter()
                    .map(|opt| opt.map(|v| stats.apply(v)))
                    .collect();
                Ok(Column::from(scaled.with_name(name.as_str().into()).into_series()))
            })
            .collect()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn stats(&self, column: &str) -> Option<&ColumnStats> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.stats[i])
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df
        .column(name)
        .map_err(|_| PrepError::missing_column(name, df))?;
    let as_f64 = col.cast(&DataType::Float64)?;
    Ok(as_f64.f64()?.into_iter().collect())
}
