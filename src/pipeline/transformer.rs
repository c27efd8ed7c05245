//! Combined numeric scaling and categorical encoding

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::config::UnknownCategoryPolicy;
use super::encoder::OneHotEncoder;
use super::error::{PrepError, Result};
use super::scaler::StandardScaler;

/// Standardizes the numeric columns and one-hot encodes the categorical
/// columns of a frame, emitting a single `Float64` feature frame: scaled
/// numeric columns first, then indicator columns.
///
/// Columns not listed at construction are ignored by `transform`.
///
/// Output names are the numeric column names followed by
/// `{column}_{category}`. If any two of those collide, every name gets a
/// `num__` or `cat__` prefix, and a `__{n}` suffix if that is still not enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    numeric: Vec<String>,
    categorical: Vec<String>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    feature_names: Vec<String>,
    n_samples_fit: usize,
    is_fitted: bool,
}

impl ColumnTransformer {
    pub fn new(
        numeric: Vec<String>,
        categorical: Vec<String>,
        policy: UnknownCategoryPolicy,
    ) -> Self {
        Self {
            numeric,
            categorical,
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(policy),
            feature_names: Vec::new(),
            n_samples_fit: 0,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.scaler.fit(df, &self.numeric)?;
        self.encoder.fit(df, &self.categorical)?;
        self.feature_names =
            unique_feature_names(self.scaler.columns(), &self.encoder.feature_names());
        self.n_samples_fit = df.height();
        self.is_fitted = true;
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted("ColumnTransformer"));
        }

        let mut columns = self.scaler.transform(df)?;
        columns.extend(self.encoder.transform(df)?);

        if columns.is_empty() {
            // Nothing to emit; keep the row count visible to callers.
            // SAFETY: a frame without columns has no column lengths to disagree
            // with the given height.
            return Ok(unsafe { DataFrame::new_no_checks(df.height(), Vec::new()) });
        }

        let columns: Vec<Column> = columns
            .into_iter()
            .zip(&self.feature_names)
            .map(|(col, name)| col.with_name(name.as_str().into()))
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Names of the emitted columns, in output order
    pub fn feature_names_out(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    pub fn n_features_out(&self) -> usize {
        self.scaler.columns().len()
            + self
                .encoder
                .vocabularies()
                .iter()
                .map(|v| v.categories.len())
                .sum::<usize>()
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn n_samples_fit(&self) -> usize {
        self.n_samples_fit
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

/// Output names for the scaled and indicator columns, unique across both
fn unique_feature_names(numeric: &[String], indicators: &[String]) -> Vec<String> {
    let plain: Vec<String> = numeric.iter().chain(indicators).cloned().collect();
    if all_unique(&plain) {
        return plain;
    }

    tracing::debug!("feature names collide, prefixing with num__/cat__");
    let prefixed: Vec<String> = numeric
        .iter()
        .map(|n| format!("num__{}", n))
        .chain(indicators.iter().map(|n| format!("cat__{}", n)))
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(prefixed.len());
    prefixed
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut n = 1;
            while seen.contains(&candidate) {
                candidate = format!("{}__{}", name, n);
                n += 1;
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn all_unique(names: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(names.len());
    names.iter().all(|n| seen.insert(n.as_str()))
}
