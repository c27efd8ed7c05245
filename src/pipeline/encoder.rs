//! One-hot encoding of categorical columns

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::config::UnknownCategoryPolicy;
use super::error::{PrepError, Result};
use super::nationality::column_as_strings;

/// Vocabulary learned for one categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub column: String,
    /// Sorted distinct non-null values seen during fit
    pub categories: Vec<String>,
}

impl CategoryVocabulary {
    fn index_of(&self) -> HashMap<&str, usize> {
        self.categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect()
    }

    /// Output column names, `{column}_{category}`
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", self.column, c))
            .collect()
    }
}

/// Expands each categorical column into one `Float64` indicator column per
/// learned category.
///
/// A null input produces an all-zero row. A value outside the vocabulary
/// either fails the transform or produces an all-zero row, depending on the
/// [`UnknownCategoryPolicy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    policy: UnknownCategoryPolicy,
    vocabularies: Vec<CategoryVocabulary>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new(policy: UnknownCategoryPolicy) -> Self {
        Self {
            policy,
            vocabularies: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let mut vocabularies = Vec::with_capacity(columns.len());
        for name in columns {
            let categories: BTreeSet<String> = column_as_strings(df, name)?
                .into_iter()
                .flatten()
                .collect();
            vocabularies.push(CategoryVocabulary {
                column: name.clone(),
                categories: categories.into_iter().collect(),
            });
        }

        self.vocabularies = vocabularies;
        self.is_fitted = true;
        Ok(self)
    }

    /// Indicator columns for every fitted column, in fit order
    pub fn transform(&self, df: &DataFrame) -> Result<Vec<Column>> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted("OneHotEncoder"));
        }

        let mut output = Vec::new();
        for vocab in &self.vocabularies {
            let values = column_as_strings(df, &vocab.column)?;
            let index = vocab.index_of();
            let mut indicators = vec![vec![0.0f64; values.len()]; vocab.categories.len()];

            for (row, value) in values.iter().enumerate() {
                let Some(value) = value else { continue };
                match index.get(value.as_str()) {
                    Some(&i) => indicators[i][row] = 1.0,
                    None => match self.policy {
                        UnknownCategoryPolicy::Error => {
                            return Err(PrepError::UnknownCategory {
                                column: vocab.column.clone(),
                                value: value.clone(),
                            });
                        }
                        UnknownCategoryPolicy::Ignore => {}
                    },
                }
            }

            for (name, data) in vocab.feature_names().into_iter().zip(indicators) {
                output.push(Column::new(name.into(), data));
            }
        }

        Ok(output)
    }

    pub fn policy(&self) -> UnknownCategoryPolicy {
        self.policy
    }

    pub fn vocabularies(&self) -> &[CategoryVocabulary] {
        &self.vocabularies
    }

    /// Learned categories of `column`, if it was fitted
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.vocabularies
            .iter()
            .find(|v| v.column == column)
            .map(|v| v.categories.as_slice())
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.vocabularies
            .iter()
            .flat_map(|v| v.feature_names())
            .collect()
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
