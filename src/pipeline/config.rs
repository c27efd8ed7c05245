//! Pipeline configuration
//!
//! Column names, the coverage threshold and the UK override list are plain
//! values here so both pipelines (and tests) can override them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{PrepError, Result};

/// Default name of the regression target column
pub const DEFAULT_TARGET_COLUMN: &str = "log_wages";

/// Default name of the free-text nationality column
pub const DEFAULT_NATIONALITY_COLUMN: &str = "nationality_name";

/// Default name of the derived continent column (continent pipeline)
pub const DEFAULT_CONTINENT_COLUMN: &str = "continent";

/// Share of rows the kept nationalities must cover (frequency pipeline)
pub const DEFAULT_COVERAGE: f64 = 0.90;

/// Label for rare nationalities and unresolvable countries
pub const DEFAULT_OTHER_LABEL: &str = "other";

/// Continent code forced for UK constituent nations
pub const UK_CONTINENT_CODE: &str = "EU";

/// UK constituent nations, which have no ISO country entry of their own
pub const DEFAULT_UK_NATIONS: [&str; 4] = ["england", "scotland", "wales", "northern ireland"];

/// What the one-hot encoder does with a category it did not see during fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCategoryPolicy {
    /// Fail the transform with `PrepError::UnknownCategory`
    Error,
    /// Emit an all-zero indicator row
    Ignore,
}

impl fmt::Display for UnknownCategoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownCategoryPolicy::Error => write!(f, "error"),
            UnknownCategoryPolicy::Ignore => write!(f, "ignore"),
        }
    }
}

impl FromStr for UnknownCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" | "strict" => Ok(UnknownCategoryPolicy::Error),
            "ignore" => Ok(UnknownCategoryPolicy::Ignore),
            _ => Err(format!(
                "Unknown category policy '{}'. Options: error, ignore",
                s
            )),
        }
    }
}

/// Which categorical reduction to apply to the nationality column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    /// Keep the most frequent nationalities, bucket the tail into "other"
    #[default]
    Frequency,
    /// Map every nationality to its continent code
    Continent,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineKind::Frequency => write!(f, "frequency"),
            PipelineKind::Continent => write!(f, "continent"),
        }
    }
}

impl FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frequency" | "freq" | "1" => Ok(PipelineKind::Frequency),
            "continent" | "2" => Ok(PipelineKind::Continent),
            _ => Err(format!(
                "Unknown pipeline '{}'. Options: frequency, continent",
                s
            )),
        }
    }
}

/// Settings shared by both preprocessing pipelines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub target_column: String,
    pub nationality_column: String,
    pub continent_column: String,
    /// Inclusive cumulative share of rows kept distinct, in (0, 1]
    pub coverage: f64,
    pub other_label: String,
    /// Lowercase names that resolve to `UK_CONTINENT_CODE` when lookup fails
    pub uk_nations: Vec<String>,
    pub unknown_categories: UnknownCategoryPolicy,
    /// Log a warning for columns that are neither numeric nor text
    pub warn_on_dropped_columns: bool,
}

impl PipelineConfig {
    /// Defaults for the frequency-grouping pipeline (strict encoding)
    pub fn frequency() -> Self {
        Self {
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            nationality_column: DEFAULT_NATIONALITY_COLUMN.to_string(),
            continent_column: DEFAULT_CONTINENT_COLUMN.to_string(),
            coverage: DEFAULT_COVERAGE,
            other_label: DEFAULT_OTHER_LABEL.to_string(),
            uk_nations: DEFAULT_UK_NATIONS.iter().map(|s| s.to_string()).collect(),
            unknown_categories: UnknownCategoryPolicy::Error,
            warn_on_dropped_columns: true,
        }
    }

    /// Defaults for the continent-mapping pipeline (unknown-category safe)
    pub fn continent() -> Self {
        Self {
            unknown_categories: UnknownCategoryPolicy::Ignore,
            ..Self::frequency()
        }
    }

    /// Defaults for the given pipeline kind
    pub fn for_kind(kind: PipelineKind) -> Self {
        match kind {
            PipelineKind::Frequency => Self::frequency(),
            PipelineKind::Continent => Self::continent(),
        }
    }

    pub fn with_target_column(mut self, name: impl Into<String>) -> Self {
        self.target_column = name.into();
        self
    }

    pub fn with_nationality_column(mut self, name: impl Into<String>) -> Self {
        self.nationality_column = name.into();
        self
    }

    pub fn with_coverage(mut self, coverage: f64) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_unknown_categories(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.unknown_categories = policy;
        self
    }

    pub fn with_warn_on_dropped_columns(mut self, warn: bool) -> Self {
        self.warn_on_dropped_columns = warn;
        self
    }

    /// Check value ranges before a pipeline run
    pub fn validate(&self) -> Result<()> {
        if !(self.coverage > 0.0 && self.coverage <= 1.0) {
            return Err(PrepError::InvalidConfig(format!(
                "coverage must be in (0, 1], got {}",
                self.coverage
            )));
        }
        if self.target_column.is_empty() {
            return Err(PrepError::InvalidConfig(
                "target column name must not be empty".to_string(),
            ));
        }
        if self.target_column == self.nationality_column {
            return Err(PrepError::InvalidConfig(format!(
                "target and nationality column are both '{}'",
                self.target_column
            )));
        }
        Ok(())
    }

    /// Whether `value` (any case) is one of the configured UK nations
    pub fn is_uk_nation(&self, value: &str) -> bool {
        let lowered = value.to_lowercase();
        self.uk_nations.iter().any(|n| n.to_lowercase() == lowered)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::frequency()
    }
}
