//! Nationality to continent mapping
//!
//! Resolution goes through a [`ContinentResolver`] (country name to alpha-2
//! code, then alpha-2 code to continent). Every resolution failure is
//! recovered: the [`ContinentMapper`] turns it into the configured other
//! label, except for UK constituent nations which are forced to `EU`.

use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use super::config::{PipelineConfig, UK_CONTINENT_CODE};
use super::countries::{ALIASES, COUNTRIES};
use super::error::Result;
use super::nationality::{column_as_strings, replace_string_column};

/// Why a nationality could not be resolved to a continent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The name matches no known country
    #[error("no country named '{0}'")]
    NameNotFound(String),
    /// The country code has no continent assignment
    #[error("no continent for country code '{0}'")]
    ContinentNotFound(String),
    /// The lookup backend could not answer
    #[error("country lookup unavailable: {0}")]
    Unavailable(String),
}

/// Resolves country names to two-letter continent codes
pub trait ContinentResolver {
    /// Country name to ISO 3166-1 alpha-2 code
    fn country_code(&self, name: &str) -> std::result::Result<String, ResolveError>;

    /// Alpha-2 code to continent code
    fn continent_code(&self, alpha2: &str) -> std::result::Result<String, ResolveError>;

    /// Country name straight to continent code
    fn resolve(&self, name: &str) -> std::result::Result<String, ResolveError> {
        let alpha2 = self.country_code(name)?;
        self.continent_code(&alpha2)
    }
}

/// Resolver backed by the built-in ISO country table.
///
/// Names match case-insensitively after trimming, against both the ISO short
/// name and a list of common aliases.
#[derive(Debug, Clone)]
pub struct CountryTable {
    by_name: HashMap<String, &'static str>,
    continents: HashMap<&'static str, &'static str>,
}

impl CountryTable {
    pub fn builtin() -> Self {
        let mut by_name = HashMap::with_capacity(COUNTRIES.len() + ALIASES.len());
        let mut continents = HashMap::with_capacity(COUNTRIES.len());

        for &(alpha2, name, continent) in COUNTRIES {
            by_name.insert(normalize_name(name), alpha2);
            if !continent.is_empty() {
                continents.insert(alpha2, continent);
            }
        }
        for &(alias, alpha2) in ALIASES {
            by_name.entry(normalize_name(alias)).or_insert(alpha2);
        }

        Self { by_name, continents }
    }

    /// Number of distinct names (ISO names and aliases) the table knows
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for CountryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ContinentResolver for CountryTable {
    fn country_code(&self, name: &str) -> std::result::Result<String, ResolveError> {
        self.by_name
            .get(&normalize_name(name))
            .map(|code| code.to_string())
            .ok_or_else(|| ResolveError::NameNotFound(name.to_string()))
    }

    fn continent_code(&self, alpha2: &str) -> std::result::Result<String, ResolveError> {
        self.continents
            .get(alpha2.to_uppercase().as_str())
            .map(|c| c.to_string())
            .ok_or_else(|| ResolveError::ContinentNotFound(alpha2.to_string()))
    }
}

/// How a single nationality value was mapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The resolver produced a continent code
    Resolved(String),
    /// A configured UK nation, forced to `EU`
    Override(String),
    /// Resolution failed; the value maps to the other label
    Fallback(ResolveError),
}

impl Resolution {
    /// Continent label for this resolution
    pub fn label<'a>(&'a self, other_label: &'a str) -> &'a str {
        match self {
            Resolution::Resolved(code) | Resolution::Override(code) => code.as_str(),
            Resolution::Fallback(_) => other_label,
        }
    }
}

/// Applies the UK override and fallback policy on top of a resolver
pub struct ContinentMapper<'a> {
    resolver: &'a dyn ContinentResolver,
    config: &'a PipelineConfig,
}

impl<'a> ContinentMapper<'a> {
    pub fn new(resolver: &'a dyn ContinentResolver, config: &'a PipelineConfig) -> Self {
        Self { resolver, config }
    }

    /// Resolve one cleaned nationality.
    ///
    /// UK nations win over whatever the resolver says; every resolver error
    /// collapses into `Fallback`.
    pub fn resolve(&self, nationality: &str) -> Resolution {
        if self.config.is_uk_nation(nationality) {
            return Resolution::Override(UK_CONTINENT_CODE.to_string());
        }
        match self.resolver.resolve(nationality) {
            Ok(code) => Resolution::Resolved(code),
            Err(err) => Resolution::Fallback(err),
        }
    }

    /// Continent label for one cleaned nationality
    pub fn continent_for(&self, nationality: &str) -> String {
        self.resolve(nationality)
            .label(&self.config.other_label)
            .to_string()
    }
}

/// Row counts per resolution outcome, for reporting
#[derive(Debug, Clone, Default)]
pub struct ContinentOutcome {
    pub resolved_rows: usize,
    pub override_rows: usize,
    pub fallback_rows: usize,
    /// Distinct values that fell back to the other label, sorted
    pub unresolved: Vec<String>,
}

/// Replace the nationality column with a continent column.
///
/// Each distinct value is resolved once. Nulls fall back to the other label.
/// When the nationality column is absent the frame is returned unchanged.
pub fn map_continents(
    df: &DataFrame,
    config: &PipelineConfig,
    resolver: &dyn ContinentResolver,
) -> Result<(DataFrame, ContinentOutcome)> {
    let column = config.nationality_column.as_str();
    if df.column(column).is_err() {
        return Ok((df.clone(), ContinentOutcome::default()));
    }

    let mapper = ContinentMapper::new(resolver, config);
    let values = column_as_strings(df, column)?;

    let mut cache: HashMap<&str, Resolution> = HashMap::new();
    let mut outcome = ContinentOutcome::default();
    let mut unresolved: BTreeSet<String> = BTreeSet::new();

    let continents: Vec<Option<String>> = values
        .iter()
        .map(|v| {
            let resolution = match v {
                Some(name) => cache
                    .entry(name.as_str())
                    .or_insert_with(|| mapper.resolve(name))
                    .clone(),
                None => Resolution::Fallback(ResolveError::NameNotFound(String::new())),
            };
            match &resolution {
                Resolution::Resolved(_) => outcome.resolved_rows += 1,
                Resolution::Override(_) => outcome.override_rows += 1,
                Resolution::Fallback(err) => {
                    outcome.fallback_rows += 1;
                    if let Some(name) = v {
                        if unresolved.insert(name.clone()) {
                            tracing::debug!(nationality = %name, error = %err, "continent fallback");
                        }
                    }
                }
            }
            Some(resolution.label(&config.other_label).to_string())
        })
        .collect();

    outcome.unresolved = unresolved.into_iter().collect();

    let with_continent = replace_string_column(df, &config.continent_column, continents)?;
    let result = if config.continent_column == config.nationality_column {
        with_continent
    } else {
        with_continent.drop(column)?
    };

    Ok((result, outcome))
}
