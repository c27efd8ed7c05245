//! The two preprocessing pipelines
//!
//! Both pipelines reduce the nationality column first (frequency grouping or
//! continent mapping) and then share [`prepare_features`]: split off the
//! target, partition columns by dtype, fit a [`ColumnTransformer`] and apply
//! it to the same frame.

use polars::prelude::*;

use super::columns::{partition_columns, split_target, ColumnPartition};
use super::config::{PipelineConfig, PipelineKind};
use super::continent::{map_continents, ContinentOutcome, ContinentResolver, CountryTable};
use super::error::Result;
use super::nationality::{clean_nationality_column, reduce_by_coverage, CaseStyle, CoverageOutcome};
use super::transformer::ColumnTransformer;

/// How the nationality column was reduced
#[derive(Debug, Clone)]
pub enum Reduction {
    /// The nationality column was absent
    Skipped,
    Coverage(CoverageOutcome),
    Continent(ContinentOutcome),
}

/// Everything a pipeline call produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Transformed feature matrix, all `Float64`
    pub features: DataFrame,
    /// Target column, untouched
    pub target: Series,
    /// Fitted transformer, reusable on new data with the same schema
    pub transformer: ColumnTransformer,
    /// Feature columns discarded because of an unsupported dtype
    pub dropped_columns: Vec<String>,
    pub reduction: Reduction,
}

/// Nationality step of the frequency pipeline: lowercase cleaning followed by
/// coverage grouping. The frame is returned as-is when the column is absent.
pub fn reduce_frequency(raw: &DataFrame, config: &PipelineConfig) -> Result<(DataFrame, Reduction)> {
    let column = config.nationality_column.as_str();
    if raw.column(column).is_err() {
        return Ok((raw.clone(), Reduction::Skipped));
    }

    let cleaned = clean_nationality_column(raw, column, CaseStyle::Lower)?;
    let (reduced, outcome) =
        reduce_by_coverage(&cleaned, column, config.coverage, &config.other_label)?;
    Ok((reduced, Reduction::Coverage(outcome)))
}

/// Nationality step of the continent pipeline: title-case cleaning followed
/// by continent mapping. The frame is returned as-is when the column is absent.
pub fn reduce_continent(
    raw: &DataFrame,
    config: &PipelineConfig,
    resolver: &dyn ContinentResolver,
) -> Result<(DataFrame, Reduction)> {
    let column = config.nationality_column.as_str();
    if raw.column(column).is_err() {
        return Ok((raw.clone(), Reduction::Skipped));
    }

    let cleaned = clean_nationality_column(raw, column, CaseStyle::Title)?;
    let (mapped, outcome) = map_continents(&cleaned, config, resolver)?;
    Ok((mapped, Reduction::Continent(outcome)))
}

/// Shared tail of both pipelines.
///
/// Separates `config.target_column` (fails with `MissingColumn` if absent),
/// partitions the remaining columns and fits + applies the transformer.
/// Returns the features, the target, the fitted transformer and the
/// partition used.
pub fn prepare_features(
    df: &DataFrame,
    config: &PipelineConfig,
) -> Result<(DataFrame, Series, ColumnTransformer, ColumnPartition)> {
    let (x, y) = split_target(df, &config.target_column)?;
    let partition = partition_columns(&x);

    if !partition.dropped.is_empty() && config.warn_on_dropped_columns {
        tracing::warn!(
            columns = ?partition.dropped,
            "dropping columns that are neither numeric nor text"
        );
    }

    let mut transformer = ColumnTransformer::new(
        partition.numeric.clone(),
        partition.categorical.clone(),
        config.unknown_categories,
    );
    let features = transformer.fit_transform(&x)?;

    tracing::debug!(
        rows = features.height(),
        numeric = partition.numeric.len(),
        categorical = partition.categorical.len(),
        features = features.width(),
        "column transformer fitted"
    );

    Ok((features, y, transformer, partition))
}

/// Pipeline 1: lowercase-clean the nationality, keep the labels covering
/// `config.coverage` of rows, bucket the rest into `config.other_label`.
pub fn run_frequency_pipeline(raw: &DataFrame, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let (df, reduction) = reduce_frequency(raw, config)?;
    let (features, target, transformer, partition) = prepare_features(&df, config)?;

    Ok(PipelineOutput {
        features,
        target,
        transformer,
        dropped_columns: partition.dropped_names(),
        reduction,
    })
}

/// Pipeline 2: title-case-clean the nationality, replace it with a continent
/// code column, and emit features with positional column names.
pub fn run_continent_pipeline(
    raw: &DataFrame,
    config: &PipelineConfig,
    resolver: &dyn ContinentResolver,
) -> Result<PipelineOutput> {
    config.validate()?;
    let (df, reduction) = reduce_continent(raw, config, resolver)?;
    let (mut features, target, transformer, partition) = prepare_features(&df, config)?;
    anonymize_columns(&mut features)?;

    Ok(PipelineOutput {
        features,
        target,
        transformer,
        dropped_columns: partition.dropped_names(),
        reduction,
    })
}

/// Run the pipeline of the given kind, using the built-in country table for
/// continent resolution.
pub fn run_pipeline(kind: PipelineKind, raw: &DataFrame, config: &PipelineConfig) -> Result<PipelineOutput> {
    match kind {
        PipelineKind::Frequency => run_frequency_pipeline(raw, config),
        PipelineKind::Continent => run_continent_pipeline(raw, config, &CountryTable::builtin()),
    }
}

/// Rename every column to its position ("0", "1", ...)
pub fn anonymize_columns(df: &mut DataFrame) -> Result<()> {
    if df.width() == 0 {
        return Ok(());
    }
    let renamed: Vec<Column> = df
        .get_columns()
        .iter()
        .enumerate()
        .map(|(i, col)| col.clone().with_name(i.to_string().into()))
        .collect();
    *df = DataFrame::new(renamed)?;
    Ok(())
}
