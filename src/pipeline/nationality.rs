//! Nationality string cleaning and frequency-based grouping

use polars::prelude::*;
use std::collections::{HashMap, HashSet};

use super::error::{PrepError, Result};

/// Case normalization applied after stripping byte-string artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    /// "côte d'ivoire"
    Lower,
    /// "Côte D'Ivoire" - first letter of every letter run uppercased
    Title,
}

/// Clean a single nationality value.
///
/// Strips a literal leading `b'` and a literal trailing `'` (left behind when
/// bytes were serialized with `str()` upstream), trims whitespace, then
/// normalizes case. A trailing `'` followed by one final newline counts as
/// trailing.
pub fn clean_value(raw: &str, style: CaseStyle) -> String {
    let stripped = raw.strip_prefix("b'").unwrap_or(raw);
    let stripped = stripped
        .strip_suffix('\'')
        .or_else(|| stripped.strip_suffix("'\n"))
        .unwrap_or(stripped);
    let trimmed = stripped.trim();

    match style {
        CaseStyle::Lower => trimmed.to_lowercase(),
        CaseStyle::Title => title_case(trimmed),
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Read a column as optional strings, casting non-string dtypes first
pub(crate) fn column_as_strings(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let col = df
        .column(column)
        .map_err(|_| PrepError::missing_column(column, df))?;
    let as_str = col.cast(&DataType::String)?;
    Ok(as_str
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// Replace (or add) a string column
pub(crate) fn replace_string_column(
    df: &DataFrame,
    column: &str,
    values: Vec<Option<String>>,
) -> Result<DataFrame> {
    let ca: StringChunked = values.into_iter().collect();
    let series = ca.with_name(column.into()).into_series();
    let mut result = df.clone();
    result.with_column(series)?;
    Ok(result)
}

/// Clean every value of `column`; nulls stay null.
///
/// Returns the frame unchanged when the column is absent.
pub fn clean_nationality_column(df: &DataFrame, column: &str, style: CaseStyle) -> Result<DataFrame> {
    if df.column(column).is_err() {
        tracing::debug!(column, "nationality column absent, skipping cleaning");
        return Ok(df.clone());
    }

    let cleaned: Vec<Option<String>> = column_as_strings(df, column)?
        .into_iter()
        .map(|v| v.map(|s| clean_value(&s, style)))
        .collect();

    replace_string_column(df, column, cleaned)
}

/// Frequency statistics for one distinct value
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub value: String,
    pub count: usize,
    /// Share of all rows (nulls included in the denominator)
    pub share: f64,
    /// Inclusive cumulative share in ranking order
    pub cumulative: f64,
}

/// Rank distinct non-null values by frequency with cumulative coverage.
///
/// Ordering is count descending, ties broken by value ascending, so the
/// ranking does not depend on row order.
pub fn rank_by_frequency(values: &[Option<String>]) -> Vec<CategoryShare> {
    let total = values.len();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().flatten() {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut running = 0usize;
    ranked
        .into_iter()
        .map(|(value, count)| {
            running += count;
            CategoryShare {
                value: value.to_string(),
                count,
                share: count as f64 / total as f64,
                cumulative: running as f64 / total as f64,
            }
        })
        .collect()
}

/// Values whose inclusive cumulative share stays within `coverage`
pub fn coverage_set(values: &[Option<String>], coverage: f64) -> HashSet<String> {
    rank_by_frequency(values)
        .into_iter()
        .take_while(|c| c.cumulative <= coverage)
        .map(|c| c.value)
        .collect()
}

/// Outcome of a coverage reduction, for reporting
#[derive(Debug, Clone, Default)]
pub struct CoverageOutcome {
    /// Labels kept verbatim, in ranking order
    pub kept: Vec<String>,
    /// Number of distinct values bucketed into the other label
    pub bucketed: usize,
    /// Rows that now carry the other label
    pub rows_bucketed: usize,
}

/// Collapse the long tail of `column` into `other_label`.
///
/// Values inside the top `coverage` mass keep their label, everything else
/// (including nulls) becomes `other_label`. When the column is absent the
/// frame is returned unchanged with an empty outcome.
pub fn reduce_by_coverage(
    df: &DataFrame,
    column: &str,
    coverage: f64,
    other_label: &str,
) -> Result<(DataFrame, CoverageOutcome)> {
    if df.column(column).is_err() {
        return Ok((df.clone(), CoverageOutcome::default()));
    }

    let values = column_as_strings(df, column)?;
    let ranked = rank_by_frequency(&values);

    let kept: Vec<String> = ranked
        .iter()
        .take_while(|c| c.cumulative <= coverage)
        .map(|c| c.value.clone())
        .collect();
    let kept_set: HashSet<&str> = kept.iter().map(|s| s.as_str()).collect();

    let mut rows_bucketed = 0usize;
    let reduced: Vec<Option<String>> = values
        .iter()
        .map(|v| match v {
            Some(s) if kept_set.contains(s.as_str()) => Some(s.clone()),
            _ => {
                rows_bucketed += 1;
                Some(other_label.to_string())
            }
        })
        .collect();

    let outcome = CoverageOutcome {
        bucketed: ranked.len() - kept.len(),
        kept,
        rows_bucketed,
    };

    tracing::debug!(
        column,
        kept = outcome.kept.len(),
        bucketed = outcome.bucketed,
        "coverage reduction applied"
    );

    Ok((replace_string_column(df, column, reduced)?, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_byte_artifacts() {
        assert_eq!(clean_value("b'England'", CaseStyle::Lower), "england");
        assert_eq!(clean_value("b'England'", CaseStyle::Title), "England");
        assert_eq!(clean_value("  b' Brazil ' ", CaseStyle::Lower), "b' brazil '");
        assert_eq!(clean_value("b' Brazil '", CaseStyle::Lower), "brazil");
    }

    #[test]
    fn test_clean_strips_quote_before_final_newline() {
        assert_eq!(clean_value("b'Spain'\n", CaseStyle::Lower), "spain");
        assert_eq!(clean_value("b'Spain'\n", CaseStyle::Title), "Spain");
        // only one newline is allowed after the quote
        assert_eq!(clean_value("Spain'\n\n", CaseStyle::Lower), "spain'");
    }

    #[test]
    fn test_clean_only_strips_at_edges() {
        assert_eq!(clean_value("Côte d'Ivoire", CaseStyle::Lower), "côte d'ivoire");
        assert_eq!(clean_value("b'Côte d'Ivoire'", CaseStyle::Title), "Côte D'Ivoire");
    }

    #[test]
    fn test_title_case_matches_word_boundaries() {
        assert_eq!(clean_value("NORTHERN IRELAND", CaseStyle::Title), "Northern Ireland");
        assert_eq!(clean_value("bosnia and herzegovina", CaseStyle::Title), "Bosnia And Herzegovina");
        assert_eq!(clean_value("guinea-bissau", CaseStyle::Title), "Guinea-Bissau");
    }

    #[test]
    fn test_clean_is_idempotent() {
        for raw in ["b'Korea Republic'", "  Spain", "United States", "côte d'ivoire"] {
            for style in [CaseStyle::Lower, CaseStyle::Title] {
                let once = clean_value(raw, style);
                assert_eq!(clean_value(&once, style), once, "not idempotent for {raw:?}");
            }
        }
    }

    #[test]
    fn test_rank_orders_by_count_then_value() {
        let values: Vec<Option<String>> = ["b", "a", "b", "c", "a", "b"]
            .iter()
            .map(|s| Some(s.to_string()))
            .collect();
        let ranked = rank_by_frequency(&values);
        let order: Vec<&str> = ranked.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert!((ranked[2].cumulative - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_coverage_boundary_is_inclusive() {
        // 9 of 10 rows are "x": exactly 90% mass, so "x" is kept
        let mut values: Vec<Option<String>> = vec![Some("x".to_string()); 9];
        values.push(Some("y".to_string()));
        let kept = coverage_set(&values, 0.90);
        assert!(kept.contains("x"));
        assert!(!kept.contains("y"));
    }

    #[test]
    fn test_dominant_value_above_coverage_is_bucketed() {
        let values: Vec<Option<String>> = vec![Some("x".to_string()); 5];
        assert!(coverage_set(&values, 0.90).is_empty());
    }

    #[test]
    fn test_reduce_maps_nulls_to_other() {
        let df = df! {
            "nat" => [Some("a"), Some("a"), Some("a"), None, Some("b")],
        }
        .unwrap();
        let (out, outcome) = reduce_by_coverage(&df, "nat", 0.6, "other").unwrap();
        let values: Vec<Option<&str>> = out.column("nat").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("a"), Some("a"), Some("a"), Some("other"), Some("other")]);
        assert_eq!(outcome.kept, vec!["a".to_string()]);
        assert_eq!(outcome.bucketed, 1);
        assert_eq!(outcome.rows_bucketed, 2);
    }

    #[test]
    fn test_absent_column_is_skipped() {
        let df = df! { "age" => [20i64, 30] }.unwrap();
        let cleaned = clean_nationality_column(&df, "nationality_name", CaseStyle::Lower).unwrap();
        assert!(cleaned.equals(&df));
        let (reduced, outcome) = reduce_by_coverage(&df, "nationality_name", 0.9, "other").unwrap();
        assert!(reduced.equals(&df));
        assert!(outcome.kept.is_empty());
    }

    #[test]
    fn test_non_string_column_is_cast_before_cleaning() {
        let df = df! { "nat" => [1i64, 2] }.unwrap();
        let cleaned = clean_nationality_column(&df, "nat", CaseStyle::Lower).unwrap();
        assert_eq!(cleaned.column("nat").unwrap().dtype(), &DataType::String);
    }
}
