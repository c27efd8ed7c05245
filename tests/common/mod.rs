//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small player DataFrame with a known nationality distribution
///
/// 20 rows, nationalities after cleaning:
/// - england: 8 rows (40%, cumulative 40%), raw values carry byte-string artifacts
/// - spain:   6 rows (30%, cumulative 70%)
/// - brazil:  3 rows (15%, cumulative 85%)
/// - japan:   2 rows (10%, cumulative 95%), bucketed at 90% coverage
/// - atlantis: 1 row (not a real country)
///
/// `is_gk` is boolean and should be dropped by both pipelines.
pub fn create_player_dataframe() -> DataFrame {
    df! {
        "age" => [21i64, 25, 30, 19, 33, 27, 24, 22, 29, 31, 20, 26, 28, 23, 35, 18, 32, 27, 24, 30],
        "overall" => [70i64, 75, 82, 64, 78, 80, 73, 69, 85, 77, 66, 74, 81, 71, 79, 62, 76, 72, 68, 83],
        "height_cm" => [180.0f64, 175.5, 188.0, 172.0, 183.5, 179.0, 190.0, 176.0, 181.0, 185.0,
                        170.0, 178.0, 186.5, 174.0, 182.0, 177.0, 184.0, 173.5, 171.0, 187.0],
        "nationality_name" => [
            "b'England'", "England", " england ", "b'England'", "ENGLAND", "England", "England", "b'England'",
            "Spain", "b'Spain'", "spain", "Spain", "Spain", "b'Spain'",
            "Brazil", "b'Brazil'", "brazil",
            "Japan", "b'Japan'",
            "Atlantis",
        ],
        "preferred_foot" => ["Right", "Left", "Right", "Right", "Left", "Right", "Right", "Left", "Right", "Right",
                             "Left", "Right", "Right", "Right", "Left", "Right", "Right", "Left", "Right", "Right"],
        "is_gk" => [false, false, true, false, false, false, false, true, false, false,
                    false, false, false, true, false, false, false, false, false, true],
        "log_wages" => [9.2f64, 10.1, 11.4, 8.7, 10.8, 11.0, 9.9, 9.1, 11.9, 10.5,
                        8.9, 9.8, 11.2, 9.4, 10.6, 8.5, 10.3, 9.6, 9.0, 11.7],
    }
    .unwrap()
}

/// Create a larger synthetic player DataFrame for stress tests
pub fn create_large_player_dataframe(rows: usize) -> DataFrame {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(42);

    const NATIONS: [&str; 8] = [
        "England", "Spain", "Brazil", "Germany", "France", "Argentina", "Japan", "Scotland",
    ];

    let age: Vec<i64> = (0..rows).map(|_| rng.gen_range(16..40)).collect();
    let overall: Vec<i64> = (0..rows).map(|_| rng.gen_range(45..95)).collect();
    let nationality: Vec<String> = (0..rows)
        .map(|_| {
            // Skewed draw so the frequency ranking has a long tail
            let idx = (rng.gen::<f64>().powi(2) * NATIONS.len() as f64) as usize;
            format!("b'{}'", NATIONS[idx.min(NATIONS.len() - 1)])
        })
        .collect();
    let log_wages: Vec<f64> = (0..rows).map(|_| rng.gen_range(7.0..13.0)).collect();

    DataFrame::new(vec![
        Column::new("age".into(), age),
        Column::new("overall".into(), overall),
        Column::new("nationality_name".into(), nationality),
        Column::new("log_wages".into(), log_wages),
    ])
    .unwrap()
}

/// Write a DataFrame to a temporary CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("players.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Write a DataFrame to a temporary Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("players.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Expected {} rows, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Expected {} columns, got {}", expected_cols, cols);
}

/// Assert DataFrame contains all expected columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let col_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in expected_cols {
        assert!(
            col_names.contains(&col.to_string()),
            "Expected column '{}' not found in {:?}",
            col,
            col_names
        );
    }
}

/// Assert DataFrame does NOT contain specified columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let col_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in unexpected_cols {
        assert!(
            !col_names.contains(&col.to_string()),
            "Column '{}' should have been dropped",
            col
        );
    }
}

/// Values of a Float64 feature column, nulls skipped
pub fn float_values(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}
