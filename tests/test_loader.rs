//! Unit tests for dataset loading and saving

use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;
use wageprep::pipeline::{
    features_with_target, get_column_names, load_dataset_with_progress, save_dataset,
};

#[path = "common/mod.rs"]
mod common;

fn write_lines(path: &std::path::Path, lines: &[&str]) {
    let mut file = std::fs::File::create(path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("players.csv");
    write_lines(
        &csv_path,
        &[
            "age,nationality_name,log_wages",
            "24,b'Spain',9.5",
            "31,England,11.2",
        ],
    );

    let (df, rows, cols, mem_mb) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 2, "Should have 2 data rows");
    assert_eq!(cols, 3, "Should have 3 columns");
    assert_eq!(df.get_column_names(), &["age", "nationality_name", "log_wages"]);
    assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("nationality_name").unwrap().dtype(), &DataType::String);
    assert!(mem_mb >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let mut df = df! {
        "age" => [20i64, 25, 30],
        "log_wages" => [9.0f64, 9.8, 10.4],
    }
    .unwrap();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let (loaded_df, rows, cols, _mem) = load_dataset_with_progress(&parquet_path, 100).unwrap();

    assert_eq!(rows, 3);
    assert_eq!(cols, 2);
    assert_eq!(loaded_df.get_column_names(), &["age", "log_wages"]);
}

#[test]
fn test_get_column_names_csv() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("players.csv");
    write_lines(&csv_path, &["age,overall,log_wages", "24,70,9.5"]);

    let columns = get_column_names(&csv_path).unwrap();

    assert_eq!(columns, vec!["age", "overall", "log_wages"]);
}

#[test]
fn test_get_column_names_parquet() {
    let mut df = common::create_player_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let columns = get_column_names(&parquet_path).unwrap();

    assert_eq!(columns.len(), 7);
    assert!(columns.contains(&"nationality_name".to_string()));
    assert!(columns.contains(&"log_wages".to_string()));
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("players.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let result = load_dataset_with_progress(&bad_path, 100);

    assert!(result.is_err(), "Unsupported format should return error");
    let err_msg = result.unwrap_err().to_string();
    assert!(
        err_msg.contains("Unsupported"),
        "Error message should mention unsupported format: {}",
        err_msg
    );
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/players.csv");

    let result = load_dataset_with_progress(path, 100);

    assert!(result.is_err(), "Nonexistent file should return error");
}

#[test]
fn test_csv_with_missing_values() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("missing.csv");
    write_lines(
        &csv_path,
        &[
            "age,nationality_name,log_wages",
            "24,,9.5",
            ",Brazil,10.0",
            "29,Japan,",
        ],
    );

    let (df, rows, cols, _) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!((rows, cols), (3, 3));
    let null_counts: Vec<usize> = df.get_columns().iter().map(|c| c.null_count()).collect();
    assert_eq!(null_counts, vec![1, 1, 1]);
}

#[test]
fn test_large_file_memory_estimate() {
    let mut df = common::create_large_player_dataframe(1000);
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let (_, rows, cols, mem_mb) = load_dataset_with_progress(&parquet_path, 100).unwrap();

    assert_eq!(rows, 1000);
    assert_eq!(cols, 4);
    assert!(
        mem_mb > 0.0,
        "Large DataFrame should have positive memory estimate"
    );
}

#[test]
fn test_schema_inference_length() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("inference.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "overall").unwrap();
    for i in 0..100 {
        writeln!(file, "{}", 50 + i % 40).unwrap();
    }
    drop(file);

    let (df_short, _, _, _) = load_dataset_with_progress(&csv_path, 10).unwrap();
    let (df_full, _, _, _) = load_dataset_with_progress(&csv_path, 0).unwrap();

    assert_eq!(df_short.height(), 100);
    assert_eq!(df_full.height(), 100);
}

#[test]
fn test_save_and_reload_csv_and_parquet() {
    let temp_dir = TempDir::new().unwrap();
    let mut df = common::create_player_dataframe();

    for name in ["out.csv", "out.parquet"] {
        let path = temp_dir.path().join(name);
        save_dataset(&mut df, &path).unwrap();
        let (reloaded, rows, cols, _) = load_dataset_with_progress(&path, 100).unwrap();
        assert_eq!((rows, cols), (20, 7), "{name}");
        assert_eq!(reloaded.get_column_names(), df.get_column_names(), "{name}");
    }
}

#[test]
fn test_save_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let mut df = common::create_player_dataframe();

    let err = save_dataset(&mut df, &temp_dir.path().join("out.json")).unwrap_err();
    assert!(err.to_string().contains("Unsupported output format"));
}

#[test]
fn test_features_with_target_appends_last() {
    let features = df! {
        "0" => [0.0f64, 1.0],
        "1" => [1.0f64, 0.0],
    }
    .unwrap();
    let target = Series::new("log_wages".into(), [9.0f64, 10.0]);

    let combined = features_with_target(&features, &target).unwrap();

    assert_eq!(combined.get_column_names(), &["0", "1", "log_wages"]);
    assert_eq!(combined.height(), 2);
}

#[test]
fn test_features_with_target_rejects_collision() {
    let features = df! { "log_wages" => [0.0f64] }.unwrap();
    let target = Series::new("log_wages".into(), [9.0f64]);

    assert!(features_with_target(&features, &target).is_err());
}

#[test]
fn test_features_with_target_rejects_length_mismatch() {
    let features = df! { "age" => [0.0f64, 1.0] }.unwrap();
    let target = Series::new("log_wages".into(), [9.0f64]);

    // A single-row target must not be broadcast over the features
    let err = features_with_target(&features, &target).unwrap_err();
    assert!(err.to_string().contains("1 rows"), "{}", err);
}
