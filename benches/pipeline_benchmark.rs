//! Benchmark of the frequency and continent pipelines on synthetic player data
//!
//! Run with: cargo bench --bench pipeline_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use wageprep::pipeline::{
    rank_by_frequency, run_continent_pipeline, run_frequency_pipeline, CountryTable,
    PipelineConfig,
};

const NATIONS: [&str; 16] = [
    "England", "Spain", "Germany", "France", "Argentina", "Brazil", "Italy", "Netherlands",
    "Portugal", "Scotland", "Japan", "United States", "Nigeria", "Wales", "Australia", "Atlantis",
];

/// Generate a player frame with `n_numeric` numeric features and a skewed
/// nationality column carrying byte-string artifacts
fn generate_player_dataframe(n_rows: usize, n_numeric: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let nationality: Vec<String> = (0..n_rows)
        .map(|_| {
            let idx = (rng.gen::<f64>().powi(3) * NATIONS.len() as f64) as usize;
            let name = NATIONS[idx.min(NATIONS.len() - 1)];
            if rng.gen_bool(0.3) {
                format!("b'{}'", name)
            } else {
                name.to_string()
            }
        })
        .collect();
    let foot: Vec<&str> = (0..n_rows)
        .map(|_| if rng.gen_bool(0.25) { "Left" } else { "Right" })
        .collect();
    let log_wages: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(7.0..13.0)).collect();

    let mut columns: Vec<Column> = vec![
        Column::new("nationality_name".into(), nationality),
        Column::new("preferred_foot".into(), foot),
        Column::new("log_wages".into(), log_wages),
    ];
    for i in 0..n_numeric {
        let values: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>() * 100.0).collect();
        columns.push(Column::new(format!("attr_{}", i).into(), values));
    }

    DataFrame::new(columns).expect("Failed to create DataFrame")
}

/// Both pipelines end to end for varying dataset sizes
fn benchmark_pipelines(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipelines");
    let sizes = [(1_000, 10), (10_000, 20), (50_000, 40)];

    let frequency = PipelineConfig::frequency();
    let continent = PipelineConfig::continent();
    let table = CountryTable::builtin();

    for (n_rows, n_numeric) in sizes {
        let df = generate_player_dataframe(n_rows, n_numeric, 42);
        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(
            BenchmarkId::new("frequency", format!("{}x{}", n_rows, n_numeric)),
            &df,
            |b, df| {
                b.iter(|| {
                    let _ = run_frequency_pipeline(black_box(df), black_box(&frequency));
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("continent", format!("{}x{}", n_rows, n_numeric)),
            &df,
            |b, df| {
                b.iter(|| {
                    let _ = run_continent_pipeline(
                        black_box(df),
                        black_box(&continent),
                        black_box(&table),
                    );
                });
            },
        );
    }

    group.finish();
}

/// Frequency ranking alone, the only sort in the frequency pipeline
fn benchmark_frequency_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("frequency_ranking");

    for n_rows in [10_000, 100_000] {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let values: Vec<Option<String>> = (0..n_rows)
            .map(|_| Some(NATIONS[rng.gen_range(0..NATIONS.len())].to_lowercase()))
            .collect();
        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &values, |b, values| {
            b.iter(|| rank_by_frequency(black_box(values)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_pipelines, benchmark_frequency_ranking);
criterion_main!(benches);
