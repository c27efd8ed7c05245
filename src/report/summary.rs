//! Preprocessing summary report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{PipelineKind, PipelineOutput, Reduction};

/// Summary of one preprocessing run
#[derive(Debug, Default)]
pub struct PreprocessSummary {
    pub pipeline: PipelineKind,
    pub rows: usize,
    pub input_columns: usize,
    pub numeric_features: usize,
    pub categorical_features: usize,
    pub output_features: usize,
    pub dropped_columns: Vec<String>,
    /// Distinct categories per encoded column
    pub categories: Vec<(String, usize)>,
    /// Nationality labels kept or continents resolved, shown as a one-line note
    pub reduction_note: Option<String>,
    pub load_time: Duration,
    pub transform_time: Duration,
    pub save_time: Duration,
}

impl PreprocessSummary {
    pub fn new(pipeline: PipelineKind, rows: usize, input_columns: usize) -> Self {
        Self {
            pipeline,
            rows,
            input_columns,
            ..Default::default()
        }
    }

    /// Record what a pipeline run produced
    pub fn record_output(&mut self, output: &PipelineOutput) {
        let transformer = &output.transformer;
        self.numeric_features = transformer.numeric_columns().len();
        self.categorical_features = transformer.categorical_columns().len();
        self.output_features = transformer.n_features_out();
        self.dropped_columns = output.dropped_columns.clone();
        self.categories = transformer
            .encoder()
            .vocabularies()
            .iter()
            .map(|v| (v.column.clone(), v.categories.len()))
            .collect();
        self.reduction_note = match &output.reduction {
            Reduction::Skipped => None,
            Reduction::Coverage(c) => Some(format!(
                "{} nationalities kept, {} bucketed ({} rows)",
                c.kept.len(),
                c.bucketed,
                c.rows_bucketed
            )),
            Reduction::Continent(c) => Some(format!(
                "{} rows resolved, {} UK overrides, {} fell back ({} distinct)",
                c.resolved_rows,
                c.override_rows,
                c.fallback_rows,
                c.unresolved.len()
            )),
        };
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_transform_time(&mut self, elapsed: Duration) {
        self.transform_time = elapsed;
    }

    pub fn set_save_time(&mut self, elapsed: Duration) {
        self.save_time = elapsed;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.transform_time + self.save_time
    }

    /// Build the summary table
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("Pipeline"), Cell::new(self.pipeline)]);
        table.add_row(vec![Cell::new("Rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("Input Columns"), Cell::new(self.input_columns)]);
        table.add_row(vec![
            Cell::new("Numeric (scaled)"),
            Cell::new(self.numeric_features),
        ]);
        table.add_row(vec![
            Cell::new("Categorical (one-hot)"),
            Cell::new(self.categorical_features),
        ]);
        for (column, count) in &self.categories {
            table.add_row(vec![
                Cell::new(format!("  {} categories", column)),
                Cell::new(count),
            ]);
        }
        table.add_row(vec![
            Cell::new("Dropped (unsupported type)"),
            Cell::new(self.dropped_columns.len()).fg(if self.dropped_columns.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("Output Features"),
            Cell::new(self.output_features)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Total Time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("PREPROCESSING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }

        if let Some(note) = &self.reduction_note {
            println!();
            println!("      {} {}", style("Nationality:").yellow(), note);
        }

        if !self.dropped_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Dropped Columns").yellow(),
                style(format!("({})", self.dropped_columns.len())).dim()
            );
            for column in &self.dropped_columns {
                println!("        {} {}", style("•").dim(), column);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run_frequency_pipeline, PipelineConfig};
    use polars::df;

    #[test]
    fn test_record_output_counts() {
        let df = df! {
            "age" => [20i64, 25, 30, 35],
            "nationality_name" => ["Spain", "Spain", "Spain", "Japan"],
            "joined" => [true, false, true, false],
            "log_wages" => [9.0f64, 9.5, 10.0, 10.5],
        }
        .unwrap();
        let output = run_frequency_pipeline(&df, &PipelineConfig::frequency()).unwrap();

        let mut summary = PreprocessSummary::new(PipelineKind::Frequency, 4, 4);
        summary.record_output(&output);

        assert_eq!(summary.numeric_features, 1);
        assert_eq!(summary.categorical_features, 1);
        assert_eq!(summary.output_features, 3);
        assert_eq!(summary.dropped_columns, vec!["joined"]);
        assert_eq!(summary.categories, vec![("nationality_name".to_string(), 2)]);
        assert_eq!(
            summary.reduction_note.as_deref(),
            Some("1 nationalities kept, 1 bucketed (1 rows)")
        );
    }

    #[test]
    fn test_total_time_sums_steps() {
        let mut summary = PreprocessSummary::new(PipelineKind::Continent, 0, 0);
        summary.set_load_time(Duration::from_millis(100));
        summary.set_transform_time(Duration::from_millis(250));
        summary.set_save_time(Duration::from_millis(50));
        assert_eq!(summary.total_time(), Duration::from_millis(400));
        assert!(summary.to_table().to_string().contains("continent"));
    }
}
