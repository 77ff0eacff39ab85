//! Analysis pipeline: load, clean, summarize, group, and prepare the charts,
//! writing the text report as it goes.

use crate::charts::ChartSet;
use crate::config::AnalysisConfig;
use crate::data::{
    DataLoader, DataProcessor, Species, PETAL_LENGTH, SEPAL_LENGTH, SEPAL_WIDTH,
};
use crate::stats::{SpeciesMeans, StatsCalculator};
use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Write;

/// Everything computed by one run.
pub struct AnalysisReport {
    pub rows_loaded: usize,
    pub rows_clean: usize,
    #[allow(dead_code)]
    pub summary: DataFrame,
    #[allow(dead_code)]
    pub group_means: DataFrame,
    #[allow(dead_code)]
    pub species_means: Vec<SpeciesMeans>,
    pub observations: Vec<String>,
    pub charts: ChartSet,
}

pub struct Analysis;

impl Analysis {
    pub fn run<W: Write>(config: &AnalysisConfig, out: &mut W) -> Result<AnalysisReport> {
        let raw = DataLoader::load_iris().context("loading the iris dataset")?;
        log::info!("Loaded {} rows x {} columns", raw.height(), raw.width());

        writeln!(out, "First few rows of the dataset:")?;
        writeln!(out, "{}", raw.head(Some(config.head_rows)))?;

        writeln!(out, "\nDataset Info:")?;
        write!(out, "{}", DataProcessor::frame_info(&raw))?;

        writeln!(out, "\nMissing values:")?;
        for (name, count) in DataProcessor::missing_counts(&raw) {
            writeln!(out, "{name:<20} {count}")?;
        }

        let df = DataProcessor::drop_missing(&raw).context("dropping rows with missing values")?;
        let row_labels = DataProcessor::retained_rows(&raw);
        let dropped = raw.height() - df.height();
        if dropped > 0 {
            log::info!("Dropped {dropped} rows with missing values");
        }

        let summary = StatsCalculator::describe(&df).context("computing summary statistics")?;
        writeln!(out, "\nSummary Statistics:")?;
        writeln!(out, "{summary}")?;

        let group_means =
            StatsCalculator::group_means(&df).context("computing per-species means")?;
        writeln!(out, "\nMean of each feature by species:")?;
        writeln!(out, "{group_means}")?;
        let species_means = StatsCalculator::species_means(&group_means)?;

        let charts = ChartSet::build(&df, &row_labels, &species_means, config)
            .context("preparing chart data")?;

        let observations = Self::observations(&df, &species_means)?;
        writeln!(out, "\nObservations and Insights:")?;
        for line in &observations {
            writeln!(out, "- {line}")?;
        }

        Ok(AnalysisReport {
            rows_loaded: raw.height(),
            rows_clean: df.height(),
            summary,
            group_means,
            species_means,
            observations,
            charts,
        })
    }

    /// Plain-language findings derived from the computed statistics.
    fn observations(df: &DataFrame, means: &[SpeciesMeans]) -> Result<Vec<String>> {
        let mut notes = Vec::new();

        let petal_means: Vec<(Species, f64)> = means
            .iter()
            .filter_map(|m| m.mean_of(PETAL_LENGTH).map(|v| (m.species, v)))
            .collect();

        if let Some((smallest, value)) = petal_means
            .iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        {
            notes.push(format!(
                "{smallest} has distinctly the smallest petals (mean length {value:.3} cm)."
            ));
        }

        let increasing = petal_means.windows(2).all(|w| w[0].1 < w[1].1);
        if petal_means.len() > 1 {
            let order: Vec<&str> = petal_means.iter().map(|(s, _)| s.as_str()).collect();
            if increasing {
                notes.push(format!(
                    "Average petal length increases from {}.",
                    order.join(" to ")
                ));
            } else {
                notes.push("Average petal length does not increase monotonically across species.".to_string());
            }
        }

        let sepal = DataLoader::feature_values(df, SEPAL_LENGTH)?;
        let petal = DataLoader::feature_values(df, PETAL_LENGTH)?;
        let r = StatsCalculator::correlation(&sepal, &petal);
        if r.is_finite() {
            notes.push(format!(
                "Sepal length and petal length are correlated (Pearson r = {r:.3})."
            ));
        }

        let widths = DataLoader::feature_values(df, SEPAL_WIDTH)?;
        let skew = StatsCalculator::skewness(&widths);
        if skew.is_finite() {
            let shape = if skew.abs() < 0.1 {
                "roughly symmetric"
            } else if skew > 0.0 {
                "slightly right-skewed"
            } else {
                "slightly left-skewed"
            };
            notes.push(format!("Sepal width is {shape} (skewness {skew:.3})."));
        }

        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_headless() -> (AnalysisReport, String) {
        let mut buffer = Vec::new();
        let report = Analysis::run(&AnalysisConfig::headless(), &mut buffer).unwrap();
        (report, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn report_sections_appear_in_order() {
        let (_, text) = run_headless();
        let headers = [
            "First few rows of the dataset:",
            "Dataset Info:",
            "Missing values:",
            "Summary Statistics:",
            "Mean of each feature by species:",
            "Observations and Insights:",
        ];
        let mut last = 0;
        for header in headers {
            let pos = text[last..]
                .find(header)
                .unwrap_or_else(|| panic!("missing section {header}"));
            last += pos + header.len();
        }
    }

    #[test]
    fn group_means_table_names_every_species() {
        let (_, text) = run_headless();
        let start = text.find("Mean of each feature by species").unwrap();
        let table = &text[start..];
        for species in Species::ALL {
            assert!(table.contains(species.as_str()), "{species} missing");
        }
    }

    #[test]
    fn cleaning_keeps_every_row() {
        let (report, _) = run_headless();
        assert_eq!(report.rows_loaded, 150);
        assert_eq!(report.rows_clean, 150);
        assert_eq!(report.group_means.height(), 3);
        assert_eq!(report.summary.height(), 8);
    }

    #[test]
    fn observations_follow_the_data() {
        let (report, _) = run_headless();
        let notes = report.observations.join("\n");
        assert!(notes.contains("setosa has distinctly the smallest petals"));
        assert!(notes.contains("increases from setosa to versicolor to virginica"));
        assert!(notes.contains("slightly right-skewed"));
    }
}
