//! Statistics Calculator Module
//! Handles descriptive statistics, species group means, and distribution shapes.

use crate::data::{DataLoader, LoaderError, Species, FEATURE_COLUMNS, SPECIES_COLUMN};
use polars::prelude::*;
use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;
use thiserror::Error;

/// Row labels of the summary table, in pandas `describe` order.
pub const SUMMARY_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error("Unexpected species in group means: {0}")]
    UnknownSpecies(String),
    #[error("{labels} row labels given for {rows} rows")]
    RowLabels { labels: usize, rows: usize },
}

/// Descriptive statistics for a single feature.
#[derive(Debug, Clone)]
pub struct FeatureSummary {
    pub feature: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for FeatureSummary {
    fn default() -> Self {
        Self {
            feature: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl FeatureSummary {
    /// Values in `SUMMARY_ROWS` order.
    pub fn as_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Mean of every feature within one species.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesMeans {
    pub species: Species,
    /// Indexed like `FEATURE_COLUMNS`.
    pub means: [f64; 4],
}

impl SpeciesMeans {
    pub fn mean_of(&self, feature: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == feature)
            .map(|i| self.means[i])
    }
}

/// Equal-width histogram bins.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// `counts.len() + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => (hi - lo) / self.counts.len() as f64,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> FeatureSummary {
        let n = values.len();
        if n == 0 {
            return FeatureSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let std = if n > 1 { Statistics::std_dev(values) } else { 0.0 };

        FeatureSummary {
            feature: String::new(),
            count: n,
            mean: Statistics::mean(values),
            std,
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Summaries of every feature column, computed in parallel.
    pub fn feature_summaries(df: &DataFrame) -> Result<Vec<FeatureSummary>, StatsError> {
        FEATURE_COLUMNS
            .par_iter()
            .map(|feature| -> Result<FeatureSummary, StatsError> {
                let values = DataLoader::feature_values(df, feature)?;
                let mut summary = Self::compute_descriptive_stats(&values);
                summary.feature = feature.to_string();
                Ok(summary)
            })
            .collect()
    }

    /// Build the `describe()` table: one `statistic` label column plus one column per feature.
    pub fn describe(df: &DataFrame) -> Result<DataFrame, StatsError> {
        let summaries = Self::feature_summaries(df)?;

        let mut columns = Vec::with_capacity(summaries.len() + 1);
        columns.push(Column::new("statistic".into(), SUMMARY_ROWS.to_vec()));
        for summary in &summaries {
            columns.push(Column::new(
                summary.feature.as_str().into(),
                summary.as_row().to_vec(),
            ));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Mean of each feature per species, sorted by species name.
    pub fn group_means(df: &DataFrame) -> Result<DataFrame, StatsError> {
        let aggs: Vec<Expr> = FEATURE_COLUMNS.iter().map(|c| col(*c).mean()).collect();

        let means = df
            .clone()
            .lazy()
            .filter(col(SPECIES_COLUMN).is_not_null())
            .group_by([col(SPECIES_COLUMN)])
            .agg(aggs)
            .sort([SPECIES_COLUMN], SortMultipleOptions::default())
            .collect()?;

        Ok(means)
    }

    /// Typed view over the frame produced by `group_means`.
    pub fn species_means(group_df: &DataFrame) -> Result<Vec<SpeciesMeans>, StatsError> {
        let labels = group_df.column(SPECIES_COLUMN)?.str()?;
        let feature_cols: Vec<&Float64Chunked> = FEATURE_COLUMNS
            .iter()
            .map(|c| group_df.column(c).and_then(|col| col.f64()))
            .collect::<PolarsResult<_>>()?;

        let mut out = Vec::with_capacity(group_df.height());
        for (i, label) in labels.into_iter().enumerate() {
            let Some(label) = label else { continue };
            let species: Species = label
                .parse()
                .map_err(|_| StatsError::UnknownSpecies(label.to_string()))?;

            let mut means = [f64::NAN; 4];
            for (slot, ca) in means.iter_mut().zip(&feature_cols) {
                *slot = ca.get(i).unwrap_or(f64::NAN);
            }
            out.push(SpeciesMeans { species, means });
        }

        out.sort_by_key(|m| m.species);
        Ok(out)
    }

    /// Equal-width histogram over min..max; the last bin includes the maximum.
    pub fn histogram(values: &[f64], bins: usize) -> Histogram {
        let bins = bins.max(1);
        if values.is_empty() {
            return Histogram {
                edges: (0..=bins).map(|i| i as f64 / bins as f64).collect(),
                counts: vec![0; bins],
            };
        }

        let (mut lo, mut hi) = (Statistics::min(values), Statistics::max(values));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    /// Gaussian kernel density estimate with Scott's bandwidth, sampled at `points`
    /// evenly spaced positions over the data range.
    pub fn kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
        let n = values.len();
        if n < 2 || points < 2 {
            return Vec::new();
        }

        let std = Statistics::std_dev(values);
        let bandwidth = std * (n as f64).powf(-0.2);
        if !(bandwidth > 0.0) {
            return Vec::new();
        }
        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };

        let lo = Statistics::min(values);
        let hi = Statistics::max(values);
        let step = (hi - lo) / (points - 1) as f64;

        (0..points)
            .map(|i| {
                let x = lo + i as f64 * step;
                let density = values
                    .iter()
                    .map(|&xi| kernel.pdf((x - xi) / bandwidth))
                    .sum::<f64>()
                    / (n as f64 * bandwidth);
                (x, density)
            })
            .collect()
    }

    /// Adjusted Fisher-Pearson sample skewness (same estimator as pandas `skew`).
    pub fn skewness(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 3 {
            return f64::NAN;
        }

        let nf = n as f64;
        let mean = Statistics::mean(values);
        let m2 = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / nf;
        let m3 = values.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / nf;
        if m2 == 0.0 {
            return 0.0;
        }

        let g1 = m3 / m2.powf(1.5);
        g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0)
    }

    /// Pearson correlation between two equally long samples.
    pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < 2 {
            return f64::NAN;
        }
        Statistics::covariance(x, y) / (Statistics::std_dev(x) * Statistics::std_dev(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PETAL_LENGTH, SEPAL_LENGTH, SEPAL_WIDTH};

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn percentile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn empty_input_gives_nan_summary() {
        let s = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
    }

    #[test]
    fn describe_has_standard_rows_for_each_feature() {
        let df = DataLoader::load_iris().unwrap();
        let summary = StatsCalculator::describe(&df).unwrap();

        assert_eq!(summary.height(), SUMMARY_ROWS.len());
        assert_eq!(summary.width(), 1 + FEATURE_COLUMNS.len());

        let labels: Vec<&str> = summary
            .column("statistic")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(labels, SUMMARY_ROWS.to_vec());

        let sepal = summary.column(SEPAL_LENGTH).unwrap().f64().unwrap();
        assert_eq!(sepal.get(0), Some(150.0));
        assert!(close(sepal.get(1).unwrap(), 5.843333, 1e-6));
        assert!(close(sepal.get(2).unwrap(), 0.828066, 1e-6));
        assert_eq!(sepal.get(3), Some(4.3));
        assert!(close(sepal.get(4).unwrap(), 5.1, 1e-9));
        assert!(close(sepal.get(5).unwrap(), 5.8, 1e-9));
        assert!(close(sepal.get(6).unwrap(), 6.4, 1e-9));
        assert_eq!(sepal.get(7), Some(7.9));

        let petal = summary.column(PETAL_LENGTH).unwrap().f64().unwrap();
        assert!(close(petal.get(5).unwrap(), 4.35, 1e-9));
    }

    #[test]
    fn group_means_increase_from_setosa_to_virginica() {
        let df = DataLoader::load_iris().unwrap();
        let grouped = StatsCalculator::group_means(&df).unwrap();
        assert_eq!(grouped.height(), 3);

        let means = StatsCalculator::species_means(&grouped).unwrap();
        let species: Vec<Species> = means.iter().map(|m| m.species).collect();
        assert_eq!(species, Species::ALL.to_vec());

        let petal: Vec<f64> = means
            .iter()
            .map(|m| m.mean_of(PETAL_LENGTH).unwrap())
            .collect();
        assert!(petal[0] < petal[1] && petal[1] < petal[2]);
        assert!(close(petal[0], 1.462, 1e-9));
        assert!(close(petal[1], 4.26, 1e-9));
        assert!(close(petal[2], 5.552, 1e-9));
    }

    #[test]
    fn histogram_counts_every_value() {
        let df = DataLoader::load_iris().unwrap();
        let widths = DataLoader::feature_values(&df, SEPAL_WIDTH).unwrap();
        let hist = StatsCalculator::histogram(&widths, 20);

        assert_eq!(hist.counts.len(), 20);
        assert_eq!(hist.edges.len(), 21);
        assert_eq!(hist.counts.iter().sum::<usize>(), 150);
        assert_eq!(hist.edges[0], 2.0);
        assert!(close(hist.edges[20], 4.4, 1e-9));
        assert!(close(hist.bin_width(), 0.12, 1e-9));
    }

    #[test]
    fn histogram_of_constant_values() {
        let hist = StatsCalculator::histogram(&[3.0, 3.0, 3.0], 4);
        assert_eq!(hist.counts.iter().sum::<usize>(), 3);
        assert_eq!(hist.max_count(), 3);
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let df = DataLoader::load_iris().unwrap();
        let widths = DataLoader::feature_values(&df, SEPAL_WIDTH).unwrap();
        let curve = StatsCalculator::kde(&widths, 400);
        assert_eq!(curve.len(), 400);

        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, d)| d * step).sum();
        // Truncated at the data range, so slightly below one.
        assert!(area > 0.85 && area < 1.0, "area = {area}");
        assert!(curve.iter().all(|(_, d)| *d >= 0.0));
    }

    #[test]
    fn sepal_width_is_slightly_right_skewed() {
        let df = DataLoader::load_iris().unwrap();
        let widths = DataLoader::feature_values(&df, SEPAL_WIDTH).unwrap();
        assert!(close(StatsCalculator::skewness(&widths), 0.318966, 1e-5));
    }

    #[test]
    fn sepal_and_petal_length_correlate() {
        let df = DataLoader::load_iris().unwrap();
        let sepal = DataLoader::feature_values(&df, SEPAL_LENGTH).unwrap();
        let petal = DataLoader::feature_values(&df, PETAL_LENGTH).unwrap();
        let r = StatsCalculator::correlation(&sepal, &petal);
        assert!(close(r, 0.871754, 1e-5), "r = {r}");
    }
}
