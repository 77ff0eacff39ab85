//! Chart Series Module
//! Prepares the data behind the four iris charts, shared by the PNG renderer and the viewer.

use crate::config::AnalysisConfig;
use crate::data::{DataLoader, Species, PETAL_LENGTH, SEPAL_LENGTH, SEPAL_WIDTH, SPECIES_COLUMN};
use crate::stats::{Histogram, SpeciesMeans, StatsCalculator, StatsError};
use polars::prelude::*;

/// The four charts produced by an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Histogram,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::Scatter,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Line => "Petal Length Trend",
            ChartKind::Bar => "Average Petal Length by Species",
            ChartKind::Histogram => "Distribution of Sepal Width",
            ChartKind::Scatter => "Sepal Length vs. Petal Length",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Line => "line_petal_length.png",
            ChartKind::Bar => "bar_petal_length_by_species.png",
            ChartKind::Histogram => "hist_sepal_width.png",
            ChartKind::Scatter => "scatter_sepal_vs_petal_length.png",
        }
    }

    pub fn axis_labels(&self) -> (&'static str, &'static str) {
        match self {
            ChartKind::Line => ("Index", "Petal Length (cm)"),
            ChartKind::Bar => ("Species", "Petal Length (cm)"),
            ChartKind::Histogram => ("Sepal Width (cm)", "Frequency"),
            ChartKind::Scatter => ("Sepal Length (cm)", "Petal Length (cm)"),
        }
    }
}

/// Sepal width histogram with its density curve scaled to bin counts.
#[derive(Debug, Clone)]
pub struct HistogramSeries {
    pub histogram: Histogram,
    pub kde: Vec<(f64, f64)>,
}

/// Data for all four charts.
#[derive(Debug, Clone)]
pub struct ChartSet {
    /// (original row label, petal length); labels keep their gaps after cleaning.
    pub line: Vec<(f64, f64)>,
    /// Mean petal length per species.
    pub bars: Vec<(Species, f64)>,
    pub histogram: HistogramSeries,
    /// (sepal length, petal length) per species.
    pub scatter: Vec<(Species, Vec<(f64, f64)>)>,
}

impl ChartSet {
    /// `row_labels` holds the original row position of each row of `df`
    /// (see `DataProcessor::retained_rows`).
    pub fn build(
        df: &DataFrame,
        row_labels: &[usize],
        species_means: &[SpeciesMeans],
        config: &AnalysisConfig,
    ) -> Result<Self, StatsError> {
        if row_labels.len() != df.height() {
            return Err(StatsError::RowLabels {
                labels: row_labels.len(),
                rows: df.height(),
            });
        }

        let petal = df.column(PETAL_LENGTH)?.f64()?;
        let line = row_labels
            .iter()
            .zip(petal.into_iter())
            .filter_map(|(&row, v)| v.filter(|x| !x.is_nan()).map(|v| (row as f64, v)))
            .collect();

        let bars = species_means
            .iter()
            .filter_map(|m| m.mean_of(PETAL_LENGTH).map(|v| (m.species, v)))
            .collect();

        let widths = DataLoader::feature_values(df, SEPAL_WIDTH)?;
        let histogram = StatsCalculator::histogram(&widths, config.histogram_bins);
        // Density times sample size times bin width gives the expected count per bin.
        let scale = widths.len() as f64 * histogram.bin_width();
        let kde = StatsCalculator::kde(&widths, config.kde_points)
            .into_iter()
            .map(|(x, d)| (x, d * scale))
            .collect();

        Ok(Self {
            line,
            bars,
            histogram: HistogramSeries { histogram, kde },
            scatter: Self::scatter_by_species(df)?,
        })
    }

    fn scatter_by_species(df: &DataFrame) -> Result<Vec<(Species, Vec<(f64, f64)>)>, StatsError> {
        let sepal = df.column(SEPAL_LENGTH)?.f64()?;
        let petal = df.column(PETAL_LENGTH)?.f64()?;
        let labels = df.column(SPECIES_COLUMN)?.str()?;

        let mut groups: Vec<(Species, Vec<(f64, f64)>)> =
            Species::ALL.iter().map(|s| (*s, Vec::new())).collect();

        for ((x, y), label) in sepal.into_iter().zip(petal.into_iter()).zip(labels.into_iter()) {
            let (Some(x), Some(y), Some(label)) = (x, y, label) else {
                continue;
            };
            let species: Species = label
                .parse()
                .map_err(|_| StatsError::UnknownSpecies(label.to_string()))?;
            groups[species.index()].1.push((x, y));
        }

        groups.retain(|(_, points)| !points.is_empty());
        Ok(groups)
    }

    /// Bounding box of a point set, padded by a fraction of its span.
    pub fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            if v.is_nan() {
                (lo, hi)
            } else {
                (lo.min(v), hi.max(v))
            }
        });
        if min.is_infinite() {
            return (0.0, 1.0);
        }
        let span = (max - min).max(1e-9);
        (min - span * pad, max + span * pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataProcessor;

    fn charts_for(raw: &DataFrame) -> ChartSet {
        let rows = DataProcessor::retained_rows(raw);
        let df = DataProcessor::drop_missing(raw).unwrap();
        let grouped = StatsCalculator::group_means(&df).unwrap();
        let means = StatsCalculator::species_means(&grouped).unwrap();
        ChartSet::build(&df, &rows, &means, &AnalysisConfig::default()).unwrap()
    }

    fn iris_charts() -> ChartSet {
        charts_for(&DataLoader::load_iris().unwrap())
    }

    #[test]
    fn every_chart_has_data() {
        let charts = iris_charts();
        assert_eq!(charts.line.len(), 150);
        assert_eq!(charts.line[10], (10.0, 1.5));

        let bar_species: Vec<Species> = charts.bars.iter().map(|(s, _)| *s).collect();
        assert_eq!(bar_species, Species::ALL.to_vec());

        assert_eq!(charts.histogram.histogram.counts.len(), 20);
        assert_eq!(charts.histogram.kde.len(), 200);

        assert_eq!(charts.scatter.len(), 3);
        assert!(charts.scatter.iter().all(|(_, pts)| pts.len() == 50));
    }

    #[test]
    fn line_keeps_original_row_labels_after_cleaning() {
        let mut raw = DataLoader::load_iris().unwrap();
        let petal: Float64Chunked = raw
            .column(PETAL_LENGTH)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(i, v)| if i == 0 { None } else { v })
            .collect();
        raw.with_column(petal.with_name(PETAL_LENGTH.into()).into_series())
            .unwrap();

        let charts = charts_for(&raw);
        assert_eq!(charts.line.len(), 149);
        assert_eq!(charts.line[0], (1.0, 1.4));
        assert_eq!(charts.line[148], (149.0, 5.1));
    }

    #[test]
    fn mismatched_row_labels_are_rejected() {
        let df = DataLoader::load_iris().unwrap();
        let grouped = StatsCalculator::group_means(&df).unwrap();
        let means = StatsCalculator::species_means(&grouped).unwrap();
        let err = ChartSet::build(&df, &[0, 1, 2], &means, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, StatsError::RowLabels { labels: 3, rows: 150 }));
    }

    #[test]
    fn kde_curve_is_on_the_count_scale() {
        let charts = iris_charts();
        let peak = charts
            .histogram
            .kde
            .iter()
            .map(|(_, y)| *y)
            .fold(0.0, f64::max);
        let max_count = charts.histogram.histogram.max_count() as f64;
        assert!(peak > max_count * 0.3 && peak < max_count * 1.5, "peak = {peak}");
    }

    #[test]
    fn padded_range_handles_empty_and_nan() {
        assert_eq!(ChartSet::padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
        let (lo, hi) = ChartSet::padded_range([1.0, f64::NAN, 3.0].into_iter(), 0.5);
        assert_eq!((lo, hi), (0.0, 4.0));
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<&str> = ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        names.dedup();
        assert_eq!(names.len(), 4);
    }
}
