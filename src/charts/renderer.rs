//! Static Chart Renderer
//! Writes the four iris charts as PNG files with plotters.
//!
//! Layout of every image: caption on top, axis descriptions, light mesh,
//! legend in the upper corner when the chart has named series.

use crate::charts::{ChartKind, ChartSet, HIST_RGB, SPECIES_RGB, VIRIDIS_RGB};
use crate::config::AnalysisConfig;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 26);
const LINE_BLUE: RGBColor = RGBColor(31, 119, 180);

type DrawResult = Result<(), Box<dyn StdError>>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create output directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to draw '{chart}': {message}")]
    Drawing { chart: &'static str, message: String },
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart into `dir`, returning the written paths in chart order.
    pub fn render_all(
        charts: &ChartSet,
        dir: &Path,
        config: &AnalysisConfig,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(ChartKind::ALL.len());
        for kind in ChartKind::ALL {
            let path = dir.join(kind.file_name());
            let size = match kind {
                ChartKind::Line => config.line_chart_size,
                _ => config.chart_size,
            };

            Self::render(charts, kind, &path, size).map_err(|e| RenderError::Drawing {
                chart: kind.title(),
                message: e.to_string(),
            })?;
            log::info!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn render(charts: &ChartSet, kind: ChartKind, path: &Path, size: (u32, u32)) -> DrawResult {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        match kind {
            ChartKind::Line => Self::draw_line(&root, charts)?,
            ChartKind::Bar => Self::draw_bar(&root, charts)?,
            ChartKind::Histogram => Self::draw_histogram(&root, charts)?,
            ChartKind::Scatter => Self::draw_scatter(&root, charts)?,
        }

        root.present()?;
        Ok(())
    }

    fn draw_line(root: &DrawingArea<BitMapBackend<'_>, Shift>, charts: &ChartSet) -> DrawResult {
        let kind = ChartKind::Line;
        let (x_desc, y_desc) = kind.axis_labels();
        let x_max = charts.line.last().map_or(1.0, |p| p.0 + 1.0);
        let (y_min, y_max) = ChartSet::padded_range(charts.line.iter().map(|p| p.1), 0.05);

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .light_line_style(RGBColor(235, 235, 235))
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                charts.line.iter().copied(),
                LINE_BLUE.stroke_width(2),
            ))?
            .label("Petal Length")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE_BLUE.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }

    fn draw_bar(root: &DrawingArea<BitMapBackend<'_>, Shift>, charts: &ChartSet) -> DrawResult {
        let kind = ChartKind::Bar;
        let (x_desc, y_desc) = kind.axis_labels();
        let bars = &charts.bars;
        let n = bars.len().max(1) as u32;
        let y_max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0) * 1.15;

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n).into_segmented(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => bars
                    .get(*i as usize)
                    .map(|(species, _)| species.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, (_, mean))| {
            let i = i as u32;
            let color = rgb(VIRIDIS_RGB[i as usize % VIRIDIS_RGB.len()]);
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *mean)],
                color.filled(),
            );
            bar.set_margin(0, 0, 25, 25);
            bar
        }))?;

        Ok(())
    }

    fn draw_histogram(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        charts: &ChartSet,
    ) -> DrawResult {
        let kind = ChartKind::Histogram;
        let (x_desc, y_desc) = kind.axis_labels();
        let hist = &charts.histogram.histogram;
        let color = rgb(HIST_RGB);

        let x_min = hist.edges.first().copied().unwrap_or(0.0);
        let x_max = hist.edges.last().copied().unwrap_or(1.0);
        let kde_peak = charts.histogram.kde.iter().map(|p| p.1).fold(0.0, f64::max);
        let y_max = (hist.max_count() as f64).max(kde_peak).max(1.0) * 1.1;

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;

        let bins = hist.edges.windows(2).zip(&hist.counts);
        chart.draw_series(bins.clone().map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], color.mix(0.6).filled())
        }))?;
        chart.draw_series(bins.map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], WHITE.stroke_width(1))
        }))?;

        chart.draw_series(LineSeries::new(
            charts.histogram.kde.iter().copied(),
            RGBColor(70, 130, 180).stroke_width(2),
        ))?;

        Ok(())
    }

    fn draw_scatter(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        charts: &ChartSet,
    ) -> DrawResult {
        let kind = ChartKind::Scatter;
        let (x_desc, y_desc) = kind.axis_labels();
        let all_points = || charts.scatter.iter().flat_map(|(_, pts)| pts.iter());
        let (x_min, x_max) = ChartSet::padded_range(all_points().map(|p| p.0), 0.05);
        let (y_min, y_max) = ChartSet::padded_range(all_points().map(|p| p.1), 0.05);

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .light_line_style(RGBColor(235, 235, 235))
            .draw()?;

        for (species, points) in &charts.scatter {
            let color = rgb(SPECIES_RGB[species.index()]);
            chart
                .draw_series(
                    points
                        .iter()
                        .map(move |&(x, y)| Circle::new((x, y), 4, color.filled())),
                )?
                .label(species.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }
}
