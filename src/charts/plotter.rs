//! Chart Plotter Module
//! Draws the iris charts interactively using egui_plot.

use crate::charts::{ChartKind, ChartSet, HIST_RGB, SPECIES_RGB, VIRIDIS_RGB};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

fn color32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Draws each chart kind into an egui `Ui`.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn draw(ui: &mut egui::Ui, charts: &ChartSet, kind: ChartKind) {
        match kind {
            ChartKind::Line => Self::draw_line_chart(ui, charts),
            ChartKind::Bar => Self::draw_bar_chart(ui, charts),
            ChartKind::Histogram => Self::draw_histogram_chart(ui, charts),
            ChartKind::Scatter => Self::draw_scatter_chart(ui, charts),
        }
    }

    fn base_plot(kind: ChartKind) -> Plot<'static> {
        let (x_label, y_label) = kind.axis_labels();
        Plot::new(format!("plot_{:?}", kind))
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .allow_scroll(false)
    }

    pub fn draw_line_chart(ui: &mut egui::Ui, charts: &ChartSet) {
        Self::base_plot(ChartKind::Line)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let points: PlotPoints = charts.line.iter().map(|&(x, y)| [x, y]).collect();
                plot_ui.line(
                    Line::new(points)
                        .color(color32(SPECIES_RGB[0]))
                        .width(1.5)
                        .name("Petal Length"),
                );
            });
    }

    /// X-axis: species, Y-axis: mean petal length
    pub fn draw_bar_chart(ui: &mut egui::Ui, charts: &ChartSet) {
        let x_labels: Vec<String> = charts.bars.iter().map(|(s, _)| s.to_string()).collect();

        Self::base_plot(ChartKind::Bar)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v < 0.0 || (v - v.round()).abs() > 1e-6 {
                    return String::new();
                }
                x_labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = charts
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(i, (species, mean))| {
                        Bar::new(i as f64, *mean)
                            .width(0.6)
                            .fill(color32(VIRIDIS_RGB[i % VIRIDIS_RGB.len()]))
                            .name(species.as_str())
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name("Mean petal length"));
            });
    }

    pub fn draw_histogram_chart(ui: &mut egui::Ui, charts: &ChartSet) {
        let hist = &charts.histogram.histogram;
        let width = hist.bin_width();
        let fill = color32(HIST_RGB);

        Self::base_plot(ChartKind::Histogram)
            .include_y(0.0)
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = hist
                    .edges
                    .windows(2)
                    .zip(&hist.counts)
                    .map(|(edge, &count)| {
                        Bar::new((edge[0] + edge[1]) / 2.0, count as f64)
                            .width(width)
                            .fill(fill.gamma_multiply(0.6))
                            .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name("Frequency"));

                let curve: PlotPoints = charts
                    .histogram
                    .kde
                    .iter()
                    .map(|&(x, y)| [x, y])
                    .collect();
                plot_ui.line(
                    Line::new(curve)
                        .color(Color32::from_rgb(70, 130, 180))
                        .width(2.0)
                        .name("KDE"),
                );
            });
    }

    pub fn draw_scatter_chart(ui: &mut egui::Ui, charts: &ChartSet) {
        Self::base_plot(ChartKind::Scatter)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (species, points) in &charts.scatter {
                    let points: PlotPoints = points.iter().map(|&(x, y)| [x, y]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(3.0)
                            .color(color32(SPECIES_RGB[species.index()]))
                            .name(species.as_str()),
                    );
                }
            });
    }
}
