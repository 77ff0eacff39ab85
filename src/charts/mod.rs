//! Charts module - chart data preparation and rendering

mod plotter;
mod renderer;
mod series;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use series::{ChartKind, ChartSet};

/// Per-species colors, indexed by `Species::index`.
pub const SPECIES_RGB: [(u8, u8, u8); 3] = [
    (31, 119, 180), // Blue
    (255, 127, 14), // Orange
    (44, 160, 44),  // Green
];

/// Three evenly spaced viridis samples for the bar chart.
pub const VIRIDIS_RGB: [(u8, u8, u8); 3] = [(71, 44, 122), (39, 128, 142), (78, 195, 107)];

/// Sky blue used for the histogram bins.
pub const HIST_RGB: (u8, u8, u8) = (135, 206, 235);
