//! Iris Chart Viewer
//! One native window hosting the four charts as separate closable windows.

use crate::charts::{ChartKind, ChartPlotter, ChartSet};
use eframe::egui;

/// Viewer application; exits once every chart window has been closed.
pub struct ChartViewerApp {
    charts: ChartSet,
    open: [bool; 4],
}

impl ChartViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, charts: ChartSet) -> Self {
        Self {
            charts,
            open: [true; 4],
        }
    }

    fn default_rect(index: usize) -> ([f32; 2], [f32; 2]) {
        let col = (index % 2) as f32;
        let row = (index / 2) as f32;
        ([10.0 + col * 690.0, 40.0 + row * 440.0], [660.0, 380.0])
    }
}

impl eframe::App for ChartViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("viewer_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Iris Analysis");
                ui.separator();
                for (kind, open) in ChartKind::ALL.iter().zip(self.open.iter_mut()) {
                    ui.toggle_value(open, kind.title());
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |_ui| {});

        for (i, kind) in ChartKind::ALL.iter().enumerate() {
            let (pos, size) = Self::default_rect(i);
            let charts = &self.charts;
            egui::Window::new(kind.title())
                .open(&mut self.open[i])
                .default_pos(pos)
                .default_size(size)
                .resizable(true)
                .show(ctx, |ui| {
                    ChartPlotter::draw(ui, charts, *kind);
                });
        }

        if self.open.iter().all(|open| !open) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

/// Show the charts and block until the viewer is dismissed.
pub fn run_viewer(charts: ChartSet) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Iris Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Iris Analysis",
        options,
        Box::new(|cc| Ok(Box::new(ChartViewerApp::new(cc, charts)))),
    )
}
