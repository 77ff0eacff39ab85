//! GUI module - interactive chart viewer

mod app;

pub use app::run_viewer;
