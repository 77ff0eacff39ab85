//! Iris Analysis - descriptive statistics & charts for Fisher's iris dataset
//!
//! Prints a text report, exports the charts as PNG files, and opens an
//! interactive viewer.

mod charts;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::{Context, Result};
use charts::StaticChartRenderer;
use config::AnalysisConfig;
use data::LoaderError;
use report::Analysis;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}

/// Dataset acquisition failures are reported apart from every other failure.
fn failure_message(err: &anyhow::Error) -> String {
    let dataset_failure = err
        .chain()
        .any(|cause| cause.downcast_ref::<LoaderError>().is_some());
    if dataset_failure {
        format!("Dataset load failed: {err:#}")
    } else {
        format!("An error occurred during data processing or plotting: {err:#}")
    }
}

fn run() -> Result<()> {
    let config = AnalysisConfig::load().context("loading configuration")?;
    log::debug!("Effective configuration: {config:?}");

    let report = {
        let mut out = io::stdout().lock();
        let report = Analysis::run(&config, &mut out)?;
        out.flush()?;
        report
    };
    log::info!(
        "Analysis complete: {} of {} rows kept",
        report.rows_clean,
        report.rows_loaded
    );
    log::debug!("{} observations reported", report.observations.len());

    if let Some(dir) = &config.output_dir {
        let written = StaticChartRenderer::render_all(&report.charts, dir, &config)
            .context("exporting charts")?;
        println!("\nSaved {} charts to {}", written.len(), dir.display());
    }

    if config.show_viewer {
        if let Err(e) = gui::run_viewer(report.charts) {
            log::warn!("Chart viewer unavailable: {e}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::stats::StatsError;

    #[test]
    fn loader_error_in_chain_reports_dataset_failure() {
        let err = Err::<(), _>(LoaderError::NoData)
            .context("loading the iris dataset")
            .unwrap_err();
        let message = failure_message(&err);
        assert!(message.starts_with("Dataset load failed: "), "{message}");
        assert!(message.contains("No data loaded"));
    }

    #[test]
    fn other_errors_report_processing_failure() {
        let err = Err::<(), _>(ConfigError::Invalid("histogram_bins must be at least 1"))
            .context("loading configuration")
            .unwrap_err();
        assert!(failure_message(&err)
            .starts_with("An error occurred during data processing or plotting: "));

        let err = anyhow::Error::new(StatsError::UnknownSpecies("iris".to_string()));
        let message = failure_message(&err);
        assert!(message.starts_with("An error occurred during data processing or plotting: "));
        assert!(message.contains("iris"));
    }
}
