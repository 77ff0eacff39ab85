//! Analysis settings, optionally overridden by `iris_analysis.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Looked up in the working directory.
pub const CONFIG_FILE: &str = "iris_analysis.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid setting: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Rows shown in the head preview.
    pub head_rows: usize,
    pub histogram_bins: usize,
    /// Samples along the KDE curve.
    pub kde_points: usize,
    /// Directory for PNG export; `None` skips the export.
    pub output_dir: Option<PathBuf>,
    pub show_viewer: bool,
    pub line_chart_size: (u32, u32),
    pub chart_size: (u32, u32),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            head_rows: 5,
            histogram_bins: 20,
            kde_points: 200,
            output_dir: Some(PathBuf::from("charts")),
            show_viewer: true,
            line_chart_size: (1000, 500),
            chart_size: (800, 600),
        }
    }
}

impl AnalysisConfig {
    /// Read `iris_analysis.json` from the working directory, or fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.head_rows == 0 {
            return Err(ConfigError::Invalid("head_rows must be at least 1"));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be at least 1"));
        }
        let (lw, lh) = self.line_chart_size;
        let (w, h) = self.chart_size;
        if lw == 0 || lh == 0 || w == 0 || h == 0 {
            return Err(ConfigError::Invalid("chart sizes must be non-zero"));
        }
        Ok(())
    }

    /// Settings for runs without a display or file output.
    #[cfg(test)]
    pub fn headless() -> Self {
        Self {
            output_dir: None,
            show_viewer: false,
            ..Self::default()
        }
    }
}
