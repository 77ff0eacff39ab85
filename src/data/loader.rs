//! Iris Data Loader Module
//! Materializes the bundled iris CSV into a Polars DataFrame.

use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;

/// Bundled copy of Fisher's iris measurements (150 samples).
const IRIS_CSV: &[u8] = include_bytes!("iris.csv");

pub const SEPAL_LENGTH: &str = "sepal length (cm)";
pub const SEPAL_WIDTH: &str = "sepal width (cm)";
pub const PETAL_LENGTH: &str = "petal length (cm)";
pub const PETAL_WIDTH: &str = "petal width (cm)";
pub const SPECIES_COLUMN: &str = "species";

/// Numeric feature columns in dataset order.
pub const FEATURE_COLUMNS: [&str; 4] = [SEPAL_LENGTH, SEPAL_WIDTH, PETAL_LENGTH, PETAL_WIDTH];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read dataset: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset is missing column '{0}'")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

/// Loads the bundled iris dataset.
pub struct DataLoader;

impl DataLoader {
    /// Parse the embedded CSV and check its schema.
    pub fn load_iris() -> Result<DataFrame, LoaderError> {
        Self::load_csv_bytes(IRIS_CSV)
    }

    /// Parse iris-shaped CSV bytes: four numeric features plus `species`.
    pub fn load_csv_bytes(bytes: &'static [u8]) -> Result<DataFrame, LoaderError> {
        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }

        for name in FEATURE_COLUMNS {
            let column = df
                .column(name)
                .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
            if column.dtype() != &DataType::Float64 {
                let cast = column.cast(&DataType::Float64)?;
                df.with_column(cast)?;
            }
        }
        if df.column(SPECIES_COLUMN).is_err() {
            return Err(LoaderError::MissingColumn(SPECIES_COLUMN.to_string()));
        }

        // Fixed column order regardless of the CSV header order.
        let mut ordered: Vec<&str> = FEATURE_COLUMNS.to_vec();
        ordered.push(SPECIES_COLUMN);
        Ok(df.select(ordered)?)
    }

    /// Non-null, non-NaN values of a numeric column.
    pub fn feature_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, LoaderError> {
        let values = df
            .column(column)
            .map_err(|_| LoaderError::MissingColumn(column.to_string()))?
            .cast(&DataType::Float64)?;

        Ok(values
            .f64()?
            .into_iter()
            .filter_map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }
}
