//! Data Processor Module
//! Handles missing-value diagnostics and cleaning.

use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Schema entry for a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
}

/// Printable schema overview of a DataFrame.
pub struct FrameInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RangeIndex: {} entries, 0 to {}", self.rows, self.rows.saturating_sub(1))?;
        writeln!(f, "Data columns (total {} columns):", self.columns.len())?;

        let name_width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        writeln!(f, " #   {:<name_width$}  Non-Null Count  Dtype", "Column")?;
        for (i, column) in self.columns.iter().enumerate() {
            writeln!(
                f,
                " {:<3} {:<name_width$}  {:>5} non-null  {}",
                i, column.name, column.non_null, column.dtype
            )?;
        }
        Ok(())
    }
}

/// Handles data cleaning operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Rows with a null (or NaN, for float columns) value in this column.
    fn missing_mask(column: &Column) -> Vec<bool> {
        let series = column.as_materialized_series();
        let mut missing: Vec<bool> = series
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(false))
            .collect();

        if let Ok(ca) = series.f64() {
            for (i, v) in ca.into_iter().enumerate() {
                if v.is_some_and(|x| x.is_nan()) {
                    missing[i] = true;
                }
            }
        }

        missing
    }

    /// Count missing values per column.
    pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| {
                let count = Self::missing_mask(col).iter().filter(|&&m| m).count();
                (col.name().to_string(), count)
            })
            .collect()
    }

    /// Schema overview: dtype and non-null count per column.
    pub fn frame_info(df: &DataFrame) -> FrameInfo {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                let missing = Self::missing_mask(col).iter().filter(|&&m| m).count();
                ColumnInfo {
                    name: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                    non_null: df.height() - missing,
                }
            })
            .collect();

        FrameInfo {
            rows: df.height(),
            columns,
        }
    }

    fn complete_rows(df: &DataFrame) -> Vec<bool> {
        let mut keep = vec![true; df.height()];

        for col in df.get_columns() {
            for (i, missing) in Self::missing_mask(col).into_iter().enumerate() {
                if missing {
                    keep[i] = false;
                }
            }
        }

        keep
    }

    /// Original row positions that survive `drop_missing`, in order.
    /// These are the row labels of the cleaned frame.
    pub fn retained_rows(df: &DataFrame) -> Vec<usize> {
        Self::complete_rows(df)
            .into_iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect()
    }

    /// Drop every row holding a missing value in any column.
    pub fn drop_missing(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let keep = Self::complete_rows(df);

        if keep.iter().all(|&k| k) {
            return Ok(df.clone());
        }

        let mask = BooleanChunked::new("keep".into(), keep);
        Ok(df.filter(&mask)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    fn frame_with_gaps() -> DataFrame {
        DataFrame::new(vec![
            Column::new("a".into(), [Some(1.0), None, Some(3.0), Some(f64::NAN)]),
            Column::new("b".into(), [Some("x"), Some("y"), None, Some("w")]),
            Column::new("c".into(), [1.0, 2.0, 3.0, 4.0]),
        ])
        .unwrap()
    }

    #[test]
    fn counts_nulls_and_nans() {
        let counts = DataProcessor::missing_counts(&frame_with_gaps());
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 1),
                ("c".to_string(), 0)
            ]
        );
    }

    #[test]
    fn drop_missing_keeps_complete_rows_and_columns() {
        let df = frame_with_gaps();
        let cleaned = DataProcessor::drop_missing(&df).unwrap();
        assert_eq!(cleaned.height(), 1);
        assert_eq!(cleaned.get_column_names(), df.get_column_names());
        let c = cleaned.column("c").unwrap().f64().unwrap().get(0);
        assert_eq!(c, Some(1.0));
    }

    #[test]
    fn retained_rows_are_original_positions() {
        let df = frame_with_gaps();
        assert_eq!(DataProcessor::retained_rows(&df), vec![0]);

        let iris = DataLoader::load_iris().unwrap();
        let rows = DataProcessor::retained_rows(&iris);
        assert_eq!(rows.len(), 150);
        assert_eq!(rows.last(), Some(&149));
    }

    #[test]
    fn bundled_dataset_has_no_missing_values() {
        let df = DataLoader::load_iris().unwrap();
        assert!(DataProcessor::missing_counts(&df).iter().all(|(_, n)| *n == 0));

        let cleaned = DataProcessor::drop_missing(&df).unwrap();
        assert_eq!(cleaned.height(), df.height());
        assert_eq!(cleaned.width(), df.width());
    }

    #[test]
    fn frame_info_lists_dtypes() {
        let df = DataLoader::load_iris().unwrap();
        let info = DataProcessor::frame_info(&df);
        assert_eq!(info.rows, 150);
        assert_eq!(info.columns.len(), 5);
        assert!(info.columns.iter().all(|c| c.non_null == 150));

        let text = info.to_string();
        assert!(text.contains("RangeIndex: 150 entries, 0 to 149"));
        assert!(text.contains("petal width (cm)"));
    }
}
