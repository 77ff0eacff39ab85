//! Data module - dataset loading and cleaning

mod loader;
mod processor;
mod species;

pub use loader::{
    DataLoader, LoaderError, FEATURE_COLUMNS, PETAL_LENGTH, SEPAL_LENGTH, SEPAL_WIDTH,
    SPECIES_COLUMN,
};
pub use processor::DataProcessor;
pub use species::Species;
