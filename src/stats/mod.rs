//! Stats module - descriptive statistics and group means

mod calculator;

pub use calculator::{Histogram, SpeciesMeans, StatsCalculator, StatsError};
