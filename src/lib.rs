//! Standard deviation by day across directories of inflammation datasets.
//!
//! Pick a [`DataSource`] for the on-disk format, hand it to [`analyse`], and
//! get back one value per day.

pub mod analysis;
pub mod data;
pub mod error;

pub use analysis::{analyse, compute_standard_deviation_by_day, daily_mean};
pub use data::model::Table;
pub use data::source::{
    CsvDataSource, DataFormat, DataSource, JsonDataSource, ParquetDataSource, TableIter,
};
pub use error::{AnalysisError, Result};
