//! Error types for the inflammation analysis.
//!
//! Every failure surfaces unchanged to the caller: nothing here is retried
//! and there is no partial-result fallback.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for loading and aggregating inflammation datasets.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Directory scan matched no files.
    #[error("No inflammation data matching '{pattern}' found in {}", dir.display())]
    NoDataFound { dir: PathBuf, pattern: String },

    /// The discovery pattern could not be compiled.
    #[error("Invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A matched directory entry could not be read.
    #[error("Failed to read directory entry: {0}")]
    Discovery(#[from] glob::GlobError),

    /// A format parser rejected a file.
    #[error("Failed to parse {}: {source:#}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Rows of a table have different lengths.
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Mean of a table without any patients or without any days.
    #[error("Table has no observations ({patients} patients x {days} days)")]
    EmptyTable { patients: usize, days: usize },

    /// Datasets disagree on the number of days.
    #[error("Dataset {dataset} has {found} days, expected {expected}")]
    ShapeMismatch {
        dataset: usize,
        expected: usize,
        found: usize,
    },

    /// Aggregation was handed no datasets at all.
    #[error("No datasets to aggregate")]
    EmptyInput,
}

/// Result type alias for inflammation analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Short title for the error, used as the CLI prefix.
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisError::NoDataFound { .. } => "No Data Found",
            AnalysisError::Pattern(_) | AnalysisError::Discovery(_) => "Discovery Error",
            AnalysisError::Parse { .. } => "Parse Error",
            AnalysisError::RaggedRows { .. } => "Ragged Table",
            AnalysisError::EmptyTable { .. } => "Empty Table",
            AnalysisError::ShapeMismatch { .. } => "Shape Mismatch",
            AnalysisError::EmptyInput => "Empty Input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::NoDataFound {
            dir: PathBuf::from("data"),
            pattern: "inflammation*.csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No inflammation data matching 'inflammation*.csv' found in data"
        );
        assert_eq!(err.title(), "No Data Found");

        let err = AnalysisError::ShapeMismatch {
            dataset: 2,
            expected: 40,
            found: 39,
        };
        assert_eq!(err.to_string(), "Dataset 2 has 39 days, expected 40");
    }

    #[test]
    fn test_parse_error_keeps_source_chain() {
        let inner = anyhow::anyhow!("not a number").context("CSV row 3");
        let err = AnalysisError::Parse {
            path: PathBuf::from("inflammation-01.csv"),
            source: inner,
        };
        let msg = err.to_string();
        assert!(msg.contains("inflammation-01.csv"));
        assert!(msg.contains("CSV row 3"));
        assert!(msg.contains("not a number"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
