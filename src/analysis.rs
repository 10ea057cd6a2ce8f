//! Per-day aggregation across inflammation datasets.

use crate::data::model::Table;
use crate::data::source::DataSource;
use crate::error::{AnalysisError, Result};

/// Column-wise arithmetic mean of a table: one value per day.
///
/// A table without patients or without days has no defined mean and fails
/// with [`AnalysisError::EmptyTable`].
pub fn daily_mean(table: &Table) -> Result<Vec<f64>> {
    if table.is_empty() || table.n_days() == 0 {
        return Err(AnalysisError::EmptyTable {
            patients: table.n_patients(),
            days: table.n_days(),
        });
    }

    let mut sums = vec![0.0; table.n_days()];
    for row in table.rows() {
        for (sum, value) in sums.iter_mut().zip(row) {
            *sum += value;
        }
    }

    let n = table.n_patients() as f64;
    Ok(sums.into_iter().map(|s| s / n).collect())
}

/// Population standard deviation, per day, of the daily means of each table.
///
/// Tables are consumed one at a time and dropped once their mean is taken,
/// so only the `datasets x days` matrix of means is held in memory. The first
/// error from the input aborts the computation.
pub fn compute_standard_deviation_by_day<I>(tables: I) -> Result<Vec<f64>>
where
    I: IntoIterator<Item = Result<Table>>,
{
    let mut means: Vec<Vec<f64>> = Vec::new();
    for (dataset, table) in tables.into_iter().enumerate() {
        let mean = daily_mean(&table?)?;
        if let Some(first) = means.first() {
            if first.len() != mean.len() {
                return Err(AnalysisError::ShapeMismatch {
                    dataset,
                    expected: first.len(),
                    found: mean.len(),
                });
            }
        }
        means.push(mean);
    }

    let Some(first) = means.first() else {
        return Err(AnalysisError::EmptyInput);
    };
    let n_days = first.len();
    let n = means.len() as f64;

    let std_devs = (0..n_days)
        .map(|day| {
            let centre = means.iter().map(|m| m[day]).sum::<f64>() / n;
            let variance = means
                .iter()
                .map(|m| (m[day] - centre).powi(2))
                .sum::<f64>()
                / n;
            variance.sqrt()
        })
        .collect();
    Ok(std_devs)
}

/// Load every dataset from `source` and compute the per-day standard
/// deviation of their daily means.
pub fn analyse<S: DataSource + ?Sized>(source: &S) -> Result<Vec<f64>> {
    let tables = source.load()?;
    let datasets = tables.len();
    let result = compute_standard_deviation_by_day(tables)?;
    log::info!(
        "Analysed {datasets} dataset(s) over {} day(s)",
        result.len()
    );
    Ok(result)
}
