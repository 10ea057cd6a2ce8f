use std::fmt;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Table – one parsed inflammation dataset
// ---------------------------------------------------------------------------

/// A rectangular numeric table: one row per patient, one column per day.
///
/// Stored row-major in a single buffer. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    values: Vec<f64>,
    n_patients: usize,
    n_days: usize,
}

impl Table {
    /// Build a table from per-patient rows.
    ///
    /// All rows must have the same length. An empty `rows` gives a table with
    /// zero patients and zero days.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_days = rows.first().map_or(0, Vec::len);
        let n_patients = rows.len();
        let mut values = Vec::with_capacity(n_patients * n_days);

        for (row, observations) in rows.into_iter().enumerate() {
            if observations.len() != n_days {
                return Err(AnalysisError::RaggedRows {
                    row,
                    expected: n_days,
                    found: observations.len(),
                });
            }
            values.extend(observations);
        }

        Ok(Table {
            values,
            n_patients,
            n_days,
        })
    }

    /// Number of patients (rows).
    pub fn n_patients(&self) -> usize {
        self.n_patients
    }

    /// Number of days (columns).
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Whether the table has no patients.
    pub fn is_empty(&self) -> bool {
        self.n_patients == 0
    }

    /// Observations of a single patient.
    ///
    /// # Panics
    /// If `patient >= self.n_patients()`.
    pub fn row(&self, patient: usize) -> &[f64] {
        let start = patient * self.n_days;
        &self.values[start..start + self.n_days]
    }

    /// Iterate patients in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_patients).map(move |p| self.row(p))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} patients x {} days", self.n_patients, self.n_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_shape() {
        let table = Table::from_rows(vec![vec![0.0, 1.0], vec![1.0, 2.0], vec![2.0, 3.0]]).unwrap();
        assert_eq!(table.n_patients(), 3);
        assert_eq!(table.n_days(), 2);
        assert_eq!(table.row(1), &[1.0, 2.0]);
        assert_eq!(table.rows().count(), 3);
        assert_eq!(table.to_string(), "3 patients x 2 days");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Table::from_rows(vec![vec![1.0, 3.0], vec![2.0]]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_no_rows() {
        let table = Table::from_rows(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.n_days(), 0);
        assert_eq!(table.rows().count(), 0);
    }
}
