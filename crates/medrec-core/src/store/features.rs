//! Dense feature matrix, one row per catalog record.

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::{StoreError, StoreResult};

/// Fixed-width numeric feature vectors, one per catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Build from rows. All rows must have the same width and contain only
    /// finite values.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> StoreResult<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        for (row, data) in rows.iter().enumerate() {
            if data.len() != width {
                return Err(StoreError::RaggedFeatures {
                    row,
                    expected: width,
                    found: data.len(),
                });
            }
        }

        let values = Array2::from_shape_fn((rows.len(), width), |(i, j)| rows[i][j]);
        Self::from_array(values)
    }

    /// Wrap an existing array, rejecting NaN and infinities.
    pub fn from_array(values: Array2<f64>) -> StoreResult<Self> {
        if let Some(((row, col), _)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(StoreError::NonFinite { row, col });
        }
        Ok(Self { values })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    /// Row `i`, or `None` when out of range.
    pub fn row(&self, i: usize) -> Option<ArrayView1<'_, f64>> {
        (i < self.rows()).then(|| self.values.row(i))
    }

    /// The whole matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{aview1, Array2};

    #[test]
    fn test_from_rows() {
        let m = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.width(), 2);
        assert_eq!(m.row(1), Some(aview1(&[3.0, 4.0])));
        assert_eq!(m.view().sum(), 10.0);
    }

    #[test]
    fn test_ragged_rejected() {
        let result = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            result,
            Err(StoreError::RaggedFeatures {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = FeatureMatrix::from_rows(vec![vec![1.0, f64::NAN]]);
        assert!(matches!(result, Err(StoreError::NonFinite { row: 0, col: 1 })));

        let mut values = Array2::zeros((2, 2));
        values[[1, 0]] = f64::INFINITY;
        assert!(matches!(
            FeatureMatrix::from_array(values),
            Err(StoreError::NonFinite { row: 1, col: 0 })
        ));
    }

    #[test]
    fn test_empty() {
        let m = FeatureMatrix::from_rows(vec![]).unwrap();
        assert_eq!(m.rows(), 0);
        assert_eq!(m.row(0), None);
    }
}
