//! Core matrix type over `Number`

use nalgebra::DMatrix;
use unodos_core::Number;

use crate::LinearError;

/// A dense matrix whose entries stay in the sample's own field
///
/// Exact entries keep every elimination step exact; float entries make the
/// whole computation float, exactly as `Number` arithmetic does.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub data: DMatrix<Number>,
}

impl Matrix {
    /// Create from row-major nested lists
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[Vec<Number>]) -> Result<Self, LinearError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if nrows == 0 || ncols == 0 {
            return Err(LinearError::DimensionMismatch("matrix: empty data".to_string()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(LinearError::DimensionMismatch(format!(
                "matrix: row {} has {} columns, expected {}",
                i,
                row.len(),
                ncols
            )));
        }
        Ok(Self {
            data: DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j].clone()),
        })
    }

    /// Create from column vectors of equal length
    pub fn from_columns(columns: &[&[Number]]) -> Result<Self, LinearError> {
        let ncols = columns.len();
        let nrows = columns.first().map_or(0, |c| c.len());
        if nrows == 0 || ncols == 0 {
            return Err(LinearError::DimensionMismatch("matrix: empty data".to_string()));
        }
        if let Some((j, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != nrows) {
            return Err(LinearError::DimensionMismatch(format!(
                "matrix: column {} has {} rows, expected {}",
                j,
                col.len(),
                nrows
            )));
        }
        Ok(Self {
            data: DMatrix::from_fn(nrows, ncols, |i, j| columns[j][i].clone()),
        })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Get element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<&Number> {
        if row < self.rows() && col < self.cols() {
            Some(&self.data[(row, col)])
        } else {
            None
        }
    }

    /// Gram matrix AᴴA (conjugate transpose; AᵗA for real entries)
    pub fn gram(&self) -> Matrix {
        let (m, k) = (self.rows(), self.cols());
        let data = DMatrix::from_fn(k, k, |p, q| {
            (0..m).fold(Number::zero(), |acc, i| {
                acc.add(&self.data[(i, p)].conj().mul(&self.data[(i, q)]))
            })
        });
        Matrix { data }
    }

    /// Aᴴb
    pub fn adjoint_mul_vec(&self, b: &[Number]) -> Result<Vec<Number>, LinearError> {
        if b.len() != self.rows() {
            return Err(LinearError::DimensionMismatch(format!(
                "adjoint product: vector has {} entries, matrix has {} rows",
                b.len(),
                self.rows()
            )));
        }
        Ok((0..self.cols())
            .map(|p| {
                b.iter().enumerate().fold(Number::zero(), |acc, (i, bi)| {
                    acc.add(&self.data[(i, p)].conj().mul(bi))
                })
            })
            .collect())
    }

    /// Ax
    pub fn mul_vec(&self, x: &[Number]) -> Result<Vec<Number>, LinearError> {
        if x.len() != self.cols() {
            return Err(LinearError::DimensionMismatch(format!(
                "matrix-vector product: vector has {} entries, matrix has {} columns",
                x.len(),
                self.cols()
            )));
        }
        Ok((0..self.rows())
            .map(|i| {
                x.iter().enumerate().fold(Number::zero(), |acc, (j, xj)| {
                    acc.add(&self.data[(i, j)].mul(xj))
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[i64]) -> Vec<Number> {
        values.iter().map(|&v| Number::from_i64(v)).collect()
    }

    #[test]
    fn test_from_columns_layout() {
        let c0 = nums(&[1, 2, 3]);
        let c1 = nums(&[4, 5, 6]);
        let m = Matrix::from_columns(&[c0.as_slice(), c1.as_slice()]).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.get(2, 1), Some(&Number::from_i64(6)));
        assert_eq!(m.get(1, 0), Some(&c0[1]));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![nums(&[1, 2]), nums(&[3])];
        assert!(matches!(
            Matrix::from_rows(&rows),
            Err(LinearError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_gram_and_products() {
        let m = Matrix::from_rows(&[nums(&[1, 2]), nums(&[3, 4]), nums(&[5, 6])]).unwrap();
        let g = m.gram();
        assert_eq!(g.get(0, 0), Some(&Number::from_i64(35)));
        assert_eq!(g.get(0, 1), Some(&Number::from_i64(44)));
        assert_eq!(g.get(1, 1), Some(&Number::from_i64(56)));
        assert_eq!(m.mul_vec(&nums(&[1, 1])).unwrap(), nums(&[3, 7, 11]));
        assert_eq!(m.adjoint_mul_vec(&nums(&[1, 0, 1])).unwrap(), nums(&[6, 8]));
    }

    #[test]
    fn test_gram_uses_conjugate() {
        let col = vec![Number::i(), Number::one()];
        let m = Matrix::from_columns(&[col.as_slice()]).unwrap();
        // |i|² + |1|² = 2
        assert_eq!(m.gram().get(0, 0), Some(&Number::from_i64(2)));
    }
}
