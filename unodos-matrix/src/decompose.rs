//! LU decomposition with partial pivoting

use std::cmp::Ordering;

use unodos_core::Number;

use crate::types::Matrix;
use crate::LinearError;

/// PA = LU for an m×n matrix (square or rectangular)
///
/// L (unit lower, multipliers stored below the diagonal) and U (upper
/// trapezoid) share one buffer. The row permutation is recorded once:
/// `pivots[i]` is the original row that ended up at row `i`.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Matrix,
    pivots: Vec<usize>,
}

impl LuDecomposition {
    pub fn new(a: Matrix) -> Self {
        let (rows, cols) = (a.rows(), a.cols());
        let mut lu = a;
        let mut pivots: Vec<usize> = (0..rows).collect();

        for j in 0..rows.min(cols) {
            // First row with the largest magnitude wins
            let mut p = j;
            for i in (j + 1)..rows {
                if lu.data[(i, j)].cmp_magnitude(&lu.data[(p, j)]) == Ordering::Greater {
                    p = i;
                }
            }
            if p != j {
                lu.data.swap_rows(p, j);
                pivots.swap(p, j);
            }

            let pivot = lu.data[(j, j)].clone();
            if pivot.is_zero() {
                // Column already eliminated; its multipliers stay zero
                continue;
            }
            for i in (j + 1)..rows {
                let factor = match lu.data[(i, j)].checked_div(&pivot) {
                    Ok(f) => f,
                    Err(_) => continue,
                };
                for k in (j + 1)..cols {
                    let updated = lu.data[(i, k)].sub(&factor.mul(&lu.data[(j, k)]));
                    lu.data[(i, k)] = updated;
                }
                lu.data[(i, j)] = factor;
            }
        }

        Self { lu, pivots }
    }

    pub fn rows(&self) -> usize {
        self.lu.rows()
    }

    pub fn cols(&self) -> usize {
        self.lu.cols()
    }

    /// Upper factor U with explicit zeros below the diagonal
    pub fn upper(&self) -> Matrix {
        let mut u = self.lu.clone();
        for i in 0..self.rows() {
            for j in 0..i.min(self.cols()) {
                u.data[(i, j)] = Number::zero();
            }
        }
        u
    }

    /// Apply the recorded row permutation to `b`
    pub fn permute(&self, b: &[Number]) -> Result<Vec<Number>, LinearError> {
        if b.len() != self.rows() {
            return Err(LinearError::DimensionMismatch(format!(
                "right-hand side has {} entries, system has {} rows",
                b.len(),
                self.rows()
            )));
        }
        Ok(self.pivots.iter().map(|&p| b[p].clone()).collect())
    }

    /// Permute `b`, then forward-substitute through L (L⁻¹Pb)
    pub fn forward(&self, b: &[Number]) -> Result<Vec<Number>, LinearError> {
        let mut y = self.permute(b)?;
        let rows = self.rows();
        for k in 0..rows.min(self.cols()) {
            for i in (k + 1)..rows {
                let updated = y[i].sub(&y[k].mul(&self.lu.data[(i, k)]));
                y[i] = updated;
            }
        }
        Ok(y)
    }

    /// Solve Ax = b for a square A
    ///
    /// A zero right-hand component leaves its unknown at zero without
    /// touching the pivot, so only pivots that are actually needed can make
    /// the system singular.
    pub fn solve(&self, b: &[Number]) -> Result<Vec<Number>, LinearError> {
        if !self.lu.is_square() {
            return Err(LinearError::DimensionMismatch(format!(
                "solve requires a square matrix, got {}x{}",
                self.rows(),
                self.cols()
            )));
        }
        let mut x = self.forward(b)?;
        for k in (0..self.rows()).rev() {
            if x[k].is_zero() {
                continue;
            }
            let pivot = &self.lu.data[(k, k)];
            x[k] = x[k]
                .checked_div(pivot)
                .map_err(|_| LinearError::Singular { row: k })?;
            for i in 0..k {
                let updated = x[i].sub(&x[k].mul(&self.lu.data[(i, k)]));
                x[i] = updated;
            }
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[i64]) -> Vec<Number> {
        values.iter().map(|&v| Number::from_i64(v)).collect()
    }

    fn matrix(rows: &[&[i64]]) -> Matrix {
        let rows: Vec<Vec<Number>> = rows.iter().map(|r| nums(r)).collect();
        Matrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_partial_pivoting_records_permutation() {
        let lu = LuDecomposition::new(matrix(&[&[1, 2], &[3, 4]]));
        assert_eq!(lu.pivots, vec![1, 0]);
        let u = lu.upper();
        assert_eq!(u.get(0, 0), Some(&Number::from_i64(3)));
        assert_eq!(u.get(1, 0), Some(&Number::zero()));
        assert_eq!(u.get(1, 1), Some(&Number::from_ratio(2, 3).unwrap()));
    }

    #[test]
    fn test_solve_exact_rationals() {
        // 2x + y = 5, x + 3y = 5 → x = 2, y = 1
        let lu = LuDecomposition::new(matrix(&[&[2, 1], &[1, 3]]));
        assert_eq!(lu.solve(&nums(&[5, 5])).unwrap(), nums(&[2, 1]));

        // x + 2y = 1, 3x + 4y = 0 → x = -2, y = 3/2
        let lu = LuDecomposition::new(matrix(&[&[1, 2], &[3, 4]]));
        let x = lu.solve(&nums(&[1, 0])).unwrap();
        assert_eq!(x[0], Number::from_i64(-2));
        assert_eq!(x[1], Number::from_ratio(3, 2).unwrap());
    }

    #[test]
    fn test_singular_needed_pivot() {
        let lu = LuDecomposition::new(matrix(&[&[1, 2], &[2, 4]]));
        assert_eq!(lu.solve(&nums(&[1, 1])), Err(LinearError::Singular { row: 1 }));
    }

    #[test]
    fn test_singular_unneeded_pivot_is_skipped() {
        // Consistent right-hand side: the zero pivot is never used
        let lu = LuDecomposition::new(matrix(&[&[1, 2], &[2, 4]]));
        assert_eq!(lu.solve(&nums(&[1, 2])).unwrap(), nums(&[1, 0]));
    }

    #[test]
    fn test_rectangular_forward() {
        let lu = LuDecomposition::new(matrix(&[&[1, 1, 1], &[2, 0, 4]]));
        assert_eq!(lu.rows(), 2);
        assert_eq!(lu.cols(), 3);
        // Pb = [4, 2]; y1 = 2 - (1/2)*4 = 0
        let y = lu.forward(&nums(&[2, 4])).unwrap();
        assert_eq!(y, nums(&[4, 0]));
        let u = lu.upper();
        assert_eq!(u.get(1, 1), Some(&Number::one()));
        assert_eq!(u.get(1, 2), Some(&Number::from_i64(-1)));
    }

    #[test]
    fn test_non_square_solve_rejected() {
        let lu = LuDecomposition::new(matrix(&[&[1, 1, 1], &[2, 0, 4]]));
        assert!(matches!(
            lu.solve(&nums(&[1, 1])),
            Err(LinearError::DimensionMismatch(_))
        ));
    }
}
