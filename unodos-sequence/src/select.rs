//! Subset selection: which candidate columns reproduce the target exactly
//!
//! The general case walks every subset of `target.len()` columns that keeps
//! the system square and non-degenerate. Instead of refactoring each subset
//! from scratch, one LU factorisation of the full candidate matrix is taken
//! up front and the search eliminates one column at a time, rolling the
//! working rows back from an undo log when it backtracks.

use std::cmp::Ordering;

use tracing::trace;
use unodos_core::{Number, Tolerance};
use unodos_matrix::{solve_least_squares, solve_single, LinearError, LuDecomposition, Matrix};

/// Searches for coefficient vectors over subsets of candidate columns
///
/// Every fit found is handed to the caller as `(coefficients, positions)`,
/// where `positions[i]` is the candidate column that `coefficients[i]`
/// multiplies. The caller decides which fit is cheapest.
#[derive(Debug, Clone)]
pub struct SubsetSelector<'a> {
    vectors: &'a [&'a [Number]],
    target: &'a [Number],
    tolerance: Tolerance,
    max_items: usize,
    first_required: bool,
}

impl<'a> SubsetSelector<'a> {
    pub fn new(vectors: &'a [&'a [Number]], target: &'a [Number], tolerance: Tolerance) -> Self {
        Self {
            vectors,
            target,
            tolerance,
            max_items: usize::MAX,
            first_required: false,
        }
    }

    /// Largest useful number of nonzero coefficients
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Force column 0 into every subset
    pub fn first_required(mut self, first_required: bool) -> Self {
        self.first_required = first_required;
        self
    }

    /// Run the search, reporting each fit to `on_fit`
    ///
    /// Systems without an exact solution are skipped silently; only malformed
    /// input (ragged vectors) is an error.
    pub fn run<F>(&self, mut on_fit: F) -> Result<(), LinearError>
    where
        F: FnMut(&[Number], &[usize]),
    {
        let (rows, cols) = (self.target.len(), self.vectors.len());
        if cols == 0 {
            return Ok(());
        }

        if self.first_required && self.max_items == 1 {
            trace!(rows, "single column projection");
            if let Some(a) = feasible(solve_single(self.vectors[0], self.target, self.tolerance))? {
                on_fit(&[a], &[0]);
            }
        } else if cols < rows {
            trace!(rows, cols, "overdetermined, least squares over all columns");
            if let Some(x) = feasible(solve_least_squares(self.vectors, self.target, self.tolerance))? {
                let positions: Vec<usize> = (0..cols).collect();
                on_fit(&x, &positions);
            }
        } else if self.first_required && self.max_items == 2 {
            trace!(rows, cols, "pairing column 0 with each other column");
            for i in 1..cols {
                let pair = [self.vectors[0], self.vectors[i]];
                if let Some(x) = feasible(solve_least_squares(&pair, self.target, self.tolerance))? {
                    on_fit(&x, &[0, i]);
                }
            }
        } else {
            self.search(&mut on_fit)?;
        }
        Ok(())
    }

    fn search<F>(&self, on_fit: &mut F) -> Result<(), LinearError>
    where
        F: FnMut(&[Number], &[usize]),
    {
        let lu = LuDecomposition::new(Matrix::from_columns(self.vectors)?);
        let rhs = lu.forward(self.target)?;
        let mut search = Backtrack {
            u: lu.upper(),
            b: rhs,
            cols: self.vectors.len(),
            rows: self.target.len(),
            selected: Vec::with_capacity(self.target.len()),
            leaves: 0,
            on_fit,
        };
        if self.first_required {
            search.selected.push(0);
            search.visit(1);
        } else {
            search.visit(0);
        }
        trace!(leaves = search.leaves, "subset search finished");
        Ok(())
    }
}

/// Map infeasible systems to `None`, keep real errors
fn feasible<T>(result: Result<T, LinearError>) -> Result<Option<T>, LinearError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_infeasible() => {
            trace!(error = %e, "system rejected");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ============ Backtracking Search ============

/// Saved state of one row touched by an elimination step
struct SavedRow {
    row: usize,
    from: usize,
    values: Vec<Number>,
    rhs: Number,
}

struct Backtrack<'f, F> {
    u: Matrix,
    b: Vec<Number>,
    cols: usize,
    rows: usize,
    selected: Vec<usize>,
    leaves: usize,
    on_fit: &'f mut F,
}

impl<'f, F> Backtrack<'f, F>
where
    F: FnMut(&[Number], &[usize]),
{
    /// Explore subsets extending `selected` with columns from `index` on
    ///
    /// `u` and `b` are restored to their entry state before returning.
    /// Whenever fewer than `rows` columns are selected, at least
    /// `rows - selected.len()` columns remain from `index` onwards.
    fn visit(&mut self, index: usize) {
        if self.selected.len() == self.rows {
            self.leaf();
            return;
        }

        let j = self.selected.len();
        let last = index.min(self.rows - 1);
        let mut pivot_row = j;
        for k in (j + 1)..=last {
            if self.u.data[(k, index)].cmp_magnitude(&self.u.data[(pivot_row, index)])
                == Ordering::Greater
            {
                pivot_row = k;
            }
        }

        // Take column `index`
        self.swap(j, pivot_row);
        let undo = self.eliminate(j, index, last);
        self.selected.push(index);
        self.visit(index + 1);
        self.selected.pop();
        self.restore(undo);
        self.swap(j, pivot_row);

        // Skip column `index`
        if self.cols - index > self.rows - self.selected.len() {
            self.visit(index + 1);
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a != b {
            self.u.data.swap_rows(a, b);
            self.b.swap(a, b);
        }
    }

    /// Clear column `index` below row `j`, logging every row it changes
    fn eliminate(&mut self, j: usize, index: usize, last: usize) -> Vec<SavedRow> {
        let pivot = self.u.data[(j, index)].clone();
        let mut undo = Vec::new();
        if pivot.is_zero() {
            return undo;
        }
        for k in (j + 1)..=last {
            let factor = match self.u.data[(k, index)].checked_div(&pivot) {
                Ok(f) if !f.is_zero() => f,
                _ => continue,
            };
            let from = index + 1;
            undo.push(SavedRow {
                row: k,
                from,
                values: (from..self.cols).map(|l| self.u.data[(k, l)].clone()).collect(),
                rhs: self.b[k].clone(),
            });
            for l in from..self.cols {
                let updated = self.u.data[(k, l)].sub(&factor.mul(&self.u.data[(j, l)]));
                self.u.data[(k, l)] = updated;
            }
            self.b[k] = self.b[k].sub(&factor.mul(&self.b[j]));
        }
        undo
    }

    fn restore(&mut self, undo: Vec<SavedRow>) {
        for saved in undo.into_iter().rev() {
            for (offset, value) in saved.values.into_iter().enumerate() {
                self.u.data[(saved.row, saved.from + offset)] = value;
            }
            self.b[saved.row] = saved.rhs;
        }
    }

    /// Back-substitute the square system formed by the selected columns
    fn leaf(&mut self) {
        self.leaves += 1;
        let mut x = self.b.clone();
        for i in (0..self.rows).rev() {
            if x[i].is_zero() {
                continue;
            }
            let col = self.selected[i];
            x[i] = match x[i].checked_div(&self.u.data[(i, col)]) {
                Ok(v) => v,
                Err(_) => {
                    trace!(selected = ?self.selected, "needed pivot is zero");
                    return;
                }
            };
            for k in 0..i {
                let updated = x[k].sub(&x[i].mul(&self.u.data[(k, col)]));
                x[k] = updated;
            }
        }
        (self.on_fit)(&x, &self.selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[i64]) -> Vec<Number> {
        values.iter().map(|&v| Number::from_i64(v)).collect()
    }

    fn collect_fits(selector: &SubsetSelector) -> Vec<(Vec<Number>, Vec<usize>)> {
        let mut fits = Vec::new();
        selector
            .run(|x, positions| fits.push((x.to_vec(), positions.to_vec())))
            .unwrap();
        fits
    }

    /// Check that every reported fit really reproduces the target
    fn assert_exact(vectors: &[&[Number]], target: &[Number], fit: &(Vec<Number>, Vec<usize>)) {
        for (row, expected) in target.iter().enumerate() {
            let value = fit
                .0
                .iter()
                .zip(&fit.1)
                .fold(Number::zero(), |acc, (c, &p)| acc.add(&c.mul(&vectors[p][row])));
            assert_eq!(&value, expected, "row {} of fit {:?}", row, fit);
        }
    }

    #[test]
    fn test_single_projection() {
        let v = nums(&[1, 2, 3]);
        let target = nums(&[3, 6, 9]);
        let vectors = [v.as_slice()];
        let selector = SubsetSelector::new(&vectors, &target, Tolerance::default())
            .first_required(true)
            .max_items(1);
        assert_eq!(collect_fits(&selector), vec![(nums(&[3]), vec![0])]);
    }

    #[test]
    fn test_overdetermined_least_squares() {
        let ones = nums(&[1, 1, 1, 1]);
        let n = nums(&[0, 1, 2, 3]);
        let target = nums(&[1, 3, 5, 7]);
        let vectors = [ones.as_slice(), n.as_slice()];
        let selector = SubsetSelector::new(&vectors, &target, Tolerance::default());
        assert_eq!(collect_fits(&selector), vec![(nums(&[1, 2]), vec![0, 1])]);

        let bad = nums(&[1, 3, 5, 8]);
        let selector = SubsetSelector::new(&vectors, &bad, Tolerance::default());
        assert!(collect_fits(&selector).is_empty());
    }

    #[test]
    fn test_pairs_with_first_column() {
        // target = 2*v0 + 1 over 3 rows; v0 paired with 1, n, n**2
        let v0 = nums(&[1, 3, 5]);
        let ones = nums(&[1, 1, 1]);
        let n = nums(&[1, 2, 3]);
        let sq = nums(&[1, 4, 9]);
        let target = nums(&[3, 7, 11]);
        let vectors = [v0.as_slice(), ones.as_slice(), n.as_slice(), sq.as_slice()];
        let selector = SubsetSelector::new(&vectors, &target, Tolerance::default())
            .first_required(true)
            .max_items(2);
        let fits = collect_fits(&selector);
        assert!(fits.contains(&(nums(&[2, 1]), vec![0, 1])));
        for fit in &fits {
            assert_eq!(fit.1[0], 0);
            assert_exact(&vectors, &target, fit);
        }
    }

    #[test]
    fn test_search_enumerates_square_subsets() {
        // Two rows, three columns: subsets {0,1}, {0,2}, {1,2}
        let c0 = nums(&[1, 0]);
        let c1 = nums(&[0, 1]);
        let c2 = nums(&[1, 1]);
        let target = nums(&[2, 3]);
        let vectors = [c0.as_slice(), c1.as_slice(), c2.as_slice()];
        let selector = SubsetSelector::new(&vectors, &target, Tolerance::default());
        let fits = collect_fits(&selector);
        let positions: Vec<Vec<usize>> = fits.iter().map(|f| f.1.clone()).collect();
        assert_eq!(positions, vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
        for fit in &fits {
            assert_exact(&vectors, &target, fit);
        }
        assert_eq!(fits[0].0, nums(&[2, 3]));
        assert_eq!(fits[1].0, nums(&[-1, 3]));
        assert_eq!(fits[2].0, nums(&[1, 2]));
    }

    #[test]
    fn test_search_finds_sparse_solution() {
        // target = 5 * column 2; subsets holding it report exact zeros elsewhere
        let c0 = nums(&[1, 2, 3]);
        let c1 = nums(&[1, 1, 1]);
        let c2 = nums(&[1, 4, 9]);
        let c3 = nums(&[1, 8, 27]);
        let target = nums(&[5, 20, 45]);
        let vectors = [c0.as_slice(), c1.as_slice(), c2.as_slice(), c3.as_slice()];
        let selector = SubsetSelector::new(&vectors, &target, Tolerance::default());
        let fits = collect_fits(&selector);
        assert_eq!(fits.len(), 4);
        for fit in &fits {
            assert_exact(&vectors, &target, fit);
        }
        assert_eq!(fits[0], (nums(&[0, 0, 5]), vec![0, 1, 2]));
        assert_eq!(fits[3], (nums(&[0, 5, 0]), vec![1, 2, 3]));
    }

    #[test]
    fn test_search_first_required() {
        let c0 = nums(&[1, 0]);
        let c1 = nums(&[0, 1]);
        let c2 = nums(&[1, 1]);
        let target = nums(&[2, 3]);
        let vectors = [c0.as_slice(), c1.as_slice(), c2.as_slice()];
        let selector = SubsetSelector::new(&vectors, &target, Tolerance::default())
            .first_required(true);
        let positions: Vec<Vec<usize>> = collect_fits(&selector).into_iter().map(|f| f.1).collect();
        assert_eq!(positions, vec![vec![0, 1], vec![0, 2]]);
    }

    #[test]
    fn test_search_skips_singular_subsets() {
        // Columns 0 and 1 are parallel; only subsets using column 2 can fit
        let c0 = nums(&[1, 2]);
        let c1 = nums(&[2, 4]);
        let c2 = nums(&[0, 1]);
        let target = nums(&[1, 3]);
        let vectors = [c0.as_slice(), c1.as_slice(), c2.as_slice()];
        let selector = SubsetSelector::new(&vectors, &target, Tolerance::default());
        let fits = collect_fits(&selector);
        let positions: Vec<Vec<usize>> = fits.iter().map(|f| f.1.clone()).collect();
        assert_eq!(positions, vec![vec![0, 2], vec![1, 2]]);
        for fit in &fits {
            assert_exact(&vectors, &target, fit);
        }
    }

    #[test]
    fn test_ragged_vectors_error() {
        let c0 = nums(&[1, 2]);
        let c1 = nums(&[1]);
        let target = nums(&[1, 2]);
        let vectors = [c0.as_slice(), c1.as_slice()];
        let selector = SubsetSelector::new(&vectors, &target, Tolerance::default());
        assert!(matches!(
            selector.run(|_, _| {}),
            Err(LinearError::DimensionMismatch(_))
        ));
    }
}
