//! Linear system solvers

use unodos_core::{Number, Tolerance};

use crate::decompose::LuDecomposition;
use crate::types::Matrix;
use crate::LinearError;

/// Solve the square system Ax = b
pub fn solve_square(a: Matrix, b: &[Number]) -> Result<Vec<Number>, LinearError> {
    if !a.is_square() {
        return Err(LinearError::DimensionMismatch(format!(
            "solve requires a square coefficient matrix, got {}x{}",
            a.rows(),
            a.cols()
        )));
    }
    LuDecomposition::new(a).solve(b)
}

/// Exact least squares: solve (AᴴA)x = Aᴴb with the given vectors as the
/// columns of A, and accept x only when it reproduces `target`
pub fn solve_least_squares(
    vectors: &[&[Number]],
    target: &[Number],
    tolerance: Tolerance,
) -> Result<Vec<Number>, LinearError> {
    let a = Matrix::from_columns(vectors)?;
    let rhs = a.adjoint_mul_vec(target)?;
    let x = solve_square(a.gram(), &rhs)?;
    check_residual(&a, &x, target, tolerance)?;
    Ok(x)
}

/// Least squares against a single vector: a = ⟨v, b⟩ / ⟨v, v⟩
pub fn solve_single(
    vector: &[Number],
    target: &[Number],
    tolerance: Tolerance,
) -> Result<Number, LinearError> {
    if vector.len() != target.len() {
        return Err(LinearError::DimensionMismatch(format!(
            "vector has {} entries, target has {}",
            vector.len(),
            target.len()
        )));
    }
    let (vv, vb) = vector.iter().zip(target).fold(
        (Number::zero(), Number::zero()),
        |(vv, vb), (v, b)| (vv.add(&v.conj().mul(v)), vb.add(&v.conj().mul(b))),
    );
    let a = vb
        .checked_div(&vv)
        .map_err(|_| LinearError::Singular { row: 0 })?;

    let worst = vector
        .iter()
        .zip(target)
        .map(|(v, b)| v.mul(&a).sub(b))
        .filter(|diff| !tolerance.is_zero(diff))
        .map(|diff| diff.magnitude())
        .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |m| m.max(r))));
    match worst {
        Some(residual) => Err(LinearError::Residual { residual }),
        None => Ok(a),
    }
}

fn check_residual(
    a: &Matrix,
    x: &[Number],
    target: &[Number],
    tolerance: Tolerance,
) -> Result<(), LinearError> {
    let fitted = a.mul_vec(x)?;
    let worst = fitted
        .iter()
        .zip(target)
        .map(|(f, t)| f.sub(t))
        .filter(|diff| !tolerance.is_zero(diff))
        .map(|diff| diff.magnitude())
        .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |m| m.max(r))));
    match worst {
        Some(residual) => Err(LinearError::Residual { residual }),
        None => Ok(()),
    }
}
