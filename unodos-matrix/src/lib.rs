//! Unodos Matrix - exact linear algebra
//!
//! Provides the linear solvers behind rule inference:
//! - LU decomposition with partial pivoting (square or rectangular)
//! - Square solves that only fail on pivots they actually need
//! - Least squares via normal equations, accepted only for exact fits
//!
//! Entries are `Number`s, so exact samples are solved exactly and float
//! samples fall back to `f64` with a tolerance.

mod types;
mod error;
mod decompose;
mod solve;

pub use types::Matrix;
pub use error::LinearError;
pub use decompose::LuDecomposition;
pub use solve::{solve_square, solve_least_squares, solve_single};
