use thiserror::Error;
use unodos_core::UnodosError;

/// Errors from the linear solvers
///
/// `Singular` and `Residual` describe an infeasible system, which callers
/// searching over many systems treat as "no solution here" rather than as a
/// failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinearError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("singular system: zero pivot needed at row {row}")]
    Singular { row: usize },

    #[error("no exact solution: residual {residual} exceeds tolerance")]
    Residual { residual: f64 },
}

impl LinearError {
    /// True when the system is well-formed but has no acceptable solution
    pub fn is_infeasible(&self) -> bool {
        matches!(self, LinearError::Singular { .. } | LinearError::Residual { .. })
    }
}

impl From<LinearError> for UnodosError {
    fn from(e: LinearError) -> Self {
        UnodosError::domain_error(e.to_string())
    }
}
