//! Zero tests shared by the solver and the selector
//!
//! Exact values are compared exactly; the tolerance only applies to floats.

use serde::{Deserialize, Serialize};

use crate::Number;

/// Absolute tolerance for float zero tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tolerance(f64);

impl Tolerance {
    pub const DEFAULT: f64 = 1e-12;

    pub fn new(eps: f64) -> Self {
        Self(eps)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Zero test for a residual or pivot-like quantity
    pub fn is_zero(&self, value: &Number) -> bool {
        if value.is_exact() {
            value.is_zero()
        } else {
            value.magnitude() < self.0
        }
    }

    /// Zero test for a coefficient whose basis vector peaks at `scale`
    ///
    /// A float coefficient is negligible when its largest contribution to the
    /// fitted values stays under the tolerance.
    pub fn is_negligible(&self, coefficient: &Number, scale: &Number) -> bool {
        if coefficient.is_exact() {
            coefficient.is_zero()
        } else {
            coefficient.mul(scale).magnitude() < self.0
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_values_ignore_tolerance() {
        let tol = Tolerance::default();
        let tiny = Number::from_ratio(1, 1_000_000_000_000_000).unwrap();
        assert!(!tol.is_zero(&tiny));
        assert!(!tol.is_negligible(&tiny, &Number::one()));
        assert!(tol.is_zero(&Number::zero()));
    }

    #[test]
    fn test_float_values_use_tolerance() {
        let tol = Tolerance::default();
        assert!(tol.is_zero(&Number::from_f64(1e-14)));
        assert!(!tol.is_zero(&Number::from_f64(1e-9)));
    }

    #[test]
    fn test_negligible_scales_with_vector() {
        let tol = Tolerance::default();
        let coef = Number::from_f64(1e-15);
        assert!(tol.is_negligible(&coef, &Number::from_i64(10)));
        assert!(!tol.is_negligible(&coef, &Number::from_i64(100_000)));
    }
}
