//! Solver configuration

use serde::{Deserialize, Serialize};
use unodos_core::{Tolerance, UnodosError};

use crate::basis::BasisLibrary;

/// Knobs for rule inference
///
/// The defaults reproduce the standard search: absolute float tolerance
/// 1e-12, every recurrence order the sample allows, and the standard basis
/// library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub tolerance: Tolerance,
    /// Highest recurrence order to try (capped at sample length - 1)
    pub max_order: Option<usize>,
    pub library: BasisLibrary,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            max_order: None,
            library: BasisLibrary::standard(),
        }
    }
}

impl SolverConfig {
    pub fn with_tolerance(mut self, eps: f64) -> Self {
        self.tolerance = Tolerance::new(eps);
        self
    }

    pub fn with_max_order(mut self, max_order: usize) -> Self {
        self.max_order = Some(max_order);
        self
    }

    pub fn with_library(mut self, library: BasisLibrary) -> Self {
        self.library = library;
        self
    }

    /// Highest order worth trying for a sample of `len` values
    pub fn order_limit(&self, len: usize) -> usize {
        let cap = len.saturating_sub(1);
        self.max_order.map_or(cap, |m| m.min(cap))
    }

    pub fn validate(&self) -> Result<(), UnodosError> {
        let eps = self.tolerance.value();
        if !eps.is_finite() || eps < 0.0 {
            return Err(UnodosError::invalid_config(format!(
                "tolerance must be a finite non-negative number, got {}",
                eps
            )));
        }
        if self.library.is_empty() {
            return Err(UnodosError::invalid_config("basis library is empty")
                .with_suggestion("Use BasisLibrary::standard() or add at least one basis"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unodos_core::codes;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tolerance.value(), 1e-12);
        assert_eq!(config.order_limit(5), 4);
        assert_eq!(config.order_limit(0), 0);
    }

    #[test]
    fn test_max_order_caps() {
        let config = SolverConfig::default().with_max_order(2);
        assert_eq!(config.order_limit(10), 2);
        assert_eq!(config.order_limit(2), 1);
    }

    #[test]
    fn test_invalid_configs() {
        let err = SolverConfig::default().with_tolerance(-1.0).validate().unwrap_err();
        assert!(err.is(codes::INVALID_CONFIG));
        let err = SolverConfig::default()
            .with_tolerance(f64::NAN)
            .validate()
            .unwrap_err();
        assert!(err.is(codes::INVALID_CONFIG));
        let err = SolverConfig::default()
            .with_library(BasisLibrary::new(vec![]))
            .validate()
            .unwrap_err();
        assert!(err.is(codes::INVALID_CONFIG));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"max_order": 3}"#).unwrap();
        assert_eq!(config.max_order, Some(3));
        assert_eq!(config.library, BasisLibrary::standard());
        assert_eq!(config.tolerance, Tolerance::default());
    }
}
