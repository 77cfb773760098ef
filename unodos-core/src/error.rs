//! Structured errors
//!
//! Every failure carries a machine-readable code, a human-readable message
//! and, where one exists, a suggestion for the caller.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const OVERFLOW: &str = "OVERFLOW";
    pub const EMPTY_SAMPLE: &str = "EMPTY_SAMPLE";
    pub const NO_FIT: &str = "NO_FIT";
    pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
    pub const INVALID_MODEL: &str = "INVALID_MODEL";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnodosError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl UnodosError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Use integers, ratios like 3/4, decimals or complex values like 1+2i")
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "Division by zero")
    }

    pub fn empty_sample() -> Self {
        Self::new(codes::EMPTY_SAMPLE, "Cannot infer a rule from an empty sample")
            .with_suggestion("Provide at least one value")
    }

    pub fn no_fit(len: usize, max_order: usize) -> Self {
        Self::new(
            codes::NO_FIT,
            format!(
                "No exact rule reproduces the {} given values (recurrence orders 0..={})",
                len, max_order
            ),
        )
        .with_suggestion("The sequence is not expressible in this basis library; try a larger library or more values")
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::new(codes::INVALID_CONFIG, format!("Invalid config: {}", reason.into()))
    }

    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::new(codes::INVALID_MODEL, format!("Invalid model: {}", reason.into()))
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }
}

impl std::fmt::Display for UnodosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for UnodosError {}

impl From<NumberError> for UnodosError {
    fn from(e: NumberError) -> Self {
        match e {
            NumberError::ParseError(s) => Self::parse_error(s),
            NumberError::DivisionByZero => Self::div_zero(),
            NumberError::Overflow(s) => Self::new(codes::OVERFLOW, format!("Overflow: {}", s)),
        }
    }
}
