//! Unodos Core - Fundamental types
//!
//! This crate provides the core types used throughout Unodos:
//! - `Number`: exact (complex) rationals or floats
//! - `Tolerance`: float-only zero tests
//! - `UnodosError`: structured errors with machine-readable codes

mod number;
mod tolerance;
mod error;

pub use number::{Number, NumberError};
pub use tolerance::Tolerance;
pub use error::{UnodosError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, Tolerance, UnodosError};
    pub use crate::error::codes;
}
