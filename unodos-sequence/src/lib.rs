//! Unodos Sequence - rule inference for numeric sequences
//!
//! Given a prefix a[0..N], finds the cheapest exact rule of the form
//! a[n] = Σ cᵢ·bᵢ(n) + Σ dₖ·a[n-k], where the bᵢ come from a basis library
//! and the cost is the number of nonzero coefficients plus the recurrence
//! order. The resulting model continues the sequence lazily.

mod basis;
mod config;
mod generators;
mod select;
mod solver;

pub use basis::{Basis, BasisLibrary, Candidate, PlainBasis};
pub use config::SolverConfig;
pub use generators::Generator;
pub use select::SubsetSelector;
pub use solver::{Model, Rule, Term};
