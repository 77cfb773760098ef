//! Unodos - infer the rule behind a numeric sequence and continue it
//!
//! ```text
//! let seq = Unodos::from_literal("[1, 1, 2, 3, 5, 8, 13..]")?;
//! seq.to_string()  // "[1, 1, a[n]=a[n-2]+a[n-1]]"
//! seq.take(8)      // 1, 1, 2, 3, 5, 8, 13, 21
//! ```

mod parser;
mod render;

pub use parser::parse_sample;
pub use render::Renderer;
pub use unodos_core::{codes, Number, Tolerance, UnodosError};
pub use unodos_sequence::{
    Basis, BasisLibrary, Generator, Model, PlainBasis, Rule, SolverConfig, Term,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// An inferred sequence: the cheapest exact rule for a sample, plus its
/// lazy continuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unodos {
    model: Model,
}

impl Unodos {
    pub fn new(values: &[Number]) -> Result<Self, UnodosError> {
        Self::with_config(values, &SolverConfig::default())
    }

    pub fn with_config(values: &[Number], config: &SolverConfig) -> Result<Self, UnodosError> {
        Ok(Self {
            model: Model::solve_with(values, config)?,
        })
    }

    /// Infer from anything convertible to numbers, e.g. `[1i64, 2, 4]`
    pub fn from_values<T, I>(values: I) -> Result<Self, UnodosError>
    where
        T: Into<Number>,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<Number> = values.into_iter().map(Into::into).collect();
        Self::new(&values)
    }

    /// Infer from literal text such as `"[1, 2, 4, 8..]"`
    pub fn from_literal(text: &str) -> Result<Self, UnodosError> {
        Self::new(&parse_sample(text)?)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn cost(&self) -> usize {
        self.model.cost()
    }

    pub fn terms(&self) -> &[Term] {
        self.model.terms()
    }

    pub fn differential_level(&self) -> usize {
        self.model.differential_level()
    }

    pub fn is_recurrence(&self) -> bool {
        self.differential_level() > 0
    }

    pub fn initial(&self) -> &[Number] {
        self.model.initial()
    }

    /// Rule text, e.g. `a[n]=3*a[n-1]-5`
    pub fn rule(&self) -> String {
        Renderer::new().rule(self.model.rule())
    }

    /// Rule text with seed values for recurrences
    pub fn inspect(&self) -> String {
        Renderer::new().inspect(&self.model)
    }

    // ========== Lazy Operations ==========

    pub fn iter(&self) -> Generator<'_> {
        self.model.iter()
    }

    pub fn take(&self, count: usize) -> Vec<Number> {
        self.iter().take(count).collect()
    }

    /// a[0]
    pub fn first(&self) -> Number {
        self.nth_term(0)
    }

    /// a[index]
    pub fn nth_term(&self, index: usize) -> Number {
        self.iter().nth(index).unwrap_or_else(Number::zero)
    }

    pub fn map<T, F>(&self, f: F) -> std::iter::Map<Generator<'_>, F>
    where
        F: FnMut(Number) -> T,
    {
        self.iter().map(f)
    }

    /// Index of the first value satisfying `predicate`
    ///
    /// Does not return if no value ever matches; see `find_index_within`.
    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(Number) -> bool,
    {
        self.iter().position(predicate)
    }

    /// Like `find_index`, looking at the first `limit` values only
    pub fn find_index_within<P>(&self, limit: usize, predicate: P) -> Option<usize>
    where
        P: FnMut(Number) -> bool,
    {
        self.iter().take(limit).position(predicate)
    }

    /// Leading values while `predicate` holds
    ///
    /// Does not return if `predicate` holds forever.
    pub fn take_while<P>(&self, predicate: P) -> Vec<Number>
    where
        P: FnMut(&Number) -> bool,
    {
        self.iter().take_while(predicate).collect()
    }
}

impl fmt::Display for Unodos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

impl<'a> IntoIterator for &'a Unodos {
    type Item = Number;
    type IntoIter = Generator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
