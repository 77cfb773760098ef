//! Lazy continuation of an inferred rule

use std::iter::FusedIterator;

use unodos_core::Number;

use crate::basis::Basis;
use crate::solver::Model;

/// Unbounded iterator over a[0], a[1], ... of a model
///
/// The first `level` values are the model's seeds. After that each value is
/// computed from the rule, with the last `level` values kept in a circular
/// buffer so memory stays constant however far the sequence is taken.
#[derive(Debug, Clone)]
pub struct Generator<'a> {
    model: &'a Model,
    index: usize,
    buffer: Vec<Number>,
}

impl<'a> Generator<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            index: 0,
            buffer: vec![Number::zero(); model.differential_level()],
        }
    }

    /// Index of the next value to be produced
    pub fn index(&self) -> usize {
        self.index
    }

    fn compute(&self, n: usize) -> Number {
        let level = self.buffer.len();
        self.model.terms().iter().fold(Number::zero(), |acc, term| {
            let value = match &term.basis {
                Basis::Lagged(lag) => self.buffer[(n - lag) % level].clone(),
                Basis::Plain(plain) => plain.eval(n),
            };
            acc.add(&term.coefficient.mul(&value))
        })
    }
}

impl Iterator for Generator<'_> {
    type Item = Number;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.index;
        let level = self.buffer.len();
        let value = match self.model.initial().get(n) {
            Some(seed) if n < level => seed.clone(),
            _ => self.compute(n),
        };
        if level > 0 {
            self.buffer[n % level] = value.clone();
        }
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// The sequence never ends.
impl FusedIterator for Generator<'_> {}
