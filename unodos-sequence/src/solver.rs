//! Rule inference: the cheapest exact rule over recurrence orders 0..len
//!
//! The cost of a rule is its number of nonzero terms plus its recurrence
//! order. Orders are tried in increasing order and a fit only replaces the
//! current best when it is strictly cheaper, so ties go to the lower order.

use serde::{Deserialize, Serialize};
use tracing::debug;
use unodos_core::{Number, UnodosError};

use crate::basis::{Basis, Candidate};
use crate::config::SolverConfig;
use crate::generators::Generator;
use crate::select::SubsetSelector;

// ============ Rules ============

/// One `coefficient * basis` summand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub basis: Basis,
    pub coefficient: Number,
}

impl Term {
    pub fn new(basis: Basis, coefficient: Number) -> Self {
        Self { basis, coefficient }
    }
}

/// a[n] = Σ coefficient × basis, with every coefficient nonzero
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rule {
    terms: Vec<Term>,
}

impl Rule {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Largest lag used, i.e. how many seed values the rule needs
    pub fn differential_level(&self) -> usize {
        self.terms.iter().map(|t| t.basis.lag()).max().unwrap_or(0)
    }

    pub fn cost(&self) -> usize {
        self.len() + self.differential_level()
    }
}

// ============ Model ============

/// An inferred rule together with the seed values it continues from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelData")]
pub struct Model {
    rule: Rule,
    cost: usize,
    initial: Vec<Number>,
}

/// Unchecked wire form of a `Model`
#[derive(Deserialize)]
struct ModelData {
    rule: Rule,
    cost: usize,
    initial: Vec<Number>,
}

impl TryFrom<ModelData> for Model {
    type Error = UnodosError;

    fn try_from(data: ModelData) -> Result<Self, Self::Error> {
        let ModelData { rule, cost, initial } = data;
        if let Some(term) = rule.terms().iter().find(|t| t.coefficient.is_zero()) {
            return Err(UnodosError::invalid_model(format!(
                "term {} has a zero coefficient",
                term.basis
            )));
        }
        if rule.terms().iter().any(|t| t.basis == Basis::Lagged(0)) {
            return Err(UnodosError::invalid_model("a[n-0] refers to the value being defined"));
        }
        let level = rule.differential_level();
        if initial.len() != level {
            return Err(UnodosError::invalid_model(format!(
                "rule of level {} needs {} seed values, got {}",
                level,
                level,
                initial.len()
            )));
        }
        if cost != rule.cost() {
            return Err(UnodosError::invalid_model(format!(
                "cost {} does not match the rule's cost {}",
                cost,
                rule.cost()
            )));
        }
        Ok(Self { rule, cost, initial })
    }
}

impl Model {
    /// Infer the cheapest rule with the default configuration
    pub fn solve(sample: &[Number]) -> Result<Self, UnodosError> {
        Self::solve_with(sample, &SolverConfig::default())
    }

    pub fn solve_with(sample: &[Number], config: &SolverConfig) -> Result<Self, UnodosError> {
        config.validate()?;
        if sample.is_empty() {
            return Err(UnodosError::empty_sample());
        }

        let len = sample.len();
        let max_order = config.order_limit(len);
        let mut min_cost = len + 1;
        let mut best: Option<Vec<Term>> = None;

        for order in 0..=max_order {
            if let Some((cost, terms)) = solve_order(sample, order, min_cost, config)? {
                debug!(order, cost, "cheaper rule found");
                min_cost = cost;
                best = Some(terms);
            }
        }

        let terms = best.ok_or_else(|| UnodosError::no_fit(len, max_order))?;
        let rule = Rule::new(
            terms
                .into_iter()
                .map(|t| Term::new(t.basis, t.coefficient.normalize()))
                .collect(),
        );
        let initial = sample[..rule.differential_level()].to_vec();
        debug!(cost = min_cost, terms = rule.len(), "rule inferred");

        Ok(Self {
            rule,
            cost: min_cost,
            initial,
        })
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn terms(&self) -> &[Term] {
        self.rule.terms()
    }

    /// Nonzero terms plus recurrence order; 0 only for an all-zero sample
    pub fn cost(&self) -> usize {
        self.cost
    }

    pub fn differential_level(&self) -> usize {
        self.rule.differential_level()
    }

    /// Seed values a[0] .. a[level-1]
    pub fn initial(&self) -> &[Number] {
        &self.initial
    }

    /// Lazy, unbounded continuation starting at a[0]
    pub fn iter(&self) -> Generator<'_> {
        Generator::new(self)
    }
}

impl<'a> IntoIterator for &'a Model {
    type Item = Number;
    type IntoIter = Generator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cheapest rule of exactly this order that beats `min_cost`, if any
fn solve_order(
    sample: &[Number],
    order: usize,
    min_cost: usize,
    config: &SolverConfig,
) -> Result<Option<(usize, Vec<Term>)>, UnodosError> {
    let max_items = match min_cost.checked_sub(order + 1) {
        Some(items) if items > 0 => items,
        _ => {
            debug!(order, min_cost, "order cannot beat current cost");
            return Ok(None);
        }
    };

    let candidates = config.library.candidates(sample, order);
    let vectors: Vec<&[Number]> = candidates.iter().map(|c| c.vector.as_slice()).collect();
    let target = &sample[order..];
    let first_required = order > 0;
    let tolerance = config.tolerance;

    let mut level_cost = min_cost;
    let mut level_best: Option<Vec<Term>> = None;

    SubsetSelector::new(&vectors, target, tolerance)
        .max_items(max_items)
        .first_required(first_required)
        .run(|coefficients, positions| {
            let terms: Vec<(&Candidate, Number)> = positions
                .iter()
                .zip(coefficients)
                .map(|(&pos, c)| {
                    let candidate = &candidates[pos];
                    let c = if tolerance.is_negligible(c, &candidate.peak) {
                        Number::zero()
                    } else {
                        c.clone()
                    };
                    (candidate, c)
                })
                .collect();

            // The highest lag must survive, otherwise this is a lower order fit
            if first_required {
                let pinned = positions.iter().position(|&p| p == 0);
                if pinned.map_or(true, |i| terms[i].1.is_zero()) {
                    return;
                }
            }

            let nonzero: Vec<Term> = terms
                .into_iter()
                .filter(|(_, c)| !c.is_zero())
                .map(|(candidate, c)| Term::new(candidate.basis.clone(), c))
                .collect();
            let cost = nonzero.len() + order;
            if cost < level_cost {
                level_cost = cost;
                level_best = Some(nonzero);
            }
        })?;

    Ok(level_best.map(|terms| (level_cost, terms)))
}
