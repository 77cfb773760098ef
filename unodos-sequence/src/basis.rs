//! Basis functions and the candidate vectors built from them

use std::fmt;

use serde::{Deserialize, Serialize};
use unodos_core::Number;

// ============ Plain Bases ============

/// A basis that depends only on the index n
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlainBasis {
    /// 1
    Constant,
    /// n**exponent
    Power { exponent: u32 },
    /// base**n
    Exponential { base: Number },
}

impl PlainBasis {
    pub fn power(exponent: u32) -> Self {
        PlainBasis::Power { exponent }
    }

    pub fn exponential(base: Number) -> Self {
        PlainBasis::Exponential { base }
    }

    /// Value at index n (0-based)
    pub fn eval(&self, n: usize) -> Number {
        match self {
            PlainBasis::Constant => Number::one(),
            PlainBasis::Power { exponent } => index(n).pow(u64::from(*exponent)),
            PlainBasis::Exponential { base } => base.pow(n as u64),
        }
    }

    pub fn name(&self) -> String {
        match self {
            PlainBasis::Constant => "1".to_string(),
            PlainBasis::Power { exponent: 1 } => "n".to_string(),
            PlainBasis::Power { exponent } => format!("n**{}", exponent),
            PlainBasis::Exponential { base } if base.is_integer() && !is_negative(base) => {
                format!("{}**n", base)
            }
            PlainBasis::Exponential { base } => format!("({})**n", base),
        }
    }
}

fn index(n: usize) -> Number {
    Number::from_i64(n as i64)
}

fn is_negative(value: &Number) -> bool {
    value.to_f64().map_or(false, |v| v < 0.0)
}

// ============ Bases ============

/// Either an index function or the value `lag` positions back, a[n-lag]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    Plain(PlainBasis),
    Lagged(usize),
}

impl Basis {
    pub fn name(&self) -> String {
        match self {
            Basis::Plain(plain) => plain.name(),
            Basis::Lagged(lag) => format!("a[n-{}]", lag),
        }
    }

    /// Recurrence order this basis needs (0 for plain bases)
    pub fn lag(&self) -> usize {
        match self {
            Basis::Plain(_) => 0,
            Basis::Lagged(lag) => *lag,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Basis::Plain(PlainBasis::Constant))
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============ Library ============

/// Ordered list of plain bases the solver may combine
///
/// Order matters: among equally cheap fits the selector reports the one
/// whose columns come first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasisLibrary {
    bases: Vec<PlainBasis>,
}

impl BasisLibrary {
    pub fn new(bases: Vec<PlainBasis>) -> Self {
        Self { bases }
    }

    /// 1, n, n**2 .. n**5, 2**n
    pub fn standard() -> Self {
        let mut bases = vec![PlainBasis::Constant];
        bases.extend((1..=5).map(PlainBasis::power));
        bases.push(PlainBasis::exponential(Number::from_i64(2)));
        Self { bases }
    }

    /// Standard bases plus 3**n, 4**n, (1/2)**n, (1/3)**n, (1/4)**n
    pub fn extended() -> Self {
        let mut library = Self::standard();
        library
            .bases
            .extend((3..=4).map(|b| PlainBasis::exponential(Number::from_i64(b))));
        library.bases.extend((2..=4).filter_map(|d| {
            Number::from_ratio(1, d).ok().map(PlainBasis::exponential)
        }));
        library
    }

    pub fn bases(&self) -> &[PlainBasis] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Candidate columns for a recurrence of the given order over `sample`
    ///
    /// Every vector covers indices order..len. Lagged candidates come first,
    /// from a[n-order] down to a[n-1], then the plain bases in library order.
    /// Callers guarantee `order < sample.len()`.
    pub fn candidates(&self, sample: &[Number], order: usize) -> Vec<Candidate> {
        let len = sample.len();
        let lagged = (1..=order).rev().map(|lag| {
            Candidate::new(Basis::Lagged(lag), sample[order - lag..len - lag].to_vec())
        });
        let plain = self.bases.iter().map(|plain| {
            let vector = (order..len).map(|n| plain.eval(n)).collect();
            Candidate::new(Basis::Plain(plain.clone()), vector)
        });
        lagged.chain(plain).collect()
    }
}

impl Default for BasisLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

// ============ Candidates ============

/// A basis together with its values over the fitted range
#[derive(Debug, Clone)]
pub struct Candidate {
    pub basis: Basis,
    pub vector: Vec<Number>,
    /// Entry of largest magnitude, the scale a coefficient is judged against
    pub peak: Number,
}

impl Candidate {
    pub fn new(basis: Basis, vector: Vec<Number>) -> Self {
        let peak = vector
            .iter()
            .fold(None::<&Number>, |best, v| match best {
                Some(b) if b.cmp_magnitude(v).is_ge() => Some(b),
                _ => Some(v),
            })
            .cloned()
            .unwrap_or_else(Number::zero);
        Self { basis, vector, peak }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[i64]) -> Vec<Number> {
        values.iter().map(|&v| Number::from_i64(v)).collect()
    }

    #[test]
    fn test_plain_basis_values() {
        assert_eq!(PlainBasis::Constant.eval(7), Number::one());
        assert_eq!(PlainBasis::power(3).eval(4), Number::from_i64(64));
        assert_eq!(PlainBasis::power(2).eval(0), Number::zero());
        let two = PlainBasis::exponential(Number::from_i64(2));
        assert_eq!(two.eval(0), Number::one());
        assert_eq!(two.eval(10), Number::from_i64(1024));
        let half = PlainBasis::exponential(Number::from_ratio(1, 2).unwrap());
        assert_eq!(half.eval(3), Number::from_ratio(1, 8).unwrap());
    }

    #[test]
    fn test_basis_names() {
        assert_eq!(Basis::Plain(PlainBasis::Constant).name(), "1");
        assert_eq!(Basis::Plain(PlainBasis::power(1)).name(), "n");
        assert_eq!(Basis::Plain(PlainBasis::power(5)).name(), "n**5");
        assert_eq!(
            Basis::Plain(PlainBasis::exponential(Number::from_i64(2))).name(),
            "2**n"
        );
        assert_eq!(
            Basis::Plain(PlainBasis::exponential(Number::from_ratio(1, 3).unwrap())).name(),
            "(1/3)**n"
        );
        assert_eq!(Basis::Lagged(2).to_string(), "a[n-2]");
    }

    #[test]
    fn test_libraries() {
        let standard = BasisLibrary::standard();
        let names: Vec<String> = standard.bases().iter().map(|b| b.name()).collect();
        assert_eq!(names, ["1", "n", "n**2", "n**3", "n**4", "n**5", "2**n"]);
        assert_eq!(BasisLibrary::default(), standard);
        assert_eq!(BasisLibrary::extended().len(), 12);
    }

    #[test]
    fn test_candidates_layout() {
        let sample = nums(&[1, 2, 4, 8, 16]);
        let candidates = BasisLibrary::standard().candidates(&sample, 2);
        assert_eq!(candidates.len(), 9);

        assert_eq!(candidates[0].basis, Basis::Lagged(2));
        assert_eq!(candidates[0].vector, nums(&[1, 2, 4]));
        assert_eq!(candidates[1].basis, Basis::Lagged(1));
        assert_eq!(candidates[1].vector, nums(&[2, 4, 8]));
        // Plain bases evaluate at n = 2, 3, 4
        assert!(candidates[2].basis.is_constant());
        assert_eq!(candidates[3].vector, nums(&[2, 3, 4]));
        assert_eq!(candidates[8].vector, nums(&[4, 8, 16]));
    }

    #[test]
    fn test_candidate_peak() {
        let c = Candidate::new(Basis::Lagged(1), nums(&[3, -7, 5]));
        assert_eq!(c.peak, Number::from_i64(-7));
        let empty = Candidate::new(Basis::Lagged(1), vec![]);
        assert!(empty.peak.is_zero());
    }

    #[test]
    fn test_library_serde() {
        let library = BasisLibrary::new(vec![
            PlainBasis::Constant,
            PlainBasis::exponential(Number::from_i64(3)),
        ]);
        let json = serde_json::to_string(&library).unwrap();
        let back: BasisLibrary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, library);
    }
}
