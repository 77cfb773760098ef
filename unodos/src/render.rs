//! Text rendering of coefficients and rules
//!
//! Rationals print as `p/q`, complex values as `re+im i` with a
//! parenthesised non-integer imaginary part, and any coefficient that
//! multiplies a basis name is parenthesised when it would otherwise be
//! ambiguous: `(5/2)*a[n-1]`, `(1+2i)*n`.

use std::cmp::Ordering;

use dashu_ratio::RBig;
use unodos_core::Number;
use unodos_sequence::{Model, Rule, Term};

/// Rule renderer
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a coefficient; `wrap` parenthesises compound values
    pub fn coefficient(&self, value: &Number, wrap: bool) -> String {
        if value.is_zero() {
            return "0".to_string();
        }
        let (re, im) = (value.real(), value.imag());
        if im.is_zero() {
            return self.real(&re, wrap);
        }
        if re.is_zero() {
            return format!("{}i", self.real(&im, true));
        }
        let sign = if sign(&im) == Ordering::Greater { "+" } else { "" };
        let text = format!("{}{}{}i", self.real(&re, false), sign, self.real(&im, true));
        if wrap {
            format!("({})", text)
        } else {
            text
        }
    }

    /// Render a real value (imaginary part ignored)
    fn real(&self, value: &Number, wrap: bool) -> String {
        if value.is_zero() {
            return "0".to_string();
        }
        match value {
            Number::Float { re, .. } => format!("{:?}", re),
            Number::Exact { .. } if value.is_integer() => value.to_string(),
            Number::Exact { re, .. } => {
                let negative = *re < RBig::ZERO;
                let magnitude = if negative { value.neg() } else { value.clone() };
                let text = if wrap {
                    format!("({})", magnitude)
                } else {
                    magnitude.to_string()
                };
                if negative {
                    format!("-{}", text)
                } else {
                    text
                }
            }
        }
    }

    fn term(&self, term: &Term) -> String {
        let name = term.basis.name();
        let value = &term.coefficient;
        if term.basis.is_constant() {
            self.coefficient(value, false)
        } else if *value == Number::one() {
            name
        } else if *value == Number::one().neg() {
            format!("-{}", name)
        } else {
            format!("{}*{}", self.coefficient(value, true), name)
        }
    }

    /// `a[n]=` followed by the signed terms in order, or `a[n]=0` for no terms
    pub fn rule(&self, rule: &Rule) -> String {
        let mut output = String::from("a[n]=");
        if rule.is_empty() {
            output.push('0');
            return output;
        }
        for (i, term) in rule.terms().iter().enumerate() {
            let text = self.term(term);
            if i > 0 && !text.starts_with(['-', '+']) {
                output.push('+');
            }
            output.push_str(&text);
        }
        output
    }

    /// Recurrences show their seeds: `[1, 1, a[n]=a[n-2]+a[n-1]]`
    pub fn inspect(&self, model: &Model) -> String {
        let rule = self.rule(model.rule());
        if model.differential_level() == 0 {
            return rule;
        }
        let mut parts: Vec<String> = model.initial().iter().map(|v| v.to_string()).collect();
        parts.push(rule);
        format!("[{}]", parts.join(", "))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign of a real value
fn sign(value: &Number) -> Ordering {
    match value {
        Number::Exact { re, .. } => re.cmp(&RBig::ZERO),
        Number::Float { re, .. } => re.partial_cmp(&0.0).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unodos_sequence::{Basis, PlainBasis};

    fn n(text: &str) -> Number {
        Number::from_str(text).unwrap()
    }

    #[test]
    fn test_real_coefficients() {
        let r = Renderer::new();
        assert_eq!(r.coefficient(&n("0"), true), "0");
        assert_eq!(r.coefficient(&n("-7"), true), "-7");
        assert_eq!(r.coefficient(&n("5/2"), false), "5/2");
        assert_eq!(r.coefficient(&n("5/2"), true), "(5/2)");
        assert_eq!(r.coefficient(&n("-5/3"), false), "-5/3");
        assert_eq!(r.coefficient(&n("-5/3"), true), "-(5/3)");
        assert_eq!(r.coefficient(&n("0.5"), true), "0.5");
    }

    #[test]
    fn test_complex_coefficients() {
        let r = Renderer::new();
        assert_eq!(r.coefficient(&n("2i"), true), "2i");
        assert_eq!(r.coefficient(&n("1/2i"), false), "(1/2)i");
        assert_eq!(r.coefficient(&n("3/2+4i"), false), "3/2+4i");
        assert_eq!(r.coefficient(&n("2/3+4i"), true), "(2/3+4i)");
        assert_eq!(r.coefficient(&n("1+1/2i"), true), "(1+(1/2)i)");
        assert_eq!(r.coefficient(&n("3-2i"), false), "3-2i");
        assert_eq!(r.coefficient(&n("1-1/2i"), false), "1-(1/2)i");
    }

    #[test]
    fn test_rule_text() {
        let rule = Rule::new(vec![
            Term::new(Basis::Lagged(2), n("3")),
            Term::new(Basis::Plain(PlainBasis::Constant), n("2")),
            Term::new(Basis::Plain(PlainBasis::power(5)), n("-1")),
        ]);
        assert_eq!(Renderer::new().rule(&rule), "a[n]=3*a[n-2]+2-n**5");

        let rule = Rule::new(vec![
            Term::new(Basis::Lagged(1), n("2i")),
            Term::new(Basis::Plain(PlainBasis::Constant), n("3/2+4i")),
            Term::new(Basis::Plain(PlainBasis::power(2)), n("2/3+4i")),
        ]);
        assert_eq!(
            Renderer::new().rule(&rule),
            "a[n]=2i*a[n-1]+3/2+4i+(2/3+4i)*n**2"
        );
    }

    #[test]
    fn test_empty_rule() {
        assert_eq!(Renderer::new().rule(&Rule::default()), "a[n]=0");
    }
}
