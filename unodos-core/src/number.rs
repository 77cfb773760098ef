//! Exact and floating point sample values
//!
//! Integers, rationals and complex rationals are kept exact with dashu's
//! `RBig`, so zero tests on fitted coefficients stay exact. Floats (real or
//! complex) switch every operation they touch to `f64` arithmetic and to
//! tolerance-based comparisons.

use std::cmp::Ordering;
use std::fmt;

use dashu_int::{IBig, UBig};
use dashu_ratio::RBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow: {0} does not fit the target type")]
    Overflow(String),
}

/// Largest float magnitude that still converts to an exact integer
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// A complex number over either exact rationals or `f64`
///
/// Real values simply carry a zero imaginary part. Mixing an exact value with
/// a float produces a float; two exact values always produce an exact value.
#[derive(Debug, Clone)]
pub enum Number {
    Exact { re: RBig, im: RBig },
    Float { re: f64, im: f64 },
}

impl Number {
    // ========== Construction ==========

    /// Create from string representation
    /// Supports: "123", "-3/4", "2.5", "1e-3", "2i", "3+2i", "1/2-(3/4)i"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NumberError::ParseError(s.to_string()));
        }

        let Some(body) = s.strip_suffix('i') else {
            return Self::parse_real(s, s);
        };

        // Split "re+im" at the last sign that is neither leading nor an exponent sign
        let split = body.char_indices().rev().find(|&(idx, c)| {
            (c == '+' || c == '-')
                && idx > 0
                && !matches!(body[..idx].chars().last(), Some('e' | 'E'))
        });
        let (re_text, im_text) = match split {
            Some((idx, _)) => (&body[..idx], &body[idx..]),
            None => ("", body),
        };

        let re = if re_text.trim().is_empty() {
            Self::zero()
        } else {
            Self::parse_real(re_text, s)?
        };
        let im = match im_text.trim() {
            "" | "+" => Self::one(),
            "-" => Self::one().neg(),
            text => Self::parse_real(text, s)?,
        };

        Ok(Self::complex(&re, &im))
    }

    fn parse_real(text: &str, original: &str) -> Result<Self, NumberError> {
        let err = || NumberError::ParseError(original.to_string());
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.trim()),
            None => (false, text.strip_prefix('+').unwrap_or(text).trim()),
        };
        let body = body
            .strip_prefix('(')
            .and_then(|b| b.strip_suffix(')'))
            .unwrap_or(body)
            .trim();

        let value = if let Some((num, den)) = body.split_once('/') {
            let num: IBig = num.trim().parse().map_err(|_| err())?;
            let den: IBig = den.trim().parse().map_err(|_| err())?;
            if den == IBig::ZERO {
                return Err(NumberError::DivisionByZero);
            }
            Self::from_rational(RBig::from(num) / RBig::from(den))
        } else if body.contains(['.', 'e', 'E']) {
            let f: f64 = body.parse().map_err(|_| err())?;
            Self::from_f64(f)
        } else {
            let n: IBig = body.parse().map_err(|_| err())?;
            Self::from_ibig(n)
        };

        Ok(if negative { value.neg() } else { value })
    }

    pub fn zero() -> Self {
        Self::from_i64(0)
    }

    pub fn one() -> Self {
        Self::from_i64(1)
    }

    /// The imaginary unit
    pub fn i() -> Self {
        Number::Exact { re: RBig::ZERO, im: RBig::ONE }
    }

    pub fn from_i64(n: i64) -> Self {
        Self::from_ibig(IBig::from(n))
    }

    pub fn from_ibig(n: IBig) -> Self {
        Self::from_rational(RBig::from(n))
    }

    pub fn from_rational(r: RBig) -> Self {
        Number::Exact { re: r, im: RBig::ZERO }
    }

    /// Create from ratio (exact division)
    pub fn from_ratio(num: i64, den: i64) -> Result<Self, NumberError> {
        if den == 0 {
            return Err(NumberError::DivisionByZero);
        }
        Ok(Self::from_rational(
            RBig::from(IBig::from(num)) / RBig::from(IBig::from(den)),
        ))
    }

    pub fn from_f64(f: f64) -> Self {
        Number::Float { re: f, im: 0.0 }
    }

    /// `re + im * i`, staying exact when both parts are exact
    pub fn complex(re: &Self, im: &Self) -> Self {
        re.add(&im.mul(&Self::i()))
    }

    // ========== Predicates ==========

    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Exact { .. })
    }

    /// Exact zero test (no tolerance, even for floats)
    pub fn is_zero(&self) -> bool {
        match self {
            Number::Exact { re, im } => *re == RBig::ZERO && *im == RBig::ZERO,
            Number::Float { re, im } => *re == 0.0 && *im == 0.0,
        }
    }

    pub fn is_real(&self) -> bool {
        match self {
            Number::Exact { im, .. } => *im == RBig::ZERO,
            Number::Float { im, .. } => *im == 0.0,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Number::Exact { re, im } => *im == RBig::ZERO && *re.denominator() == UBig::ONE,
            Number::Float { re, im } => *im == 0.0 && re.is_finite() && re.fract() == 0.0,
        }
    }

    // ========== Basic Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Number::Exact { re: a, im: b }, Number::Exact { re: c, im: d }) => {
                Number::Exact { re: a + c, im: b + d }
            }
            _ => {
                let (a, b) = self.float_parts();
                let (c, d) = other.float_parts();
                Number::Float { re: a + c, im: b + d }
            }
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Number::Exact { re: a, im: b }, Number::Exact { re: c, im: d }) => Number::Exact {
                re: a * c - b * d,
                im: a * d + b * c,
            },
            _ => {
                let (a, b) = self.float_parts();
                let (c, d) = other.float_parts();
                Number::Float {
                    re: a * c - b * d,
                    im: a * d + b * c,
                }
            }
        }
    }

    pub fn neg(&self) -> Self {
        match self {
            Number::Exact { re, im } => Number::Exact {
                re: -re.clone(),
                im: -im.clone(),
            },
            Number::Float { re, im } => Number::Float { re: -re, im: -im },
        }
    }

    /// Complex conjugate
    pub fn conj(&self) -> Self {
        match self {
            Number::Exact { re, im } => Number::Exact {
                re: re.clone(),
                im: -im.clone(),
            },
            Number::Float { re, im } => Number::Float { re: *re, im: -im },
        }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        match (self, other) {
            (Number::Exact { re: a, im: b }, Number::Exact { re: c, im: d }) => {
                let denom = c * c + d * d;
                Ok(Number::Exact {
                    re: (a * c + b * d) / &denom,
                    im: (b * c - a * d) / &denom,
                })
            }
            _ => {
                let (a, b) = self.float_parts();
                let (c, d) = other.float_parts();
                let denom = c * c + d * d;
                Ok(Number::Float {
                    re: (a * c + b * d) / denom,
                    im: (b * c - a * d) / denom,
                })
            }
        }
    }

    /// Integer power by repeated squaring (exact for exact values)
    pub fn pow(&self, exp: u64) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    // ========== Magnitudes ==========

    /// |z|² in the value's own field
    pub fn norm_sqr(&self) -> Self {
        match self {
            Number::Exact { re, im } => Self::from_rational(re * re + im * im),
            Number::Float { re, im } => Self::from_f64(re * re + im * im),
        }
    }

    /// |z| as a float, for tolerance checks
    pub fn magnitude(&self) -> f64 {
        let (re, im) = self.float_parts();
        re.hypot(im)
    }

    /// Compare |self| with |other|, exactly when both are exact
    pub fn cmp_magnitude(&self, other: &Self) -> Ordering {
        match (self.norm_sqr(), other.norm_sqr()) {
            (Number::Exact { re: a, .. }, Number::Exact { re: b, .. }) => a.cmp(&b),
            _ => self
                .magnitude()
                .partial_cmp(&other.magnitude())
                .unwrap_or(Ordering::Equal),
        }
    }

    // ========== Conversion ==========

    /// Turn integral real floats into exact integers; everything else is unchanged
    pub fn normalize(self) -> Self {
        match self {
            Number::Float { re, im }
                if im == 0.0 && re.is_finite() && re.fract() == 0.0 && re.abs() < MAX_EXACT_FLOAT =>
            {
                Self::from_i64(re as i64)
            }
            other => other,
        }
    }

    pub fn real(&self) -> Self {
        match self {
            Number::Exact { re, .. } => Self::from_rational(re.clone()),
            Number::Float { re, .. } => Self::from_f64(*re),
        }
    }

    pub fn imag(&self) -> Self {
        match self {
            Number::Exact { im, .. } => Self::from_rational(im.clone()),
            Number::Float { im, .. } => Self::from_f64(*im),
        }
    }

    /// Real value as f64 (None for values with an imaginary part)
    pub fn to_f64(&self) -> Option<f64> {
        if !self.is_real() {
            return None;
        }
        Some(self.float_parts().0)
    }

    /// Exact integer value as i64
    pub fn to_i64(&self) -> Result<i64, NumberError> {
        match self {
            Number::Exact { re, im } if *im == RBig::ZERO && *re.denominator() == UBig::ONE => {
                i64::try_from(re.numerator().clone())
                    .map_err(|_| NumberError::Overflow(self.to_string()))
            }
            Number::Float { re, .. } if self.is_integer() && re.abs() < MAX_EXACT_FLOAT => {
                Ok(*re as i64)
            }
            _ => Err(NumberError::Overflow(self.to_string())),
        }
    }

    fn float_parts(&self) -> (f64, f64) {
        match self {
            Number::Exact { re, im } => (re.to_f64().value(), im.to_f64().value()),
            Number::Float { re, im } => (*re, *im),
        }
    }
}

fn fmt_rational(r: &RBig) -> String {
    if *r.denominator() == UBig::ONE {
        r.numerator().to_string()
    } else {
        format!("{}/{}", r.numerator(), r.denominator())
    }
}

// ========== Trait Implementations ==========

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact { re, im } => {
                if *im == RBig::ZERO {
                    return write!(f, "{}", fmt_rational(re));
                }
                let negative = *im < RBig::ZERO;
                let abs_im = if negative { -im.clone() } else { im.clone() };
                let im_text = if abs_im == RBig::ONE {
                    String::new()
                } else {
                    fmt_rational(&abs_im)
                };
                let sign = if negative { "-" } else { "+" };
                if *re == RBig::ZERO {
                    let sign = if negative { "-" } else { "" };
                    write!(f, "{}{}i", sign, im_text)
                } else {
                    write!(f, "{}{}{}i", fmt_rational(re), sign, im_text)
                }
            }
            Number::Float { re, im } => {
                if *im == 0.0 {
                    write!(f, "{:?}", re)
                } else if *re == 0.0 {
                    write!(f, "{:?}i", im)
                } else {
                    let sign = if *im < 0.0 { "-" } else { "+" };
                    write!(f, "{:?}{}{:?}i", re, sign, im.abs())
                }
            }
        }
    }
}

impl std::str::FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Number::from_str(s)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Self::from_f64(f)
    }
}

impl From<RBig> for Number {
    fn from(r: RBig) -> Self {
        Self::from_rational(r)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Values compare mathematically: `1 == 1.0`
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Exact { re: a, im: b }, Number::Exact { re: c, im: d }) => a == c && b == d,
            _ => self.float_parts() == other.float_parts(),
        }
    }
}
