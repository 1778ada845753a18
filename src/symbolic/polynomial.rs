//! Multivariate polynomials and rational functions over exact rationals.
//!
//! K_i: Terms with a zero coefficient are never stored, so the zero
//! polynomial is exactly the empty term map. Two rational functions are
//! equal iff the numerator of their difference is the zero polynomial.

use super::{Rational, SymbolicError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Largest exponent accepted in `pow`.
pub const MAX_EXPONENT: u32 = 64;

/// Product of symbols raised to positive powers. Empty means `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<String, u32>);

impl Monomial {
    pub fn one() -> Self {
        Self::default()
    }

    pub fn symbol(name: &str) -> Self {
        Self(BTreeMap::from([(name.to_string(), 1)]))
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.0.values().sum()
    }

    fn mul(&self, other: &Self) -> Result<Self, SymbolicError> {
        let mut powers = self.0.clone();
        for (name, exp) in &other.0 {
            let entry = powers.entry(name.clone()).or_insert(0);
            *entry = entry.checked_add(*exp).ok_or(SymbolicError::Overflow)?;
        }
        Ok(Self(powers))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, exp) in &self.0 {
            if !first {
                f.write_str("*")?;
            }
            first = false;
            if *exp == 1 {
                write!(f, "{name}")?;
            } else {
                write!(f, "{name}^{exp}")?;
            }
        }
        Ok(())
    }
}

/// Sparse polynomial: monomial → non-zero coefficient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, Rational>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(value: Rational) -> Self {
        let mut poly = Self::zero();
        if !value.is_zero() {
            poly.terms.insert(Monomial::one(), value);
        }
        poly
    }

    pub fn symbol(name: &str) -> Self {
        Self {
            terms: BTreeMap::from([(Monomial::symbol(name), Rational::ONE)]),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value of a constant polynomial, `None` if any symbol occurs.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::ZERO),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(m, _)| m.is_one())
                .map(|(_, c)| *c),
            _ => None,
        }
    }

    pub fn symbols(&self) -> BTreeSet<String> {
        self.terms
            .keys()
            .flat_map(|m| m.0.keys().cloned())
            .collect()
    }

    pub fn degree(&self) -> u32 {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    fn add_term(&mut self, monomial: Monomial, coeff: Rational) -> Result<(), SymbolicError> {
        let sum = match self.terms.get(&monomial) {
            Some(existing) => existing.checked_add(coeff)?,
            None => coeff,
        };
        if sum.is_zero() {
            self.terms.remove(&monomial);
        } else {
            self.terms.insert(monomial, sum);
        }
        Ok(())
    }

    pub fn add(&self, other: &Self) -> Result<Self, SymbolicError> {
        let mut result = self.clone();
        for (m, c) in &other.terms {
            result.add_term(m.clone(), *c)?;
        }
        Ok(result)
    }

    pub fn neg(&self) -> Result<Self, SymbolicError> {
        let mut terms = BTreeMap::new();
        for (m, c) in &self.terms {
            terms.insert(m.clone(), c.checked_neg()?);
        }
        Ok(Self { terms })
    }

    pub fn sub(&self, other: &Self) -> Result<Self, SymbolicError> {
        self.add(&other.neg()?)
    }

    pub fn mul(&self, other: &Self) -> Result<Self, SymbolicError> {
        let mut result = Self::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                result.add_term(m1.mul(m2)?, c1.checked_mul(*c2)?)?;
            }
        }
        Ok(result)
    }

    /// Multiply every coefficient by `factor`.
    pub fn scale(&self, factor: Rational) -> Result<Self, SymbolicError> {
        let mut result = Self::zero();
        for (m, c) in &self.terms {
            result.add_term(m.clone(), c.checked_mul(factor)?)?;
        }
        Ok(result)
    }

    pub fn pow(&self, exponent: u32) -> Result<Self, SymbolicError> {
        if exponent > MAX_EXPONENT {
            return Err(SymbolicError::Unsupported(format!(
                "exponent {exponent} exceeds {MAX_EXPONENT}"
            )));
        }
        let mut result = Self::constant(Rational::ONE);
        for _ in 0..exponent {
            result = result.mul(self)?;
        }
        Ok(result)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }
        for (i, (m, c)) in self.terms.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            match (m.is_one(), c.is_one()) {
                (true, _) => write!(f, "{c}")?,
                (false, true) => write!(f, "{m}")?,
                (false, false) => write!(f, "({c})*{m}")?,
            }
        }
        Ok(())
    }
}

/// Quotient of two polynomials with a non-zero denominator.
///
/// Not reduced to lowest terms; equality and zero tests go through
/// cross-multiplication, which does not need a GCD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalFunction {
    num: Polynomial,
    den: Polynomial,
}

impl RationalFunction {
    pub fn from_polynomial(poly: Polynomial) -> Self {
        Self {
            num: poly,
            den: Polynomial::constant(Rational::ONE),
        }
    }

    pub fn constant(value: Rational) -> Self {
        Self::from_polynomial(Polynomial::constant(value))
    }

    pub fn symbol(name: &str) -> Self {
        Self::from_polynomial(Polynomial::symbol(name))
    }

    pub fn numerator(&self) -> &Polynomial {
        &self.num
    }

    pub fn denominator(&self) -> &Polynomial {
        &self.den
    }

    /// Build `num / den`, folding a constant denominator into the numerator.
    pub fn new(num: Polynomial, den: Polynomial) -> Result<Self, SymbolicError> {
        if den.is_zero() {
            return Err(SymbolicError::DivisionByZero);
        }
        if let Some(c) = den.as_constant() {
            return Ok(Self::from_polynomial(num.scale(c.checked_recip()?)?));
        }
        if num.is_zero() {
            return Ok(Self::from_polynomial(num));
        }
        Ok(Self { num, den })
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Constant value, if the function does not depend on any symbol.
    ///
    /// Only detects constants whose denominator is already constant or
    /// whose numerator is a constant multiple of the denominator.
    pub fn as_constant(&self) -> Option<Rational> {
        if let Some(c) = self.num.as_constant() {
            return self.den.as_constant().and_then(|d| c.checked_div(d).ok());
        }
        // num = c * den for some constant c
        let (lead_m, lead_c) = self.den.terms.iter().next_back()?;
        let num_c = self.num.terms.get(lead_m)?;
        let ratio = num_c.checked_div(*lead_c).ok()?;
        let scaled = self.den.scale(ratio).ok()?;
        (scaled == self.num).then_some(ratio)
    }

    /// Symbols that survive in the numerator or denominator.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut symbols = self.num.symbols();
        symbols.extend(self.den.symbols());
        symbols
    }

    pub fn add(&self, other: &Self) -> Result<Self, SymbolicError> {
        if self.den == other.den {
            return Self::new(self.num.add(&other.num)?, self.den.clone());
        }
        let num = self.num.mul(&other.den)?.add(&other.num.mul(&self.den)?)?;
        Self::new(num, self.den.mul(&other.den)?)
    }

    pub fn neg(&self) -> Result<Self, SymbolicError> {
        Ok(Self {
            num: self.num.neg()?,
            den: self.den.clone(),
        })
    }

    pub fn sub(&self, other: &Self) -> Result<Self, SymbolicError> {
        self.add(&other.neg()?)
    }

    pub fn mul(&self, other: &Self) -> Result<Self, SymbolicError> {
        Self::new(self.num.mul(&other.num)?, self.den.mul(&other.den)?)
    }

    pub fn recip(&self) -> Result<Self, SymbolicError> {
        Self::new(self.den.clone(), self.num.clone())
    }

    pub fn div(&self, other: &Self) -> Result<Self, SymbolicError> {
        self.mul(&other.recip()?)
    }

    /// Integer power; negative exponents invert.
    pub fn pow(&self, exponent: i64) -> Result<Self, SymbolicError> {
        let magnitude = u32::try_from(exponent.unsigned_abs())
            .map_err(|_| SymbolicError::Unsupported(format!("exponent {exponent}")))?;
        let raised = Self::new(self.num.pow(magnitude)?, self.den.pow(magnitude)?)?;
        if exponent < 0 {
            raised.recip()
        } else {
            Ok(raised)
        }
    }

    /// Exact equivalence of two rational functions.
    pub fn equivalent(&self, other: &Self) -> Result<bool, SymbolicError> {
        Ok(self.sub(other)?.is_zero())
    }
}

impl fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.den.as_constant() {
            Some(c) if c.is_one() => write!(f, "{}", self.num),
            _ => write!(f, "({}) / ({})", self.num, self.den),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> RationalFunction {
        RationalFunction::symbol("x")
    }

    fn c(v: i128) -> RationalFunction {
        RationalFunction::constant(Rational::from_integer(v))
    }

    #[test]
    fn test_polynomial_cancellation() {
        let p = Polynomial::symbol("x").add(&Polynomial::constant(Rational::ONE)).unwrap();
        let q = p.sub(&p).unwrap();
        assert!(q.is_zero());
        assert_eq!(q.as_constant(), Some(Rational::ZERO));
    }

    #[test]
    fn test_binomial_square() {
        let p = Polynomial::symbol("x").add(&Polynomial::constant(Rational::ONE)).unwrap();
        let sq = p.pow(2).unwrap();
        assert_eq!(sq.degree(), 2);
        assert_eq!(sq.to_string(), "x^2 + (2)*x + 1");
    }

    #[test]
    fn test_reciprocal_times_symbol_is_one() {
        let f = c(1).div(&x()).unwrap();
        let product = x().mul(&f).unwrap();
        assert_eq!(product.as_constant(), Some(Rational::ONE));
        assert!(product.sub(&c(1)).unwrap().is_zero());
    }

    #[test]
    fn test_equivalent_forms() {
        // x^{-1} == 1/x, and (x^2 - 1)/(x - 1) == x + 1
        let a = x().pow(-1).unwrap();
        let b = c(1).div(&x()).unwrap();
        assert!(a.equivalent(&b).unwrap());

        let num = x().pow(2).unwrap().sub(&c(1)).unwrap();
        let den = x().sub(&c(1)).unwrap();
        let lhs = num.div(&den).unwrap();
        let rhs = x().add(&c(1)).unwrap();
        assert!(lhs.equivalent(&rhs).unwrap());
        assert!(!lhs.equivalent(&x()).unwrap());
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(x().div(&c(0)), Err(SymbolicError::DivisionByZero)));
    }

    #[test]
    fn test_symbols() {
        let f = x().div(&RationalFunction::symbol("y")).unwrap();
        let symbols: Vec<_> = f.symbols().into_iter().collect();
        assert_eq!(symbols, vec!["x".to_string(), "y".to_string()]);
    }
}
