//! Exact rational numbers with checked arithmetic.

use super::SymbolicError;
use std::cmp::Ordering;
use std::fmt;

/// Reduced fraction `num / den` with `den > 0`.
///
/// Arithmetic is checked; overflow surfaces as `SymbolicError::Overflow`
/// instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i128,
    den: i128,
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    // Only 2^127 does not fit; dividing by 1 instead is still correct
    i128::try_from(a).unwrap_or(1)
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Build and reduce `num / den`.
    pub fn new(num: i128, den: i128) -> Result<Self, SymbolicError> {
        if den == 0 {
            return Err(SymbolicError::DivisionByZero);
        }
        let g = gcd(num, den).max(1);
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = num.checked_neg().ok_or(SymbolicError::Overflow)?;
            den = den.checked_neg().ok_or(SymbolicError::Overflow)?;
        }
        Ok(Self { num, den })
    }

    pub fn from_integer(value: i128) -> Self {
        Self { num: value, den: 1 }
    }

    pub fn numer(&self) -> i128 {
        self.num
    }

    pub fn denom(&self) -> i128 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn checked_add(self, other: Self) -> Result<Self, SymbolicError> {
        let num = self
            .num
            .checked_mul(other.den)
            .and_then(|a| other.num.checked_mul(self.den).and_then(|b| a.checked_add(b)))
            .ok_or(SymbolicError::Overflow)?;
        let den = self
            .den
            .checked_mul(other.den)
            .ok_or(SymbolicError::Overflow)?;
        Self::new(num, den)
    }

    pub fn checked_neg(self) -> Result<Self, SymbolicError> {
        let num = self.num.checked_neg().ok_or(SymbolicError::Overflow)?;
        Ok(Self { num, den: self.den })
    }

    pub fn checked_sub(self, other: Self) -> Result<Self, SymbolicError> {
        self.checked_add(other.checked_neg()?)
    }

    pub fn checked_mul(self, other: Self) -> Result<Self, SymbolicError> {
        // Cross-reduce first to keep intermediates small
        let g1 = gcd(self.num, other.den).max(1);
        let g2 = gcd(other.num, self.den).max(1);
        let num = (self.num / g1)
            .checked_mul(other.num / g2)
            .ok_or(SymbolicError::Overflow)?;
        let den = (self.den / g2)
            .checked_mul(other.den / g1)
            .ok_or(SymbolicError::Overflow)?;
        Self::new(num, den)
    }

    pub fn checked_recip(self) -> Result<Self, SymbolicError> {
        Self::new(self.den, self.num)
    }

    pub fn checked_div(self, other: Self) -> Result<Self, SymbolicError> {
        self.checked_mul(other.checked_recip()?)
    }

    /// Parse a decimal literal such as `12`, `0.125` or `3.`.
    pub fn from_decimal_str(text: &str) -> Result<Self, SymbolicError> {
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(SymbolicError::InvalidNumber(text.to_string()));
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(SymbolicError::InvalidNumber(text.to_string()));
        }
        let digits = format!("{int_part}{frac_part}");
        let num: i128 = digits.parse().map_err(|_| SymbolicError::Overflow)?;
        let exponent = u32::try_from(frac_part.len()).map_err(|_| SymbolicError::Overflow)?;
        let den = 10i128.checked_pow(exponent).ok_or(SymbolicError::Overflow)?;
        Self::new(num, den)
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive; widen through f64 only if the exact
        // products overflow.
        match (
            self.num.checked_mul(other.den),
            other.num.checked_mul(self.den),
        ) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => (self.num as f64 / self.den as f64)
                .partial_cmp(&(other.num as f64 / other.den as f64))
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i128, d: i128) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn test_new_reduces_and_normalizes_sign() {
        assert_eq!(r(6, -4), r(-3, 2));
        assert_eq!(r(6, -4).denom(), 2);
        assert_eq!(r(0, -5), Rational::ZERO);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(r(1, 2).checked_add(r(1, 3)).unwrap(), r(5, 6));
        assert_eq!(r(1, 2).checked_sub(r(1, 2)).unwrap(), Rational::ZERO);
        assert_eq!(r(2, 3).checked_mul(r(9, 4)).unwrap(), r(3, 2));
        assert_eq!(r(2, 3).checked_div(r(4, 9)).unwrap(), r(3, 2));
        assert!(matches!(
            r(1, 2).checked_div(Rational::ZERO),
            Err(SymbolicError::DivisionByZero)
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let big = Rational::from_integer(i128::MAX / 2 + 1);
        assert!(matches!(big.checked_add(big), Err(SymbolicError::Overflow)));
    }

    #[test]
    fn test_decimal_parsing() {
        assert_eq!(Rational::from_decimal_str("0.125").unwrap(), r(1, 8));
        assert_eq!(Rational::from_decimal_str("42").unwrap(), r(42, 1));
        assert_eq!(Rational::from_decimal_str("3.").unwrap(), r(3, 1));
        assert!(Rational::from_decimal_str(".").is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(r(1, 3) < r(1, 2));
        assert!(r(-1, 2) < Rational::ZERO);
        assert_eq!(r(4, 9).to_string(), "4/9");
    }
}
