//! Expression trees produced by the parser.

use super::{Rational, RationalFunction, SymbolicError};
use std::collections::BTreeSet;
use std::fmt;

/// Parsed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(Rational),
    Symbol(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn number(value: i128) -> Self {
        Self::Number(Rational::from_integer(value))
    }

    pub fn symbol(name: &str) -> Self {
        Self::Symbol(name.to_string())
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Self::Add(Box::new(lhs), Box::new(rhs))
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Self {
        Self::Sub(Box::new(lhs), Box::new(rhs))
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Self {
        Self::Mul(Box::new(lhs), Box::new(rhs))
    }

    pub fn div(lhs: Expr, rhs: Expr) -> Self {
        Self::Div(Box::new(lhs), Box::new(rhs))
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Self::Pow(Box::new(base), Box::new(exponent))
    }

    /// Free symbols occurring anywhere in the tree.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Number(_) => {}
            Self::Symbol(name) => {
                out.insert(name.clone());
            }
            Self::Neg(inner) => inner.collect_symbols(out),
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) | Self::Pow(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    /// Replace every occurrence of `symbol` with `replacement`.
    pub fn substitute(&self, symbol: &str, replacement: &Expr) -> Expr {
        let sub = |e: &Expr| Box::new(e.substitute(symbol, replacement));
        match self {
            Self::Symbol(name) if name == symbol => replacement.clone(),
            Self::Number(_) | Self::Symbol(_) => self.clone(),
            Self::Neg(inner) => Self::Neg(sub(inner)),
            Self::Add(a, b) => Self::Add(sub(a), sub(b)),
            Self::Sub(a, b) => Self::Sub(sub(a), sub(b)),
            Self::Mul(a, b) => Self::Mul(sub(a), sub(b)),
            Self::Div(a, b) => Self::Div(sub(a), sub(b)),
            Self::Pow(a, b) => Self::Pow(sub(a), sub(b)),
        }
    }

    /// Normalize into a rational function.
    ///
    /// Exponents must reduce to integer constants; anything else is
    /// `SymbolicError::Unsupported`.
    pub fn to_rational_function(&self) -> Result<RationalFunction, SymbolicError> {
        match self {
            Self::Number(value) => Ok(RationalFunction::constant(*value)),
            Self::Symbol(name) => Ok(RationalFunction::symbol(name)),
            Self::Neg(inner) => inner.to_rational_function()?.neg(),
            Self::Add(a, b) => a.to_rational_function()?.add(&b.to_rational_function()?),
            Self::Sub(a, b) => a.to_rational_function()?.sub(&b.to_rational_function()?),
            Self::Mul(a, b) => a.to_rational_function()?.mul(&b.to_rational_function()?),
            Self::Div(a, b) => a.to_rational_function()?.div(&b.to_rational_function()?),
            Self::Pow(base, exponent) => {
                let exp = exponent
                    .to_rational_function()?
                    .as_constant()
                    .ok_or_else(|| SymbolicError::Unsupported(format!("exponent {exponent}")))?;
                if !exp.is_integer() {
                    return Err(SymbolicError::Unsupported(format!("fractional exponent {exp}")));
                }
                let exp = i64::try_from(exp.numer()).map_err(|_| SymbolicError::Overflow)?;
                base.to_rational_function()?.pow(exp)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Neg(inner) => write!(f, "-({inner})"),
            Self::Add(a, b) => write!(f, "({a} + {b})"),
            Self::Sub(a, b) => write!(f, "({a} - {b})"),
            Self::Mul(a, b) => write!(f, "{a}*{b}"),
            Self::Div(a, b) => write!(f, "({a})/({b})"),
            Self::Pow(a, b) => write!(f, "({a})^({b})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_then_normalize() {
        // n^2 with n -> n - 1 minus (n^2 - 2n + 1) is zero
        let expr = Expr::pow(Expr::symbol("n"), Expr::number(2));
        let shifted = expr.substitute("n", &Expr::sub(Expr::symbol("n"), Expr::number(1)));
        let expected = Expr::add(
            Expr::sub(
                Expr::pow(Expr::symbol("n"), Expr::number(2)),
                Expr::mul(Expr::number(2), Expr::symbol("n")),
            ),
            Expr::number(1),
        );
        let diff = Expr::sub(shifted, expected).to_rational_function().unwrap();
        assert!(diff.is_zero());
    }

    #[test]
    fn test_symbolic_exponent_is_unsupported() {
        let expr = Expr::pow(Expr::number(2), Expr::symbol("x"));
        assert!(matches!(
            expr.to_rational_function(),
            Err(SymbolicError::Unsupported(_))
        ));
    }

    #[test]
    fn test_symbols() {
        let expr = Expr::div(Expr::symbol("x"), Expr::add(Expr::symbol("y"), Expr::number(1)));
        assert_eq!(expr.symbols().len(), 2);
    }
}
