//! Symbolic-parsing collaborator.
//!
//! Provides:
//! - `ExpressionParser`: the seam verification goes through (`parse(text)`)
//! - `LatexParser`: the built-in parser for the LaTeX subset answers use
//! - `RationalFunction`: exact normal form used for identity checks
//!
//! K_i: Identities are decided exactly (zero numerator after normalization),
//! never by numeric sampling.

mod expr;
mod parser;
mod polynomial;
mod rational;

pub use expr::Expr;
pub use parser::LatexParser;
pub use polynomial::{Monomial, Polynomial, RationalFunction, MAX_EXPONENT};
pub use rational::Rational;

use thiserror::Error;

/// Failures of parsing or normalizing an expression.
///
/// The verification pipeline maps every variant to `INCORRECT_FORMAT`
/// when it happens while reading a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolicError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected token '{found}' at position {position}")]
    UnexpectedToken { position: usize, found: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown command {0}")]
    UnknownCommand(String),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("unsupported construct: {0}")]
    Unsupported(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("coefficient overflow")]
    Overflow,
}

/// Turns answer text into an expression tree.
pub trait ExpressionParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Expr, SymbolicError>;
}

/// Parse and normalize in one step.
pub fn normalize(parser: &dyn ExpressionParser, text: &str) -> Result<RationalFunction, SymbolicError> {
    parser.parse(text)?.to_rational_function()
}
