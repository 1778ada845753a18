//! Built-in problem families.
//!
//! Epistemic foundation:
//! - K_i: Every family's canonical solution passes its own check
//! - K_i: Sampled parameters always lie inside the family's domain
//! - B_i: Symbolic answers may use constructs the parser does not know → format
//! - I^R: The set of built-in families is fixed at compile time

mod arithmetic_progression;
mod divisor_chain;
mod even_sum_probability;
mod power_sum;
mod prime_pairing;
mod reciprocal_equation;
mod roof_friendly;

pub use arithmetic_progression::ArithmeticProgressionSum;
pub use divisor_chain::DivisorChain;
pub use even_sum_probability::EvenSumProbability;
pub use power_sum::PowerSumClosedForm;
pub use prime_pairing::PrimeSumPairing;
pub use reciprocal_equation::ReciprocalFunctionalEquation;
pub use roof_friendly::RoofFriendlyPairs;

use crate::models::{InstructionCatalog, Result};
use crate::pipeline::{assignment_variable, read_expression, Rejection};
use crate::problem::FamilyRegistry;
use crate::symbolic::{Expr, LatexParser};
use rand::Rng;
use serde_json::Value;
use std::ops::RangeInclusive;

/// Registry with every built-in family.
pub fn default_registry(catalog: InstructionCatalog) -> Result<FamilyRegistry> {
    let mut registry = FamilyRegistry::new(catalog);
    registry
        .register::<RoofFriendlyPairs>()?
        .register::<ArithmeticProgressionSum>()?
        .register::<DivisorChain>()?
        .register::<PrimeSumPairing>()?
        .register::<EvenSumProbability>()?
        .register::<PowerSumClosedForm>()?
        .register::<ReciprocalFunctionalEquation>()?;
    Ok(registry)
}

/// Uniform draw from an inclusive parameter range.
pub(crate) fn sample_in<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<i64>) -> i64 {
    rng.gen_range(range)
}

pub(crate) fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Format layer for expression answers: parse, normalize, and restrict the
/// free symbols to `allowed`.
///
/// An answer written as `f(t) = ...` in a single-variable family is read
/// with `t` renamed to that variable.
pub(crate) fn read_symbolic(candidate: &Value, allowed: &[&str]) -> std::result::Result<Expr, Rejection> {
    let mut expr = read_expression(&LatexParser, candidate)?;
    if let (Value::String(text), [variable]) = (candidate, allowed) {
        if let Some(bound) = assignment_variable(text) {
            let symbols = expr.symbols();
            if bound != *variable && !symbols.contains(*variable) {
                expr = expr.substitute(&bound, &Expr::symbol(variable));
            }
        }
    }
    expr.to_rational_function()
        .map_err(|e| Rejection::format(format!("could not normalize expression: {e}")))?;
    if let Some(symbol) = expr.symbols().into_iter().find(|s| !allowed.contains(&s.as_str())) {
        return Err(Rejection::format(format!(
            "unexpected symbol '{symbol}', expected an expression in {}",
            allowed.join(", ")
        )));
    }
    Ok(expr)
}

/// Whether `expr` is identically zero.
///
/// Normalization failures here come from an answer that already read
/// cleanly, so they count against the solution.
pub(crate) fn vanishes(expr: &Expr) -> std::result::Result<bool, Rejection> {
    expr.to_rational_function()
        .map(|f| f.is_zero())
        .map_err(|e| Rejection::solution(format!("identity check failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutcomeTag;

    #[test]
    fn test_default_registry_has_all_families() {
        let registry = default_registry(InstructionCatalog::default()).unwrap();
        assert_eq!(registry.len(), 7);
        assert!(!registry
            .get("reciprocal_functional_equation")
            .unwrap()
            .supports_variation());
    }

    #[test]
    fn test_original_solutions_pass() {
        let registry = default_registry(InstructionCatalog::default()).unwrap();
        for entry in registry.entries() {
            let problem = entry.original().unwrap();
            let outcome = problem.check(&entry.config().original_solution);
            assert!(outcome.accepted(), "{}: {}", entry.name(), outcome.message());
        }
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<i64> = (0..30).filter(|n| is_prime(*n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_read_symbolic_restricts_symbols() {
        assert!(read_symbolic(&serde_json::json!("n^2 + 1"), &["n"]).is_ok());
        let err = read_symbolic(&serde_json::json!("n + m"), &["n"]).unwrap_err();
        assert_eq!(err.diagnostic(), OutcomeTag::IncorrectFormat);
        assert!(err.message().contains("'m'"));
    }

    #[test]
    fn test_read_symbolic_renames_bound_variable() {
        let renamed = read_symbolic(&serde_json::json!("\\boxed{f(t) = 1/t}"), &["x"]).unwrap();
        assert_eq!(renamed.symbols().into_iter().collect::<Vec<_>>(), vec!["x".to_string()]);
        // a free occurrence of the family variable blocks the rename
        let err = read_symbolic(&serde_json::json!("f(t) = t + x"), &["x"]).unwrap_err();
        assert!(err.message().contains("'t'"));
        // plain `y =` names the value, not an argument
        assert!(read_symbolic(&serde_json::json!("y = 1/y"), &["x"]).is_err());
    }

    #[test]
    fn test_vanishes() {
        let parse = |s: &str| read_symbolic(&serde_json::json!(s), &["x"]).unwrap();
        assert!(vanishes(&parse("x(x+1) - x^2 - x")).unwrap());
        assert!(!vanishes(&parse("x")).unwrap());
    }
}
