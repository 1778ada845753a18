//! Layered, short-circuiting verification.
//!
//! Layer order is fixed and the first failure wins:
//! 1. format    → `INCORRECT_FORMAT`
//! 2. structure → `INCORRECT_LENGTH` (cardinality) or `INCORRECT_FORMAT`
//! 3. solution  → `INCORRECT_SOLUTION`
//!
//! A candidate that passes every layer is `(true, "OK", CORRECT)`.

use crate::models::{OutcomeTag, VerificationOutcome};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Why a layer refused a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    diagnostic: OutcomeTag,
    message: String,
}

impl Rejection {
    /// Wrong shape, wrong type, unparseable, or another structural violation.
    pub fn format(message: impl Into<String>) -> Self {
        Self {
            diagnostic: OutcomeTag::IncorrectFormat,
            message: message.into(),
        }
    }

    /// Wrong number of elements.
    pub fn length(expected: usize, actual: usize) -> Self {
        Self {
            diagnostic: OutcomeTag::IncorrectLength,
            message: format!("expected {expected} elements, got {actual}"),
        }
    }

    /// Right shape, wrong mathematics.
    pub fn solution(message: impl Into<String>) -> Self {
        Self {
            diagnostic: OutcomeTag::IncorrectSolution,
            message: message.into(),
        }
    }

    pub fn diagnostic(&self) -> OutcomeTag {
        self.diagnostic
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.diagnostic, self.message)
    }
}

impl From<Rejection> for VerificationOutcome {
    fn from(rejection: Rejection) -> Self {
        VerificationOutcome::rejected(rejection.diagnostic, rejection.message)
    }
}

/// The three validation layers of a family.
///
/// `read_format` turns the raw candidate into the family's typed answer;
/// later layers only ever see a well-formed answer.
pub trait LayeredCheck {
    type Answer;

    fn read_format(&self, candidate: &Value) -> Result<Self::Answer, Rejection>;

    fn check_structure(&self, _answer: &Self::Answer) -> Result<(), Rejection> {
        Ok(())
    }

    fn check_solution(&self, answer: &Self::Answer) -> Result<(), Rejection>;
}

/// Run every layer of `checker` on `candidate`, in order.
pub fn run_layers<C>(checker: &C, family: &str, candidate: &Value) -> VerificationOutcome
where
    C: LayeredCheck + ?Sized,
{
    let result = checker.read_format(candidate).and_then(|answer| {
        checker.check_structure(&answer)?;
        checker.check_solution(&answer)
    });

    let outcome = match result {
        Ok(()) => VerificationOutcome::correct(),
        Err(rejection) => VerificationOutcome::from(rejection),
    };
    debug!(
        family,
        diagnostic = %outcome.diagnostic(),
        reason = outcome.message(),
        "Candidate checked"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    /// Expects a list of exactly two even integers summing to 10.
    struct EvenPair {
        solution_calls: Cell<usize>,
    }

    impl LayeredCheck for EvenPair {
        type Answer = Vec<i64>;

        fn read_format(&self, candidate: &Value) -> Result<Vec<i64>, Rejection> {
            candidate
                .as_array()
                .ok_or_else(|| Rejection::format("not a list"))?
                .iter()
                .map(|v| v.as_i64().ok_or_else(|| Rejection::format("not an integer")))
                .collect()
        }

        fn check_structure(&self, answer: &Vec<i64>) -> Result<(), Rejection> {
            if answer.len() != 2 {
                return Err(Rejection::length(2, answer.len()));
            }
            if answer.iter().any(|v| v % 2 != 0) {
                return Err(Rejection::format("odd element"));
            }
            Ok(())
        }

        fn check_solution(&self, answer: &Vec<i64>) -> Result<(), Rejection> {
            self.solution_calls.set(self.solution_calls.get() + 1);
            if answer.iter().sum::<i64>() == 10 {
                Ok(())
            } else {
                Err(Rejection::solution("sum is not 10"))
            }
        }
    }

    fn checker() -> EvenPair {
        EvenPair {
            solution_calls: Cell::new(0),
        }
    }

    #[test]
    fn test_all_layers_pass() {
        let outcome = run_layers(&checker(), "even_pair", &json!([4, 6]));
        assert_eq!(outcome, VerificationOutcome::correct());
    }

    #[test]
    fn test_format_wins_over_solution() {
        let c = checker();
        let outcome = run_layers(&c, "even_pair", &json!("4 and 6"));
        assert_eq!(outcome.diagnostic(), OutcomeTag::IncorrectFormat);
        assert_eq!(c.solution_calls.get(), 0);
    }

    #[test]
    fn test_length_gating_skips_solution() {
        let c = checker();
        let outcome = run_layers(&c, "even_pair", &json!([2, 4, 4]));
        assert_eq!(outcome.diagnostic(), OutcomeTag::IncorrectLength);
        assert_eq!(outcome.message(), "expected 2 elements, got 3");
        assert_eq!(c.solution_calls.get(), 0);
    }

    #[test]
    fn test_structural_format_violation() {
        let outcome = run_layers(&checker(), "even_pair", &json!([3, 7]));
        assert_eq!(outcome.diagnostic(), OutcomeTag::IncorrectFormat);
    }

    #[test]
    fn test_solution_failure() {
        let outcome = run_layers(&checker(), "even_pair", &json!([2, 4]));
        assert!(!outcome.accepted());
        assert_eq!(outcome.diagnostic(), OutcomeTag::IncorrectSolution);
    }
}
