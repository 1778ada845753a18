//! Distinct positive integers each dividing their total.

use super::sample_in;
use crate::models::{AnswerShape, DescriptorSpec, OlympiaError, Parameters, Result, Tag, VerificationOutcome};
use crate::pipeline::{read_integer_list, require_distinct, require_length, run_layers, LayeredCheck, Rejection};
use crate::problem::{Problem, ProblemFamily};
use rand::Rng;
use serde_json::{json, Value};
use std::ops::RangeInclusive;

const DOMAIN: RangeInclusive<i64> = 3..=30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisorChain {
    n: i64,
}

impl DivisorChain {
    pub fn new(n: i64) -> Result<Self> {
        if !DOMAIN.contains(&n) {
            return Err(OlympiaError::domain(Self::NAME, "n", n, "n in [3, 30]"));
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> i64 {
        self.n
    }

    /// `[1, 2, 3]`, then each step appends the running total, which doubles it.
    fn chain(n: i64) -> Vec<i64> {
        if n <= 3 {
            return vec![1, 2, 3];
        }
        let mut chain = Self::chain(n - 1);
        let total: i64 = chain.iter().sum();
        chain.push(total);
        chain
    }
}

impl LayeredCheck for DivisorChain {
    type Answer = Vec<i64>;

    fn read_format(&self, candidate: &Value) -> std::result::Result<Vec<i64>, Rejection> {
        read_integer_list(candidate)
    }

    fn check_structure(&self, answer: &Vec<i64>) -> std::result::Result<(), Rejection> {
        require_length(answer, self.n as usize)?;
        if let Some(v) = answer.iter().find(|v| **v <= 0) {
            return Err(Rejection::format(format!("{v} is not a positive integer")));
        }
        require_distinct(answer)
    }

    fn check_solution(&self, answer: &Vec<i64>) -> std::result::Result<(), Rejection> {
        let total: i128 = answer.iter().map(|v| i128::from(*v)).sum();
        match answer.iter().find(|v| total % i128::from(**v) != 0) {
            Some(v) => Err(Rejection::solution(format!("{v} does not divide the total {total}"))),
            None => Ok(()),
        }
    }
}

impl Problem for DivisorChain {
    fn family(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> Parameters {
        Parameters::new().with("n", self.n)
    }

    fn check(&self, candidate: &Value) -> VerificationOutcome {
        run_layers(self, Self::NAME, candidate)
    }

    fn canonical_solution(&self) -> Value {
        json!(Self::chain(self.n))
    }
}

impl ProblemFamily for DivisorChain {
    const NAME: &'static str = "divisor_chain";

    fn descriptor() -> DescriptorSpec {
        DescriptorSpec {
            statement_template: "Find {n} pairwise distinct positive integers such that each of \
                them divides the sum of all {n}.",
            answer_shape: AnswerShape::IntegerList,
            parameters: &["n"],
            source: None,
            problem_url: None,
            solution_url: None,
            original_parameters: Parameters::new().with("n", 5),
            original_solution: json!([1, 2, 3, 6, 12]),
            tags: &[Tag::NumberTheory, Tag::Construction, Tag::IsGeneralized],
        }
    }

    fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            n: sample_in(rng, DOMAIN),
        }
    }

    fn from_parameters(params: &Parameters) -> Result<Self> {
        Self::new(params.require(Self::NAME, "n")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutcomeTag;

    #[test]
    fn test_chain_is_recursive() {
        assert_eq!(DivisorChain::chain(3), vec![1, 2, 3]);
        assert_eq!(DivisorChain::chain(6), vec![1, 2, 3, 6, 12, 24]);
        assert_eq!(*DivisorChain::chain(30).last().unwrap(), 3 << 27);
    }

    #[test]
    fn test_canonical_passes_for_whole_domain() {
        for n in DOMAIN {
            let problem = DivisorChain::new(n).unwrap();
            let outcome = problem.check(&problem.canonical_solution());
            assert!(outcome.accepted(), "n = {n}: {}", outcome.message());
        }
    }

    #[test]
    fn test_layers() {
        let problem = DivisorChain::new(4).unwrap();
        assert_eq!(problem.check(&json!([1, 2, 3])).diagnostic(), OutcomeTag::IncorrectLength);
        assert_eq!(problem.check(&json!([1, 2, 3, 3])).diagnostic(), OutcomeTag::IncorrectFormat);
        assert_eq!(problem.check(&json!([0, 1, 2, 3])).diagnostic(), OutcomeTag::IncorrectFormat);
        assert_eq!(problem.check(&json!([1, 2, 3, 4])).diagnostic(), OutcomeTag::IncorrectSolution);
        assert!(problem.check(&json!([6, 3, 2, 1])).accepted());
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let problem = DivisorChain::new(3).unwrap();
        let outcome = problem.check(&json!([i64::MAX, i64::MAX - 1, i64::MAX - 2]));
        assert_eq!(outcome.diagnostic(), OutcomeTag::IncorrectSolution);
    }
}
