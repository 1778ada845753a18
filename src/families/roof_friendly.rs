//! Roof-friendly pairs: count pairs `a < b ≤ n` with `(a + b) | ab`.

use super::sample_in;
use crate::models::{AnswerShape, DescriptorSpec, OlympiaError, Parameters, Result, Tag, VerificationOutcome};
use crate::pipeline::{read_integer, run_layers, LayeredCheck, Rejection};
use crate::problem::{Problem, ProblemFamily};
use rand::Rng;
use serde_json::{json, Value};
use std::ops::RangeInclusive;

const DOMAIN: RangeInclusive<i64> = 20..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoofFriendlyPairs {
    n: i64,
}

impl RoofFriendlyPairs {
    pub fn new(n: i64) -> Result<Self> {
        if !DOMAIN.contains(&n) {
            return Err(OlympiaError::domain(Self::NAME, "n", n, "n in [20, 100]"));
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> i64 {
        self.n
    }

    fn count(&self) -> i64 {
        let mut count = 0;
        for b in 2..=self.n {
            for a in 1..b {
                if (a * b) % (a + b) == 0 {
                    count += 1;
                }
            }
        }
        count
    }
}

impl LayeredCheck for RoofFriendlyPairs {
    type Answer = i64;

    fn read_format(&self, candidate: &Value) -> std::result::Result<i64, Rejection> {
        read_integer(candidate)
    }

    fn check_structure(&self, answer: &i64) -> std::result::Result<(), Rejection> {
        if *answer < 0 {
            return Err(Rejection::format(format!("a count cannot be negative, got {answer}")));
        }
        Ok(())
    }

    fn check_solution(&self, answer: &i64) -> std::result::Result<(), Rejection> {
        let expected = self.count();
        if *answer == expected {
            Ok(())
        } else {
            Err(Rejection::solution(format!(
                "{answer} is not the number of roof-friendly pairs up to {}",
                self.n
            )))
        }
    }
}

impl Problem for RoofFriendlyPairs {
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
        json!(self.count())
    }
}

impl ProblemFamily for RoofFriendlyPairs {
    const NAME: &'static str = "roof_friendly_pairs";

    fn descriptor() -> DescriptorSpec {
        DescriptorSpec {
            statement_template: "Call a pair of positive integers $(a, b)$ with $a < b$ roof-friendly \
                if $a + b$ divides $ab$. How many roof-friendly pairs satisfy $b \\le {n}$?",
            answer_shape: AnswerShape::Integer,
            parameters: &["n"],
            source: Some("Regional Olympiad, pairs with divisible sum"),
            problem_url: None,
            solution_url: None,
            original_parameters: Parameters::new().with("n", 20),
            original_solution: json!(6),
            tags: &[Tag::NumberTheory, Tag::Combinatorics, Tag::IsGeneralized],
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
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_known_counts() {
        assert_eq!(RoofFriendlyPairs::new(20).unwrap().count(), 6);
        assert_eq!(RoofFriendlyPairs::new(100).unwrap().count(), 60);
    }

    #[test]
    fn test_check_layers() {
        let problem = RoofFriendlyPairs::new(20).unwrap();
        assert!(problem.check(&json!(6)).accepted());
        assert!(problem.check(&json!("6")).accepted());
        assert_eq!(problem.check(&json!(7)).diagnostic(), OutcomeTag::IncorrectSolution);
        assert_eq!(problem.check(&json!(-6)).diagnostic(), OutcomeTag::IncorrectFormat);
        assert_eq!(problem.check(&json!("six")).diagnostic(), OutcomeTag::IncorrectFormat);
    }

    #[test]
    fn test_domain_enforced() {
        assert!(matches!(
            RoofFriendlyPairs::new(19),
            Err(OlympiaError::ParameterDomain { .. })
        ));
        assert!(RoofFriendlyPairs::new(101).is_err());
    }

    #[test]
    fn test_generate_stays_in_domain() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..1000 {
            let n = RoofFriendlyPairs::generate(&mut rng).n();
            assert!((20..=100).contains(&n), "n = {n}");
        }
    }

    #[test]
    fn test_statement_mentions_bound() {
        let config = crate::models::ProblemConfig::from_spec(
            RoofFriendlyPairs::NAME,
            RoofFriendlyPairs::descriptor(),
            &crate::models::InstructionCatalog::default(),
        )
        .unwrap();
        let statement = RoofFriendlyPairs::new(37).unwrap().render_statement(&config);
        assert!(statement.contains("$b \\le 37$"));
    }
}
