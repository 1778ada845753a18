//! Probability that two distinct numbers drawn from `1..=n` have an even sum.

use super::sample_in;
use crate::models::{AnswerShape, DescriptorSpec, OlympiaError, Parameters, Result, Tag, VerificationOutcome};
use crate::pipeline::{read_fraction, run_layers, LayeredCheck, Rejection};
use crate::problem::{Problem, ProblemFamily};
use crate::symbolic::Rational;
use rand::Rng;
use serde_json::{json, Value};
use std::ops::RangeInclusive;

const DOMAIN: RangeInclusive<i64> = 2..=200;

/// `n = 2` is inside the range but degenerate: the only pair is `{1, 2}`,
/// so the probability is zero.
fn in_domain(n: i64) -> bool {
    DOMAIN.contains(&n) && n != 2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvenSumProbability {
    n: i64,
}

impl EvenSumProbability {
    pub fn new(n: i64) -> Result<Self> {
        if !in_domain(n) {
            return Err(OlympiaError::domain(Self::NAME, "n", n, "n in [2, 200], n != 2"));
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> i64 {
        self.n
    }

    /// `(C(e, 2) + C(o, 2)) / C(n, 2)` with `e` evens and `o` odds.
    fn probability(&self) -> Rational {
        let n = i128::from(self.n);
        let evens = n / 2;
        let odds = n - evens;
        let choose2 = |k: i128| k * (k - 1) / 2;
        // Denominator is positive for every n in the domain.
        Rational::new(choose2(evens) + choose2(odds), choose2(n)).unwrap_or(Rational::ZERO)
    }
}

impl LayeredCheck for EvenSumProbability {
    type Answer = Rational;

    fn read_format(&self, candidate: &Value) -> std::result::Result<Rational, Rejection> {
        read_fraction(candidate)
    }

    fn check_structure(&self, answer: &Rational) -> std::result::Result<(), Rejection> {
        if *answer < Rational::ZERO || *answer > Rational::ONE {
            return Err(Rejection::format(format!("{answer} is not a probability")));
        }
        Ok(())
    }

    fn check_solution(&self, answer: &Rational) -> std::result::Result<(), Rejection> {
        if *answer == self.probability() {
            Ok(())
        } else {
            Err(Rejection::solution(format!(
                "{answer} is not the probability for n = {}",
                self.n
            )))
        }
    }
}

impl Problem for EvenSumProbability {
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
        json!(self.probability().to_string())
    }
}

impl ProblemFamily for EvenSumProbability {
    const NAME: &'static str = "even_sum_probability";

    fn descriptor() -> DescriptorSpec {
        DescriptorSpec {
            statement_template: "Two distinct numbers are chosen uniformly at random from \
                $\\{1, 2, \\ldots, {n}\\}$. What is the probability that their sum is even? \
                Give the answer as a reduced fraction.",
            answer_shape: AnswerShape::Fraction,
            parameters: &["n"],
            source: None,
            problem_url: None,
            solution_url: None,
            original_parameters: Parameters::new().with("n", 10),
            original_solution: json!("4/9"),
            tags: &[Tag::Probability, Tag::Combinatorics, Tag::IsGeneralized],
        }
    }

    fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // Rejection sampling over the range skips the excluded value
        loop {
            let n = sample_in(rng, DOMAIN);
            if in_domain(n) {
                return Self { n };
            }
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
    fn test_known_probabilities() {
        assert_eq!(EvenSumProbability::new(10).unwrap().probability().to_string(), "4/9");
        assert_eq!(EvenSumProbability::new(3).unwrap().probability().to_string(), "1/3");
        assert_eq!(EvenSumProbability::new(4).unwrap().probability().to_string(), "1/3");
    }

    #[test]
    fn test_excluded_value_is_an_error() {
        assert!(matches!(
            EvenSumProbability::new(2),
            Err(OlympiaError::ParameterDomain { value: 2, .. })
        ));
        assert!(EvenSumProbability::new(201).is_err());
    }

    #[test]
    fn test_fraction_spellings() {
        let problem = EvenSumProbability::new(10).unwrap();
        assert!(problem.check(&json!("4/9")).accepted());
        assert!(problem.check(&json!("8/18")).accepted());
        assert!(problem.check(&json!("\\frac{4}{9}")).accepted());
        assert!(problem.check(&json!("\\boxed{\\dfrac{4}{9}}")).accepted());
        assert_eq!(problem.check(&json!("5/9")).diagnostic(), OutcomeTag::IncorrectSolution);
        assert_eq!(problem.check(&json!("9/4")).diagnostic(), OutcomeTag::IncorrectFormat);
        assert_eq!(problem.check(&json!("0.444")).diagnostic(), OutcomeTag::IncorrectFormat);
        assert_eq!(problem.check(&json!("4/0")).diagnostic(), OutcomeTag::IncorrectFormat);
    }

    #[test]
    fn test_generate_never_hits_excluded_value() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..1000 {
            let n = EvenSumProbability::generate(&mut rng).n();
            assert!(in_domain(n), "n = {n}");
        }
    }
}
