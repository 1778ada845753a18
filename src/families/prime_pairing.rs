//! Pairing `1..=n` so that every pair sums to a prime.
//!
//! `n` must be even. An odd `n` is a construction error, not a verdict.

use super::is_prime;
use crate::models::{AnswerShape, DescriptorSpec, OlympiaError, Parameters, Result, Tag, VerificationOutcome};
use crate::pipeline::{read_pair_list, require_distinct, require_length, require_range, run_layers, LayeredCheck, Rejection};
use crate::problem::{Problem, ProblemFamily};
use rand::Rng;
use serde_json::{json, Value};

const MIN_N: i64 = 2;
const MAX_N: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeSumPairing {
    n: i64,
}

fn in_domain(n: i64) -> bool {
    (MIN_N..=MAX_N).contains(&n) && n % 2 == 0
}

impl PrimeSumPairing {
    pub fn new(n: i64) -> Result<Self> {
        if !in_domain(n) {
            return Err(OlympiaError::domain(Self::NAME, "n", n, "even n in [2, 100]"));
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> i64 {
        self.n
    }

    /// Pair `k` with `p - k` for the smallest prime `p > n`, which covers
    /// `p - n ..= n`; the even-sized rest `1 ..= p - n - 1` is paired the
    /// same way.
    fn pairing(n: i64) -> Vec<(i64, i64)> {
        if n <= 0 {
            return Vec::new();
        }
        let p = (n + 1..).find(|&m| is_prime(m)).unwrap_or(n + 1);
        let mut pairs: Vec<(i64, i64)> = (p - n..)
            .take_while(|&k| 2 * k < p)
            .map(|k| (k, p - k))
            .collect();
        pairs.extend(Self::pairing(p - n - 1));
        pairs
    }
}

impl LayeredCheck for PrimeSumPairing {
    type Answer = Vec<(i64, i64)>;

    fn read_format(&self, candidate: &Value) -> std::result::Result<Self::Answer, Rejection> {
        read_pair_list(candidate)
    }

    fn check_structure(&self, answer: &Self::Answer) -> std::result::Result<(), Rejection> {
        require_length(answer, (self.n / 2) as usize)?;
        let numbers: Vec<i64> = answer.iter().flat_map(|(a, b)| [*a, *b]).collect();
        require_range(&numbers, 1, self.n)?;
        require_distinct(&numbers)
    }

    fn check_solution(&self, answer: &Self::Answer) -> std::result::Result<(), Rejection> {
        match answer.iter().find(|(a, b)| !is_prime(a + b)) {
            Some((a, b)) => Err(Rejection::solution(format!(
                "{a} + {b} = {} is not prime",
                a + b
            ))),
            None => Ok(()),
        }
    }
}

impl Problem for PrimeSumPairing {
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
        let pairs: Vec<[i64; 2]> = Self::pairing(self.n).into_iter().map(|(a, b)| [a, b]).collect();
        json!(pairs)
    }
}

impl ProblemFamily for PrimeSumPairing {
    const NAME: &'static str = "prime_sum_pairing";

    fn descriptor() -> DescriptorSpec {
        DescriptorSpec {
            statement_template: "Partition the integers $1, 2, \\ldots, {n}$ into pairs such that \
                the sum of the two numbers in every pair is a prime.",
            answer_shape: AnswerShape::PairList,
            parameters: &["n"],
            source: None,
            problem_url: None,
            solution_url: None,
            original_parameters: Parameters::new().with("n", 10),
            original_solution: json!([[1, 10], [2, 9], [3, 8], [4, 7], [5, 6]]),
            tags: &[Tag::NumberTheory, Tag::Combinatorics, Tag::Construction, Tag::IsGeneralized],
        }
    }

    fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // Even values only: sample the half and double it
        let half = rng.gen_range(MIN_N / 2..=MAX_N / 2);
        Self { n: 2 * half }
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
    fn test_odd_n_is_a_construction_error() {
        let err = PrimeSumPairing::new(7).unwrap_err();
        assert!(matches!(err, OlympiaError::ParameterDomain { value: 7, .. }));
        assert!(PrimeSumPairing::from_parameters(&Parameters::new().with("n", 9)).is_err());
    }

    #[test]
    fn test_pairing_small_cases() {
        assert_eq!(PrimeSumPairing::pairing(2), vec![(1, 2)]);
        // p = 11 covers everything for n = 10
        assert_eq!(
            PrimeSumPairing::pairing(10),
            vec![(1, 10), (2, 9), (3, 8), (4, 7), (5, 6)]
        );
        // p = 11 covers 3..=8, then 1..=2 with p = 3
        assert_eq!(
            PrimeSumPairing::pairing(8),
            vec![(3, 8), (4, 7), (5, 6), (1, 2)]
        );
    }

    #[test]
    fn test_canonical_passes_for_whole_domain() {
        for n in (MIN_N..=MAX_N).step_by(2) {
            let problem = PrimeSumPairing::new(n).unwrap();
            let outcome = problem.check(&problem.canonical_solution());
            assert!(outcome.accepted(), "n = {n}: {}", outcome.message());
        }
    }

    #[test]
    fn test_layers() {
        let problem = PrimeSumPairing::new(4).unwrap();
        assert!(problem.check(&json!([[1, 4], [2, 3]])).accepted());
        assert_eq!(problem.check(&json!([[1, 4]])).diagnostic(), OutcomeTag::IncorrectLength);
        assert_eq!(problem.check(&json!([[1, 4], [1, 4]])).diagnostic(), OutcomeTag::IncorrectFormat);
        assert_eq!(problem.check(&json!([[1, 4], [2, 5]])).diagnostic(), OutcomeTag::IncorrectFormat);
        assert_eq!(problem.check(&json!([[1, 3], [2, 4]])).diagnostic(), OutcomeTag::IncorrectSolution);
        assert_eq!(problem.check(&json!([1, 2, 3, 4])).diagnostic(), OutcomeTag::IncorrectFormat);
    }

    #[test]
    fn test_generate_is_always_even() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let n = PrimeSumPairing::generate(&mut rng).n();
            assert!(in_domain(n), "n = {n}");
        }
    }
}
