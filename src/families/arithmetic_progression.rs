//! Arithmetic progression in the unit interval with a prescribed sum.
//!
//! Real-valued: every comparison uses `TOLERANCE`.

use super::sample_in;
use crate::models::{AnswerShape, DescriptorSpec, OlympiaError, Parameters, Result, Tag, VerificationOutcome};
use crate::pipeline::{read_real_list, require_length, run_layers, LayeredCheck, Rejection, Tolerance};
use crate::problem::{Problem, ProblemFamily};
use rand::Rng;
use serde_json::{json, Value};
use std::ops::RangeInclusive;

const DOMAIN: RangeInclusive<i64> = 3..=20;

/// Absolute tolerance; the quantities involved are all of order 1.
pub const TOLERANCE: Tolerance = Tolerance(1e-3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticProgressionSum {
    n: i64,
}

impl ArithmeticProgressionSum {
    pub fn new(n: i64) -> Result<Self> {
        if !DOMAIN.contains(&n) {
            return Err(OlympiaError::domain(Self::NAME, "n", n, "n in [3, 20]"));
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> i64 {
        self.n
    }

    fn len(&self) -> usize {
        self.n as usize
    }

    fn target_sum(&self) -> f64 {
        self.n as f64 / 2.0
    }
}

impl LayeredCheck for ArithmeticProgressionSum {
    type Answer = Vec<f64>;

    fn read_format(&self, candidate: &Value) -> std::result::Result<Vec<f64>, Rejection> {
        read_real_list(candidate)
    }

    fn check_structure(&self, answer: &Vec<f64>) -> std::result::Result<(), Rejection> {
        require_length(answer, self.len())?;
        let tol = TOLERANCE.value();
        if let Some(v) = answer.iter().find(|v| **v < -tol || **v > 1.0 + tol) {
            return Err(Rejection::format(format!("{v} is outside [0, 1]")));
        }
        for (i, a) in answer.iter().enumerate() {
            for b in &answer[i + 1..] {
                if TOLERANCE.approx_eq(*a, *b) {
                    return Err(Rejection::format(format!(
                        "{a} and {b} are not distinct (tolerance {tol})"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_solution(&self, answer: &Vec<f64>) -> std::result::Result<(), Rejection> {
        let diffs: Vec<f64> = answer.windows(2).map(|w| w[1] - w[0]).collect();
        let first = diffs[0];
        if let Some((i, d)) = diffs
            .iter()
            .enumerate()
            .find(|(_, d)| !TOLERANCE.approx_eq(**d, first))
        {
            return Err(Rejection::solution(format!(
                "difference {d:.6} at position {} differs from common difference {first:.6}",
                i + 1
            )));
        }
        let sum: f64 = answer.iter().sum();
        if !TOLERANCE.approx_eq(sum, self.target_sum()) {
            return Err(Rejection::solution(format!(
                "sum {sum:.6} differs from {}",
                self.target_sum()
            )));
        }
        Ok(())
    }
}

impl Problem for ArithmeticProgressionSum {
    fn family(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> Parameters {
        Parameters::new().with("n", self.n)
    }

    fn check(&self, candidate: &Value) -> VerificationOutcome {
        run_layers(self, Self::NAME, candidate)
    }

    /// `x_i = i / (n - 1)`: spans the interval, sum `n / 2`.
    fn canonical_solution(&self) -> Value {
        let steps = (self.n - 1) as f64;
        json!((0..self.n).map(|i| i as f64 / steps).collect::<Vec<f64>>())
    }
}

impl ProblemFamily for ArithmeticProgressionSum {
    const NAME: &'static str = "arithmetic_progression_sum";

    fn descriptor() -> DescriptorSpec {
        DescriptorSpec {
            statement_template: "Find {n} pairwise distinct real numbers in the interval $[0, 1]$ \
                which, in the order given, form an arithmetic progression and whose sum is \
                $\\frac{{n}}{2}$.",
            answer_shape: AnswerShape::RealList,
            parameters: &["n"],
            source: None,
            problem_url: None,
            solution_url: None,
            original_parameters: Parameters::new().with("n", 9),
            original_solution: json!([0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0]),
            tags: &[Tag::Algebra, Tag::Sequences, Tag::Construction, Tag::IsGeneralized],
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
