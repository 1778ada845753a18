//! Closed form of `1^p + 2^p + ... + n^p`.
//!
//! Any expression equal to the sum as a function of `n` is accepted. The
//! check is the telescoping identity `C(n) - C(n - 1) = n^p` together with
//! `C(0) = 0`, decided exactly on rational functions.

use super::{read_symbolic, sample_in, vanishes};
use crate::models::{AnswerShape, DescriptorSpec, OlympiaError, Parameters, Result, Tag, VerificationOutcome};
use crate::pipeline::{run_layers, LayeredCheck, Rejection};
use crate::problem::{Problem, ProblemFamily};
use crate::symbolic::Expr;
use rand::Rng;
use serde_json::{json, Value};
use std::ops::RangeInclusive;

const DOMAIN: RangeInclusive<i64> = 1..=4;

const VARIABLE: &str = "n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerSumClosedForm {
    p: i64,
}

impl PowerSumClosedForm {
    pub fn new(p: i64) -> Result<Self> {
        if !DOMAIN.contains(&p) {
            return Err(OlympiaError::domain(Self::NAME, "p", p, "p in [1, 4]"));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> i64 {
        self.p
    }
}

impl LayeredCheck for PowerSumClosedForm {
    type Answer = Expr;

    fn read_format(&self, candidate: &Value) -> std::result::Result<Expr, Rejection> {
        read_symbolic(candidate, &[VARIABLE])
    }

    fn check_solution(&self, answer: &Expr) -> std::result::Result<(), Rejection> {
        let n = Expr::symbol(VARIABLE);
        let previous = answer.substitute(VARIABLE, &Expr::sub(n.clone(), Expr::number(1)));
        let step = Expr::sub(
            Expr::sub(answer.clone(), previous),
            Expr::pow(n, Expr::number(i128::from(self.p))),
        );
        if !vanishes(&step)? {
            return Err(Rejection::solution(format!(
                "C(n) - C(n-1) is not n^{}",
                self.p
            )));
        }
        if !vanishes(&answer.substitute(VARIABLE, &Expr::number(0)))? {
            return Err(Rejection::solution("C(0) is not 0"));
        }
        Ok(())
    }
}

impl Problem for PowerSumClosedForm {
    fn family(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> Parameters {
        Parameters::new().with("p", self.p)
    }

    fn check(&self, candidate: &Value) -> VerificationOutcome {
        run_layers(self, Self::NAME, candidate)
    }

    fn canonical_solution(&self) -> Value {
        let text = match self.p {
            1 => "\\frac{n(n+1)}{2}",
            2 => "\\frac{n(n+1)(2n+1)}{6}",
            3 => "\\left(\\frac{n(n+1)}{2}\\right)^2",
            _ => "\\frac{n(n+1)(2n+1)(3n^2+3n-1)}{30}",
        };
        json!(text)
    }
}

impl ProblemFamily for PowerSumClosedForm {
    const NAME: &'static str = "power_sum_closed_form";

    fn descriptor() -> DescriptorSpec {
        DescriptorSpec {
            statement_template: "Find a closed-form expression in $n$ for the sum \
                $1^{p} + 2^{p} + \\cdots + n^{p}$, valid for every positive integer $n$.",
            answer_shape: AnswerShape::Expression,
            parameters: &["p"],
            source: None,
            problem_url: None,
            solution_url: None,
            original_parameters: Parameters::new().with("p", 2),
            original_solution: json!("\\frac{n(n+1)(2n+1)}{6}"),
            tags: &[Tag::Algebra, Tag::Sequences, Tag::ClosedForm, Tag::IsGeneralized],
        }
    }

    fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            p: sample_in(rng, DOMAIN),
        }
    }

    fn from_parameters(params: &Parameters) -> Result<Self> {
        Self::new(params.require(Self::NAME, "p")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutcomeTag;

    #[test]
    fn test_canonical_passes_for_every_power() {
        for p in DOMAIN {
            let problem = PowerSumClosedForm::new(p).unwrap();
            let outcome = problem.check(&problem.canonical_solution());
            assert!(outcome.accepted(), "p = {p}: {}", outcome.message());
        }
    }

    #[test]
    fn test_equivalent_forms_accepted() {
        let problem = PowerSumClosedForm::new(2).unwrap();
        assert!(problem.check(&json!("\\frac{2n^3+3n^2+n}{6}")).accepted());
        assert!(problem.check(&json!("$\\frac{1}{3}n^3 + \\frac{1}{2}n^2 + \\frac{1}{6}n$")).accepted());
        assert!(problem.check(&json!("S(n) = n(n+1)(2n+1)/6")).accepted());
        assert!(problem.check(&json!("\\boxed{\\dfrac{n(n+1)(2n+1)}{6}}")).accepted());
    }

    #[test]
    fn test_wrong_forms_rejected() {
        let problem = PowerSumClosedForm::new(1).unwrap();
        assert_eq!(problem.check(&json!("n^2/2")).diagnostic(), OutcomeTag::IncorrectSolution);
        // Right increments, wrong constant
        let outcome = problem.check(&json!("\\frac{n(n+1)}{2} + 1"));
        assert_eq!(outcome.diagnostic(), OutcomeTag::IncorrectSolution);
        assert_eq!(outcome.message(), "C(0) is not 0");
    }

    #[test]
    fn test_unreadable_forms_are_format() {
        let problem = PowerSumClosedForm::new(1).unwrap();
        for candidate in ["\\frac{k(k+1)}{2}", "\\sqrt{n}", "n^{1/2}", "", "\\boxed{}"] {
            assert_eq!(
                problem.check(&json!(candidate)).diagnostic(),
                OutcomeTag::IncorrectFormat,
                "{candidate}"
            );
        }
        assert_eq!(problem.check(&json!([1, 2])).diagnostic(), OutcomeTag::IncorrectFormat);
    }

    #[test]
    fn test_domain() {
        assert!(PowerSumClosedForm::new(0).is_err());
        assert!(PowerSumClosedForm::new(5).is_err());
    }
}
