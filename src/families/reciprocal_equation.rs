//! IMO 1983 Problem 1: `f(x f(y)) = y f(x)` with `f(x) → 0` as `x → ∞`.
//!
//! The unique solution is `f(x) = 1/x`. The family has no parameters and
//! does not vary.

use super::{read_symbolic, vanishes};
use crate::models::{AnswerShape, DescriptorSpec, Parameters, Result, Tag, VerificationOutcome};
use crate::pipeline::{run_layers, LayeredCheck, Rejection};
use crate::problem::{Problem, ProblemFamily};
use crate::symbolic::Expr;
use rand::Rng;
use serde_json::{json, Value};

const VARIABLE: &str = "x";

/// Fresh symbol for the second argument.
const SECOND: &str = "y";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReciprocalFunctionalEquation;

impl ReciprocalFunctionalEquation {
    fn apply(f: &Expr, argument: &Expr) -> Expr {
        f.substitute(VARIABLE, argument)
    }
}

impl LayeredCheck for ReciprocalFunctionalEquation {
    type Answer = Expr;

    fn read_format(&self, candidate: &Value) -> std::result::Result<Expr, Rejection> {
        read_symbolic(candidate, &[VARIABLE])
    }

    fn check_solution(&self, f: &Expr) -> std::result::Result<(), Rejection> {
        let x = Expr::symbol(VARIABLE);
        let y = Expr::symbol(SECOND);
        let f_y = Self::apply(f, &y);

        // f(x f(y)) - y f(x)
        let equation = Expr::sub(
            Self::apply(f, &Expr::mul(x.clone(), f_y)),
            Expr::mul(y, f.clone()),
        );
        if !vanishes(&equation)? {
            return Err(Rejection::solution("f(x f(y)) = y f(x) does not hold identically"));
        }

        // Among the solutions of the equation only x f(x) = 1 tends to 0.
        let product = Expr::sub(Expr::mul(x, f.clone()), Expr::number(1));
        if !vanishes(&product)? {
            return Err(Rejection::solution(
                "satisfies the equation but f(x) does not tend to 0",
            ));
        }
        Ok(())
    }
}

impl Problem for ReciprocalFunctionalEquation {
    fn family(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
    }

    fn check(&self, candidate: &Value) -> VerificationOutcome {
        run_layers(self, Self::NAME, candidate)
    }

    fn canonical_solution(&self) -> Value {
        json!("1/x")
    }
}

impl ProblemFamily for ReciprocalFunctionalEquation {
    const NAME: &'static str = "reciprocal_functional_equation";

    fn descriptor() -> DescriptorSpec {
        DescriptorSpec {
            statement_template: "Find all functions $f$ defined on the positive real numbers and \
                taking positive real values such that $f(x f(y)) = y f(x)$ for all positive $x$ \
                and $y$, and $f(x) \\to 0$ as $x \\to \\infty$.",
            answer_shape: AnswerShape::Expression,
            parameters: &[],
            source: Some("IMO 1983 Problem 1"),
            problem_url: Some("https://artofproblemsolving.com/wiki/index.php/1983_IMO_Problems/Problem_1"),
            solution_url: None,
            original_parameters: Parameters::new(),
            original_solution: json!("1/x"),
            tags: &[Tag::Algebra, Tag::FunctionalEquation, Tag::IsOriginal],
        }
    }

    fn generate<R: Rng + ?Sized>(_rng: &mut R) -> Self {
        Self
    }

    fn from_parameters(_params: &Parameters) -> Result<Self> {
        Ok(Self)
    }

    fn supports_variation() -> bool {
        false
    }
}
