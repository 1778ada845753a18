//! Problem instance contract.
//!
//! Provides:
//! - `Problem`: object-safe operations on a bound instance
//! - `ProblemFamily`: static operations of a family (descriptor, sampling,
//!   explicit construction)
//! - `FamilyRegistry`: explicit name → family dispatch
//!
//! K_i: Instances own only their parameter values and are never mutated.
//! Sampling goes through an explicit `Rng` so a fixed seed reproduces the
//! same instance.

mod registry;
mod template;

pub use registry::*;
pub use template::*;

use crate::models::{DescriptorSpec, Parameters, ProblemConfig, Result, VerificationOutcome};
use rand::Rng;
use serde_json::Value;
use std::fmt::Debug;

/// A fully bound member of a family.
pub trait Problem: Debug + Send + Sync {
    /// Name of the family this instance belongs to.
    fn family(&self) -> &'static str;

    /// Bound parameter values.
    fn parameters(&self) -> Parameters;

    /// Judge a candidate answer. Never fails: malformed candidates are
    /// `INCORRECT_FORMAT` verdicts.
    fn check(&self, candidate: &Value) -> VerificationOutcome;

    /// A deterministic answer known to pass `check`.
    fn canonical_solution(&self) -> Value;

    /// Substitute the parameters into the family's statement template.
    fn render_statement(&self, config: &ProblemConfig) -> String {
        render_template(&config.statement_template, &self.parameters())
    }
}

/// Static side of a family.
pub trait ProblemFamily: Problem + Sized + 'static {
    /// Stable unique family name.
    const NAME: &'static str;

    /// Static descriptor data.
    fn descriptor() -> DescriptorSpec;

    /// Sample an instance from the family's domain.
    fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Construct an instance from explicit parameters.
    ///
    /// Out-of-domain values are `OlympiaError::ParameterDomain`.
    fn from_parameters(params: &Parameters) -> Result<Self>;

    /// Whether `generate` can produce more than one instance.
    fn supports_variation() -> bool {
        true
    }
}
