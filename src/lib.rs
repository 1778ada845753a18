//! olympia - Parameterized olympiad problems with mechanical verification.
//!
//! ## Architecture
//!
//! A problem *family* is a statement template plus a parameter domain. The
//! harness samples or constructs instances, renders their statements and
//! judges candidate answers:
//! - **Registry**: name → family dispatch with injected formatting instructions
//! - **Layered check**: format → structure → solution, first failure wins
//! - **Self-test**: every family must accept its own canonical answers
//!
//! ## Verdicts
//!
//! Every check returns `(accepted, message, diagnostic)` with the diagnostic
//! drawn from `CORRECT`, `INCORRECT_FORMAT`, `INCORRECT_LENGTH`,
//! `INCORRECT_SOLUTION`. Malformed answers are verdicts, never errors.
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Compile-time enforced invariants (types, enums)
//! - B_i (Beliefs): Runtime fallible operations (Result, Option)
//! - I^R (Resolvable): Instruction overrides and self-test settings
//! - I^B (Bounded): Candidate answers of unknown shape (verdicts, not panics)

pub mod families;
pub mod models;
pub mod pipeline;
pub mod problem;
pub mod selftest;
pub mod symbolic;

// Re-exports for convenience
pub use families::default_registry;
pub use models::{
    HarnessConfig, InstructionCatalog, OlympiaError, OutcomeTag, Parameters, ProblemConfig,
    Result, Tag, VerificationOutcome,
};
pub use pipeline::{BatchVerifier, LayeredCheck};
pub use problem::{FamilyRegistry, Problem, ProblemFamily};
pub use selftest::{SelfTestOptions, SelfTestReport};
pub use symbolic::{ExpressionParser, LatexParser};
