//! Canonical-solution self-test.
//!
//! Every family must accept its own answers. For each registered family the
//! harness checks:
//! - the descriptor's `original_solution` on the original instance
//! - the canonical solution on the original instance
//! - the canonical solution on `samples` generated instances, sample `i`
//!   drawn from `StdRng::seed_from_u64(base_seed + i)`
//! - that generated parameters are accepted back by `instantiate`
//! - that the canonical solution is the same on every call

use crate::models::{Parameters, SelfTestConfig};
use crate::problem::{FamilyEntry, FamilyRegistry, Problem};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Self-test knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTestOptions {
    /// Generated instances per varying family
    pub samples: usize,
    pub base_seed: u64,
}

impl Default for SelfTestOptions {
    fn default() -> Self {
        Self::from(&SelfTestConfig::default())
    }
}

impl From<&SelfTestConfig> for SelfTestOptions {
    fn from(config: &SelfTestConfig) -> Self {
        Self {
            samples: config.samples,
            base_seed: config.base_seed,
        }
    }
}

/// Which property a failure violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfTestCheck {
    /// The original instance could not be constructed
    Construction,
    OriginalSolution,
    CanonicalOnOriginal,
    CanonicalOnGenerated,
    /// Generated parameters were refused by `instantiate`
    ParameterRoundTrip,
    Idempotence,
}

impl fmt::Display for SelfTestCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Construction => "construction",
            Self::OriginalSolution => "original solution",
            Self::CanonicalOnOriginal => "canonical on original",
            Self::CanonicalOnGenerated => "canonical on generated",
            Self::ParameterRoundTrip => "parameter round trip",
            Self::Idempotence => "idempotence",
        };
        f.write_str(name)
    }
}

/// One failed property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfTestFailure {
    pub family: String,
    pub check: SelfTestCheck,
    pub parameters: Parameters,
    /// Seed of the generated instance, `None` for the original
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub message: String,
}

/// Per-family summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilySelfTest {
    pub family: String,
    pub supports_variation: bool,
    /// Instances checked, original included
    pub instances: usize,
    pub failures: usize,
}

impl FamilySelfTest {
    pub fn passed(&self) -> bool {
        self.failures == 0
    }
}

/// Result of a self-test run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelfTestReport {
    pub families: Vec<FamilySelfTest>,
    pub failures: Vec<SelfTestFailure>,
}

impl SelfTestReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Instances checked across all families.
    pub fn total_instances(&self) -> usize {
        self.families.iter().map(|f| f.instances).sum()
    }
}

/// Collects failures for one family.
struct FamilyRun<'a> {
    family: &'a str,
    instances: usize,
    failures: Vec<SelfTestFailure>,
}

impl<'a> FamilyRun<'a> {
    fn fail(&mut self, check: SelfTestCheck, parameters: Parameters, seed: Option<u64>, message: impl Into<String>) {
        let message = message.into();
        warn!(family = self.family, check = %check, seed = ?seed, reason = %message, "Self-test failure");
        self.failures.push(SelfTestFailure {
            family: self.family.to_string(),
            check,
            parameters,
            seed,
            message,
        });
    }

    /// Canonical solution passes and is stable across calls.
    fn check_canonical(&mut self, problem: &dyn Problem, check: SelfTestCheck, seed: Option<u64>) {
        self.instances += 1;
        let solution = problem.canonical_solution();
        let outcome = problem.check(&solution);
        if !outcome.accepted() {
            self.fail(
                check,
                problem.parameters(),
                seed,
                format!("{} ({})", outcome.message(), outcome.diagnostic()),
            );
        }
        if problem.canonical_solution() != solution {
            self.fail(
                SelfTestCheck::Idempotence,
                problem.parameters(),
                seed,
                "canonical solution changed between calls",
            );
        }
    }
}

fn run_family(entry: &FamilyEntry, options: &SelfTestOptions) -> (FamilySelfTest, Vec<SelfTestFailure>) {
    let mut run = FamilyRun {
        family: entry.name(),
        instances: 0,
        failures: Vec::new(),
    };

    match entry.original() {
        Ok(original) => {
            let outcome = original.check(&entry.config().original_solution);
            if !outcome.accepted() {
                run.fail(
                    SelfTestCheck::OriginalSolution,
                    original.parameters(),
                    None,
                    outcome.message(),
                );
            }
            run.check_canonical(original.as_ref(), SelfTestCheck::CanonicalOnOriginal, None);
        }
        Err(e) => run.fail(
            SelfTestCheck::Construction,
            entry.config().original_parameters.clone(),
            None,
            e.to_string(),
        ),
    }

    if entry.supports_variation() {
        for i in 0..options.samples {
            let seed = options.base_seed.wrapping_add(i as u64);
            let mut rng = StdRng::seed_from_u64(seed);
            let problem = entry.generate(&mut rng);
            if let Err(e) = entry.instantiate(&problem.parameters()) {
                run.fail(SelfTestCheck::ParameterRoundTrip, problem.parameters(), Some(seed), e.to_string());
            }
            run.check_canonical(problem.as_ref(), SelfTestCheck::CanonicalOnGenerated, Some(seed));
        }
    }

    debug!(
        family = run.family,
        instances = run.instances,
        failures = run.failures.len(),
        "Family self-test done"
    );

    let summary = FamilySelfTest {
        family: entry.name().to_string(),
        supports_variation: entry.supports_variation(),
        instances: run.instances,
        failures: run.failures.len(),
    };
    (summary, run.failures)
}

/// Run the self-test over every family in `registry`.
pub fn run(registry: &FamilyRegistry, options: &SelfTestOptions) -> SelfTestReport {
    info!(
        families = registry.len(),
        samples = options.samples,
        base_seed = options.base_seed,
        "Starting self-test"
    );

    let mut report = SelfTestReport::default();
    for entry in registry.entries() {
        let (summary, failures) = run_family(entry, options);
        report.families.push(summary);
        report.failures.extend(failures);
    }

    info!(
        instances = report.total_instances(),
        failures = report.failures.len(),
        passed = report.passed(),
        "Self-test complete"
    );
    report
}
