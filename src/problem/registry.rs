//! Family registry for dispatching by name.
//!
//! Epistemic foundation:
//! - K_i: Every registered family has a validated descriptor
//! - K_i: Names are unique within a registry
//! - B_i: A requested name may not be registered → Result
//! - I^R: Formatting instructions come from the injected catalog

use super::{Problem, ProblemFamily};
use crate::models::{
    InstructionCatalog, OlympiaError, Parameters, ProblemConfig, Result,
};
use rand::RngCore;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

type GenerateFn = fn(&mut dyn RngCore) -> Box<dyn Problem>;
type InstantiateFn = fn(&Parameters) -> Result<Box<dyn Problem>>;

/// One registered family: its descriptor plus type-erased constructors.
pub struct FamilyEntry {
    config: ProblemConfig,
    supports_variation: bool,
    generate: GenerateFn,
    instantiate: InstantiateFn,
}

impl FamilyEntry {
    pub fn config(&self) -> &ProblemConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn supports_variation(&self) -> bool {
        self.supports_variation
    }

    /// Sample an instance.
    pub fn generate(&self, rng: &mut dyn RngCore) -> Box<dyn Problem> {
        (self.generate)(rng)
    }

    /// Construct an instance from explicit parameters.
    pub fn instantiate(&self, params: &Parameters) -> Result<Box<dyn Problem>> {
        (self.instantiate)(params)
    }

    /// The descriptor's reference instance.
    pub fn original(&self) -> Result<Box<dyn Problem>> {
        self.instantiate(&self.config.original_parameters)
    }
}

impl fmt::Debug for FamilyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyEntry")
            .field("name", &self.config.name)
            .field("supports_variation", &self.supports_variation)
            .finish()
    }
}

fn generate_boxed<F: ProblemFamily>(rng: &mut dyn RngCore) -> Box<dyn Problem> {
    Box::new(F::generate(rng))
}

fn instantiate_boxed<F: ProblemFamily>(params: &Parameters) -> Result<Box<dyn Problem>> {
    Ok(Box::new(F::from_parameters(params)?))
}

/// Registry of problem families, keyed by name.
///
/// # Example
///
/// ```ignore
/// use olympia::{FamilyRegistry, InstructionCatalog};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let registry = olympia::families::default_registry(InstructionCatalog::default())?;
/// let entry = registry.get("roof_friendly_pairs")?;
/// let problem = entry.generate(&mut StdRng::seed_from_u64(7));
/// let statement = problem.render_statement(entry.config());
/// let outcome = problem.check(&serde_json::json!(6));
/// ```
#[derive(Debug)]
pub struct FamilyRegistry {
    catalog: InstructionCatalog,
    families: BTreeMap<String, FamilyEntry>,
}

impl FamilyRegistry {
    /// Empty registry; descriptors of registered families read their
    /// formatting instructions from `catalog`.
    pub fn new(catalog: InstructionCatalog) -> Self {
        Self {
            catalog,
            families: BTreeMap::new(),
        }
    }

    /// Register family `F`.
    ///
    /// # Errors
    ///
    /// Returns `OlympiaError::DuplicateFamily` if the name is taken and
    /// `OlympiaError::Config` if the descriptor is incomplete.
    pub fn register<F: ProblemFamily>(&mut self) -> Result<&mut Self> {
        if self.families.contains_key(F::NAME) {
            return Err(OlympiaError::DuplicateFamily(F::NAME.to_string()));
        }
        let config = ProblemConfig::from_spec(F::NAME, F::descriptor(), &self.catalog)?;
        debug!(
            family = F::NAME,
            parameters = config.parameters.len(),
            shape = %config.answer_shape,
            "Registered family"
        );
        self.families.insert(
            F::NAME.to_string(),
            FamilyEntry {
                config,
                supports_variation: F::supports_variation(),
                generate: generate_boxed::<F>,
                instantiate: instantiate_boxed::<F>,
            },
        );
        Ok(self)
    }

    /// Get a family by name.
    pub fn get(&self, name: &str) -> Result<&FamilyEntry> {
        self.families
            .get(name)
            .ok_or_else(|| OlympiaError::UnknownFamily(name.to_string()))
    }

    /// All family names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.families.keys().map(String::as_str).collect()
    }

    /// All entries, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = &FamilyEntry> {
        self.families.values()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn catalog(&self) -> &InstructionCatalog {
        &self.catalog
    }

    /// Sample an instance of family `name`.
    pub fn generate(&self, name: &str, rng: &mut dyn RngCore) -> Result<Box<dyn Problem>> {
        Ok(self.get(name)?.generate(rng))
    }

    /// Construct an instance of family `name` from explicit parameters.
    pub fn instantiate(&self, name: &str, params: &Parameters) -> Result<Box<dyn Problem>> {
        self.get(name)?.instantiate(params)
    }

    /// The reference instance of family `name`.
    pub fn original(&self, name: &str) -> Result<Box<dyn Problem>> {
        self.get(name)?.original()
    }
}
