//! Problem family descriptors.
//!
//! K_i: A `ProblemConfig` is built once per family, when the family is
//! registered, and is never mutated afterwards.

use super::{ConfigError, InstructionCatalog, OlympiaError, Result, Tag};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Expected shape of a candidate answer.
///
/// Keys the formatting-instruction catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerShape {
    Integer,
    IntegerList,
    PairList,
    RealList,
    Fraction,
    Expression,
    Matrix,
}

impl AnswerShape {
    pub const ALL: [AnswerShape; 7] = [
        Self::Integer,
        Self::IntegerList,
        Self::PairList,
        Self::RealList,
        Self::Fraction,
        Self::Expression,
        Self::Matrix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::IntegerList => "integer_list",
            Self::PairList => "pair_list",
            Self::RealList => "real_list",
            Self::Fraction => "fraction",
            Self::Expression => "expression",
            Self::Matrix => "matrix",
        }
    }
}

impl fmt::Display for AnswerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bound parameter values of an instance, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, i64>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: i64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    /// Get a parameter or fail with `MissingParameter` for `family`.
    pub fn require(&self, family: &str, name: &str) -> Result<i64> {
        self.get(name).ok_or_else(|| OlympiaError::MissingParameter {
            family: family.to_string(),
            parameter: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Static description of a family, as written next to its implementation.
///
/// Turned into a `ProblemConfig` by the registry, which resolves the
/// formatting instructions from the injected catalog.
#[derive(Debug, Clone)]
pub struct DescriptorSpec {
    pub statement_template: &'static str,
    pub answer_shape: AnswerShape,
    pub parameters: &'static [&'static str],
    pub source: Option<&'static str>,
    pub problem_url: Option<&'static str>,
    pub solution_url: Option<&'static str>,
    pub original_parameters: Parameters,
    pub original_solution: serde_json::Value,
    pub tags: &'static [Tag],
}

/// Immutable descriptor of a problem family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Stable unique identifier (competition, year, problem label)
    pub name: String,

    /// Statement with `{parameter}` placeholders
    pub statement_template: String,

    /// Answer shape, used to resolve formatting instructions
    pub answer_shape: AnswerShape,

    /// Instruction text describing the expected answer shape
    #[serde(default)]
    pub formatting_instructions: String,

    /// Ordered parameter slots (may be empty)
    pub parameters: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_url: Option<String>,

    /// Fixed reference instantiation
    #[serde(default)]
    pub original_parameters: Parameters,

    /// Known-good answer for `original_parameters`
    #[serde(default)]
    pub original_solution: serde_json::Value,

    #[serde(default)]
    pub tags: BTreeSet<Tag>,
}

impl ProblemConfig {
    /// Build a descriptor from a family's static spec.
    ///
    /// B_i(descriptor is complete) → Result
    pub fn from_spec(
        name: &str,
        spec: DescriptorSpec,
        catalog: &InstructionCatalog,
    ) -> std::result::Result<Self, ConfigError> {
        let config = Self {
            name: name.to_string(),
            statement_template: spec.statement_template.to_string(),
            answer_shape: spec.answer_shape,
            formatting_instructions: catalog.instructions_for(spec.answer_shape).to_string(),
            parameters: spec.parameters.iter().map(|p| p.to_string()).collect(),
            source: spec.source.map(str::to_string),
            problem_url: spec.problem_url.map(str::to_string),
            solution_url: spec.solution_url.map(str::to_string),
            original_parameters: spec.original_parameters,
            original_solution: spec.original_solution,
            tags: spec.tags.iter().copied().collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that required fields are present and mutually consistent.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                descriptor: "<unnamed>".to_string(),
                field: "name".to_string(),
            });
        }
        if self.statement_template.trim().is_empty() {
            return Err(ConfigError::MissingField {
                descriptor: self.name.clone(),
                field: "statement_template".to_string(),
            });
        }
        for slot in &self.parameters {
            if !self.original_parameters.contains(slot) {
                return Err(ConfigError::MissingField {
                    descriptor: self.name.clone(),
                    field: format!("original_parameters.{slot}"),
                });
            }
            if !self.statement_template.contains(&format!("{{{slot}}}")) {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.statement_template", self.name),
                    reason: format!("placeholder {{{slot}}} is never used"),
                });
            }
        }
        Ok(())
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> DescriptorSpec {
        DescriptorSpec {
            statement_template: "Count the pairs up to {n}.",
            answer_shape: AnswerShape::Integer,
            parameters: &["n"],
            source: Some("Test Olympiad 2001"),
            problem_url: None,
            solution_url: None,
            original_parameters: Parameters::new().with("n", 20),
            original_solution: json!(6),
            tags: &[Tag::NumberTheory, Tag::IsGeneralized, Tag::NumberTheory],
        }
    }

    #[test]
    fn test_from_spec_resolves_instructions() {
        let catalog = InstructionCatalog::default();
        let config = ProblemConfig::from_spec("test_pairs", spec(), &catalog).unwrap();
        assert_eq!(config.name, "test_pairs");
        assert_eq!(
            config.formatting_instructions,
            catalog.instructions_for(AnswerShape::Integer)
        );
        // Tags behave as a set
        assert_eq!(config.tags.len(), 2);
        assert!(config.has_tag(Tag::IsGeneralized));
    }

    #[test]
    fn test_missing_original_parameter_rejected() {
        let mut spec = spec();
        spec.original_parameters = Parameters::new();
        let err = ProblemConfig::from_spec("test_pairs", spec, &InstructionCatalog::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field, .. } if field == "original_parameters.n"));
    }

    #[test]
    fn test_unused_placeholder_rejected() {
        let mut spec = spec();
        spec.statement_template = "Count the pairs.";
        let err = ProblemConfig::from_spec("test_pairs", spec, &InstructionCatalog::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_deserialize_requires_name_template_parameters() {
        let missing = r#"{"statement_template": "x", "answer_shape": "integer", "parameters": []}"#;
        assert!(serde_json::from_str::<ProblemConfig>(missing).is_err());

        let present = r#"{"name": "a", "statement_template": "x", "answer_shape": "integer", "parameters": []}"#;
        let config: ProblemConfig = serde_json::from_str(present).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.tags.is_empty());
    }

    #[test]
    fn test_parameters_require() {
        let params = Parameters::new().with("n", 4);
        assert_eq!(params.require("fam", "n").unwrap(), 4);
        assert!(matches!(
            params.require("fam", "p"),
            Err(OlympiaError::MissingParameter { .. })
        ));
    }
}
