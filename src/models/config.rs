//! Configuration models for olympia.
//!
//! All I^R (resolvable ignorance) is parameterized here.
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use super::AnswerShape;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Top-level configuration for olympia.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Formatting-instruction overrides, keyed by answer shape
    #[serde(default)]
    pub instructions: InstructionCatalog,

    /// Self-test settings
    #[serde(default)]
    pub selftest: SelfTestConfig,

    /// Batch verification settings
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Read-only mapping from answer shape to formatting-instruction text.
///
/// K_i: Built once and injected into the registry. Shapes without an
/// override fall back to the built-in text. Keys are `AnswerShape::as_str`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructionCatalog {
    overrides: BTreeMap<String, String>,
}

impl InstructionCatalog {
    /// Catalog with a single override (builder style).
    pub fn with_override(mut self, shape: AnswerShape, text: impl Into<String>) -> Self {
        self.overrides.insert(shape.as_str().to_string(), text.into());
        self
    }

    /// Instruction text for `shape`.
    pub fn instructions_for(&self, shape: AnswerShape) -> &str {
        self.overrides
            .get(shape.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| default_instructions(shape))
    }

    /// Expand `${VAR}` references in every override.
    fn expand(&mut self) {
        for text in self.overrides.values_mut() {
            *text = expand_env_vars(text);
        }
    }
}

fn default_instructions(shape: AnswerShape) -> &'static str {
    match shape {
        AnswerShape::Integer => {
            "Give your final answer as a single integer, with no units or explanation."
        }
        AnswerShape::IntegerList => {
            "Give your final answer as a JSON list of integers, for example [1, 2, 3]."
        }
        AnswerShape::PairList => {
            "Give your final answer as a JSON list of two-element integer lists, for example [[1, 4], [2, 3]]."
        }
        AnswerShape::RealList => {
            "Give your final answer as a JSON list of decimal numbers, for example [0.0, 0.5, 1.0]. Use at least six significant digits."
        }
        AnswerShape::Fraction => {
            "Give your final answer as a reduced fraction p/q (or an integer), for example 4/9."
        }
        AnswerShape::Expression => {
            "Give your final answer as a single LaTeX expression, for example \\frac{n(n+1)}{2}. A leading 'f(x) =' is allowed."
        }
        AnswerShape::Matrix => {
            "Give your final answer as a JSON list of rows, each row a JSON list of integers."
        }
    }
}

/// Self-test configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfTestConfig {
    /// Generated instances checked per family
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Seed of the first generated instance; sample `i` uses `base_seed + i`
    #[serde(default)]
    pub base_seed: u64,
}

fn default_samples() -> usize {
    100
}

impl Default for SelfTestConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            base_seed: 0,
        }
    }
}

/// Batch verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Whether to write accepted submissions to the output
    #[serde(default = "default_true")]
    pub include_accepted: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            include_accepted: true,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file.
    ///
    /// B_i(file exists) → Result
    /// B_i(file is valid TOML) → Result
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_owned(),
                source,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source: e,
        })?;
        config.instructions.expand();
        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selftest.samples == 0 {
            return Err(ConfigError::InvalidValue {
                field: "selftest.samples".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        for key in self.instructions.overrides.keys() {
            if !AnswerShape::ALL.iter().any(|shape| shape.as_str() == key) {
                return Err(ConfigError::InvalidValue {
                    field: format!("instructions.{key}"),
                    reason: "unknown answer shape".to_string(),
                });
            }
        }
        for shape in AnswerShape::ALL {
            if self.instructions.instructions_for(shape).trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("instructions.{shape}"),
                    reason: "instruction text is empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports ${VAR_NAME} syntax.
/// If the variable is not set, the placeholder is left unchanged.
pub fn expand_env_vars(s: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

    let mut result = s.to_string();
    for cap in re.captures_iter(s) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

/// Configuration errors.
///
/// Epistemic origin:
/// - B_i falsified: File not found, parse error
/// - I^B materialized: Missing or inconsistent values
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Descriptor '{descriptor}' is missing required field '{field}'")]
    MissingField { descriptor: String, field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = HarnessConfig::from_toml_str("").unwrap();
        assert_eq!(config.selftest.samples, 100);
        assert_eq!(config.selftest.base_seed, 0);
        assert!(config.batch.include_accepted);
        assert_eq!(
            config.instructions.instructions_for(AnswerShape::Integer),
            default_instructions(AnswerShape::Integer)
        );
    }

    #[test]
    fn test_instruction_override() {
        let config = HarnessConfig::from_toml_str(
            r#"
[instructions]
integer = "Reply with \\boxed{N}."

[selftest]
samples = 5
base_seed = 42
"#,
        )
        .unwrap();
        assert_eq!(
            config.instructions.instructions_for(AnswerShape::Integer),
            "Reply with \\boxed{N}."
        );
        assert_eq!(
            config.instructions.instructions_for(AnswerShape::Fraction),
            default_instructions(AnswerShape::Fraction)
        );
        assert_eq!(config.selftest.samples, 5);
        assert_eq!(config.selftest.base_seed, 42);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let err = HarnessConfig::from_toml_str("[selftest]\nsamples = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_empty_instruction_rejected() {
        let err = HarnessConfig::from_toml_str("[instructions]\nfraction = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "instructions.fraction"));
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let err = HarnessConfig::from_toml_str("[instructions]\nvector = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref reason, .. } if reason == "unknown answer shape"));
    }

    #[test]
    fn test_from_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[selftest\nsamples = 3").unwrap();
        let err = HarnessConfig::from_file(file.path()).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_expand_env_vars_leaves_unknown() {
        assert_eq!(
            expand_env_vars("${OLYMPIA_SURELY_UNSET_VAR} rest"),
            "${OLYMPIA_SURELY_UNSET_VAR} rest"
        );
    }
}
