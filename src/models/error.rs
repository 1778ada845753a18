//! Error types for olympia.
//!
//! Taxonomy:
//! - B_i falsified: caller mistakes (unknown family, out-of-domain parameters)
//! - I^B materialized: infrastructure failures (file IO, malformed JSONL)
//! - K_i violated: internal invariant violations (bugs)
//!
//! Candidate answers never produce an error. A malformed answer is a verdict
//! (`OutcomeTag::IncorrectFormat`), not a failure of the harness.

use thiserror::Error;

/// Top-level error type for olympia.
#[derive(Debug, Error)]
pub enum OlympiaError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED — Belief proven wrong (caller errors)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Unknown problem family: {0}")]
    UnknownFamily(String),

    #[error("Problem family registered twice: {0}")]
    DuplicateFamily(String),

    #[error("Family '{family}' requires parameter '{parameter}'")]
    MissingParameter { family: String, parameter: String },

    #[error("Family '{family}': parameter {parameter} = {value} is outside its domain ({domain})")]
    ParameterDomain {
        family: String,
        parameter: String,
        value: i64,
        domain: String,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    // ═══════════════════════════════════════════════════════════════════
    // I^B MATERIALIZED — Bounded ignorance became known-bad
    // ═══════════════════════════════════════════════════════════════════

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════
    // K_i VIOLATED — Invariant broken (bug, should not happen)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OlympiaError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a parameter-domain violation for `family`.
    pub fn domain(
        family: impl Into<String>,
        parameter: impl Into<String>,
        value: i64,
        domain: impl Into<String>,
    ) -> Self {
        Self::ParameterDomain {
            family: family.into(),
            parameter: parameter.into(),
            value,
            domain: domain.into(),
        }
    }

    /// Whether the error was caused by the caller rather than the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownFamily(_)
                | Self::DuplicateFamily(_)
                | Self::MissingParameter { .. }
                | Self::ParameterDomain { .. }
        )
    }
}

/// Result type alias for olympia.
pub type Result<T> = std::result::Result<T, OlympiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_message() {
        let err = OlympiaError::domain("prime_sum_pairing", "n", 7, "even n in [2, 100]");
        assert_eq!(
            err.to_string(),
            "Family 'prime_sum_pairing': parameter n = 7 is outside its domain (even n in [2, 100])"
        );
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_io_error_is_not_caller_error() {
        let err = OlympiaError::io(
            "reading submissions",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(!err.is_caller_error());
        assert_eq!(err.to_string(), "IO error: reading submissions");
    }
}
