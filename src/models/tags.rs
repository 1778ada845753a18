//! Tag vocabularies.
//!
//! K_i: Two closed, disjoint vocabularies. Domain tags describe a family,
//! outcome tags describe a verdict. Keeping them as separate types makes it
//! impossible to attach a verdict category to a descriptor or vice versa.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain and structure tags attached to a problem family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Algebra,
    NumberTheory,
    Combinatorics,
    Probability,
    Sequences,
    FunctionalEquation,
    /// Answer is an extremal value (maximum)
    FindMax,
    /// Answer is an extremal value (minimum)
    FindMin,
    /// Answer is an explicit object that witnesses a property
    Construction,
    /// Answer is a closed-form expression
    ClosedForm,
    /// Family generalizes the competition problem over its parameters
    IsGeneralized,
    /// Family reproduces the competition problem verbatim
    IsOriginal,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Algebra => "algebra",
            Self::NumberTheory => "number_theory",
            Self::Combinatorics => "combinatorics",
            Self::Probability => "probability",
            Self::Sequences => "sequences",
            Self::FunctionalEquation => "functional_equation",
            Self::FindMax => "find_max",
            Self::FindMin => "find_min",
            Self::Construction => "construction",
            Self::ClosedForm => "closed_form",
            Self::IsGeneralized => "is_generalized",
            Self::IsOriginal => "is_original",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic category of a verification outcome.
///
/// K_i: Exhaustive. No other outcome category exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeTag {
    /// All validation layers passed
    Correct,
    /// Wrong shape, wrong type, unparseable, or a non-length structural violation
    IncorrectFormat,
    /// Sequence-shaped answer with the wrong number of elements
    IncorrectLength,
    /// Right shape, fails the mathematical property
    IncorrectSolution,
}

impl OutcomeTag {
    /// Stable identifier used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "CORRECT",
            Self::IncorrectFormat => "INCORRECT_FORMAT",
            Self::IncorrectLength => "INCORRECT_LENGTH",
            Self::IncorrectSolution => "INCORRECT_SOLUTION",
        }
    }
}

impl fmt::Display for OutcomeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_tag_serializes_screaming_case() {
        let json = serde_json::to_string(&OutcomeTag::IncorrectLength).unwrap();
        assert_eq!(json, r#""INCORRECT_LENGTH""#);
        assert_eq!(OutcomeTag::IncorrectLength.to_string(), "INCORRECT_LENGTH");
    }

    #[test]
    fn test_tag_round_trips_snake_case() {
        let tag: Tag = serde_json::from_str(r#""is_generalized""#).unwrap();
        assert_eq!(tag, Tag::IsGeneralized);
        assert_eq!(serde_json::to_string(&Tag::NumberTheory).unwrap(), r#""number_theory""#);
    }
}
