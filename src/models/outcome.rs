//! Verification outcome.

use super::OutcomeTag;
use serde::{Deserialize, Serialize};

/// Result of checking one candidate against one instance.
///
/// K_i: `accepted == (diagnostic == OutcomeTag::Correct)`. The fields are
/// private so the only way to build an outcome is through the two
/// constructors, which keep the pair consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    accepted: bool,
    message: String,
    diagnostic: OutcomeTag,
}

impl VerificationOutcome {
    /// The single accepting outcome.
    pub fn correct() -> Self {
        Self {
            accepted: true,
            message: "OK".to_string(),
            diagnostic: OutcomeTag::Correct,
        }
    }

    /// A rejecting outcome.
    ///
    /// Passing `OutcomeTag::Correct` here is a programming error; it is
    /// downgraded to `IncorrectSolution` so the invariant still holds.
    pub fn rejected(diagnostic: OutcomeTag, message: impl Into<String>) -> Self {
        debug_assert_ne!(diagnostic, OutcomeTag::Correct);
        let diagnostic = match diagnostic {
            OutcomeTag::Correct => OutcomeTag::IncorrectSolution,
            other => other,
        };
        Self {
            accepted: false,
            message: message.into(),
            diagnostic,
        }
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn diagnostic(&self) -> OutcomeTag {
        self.diagnostic
    }

    /// Destructure into the `(accepted, message, diagnostic)` triple.
    pub fn into_parts(self) -> (bool, String, OutcomeTag) {
        (self.accepted, self.message, self.diagnostic)
    }
}
