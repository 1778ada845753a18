//! Serializable run records.
//!
//! K_i: These types are the JSON surface of the harness. They carry
//! rendered statements out to a solver and carry answers and verdicts back.

use super::{OutcomeTag, Parameters, VerificationOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rendered instance handed to a solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedProblem {
    /// Unique identifier for this instance
    pub id: String,

    /// Family name
    pub family: String,

    /// Bound parameter values
    pub parameters: Parameters,

    /// Rendered statement
    pub statement: String,

    /// Expected answer shape, as instruction text
    pub formatting_instructions: String,

    /// Seed the instance was sampled with, if it was sampled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Canonical solution, only when explicitly requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_solution: Option<serde_json::Value>,

    pub generated_at: DateTime<Utc>,
}

/// A candidate answer submitted for verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Caller-chosen identifier (echoed back in the verdict)
    #[serde(default)]
    pub id: Option<String>,

    /// Family name
    pub family: String,

    /// Parameters of the instance the answer is for
    #[serde(default)]
    pub parameters: Parameters,

    /// The candidate answer, in the family's shape
    pub answer: serde_json::Value,
}

/// Verdict for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub id: String,
    pub family: String,
    pub parameters: Parameters,
    pub answer: serde_json::Value,
    pub accepted: bool,
    pub message: String,
    pub diagnostic: OutcomeTag,
    pub checked_at: DateTime<Utc>,
}

impl VerdictRecord {
    /// Combine a submission with its outcome.
    pub fn from_outcome(submission: Submission, outcome: VerificationOutcome) -> Self {
        let (accepted, message, diagnostic) = outcome.into_parts();
        Self {
            id: submission
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            family: submission.family,
            parameters: submission.parameters,
            answer: submission.answer,
            accepted,
            message,
            diagnostic,
            checked_at: Utc::now(),
        }
    }
}

/// Statistics for a batch verification run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Submissions read
    pub total_submissions: usize,

    /// Submissions that reached `check`
    pub total_checked: usize,

    /// Submissions naming an unknown family or invalid parameters
    pub total_invalid: usize,

    pub correct: usize,
    pub incorrect_format: usize,
    pub incorrect_length: usize,
    pub incorrect_solution: usize,

    /// Total runtime in seconds
    pub runtime_secs: f64,

    /// Acceptance rate over checked submissions (0.0 - 1.0)
    pub acceptance_rate: f64,
}

impl RunStats {
    /// Count one outcome.
    pub fn record(&mut self, diagnostic: OutcomeTag) {
        self.total_checked += 1;
        match diagnostic {
            OutcomeTag::Correct => self.correct += 1,
            OutcomeTag::IncorrectFormat => self.incorrect_format += 1,
            OutcomeTag::IncorrectLength => self.incorrect_length += 1,
            OutcomeTag::IncorrectSolution => self.incorrect_solution += 1,
        }
    }

    /// Calculate derived stats.
    pub fn finalize(&mut self) {
        if self.total_checked > 0 {
            self.acceptance_rate = self.correct as f64 / self.total_checked as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_defaults() {
        let submission: Submission =
            serde_json::from_str(r#"{"family": "roof_friendly_pairs", "answer": 6}"#).unwrap();
        assert!(submission.id.is_none());
        assert!(submission.parameters.is_empty());
        assert_eq!(submission.answer, json!(6));
    }

    #[test]
    fn test_verdict_record_keeps_id() {
        let submission = Submission {
            id: Some("s-1".to_string()),
            family: "divisor_chain".to_string(),
            parameters: Parameters::new().with("n", 3),
            answer: json!([1, 2, 3]),
        };
        let record = VerdictRecord::from_outcome(submission, VerificationOutcome::correct());
        assert_eq!(record.id, "s-1");
        assert!(record.accepted);
        assert_eq!(record.diagnostic, OutcomeTag::Correct);
    }

    #[test]
    fn test_run_stats_finalize() {
        let mut stats = RunStats::default();
        stats.record(OutcomeTag::Correct);
        stats.record(OutcomeTag::IncorrectLength);
        stats.record(OutcomeTag::Correct);
        stats.record(OutcomeTag::IncorrectFormat);
        stats.finalize();
        assert_eq!(stats.total_checked, 4);
        assert_eq!(stats.correct, 2);
        assert!((stats.acceptance_rate - 0.5).abs() < 1e-12);
    }
}
