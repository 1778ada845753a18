//! Batch verification of submitted answers.
//!
//! Pipeline flow:
//! Submissions (JSONL) → Registry lookup → Instance → Layered check → Verdicts (JSONL)

use crate::models::{BatchConfig, OlympiaError, Result, RunStats, Submission, VerdictRecord};
use crate::problem::FamilyRegistry;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Load submissions from a JSONL file.
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>> {
    let file = File::open(path).map_err(|e| OlympiaError::io("opening submissions file", e))?;
    let reader = BufReader::new(file);
    let mut submissions = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| OlympiaError::io("reading submissions file", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let submission: Submission = serde_json::from_str(&line)
            .map_err(|e| OlympiaError::ParseError(format!("Line {}: {}", line_num + 1, e)))?;
        submissions.push(submission);
    }

    info!(count = submissions.len(), "Loaded submissions");
    Ok(submissions)
}

/// Checks submissions against the families of a registry.
pub struct BatchVerifier<'a> {
    registry: &'a FamilyRegistry,
    config: BatchConfig,
}

impl<'a> BatchVerifier<'a> {
    pub fn new(registry: &'a FamilyRegistry, config: BatchConfig) -> Self {
        Self { registry, config }
    }

    /// Check one submission.
    ///
    /// # Errors
    ///
    /// Fails only when the submission does not name a valid instance
    /// (unknown family, missing or out-of-domain parameters). A bad answer
    /// is a rejected verdict, not an error.
    pub fn verify(&self, submission: Submission) -> Result<VerdictRecord> {
        let problem = self
            .registry
            .instantiate(&submission.family, &submission.parameters)?;
        let outcome = problem.check(&submission.answer);
        Ok(VerdictRecord::from_outcome(submission, outcome))
    }

    /// Check every submission and write verdicts to `output_path` as JSONL.
    pub fn run(&self, submissions: Vec<Submission>, output_path: &Path) -> Result<RunStats> {
        let start = Instant::now();
        let total = submissions.len();

        info!(
            total_submissions = total,
            families = self.registry.len(),
            "Starting batch verification"
        );

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
                .map_err(|e| OlympiaError::Internal(format!("Invalid progress template: {}", e)))?
                .progress_chars("##-"),
        );

        let output_file =
            File::create(output_path).map_err(|e| OlympiaError::io("creating output file", e))?;
        let mut writer = BufWriter::new(output_file);

        let mut stats = RunStats {
            total_submissions: total,
            ..RunStats::default()
        };

        for (index, submission) in submissions.into_iter().enumerate() {
            let family = submission.family.clone();
            match self.verify(submission) {
                Ok(record) => {
                    stats.record(record.diagnostic);
                    if !record.accepted || self.config.include_accepted {
                        let json = serde_json::to_string(&record)?;
                        writeln!(writer, "{}", json)
                            .map_err(|e| OlympiaError::io("writing output", e))?;
                    }
                }
                Err(e) if e.is_caller_error() => {
                    warn!(line = index + 1, family = %family, error = %e, "Skipping invalid submission");
                    stats.total_invalid += 1;
                }
                Err(e) => return Err(e),
            }

            pb.inc(1);
            pb.set_message(format!("correct: {}, invalid: {}", stats.correct, stats.total_invalid));
        }

        writer
            .flush()
            .map_err(|e| OlympiaError::io("flushing output", e))?;
        pb.finish_with_message(format!(
            "Done! {} correct of {} checked",
            stats.correct, stats.total_checked
        ));

        stats.runtime_secs = start.elapsed().as_secs_f64();
        stats.finalize();

        info!(
            checked = stats.total_checked,
            correct = stats.correct,
            invalid = stats.total_invalid,
            acceptance_rate = format!("{:.1}%", stats.acceptance_rate * 100.0),
            "Batch verification complete"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::default_registry;
    use crate::models::{InstructionCatalog, OutcomeTag, Parameters};
    use serde_json::json;
    use tempfile::{NamedTempFile, TempDir};

    fn submission(family: &str, n: i64, answer: serde_json::Value) -> Submission {
        Submission {
            id: None,
            family: family.to_string(),
            parameters: Parameters::new().with("n", n),
            answer,
        }
    }

    fn read_verdicts(path: &Path) -> Vec<VerdictRecord> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_load_submissions_skips_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"family": "roof_friendly_pairs", "parameters": {{"n": 20}}, "answer": 6}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id": "b", "family": "divisor_chain", "parameters": {{"n": 3}}, "answer": [1, 2, 3]}}"#).unwrap();

        let submissions = load_submissions(file.path()).unwrap();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[1].id.as_deref(), Some("b"));
    }

    #[test]
    fn test_load_submissions_reports_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"family": "divisor_chain", "answer": 1}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let err = load_submissions(file.path()).unwrap_err();
        assert!(matches!(err, OlympiaError::ParseError(msg) if msg.starts_with("Line 2")));
    }

    #[test]
    fn test_run_counts_and_writes_verdicts() {
        let registry = default_registry(InstructionCatalog::default()).unwrap();
        let verifier = BatchVerifier::new(&registry, BatchConfig::default());
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("verdicts.jsonl");

        let submissions = vec![
            submission("roof_friendly_pairs", 20, json!(6)),
            submission("roof_friendly_pairs", 20, json!(7)),
            submission("divisor_chain", 4, json!([1, 2, 3])),
            submission("divisor_chain", 99, json!([1, 2, 3])),
            submission("no_such_family", 1, json!(0)),
        ];
        let stats = verifier.run(submissions, &output).unwrap();

        assert_eq!(stats.total_submissions, 5);
        assert_eq!(stats.total_checked, 3);
        assert_eq!(stats.total_invalid, 2);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.incorrect_solution, 1);
        assert_eq!(stats.incorrect_length, 1);

        let verdicts = read_verdicts(&output);
        assert_eq!(verdicts.len(), 3);
        assert_eq!(verdicts[2].diagnostic, OutcomeTag::IncorrectLength);
    }

    #[test]
    fn test_run_can_omit_accepted() {
        let registry = default_registry(InstructionCatalog::default()).unwrap();
        let verifier = BatchVerifier::new(
            &registry,
            BatchConfig {
                include_accepted: false,
            },
        );
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("verdicts.jsonl");

        let submissions = vec![
            submission("roof_friendly_pairs", 20, json!(6)),
            submission("roof_friendly_pairs", 20, json!("six")),
        ];
        let stats = verifier.run(submissions, &output).unwrap();

        assert_eq!(stats.correct, 1);
        let verdicts = read_verdicts(&output);
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].diagnostic, OutcomeTag::IncorrectFormat);
    }

    #[test]
    fn test_verify_rejects_bad_parameters() {
        let registry = default_registry(InstructionCatalog::default()).unwrap();
        let verifier = BatchVerifier::new(&registry, BatchConfig::default());
        let err = verifier
            .verify(submission("prime_sum_pairing", 7, json!([])))
            .unwrap_err();
        assert!(err.is_caller_error());
    }
}
