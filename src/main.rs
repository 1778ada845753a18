//! olympia CLI - Generate olympiad problem instances and verify answers.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use olympia::models::{GeneratedProblem, Submission};
use olympia::pipeline::load_submissions;
use olympia::problem::{FamilyEntry, Problem};
use olympia::{default_registry, BatchVerifier, FamilyRegistry, HarnessConfig, Parameters, SelfTestOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "olympia")]
#[command(version)]
#[command(about = "Parameterized olympiad problems with mechanical answer verification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered problem families
    List,

    /// Show the original instance of a family
    Show {
        /// Family name
        family: String,

        /// Also print the canonical solution
        #[arg(long)]
        solution: bool,
    },

    /// Generate problem instances as JSONL
    Generate {
        /// Family name (all varying families when omitted)
        #[arg(short, long)]
        family: Option<String>,

        /// Instances per family
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Seed of the first instance; instance i uses seed + i
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Include the canonical solution in each record
        #[arg(long)]
        with_solution: bool,

        /// Path to output JSONL file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a single answer
    Check {
        /// Family name
        family: String,

        /// Parameter binding, e.g. `-p n=20` (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, i64)>,

        /// Candidate answer; parsed as JSON, otherwise taken as a string
        #[arg(allow_hyphen_values = true)]
        answer: String,
    },

    /// Verify a JSONL file of submissions
    Batch {
        /// Path to input submissions JSONL file
        #[arg(short, long)]
        input: PathBuf,

        /// Path to output verdicts JSONL file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check every family against its own canonical solutions
    Selftest {
        /// Generated instances per family (overrides config)
        #[arg(long)]
        samples: Option<usize>,

        /// Base seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate,

    /// Show example configuration
    Example,
}

fn parse_param(s: &str) -> std::result::Result<(String, i64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn load_harness(path: Option<&Path>) -> Result<(HarnessConfig, FamilyRegistry)> {
    let config = match path {
        Some(path) => HarnessConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => HarnessConfig::default(),
    };
    let registry =
        default_registry(config.instructions.clone()).context("Failed to build family registry")?;
    Ok((config, registry))
}

fn print_example_config() {
    let example = r#"# olympia configuration file
# Every section is optional.

[instructions]
# Formatting instructions appended to statements, keyed by answer shape:
# integer, integer_list, pair_list, real_list, fraction, expression, matrix
integer = "Give your final answer as a single integer in \\boxed{}."
# expression = "${OLYMPIA_EXPRESSION_HINT}"

[selftest]
samples = 100
base_seed = 0

[batch]
include_accepted = true
"#;
    println!("{example}");
}

fn generated_record(
    entry: &FamilyEntry,
    problem: &dyn Problem,
    seed: Option<u64>,
    with_solution: bool,
) -> GeneratedProblem {
    GeneratedProblem {
        id: uuid::Uuid::new_v4().to_string(),
        family: entry.name().to_string(),
        parameters: problem.parameters(),
        statement: problem.render_statement(entry.config()),
        formatting_instructions: entry.config().formatting_instructions.clone(),
        seed,
        canonical_solution: with_solution.then(|| problem.canonical_solution()),
        generated_at: Utc::now(),
    }
}

fn list_families(registry: &FamilyRegistry) {
    println!("{:<32} {:<14} {:<10} {:<6} TAGS", "FAMILY", "SHAPE", "PARAMS", "VARIES");
    for entry in registry.entries() {
        let config = entry.config();
        let tags: Vec<&str> = config.tags.iter().map(|t| t.as_str()).collect();
        println!(
            "{:<32} {:<14} {:<10} {:<6} {}",
            entry.name(),
            config.answer_shape,
            config.parameters.join(","),
            if entry.supports_variation() { "yes" } else { "no" },
            tags.join(", ")
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Example => print_example_config(),

        Commands::Validate => {
            let (config, registry) = load_harness(config_path)?;
            info!("Configuration is valid");
            info!("  Families: {}", registry.len());
            info!("  Self-test: {} samples from seed {}", config.selftest.samples, config.selftest.base_seed);
            info!("  Batch: include accepted = {}", config.batch.include_accepted);
        }

        Commands::List => {
            let (_, registry) = load_harness(config_path)?;
            list_families(&registry);
        }

        Commands::Show { family, solution } => {
            let (_, registry) = load_harness(config_path)?;
            let entry = registry.get(&family)?;
            let problem = entry.original()?;
            let config = entry.config();

            println!("=== {} ===", entry.name());
            if let Some(source) = &config.source {
                println!("Source:      {source}");
            }
            if let Some(url) = &config.problem_url {
                println!("Problem:     {url}");
            }
            println!("Parameters:  {}", serde_json::to_string(&problem.parameters())?);
            println!();
            println!("{}", problem.render_statement(config));
            println!();
            println!("{}", config.formatting_instructions);
            if solution {
                println!();
                println!("Original solution:   {}", config.original_solution);
                println!("Canonical solution:  {}", problem.canonical_solution());
            }
        }

        Commands::Generate {
            family,
            count,
            seed,
            with_solution,
            output,
        } => {
            let (_, registry) = load_harness(config_path)?;
            let entries: Vec<&FamilyEntry> = match &family {
                Some(name) => vec![registry.get(name)?],
                None => registry.entries().filter(|e| e.supports_variation()).collect(),
            };

            let sink: Box<dyn Write> = match &output {
                Some(path) => Box::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("Failed to create {:?}", path))?,
                ),
                None => Box::new(std::io::stdout()),
            };
            let mut writer = BufWriter::new(sink);

            let mut written = 0;
            for entry in entries {
                for i in 0..count {
                    let instance_seed = seed.wrapping_add(i as u64);
                    let mut rng = StdRng::seed_from_u64(instance_seed);
                    let problem = entry.generate(&mut rng);
                    let record = generated_record(entry, problem.as_ref(), Some(instance_seed), with_solution);
                    writeln!(writer, "{}", serde_json::to_string(&record)?).context("Failed to write record")?;
                    written += 1;
                }
            }
            writer.flush().context("Failed to flush output")?;
            info!(count = written, "Generated problems");
        }

        Commands::Check { family, params, answer } => {
            let (config, registry) = load_harness(config_path)?;
            let parameters: Parameters = params.into_iter().collect();
            let candidate: Value =
                serde_json::from_str(&answer).unwrap_or_else(|_| Value::String(answer.clone()));
            let submission = Submission {
                id: None,
                family,
                parameters,
                answer: candidate,
            };
            let verifier = BatchVerifier::new(&registry, config.batch.clone());
            let record = verifier.verify(submission)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        Commands::Batch { input, output } => {
            let (config, registry) = load_harness(config_path)?;
            let submissions = load_submissions(&input)
                .with_context(|| format!("Failed to load submissions from {:?}", input))?;
            let verifier = BatchVerifier::new(&registry, config.batch.clone());
            let stats = verifier.run(submissions, &output)?;

            println!("\n=== Batch Verification Complete ===");
            println!("Submissions: {}", stats.total_submissions);
            println!("Checked:     {}", stats.total_checked);
            println!("Invalid:     {}", stats.total_invalid);
            println!("Correct:     {}", stats.correct);
            println!("Format:      {}", stats.incorrect_format);
            println!("Length:      {}", stats.incorrect_length);
            println!("Solution:    {}", stats.incorrect_solution);
            println!("Acceptance:  {:.1}%", stats.acceptance_rate * 100.0);
            println!("Runtime:     {:.1}s", stats.runtime_secs);
            println!("Output:      {output:?}");
        }

        Commands::Selftest { samples, seed, json } => {
            let (config, registry) = load_harness(config_path)?;
            let mut options = SelfTestOptions::from(&config.selftest);
            if let Some(samples) = samples {
                options.samples = samples;
            }
            if let Some(seed) = seed {
                options.base_seed = seed;
            }

            let report = olympia::selftest::run(&registry, &options);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("\n=== Self-Test ===");
                for family in &report.families {
                    println!(
                        "{:<32} {:>5} instances  {}",
                        family.family,
                        family.instances,
                        if family.passed() { "ok" } else { "FAILED" }
                    );
                }
                for failure in &report.failures {
                    println!(
                        "  {} [{}] params={} seed={:?}: {}",
                        failure.family,
                        failure.check,
                        serde_json::to_string(&failure.parameters)?,
                        failure.seed,
                        failure.message
                    );
                }
            }
            if !report.passed() {
                bail!("Self-test failed with {} failure(s)", report.failures.len());
            }
        }
    }

    Ok(())
}
