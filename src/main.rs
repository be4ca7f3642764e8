use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use shotsim_features::MotionSequence;
use shotsim_io::{ComparisonName, ConfigReader, MotionReader, ResultWriter};
use shotsim_score::{Comparator, ScoringConfig};

#[derive(Parser)]
#[command(name = "shotsim")]
#[command(about = "DTW-based similarity scoring of basketball shooting motions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared output parameters for scoring commands.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Comparison name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    name: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Scoring configuration JSON (defaults to the built-in reference tables)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Compare a subject motion against one reference motion
    Compare {
        /// Path to the subject motion JSON
        #[arg(long)]
        subject: PathBuf,

        /// Path to the reference motion JSON
        #[arg(long)]
        reference: PathBuf,

        /// Include warping paths in the comparison JSON
        #[arg(long, default_value_t = false)]
        paths: bool,

        /// Also write the paired sequences of every subfeature as CSV
        #[arg(long, default_value_t = false)]
        alignments: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compare a subject motion against several references and pick the closest
    Rank {
        /// Path to the subject motion JSON
        #[arg(long)]
        subject: PathBuf,

        /// Path to a reference motion JSON (repeat for each reference)
        #[arg(long = "reference", required = true)]
        references: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Validate a scoring configuration file
    CheckConfig {
        /// Path to the scoring configuration JSON
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Serialize)]
struct CompareOutput {
    name: String,
    overall: f64,
    phase_weighted: Option<f64>,
    grade: String,
    confidence: &'static str,
    available: usize,
    declared: usize,
    length_flagged: bool,
}

#[derive(Serialize)]
struct RankOutput {
    name: String,
    n_references: usize,
    n_failed: usize,
    best_reference: Option<String>,
    best_overall: Option<f64>,
    best_grade: Option<String>,
}

#[derive(Serialize)]
struct CheckConfigOutput {
    config: String,
    n_grades: usize,
    high_confidence: f64,
    medium_confidence: f64,
    low_confidence: f64,
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    match path {
        Some(path) => ConfigReader::new(path)
            .read()
            .context("failed to read scoring configuration"),
        None => {
            info!("using reference scoring configuration");
            ScoringConfig::reference().context("reference configuration is invalid")
        }
    }
}

fn load_motion(path: &Path) -> Result<MotionSequence> {
    MotionReader::new(path)
        .read()
        .with_context(|| format!("failed to read motion {}", path.display()))
}

fn reference_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Compare {
            subject,
            reference,
            paths,
            alignments,
            output,
        } => {
            let name = ComparisonName::new(output.name.clone())?;
            let config = load_config(output.config.as_deref())?;

            // 1. Read motions
            let subject = load_motion(&subject)?;
            let reference = load_motion(&reference)?;

            // 2. Compare
            let result = Comparator::new(&config)
                .compare(&subject, &reference)
                .context("comparison failed")?;

            // 3. Write artifacts
            let writer = ResultWriter::new(&output.output_dir, name)?;
            writer.write_comparison(&result, paths)?;
            if alignments {
                writer.write_alignments(&result)?;
            }

            // 4. Print summary
            let summary = CompareOutput {
                name: output.name,
                overall: result.overall.score.value(),
                phase_weighted: result.phase_weighted.map(|p| p.score.value()),
                grade: result.grade.clone(),
                confidence: result.confidence.as_str(),
                available: result.available,
                declared: result.declared,
                length_flagged: result.length_flagged,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Rank {
            subject,
            references,
            output,
        } => {
            let name = ComparisonName::new(output.name.clone())?;
            let config = load_config(output.config.as_deref())?;

            // 1. Read motions
            let subject = load_motion(&subject)?;
            let labels: Vec<String> = references.iter().map(|p| reference_label(p)).collect();
            let motions = references
                .iter()
                .map(|p| load_motion(p))
                .collect::<Result<Vec<_>>>()?;
            info!(n_references = motions.len(), "references loaded");

            // 2. Rank
            let ranking = Comparator::new(&config)
                .rank(&subject, &motions)
                .context("ranking failed")?;

            // 3. Write artifact
            let writer = ResultWriter::new(&output.output_dir, name)?;
            writer.write_ranking(&ranking, &labels)?;

            // 4. Print summary
            let best = ranking.best_result();
            let summary = RankOutput {
                name: output.name,
                n_references: ranking.entries.len(),
                n_failed: ranking.entries.iter().filter(|e| e.is_err()).count(),
                best_reference: ranking.best.and_then(|i| labels.get(i).cloned()),
                best_overall: best.map(|r| r.overall.score.value()),
                best_grade: best.map(|r| r.grade.clone()),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::CheckConfig { config } => {
            let scoring = load_config(Some(config.as_path()))?;
            let summary = CheckConfigOutput {
                config: config.display().to_string(),
                n_grades: scoring.grades().entries().len(),
                high_confidence: scoring.confidence().high(),
                medium_confidence: scoring.confidence().medium(),
                low_confidence: scoring.confidence().low(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
