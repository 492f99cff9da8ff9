//! Scores a file of answers against the why-aware rubric.
//!
//!   churnlens-eval --responses-file answers.json
//!   churnlens-eval --eval-spec my_rubric.yml --responses-file answers.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use churnlens_eval::{evaluate, load_responses, Rubric};

#[derive(Parser, Debug)]
#[command(author, version, about = "Score why-aware answers against a rubric", long_about = None)]
struct Cli {
    /// Rubric YAML; the built-in rubric is used when omitted
    #[arg(long)]
    eval_spec: Option<PathBuf>,

    /// JSON object mapping case id to answer text
    #[arg(long)]
    responses_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    churnlens_kb::init_tracing(churnlens_kb::DEFAULT_LOG_FILTER);

    let rubric = match &cli.eval_spec {
        Some(path) => Rubric::from_path(path)
            .with_context(|| format!("Failed to load rubric {}", path.display()))?,
        None => Rubric::builtin().context("Built-in rubric is invalid")?,
    };
    let responses = load_responses(&cli.responses_file)
        .with_context(|| format!("Failed to load responses {}", cli.responses_file.display()))?;

    let report = evaluate(&rubric, &responses);
    info!(cases = report.cases.len(), mean_score = report.mean_score, "Evaluation finished");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
