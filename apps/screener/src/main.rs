use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use screener::config::Config;
use screener::{collect_inputs, screen_batch, JobCriteria, ScreeningEngine};

#[derive(Parser)]
#[command(name = "screener")]
#[command(version)]
#[command(about = "Score resumes (PDF, DOCX, TXT or ZIP bundles) against job criteria")]
struct Cli {
    /// JSON file with min_experience_years, required_skills, min_final_score, job_description
    #[arg(short, long)]
    criteria: PathBuf,

    /// Documents screened concurrently (overrides SCREENER_WORKERS)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Resume files and/or .zip bundles
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries one JSON outcome per line
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let raw = std::fs::read_to_string(&cli.criteria)
        .with_context(|| format!("Failed to read criteria file {}", cli.criteria.display()))?;
    let criteria = JobCriteria::from_json(&raw)
        .with_context(|| format!("Invalid criteria in {}", cli.criteria.display()))?;
    info!(
        min_experience_years = criteria.min_experience_years,
        min_final_score = criteria.min_final_score,
        skills = criteria.required_skills.len(),
        "Loaded job criteria"
    );

    let intake = collect_inputs(&cli.inputs, &config.intake_limits());
    if intake.is_empty() {
        bail!("No screenable documents found (.pdf, .docx, .txt or .zip bundles of them)");
    }

    let workers = cli.workers.unwrap_or(config.workers);
    let engine = ScreeningEngine::new(criteria, config.ocr_config());
    let report = screen_batch(engine, intake.files().to_vec(), workers).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for outcome in &report.outcomes {
        serde_json::to_writer(&mut out, outcome)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!(
        batch_id = %report.summary.batch_id,
        total = report.summary.total,
        selected = report.summary.selected,
        rejected = report.summary.rejected,
        pending = report.summary.pending,
        "Screening finished"
    );

    // Unpacked bundles are removed here, after every document has been read
    drop(intake);
    Ok(())
}
