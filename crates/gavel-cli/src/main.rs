//! Gavel CLI - batch extraction of sentencing facts from court judgments.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use regex::Regex;
use tokio::task::JoinSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gavel_domain::{schema_export, Stage};
use gavel_extractor::{outputs_exist, CaseReport, Orchestrator, PipelineConfig, StageOutcome};
use gavel_llm::openai::DEFAULT_ENDPOINT;
use gavel_llm::OpenAiProvider;

#[derive(Parser)]
#[command(
    name = "gavel",
    version,
    about = "Structured extraction of sentencing facts from Hong Kong drug-trafficking judgments"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the three-stage extraction pipeline over plain-text case files
    Extract(ExtractArgs),
    /// Write the stage JSON schemas for external tooling
    ExportSchema(ExportSchemaArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// A .txt case file, or a directory of them
    #[arg(long)]
    input: PathBuf,

    /// Output directory; each case gets a subdirectory with one JSON file
    /// per stage
    #[arg(long)]
    out: PathBuf,

    /// Re-run cases whose outputs already exist
    #[arg(long)]
    rerun_all: bool,

    /// Model identifier
    #[arg(long, default_value = "gpt-5-mini")]
    model: String,

    /// API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_ENDPOINT)]
    base_url: String,

    /// API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Pipeline configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ExportSchemaArgs {
    /// Directory to write the schema documents into
    #[arg(long)]
    out: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Extract(args) => extract(args).await,
        Command::ExportSchema(args) => export_schema(args),
    }
}

async fn extract(args: ExtractArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            PipelineConfig::from_toml(&text).map_err(anyhow::Error::msg)?
        }
        None => PipelineConfig::default(),
    };
    config.validate().map_err(anyhow::Error::msg)?;

    let cases = collect_case_files(&args.input)?;
    if cases.is_empty() {
        bail!("no .txt case files found under {}", args.input.display());
    }

    let mut tasks: JoinSet<(String, Result<CaseReport, gavel_extractor::ExtractorError>)> =
        JoinSet::new();
    let mut scheduled = 0usize;

    for (case_id, path) in cases {
        if !args.rerun_all && outputs_exist(&args.out, &case_id) {
            info!(case_id, "outputs already exist, skipping");
            continue;
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading case file {}", path.display()))?;
        let text = normalize_case_text(&text);

        // Documents are independent; each gets its own provider and
        // orchestrator and they share no mutable state.
        let provider =
            OpenAiProvider::new(args.base_url.as_str(), args.api_key.as_str(), args.model.as_str());
        let orchestrator = Orchestrator::new(provider, config.clone(), &args.out);
        scheduled += 1;
        tasks.spawn(async move {
            let report = orchestrator.run_case(&case_id, &text).await;
            (case_id, report)
        });
    }

    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (case_id, result) = joined.context("extraction task panicked")?;
        match result {
            Ok(report) => {
                print_report(&report);
                if !report.succeeded() {
                    failed += 1;
                }
            }
            Err(e) => {
                println!("{case_id}: error: {e}");
                failed += 1;
            }
        }
    }

    println!("{} case(s) processed, {} failed", scheduled, failed);
    if failed > 0 {
        bail!("{failed} case(s) failed");
    }
    Ok(())
}

fn export_schema(args: ExportSchemaArgs) -> Result<()> {
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    for stage in Stage::all() {
        let path = args.out.join(format!("{stage}.schema.json"));
        let mut rendered = serde_json::to_string_pretty(&schema_export::schema_for_stage(stage))?;
        rendered.push('\n');
        std::fs::write(&path, rendered)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Case files to process, as `(case_id, path)` pairs in filename order.
fn collect_case_files(input: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in std::fs::read_dir(input)
            .with_context(|| format!("reading directory {}", input.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                files.push(path);
            }
        }
        files.sort();
    } else {
        files.push(input.to_path_buf());
    }

    Ok(files
        .into_iter()
        .filter_map(|path| {
            let case_id = path.file_stem()?.to_string_lossy().into_owned();
            Some((case_id, path))
        })
        .collect())
}

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\n").unwrap_or_else(|e| panic!("invalid blank-line pattern: {e}"))
});

/// Collapse runs of blank lines and trim, matching how case text is
/// prepared before extraction.
fn normalize_case_text(text: &str) -> String {
    BLANK_RUNS.replace_all(text, "\n\n").trim().to_string()
}

fn print_report(report: &CaseReport) {
    for stage_report in &report.stages {
        match &stage_report.outcome {
            StageOutcome::Done {
                attempts, path, ..
            } => {
                println!(
                    "{}: {} done in {} attempt(s) -> {}",
                    report.case_id,
                    stage_report.stage,
                    attempts,
                    path.display()
                );
            }
            StageOutcome::Failed { attempts, reason } => {
                println!(
                    "{}: {} FAILED after {} attempt(s): {}",
                    report.case_id, stage_report.stage, attempts, reason
                );
            }
            StageOutcome::Skipped => {
                println!(
                    "{}: {} skipped (earlier stage failed)",
                    report.case_id, stage_report.stage
                );
            }
        }
    }
}
