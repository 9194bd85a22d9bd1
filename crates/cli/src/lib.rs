use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use repolens_engine::{analyze, render, AnalysisReport};
use repolens_ingest::{normalize_with_timeout, CancelToken, ConfigFile, IngestOptions};
use repolens_protocol::{
    canonical_schema, input_schema, public_schema, serialize_json_pretty, NormalizedProject,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod flags;

use flags::OutputFormat;

/// Config file picked up from the project root when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "repolens.toml";

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| {
            if text.ends_with('\n') {
                Ok(())
            } else {
                stdout.write_all(b"\n")
            }
        })
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "repolens")]
#[command(about = "Deterministic project understanding for source repositories", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a project directory (or a normalized project JSON)
    Analyze(AnalyzeArgs),

    /// Print the JSON Schema of the output (or input) contract
    Schema(SchemaArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Project directory
    #[arg(required_unless_present = "normalized")]
    path: Option<PathBuf>,

    /// Read a normalized project JSON from FILE, or from stdin with `-`
    #[arg(long, value_name = "FILE|-", conflicts_with = "path")]
    normalized: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Public)]
    format: OutputFormat,

    /// Override the project name derived from the directory
    #[arg(long)]
    repo_name: Option<String>,

    /// Config file (default: <PATH>/repolens.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of listed files
    #[arg(long)]
    max_files: Option<usize>,

    /// Maximum bytes sampled per file
    #[arg(long)]
    max_file_bytes: Option<u64>,

    /// Maximum bytes sampled in total
    #[arg(long)]
    max_total_bytes: Option<u64>,

    /// Concurrent reader tasks
    #[arg(long)]
    workers: Option<usize>,

    /// Abort ingestion after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Extra glob to skip (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,
}

#[derive(Args)]
struct SchemaArgs {
    /// Schema of the public projection instead of the canonical context
    #[arg(long, conflicts_with = "input")]
    public: bool,

    /// Schema of the normalized project input
    #[arg(long)]
    input: bool,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args).await,
        Commands::Schema(args) => run_schema(&args),
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let project = match &args.normalized {
        Some(source) => read_normalized(source, args.repo_name.clone())?,
        None => {
            let root = args.path.as_deref().unwrap_or_else(|| Path::new("."));
            let options = resolve_options(root, &args)?;
            ingest(root, &options).await?
        }
    };

    let report = analyze(&project).context("Analysis failed")?;
    log::debug!(
        "fingerprint {}, rendering {}",
        report.diagnostics.fingerprint,
        args.format.as_str()
    );
    print_stdout(&format_report(&report, args.format)?)
}

fn format_report(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Canonical => serialize_json_pretty(&report.canonical)?,
        OutputFormat::Report => serialize_json_pretty(report)?,
        OutputFormat::Public => serialize_json_pretty(&render(&report.canonical)?.public)?,
        OutputFormat::Markdown => render(&report.canonical)?.markdown,
        OutputFormat::Prompt => render(&report.canonical)?.prompt,
    };
    Ok(text)
}

fn run_schema(args: &SchemaArgs) -> Result<()> {
    let schema = if args.public {
        public_schema()?
    } else if args.input {
        input_schema()?
    } else {
        canonical_schema()?
    };
    print_stdout(&serialize_json_pretty(&schema)?)
}

/// Defaults, then the config file, then `REPOLENS_*` env, then flags.
fn resolve_options(root: &Path, args: &AnalyzeArgs) -> Result<IngestOptions> {
    let config = match &args.config {
        Some(path) => Some(
            ConfigFile::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
        ),
        None => {
            let implicit = root.join(DEFAULT_CONFIG_FILE);
            if implicit.is_file() {
                log::debug!("using config {}", implicit.display());
                Some(
                    ConfigFile::load(&implicit)
                        .with_context(|| format!("Failed to load config {}", implicit.display()))?,
                )
            } else {
                None
            }
        }
    };

    let mut options = IngestOptions::resolve(config.as_ref());
    apply_flags(&mut options, args);
    Ok(options)
}

fn apply_flags(options: &mut IngestOptions, args: &AnalyzeArgs) {
    let limits = &mut options.limits;
    if let Some(v) = args.max_files {
        limits.max_files = v;
    }
    if let Some(v) = args.max_file_bytes {
        limits.max_file_bytes = v;
    }
    if let Some(v) = args.max_total_bytes {
        limits.max_total_bytes = v;
    }
    if let Some(v) = args.workers {
        limits.workers = v;
    }
    options.limits = options.limits.clamped();
    if let Some(ms) = args.timeout_ms {
        options.timeout = Some(Duration::from_millis(ms.max(1)));
    }
    options.exclude.extend(args.exclude.iter().cloned());
    if args.repo_name.is_some() {
        options.repo_name = args.repo_name.clone();
    }
}

async fn ingest(root: &Path, options: &IngestOptions) -> Result<NormalizedProject> {
    let cancel = CancelToken::new();
    tokio::select! {
        result = normalize_with_timeout(root, options, &cancel) => result
            .with_context(|| format!("Failed to ingest {}", root.display())),
        Ok(()) = tokio::signal::ctrl_c() => {
            cancel.cancel();
            anyhow::bail!("Interrupted while ingesting {}", root.display())
        }
    }
}

fn read_normalized(source: &str, repo_name: Option<String>) -> Result<NormalizedProject> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read normalized project from stdin")?;
        buffer
    } else {
        fs::read_to_string(source)
            .with_context(|| format!("Failed to read normalized project from {source}"))?
    };
    if raw.trim().is_empty() {
        anyhow::bail!("Normalized project is empty. Provide a file or pipe JSON via stdin.");
    }

    let project: NormalizedProject =
        serde_json::from_str(&raw).context("Invalid normalized project JSON")?;
    let project = match repo_name {
        Some(name) => NormalizedProject {
            repo_name: Some(name),
            ..project
        },
        None => project,
    };
    Ok(project.canonicalize())
}
