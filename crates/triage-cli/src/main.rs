//! Cluster triage CLI
//!
//! One-shot diagnostic report for a live Kubernetes cluster: runs the
//! built-in check library concurrently and renders one pass/fail line per
//! check, with findings. All cluster access is read-only.

mod auth;
mod console;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use triage::{
    checks, CheckRegistry, CheckResult, CheckRunner, ClusterProvider, KubeProvider,
    RegistryOptions, ReportSummary,
};

/// Diagnose common failure symptoms in a Kubernetes cluster
#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Diagnose common failure symptoms in a Kubernetes cluster")]
#[command(version)]
struct Cli {
    /// Path to a kubeconfig file (defaults to the standard loading chain)
    #[arg(short, long, value_name = "FILE", env = "KUBECONFIG")]
    kubeconfig: Option<PathBuf>,

    /// Namespace holding the cluster's infrastructure pods
    #[arg(long, default_value = checks::infra::DEFAULT_NAMESPACE)]
    infra_namespace: String,

    /// Active-run count above which a cron job is flagged
    #[arg(long, default_value_t = checks::cronjobs::DEFAULT_ACTIVE_THRESHOLD)]
    cron_threshold: usize,

    /// Per-check deadline in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Run only the named checks (repeatable; see --list)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,

    /// List the available checks and exit
    #[arg(long)]
    list: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON rendition of one run.
#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    results: &'a [CheckResult],
    summary: ReportSummary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "triage=debug" } else { "triage=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = RegistryOptions {
        infra_namespace: cli.infra_namespace.clone(),
        cron_active_threshold: cli.cron_threshold,
    };
    let mut registry = CheckRegistry::builtin_with(&options);

    if cli.list {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    if !cli.only.is_empty() {
        registry = registry
            .retain(&cli.only)
            .context("unusable --only filter")?;
    }

    let client = auth::build_client(cli.kubeconfig.as_deref()).await?;
    let provider: Arc<dyn ClusterProvider> = Arc::new(KubeProvider::new(client));

    debug!(checks = registry.len(), timeout = cli.timeout, "starting run");
    let runner = CheckRunner::with_timeout(Duration::from_secs(cli.timeout));
    let results = runner.run(&registry, provider).await;
    let summary = ReportSummary::of(&results);

    match cli.format {
        OutputFormat::Text => {
            let mut sink = console::ConsoleSink::stdout();
            triage::render(&mut sink, &results);
            println!();
            println!("{}", console::summary_line(&summary));
        }
        OutputFormat::Json => {
            let report = JsonReport {
                generated_at: Utc::now(),
                results: &results,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if !summary.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
