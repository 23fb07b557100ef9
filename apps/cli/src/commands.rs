//! CLI definition, tracing setup, and the single pipeline pass.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use neuralstack_content::ContentStage;
use neuralstack_core::discovery::SeedDiscovery;
use neuralstack_core::distribution::SitePublisher;
use neuralstack_core::pipeline::{self, Agents, PassConfig, ProgressReporter, RunOutcome};
use neuralstack_core::validation::QualityGate;
use neuralstack_shared::{AppConfig, LogFormat, PipelinePaths, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// NeuralStack: discover, write, validate, and publish long-form articles.
///
/// Runs exactly one pipeline pass and exits. Behavior is configured through
/// `neuralstack.toml` (or `$NEURALSTACK_CONFIG`) and `RUST_LOG`.
#[derive(Parser)]
#[command(name = "neuralstack", version)]
pub(crate) struct Cli {}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Log to stdout and append plain-text lines to the pipeline log file.
fn init_tracing(format: LogFormat, log_file: &Path) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("cannot create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .wrap_err_with(|| format!("cannot open log file {}", log_file.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("neuralstack=info"));

    let text = (format == LogFormat::Text).then(|| fmt::layer().with_target(false));
    let json = (format == LogFormat::Json).then(|| fmt::layer().json());
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text)
        .with(json)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre!("failed to install tracing subscriber: {e}"))
}

// ---------------------------------------------------------------------------
// Pipeline pass
// ---------------------------------------------------------------------------

/// Load config, run one pass, and print a summary.
///
/// A failed pass still exits zero unless `run.fail_exit_code` is set; the
/// failure is in the ledger and the log either way.
pub(crate) fn run() -> Result<()> {
    let config = load_config()?;
    let cwd = std::env::current_dir().wrap_err("cannot determine working directory")?;
    let paths = PipelinePaths::resolve(&config.paths, &cwd);

    init_tracing(config.logging.format, &paths.log_file)?;

    let discovery = SeedDiscovery::new(
        &paths,
        config.discovery.seeds.clone(),
        config.discovery.max_topics_per_run,
    );
    let content = ContentStage::new();
    let validation = QualityGate::new(&paths.posts_dir);
    let distribution = build_publisher(&config, &paths)?;

    let agents = Agents {
        discovery: &discovery,
        content: &content,
        validation: &validation,
        distribution: &distribution,
    };
    let pass = PassConfig {
        paths: paths.clone(),
        site_title: config.site.title.clone(),
    };

    info!(
        data_dir = %paths.data_dir.display(),
        site_dir = %paths.site_dir.display(),
        "running pipeline pass"
    );

    let reporter = CliProgress::new();
    let outcome = pipeline::run_pipeline(&pass, &agents, &reporter)?;

    print_summary(&outcome, &paths);

    if !outcome.is_success() && config.run.fail_exit_code {
        return Err(eyre!(
            "pipeline run {} failed: {}",
            outcome.entry().run_id,
            outcome.entry().errors.join("; ")
        ));
    }
    Ok(())
}

fn build_publisher(config: &AppConfig, paths: &PipelinePaths) -> Result<SitePublisher> {
    let mut publisher =
        SitePublisher::new(paths).with_affiliates(config.distribution.affiliates.clone());

    if !config.site.base_url.is_empty() {
        let base = Url::parse(&config.site.base_url)
            .map_err(|e| eyre!("invalid site.base_url '{}': {e}", config.site.base_url))?;
        publisher = publisher.with_base_url(base);
    }
    Ok(publisher)
}

fn print_summary(outcome: &RunOutcome, paths: &PipelinePaths) {
    let entry = outcome.entry();
    println!();
    if outcome.is_success() {
        println!("  Pipeline run completed.");
    } else {
        println!("  Pipeline run failed (recorded in ledger).");
    }
    println!("  Run:        {}", entry.run_id);
    println!("  Topics:     {}", entry.generated_topics);
    println!("  Articles:   {}", entry.generated_articles);
    println!("  Published:  {}", entry.published_articles);
    for error in &entry.errors {
        println!("  Error:      {error}");
    }
    println!("  Ledger:     {}", paths.performance_file.display());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn stage_complete(&self, name: &str, count: usize) {
        self.spinner.set_message(format!("{name}: {count}"));
    }

    fn done(&self, _outcome: &RunOutcome) {
        self.spinner.finish_and_clear();
    }
}
