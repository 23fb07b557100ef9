//! End-to-end pipeline pass: discovery → content → validation → distribution.
//!
//! A pass is a small state machine. The run entry starts as `started`, the
//! four stages execute in order inside one failure boundary, and the entry is
//! finalized as `success` or `failed` and recorded in the performance ledger
//! whatever happened.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, info_span};

use neuralstack_content::ContentStage;
use neuralstack_shared::{
    DraftArticle, PerformanceLedger, PipelinePaths, Result, RunEntry, RunStatus, Topic,
};

use crate::store;

// ---------------------------------------------------------------------------
// Stage seams
// ---------------------------------------------------------------------------

/// Produces the topics for this run.
pub trait Discovery {
    fn run(&self) -> Result<Vec<Topic>>;
}

/// Returns the approved subset of the drafts.
pub trait Validation {
    fn run(&self, drafts: &[DraftArticle]) -> Result<Vec<DraftArticle>>;
}

/// Publishes approved drafts and returns one path per published artifact.
pub trait Distribution {
    fn run(&self, approved: &[DraftArticle]) -> Result<Vec<PathBuf>>;
}

/// The stages a pass runs, in order.
pub struct Agents<'a> {
    pub discovery: &'a dyn Discovery,
    pub content: &'a ContentStage,
    pub validation: &'a dyn Validation,
    pub distribution: &'a dyn Distribution,
}

// ---------------------------------------------------------------------------
// Outcome and progress
// ---------------------------------------------------------------------------

/// How a pass ended. Both variants carry the recorded run entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded(RunEntry),
    Failed(RunEntry),
}

impl RunOutcome {
    /// The run entry that was appended to the ledger.
    pub fn entry(&self) -> &RunEntry {
        match self {
            Self::Succeeded(entry) | Self::Failed(entry) => entry,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when a stage starts.
    fn phase(&self, name: &str);
    /// Called when a stage returns successfully with `count` items.
    fn stage_complete(&self, name: &str, count: usize);
    /// Called once the outcome has been recorded.
    fn done(&self, outcome: &RunOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn stage_complete(&self, _name: &str, _count: usize) {}
    fn done(&self, _outcome: &RunOutcome) {}
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Configuration for a full pipeline pass.
#[derive(Debug, Clone)]
pub struct PassConfig {
    /// Where the ledgers, log, and site live.
    pub paths: PipelinePaths,
    /// Heading for the placeholder site index.
    pub site_title: String,
}

/// Run one complete pass: bootstrap, load the ledger, run the stages, persist.
///
/// Stage failures never surface as `Err`; they are recorded as a failed run.
/// An `Err` here means the pipeline's own files could not be created or written.
pub fn run_pipeline(
    config: &PassConfig,
    agents: &Agents<'_>,
    progress: &dyn ProgressReporter,
) -> Result<RunOutcome> {
    store::ensure_initial_files(&config.paths, &config.site_title)?;

    let ledger = store::load_performance(&config.paths.performance_file);
    let (ledger, outcome) = run_pass(agents, ledger, progress);

    store::save_performance(&config.paths.performance_file, &ledger)?;
    progress.done(&outcome);

    Ok(outcome)
}

/// Execute the stages and fold the result into `ledger`.
///
/// This is the pure state transition at the heart of [`run_pipeline`]: it
/// performs no ledger I/O, and it always appends exactly one run entry.
pub fn run_pass(
    agents: &Agents<'_>,
    ledger: PerformanceLedger,
    progress: &dyn ProgressReporter,
) -> (PerformanceLedger, RunOutcome) {
    let start = Instant::now();
    let mut entry = RunEntry::start(Utc::now());

    let span = info_span!("pipeline", run_id = %entry.run_id);
    let _guard = span.enter();
    info!(timestamp = %entry.timestamp.to_rfc3339(), "starting pipeline run");

    let result = execute(agents, &mut entry, progress);

    match &result {
        Ok(()) => {
            entry.status = RunStatus::Success;
            info!(
                generated_topics = entry.generated_topics,
                generated_articles = entry.generated_articles,
                published_articles = entry.published_articles,
                elapsed_ms = start.elapsed().as_millis(),
                "pipeline completed successfully"
            );
        }
        Err(e) => {
            entry.status = RunStatus::Failed;
            entry.errors.push(e.to_string());
            error!(
                error = %error_chain(e),
                generated_topics = entry.generated_topics,
                generated_articles = entry.generated_articles,
                elapsed_ms = start.elapsed().as_millis(),
                "pipeline failed"
            );
        }
    }

    let ledger = ledger.record(entry.clone());
    let outcome = match result {
        Ok(()) => RunOutcome::Succeeded(entry),
        Err(_) => RunOutcome::Failed(entry),
    };
    (ledger, outcome)
}

/// Run the four stages in order, recording counts as each one completes.
fn execute(
    agents: &Agents<'_>,
    entry: &mut RunEntry,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    progress.phase("Discovering topics");
    info!("starting discovery");
    let topics = agents.discovery.run()?;
    entry.generated_topics = topics.len();
    progress.stage_complete("discovery", topics.len());

    progress.phase("Generating articles");
    info!(topics = topics.len(), "starting content generation");
    let drafts = agents.content.run(&topics)?;
    entry.generated_articles = drafts.len();
    progress.stage_complete("content", drafts.len());

    progress.phase("Validating drafts");
    info!(drafts = drafts.len(), "starting validation");
    let approved = agents.validation.run(&drafts)?;
    progress.stage_complete("validation", approved.len());

    progress.phase("Publishing");
    info!(approved = approved.len(), "starting distribution");
    let published = agents.distribution.run(&approved)?;
    entry.published_articles = published.len();
    progress.stage_complete("distribution", published.len());

    Ok(())
}

/// Render an error with its `source()` chain.
///
/// Causes whose text already appears in the rendered message are skipped, so
/// variants that format their source inline are not repeated.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
