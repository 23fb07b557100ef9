//! Core domain types for the NeuralStack pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PipelineError, Result};

/// Current schema version for the performance ledger format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A candidate keyword/subject for an article, as stored in `topics.json`.
///
/// Missing `id` or `keyword` fields deserialize to empty strings so that a
/// malformed ledger entry reaches the content stage and fails the run there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Externally assigned unique identifier.
    #[serde(default)]
    pub id: String,
    /// Display keyword, also used as the article title.
    #[serde(default)]
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

impl Topic {
    /// Create a topic with just an id and keyword.
    pub fn new(id: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keyword: keyword.into(),
            category: None,
            intent: None,
        }
    }

    /// Reject topics that lack a required field.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PipelineError::validation(format!(
                "topic '{}' is missing required field 'id'",
                self.keyword
            )));
        }
        if self.keyword.trim().is_empty() {
            return Err(PipelineError::validation(format!(
                "topic '{}' is missing required field 'keyword'",
                self.id
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DraftArticle
// ---------------------------------------------------------------------------

/// Generated article content plus identifying metadata, prior to approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftArticle {
    /// The [`Topic::id`] this draft was generated from.
    pub topic_id: String,
    pub title: String,
    /// URL-safe slug derived from `title`.
    pub slug: String,
    /// Markdown body.
    pub content: String,
    /// When this draft was generated.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// RunEntry
// ---------------------------------------------------------------------------

/// Lifecycle status of a single pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Started,
    Success,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Started => "started",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One record per orchestrator invocation, appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEntry {
    /// Time-sortable run identifier, echoed in log lines.
    #[serde(default)]
    pub run_id: String,
    /// Fixed at run start.
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default)]
    pub generated_topics: usize,
    #[serde(default)]
    pub generated_articles: usize,
    #[serde(default)]
    pub published_articles: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl RunEntry {
    /// A fresh entry in the `started` state.
    pub fn start(timestamp: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::now_v7().to_string(),
            timestamp,
            status: RunStatus::Started,
            generated_topics: 0,
            generated_articles: 0,
            published_articles: 0,
            errors: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// PerformanceLedger
// ---------------------------------------------------------------------------

/// The `performance.json` structure: cumulative pipeline history.
///
/// Every field is defaulted so a partially written ledger still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceLedger {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub runs: Vec<RunEntry>,
    /// Sum of `published_articles` over every recorded run.
    #[serde(default)]
    pub articles_published: usize,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    /// Concatenation, in run order, of every run's `errors`.
    #[serde(default)]
    pub errors: Vec<String>,
}

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Default for PerformanceLedger {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            runs: Vec::new(),
            articles_published: 0,
            last_run: None,
            errors: Vec::new(),
        }
    }
}

impl PerformanceLedger {
    /// Append a finished run and fold it into the cumulative counters.
    pub fn record(mut self, entry: RunEntry) -> Self {
        self.last_run = Some(entry.timestamp);
        self.articles_published += entry.published_articles;
        self.errors.extend(entry.errors.iter().cloned());
        self.runs.push(entry);
        self
    }
}

// ---------------------------------------------------------------------------
// PublishedPost
// ---------------------------------------------------------------------------

/// An entry in the site's `posts.json` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPost {
    pub topic_id: String,
    pub slug: String,
    pub title: String,
    /// Path of the Markdown file, relative to the site directory.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// SHA-256 of the rendered Markdown.
    pub sha256: String,
    pub size_bytes: usize,
    pub published_at: DateTime<Utc>,
}
