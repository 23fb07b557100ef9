//! Pipeline state store: bootstrap, load, and persist the on-disk ledgers.
//!
//! Layout under the configured directories:
//! ```text
//! <data_dir>/
//! ├── topics.json        (TopicsLedger, `[]` on first run)
//! ├── performance.json   (PerformanceLedger)
//! └── pipeline.log
//! <site_dir>/
//! ├── index.md           (placeholder, written once)
//! ├── posts.json
//! └── posts/
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use neuralstack_shared::{PerformanceLedger, PipelineError, PipelinePaths, Result, Topic};

/// Create every persisted artifact that does not exist yet.
///
/// Existing files are never overwritten, so calling this on every run is safe.
pub fn ensure_initial_files(paths: &PipelinePaths, site_title: &str) -> Result<()> {
    for dir in [&paths.data_dir, &paths.site_dir, &paths.posts_dir] {
        std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
    }

    let empty_ledger = to_pretty_json(&PerformanceLedger::default())?;
    let index = index_placeholder(site_title);

    let created = [
        write_if_absent(&paths.topics_file, "[]")?,
        write_if_absent(&paths.performance_file, &empty_ledger)?,
        write_if_absent(&paths.log_file, "")?,
        write_if_absent(&paths.index_file, &index)?,
    ];

    let created = created.iter().filter(|c| **c).count();
    if created > 0 {
        info!(created, data_dir = %paths.data_dir.display(), "bootstrapped pipeline files");
    }
    Ok(())
}

/// Load the performance ledger, falling back to an empty one if the file is
/// missing, unreadable, or not valid JSON.
pub fn load_performance(path: &Path) -> PerformanceLedger {
    match read_json::<PerformanceLedger>(path) {
        Ok(ledger) => {
            debug!(runs = ledger.runs.len(), "loaded performance ledger");
            ledger
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "performance ledger unreadable, starting fresh");
            PerformanceLedger::default()
        }
    }
}

/// Overwrite the performance ledger atomically.
pub fn save_performance(path: &Path, ledger: &PerformanceLedger) -> Result<()> {
    write_json_atomic(path, ledger)?;
    debug!(path = %path.display(), runs = ledger.runs.len(), "saved performance ledger");
    Ok(())
}

/// Load the topics ledger. A missing file is an empty ledger; a corrupt one is an error.
pub fn load_topics(path: &Path) -> Result<Vec<Topic>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_json(path)
}

/// Overwrite the topics ledger atomically.
pub fn save_topics(path: &Path, topics: &[Topic]) -> Result<()> {
    write_json_atomic(path, &topics)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn index_placeholder(site_title: &str) -> String {
    format!(
        "# {site_title}\n\n\
         Welcome to an automatically updated collection of deep-dive articles on\n\
         developer tools, compatibility guides, and translated tech insights.\n\n\
         New long-form posts are generated and validated daily.\n"
    )
}

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| PipelineError::parse(format!("invalid {}: {e}", path.display())))
}

/// Write a pretty-printed JSON file atomically (write to temp, then rename).
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    write_atomic(path, to_pretty_json(data)?.as_bytes())
}

/// Write bytes atomically (write to temp, then rename).
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp = temp_path(path);
    std::fs::write(&temp, bytes).map_err(|e| PipelineError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

/// Sibling temp file used while `path` is being written.
fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp"))
}

fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Create `path` with `contents` unless it already exists. Returns whether it was created.
///
/// The contents are written to a temp file and hard-linked into place, so
/// `path` either does not exist or holds the complete contents.
fn write_if_absent(path: &Path, contents: &str) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    let temp = temp_path(path);
    std::fs::write(&temp, contents).map_err(|e| PipelineError::io(&temp, e))?;
    let linked = std::fs::hard_link(&temp, path);
    let _ = std::fs::remove_file(&temp);

    match linked {
        Ok(()) => {
            debug!(path = %path.display(), "created");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(PipelineError::io(path, e)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
