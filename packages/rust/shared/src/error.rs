//! Error types for the NeuralStack pipeline.
//!
//! Library crates use [`PipelineError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A persisted JSON file could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Malformed input (e.g. a topic without a keyword).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A pipeline stage failed for a reason of its own.
    #[error("{stage} stage failed: {message}")]
    Stage { stage: &'static str, message: String },

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a stage error tagged with the stage name.
    pub fn stage(stage: &'static str, msg: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PipelineError::validation("topic at index 0 has no keyword");
        assert_eq!(
            err.to_string(),
            "validation error: topic at index 0 has no keyword"
        );

        let err = PipelineError::stage("distribution", "disk full");
        assert_eq!(err.to_string(), "distribution stage failed: disk full");
    }

    #[test]
    fn io_error_includes_path() {
        let err = PipelineError::io(
            "/tmp/performance.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("performance.json"));
    }
}
