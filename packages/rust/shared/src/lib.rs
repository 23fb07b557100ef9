//! Shared types, error model, and configuration for the NeuralStack pipeline.
//!
//! This crate is the foundation depended on by all other NeuralStack crates.
//! It provides:
//! - [`PipelineError`]: the unified error type
//! - Domain types ([`Topic`], [`DraftArticle`], [`RunEntry`], [`PerformanceLedger`])
//! - Configuration ([`AppConfig`], [`PipelinePaths`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DiscoveryConfig, DistributionConfig, LogFormat, LoggingConfig, PathsConfig,
    PipelinePaths, RunConfig, SeedTopic, SiteConfig, config_file_path, load_config,
    load_config_from,
};
pub use error::{PipelineError, Result};
pub use types::{
    CURRENT_SCHEMA_VERSION, DraftArticle, PerformanceLedger, PublishedPost, RunEntry, RunStatus,
    Topic,
};
