//! Application configuration for the NeuralStack pipeline.
//!
//! Config is looked up at `$NEURALSTACK_CONFIG`, then `./neuralstack.toml`,
//! then `~/.neuralstack/neuralstack.toml`. Missing files fall back to defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "neuralstack.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".neuralstack";

/// Environment variable that overrides config file lookup.
const CONFIG_ENV_VAR: &str = "NEURALSTACK_CONFIG";

// ---------------------------------------------------------------------------
// Config structs (matching neuralstack.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where persisted state and the site live.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Site metadata.
    #[serde(default)]
    pub site: SiteConfig,

    /// Seed-based topic discovery.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Publishing settings.
    #[serde(default)]
    pub distribution: DistributionConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Process-level run behavior.
    #[serde(default)]
    pub run: RunConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for ledgers and the log file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for the published site.
    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            site_dir: default_site_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_site_dir() -> PathBuf {
    PathBuf::from("site")
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Heading written into the placeholder `index.md`.
    #[serde(default = "default_site_title")]
    pub title: String,

    /// Public base URL; when set, posts get a `canonical_url`.
    #[serde(default)]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            base_url: String::new(),
        }
    }
}

fn default_site_title() -> String {
    "NeuralStack Autonomous Tech Insights".into()
}

/// `[discovery]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Upper bound on new topics accepted per run.
    #[serde(default = "default_max_topics")]
    pub max_topics_per_run: usize,

    /// Candidate keywords, consumed in order.
    #[serde(default = "default_seeds")]
    pub seeds: Vec<SeedTopic>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_topics_per_run: default_max_topics(),
            seeds: default_seeds(),
        }
    }
}

fn default_max_topics() -> usize {
    3
}

fn default_seeds() -> Vec<SeedTopic> {
    vec![
        SeedTopic::new("vim vs vscode", "editors", "comparison"),
        SeedTopic::new("docker compose vs kubernetes for small teams", "devops", "comparison"),
        SeedTopic::new("python 3.12 migration guide", "languages", "compatibility"),
        SeedTopic::new("postgres vs sqlite for side projects", "databases", "comparison"),
    ]
}

/// `[[discovery.seeds]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTopic {
    pub keyword: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub intent: String,
}

impl SeedTopic {
    fn new(keyword: &str, category: &str, intent: &str) -> Self {
        Self {
            keyword: keyword.into(),
            category: category.into(),
            intent: intent.into(),
        }
    }
}

/// `[distribution]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Replacements for `{{AFFILIATE_TOOL_N}}` placeholders, keyed by name.
    #[serde(default)]
    pub affiliates: BTreeMap<String, String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Format of stdout log lines. The log file is always plain text.
    #[serde(default)]
    pub format: LogFormat,
}

/// `[run]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Exit non-zero when the pass is recorded as failed.
    #[serde(default)]
    pub fail_exit_code: bool,
}

// ---------------------------------------------------------------------------
// Resolved file layout
// ---------------------------------------------------------------------------

/// Every persisted location the pipeline touches, derived from [`PathsConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub data_dir: PathBuf,
    pub site_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub topics_file: PathBuf,
    pub performance_file: PathBuf,
    pub log_file: PathBuf,
    pub index_file: PathBuf,
    pub posts_manifest: PathBuf,
}

impl PipelinePaths {
    /// Lay out files under explicit data and site directories.
    pub fn new(data_dir: impl Into<PathBuf>, site_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let site_dir = site_dir.into();
        Self {
            posts_dir: site_dir.join("posts"),
            topics_file: data_dir.join("topics.json"),
            performance_file: data_dir.join("performance.json"),
            log_file: data_dir.join("pipeline.log"),
            index_file: site_dir.join("index.md"),
            posts_manifest: site_dir.join("posts.json"),
            data_dir,
            site_dir,
        }
    }

    /// Resolve configured paths, anchoring relative ones at `base`.
    pub fn resolve(config: &PathsConfig, base: &Path) -> Self {
        Self::new(base.join(&config.data_dir), base.join(&config.site_dir))
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Find the config file to use, if any exists.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    let home = dirs::home_dir()?.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    home.exists().then_some(home)
}

/// Load the application config. Returns defaults if no config file is found.
pub fn load_config() -> Result<AppConfig> {
    match config_file_path() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PipelineError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    if !config.site.base_url.is_empty() {
        url::Url::parse(&config.site.base_url).map_err(|e| {
            PipelineError::config(format!(
                "site.base_url '{}' is not a valid URL: {e}",
                config.site.base_url
            ))
        })?;
    }

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("vim vs vscode"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.discovery.max_topics_per_run, 3);
        assert_eq!(parsed.paths.data_dir, PathBuf::from("data"));
        assert!(!parsed.run.fail_exit_code);
    }

    #[test]
    fn config_with_seeds_and_affiliates() {
        let toml_str = r#"
[paths]
data_dir = "/var/lib/neuralstack"

[discovery]
max_topics_per_run = 1

[[discovery.seeds]]
keyword = "neovim lua config"

[distribution.affiliates]
AFFILIATE_TOOL_1 = "[Zed](https://zed.dev)"

[logging]
format = "json"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.paths.data_dir, PathBuf::from("/var/lib/neuralstack"));
        assert_eq!(config.paths.site_dir, PathBuf::from("site"));
        assert_eq!(config.discovery.seeds.len(), 1);
        assert_eq!(config.discovery.seeds[0].category, "");
        assert_eq!(
            config.distribution.affiliates.get("AFFILIATE_TOOL_1").map(String::as_str),
            Some("[Zed](https://zed.dev)")
        );
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn invalid_base_url_rejected() {
        let dir = std::env::temp_dir().join(format!("ns-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[site]\nbase_url = \"not a url\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("base_url"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn paths_resolve_against_base() {
        let paths = PipelinePaths::resolve(&PathsConfig::default(), Path::new("/srv/blog"));
        assert_eq!(paths.topics_file, PathBuf::from("/srv/blog/data/topics.json"));
        assert_eq!(paths.posts_dir, PathBuf::from("/srv/blog/site/posts"));
        assert_eq!(paths.index_file, PathBuf::from("/srv/blog/site/index.md"));
    }

    #[test]
    fn absolute_paths_win_over_base() {
        let config = PathsConfig {
            data_dir: PathBuf::from("/var/lib/ns"),
            site_dir: PathBuf::from("public"),
        };
        let paths = PipelinePaths::resolve(&config, Path::new("/srv/blog"));
        assert_eq!(paths.performance_file, PathBuf::from("/var/lib/ns/performance.json"));
        assert_eq!(paths.site_dir, PathBuf::from("/srv/blog/public"));
    }
}
