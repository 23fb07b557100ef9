//! Seed-based topic discovery backed by the topics ledger.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use neuralstack_content::slugify;
use neuralstack_shared::{PipelineError, PipelinePaths, Result, SeedTopic, Topic};

use crate::pipeline::Discovery;
use crate::store;

/// Turns configured seed keywords into topics until each one is published.
///
/// A seed is done once `posts/<slug>.md` exists. Until then every run offers
/// it again, reusing the topic already recorded in `topics.json` so its id
/// stays stable across retries. Seeds are keyed by slug, so keywords that
/// differ only in case or punctuation count as one.
#[derive(Debug, Clone)]
pub struct SeedDiscovery {
    topics_file: PathBuf,
    posts_dir: PathBuf,
    seeds: Vec<SeedTopic>,
    max_per_run: usize,
}

impl SeedDiscovery {
    pub fn new(paths: &PipelinePaths, seeds: Vec<SeedTopic>, max_per_run: usize) -> Self {
        Self {
            topics_file: paths.topics_file.clone(),
            posts_dir: paths.posts_dir.clone(),
            seeds,
            max_per_run,
        }
    }

    fn is_published(&self, slug: &str) -> bool {
        self.posts_dir.join(format!("{slug}.md")).exists()
    }
}

impl Discovery for SeedDiscovery {
    #[instrument(skip_all, fields(seeds = self.seeds.len(), max = self.max_per_run))]
    fn run(&self) -> Result<Vec<Topic>> {
        let mut ledger = store::load_topics(&self.topics_file).map_err(|e| {
            PipelineError::stage("discovery", format!("topics ledger unusable: {e}"))
        })?;

        let mut seen = HashSet::new();
        let mut discovered = Vec::new();
        let mut added = 0;

        for seed in &self.seeds {
            if discovered.len() >= self.max_per_run {
                break;
            }
            let slug = slugify(&seed.keyword);
            if slug.is_empty() || !seen.insert(slug.clone()) {
                debug!(keyword = %seed.keyword, "seed has no usable slug or repeats one, skipping");
                continue;
            }
            if self.is_published(&slug) {
                debug!(%slug, "already published, skipping");
                continue;
            }

            let topic = match ledger.iter().find(|t| slugify(&t.keyword) == slug) {
                Some(pending) => {
                    debug!(id = %pending.id, %slug, "retrying unpublished topic");
                    pending.clone()
                }
                None => {
                    let topic = Topic {
                        id: Uuid::now_v7().to_string(),
                        keyword: seed.keyword.trim().to_string(),
                        category: non_empty(&seed.category),
                        intent: non_empty(&seed.intent),
                    };
                    ledger.push(topic.clone());
                    added += 1;
                    topic
                }
            };
            discovered.push(topic);
        }

        if added > 0 {
            store::save_topics(&self.topics_file, &ledger)?;
        }

        info!(
            discovered = discovered.len(),
            new = added,
            known = ledger.len(),
            "discovery complete"
        );
        Ok(discovered)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ns-discovery-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn paths_in(root: &std::path::Path) -> PipelinePaths {
        let paths = PipelinePaths::new(root.join("data"), root.join("site"));
        std::fs::create_dir_all(&paths.data_dir).unwrap();
        std::fs::create_dir_all(&paths.posts_dir).unwrap();
        paths
    }

    fn seed(keyword: &str) -> SeedTopic {
        SeedTopic {
            keyword: keyword.into(),
            category: "editors".into(),
            intent: String::new(),
        }
    }

    fn publish(paths: &PipelinePaths, slug: &str) {
        std::fs::write(paths.posts_dir.join(format!("{slug}.md")), "published").unwrap();
    }

    #[test]
    fn discovers_new_seeds_and_persists_them() {
        let tmp = temp_dir();
        let paths = paths_in(&tmp);
        std::fs::write(&paths.topics_file, "[]").unwrap();

        let discovery = SeedDiscovery::new(&paths, vec![seed("vim vs vscode"), seed("helix")], 5);
        let topics = discovery.run().unwrap();

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].keyword, "vim vs vscode");
        assert_eq!(topics[0].category.as_deref(), Some("editors"));
        assert_eq!(topics[0].intent, None);
        assert_ne!(topics[0].id, topics[1].id);

        let persisted = store::load_topics(&paths.topics_file).unwrap();
        assert_eq!(persisted, topics);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unpublished_topic_is_offered_again_with_same_id() {
        let tmp = temp_dir();
        let paths = paths_in(&tmp);

        let discovery = SeedDiscovery::new(&paths, vec![seed("vim vs vscode")], 5);
        let first = discovery.run().unwrap();
        let second = discovery.run().unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second, first);
        assert_eq!(store::load_topics(&paths.topics_file).unwrap().len(), 1);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn published_seed_is_not_discovered_again() {
        let tmp = temp_dir();
        let paths = paths_in(&tmp);

        let discovery = SeedDiscovery::new(&paths, vec![seed("vim vs vscode")], 5);
        assert_eq!(discovery.run().unwrap().len(), 1);
        publish(&paths, "vim-vs-vscode");

        assert!(discovery.run().unwrap().is_empty());
        assert_eq!(store::load_topics(&paths.topics_file).unwrap().len(), 1);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn respects_per_run_limit_and_dedupes_by_slug() {
        let tmp = temp_dir();
        let paths = paths_in(&tmp);
        std::fs::write(&paths.topics_file, r#"[{"id": "old", "keyword": "Helix"}]"#).unwrap();
        publish(&paths, "zed");

        let seeds = vec![
            seed("helix"),
            seed("vim vs vscode"),
            seed("VIM vs VSCode!"),
            seed("zed"),
            seed("???"),
            seed("emacs"),
            seed("neovim"),
        ];
        let topics = SeedDiscovery::new(&paths, seeds, 3).run().unwrap();

        let keywords: Vec<&str> = topics.iter().map(|t| t.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Helix", "vim vs vscode", "emacs"]);
        assert_eq!(topics[0].id, "old");
        assert_eq!(store::load_topics(&paths.topics_file).unwrap().len(), 3);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn corrupt_ledger_fails_the_stage() {
        let tmp = temp_dir();
        let paths = paths_in(&tmp);
        std::fs::write(&paths.topics_file, "{").unwrap();

        let err = SeedDiscovery::new(&paths, vec![seed("zed")], 1)
            .run()
            .unwrap_err();
        assert!(matches!(err, PipelineError::Stage { stage: "discovery", .. }));
        assert!(err.to_string().contains("topics ledger unusable"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
