//! Quality gate between content generation and publishing.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{info, instrument, warn};

use neuralstack_content::{MIN_WORDS, count_words};
use neuralstack_shared::{DraftArticle, Result};

use crate::pipeline::Validation;

/// Approves drafts that are complete, long enough, and not yet published.
#[derive(Debug, Clone)]
pub struct QualityGate {
    posts_dir: PathBuf,
    min_words: usize,
}

impl QualityGate {
    pub fn new(posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            min_words: MIN_WORDS,
        }
    }

    /// Why `draft` should be rejected, if it should.
    fn rejection(&self, draft: &DraftArticle, seen: &HashSet<&str>) -> Option<String> {
        if draft.title.trim().is_empty() {
            return Some("empty title".into());
        }
        if draft.slug.is_empty() {
            return Some("empty slug".into());
        }
        let words = count_words(&draft.content);
        if words < self.min_words {
            return Some(format!("{words} words, need {}", self.min_words));
        }
        if seen.contains(draft.slug.as_str()) {
            return Some("duplicate slug in batch".into());
        }
        if self.posts_dir.join(format!("{}.md", draft.slug)).exists() {
            return Some("already published".into());
        }
        None
    }
}

impl Validation for QualityGate {
    #[instrument(skip_all, fields(drafts = drafts.len()))]
    fn run(&self, drafts: &[DraftArticle]) -> Result<Vec<DraftArticle>> {
        let mut seen = HashSet::new();
        let mut approved = Vec::with_capacity(drafts.len());

        for draft in drafts {
            match self.rejection(draft, &seen) {
                Some(reason) => {
                    warn!(topic_id = %draft.topic_id, slug = %draft.slug, %reason, "draft rejected");
                }
                None => {
                    seen.insert(draft.slug.as_str());
                    approved.push(draft.clone());
                }
            }
        }

        info!(
            approved = approved.len(),
            rejected = drafts.len() - approved.len(),
            "validation complete"
        );
        Ok(approved)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ns-validation-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn draft(topic_id: &str, title: &str, words: usize) -> DraftArticle {
        DraftArticle {
            topic_id: topic_id.into(),
            title: title.into(),
            slug: neuralstack_content::slugify(title),
            content: "word ".repeat(words),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn approves_complete_drafts_in_order() {
        let tmp = temp_dir();
        let drafts = vec![draft("t1", "vim vs vscode", 1200), draft("t2", "helix", 1500)];

        let approved = QualityGate::new(&tmp).run(&drafts).unwrap();
        assert_eq!(approved, drafts);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_short_and_empty_slug_drafts() {
        let tmp = temp_dir();
        let drafts = vec![
            draft("t1", "vim vs vscode", 1199),
            draft("t2", "???", 1300),
            draft("t3", "helix", 1300),
        ];

        let approved = QualityGate::new(&tmp).run(&drafts).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].topic_id, "t3");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_duplicates_and_already_published() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("zed.md"), "published").unwrap();
        let drafts = vec![
            draft("t1", "vim vs vscode", 1300),
            draft("t2", "Vim vs VSCode", 1300),
            draft("t3", "zed", 1300),
        ];

        let approved = QualityGate::new(&tmp).run(&drafts).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].topic_id, "t1");

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
