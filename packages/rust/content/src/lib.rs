//! Long-form article generation for the NeuralStack pipeline.
//!
//! Turns discovered [`Topic`]s into [`DraftArticle`]s: one deterministic,
//! template-based article per topic, each with a URL-safe slug and a
//! guaranteed minimum length.

mod slug;
mod templates;

use chrono::Utc;
use tracing::{debug, info, instrument};

use neuralstack_shared::{DraftArticle, Result, Topic};

pub use slug::{MAX_SLUG_LEN, slugify};
pub use templates::{ArticleWriter, MIN_WORDS, TemplateWriter, generate_article};

/// Count whitespace-delimited words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The content stage: one draft per topic, in input order.
pub struct ContentStage {
    writer: Box<dyn ArticleWriter>,
}

impl Default for ContentStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStage {
    /// Content stage backed by the offline [`TemplateWriter`].
    pub fn new() -> Self {
        Self::with_writer(Box::new(TemplateWriter))
    }

    /// Content stage backed by a custom writer.
    pub fn with_writer(writer: Box<dyn ArticleWriter>) -> Self {
        Self { writer }
    }

    /// Generate a draft for every topic.
    ///
    /// Fails without producing any drafts if a topic is missing its `id` or
    /// `keyword`.
    #[instrument(skip_all, fields(topics = topics.len()))]
    pub fn run(&self, topics: &[Topic]) -> Result<Vec<DraftArticle>> {
        for topic in topics {
            topic.validate()?;
        }

        let mut drafts = Vec::with_capacity(topics.len());
        for topic in topics {
            let created_at = Utc::now();
            let content = self.writer.write(
                &topic.keyword,
                topic.category.as_deref().unwrap_or(""),
                topic.intent.as_deref().unwrap_or(""),
                created_at,
            );

            let draft = DraftArticle {
                topic_id: topic.id.clone(),
                title: topic.keyword.clone(),
                slug: slugify(&topic.keyword),
                content,
                created_at,
            };

            debug!(
                topic_id = %draft.topic_id,
                slug = %draft.slug,
                words = count_words(&draft.content),
                "generated draft"
            );
            drafts.push(draft);
        }

        info!(drafts = drafts.len(), "content generation complete");
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    struct EchoWriter;

    impl ArticleWriter for EchoWriter {
        fn write(&self, keyword: &str, category: &str, intent: &str, _now: DateTime<Utc>) -> String {
            format!("{keyword}|{category}|{intent}")
        }
    }

    #[test]
    fn count_words_splits_on_any_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  one\ttwo\n\nthree  "), 3);
    }

    #[test]
    fn one_draft_per_topic_in_order() {
        let topics = vec![
            Topic::new("t1", "vim vs vscode"),
            Topic::new("t2", "Emacs: Still Worth It?"),
            Topic::new("t3", "helix"),
        ];

        let drafts = ContentStage::new().run(&topics).expect("run");

        assert_eq!(drafts.len(), topics.len());
        for (topic, draft) in topics.iter().zip(&drafts) {
            assert_eq!(draft.topic_id, topic.id);
            assert_eq!(draft.title, topic.keyword);
            assert!(count_words(&draft.content) >= MIN_WORDS);
        }
        assert_eq!(drafts[0].slug, "vim-vs-vscode");
        assert_eq!(drafts[1].slug, "emacs-still-worth-it");
    }

    #[test]
    fn empty_input_yields_no_drafts() {
        let drafts = ContentStage::new().run(&[]).expect("run");
        assert!(drafts.is_empty());
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let mut with_meta = Topic::new("t1", "vim vs vscode");
        with_meta.category = Some("editors".into());
        let topics = vec![with_meta, Topic::new("t2", "helix")];

        let drafts = ContentStage::with_writer(Box::new(EchoWriter))
            .run(&topics)
            .expect("run");

        assert_eq!(drafts[0].content, "vim vs vscode|editors|");
        assert_eq!(drafts[1].content, "helix||");
    }

    #[test]
    fn malformed_topic_fails_whole_stage() {
        let topics = vec![Topic::new("t1", "vim vs vscode"), Topic::new("t2", "")];

        let err = ContentStage::new().run(&topics).unwrap_err();
        assert!(err.to_string().contains("keyword"));
    }

    #[test]
    fn symbol_only_keyword_gets_empty_slug() {
        let drafts = ContentStage::new()
            .run(&[Topic::new("t1", "???")])
            .expect("run");
        assert_eq!(drafts[0].slug, "");
    }
}
