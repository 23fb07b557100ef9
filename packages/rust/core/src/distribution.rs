//! Site publisher: writes approved drafts as Markdown posts.
//!
//! Each post lands at `<site_dir>/posts/<slug>.md` with YAML frontmatter, and
//! `<site_dir>/posts.json` keeps one [`PublishedPost`] per slug. The
//! placeholder `index.md` is never touched here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Utc;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};
use url::Url;

use neuralstack_shared::{DraftArticle, PipelineError, PipelinePaths, PublishedPost, Result};

use crate::pipeline::Distribution;
use crate::store;

/// Publishes approved drafts into the site directory.
#[derive(Debug, Clone)]
pub struct SitePublisher {
    site_dir: PathBuf,
    posts_dir: PathBuf,
    manifest: PathBuf,
    base_url: Option<Url>,
    affiliates: BTreeMap<String, String>,
}

impl SitePublisher {
    pub fn new(paths: &PipelinePaths) -> Self {
        Self {
            site_dir: paths.site_dir.clone(),
            posts_dir: paths.posts_dir.clone(),
            manifest: paths.posts_manifest.clone(),
            base_url: None,
            affiliates: BTreeMap::new(),
        }
    }

    /// Emit `canonical_url` frontmatter relative to `base_url`.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Replacements for `{{AFFILIATE_TOOL_N}}` placeholders.
    pub fn with_affiliates(mut self, affiliates: BTreeMap<String, String>) -> Self {
        self.affiliates = affiliates;
        self
    }

    fn canonical_url(&self, slug: &str) -> Option<Url> {
        self.base_url.as_ref()?.join(&format!("posts/{slug}")).ok()
    }

    fn publish_one(&self, draft: &DraftArticle) -> Result<(PathBuf, PublishedPost)> {
        let url = self.canonical_url(&draft.slug);
        let markdown = render_post(draft, url.as_ref(), &self.affiliates);

        let path = self.posts_dir.join(format!("{}.md", draft.slug));
        store::write_atomic(&path, markdown.as_bytes())?;

        let hash = format!("{:x}", Sha256::digest(markdown.as_bytes()));
        debug!(path = %path.display(), size = markdown.len(), "wrote post");

        let relative = path
            .strip_prefix(&self.site_dir)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        let post = PublishedPost {
            topic_id: draft.topic_id.clone(),
            slug: draft.slug.clone(),
            title: draft.title.clone(),
            path: relative,
            url: url.map(String::from),
            sha256: hash,
            size_bytes: markdown.len(),
            published_at: Utc::now(),
        };
        Ok((path, post))
    }
}

impl Distribution for SitePublisher {
    #[instrument(skip_all, fields(approved = approved.len()))]
    fn run(&self, approved: &[DraftArticle]) -> Result<Vec<PathBuf>> {
        if approved.is_empty() {
            info!("nothing to publish");
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(&self.posts_dir)
            .map_err(|e| PipelineError::io(&self.posts_dir, e))?;

        let mut paths = Vec::with_capacity(approved.len());
        let mut posts = Vec::with_capacity(approved.len());
        let mut failure = None;
        for draft in approved {
            match self.publish_one(draft) {
                Ok((path, post)) => {
                    paths.push(path);
                    posts.push(post);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        // Posts already on disk must be in the manifest even if the batch failed.
        if !posts.is_empty() {
            update_manifest(&self.manifest, posts)?;
        }
        if let Some(e) = failure {
            warn!(
                written = paths.len(),
                approved = approved.len(),
                error = %e,
                "distribution stopped early"
            );
            return Err(e);
        }

        info!(published = paths.len(), "distribution complete");
        Ok(paths)
    }
}

/// Render a draft as a Markdown post with YAML frontmatter.
pub fn render_post(
    draft: &DraftArticle,
    canonical_url: Option<&Url>,
    affiliates: &BTreeMap<String, String>,
) -> String {
    let mut fm = String::from("---\n");
    fm.push_str(&format!("title: \"{}\"\n", escape_yaml_string(&draft.title)));
    fm.push_str(&format!("slug: \"{}\"\n", draft.slug));
    fm.push_str(&format!("topic_id: \"{}\"\n", escape_yaml_string(&draft.topic_id)));
    fm.push_str(&format!("created_at: \"{}\"\n", draft.created_at.to_rfc3339()));
    if let Some(url) = canonical_url {
        fm.push_str(&format!("canonical_url: \"{url}\"\n"));
    }
    fm.push_str("---\n");

    let body = fill_affiliates(&draft.content, affiliates);
    format!("{fm}\n{body}\n")
}

/// Replace `{{AFFILIATE_TOOL_N}}` placeholders; unknown names are left intact.
pub fn fill_affiliates(content: &str, affiliates: &BTreeMap<String, String>) -> String {
    static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\{\{\s*(AFFILIATE_TOOL_\d+)\s*\}\}").expect("valid regex")
    });

    if affiliates.is_empty() {
        return content.to_string();
    }

    PLACEHOLDER_RE
        .replace_all(content, |caps: &Captures<'_>| match affiliates.get(&caps[1]) {
            Some(replacement) => replacement.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Merge freshly published posts into `posts.json`, replacing entries by slug.
fn update_manifest(path: &Path, posts: Vec<PublishedPost>) -> Result<()> {
    let mut manifest: Vec<PublishedPost> = if path.exists() {
        store::read_json(path)?
    } else {
        Vec::new()
    };

    for post in posts {
        manifest.retain(|existing| existing.slug != post.slug);
        manifest.push(post);
    }

    store::write_json_atomic(path, &manifest)?;
    debug!(entries = manifest.len(), "posts manifest updated");
    Ok(())
}

/// Escape special characters in a YAML string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
