//! Long-form article templates and the minimum-length guarantee.
//!
//! The generator is deterministic: given the same keyword, category, intent
//! and reference time it always produces the same document.

use chrono::{DateTime, Utc};

use crate::count_words;

/// Minimum number of whitespace-delimited words in a generated article.
pub const MIN_WORDS: usize = 1200;

/// Separator placed between sections and padding blocks.
const SECTION_SEPARATOR: &str = "\n\n";

/// Appended until the article reaches [`MIN_WORDS`].
const PADDING: &str = "In practice, every organisation should start with small, low-risk \
experiments, watch the operational impact for several weeks, and only then roll out broader \
changes. Write the trade-offs down clearly so that future engineers understand not only what \
was chosen, but also why the alternatives were rejected.";

/// Pluggable article source.
///
/// [`TemplateWriter`] is the offline default. A local model server can be
/// wired in by implementing this trait.
pub trait ArticleWriter: Send + Sync {
    /// Produce a Markdown article for `keyword`.
    fn write(&self, keyword: &str, category: &str, intent: &str, now: DateTime<Utc>) -> String;
}

/// Deterministic, template-based writer. Runs offline at zero cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateWriter;

impl ArticleWriter for TemplateWriter {
    fn write(&self, keyword: &str, category: &str, intent: &str, now: DateTime<Utc>) -> String {
        generate_article(keyword, category, intent, now)
    }
}

/// Compose the full article and pad it to at least [`MIN_WORDS`] words.
pub fn generate_article(keyword: &str, category: &str, intent: &str, now: DateTime<Utc>) -> String {
    let sections = [
        intro(keyword, category, intent, now),
        CORE_CONCEPTS.to_string(),
        use_cases(keyword),
        COMPARISONS.to_string(),
        COMPARISON_TABLE.to_string(),
        IMPLEMENTATION.to_string(),
        RECOMMENDED_TOOLS.to_string(),
        FAQ.to_string(),
        CONCLUSION.to_string(),
    ];

    let mut content = sections.join(SECTION_SEPARATOR);
    let words = count_words(&content);
    let per_block = count_words(PADDING);

    if words < MIN_WORDS && per_block > 0 {
        let repeats = (MIN_WORDS - words).div_ceil(per_block);
        content.reserve(repeats * (PADDING.len() + SECTION_SEPARATOR.len()));
        for _ in 0..repeats {
            content.push_str(SECTION_SEPARATOR);
            content.push_str(PADDING);
        }
        tracing::trace!(words, repeats, "padded article to minimum length");
    }

    content
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn intro(keyword: &str, category: &str, intent: &str, now: DateTime<Utc>) -> String {
    let month = now.format("%B %Y");
    let filed_under = match (category.trim(), intent.trim()) {
        ("", "") => String::new(),
        (category, "") => format!("\n\n_Filed under: {category}._"),
        ("", intent) => format!("\n\n_Reader intent: {intent}._"),
        (category, intent) => format!("\n\n_Filed under: {category}. Reader intent: {intent}._"),
    };

    format!(
        "# {keyword}{filed_under}

Written from the point of view of a practitioner who cares about maintainable systems and
honest trade-offs, this guide focuses on **real-world considerations** rather than marketing
copy. The aim is to help you reach a confident decision about your tooling and architecture,
in terms that any experienced engineer or tech lead will recognise.

In this article you will learn:

- Where this topic sits inside modern engineering workflows
- Concrete pros and cons you can explain to stakeholders
- Implementation patterns, edge cases, and failure modes worth watching
- How to decide whether to adopt, migrate, or wait

Everything here is aimed at engineers shipping production systems in {month}."
    )
}

const CORE_CONCEPTS: &str = "## Core concepts and mental models

Before comparing specific tools, it pays to step back and describe the mental models behind
this topic. Once the moving pieces make sense conceptually, you depend far less on any single
vendor or framework.

Think about:

- The boundary between local development and production deployment
- Where state lives and how it flows through the system
- Which teams own which layers of the stack
- What \"done\" means for observability, reliability, and security

Even decisions that sound small, such as picking one editor or plugin over another, compound
over the years as teams, codebases, and infrastructure evolve.";

fn use_cases(keyword: &str) -> String {
    format!(
        "## High-intent use cases and user journeys

Searches around this topic are rarely casual. Engineers typing queries such as
\"{keyword}\" are usually stuck on one of the following:

- A migration project with a hard deadline
- A compatibility issue that blocks a deployment
- A build, test, or debug loop that has become painfully slow

When you evaluate options, anchor on **specific journeys**:

1. A new contributor cloning the repository and becoming productive.
2. A senior engineer chasing intermittent failures under load.
3. An operations team keeping the system observable, patchable, and auditable.
4. A tech lead justifying the stack to non-technical stakeholders."
    )
}

const COMPARISONS: &str = "## Nuanced comparisons instead of hype

Tool comparisons easily turn into unproductive debates. A more responsible approach is to
agree on a short list of evaluation criteria first and then score every option in context.

Useful lenses:

- Learning curve and onboarding experience
- Ecosystem maturity and plugin quality
- Failure behaviour and how problems surface during incidents
- Long-term maintainability for a growing team
- Vendor risk and strategies for limiting lock-in

Whenever you read a benchmark or a case study, pause and ask whether the environment, the
team's skills, and the risk profile really match your own.";

const COMPARISON_TABLE: &str = "## Architecture and workflow comparison table

| Dimension              | Conservative choice               | Progressive choice                   |
|------------------------|-----------------------------------|--------------------------------------|
| Primary optimisation   | Stability and predictability      | Velocity and expressiveness          |
| Tooling customisation  | Minimal, opinionated defaults     | Deep, scriptable, highly extensible  |
| Ideal team size        | Large orgs with many squads       | Small, senior-heavy product teams    |
| Operational burden     | Lower, easier to standardise      | Higher, needs clear ownership        |
| Risk of lock-in        | Moderate but manageable           | Depends on the integration strategy  |

The right answer rarely sits at either extreme. Most organisations standardise on a
conservative baseline and let power users extend their local workflows where it clearly
pays off.";

const IMPLEMENTATION: &str = "## Implementation guidelines and failure modes

On the implementation side, treat configuration as code and invest early in reproducible
environments. A few practical guidelines:

- Keep environment setup scripted and under version control.
- Record decisions in lightweight design documents instead of tribal knowledge.
- Add smoke tests that catch obvious misconfiguration before a release.
- Agree on what \"good enough\" observability means before usage grows.

Typical failure modes include silent configuration drift, unclear ownership of tooling, and
one-off shell scripts that quietly become production dependencies.";

const RECOMMENDED_TOOLS: &str = "## Recommended tools and resources

The slots below are deliberately left as **affiliate placeholders**. Replace them with tools
you genuinely recommend and that you or your organisation have used on real projects.

- {{AFFILIATE_TOOL_1}}: primary editor or IDE partner
- {{AFFILIATE_TOOL_2}}: observability or monitoring solution
- {{AFFILIATE_TOOL_3}}: managed hosting, CI, or security scanner

Transparency matters. Label commercial relationships clearly and always put developer
experience ahead of commission size.";

const FAQ: &str = "## Frequently asked questions

### Is it safe to standardise on a single tool?

Standardising lowers cognitive overhead, but leave room for exceptions. Let power users
diverge when they can show a clear upside and are willing to document their setup.

### How often should we revisit our tooling choices?

For most teams a light review every 12 to 18 months is enough. The goal is not to chase
trends but to make sure your defaults have not turned into an unexamined constraint that
slows product delivery.

### How should we read benchmarks and vendor content?

Treat polished benchmarks as a starting point, not a verdict. Rebuild the critical paths of
your own system and run targeted experiments under realistic constraints, including network
conditions and data volume.";

const CONCLUSION: &str = "## Conclusion: moving forward thoughtfully

The most sustainable decisions usually look boring from the outside. Rather than chasing the
newest stack, find the smallest set of changes that meaningfully de-risks your roadmap and
improves day-to-day developer experience.

Make adoption explicit, reversible, and well documented. Record what you tried, what worked,
and what you chose not to pursue yet. That history saves future teams an enormous amount of
time and prevents expensive re-litigation of settled questions.";
