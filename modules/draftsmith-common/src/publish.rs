//! Publication metadata helpers applied to the formatter's output.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{Draft, PublishedDocument};

pub const META_DESCRIPTION_LIMIT: usize = 160;
pub const WORDS_PER_MINUTE: usize = 200;
pub const MAX_TAGS: usize = 6;
pub const FALLBACK_TAGS: [&str; 3] = ["blog", "content", "article"];

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SLUG_STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SLUG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());

const TAG_VOCABULARY: &[&str] = &[
    // technology
    "ai", "artificial intelligence", "machine learning", "deep learning", "neural network", "nlp",
    "computer vision", "robotics", "automation", "blockchain", "cryptocurrency", "web3", "metaverse",
    "vr", "ar", "iot", "cloud computing", "edge computing", "quantum computing", "cybersecurity",
    "data science", "big data", "analytics",
    // business
    "business", "startup", "entrepreneurship", "marketing", "sales", "strategy", "growth", "scaling",
    "product management", "leadership", "management", "consulting", "finance", "investment",
    "venture capital",
    // development
    "programming", "coding", "software development", "web development", "mobile development", "api",
    "microservices", "devops", "agile", "scrum", "testing", "debugging", "deployment", "ci/cd",
    // content
    "tutorial", "guide", "how-to", "tips", "best practices", "examples", "case study", "review",
    "comparison", "analysis", "trends", "future", "innovation", "breakthrough", "advancement", "research",
];

const HIGH_VALUE_ACRONYMS: &[&str] = &["ai", "ml", "api", "vr", "ar", "iot"];

fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// URL slug: lowercase, punctuation dropped, runs of separators collapsed to `-`.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&lowered, "");
    SLUG_SEPARATORS.replace_all(&stripped, "-").trim_matches('-').to_string()
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && generate_slug(slug) == slug
}

/// Collapse whitespace and cut to `max_chars`, backing off to a word boundary
/// when one exists in the last fifth of the limit.
pub fn generate_meta_description(summary: &str, max_chars: usize) -> String {
    let clean = WHITESPACE.replace_all(summary, " ");
    let clean = clean.trim();
    if clean.chars().count() <= max_chars {
        return clean.to_string();
    }

    let mut truncated: String = clean.chars().take(max_chars).collect();
    if let Some(last_space) = truncated.rfind(' ') {
        let space_at = truncated[..last_space].chars().count();
        if space_at * 5 > max_chars * 4 {
            truncated.truncate(last_space);
        }
    }
    truncated.push_str("...");
    truncated
}

/// Minutes to read `text` once markup tags are removed. Never less than one.
pub fn calculate_reading_time(text: &str) -> u32 {
    let words = strip_tags(text).split_whitespace().count();
    let minutes = (words as f64 / WORDS_PER_MINUTE as f64).round_ties_even() as u32;
    minutes.max(1)
}

/// Tags from the keyword vocabulary, most specific first.
pub fn extract_tags(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    let mut scored: Vec<(String, usize)> = Vec::new();

    for keyword in TAG_VOCABULARY.iter().filter(|k| lowered.contains(*k)) {
        let tag = keyword.replace([' ', '/'], "-");
        if scored.iter().any(|(t, _)| *t == tag) {
            continue;
        }
        let mut score = keyword.split_whitespace().count() * 2;
        if HIGH_VALUE_ACRONYMS.contains(keyword) {
            score += 3;
        }
        scored.push((tag, score));
    }

    if scored.is_empty() {
        return FALLBACK_TAGS.iter().map(|t| t.to_string()).collect();
    }

    scored.sort_by(|(a, sa), (b, sb)| sb.cmp(sa).then_with(|| a.cmp(b)));
    scored.into_iter().take(MAX_TAGS).map(|(t, _)| t).collect()
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

pub fn featured_image_alt(title: &str, tags: &[String]) -> String {
    let primary = tags.first().map(String::as_str).unwrap_or("content");
    format!(
        "Featured image for blog post: {title} - {}",
        title_case(&primary.replace('-', " "))
    )
}

/// Fill in or repair the metadata the formatter left empty or malformed.
///
/// `content` is taken as final; only the surrounding fields are derived.
pub fn normalize(mut doc: PublishedDocument, draft: &Draft) -> PublishedDocument {
    if doc.title.trim().is_empty() {
        doc.title = draft.title().to_string();
    }

    if !is_valid_slug(&doc.slug) {
        debug!(slug = %doc.slug, "Regenerating slug");
        doc.slug = generate_slug(&doc.title);
    }

    if doc.meta_description.trim().is_empty() {
        let source = if draft.blurb().trim().is_empty() {
            strip_tags(&doc.content)
        } else {
            draft.blurb().to_string()
        };
        doc.meta_description = generate_meta_description(&source, META_DESCRIPTION_LIMIT);
    } else if doc.meta_description.chars().count() > META_DESCRIPTION_LIMIT {
        doc.meta_description = generate_meta_description(&doc.meta_description, META_DESCRIPTION_LIMIT);
    }

    if doc.reading_time == 0 {
        doc.reading_time = calculate_reading_time(&doc.content);
    }

    if doc.tags.is_empty() {
        doc.tags = extract_tags(&doc.content);
    }

    if doc.featured_image_alt.trim().is_empty() {
        doc.featured_image_alt = featured_image_alt(&doc.title, &doc.tags);
    }

    doc
}
