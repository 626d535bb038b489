use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Research ---

/// One planned web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchItem {
    /// The search term to use for the web search.
    pub query: String,
    /// Why this search is important to the article.
    pub reason: String,
}

/// Ordered research plan. Later phases address items by position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchPlan {
    /// The searches to perform, most important first.
    pub searches: Vec<SearchItem>,
}

impl SearchPlan {
    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}

// --- Drafts ---

/// Which draft shape producers emit and which downstream checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    /// Conventional blog post: title, summary, body.
    #[default]
    Standard,
    /// Long-form Medium-style article with hook/preview/sections/conclusion.
    Structured,
}

impl ContentMode {
    pub fn label(&self) -> &'static str {
        match self {
            ContentMode::Standard => "blog post",
            ContentMode::Structured => "Medium article",
        }
    }
}

impl std::fmt::Display for ContentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StandardDraft {
    /// Title of the blog post.
    pub title: String,
    /// Two or three sentence summary.
    pub summary: String,
    /// Full body in markdown.
    pub main_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructuredDraft {
    /// Clear, specific, benefit-driven title.
    pub title: String,
    /// Subtitle that adds context without giving everything away.
    pub subtitle: String,
    /// Opening 1-3 paragraphs: story, statistic, bold statement or relatable problem.
    pub hook: String,
    /// What the reader will learn or gain.
    pub preview: String,
    /// Main body using **H2:**, **PULL_QUOTE:** and **BOLD:** markers.
    pub sections_content: String,
    /// Key takeaways.
    pub conclusion: String,
    /// Closing call to action or question.
    pub call_to_action: String,
    /// Intended length in words.
    pub target_word_count: u32,
}

/// One producer's candidate. Batch index is producer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Draft {
    Standard(StandardDraft),
    Structured(StructuredDraft),
}

impl Draft {
    pub fn title(&self) -> &str {
        match self {
            Draft::Standard(d) => &d.title,
            Draft::Structured(d) => &d.title,
        }
    }

    /// Short descriptive text used when the formatter omits a meta description.
    pub fn blurb(&self) -> &str {
        match self {
            Draft::Standard(d) => &d.summary,
            Draft::Structured(d) => &d.subtitle,
        }
    }

    pub fn mode(&self) -> ContentMode {
        match self {
            Draft::Standard(_) => ContentMode::Standard,
            Draft::Structured(_) => ContentMode::Structured,
        }
    }

    /// All prose fields joined with spaces, as seen by the safety classifier.
    pub fn safety_text(&self) -> String {
        match self {
            Draft::Standard(d) => format!("{} {} {}", d.title, d.summary, d.main_content),
            Draft::Structured(d) => format!(
                "{} {} {} {} {} {} {}",
                d.title,
                d.subtitle,
                d.hook,
                d.preview,
                d.sections_content,
                d.conclusion,
                d.call_to_action
            ),
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredDraft> {
        match self {
            Draft::Structured(d) => Some(d),
            Draft::Standard(_) => None,
        }
    }
}

// --- Verdicts and scores ---

/// Safety classifier output. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub is_safe: bool,
    pub issues_found: Vec<String>,
    pub recommendations: Vec<String>,
}

impl SafetyVerdict {
    pub fn safe() -> Self {
        Self {
            is_safe: true,
            issues_found: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

impl std::fmt::Display for SafetyVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_safe {
            return write!(f, "safe");
        }
        writeln!(f, "unsafe:")?;
        for issue in &self.issues_found {
            writeln!(f, "  - {issue}")?;
        }
        writeln!(f, "recommendations:")?;
        for rec in &self.recommendations {
            writeln!(f, "  - {rec}")?;
        }
        Ok(())
    }
}

/// Advisory structural-compliance score for a structured draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureScore {
    pub is_optimized: bool,
    pub hook_score: u8,
    pub structure_score: u8,
    pub engagement_score: u8,
    pub length_score: u8,
    pub overall_score: u8,
    pub issues_found: Vec<String>,
    pub recommendations: Vec<String>,
}

// --- Output ---

/// The publishable artifact. One per pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PublishedDocument {
    /// SEO-friendly title.
    pub title: String,
    /// 150-160 character description for search results and sharing.
    pub meta_description: String,
    /// URL-friendly slug with hyphens.
    pub slug: String,
    /// Publication-ready body.
    pub content: String,
    /// Estimated reading time in minutes.
    pub reading_time: u32,
    /// 3-6 relevant tags.
    pub tags: Vec<String>,
    /// Alt text for the featured image.
    pub featured_image_alt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured() -> StructuredDraft {
        StructuredDraft {
            title: "T".into(),
            subtitle: "S".into(),
            hook: "H".into(),
            preview: "P".into(),
            sections_content: "B".into(),
            conclusion: "C".into(),
            call_to_action: "A".into(),
            target_word_count: 1500,
        }
    }

    #[test]
    fn standard_safety_text_joins_three_fields() {
        let draft = Draft::Standard(StandardDraft {
            title: "Title".into(),
            summary: "Summary".into(),
            main_content: "Body".into(),
        });
        assert_eq!(draft.safety_text(), "Title Summary Body");
        assert_eq!(draft.mode(), ContentMode::Standard);
    }

    #[test]
    fn structured_safety_text_skips_word_count() {
        let draft = Draft::Structured(structured());
        assert_eq!(draft.safety_text(), "T S H P B C A");
        assert!(draft.as_structured().is_some());
        assert_eq!(draft.blurb(), "S");
    }

    #[test]
    fn draft_serializes_with_shape_tag() {
        let json = serde_json::to_value(Draft::Structured(structured())).unwrap();
        assert_eq!(json["shape"], "structured");
        assert_eq!(json["target_word_count"], 1500);
    }
}
