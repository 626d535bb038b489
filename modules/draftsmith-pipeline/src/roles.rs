//! Role catalogue: the personas each phase runs.
//!
//! Wording is free to change; names, ordering and the search flag are not.

use draftsmith_common::ContentMode;

use crate::traits::RoleConfig;

const AVOID_POLITICS: &str = "IMPORTANT: Avoid all political topics. Do not write about government, \
policy, regulation, politics, elections, political parties, politicians, laws, legislation, \
government programs, or political events. Focus only on technology, business, education, and \
industry topics.";

const STRUCTURED_FORMAT: &str = "Write a long-form article of 1400-2000 words. Open with a 50-150 \
word hook built on a story, statistic, or bold statement, then a short preview of what the reader \
will learn. Put 3-7 sections in sections_content, each starting on its own line with **H2:** and a \
descriptive header. Mark at least two key insights with **PULL_QUOTE:**, at least three key \
sentences with **BOLD:**, and key numbers with **STAT:**. Include real examples or case studies and \
supporting statistics. Finish with a conclusion and a call to action.";

/// Writer personas in producer order. `style_count` takes a prefix of this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Professional,
    Conversational,
    Analytical,
}

pub const PERSONAS: [Persona; 3] = [Persona::Professional, Persona::Conversational, Persona::Analytical];

impl Persona {
    pub fn role_name(&self, mode: ContentMode) -> &'static str {
        match (self, mode) {
            (Persona::Professional, ContentMode::Standard) => "ProfessionalWriter",
            (Persona::Conversational, ContentMode::Standard) => "ConversationalWriter",
            (Persona::Analytical, ContentMode::Standard) => "AnalyticalWriter",
            (Persona::Professional, ContentMode::Structured) => "MediumProfessionalWriter",
            (Persona::Conversational, ContentMode::Structured) => "MediumConversationalWriter",
            (Persona::Analytical, ContentMode::Structured) => "MediumAnalyticalWriter",
        }
    }

    fn voice(&self) -> &'static str {
        match self {
            Persona::Professional => {
                "You are a professional writer with an authoritative, polished voice. Favour clear \
                 structure, industry insight, and actionable recommendations for practitioners."
            }
            Persona::Conversational => {
                "You are a conversational writer with a warm, approachable voice. Use relatable \
                 examples, second-person address, and plain language that keeps readers engaged."
            }
            Persona::Analytical => {
                "You are an analytical writer with a data-driven voice. Lead with evidence, compare \
                 approaches, and explain trade-offs with figures and concrete findings."
            }
        }
    }
}

pub fn planner(search_count: usize, mode: ContentMode) -> RoleConfig {
    RoleConfig::new(
        "ResearchPlanner",
        format!(
            "You are a research strategist. Given a topic for a {label}, plan exactly {search_count} \
             web searches that together give diverse perspectives and comprehensive coverage. Give \
             each search a clear reason. {AVOID_POLITICS}",
            label = mode.label(),
        ),
    )
}

pub fn researcher(mode: ContentMode) -> RoleConfig {
    RoleConfig::new(
        "WebResearcher",
        format!(
            "You are a research assistant. Search the web for the given query and write a concise \
             summary of 2-3 paragraphs under 300 words capturing the facts, figures, and examples most \
             useful for a {label}. Skip fluff and commentary. {AVOID_POLITICS}",
            label = mode.label(),
        ),
    )
    .with_search()
}

pub fn writer(persona: Persona, mode: ContentMode) -> RoleConfig {
    let shape = match mode {
        ContentMode::Standard => {
            "Write a complete blog post of 800-1200 words with a title, a one-paragraph summary, and \
             markdown main content using headings and lists."
        }
        ContentMode::Structured => STRUCTURED_FORMAT,
    };
    RoleConfig::new(
        persona.role_name(mode),
        format!("{} Using the research provided, {shape} {AVOID_POLITICS}", persona.voice()),
    )
}

/// The first `style_count` writer roles, in producer order.
pub fn writers(style_count: usize, mode: ContentMode) -> Vec<RoleConfig> {
    PERSONAS
        .iter()
        .take(style_count)
        .map(|persona| writer(*persona, mode))
        .collect()
}

pub fn editor(mode: ContentMode) -> RoleConfig {
    let criteria = match mode {
        ContentMode::Standard => {
            "content quality and accuracy, engagement and readability, SEO potential and title \
             effectiveness, uniqueness, and overall professionalism"
        }
        ContentMode::Structured => {
            "hook effectiveness, structure compliance (title, subtitle, hook, preview, 3-7 sections, \
             conclusion with call to action), engagement elements (pull quotes, examples, statistics, \
             bold highlights), scannability, and length (1400-2000 words)"
        }
    };
    RoleConfig::new(
        "ContentEditor",
        format!(
            "You are a senior content editor reviewing several {label} drafts. Evaluate each on \
             {criteria}. Then state clearly which one should be selected, in the form \
             \"I recommend Draft N\". {AVOID_POLITICS}",
            label = mode.label(),
        ),
    )
}

pub fn formatter(mode: ContentMode) -> RoleConfig {
    let content = match mode {
        ContentMode::Standard => {
            "content: complete HTML using semantic tags (h1, h2, h3, p, ul, ol, li, strong, em)"
        }
        ContentMode::Structured => {
            "content: the article body in markdown, keeping every **H2:**, **PULL_QUOTE:**, **BOLD:** \
             and **STAT:** marker exactly as written, with the subtitle as a ### line after the title"
        }
    };
    RoleConfig::new(
        "BlogFormatter",
        format!(
            "You are a publication formatter and SEO specialist. Turn the {label} into a \
             publication-ready document: title (SEO-enhanced), meta_description (150-160 characters), \
             slug (lowercase, hyphens only), {content}, reading_time (minutes at ~200 words per \
             minute), tags (3-6 keywords), featured_image_alt (descriptive alt text). {AVOID_POLITICS}",
            label = mode.label(),
        ),
    )
}
