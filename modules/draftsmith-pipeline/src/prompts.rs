//! Deterministic phase inputs.

use draftsmith_common::{ContentMode, Draft, SearchItem};

const HOOK_EXCERPT: usize = 200;
const SECTIONS_EXCERPT: usize = 500;
const CONCLUSION_EXCERPT: usize = 200;

pub fn plan_input(topic: &str) -> String {
    format!("Blog topic: {topic}")
}

pub fn research_input(item: &SearchItem) -> String {
    format!("Search query: {}\nReason: {}", item.query, item.reason)
}

pub fn draft_input(topic: &str, findings: &[String]) -> String {
    format!("Topic: {topic}\n\nResearch findings:\n{}", findings.join("\n\n"))
}

/// First `max_chars` characters of `text`, for log lines.
pub fn log_excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Candidate listing for the editor, one `--- DRAFT i ---` block per draft.
pub fn evaluation_input(drafts: &[Draft], mode: ContentMode) -> String {
    let mut listing = String::new();
    for (i, draft) in drafts.iter().enumerate() {
        listing.push_str(&format!("\n\n--- DRAFT {} ---\n", i + 1));
        match draft {
            Draft::Standard(d) => {
                listing.push_str(&format!("Title: {}\n", d.title));
                listing.push_str(&format!("Summary: {}\n", d.summary));
                listing.push_str(&format!("Content:\n{}\n", d.main_content));
            }
            Draft::Structured(d) => {
                listing.push_str(&format!("Title: {}\n", d.title));
                listing.push_str(&format!("Subtitle: {}\n", d.subtitle));
                listing.push_str(&format!("Hook: {}\n", excerpt(&d.hook, HOOK_EXCERPT)));
                listing.push_str(&format!("Preview: {}\n", d.preview));
                listing.push_str(&format!(
                    "Sections Content: {}\n",
                    excerpt(&d.sections_content, SECTIONS_EXCERPT)
                ));
                listing.push_str(&format!("Conclusion: {}\n", excerpt(&d.conclusion, CONCLUSION_EXCERPT)));
                listing.push_str(&format!("Call to Action: {}\n", d.call_to_action));
            }
        }
    }

    let label = mode.label();
    format!(
        "Please evaluate these {count} {label} drafts and select the best one.\n{listing}\n\n\
         Provide your evaluation and clearly indicate which draft (1-{count}) should be selected \
         as the final {label}.",
        count = drafts.len(),
    )
}

/// Selected draft laid out for the formatter.
pub fn format_input(draft: &Draft) -> String {
    match draft {
        Draft::Standard(d) => format!(
            "Transform this blog content into a complete, publication-ready blog post.\n\n\
             Blog Title: {}\nBlog Summary: {}\nBlog Content:\n{}",
            d.title, d.summary, d.main_content
        ),
        Draft::Structured(d) => format!(
            "Transform this Medium article content into a complete, publication-ready article.\n\n\
             Title: {}\nSubtitle: {}\nHook: {}\nPreview: {}\n\nSections Content:\n{}\n\n\
             Conclusion: {}\nCall to Action: {}\nTarget Word Count: {}",
            d.title,
            d.subtitle,
            d.hook,
            d.preview,
            d.sections_content,
            d.conclusion,
            d.call_to_action,
            d.target_word_count
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsmith_common::{StandardDraft, StructuredDraft};

    #[test]
    fn log_excerpt_counts_characters() {
        let text = "é".repeat(300);
        assert_eq!(log_excerpt(&text, 200).chars().count(), 200);
        assert_eq!(log_excerpt("short", 200), "short");
    }

    #[test]
    fn research_and_draft_inputs() {
        let item = SearchItem { query: "rust async".into(), reason: "core topic".into() };
        assert_eq!(research_input(&item), "Search query: rust async\nReason: core topic");
        assert_eq!(
            draft_input("Rust", &["one".into(), "two".into()]),
            "Topic: Rust\n\nResearch findings:\none\n\ntwo"
        );
        assert_eq!(plan_input("Rust"), "Blog topic: Rust");
    }

    #[test]
    fn evaluation_numbers_drafts_from_one() {
        let draft = |t: &str| {
            Draft::Standard(StandardDraft { title: t.into(), summary: "s".into(), main_content: "c".into() })
        };
        let input = evaluation_input(&[draft("A"), draft("B")], ContentMode::Standard);
        assert!(input.starts_with("Please evaluate these 2 blog post drafts"));
        let a = input.find("--- DRAFT 1 ---\nTitle: A").unwrap();
        let b = input.find("--- DRAFT 2 ---\nTitle: B").unwrap();
        assert!(a < b);
    }

    #[test]
    fn structured_drafts_are_excerpted() {
        let draft = Draft::Structured(StructuredDraft {
            title: "T".into(),
            subtitle: "S".into(),
            hook: "h".repeat(300),
            preview: "p".into(),
            sections_content: "é".repeat(600),
            conclusion: "c".repeat(50),
            call_to_action: "follow".into(),
            target_word_count: 1500,
        });
        let input = evaluation_input(&[draft], ContentMode::Structured);
        assert!(input.contains(&format!("Hook: {}...\n", "h".repeat(200))));
        // Cut by characters, not bytes.
        assert!(input.contains(&format!("Sections Content: {}...\n", "é".repeat(500))));
        assert!(input.contains(&format!("Conclusion: {}...\n", "c".repeat(50))));
        assert!(input.contains("Medium article drafts"));
    }
}
