use crate::types::{StructureScore, StructuredDraft};

pub const SECTION_MARKER: &str = "**H2:**";
pub const PULL_QUOTE_MARKER: &str = "**PULL_QUOTE:**";
pub const BOLD_MARKER: &str = "**BOLD:**";

const ENGAGING_WORDS: &[&str] = &[
    "surprising",
    "shocking",
    "revealed",
    "discovered",
    "truth",
    "mistake",
    "secret",
    "never knew",
];
const EXAMPLE_KEYWORDS: &[&str] = &["example", "case study", "instance", "scenario", "situation"];
const STAT_KEYWORDS: &[&str] = &[
    "statistic", "data", "research", "study", "survey", "percent", "number",
];

const MAX_SUB_SCORE: u8 = 10;

#[derive(Default)]
struct Findings {
    issues: Vec<String>,
    recommendations: Vec<String>,
}

impl Findings {
    fn issue(&mut self, issue: impl Into<String>, recommendation: &str) {
        self.issues.push(issue.into());
        self.recommendations.push(recommendation.to_string());
    }

    fn advise(&mut self, recommendation: &str) {
        self.recommendations.push(recommendation.to_string());
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn present(text: &str) -> bool {
    !text.is_empty()
}

/// Score a structured draft against the long-form rubric.
///
/// Pure and advisory: the result is logged, never used to block the pipeline.
/// `overall_score` is the truncated mean of the four sub-scores.
pub fn score_structure(draft: &StructuredDraft) -> StructureScore {
    let mut findings = Findings::default();

    let hook_score = hook_score(&draft.hook, &mut findings).min(MAX_SUB_SCORE);
    let structure_score = structure_score(draft, &mut findings).min(MAX_SUB_SCORE);
    let engagement_score = engagement_score(&draft.sections_content, &mut findings).min(MAX_SUB_SCORE);

    let total_words = word_count(&draft.hook)
        + word_count(&draft.preview)
        + word_count(&draft.sections_content)
        + word_count(&draft.conclusion);
    let length_score = length_score(total_words, &mut findings);

    let sum = hook_score as u32 + structure_score as u32 + engagement_score as u32 + length_score as u32;
    let overall_score = (sum / 4) as u8;

    StructureScore {
        is_optimized: overall_score >= 7 && findings.issues.len() <= 2,
        hook_score,
        structure_score,
        engagement_score,
        length_score,
        overall_score,
        issues_found: findings.issues,
        recommendations: findings.recommendations,
    }
}

fn hook_score(hook: &str, findings: &mut Findings) -> u8 {
    if !present(hook) {
        findings.issue(
            "Missing hook - articles need strong opening",
            "Add compelling hook with story, statistic, or bold statement",
        );
        return 0;
    }

    let mut score = 0;
    let words = word_count(hook);
    if (50..=150).contains(&words) {
        score += 4;
    } else if words < 50 {
        score += 2;
        findings.issue(
            "Hook too short - expand to 50-150 words for better engagement",
            "Make hook more detailed with a story, statistic, or compelling statement",
        );
    }

    let lowered = hook.to_lowercase();
    if ENGAGING_WORDS.iter().any(|w| lowered.contains(w)) {
        score += 3;
    } else {
        score += 1;
        findings.advise("Add more engaging language to hook (surprising, shocking, revealed, etc.)");
    }
    score
}

fn structure_score(draft: &StructuredDraft, findings: &mut Findings) -> u8 {
    let mut score = 0;

    if word_count(&draft.title) >= 5 {
        score += 2;
    } else {
        findings.issue(
            "Title too short or missing",
            "Create compelling, benefit-driven title (5+ words)",
        );
    }

    if word_count(&draft.subtitle) >= 8 {
        score += 2;
    } else {
        findings.issue(
            "Subtitle too short or missing",
            "Add informative subtitle that intrigues without giving away too much",
        );
    }

    if present(&draft.preview) {
        score += 2;
    } else {
        findings.issue(
            "Missing preview/promise section",
            "Add clear preview of what readers will learn",
        );
    }

    let sections = draft.sections_content.matches(SECTION_MARKER).count();
    if (3..=7).contains(&sections) {
        score += 2;
    } else {
        findings.issue(
            format!("Wrong number of sections: {sections} (need 3-7)"),
            "Use **H2:** markers for 3-7 section headers",
        );
    }

    if present(&draft.conclusion) {
        score += 1;
    } else {
        findings.issue(
            "Missing conclusion",
            "Add strong conclusion with key takeaways and call-to-action",
        );
    }

    score
}

fn engagement_score(sections: &str, findings: &mut Findings) -> u8 {
    let mut score = 0;

    match sections.matches(PULL_QUOTE_MARKER).count() {
        n if n >= 2 => score += 3,
        1 => score += 2,
        _ => findings.issue(
            "Need more pull quotes (minimum 2)",
            "Add **PULL_QUOTE:** markers for key insights",
        ),
    }

    match sections.matches(BOLD_MARKER).count() {
        n if n >= 3 => score += 3,
        n if n >= 1 => score += 2,
        _ => findings.issue(
            "Need more bold highlights (minimum 3)",
            "Use **BOLD:** markers to emphasize key points",
        ),
    }

    let lowered = sections.to_lowercase();
    if EXAMPLE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        score += 2;
    } else {
        findings.issue(
            "Need real examples or case studies",
            "Include real examples and case studies for credibility",
        );
    }

    if STAT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        score += 2;
    } else {
        findings.issue(
            "Need statistics or data points",
            "Add relevant statistics to support claims",
        );
    }

    score
}

fn length_score(total_words: usize, findings: &mut Findings) -> u8 {
    match total_words {
        1400..=2000 => 10,
        1200..=1399 => {
            findings.advise("Consider expanding slightly for optimal 7-10 minute read");
            8
        }
        2001..=2500 => {
            findings.advise("Consider condensing slightly to maintain engagement");
            7
        }
        0..=999 => {
            findings.issue(
                "Article significantly too short",
                "Expand substantially for Medium's engagement sweet spot",
            );
            4
        }
        _ => {
            findings.issue(
                "Article length outside Medium's optimal range",
                "Aim for 1400-2000 words for best Medium performance",
            );
            5
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize, word: &str) -> String {
        vec![word; n].join(" ")
    }

    fn reference_draft() -> StructuredDraft {
        // 10-word hook, no engaging words.
        let hook = words(10, "plain");
        let preview = words(20, "preview");
        let conclusion = words(20, "closing");
        let mut sections = String::new();
        for i in 0..5 {
            sections.push_str(&format!("**H2:** Section {i}\n"));
        }
        sections.push_str("**PULL_QUOTE:** one\n**PULL_QUOTE:** two\n");
        sections.push_str("**BOLD:** a **BOLD:** b **BOLD:** c **BOLD:** d\n");
        sections.push_str("for example the survey shows\n");
        let used = word_count(&hook) + word_count(&preview) + word_count(&conclusion) + word_count(&sections);
        sections.push_str(&words(1800 - used, "filler"));

        StructuredDraft {
            title: "Five Words In This Title".into(),
            subtitle: "A subtitle that has at least eight words in it".into(),
            hook,
            preview,
            sections_content: sections,
            conclusion,
            call_to_action: "Follow for more".into(),
            target_word_count: 1800,
        }
    }

    #[test]
    fn reference_document_matches_hand_computed_score() {
        let score = score_structure(&reference_draft());

        // hook: <50 words (+2), no engaging words (+1)
        assert_eq!(score.hook_score, 3);
        // title, subtitle, preview, 5 sections (+2 each) + conclusion (+1)
        assert_eq!(score.structure_score, 9);
        // 2 pull quotes (+3), 4 bold (+3), example (+2), statistic (+2)
        assert_eq!(score.engagement_score, 10);
        assert_eq!(score.length_score, 10);
        // (3 + 9 + 10 + 10) / 4 = 8
        assert_eq!(score.overall_score, 8);
        assert_eq!(score.issues_found, vec!["Hook too short - expand to 50-150 words for better engagement"]);
        assert_eq!(score.recommendations.len(), 2);
        assert!(score.is_optimized);
    }

    #[test]
    fn missing_hook_scores_zero() {
        let mut draft = reference_draft();
        draft.hook = String::new();
        let score = score_structure(&draft);
        assert_eq!(score.hook_score, 0);
        assert!(score.issues_found.iter().any(|i| i.starts_with("Missing hook")));
    }

    #[test]
    fn whitespace_hook_counts_as_present() {
        let mut draft = reference_draft();
        draft.hook = "   ".into();
        let score = score_structure(&draft);
        // zero words (+2), no engaging words (+1)
        assert_eq!(score.hook_score, 3);
        assert!(!score.issues_found.iter().any(|i| i.starts_with("Missing hook")));
    }

    #[test]
    fn engaging_hook_in_band_scores_seven() {
        let mut draft = reference_draft();
        draft.hook = format!("A surprising {}", words(60, "word"));
        assert_eq!(score_structure(&draft).hook_score, 7);
    }

    #[test]
    fn long_hook_gets_no_length_bonus_and_no_issue() {
        let mut draft = reference_draft();
        draft.hook = words(200, "word");
        let score = score_structure(&draft);
        assert_eq!(score.hook_score, 1);
        assert!(!score.issues_found.iter().any(|i| i.starts_with("Hook")));
    }

    #[test]
    fn section_count_outside_range_is_an_issue() {
        let mut draft = reference_draft();
        draft.sections_content = "**H2:** only one".into();
        let score = score_structure(&draft);
        assert!(score.issues_found.contains(&"Wrong number of sections: 1 (need 3-7)".to_string()));
    }

    #[test]
    fn length_bands() {
        let mut f = Findings::default();
        assert_eq!(length_score(1400, &mut f), 10);
        assert_eq!(length_score(2000, &mut f), 10);
        assert_eq!(length_score(1200, &mut f), 8);
        assert_eq!(length_score(1399, &mut f), 8);
        assert_eq!(length_score(2001, &mut f), 7);
        assert_eq!(length_score(2500, &mut f), 7);
        assert_eq!(length_score(999, &mut f), 4);
        assert_eq!(length_score(1000, &mut f), 5);
        assert_eq!(length_score(1199, &mut f), 5);
        assert_eq!(length_score(2501, &mut f), 5);
    }

    #[test]
    fn near_optimal_length_only_recommends() {
        let mut f = Findings::default();
        length_score(1300, &mut f);
        assert!(f.issues.is_empty());
        assert_eq!(f.recommendations.len(), 1);
    }

    #[test]
    fn empty_draft_is_not_optimized() {
        let draft = StructuredDraft {
            title: String::new(),
            subtitle: String::new(),
            hook: String::new(),
            preview: String::new(),
            sections_content: String::new(),
            conclusion: String::new(),
            call_to_action: String::new(),
            target_word_count: 0,
        };
        let score = score_structure(&draft);
        assert_eq!(score.overall_score, 1);
        assert!(!score.is_optimized);
    }
}
