use tracing::warn;

use crate::types::SafetyVerdict;

/// Political and governmental phrases that block a topic or draft.
const SENSITIVE_PHRASES: &[&str] = &[
    "political party",
    "political leader",
    "political campaign",
    "government policy",
    "government regulation",
    "government law",
    "election results",
    "election fraud",
    "voting rights",
    "political scandal",
    "political corruption",
    "political controversy",
    "political protest",
    "political revolution",
    "political uprising",
    "parliament debate",
    "congress vote",
    "presidential election",
    "political candidate",
    "political ideology",
    "political system",
    "politics",
    "election",
    "government",
    "policy",
    "regulation",
    "legislation",
    "candidate",
    "voting",
    "democracy",
];

/// The one phrase with a context exemption.
const EXEMPT_PHRASE: &str = "regulation";

/// Presence of any of these makes "regulation" acceptable.
const TECH_CONTEXT: &[&str] = &[
    "ai",
    "data",
    "privacy",
    "gdpr",
    "machine learning",
    "algorithm",
    "tech",
    "digital",
    "software",
    "cybersecurity",
    "artificial intelligence",
    "ml",
    "deep learning",
    "neural network",
    "computer vision",
    "nlp",
    "natural language processing",
    "machine unlearning",
    "unlearning",
    "federated learning",
];

const RECOMMENDATIONS: [&str; 3] = [
    "Avoid political topics to prevent legal issues",
    "Focus on technology, business, or educational content",
    "Consider neutral, informative topics instead",
];

/// Classify text against the sensitive-phrase list.
///
/// Matching is case-insensitive substring containment. A phrase is reported
/// once, and only if at least one of its occurrences is not already covered
/// by a longer reported phrase ("government policy" does not also report
/// "government" and "policy"). Issues keep the phrase-list order.
pub fn classify(text: &str) -> SafetyVerdict {
    let lowered = text.to_lowercase();
    let tech_context = TECH_CONTEXT.iter().any(|kw| lowered.contains(kw));

    let mut by_length: Vec<(usize, &str)> = SENSITIVE_PHRASES.iter().copied().enumerate().collect();
    by_length.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut found: Vec<(usize, &str)> = Vec::new();

    for (order, phrase) in by_length {
        let spans: Vec<(usize, usize)> = lowered
            .match_indices(phrase)
            .map(|(start, m)| (start, start + m.len()))
            .collect();
        if spans.is_empty() {
            continue;
        }
        let uncovered = spans
            .iter()
            .any(|&(s, e)| !claimed.iter().any(|&(cs, ce)| cs <= s && e <= ce));
        if !uncovered {
            continue;
        }
        if phrase == EXEMPT_PHRASE && tech_context {
            continue;
        }
        claimed.extend(spans);
        found.push((order, phrase));
    }

    if found.is_empty() {
        return SafetyVerdict::safe();
    }

    found.sort_by_key(|&(order, _)| order);
    SafetyVerdict {
        is_safe: false,
        issues_found: found
            .into_iter()
            .map(|(_, phrase)| format!("Contains sensitive topic: {phrase}"))
            .collect(),
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
    }
}

/// Result of filtering a candidate batch through the classifier.
#[derive(Debug)]
pub struct SafePool<T> {
    /// Candidates to evaluate, in original relative order. Never empty for a non-empty batch.
    pub pool: Vec<T>,
    /// Original batch index and verdict of every candidate that failed.
    pub rejected: Vec<(usize, SafetyVerdict)>,
    /// Every candidate failed and the full batch was kept.
    pub fell_back: bool,
}

/// Drop unsafe candidates, unless that would drop all of them.
pub fn safe_pool<T>(batch: Vec<T>, text_of: impl Fn(&T) -> String) -> SafePool<T> {
    let verdicts: Vec<SafetyVerdict> = batch.iter().map(|item| classify(&text_of(item))).collect();

    if !batch.is_empty() && verdicts.iter().all(|v| !v.is_safe) {
        warn!(count = batch.len(), "All candidates flagged unsafe, keeping the full batch");
        let rejected = verdicts.into_iter().enumerate().collect();
        return SafePool {
            pool: batch,
            rejected,
            fell_back: true,
        };
    }

    let mut pool = Vec::with_capacity(batch.len());
    let mut rejected = Vec::new();
    for (index, (item, verdict)) in batch.into_iter().zip(verdicts).enumerate() {
        if verdict.is_safe {
            pool.push(item);
        } else {
            warn!(
                candidate = index + 1,
                issues = ?verdict.issues_found,
                "Filtered candidate with sensitive content"
            );
            rejected.push((index, verdict));
        }
    }

    SafePool {
        pool,
        rejected,
        fell_back: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_phrase_reports_one_issue() {
        let verdict = classify("government policy");
        assert!(!verdict.is_safe);
        assert_eq!(verdict.issues_found, vec!["Contains sensitive topic: government policy"]);
        assert_eq!(verdict.recommendations.len(), 3);
    }

    #[test]
    fn regulation_allowed_in_tech_context() {
        assert!(classify("GDPR regulation in AI").is_safe);
    }

    #[test]
    fn regulation_flagged_outside_tech_context() {
        let verdict = classify("New regulation for farmers");
        assert_eq!(verdict.issues_found, vec!["Contains sensitive topic: regulation"]);
    }

    #[test]
    fn government_regulation_is_never_exempt() {
        let verdict = classify("Government regulation of AI models");
        assert!(!verdict.is_safe);
        assert_eq!(
            verdict.issues_found,
            vec!["Contains sensitive topic: government regulation"]
        );
    }

    #[test]
    fn neutral_text_is_safe() {
        let verdict = classify("neutral tech article");
        assert!(verdict.is_safe);
        assert!(verdict.issues_found.is_empty());
        assert!(verdict.recommendations.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(!classify("The ELECTION is near").is_safe);
    }

    #[test]
    fn standalone_occurrence_of_shorter_phrase_is_reported() {
        let verdict = classify("Government policy changed, and the government moved on");
        assert_eq!(
            verdict.issues_found,
            vec![
                "Contains sensitive topic: government policy",
                "Contains sensitive topic: government",
            ]
        );
    }

    #[test]
    fn issues_follow_phrase_list_order() {
        let verdict = classify("democracy and politics");
        assert_eq!(
            verdict.issues_found,
            vec![
                "Contains sensitive topic: politics",
                "Contains sensitive topic: democracy",
            ]
        );
    }

    #[test]
    fn pool_drops_only_unsafe() {
        let batch = vec!["rust tips", "election fraud", "cloud costs"];
        let result = safe_pool(batch, |s| s.to_string());
        assert_eq!(result.pool, vec!["rust tips", "cloud costs"]);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].0, 1);
        assert!(!result.fell_back);
    }

    #[test]
    fn pool_never_empty_when_all_unsafe() {
        for batch in [
            vec!["politics"],
            vec!["voting", "election"],
            vec!["policy", "candidate", "democracy"],
        ] {
            let original = batch.clone();
            let result = safe_pool(batch, |s| s.to_string());
            assert_eq!(result.pool, original);
            assert!(result.fell_back);
            assert_eq!(result.rejected.len(), original.len());
        }
    }

    #[test]
    fn empty_batch_stays_empty() {
        let result = safe_pool(Vec::<String>::new(), |s| s.clone());
        assert!(result.pool.is_empty());
        assert!(!result.fell_back);
    }
}
