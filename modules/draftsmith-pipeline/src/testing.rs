// Test doubles for the pipeline.
//
// MockBackend (ContentBackend): per-role scripted text or JSON responses,
// optional per-role latency, failure injection, and a call log for asserting
// phase order. Plus fixture builders for drafts and documents.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use draftsmith_common::{ContentMode, PublishedDocument, SearchItem, SearchPlan, StandardDraft, StructuredDraft};

use crate::traits::{ContentBackend, RoleConfig};

type TextFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub role: String,
    pub input: String,
    pub structured: bool,
}

/// Role-keyed scripted backend. Unscripted roles return `Err`.
/// Builder pattern: `.on_text()`, `.on_text_with()`, `.on_json()`, `.with_latency()`, `.failing()`.
#[derive(Default)]
pub struct MockBackend {
    text: HashMap<String, TextFn>,
    json: HashMap<String, Value>,
    latency: HashMap<String, Duration>,
    failures: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text(self, role: &str, response: &str) -> Self {
        let response = response.to_string();
        self.on_text_with(role, move |_| response.clone())
    }

    /// Text response computed from the call input.
    pub fn on_text_with(mut self, role: &str, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.text.insert(role.to_string(), Arc::new(f));
        self
    }

    pub fn on_json(mut self, role: &str, value: Value) -> Self {
        self.json.insert(role.to_string(), value);
        self
    }

    pub fn with_latency(mut self, role: &str, latency: Duration) -> Self {
        self.latency.insert(role.to_string(), latency);
        self
    }

    pub fn failing(mut self, role: &str) -> Self {
        self.failures.insert(role.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Role names in call order.
    pub fn roles_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.role).collect()
    }

    async fn enter(&self, role: &RoleConfig, input: &str, structured: bool) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call {
                role: role.name.clone(),
                input: input.to_string(),
                structured,
            });
        }
        if let Some(latency) = self.latency.get(&role.name) {
            tokio::time::sleep(*latency).await;
        }
        if self.failures.contains(&role.name) {
            bail!("MockBackend: injected failure for {}", role.name);
        }
        Ok(())
    }
}

#[async_trait]
impl ContentBackend for MockBackend {
    async fn complete(&self, role: &RoleConfig, input: &str) -> Result<String> {
        self.enter(role, input, false).await?;
        self.text
            .get(&role.name)
            .map(|f| f(input))
            .ok_or_else(|| anyhow!("MockBackend: no text registered for {}", role.name))
    }

    async fn complete_structured(&self, role: &RoleConfig, input: &str, _schema: Value) -> Result<Value> {
        self.enter(role, input, true).await?;
        self.json
            .get(&role.name)
            .cloned()
            .ok_or_else(|| anyhow!("MockBackend: no JSON registered for {}", role.name))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn search_plan(count: usize) -> SearchPlan {
    SearchPlan {
        searches: (1..=count)
            .map(|i| SearchItem {
                query: format!("query {i}"),
                reason: format!("reason {i}"),
            })
            .collect(),
    }
}

pub fn standard_draft(title: &str, body: &str) -> StandardDraft {
    StandardDraft {
        title: title.to_string(),
        summary: format!("Summary of {title}"),
        main_content: body.to_string(),
    }
}

/// A structured draft that uses every marker kind.
pub fn structured_draft(title: &str) -> StructuredDraft {
    StructuredDraft {
        title: title.to_string(),
        subtitle: "What every team learns after shipping its first service".to_string(),
        hook: "The surprising truth about small teams is that they ship faster.".to_string(),
        preview: "You will learn three habits that compound.".to_string(),
        sections_content: [
            "**H2:** Start small",
            "A case study from a five-person team. **STAT:** 40 percent fewer incidents.",
            "**H2:** Measure what matters",
            "**PULL_QUOTE:** Data beats opinions.",
            "**H2:** Keep it boring",
            "**BOLD:** Boring tools win.",
        ]
        .join("\n"),
        conclusion: "Small habits, big results.".to_string(),
        call_to_action: "Follow for more.".to_string(),
        target_word_count: 1500,
    }
}

pub fn document(title: &str, content: &str) -> PublishedDocument {
    PublishedDocument {
        title: title.to_string(),
        meta_description: format!("All about {title}."),
        slug: String::new(),
        content: content.to_string(),
        reading_time: 0,
        tags: Vec::new(),
        featured_image_alt: String::new(),
    }
}

/// Backend scripted for a clean run: one draft per writer role, the editor
/// recommending draft `pick`, and a formatter echoing `content`.
pub fn scripted_backend(mode: ContentMode, search_count: usize, pick: usize, content: &str) -> MockBackend {
    let writers = crate::roles::writers(crate::roles::PERSONAS.len(), mode);
    let mut backend = MockBackend::new()
        .on_json("ResearchPlanner", json!(search_plan(search_count)))
        .on_text_with("WebResearcher", |input| format!("Findings for [{input}]"))
        .on_text("ContentEditor", &format!("After review, I recommend Draft {pick}."))
        .on_json("BlogFormatter", json!(document("Formatted Title", content)));

    for (i, role) in writers.iter().enumerate() {
        let title = format!("Draft from writer {}", i + 1);
        let draft = match mode {
            ContentMode::Standard => json!(standard_draft(&title, "Body about software testing.")),
            ContentMode::Structured => json!(structured_draft(&title)),
        };
        backend = backend.on_json(&role.name, draft);
    }
    backend
}
