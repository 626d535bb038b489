// Five-phase content pipeline: Plan → Research → Draft → Select → Format.
//
// Phases run strictly in order; each consumes only the previous phase's
// output. Research and Draft fan out one backend call per item and gather
// results in request order. Any backend failure aborts the run. Unsafe
// drafts are filtered before selection, and an unsafe topic is rejected
// before any backend call is made.

pub mod stats;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{info, info_span, warn, Instrument};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use draftsmith_common::publish::normalize;
use draftsmith_common::{
    classify, expand_markers, render, safe_pool, score_structure, ContentMode, Draft, DraftsmithError,
    PublishedDocument, SearchPlan, StandardDraft, StructuredDraft,
};

use crate::fanout::fan_out;
use crate::prompts;
use crate::roles;
use crate::selection::select_draft;
use crate::traits::{invoke_structured, ContentBackend, RoleConfig};

pub use stats::PipelineStats;

pub const MAX_SEARCHES: usize = 7;
pub const MAX_STYLES: usize = roles::PERSONAS.len();

const EVALUATION_LOG_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Plan,
    Research,
    Draft,
    Select,
    Format,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Plan => "plan",
            Phase::Research => "research",
            Phase::Draft => "draft",
            Phase::Select => "select",
            Phase::Format => "format",
        };
        f.write_str(name)
    }
}

/// What to generate. Counts are validated before any backend call.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PipelineRequest {
    #[builder(setter(into))]
    pub topic: String,
    #[builder(default = 3)]
    pub search_count: usize,
    #[builder(default = 3)]
    pub style_count: usize,
    #[builder(default)]
    pub mode: ContentMode,
}

impl PipelineRequest {
    pub fn validate(&self) -> Result<(), DraftsmithError> {
        if self.topic.trim().is_empty() {
            return Err(DraftsmithError::InvalidRequest("topic must not be empty".into()));
        }
        if !(1..=MAX_SEARCHES).contains(&self.search_count) {
            return Err(DraftsmithError::InvalidRequest(format!(
                "search count must be between 1 and {MAX_SEARCHES}, got {}",
                self.search_count
            )));
        }
        if !(1..=MAX_STYLES).contains(&self.style_count) {
            return Err(DraftsmithError::InvalidRequest(format!(
                "style count must be between 1 and {MAX_STYLES}, got {}",
                self.style_count
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub document: PublishedDocument,
    pub stats: PipelineStats,
}

pub struct Pipeline {
    backend: Arc<dyn ContentBackend>,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn ContentBackend>) -> Self {
        Self { backend }
    }

    /// Run all five phases for `request`.
    ///
    /// An unsafe topic fails with [`DraftsmithError::UnsafeTopic`] before any
    /// backend call; recover it with `downcast_ref`.
    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineOutput> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", %run_id, mode = %request.mode);
        self.run_inner(request).instrument(span).await
    }

    async fn run_inner(&self, request: &PipelineRequest) -> Result<PipelineOutput> {
        request.validate()?;
        check_topic(&request.topic)?;

        let mut stats = PipelineStats::new(request.mode);
        info!(
            topic = request.topic.as_str(),
            searches = request.search_count,
            styles = request.style_count,
            "Starting pipeline"
        );

        let plan = self.plan(request).await.context("plan phase failed")?;
        stats.searches_planned = plan.len();

        let findings = self.research(&plan, request.mode).await.context("research phase failed")?;
        stats.research_completed = findings.len();

        let drafts = self.draft(request, &findings).await.context("draft phase failed")?;
        stats.drafts_generated = drafts.len();

        let selected = self.select(drafts, request.mode, &mut stats).await.context("select phase failed")?;

        if let Some(structured) = selected.as_structured() {
            let score = score_structure(structured);
            info!(
                overall = score.overall_score,
                optimized = score.is_optimized,
                issues = score.issues_found.len(),
                "Structure score"
            );
            for issue in score.issues_found.iter().take(3) {
                info!(issue = issue.as_str(), "Structure issue");
            }
            stats.structure_score = Some(score);
        }

        let document = self.format(&selected).await.context("format phase failed")?;

        stats.finish();
        info!("{stats}");
        Ok(PipelineOutput { document, stats })
    }

    async fn plan(&self, request: &PipelineRequest) -> Result<SearchPlan> {
        enter(Phase::Plan);
        let role = roles::planner(request.search_count, request.mode);
        let mut plan: SearchPlan =
            invoke_structured(self.backend.as_ref(), &role, &prompts::plan_input(&request.topic)).await?;

        if plan.len() < request.search_count {
            return Err(DraftsmithError::Plan(format!(
                "planner returned {} searches, {} requested",
                plan.len(),
                request.search_count
            ))
            .into());
        }
        if plan.len() > request.search_count {
            warn!(
                returned = plan.len(),
                requested = request.search_count,
                "Planner over-delivered, truncating plan"
            );
            plan.searches.truncate(request.search_count);
        }

        info!(searches = plan.len(), "Research plan ready");
        Ok(plan)
    }

    async fn research(&self, plan: &SearchPlan, mode: ContentMode) -> Result<Vec<String>> {
        enter(Phase::Research);
        let role = roles::researcher(mode);
        let role = &role;
        let findings = fan_out(&plan.searches, |item| {
            let input = prompts::research_input(item);
            async move {
                self.backend
                    .complete(role, &input)
                    .await
                    .with_context(|| format!("search failed: {}", item.query))
            }
        })
        .await?;

        info!(completed = findings.len(), "Research complete");
        Ok(findings)
    }

    async fn draft(&self, request: &PipelineRequest, findings: &[String]) -> Result<Vec<Draft>> {
        enter(Phase::Draft);
        let writers = roles::writers(request.style_count, request.mode);
        let input = prompts::draft_input(&request.topic, findings);
        let drafts = fan_out(&writers, |role| self.write_draft(role, &input, request.mode)).await?;

        info!(drafts = drafts.len(), "Drafts generated");
        Ok(drafts)
    }

    async fn write_draft(&self, role: &RoleConfig, input: &str, mode: ContentMode) -> Result<Draft> {
        let backend = self.backend.as_ref();
        let draft = match mode {
            ContentMode::Standard => Draft::Standard(invoke_structured::<StandardDraft>(backend, role, input).await?),
            ContentMode::Structured => {
                Draft::Structured(invoke_structured::<StructuredDraft>(backend, role, input).await?)
            }
        };
        Ok(draft)
    }

    async fn select(&self, drafts: Vec<Draft>, mode: ContentMode, stats: &mut PipelineStats) -> Result<Draft> {
        enter(Phase::Select);
        let pool = safe_pool(drafts, Draft::safety_text);
        stats.drafts_filtered = pool.rejected.len();
        stats.fallback_to_unfiltered = pool.fell_back;

        let candidates = pool.pool;
        let response = self
            .backend
            .complete(&roles::editor(mode), &prompts::evaluation_input(&candidates, mode))
            .await?;
        info!(
            excerpt = %prompts::log_excerpt(&response, EVALUATION_LOG_CHARS),
            "Editor evaluation"
        );

        let selection = select_draft(&response, candidates.len());
        stats.selected_draft = selection.index + 1;
        stats.selection_rule = Some(selection.rule);

        let draft = candidates
            .into_iter()
            .nth(selection.index)
            .ok_or_else(|| anyhow!("no drafts to select from"))?;
        info!(
            draft = selection.index + 1,
            rule = %selection.rule,
            title = draft.title(),
            "Draft selected"
        );
        Ok(draft)
    }

    async fn format(&self, draft: &Draft) -> Result<PublishedDocument> {
        enter(Phase::Format);
        let mode = draft.mode();
        let mut document: PublishedDocument =
            invoke_structured(self.backend.as_ref(), &roles::formatter(mode), &prompts::format_input(draft)).await?;

        if mode == ContentMode::Structured {
            document.content = render(&expand_markers(&document.content));
        }

        let document = normalize(document, draft);
        info!(title = document.title.as_str(), slug = document.slug.as_str(), "Document formatted");
        Ok(document)
    }
}

fn enter(phase: Phase) {
    info!(%phase, "Entering phase");
}

/// Reject an unsafe topic before generation starts.
fn check_topic(topic: &str) -> Result<(), DraftsmithError> {
    let verdict = classify(topic);
    if verdict.is_safe {
        info!("Topic passed safety check");
        return Ok(());
    }
    warn!(issues = ?verdict.issues_found, "Topic rejected by safety check");
    Err(DraftsmithError::UnsafeTopic(verdict))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let request = PipelineRequest::builder().topic("Rust").build();
        assert_eq!(request.search_count, 3);
        assert_eq!(request.style_count, 3);
        assert_eq!(request.mode, ContentMode::Standard);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn request_bounds() {
        let bad = [
            PipelineRequest::builder().topic("  ").build(),
            PipelineRequest::builder().topic("t").search_count(0).build(),
            PipelineRequest::builder().topic("t").search_count(8).build(),
            PipelineRequest::builder().topic("t").style_count(0).build(),
            PipelineRequest::builder().topic("t").style_count(4).build(),
        ];
        for request in bad {
            assert!(matches!(request.validate(), Err(DraftsmithError::InvalidRequest(_))));
        }
        let edge = PipelineRequest::builder().topic("t").search_count(7).style_count(1).build();
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn topic_gate() {
        assert!(check_topic("Rust for embedded systems").is_ok());
        match check_topic("Election forecasting") {
            Err(DraftsmithError::UnsafeTopic(verdict)) => {
                assert_eq!(verdict.issues_found, vec!["Contains sensitive topic: election"]);
            }
            other => panic!("expected unsafe topic, got {other:?}"),
        }
    }
}
