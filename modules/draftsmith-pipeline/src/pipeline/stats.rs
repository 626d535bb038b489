use chrono::{DateTime, Utc};

use draftsmith_common::{ContentMode, StructureScore};

use crate::selection::SelectionRule;

/// Counters for one pipeline run, logged when the run completes.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub mode: ContentMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub searches_planned: usize,
    pub research_completed: usize,
    pub drafts_generated: usize,
    /// Drafts the safety classifier flagged, whether or not they were dropped.
    pub drafts_filtered: usize,
    pub fallback_to_unfiltered: bool,
    /// 1-based position in the evaluated pool.
    pub selected_draft: usize,
    pub selection_rule: Option<SelectionRule>,
    pub structure_score: Option<StructureScore>,
}

impl PipelineStats {
    pub fn new(mode: ContentMode) -> Self {
        Self {
            mode,
            started_at: Utc::now(),
            finished_at: None,
            searches_planned: 0,
            research_completed: 0,
            drafts_generated: 0,
            drafts_filtered: 0,
            fallback_to_unfiltered: false,
            selected_draft: 0,
            selection_rule: None,
            structure_score: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn elapsed_secs(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

impl std::fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Pipeline Run Complete ({}) ===", self.mode)?;
        writeln!(f, "Searches planned:   {}", self.searches_planned)?;
        writeln!(f, "Research results:   {}", self.research_completed)?;
        writeln!(f, "Drafts generated:   {}", self.drafts_generated)?;
        write!(f, "Drafts flagged:     {}", self.drafts_filtered)?;
        if self.fallback_to_unfiltered {
            write!(f, " (all flagged, kept unfiltered)")?;
        }
        writeln!(f)?;
        match self.selection_rule {
            Some(rule) => writeln!(f, "Selected draft:     {} (by {rule})", self.selected_draft)?,
            None => writeln!(f, "Selected draft:     -")?,
        }
        if let Some(score) = &self.structure_score {
            writeln!(
                f,
                "Structure score:    {}/10 (hook {}, structure {}, engagement {}, length {})",
                score.overall_score,
                score.hook_score,
                score.structure_score,
                score.engagement_score,
                score.length_score
            )?;
        }
        if let Some(secs) = self.elapsed_secs() {
            writeln!(f, "Elapsed:            {secs:.1}s")?;
        }
        Ok(())
    }
}
