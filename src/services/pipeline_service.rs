use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::candidate::{CandidateStatus, Note};
use crate::models::pipeline::{TalentPipelineEntry, TalentPipelineType};
use crate::models::snapshot::AppSnapshot;
use crate::services::lifecycle_service::{LifecycleService, StatusChange};
use crate::utils::time::{add_months, uk_date};

pub const RE_ENGAGED_NOTE: &str =
    "Candidate re-engaged from Talent Pipeline. Status changed to Screening.";
pub const REVIEWED_NOTE: &str = "Candidate reviewed from Talent Pipeline.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub candidate_id: Uuid,
    pub follow_up_on: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: TalentPipelineType,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Outcome of processing a pipeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Processed {
    NoEntry,
    ReEngaged,
    Reviewed,
}

pub struct PipelineService;

impl PipelineService {
    /// Inserts `entry`, replacing whatever entry the candidate already had.
    pub fn upsert_entry(snapshot: &mut AppSnapshot, entry: TalentPipelineEntry) {
        snapshot
            .talent_pipeline
            .retain(|existing| existing.candidate_id != entry.candidate_id);
        snapshot.talent_pipeline.insert(0, entry);
    }

    pub fn add_to_pipeline(
        snapshot: &mut AppSnapshot,
        request: PipelineRequest,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let reason = request.notes.clone().unwrap_or_default();
        let candidate = snapshot
            .candidate_mut(request.candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", request.candidate_id))?;
        candidate.push_note(Note::system(
            format!(
                "Added to Talent Pipeline for Reconsideration on {}. Reason: {}",
                uk_date(request.follow_up_on),
                reason
            ),
            now,
        ));

        Self::upsert_entry(
            snapshot,
            TalentPipelineEntry {
                candidate_id: request.candidate_id,
                added_at: now,
                follow_up_on: request.follow_up_on,
                entry_type: request.entry_type,
                notes: request.notes,
            },
        );
        Ok(())
    }

    /// Takes the candidate off the pipeline. Re-engagement moves the candidate
    /// to `Screening` through the normal transition, so the screening-call task
    /// and the "moved to" notification are raised as for any other move.
    pub fn process(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Processed> {
        let Some(entry) = snapshot.pipeline_entry(candidate_id).cloned() else {
            return Ok(Processed::NoEntry);
        };
        snapshot
            .talent_pipeline
            .retain(|e| e.candidate_id != candidate_id);

        if snapshot.candidate(candidate_id).is_none() {
            tracing::warn!(%candidate_id, "pipeline entry referenced a missing candidate");
            return Ok(Processed::NoEntry);
        }

        let (note, outcome) = match entry.entry_type {
            TalentPipelineType::ReEngage => {
                LifecycleService::transition(
                    snapshot,
                    candidate_id,
                    &StatusChange::to(CandidateStatus::Screening),
                    now,
                )?;
                (RE_ENGAGED_NOTE, Processed::ReEngaged)
            }
            TalentPipelineType::Reconsider => (REVIEWED_NOTE, Processed::Reviewed),
        };

        if let Some(candidate) = snapshot.candidate_mut(candidate_id) {
            candidate.push_note(Note::system(note, now));
        }
        Ok(outcome)
    }

    /// Pushes the follow-up date back one calendar month.
    pub fn snooze(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let entry = snapshot
            .pipeline_entry(candidate_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Pipeline entry for candidate", candidate_id))?;

        Self::add_to_pipeline(
            snapshot,
            PipelineRequest {
                candidate_id,
                follow_up_on: add_months(entry.follow_up_on, 1),
                entry_type: entry.entry_type,
                notes: entry.notes,
            },
            now,
        )
    }
}
