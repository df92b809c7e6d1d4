use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::candidate::Candidate;
use crate::services::report_service::RangePreset;

/// The `new_candidates` half of a triage the recruiter chose to keep.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportCommitPayload {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub range: RangePreset,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateEmailPayload {
    #[validate(length(min = 1, max = 200))]
    pub candidate_name: String,
    pub job_title: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroupsResponse {
    pub groups: Vec<Vec<Candidate>>,
}
