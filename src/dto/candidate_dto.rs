use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::candidate::{Candidate, CandidateStatus, ReferralSource};
use crate::models::kit::DesiredKitItem;
use crate::services::lifecycle_service::StatusChange;

/// Intake form. Also the draft that CV parsing pre-fills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateCandidatePayload {
    #[validate(length(max = 200))]
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub license_points: u8,
    #[serde(default)]
    pub off_road_parking: bool,
    pub referral_source: Option<ReferralSource>,
    pub cv_filename: Option<String>,
    #[serde(default)]
    pub key_skills: Vec<String>,
    pub work_history_summary: Option<String>,
    /// TPJ only; defaults to the configured fee.
    pub induction_fee: Option<Decimal>,
    /// TPJ only; defaults to the configured fee.
    pub final_fee: Option<Decimal>,
    /// STPJ only.
    pub provider_fee: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateCandidatePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    pub license_points: Option<u8>,
    pub off_road_parking: Option<bool>,
    pub referral_source: Option<ReferralSource>,
    pub last_contact: Option<NaiveDate>,
    pub key_skills: Option<Vec<String>>,
    pub work_history_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AvatarPayload {
    #[validate(length(min = 1))]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NotePayload {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BulkNotePayload {
    #[validate(length(min = 1))]
    pub candidate_ids: Vec<Uuid>,
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BulkMessagePayload {
    #[validate(length(min = 1))]
    pub candidate_ids: Vec<Uuid>,
    #[validate(length(min = 1, max = 500))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkStatusPayload {
    pub candidate_ids: Vec<Uuid>,
    #[serde(flatten)]
    pub change: StatusChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitPayload {
    pub items: Vec<DesiredKitItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MergePayload {
    pub master_id: Uuid,
    #[validate(length(min = 1))]
    pub duplicate_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateListQuery {
    pub status: Option<CandidateStatus>,
    /// Matches name, email or postcode, case-insensitively.
    pub search: Option<String>,
}

impl CandidateListQuery {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(status) = self.status {
            if candidate.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                [&candidate.name, &candidate.email, &candidate.postcode]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}

/// Candidate profile together with the records hanging off it.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetailResponse {
    pub candidate: Candidate,
    pub tasks: Vec<crate::models::task::Task>,
    pub events: Vec<crate::models::event::ScheduledEvent>,
    pub pipeline_entry: Option<crate::models::pipeline::TalentPipelineEntry>,
}
