use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentPipelineType {
    ReEngage,
    Reconsider,
}

/// At most one entry exists per candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentPipelineEntry {
    pub candidate_id: Uuid,
    pub added_at: DateTime<Utc>,
    pub follow_up_on: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: TalentPipelineType,
    pub notes: Option<String>,
}
