use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Screen a notification navigates to when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Dashboard,
    Tasks,
    Candidates,
    Diary,
    CandidateDetail,
    Maintenance,
    Email,
    Reporting,
    TalentPipeline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub candidate_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub action_link: Option<View>,
}

impl Notification {
    pub fn new(
        message: impl Into<String>,
        candidate_id: Option<Uuid>,
        action_link: View,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            candidate_id,
            created_at,
            read: false,
            action_link: Some(action_link),
        }
    }
}
