use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PhoneCall,
    VideoCall,
    OnsiteInterview,
    FollowUp,
    Induction,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventType::PhoneCall => "Phone Call",
            EventType::VideoCall => "Video Call",
            EventType::OnsiteInterview => "On-site Interview",
            EventType::FollowUp => "Follow-up",
            EventType::Induction => "Induction",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub candidate_id: Uuid,
    pub description: Option<String>,
}
