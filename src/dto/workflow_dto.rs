use serde::{Deserialize, Serialize};

use crate::models::candidate::TerminationReason;
use crate::models::task::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusPayload {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListQuery {
    /// Archived tasks are hidden unless asked for.
    #[serde(default)]
    pub include_archived: bool,
    pub candidate_id: Option<uuid::Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationEmailPayload {
    pub reason: TerminationReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub unread: usize,
}
