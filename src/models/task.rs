use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
    Archived,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
            TaskStatus::Archived => "Archived",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub from_status: Option<TaskStatus>,
    pub to_status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    /// `None` for general tasks.
    pub candidate_id: Option<Uuid>,
    pub archived_at: Option<DateTime<Utc>>,
    pub archived_by: Option<String>,
    /// Append-only.
    #[serde(default)]
    pub history: Vec<TaskHistoryEntry>,
}

impl Task {
    /// A task raised by the lifecycle engine; starts with an empty history.
    pub fn automated(candidate_id: Uuid, title: String, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            due_date,
            status: TaskStatus::ToDo,
            candidate_id: Some(candidate_id),
            archived_at: None,
            archived_by: None,
            history: Vec::new(),
        }
    }

    /// Moves the task and records the move. Callers decide whether the move is allowed.
    pub fn record_transition(&mut self, to: TaskStatus, user: &str, at: DateTime<Utc>) {
        self.history.push(TaskHistoryEntry {
            timestamp: at,
            user: user.to_string(),
            from_status: Some(self.status),
            to_status: to,
        });
        self.status = to;
    }
}
