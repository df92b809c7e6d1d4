use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::notification::{Notification, View};
use crate::models::snapshot::AppSnapshot;
use crate::models::task::{Task, TaskHistoryEntry, TaskStatus};
use crate::utils::validation::non_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub candidate_id: Option<Uuid>,
}

pub struct TaskService;

impl TaskService {
    /// Manually created tasks open with a `None -> To Do` history entry.
    pub fn add(
        snapshot: &mut AppSnapshot,
        new_task: NewTask,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        let title = non_blank(&new_task.title)
            .ok_or_else(|| Error::BadRequest("Task title is required".to_string()))?
            .to_string();
        if let Some(candidate_id) = new_task.candidate_id {
            if snapshot.candidate(candidate_id).is_none() {
                return Err(Error::not_found("Candidate", candidate_id));
            }
        }

        let task = Task {
            id: Uuid::new_v4(),
            title: title.clone(),
            due_date: new_task.due_date,
            status: TaskStatus::ToDo,
            candidate_id: new_task.candidate_id,
            archived_at: None,
            archived_by: None,
            history: vec![TaskHistoryEntry {
                timestamp: now,
                user: actor.to_string(),
                from_status: None,
                to_status: TaskStatus::ToDo,
            }],
        };
        let id = task.id;
        snapshot.tasks.insert(0, task);
        snapshot.notify(Notification::new(
            format!("New Task Assigned: {}", title),
            new_task.candidate_id,
            View::Tasks,
            now,
        ));
        Ok(id)
    }

    /// Direct status change. Archiving goes through [`TaskService::archive_completed`]
    /// and un-archiving through [`TaskService::restore`]. Returns whether anything changed.
    pub fn set_status(
        snapshot: &mut AppSnapshot,
        task_id: Uuid,
        status: TaskStatus,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let task = snapshot
            .task_mut(task_id)
            .ok_or_else(|| Error::not_found("Task", task_id))?;

        if status == TaskStatus::Archived {
            return Err(Error::rejected(
                "Only completed tasks can be archived, and only in bulk",
            ));
        }
        if task.status == TaskStatus::Archived {
            return Err(Error::rejected("Archived tasks must be restored first"));
        }
        if task.status == status {
            return Ok(false);
        }

        task.record_transition(status, actor, now);
        let (title, candidate_id) = (task.title.clone(), task.candidate_id);

        if status == TaskStatus::Done {
            let name = snapshot.candidate_name(candidate_id);
            snapshot.notify(Notification::new(
                format!("Task Completed: {} for {}", title, name),
                candidate_id,
                View::Tasks,
                now,
            ));
        }
        Ok(true)
    }

    /// Archives every `Done` task. Returns how many were archived.
    pub fn archive_completed(snapshot: &mut AppSnapshot, actor: &str, now: DateTime<Utc>) -> usize {
        let mut archived = 0;
        for task in snapshot
            .tasks
            .iter_mut()
            .filter(|t| t.status == TaskStatus::Done)
        {
            task.record_transition(TaskStatus::Archived, actor, now);
            task.archived_at = Some(now);
            task.archived_by = Some(actor.to_string());
            archived += 1;
        }
        archived
    }

    pub fn restore(
        snapshot: &mut AppSnapshot,
        task_id: Uuid,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let task = snapshot
            .task_mut(task_id)
            .ok_or_else(|| Error::not_found("Task", task_id))?;
        if task.status != TaskStatus::Archived {
            return Err(Error::rejected("Only archived tasks can be restored"));
        }

        task.record_transition(TaskStatus::Done, actor, now);
        task.archived_at = None;
        task.archived_by = None;
        Ok(())
    }
}
