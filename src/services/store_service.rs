//! The single mutable home of the hub's state.
//!
//! Each `Action` is applied to a clone of the current snapshot. Only a
//! successful application replaces the live snapshot, so a rejected action
//! never leaves partial state behind. The new snapshot is then written through
//! the repository; a failed write is logged and otherwise ignored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::repository::SnapshotRepository;
use crate::dto::candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload};
use crate::error::Result;
use crate::models::candidate::{Candidate, ScreeningRatings};
use crate::models::cost::CostSettings;
use crate::models::kit::DesiredKitItem;
use crate::models::snapshot::{AppSnapshot, BackupDocument};
use crate::models::task::TaskStatus;
use crate::services::candidate_service::CandidateService;
use crate::services::event_service::{EventPayload, EventService};
use crate::services::kit_service::KitService;
use crate::services::lifecycle_service::{LifecycleService, StatusChange};
use crate::services::notification_service::NotificationService;
use crate::services::pipeline_service::{PipelineRequest, PipelineService, Processed};
use crate::services::task_service::{NewTask, TaskService};
use crate::services::template_service::{TemplatePayload, TemplateService};

#[derive(Debug, Clone)]
pub enum Action {
    ChangeStatus { candidate_id: Uuid, change: StatusChange },
    BulkChangeStatus { candidate_ids: Vec<Uuid>, change: StatusChange },
    AddCandidate(CreateCandidatePayload),
    AddCandidates(Vec<Candidate>),
    UpdateCandidate { candidate_id: Uuid, details: UpdateCandidatePayload },
    UpdateAvatar { candidate_id: Uuid, avatar_url: String },
    AddNote { candidate_id: Uuid, content: String },
    BulkAddNote { candidate_ids: Vec<Uuid>, content: String },
    BulkMessage { candidate_ids: Vec<Uuid>, subject: String, body: String },
    RateCandidate { candidate_id: Uuid, ratings: ScreeningRatings },
    MarkCostPaid { candidate_id: Uuid, cost_id: Uuid },
    UpdateKit { candidate_id: Uuid, items: Vec<DesiredKitItem> },
    MarkKitReturned { candidate_id: Uuid, item_id: Uuid },
    MergeCandidates { master_id: Uuid, duplicate_ids: Vec<Uuid> },
    AddTask(NewTask),
    UpdateTaskStatus { task_id: Uuid, status: TaskStatus },
    ArchiveCompletedTasks,
    RestoreTask(Uuid),
    AddEvent(EventPayload),
    UpdateEvent { event_id: Uuid, payload: EventPayload },
    DeleteEvent(Uuid),
    AddToPipeline(PipelineRequest),
    ProcessPipelineCandidate(Uuid),
    SnoozePipelineEntry(Uuid),
    UpdateCostSettings(CostSettings),
    AddTemplate(TemplatePayload),
    UpdateTemplate { template_id: Uuid, payload: TemplatePayload },
    DeleteTemplate(Uuid),
    MarkNotificationRead(Uuid),
    MarkAllNotificationsRead,
    RestoreBackup(BackupDocument),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ChangeStatus { .. } => "change_status",
            Action::BulkChangeStatus { .. } => "bulk_change_status",
            Action::AddCandidate(_) => "add_candidate",
            Action::AddCandidates(_) => "add_candidates",
            Action::UpdateCandidate { .. } => "update_candidate",
            Action::UpdateAvatar { .. } => "update_avatar",
            Action::AddNote { .. } => "add_note",
            Action::BulkAddNote { .. } => "bulk_add_note",
            Action::BulkMessage { .. } => "bulk_message",
            Action::RateCandidate { .. } => "rate_candidate",
            Action::MarkCostPaid { .. } => "mark_cost_paid",
            Action::UpdateKit { .. } => "update_kit",
            Action::MarkKitReturned { .. } => "mark_kit_returned",
            Action::MergeCandidates { .. } => "merge_candidates",
            Action::AddTask(_) => "add_task",
            Action::UpdateTaskStatus { .. } => "update_task_status",
            Action::ArchiveCompletedTasks => "archive_completed_tasks",
            Action::RestoreTask(_) => "restore_task",
            Action::AddEvent(_) => "add_event",
            Action::UpdateEvent { .. } => "update_event",
            Action::DeleteEvent(_) => "delete_event",
            Action::AddToPipeline(_) => "add_to_pipeline",
            Action::ProcessPipelineCandidate(_) => "process_pipeline_candidate",
            Action::SnoozePipelineEntry(_) => "snooze_pipeline_entry",
            Action::UpdateCostSettings(_) => "update_cost_settings",
            Action::AddTemplate(_) => "add_template",
            Action::UpdateTemplate { .. } => "update_template",
            Action::DeleteTemplate(_) => "delete_template",
            Action::MarkNotificationRead(_) => "mark_notification_read",
            Action::MarkAllNotificationsRead => "mark_all_notifications_read",
            Action::RestoreBackup(_) => "restore_backup",
        }
    }
}

/// What a committed action produced, in a form routes can hand back as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Done,
    Created { id: Uuid },
    /// `false` when the action turned out to be a no-op.
    Changed { changed: bool },
    Counted { count: usize },
    Pipeline { processed: Processed },
}

/// Replaces the working records and clears notifications. Templates, cost
/// settings and the talent pipeline are left as they are.
fn restore_backup(snapshot: &mut AppSnapshot, backup: BackupDocument) {
    snapshot.candidates = backup.candidates;
    snapshot.events = backup.events;
    snapshot.events.sort_by_key(|e| e.date);
    snapshot.tasks = backup.tasks;
    snapshot.notifications.clear();
}

/// Applies one action to `snapshot` in place.
pub fn apply(
    snapshot: &mut AppSnapshot,
    action: Action,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<ActionOutcome> {
    use ActionOutcome::*;

    let outcome = match action {
        Action::ChangeStatus {
            candidate_id,
            change,
        } => Changed {
            changed: LifecycleService::transition(snapshot, candidate_id, &change, now)?,
        },
        Action::BulkChangeStatus {
            candidate_ids,
            change,
        } => Counted {
            count: LifecycleService::transition_many(snapshot, &candidate_ids, &change, now)?,
        },
        Action::AddCandidate(payload) => Created {
            id: CandidateService::add(snapshot, payload, now)?,
        },
        Action::AddCandidates(candidates) => Counted {
            count: CandidateService::add_many(snapshot, candidates, now)?,
        },
        Action::UpdateCandidate {
            candidate_id,
            details,
        } => {
            CandidateService::update(snapshot, candidate_id, details)?;
            Done
        }
        Action::UpdateAvatar {
            candidate_id,
            avatar_url,
        } => {
            CandidateService::update_avatar(snapshot, candidate_id, avatar_url)?;
            Done
        }
        Action::AddNote {
            candidate_id,
            content,
        } => Created {
            id: CandidateService::add_note(snapshot, candidate_id, &content, actor, now)?,
        },
        Action::BulkAddNote {
            candidate_ids,
            content,
        } => Counted {
            count: CandidateService::bulk_add_note(snapshot, &candidate_ids, &content, actor, now)?,
        },
        Action::BulkMessage {
            candidate_ids,
            subject,
            body,
        } => Counted {
            count: CandidateService::bulk_message(
                snapshot,
                &candidate_ids,
                &subject,
                &body,
                actor,
                now,
            )?,
        },
        Action::RateCandidate {
            candidate_id,
            ratings,
        } => {
            CandidateService::rate(snapshot, candidate_id, ratings, actor, now)?;
            Done
        }
        Action::MarkCostPaid {
            candidate_id,
            cost_id,
        } => Changed {
            changed: CandidateService::mark_cost_paid(snapshot, candidate_id, cost_id, actor, now)?,
        },
        Action::UpdateKit {
            candidate_id,
            items,
        } => {
            KitService::update_kit(snapshot, candidate_id, items, now)?;
            Done
        }
        Action::MarkKitReturned {
            candidate_id,
            item_id,
        } => {
            KitService::mark_returned(snapshot, candidate_id, item_id, now)?;
            Done
        }
        Action::MergeCandidates {
            master_id,
            duplicate_ids,
        } => Counted {
            count: CandidateService::merge(snapshot, master_id, &duplicate_ids, now)?,
        },
        Action::AddTask(new_task) => Created {
            id: TaskService::add(snapshot, new_task, actor, now)?,
        },
        Action::UpdateTaskStatus { task_id, status } => Changed {
            changed: TaskService::set_status(snapshot, task_id, status, actor, now)?,
        },
        Action::ArchiveCompletedTasks => Counted {
            count: TaskService::archive_completed(snapshot, actor, now),
        },
        Action::RestoreTask(task_id) => {
            TaskService::restore(snapshot, task_id, actor, now)?;
            Done
        }
        Action::AddEvent(payload) => Created {
            id: EventService::add(snapshot, payload, actor, now)?,
        },
        Action::UpdateEvent { event_id, payload } => {
            EventService::update(snapshot, event_id, payload)?;
            Done
        }
        Action::DeleteEvent(event_id) => {
            EventService::delete(snapshot, event_id)?;
            Done
        }
        Action::AddToPipeline(request) => {
            PipelineService::add_to_pipeline(snapshot, request, now)?;
            Done
        }
        Action::ProcessPipelineCandidate(candidate_id) => Pipeline {
            processed: PipelineService::process(snapshot, candidate_id, now)?,
        },
        Action::SnoozePipelineEntry(candidate_id) => {
            PipelineService::snooze(snapshot, candidate_id, now)?;
            Done
        }
        Action::UpdateCostSettings(settings) => {
            snapshot.cost_settings = settings;
            Done
        }
        Action::AddTemplate(payload) => Created {
            id: TemplateService::add(snapshot, payload)?,
        },
        Action::UpdateTemplate {
            template_id,
            payload,
        } => {
            TemplateService::update(snapshot, template_id, payload)?;
            Done
        }
        Action::DeleteTemplate(template_id) => {
            TemplateService::delete(snapshot, template_id)?;
            Done
        }
        Action::MarkNotificationRead(notification_id) => {
            NotificationService::mark_read(snapshot, notification_id)?;
            Done
        }
        Action::MarkAllNotificationsRead => Counted {
            count: NotificationService::mark_all_read(snapshot),
        },
        Action::RestoreBackup(backup) => {
            restore_backup(snapshot, backup);
            Done
        }
    };
    Ok(outcome)
}

pub struct StateStore {
    snapshot: AppSnapshot,
    repo: Arc<dyn SnapshotRepository>,
}

impl StateStore {
    /// Rehydrates from the repository, or starts from the seed state when
    /// nothing was saved or the stored document cannot be read.
    pub async fn load(repo: Arc<dyn SnapshotRepository>) -> Self {
        let snapshot = match repo.load().await {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    candidates = snapshot.candidates.len(),
                    tasks = snapshot.tasks.len(),
                    "snapshot loaded"
                );
                snapshot
            }
            Ok(None) => {
                tracing::info!("no saved snapshot, starting from seed state");
                AppSnapshot::seed()
            }
            Err(e) => {
                tracing::warn!("failed to load snapshot, starting from seed state: {}", e);
                AppSnapshot::seed()
            }
        };
        Self { snapshot, repo }
    }

    pub fn snapshot(&self) -> &AppSnapshot {
        &self.snapshot
    }

    pub async fn dispatch(
        &mut self,
        action: Action,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<ActionOutcome> {
        let name = action.name();
        let mut next = self.snapshot.clone();
        let outcome = match apply(&mut next, action, actor, now) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(action = name, "action rejected: {}", e);
                return Err(e);
            }
        };
        self.snapshot = next;
        tracing::info!(action = name, actor, ?outcome, "action committed");

        if let Err(e) = self.repo.save(&self.snapshot).await {
            tracing::warn!(action = name, "failed to persist snapshot: {}", e);
        }
        Ok(outcome)
    }

    pub fn export_backup(&self) -> BackupDocument {
        BackupDocument::from(&self.snapshot)
    }
}
