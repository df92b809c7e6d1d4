use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::Candidate;
use crate::models::cost::CostSettings;
use crate::models::event::ScheduledEvent;
use crate::models::notification::Notification;
use crate::models::pipeline::TalentPipelineEntry;
use crate::models::task::Task;
use crate::models::template::{default_templates, Template};

/// Everything the hub knows, persisted as one document after every committed action.
///
/// Fields missing from a stored document are taken from [`AppSnapshot::seed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSnapshot {
    pub candidates: Vec<Candidate>,
    /// Sorted by date, earliest first.
    pub events: Vec<ScheduledEvent>,
    pub tasks: Vec<Task>,
    pub templates: Vec<Template>,
    /// Newest first.
    pub notifications: Vec<Notification>,
    pub talent_pipeline: Vec<TalentPipelineEntry>,
    pub cost_settings: CostSettings,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        Self::seed()
    }
}

impl AppSnapshot {
    /// State used when nothing has been persisted yet.
    pub fn seed() -> Self {
        Self {
            candidates: Vec::new(),
            events: Vec::new(),
            tasks: Vec::new(),
            templates: default_templates(),
            notifications: Vec::new(),
            talent_pipeline: Vec::new(),
            cost_settings: CostSettings::default(),
        }
    }

    pub fn candidate(&self, id: Uuid) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn candidate_mut(&mut self, id: Uuid) -> Option<&mut Candidate> {
        self.candidates.iter_mut().find(|c| c.id == id)
    }

    pub fn candidate_name(&self, id: Option<Uuid>) -> String {
        id.and_then(|id| self.candidate(id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn pipeline_entry(&self, candidate_id: Uuid) -> Option<&TalentPipelineEntry> {
        self.talent_pipeline
            .iter()
            .find(|e| e.candidate_id == candidate_id)
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.insert(0, notification);
    }
}

/// Portable backup document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub candidates: Vec<Candidate>,
    pub events: Vec<ScheduledEvent>,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub cost_settings: CostSettings,
}

impl From<&AppSnapshot> for BackupDocument {
    fn from(snapshot: &AppSnapshot) -> Self {
        Self {
            candidates: snapshot.candidates.clone(),
            events: snapshot.events.clone(),
            tasks: snapshot.tasks.clone(),
            templates: snapshot.templates.clone(),
            cost_settings: snapshot.cost_settings.clone(),
        }
    }
}
