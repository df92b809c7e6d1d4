//! Candidate status transitions.
//!
//! Any status may move to any other status. What makes the pipeline a state
//! machine is the table of side effects attached to each *target* status:
//! follow-up tasks, system notes and talent pipeline entries. The table is
//! plain data (see [`side_effects`]) so it can be inspected and tested per
//! status, and the functions here only compute; the store decides when the
//! result is committed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::candidate::{
    Candidate, CandidateStatus, Note, ReferralSourceType, TerminationReason, WithdrawalReason,
};
use crate::models::notification::{Notification, View};
use crate::models::pipeline::{TalentPipelineEntry, TalentPipelineType};
use crate::models::snapshot::AppSnapshot;
use crate::models::task::Task;
use crate::services::pipeline_service::PipelineService;
use crate::utils::time::{add_months, due_in_days};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueIn {
    Days(i64),
    Months(u32),
}

impl DueIn {
    pub fn from(&self, now: DateTime<Utc>) -> NaiveDate {
        match *self {
            DueIn::Days(days) => due_in_days(now, days),
            DueIn::Months(months) => add_months(now, months).date_naive(),
        }
    }
}

/// A task raised automatically; `{name}` in the title is replaced by the candidate's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRule {
    pub title: &'static str,
    pub due: DueIn,
}

impl TaskRule {
    pub fn instantiate(&self, candidate: &Candidate, now: DateTime<Utc>) -> Task {
        Task::automated(
            candidate.id,
            self.title.replace("{name}", &candidate.name),
            self.due.from(now),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    CreateTask(TaskRule),
    CreateTaskForReferral {
        source: ReferralSourceType,
        task: TaskRule,
    },
    CreateTaskForTerminationReason {
        reason: TerminationReason,
        task: TaskRule,
    },
    StampHiredAt,
    AppendWithdrawalNote,
    EnqueueReEngagement {
        reason: WithdrawalReason,
        follow_up: DueIn,
    },
}

static SCREENING_EFFECTS: [SideEffect; 1] = [SideEffect::CreateTask(TaskRule {
    title: "Complete screening call for {name}",
    due: DueIn::Days(1),
})];

static VIDEO_INTERVIEW_EFFECTS: [SideEffect; 1] = [SideEffect::CreateTask(TaskRule {
    title: "Schedule video interview for {name}",
    due: DueIn::Days(2),
})];

static INDUCTION_EFFECTS: [SideEffect; 1] = [SideEffect::CreateTask(TaskRule {
    title: "Confirm induction details for {name}",
    due: DueIn::Days(3),
})];

static HIRED_EFFECTS: [SideEffect; 3] = [
    SideEffect::CreateTask(TaskRule {
        title: "Finalise onboarding for {name}",
        due: DueIn::Days(1),
    }),
    SideEffect::CreateTaskForReferral {
        source: ReferralSourceType::Tpj,
        task: TaskRule {
            title: "Pay TPJ Final Fee for {name}",
            due: DueIn::Days(14),
        },
    },
    SideEffect::StampHiredAt,
];

static TERMINATED_EFFECTS: [SideEffect; 1] = [SideEffect::CreateTaskForTerminationReason {
    reason: TerminationReason::TookAnotherJob,
    task: TaskRule {
        title: "Follow up with {name} (took another job)",
        due: DueIn::Months(3),
    },
}];

static WITHDRAWN_EFFECTS: [SideEffect; 2] = [
    SideEffect::AppendWithdrawalNote,
    SideEffect::EnqueueReEngagement {
        reason: WithdrawalReason::TookAnotherJob,
        follow_up: DueIn::Months(3),
    },
];

/// Side effects run when a candidate moves *into* `status`.
pub fn side_effects(status: CandidateStatus) -> &'static [SideEffect] {
    match status {
        CandidateStatus::Screening => &SCREENING_EFFECTS,
        CandidateStatus::VideoInterview => &VIDEO_INTERVIEW_EFFECTS,
        CandidateStatus::Induction => &INDUCTION_EFFECTS,
        CandidateStatus::Hired => &HIRED_EFFECTS,
        CandidateStatus::Terminated => &TERMINATED_EFFECTS,
        CandidateStatus::Withdrawn => &WITHDRAWN_EFFECTS,
        CandidateStatus::New | CandidateStatus::Rejected | CandidateStatus::Legacy => &[],
    }
}

/// A requested move. Terminations and withdrawals must carry their reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: CandidateStatus,
    #[serde(default)]
    pub termination_reason: Option<TerminationReason>,
    #[serde(default)]
    pub withdrawal_reason: Option<WithdrawalReason>,
}

impl StatusChange {
    pub fn to(status: CandidateStatus) -> Self {
        Self {
            status,
            termination_reason: None,
            withdrawal_reason: None,
        }
    }

    pub fn terminate(reason: TerminationReason) -> Self {
        Self {
            termination_reason: Some(reason),
            ..Self::to(CandidateStatus::Terminated)
        }
    }

    pub fn withdraw(reason: WithdrawalReason) -> Self {
        Self {
            withdrawal_reason: Some(reason),
            ..Self::to(CandidateStatus::Withdrawn)
        }
    }
}

/// Entities created as a consequence of one candidate's transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionEffects {
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub pipeline_entry: Option<TalentPipelineEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTransition {
    pub candidate: Candidate,
    pub from: CandidateStatus,
    pub effects: TransitionEffects,
}

pub struct LifecycleService;

impl LifecycleService {
    /// Rejects terminations and withdrawals that arrive without a reason.
    pub fn validate(change: &StatusChange) -> Result<()> {
        match change.status {
            CandidateStatus::Terminated => match &change.termination_reason {
                Some(reason) if !reason.is_blank() => Ok(()),
                _ => Err(Error::rejected("Please provide a reason for termination.")),
            },
            CandidateStatus::Withdrawn => match &change.withdrawal_reason {
                Some(reason) if !reason.is_blank() => Ok(()),
                _ => Err(Error::rejected("Please provide a reason for withdrawal.")),
            },
            _ => Ok(()),
        }
    }

    /// Computes the candidate after the move together with everything the move creates.
    /// Returns `None` when the candidate is already in the requested status.
    pub fn plan(
        candidate: &Candidate,
        change: &StatusChange,
        now: DateTime<Utc>,
    ) -> Result<Option<PlannedTransition>> {
        Self::validate(change)?;
        if candidate.status == change.status {
            return Ok(None);
        }

        let mut next = candidate.clone();
        next.status = change.status;
        if change.status != CandidateStatus::Hired {
            next.hired_at = None;
        }

        let mut effects = TransitionEffects::default();
        for effect in side_effects(change.status) {
            match effect {
                SideEffect::CreateTask(rule) => effects.tasks.push(rule.instantiate(&next, now)),
                SideEffect::CreateTaskForReferral { source, task } => {
                    let matches = next
                        .referral_source
                        .as_ref()
                        .map(|r| r.source_type == *source)
                        .unwrap_or(false);
                    if matches {
                        effects.tasks.push(task.instantiate(&next, now));
                    }
                }
                SideEffect::CreateTaskForTerminationReason { reason, task } => {
                    if change.termination_reason.as_ref() == Some(reason) {
                        effects.tasks.push(task.instantiate(&next, now));
                    }
                }
                SideEffect::StampHiredAt => {
                    if next.hired_at.is_none() {
                        next.hired_at = Some(now);
                    }
                }
                SideEffect::AppendWithdrawalNote => {
                    let reason = change
                        .withdrawal_reason
                        .as_ref()
                        .map(|r| r.to_string())
                        .unwrap_or_default();
                    effects.notes.push(Note::system(
                        format!("Candidate withdrew from process. Reason: {}", reason),
                        now,
                    ));
                }
                SideEffect::EnqueueReEngagement { reason, follow_up } => {
                    if change.withdrawal_reason.as_ref() == Some(reason) {
                        effects.pipeline_entry = Some(TalentPipelineEntry {
                            candidate_id: next.id,
                            added_at: now,
                            follow_up_on: match *follow_up {
                                DueIn::Days(days) => now + chrono::Duration::days(days),
                                DueIn::Months(months) => add_months(now, months),
                            },
                            entry_type: TalentPipelineType::ReEngage,
                            notes: None,
                        });
                    }
                }
            }
        }

        Ok(Some(PlannedTransition {
            candidate: next,
            from: candidate.status,
            effects,
        }))
    }

    /// Moves one candidate and records a "moved to" notification.
    /// Returns whether anything changed.
    pub fn transition(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        change: &StatusChange,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let current = snapshot
            .candidate(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        let Some(planned) = Self::plan(current, change, now)? else {
            return Ok(false);
        };

        let message = format!("{} moved to {}", planned.candidate.name, change.status);
        Self::commit(snapshot, planned);
        snapshot.notify(Notification::new(
            message,
            Some(candidate_id),
            View::CandidateDetail,
            now,
        ));
        Ok(true)
    }

    /// Applies the same move to every listed candidate, then records a single
    /// aggregate notification. Unknown ids are ignored; returns how many
    /// candidates were addressed.
    pub fn transition_many(
        snapshot: &mut AppSnapshot,
        candidate_ids: &[Uuid],
        change: &StatusChange,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        Self::validate(change)?;
        let wanted: HashSet<Uuid> = candidate_ids.iter().copied().collect();
        let targets: Vec<Uuid> = snapshot
            .candidates
            .iter()
            .filter(|c| wanted.contains(&c.id))
            .map(|c| c.id)
            .collect();
        if targets.is_empty() {
            return Err(Error::NotFound(
                "None of the selected candidates exist".to_string(),
            ));
        }

        let mut plans = Vec::new();
        for id in &targets {
            if let Some(candidate) = snapshot.candidate(*id) {
                if let Some(planned) = Self::plan(candidate, change, now)? {
                    plans.push(planned);
                }
            }
        }
        for planned in plans {
            Self::commit(snapshot, planned);
        }

        snapshot.notify(Notification::new(
            format!(
                "Updated status to {} for {} candidates.",
                change.status,
                targets.len()
            ),
            None,
            View::Candidates,
            now,
        ));
        Ok(targets.len())
    }

    fn commit(snapshot: &mut AppSnapshot, planned: PlannedTransition) {
        let PlannedTransition {
            mut candidate,
            effects,
            ..
        } = planned;

        for note in effects.notes {
            candidate.push_note(note);
        }
        if let Some(existing) = snapshot.candidate_mut(candidate.id) {
            *existing = candidate;
        }
        snapshot.tasks.extend(effects.tasks);
        if let Some(entry) = effects.pipeline_entry {
            PipelineService::upsert_entry(snapshot, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;
    use crate::services::fixtures::{candidate, fixed_now, snapshot_with, tpj_candidate};
    use chrono::Duration;

    fn hired_at_matches_status(snapshot: &AppSnapshot) -> bool {
        snapshot
            .candidates
            .iter()
            .all(|c| c.hired_at.is_some() == (c.status == CandidateStatus::Hired))
    }

    fn plan_to(c: &Candidate, status: CandidateStatus) -> PlannedTransition {
        LifecycleService::plan(c, &StatusChange::to(status), fixed_now())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn every_status_has_an_entry_in_the_table() {
        for status in CandidateStatus::ALL {
            let effects = side_effects(status);
            match status {
                CandidateStatus::New | CandidateStatus::Rejected | CandidateStatus::Legacy => {
                    assert!(effects.is_empty(), "{status} should have no side effects")
                }
                _ => assert!(!effects.is_empty(), "{status} should have side effects"),
            }
        }
    }

    #[test]
    fn screening_creates_call_task_due_next_day() {
        let c = candidate("Jane Smith", CandidateStatus::New);
        let planned = plan_to(&c, CandidateStatus::Screening);

        assert_eq!(planned.effects.tasks.len(), 1);
        let task = &planned.effects.tasks[0];
        assert_eq!(task.title, "Complete screening call for Jane Smith");
        assert_eq!(task.due_date, due_in_days(fixed_now(), 1));
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.candidate_id, Some(c.id));
        assert!(task.history.is_empty());
    }

    #[test]
    fn interview_and_induction_tasks_use_their_offsets() {
        let c = candidate("Sam", CandidateStatus::Screening);
        let interview = plan_to(&c, CandidateStatus::VideoInterview);
        assert_eq!(interview.effects.tasks[0].title, "Schedule video interview for Sam");
        assert_eq!(interview.effects.tasks[0].due_date, due_in_days(fixed_now(), 2));

        let induction = plan_to(&c, CandidateStatus::Induction);
        assert_eq!(induction.effects.tasks[0].title, "Confirm induction details for Sam");
        assert_eq!(induction.effects.tasks[0].due_date, due_in_days(fixed_now(), 3));
    }

    #[test]
    fn hiring_a_tpj_referral_adds_final_fee_task() {
        let c = tpj_candidate("Ola", CandidateStatus::Induction);
        let planned = plan_to(&c, CandidateStatus::Hired);

        let titles: Vec<_> = planned.effects.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Finalise onboarding for Ola", "Pay TPJ Final Fee for Ola"]);
        assert_eq!(planned.effects.tasks[1].due_date, due_in_days(fixed_now(), 14));
        assert_eq!(planned.candidate.hired_at, Some(fixed_now()));
    }

    #[test]
    fn hiring_without_tpj_referral_adds_only_onboarding_task() {
        let c = candidate("Ola", CandidateStatus::Induction);
        let planned = plan_to(&c, CandidateStatus::Hired);
        assert_eq!(planned.effects.tasks.len(), 1);
    }

    #[test]
    fn leaving_hired_clears_hire_date() {
        let mut c = candidate("Ola", CandidateStatus::Hired);
        c.hired_at = Some(fixed_now() - Duration::days(30));
        let planned = plan_to(&c, CandidateStatus::Rejected);
        assert_eq!(planned.candidate.hired_at, None);
    }

    #[test]
    fn same_status_is_a_no_op() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        let changed = LifecycleService::transition(
            &mut snapshot,
            c.id,
            &StatusChange::to(CandidateStatus::Screening),
            fixed_now(),
        )
        .unwrap();

        assert!(!changed);
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.notifications.is_empty());
    }

    #[test]
    fn termination_without_reason_is_rejected_and_leaves_state_alone() {
        let c = candidate("Ola", CandidateStatus::Hired);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        let before = snapshot.clone();

        let err = LifecycleService::transition(
            &mut snapshot,
            c.id,
            &StatusChange::to(CandidateStatus::Terminated),
            fixed_now(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Rejected(_)));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn blank_other_reason_counts_as_missing() {
        let change = StatusChange::withdraw(WithdrawalReason::Other("   ".to_string()));
        assert!(LifecycleService::validate(&change).is_err());
    }

    #[test]
    fn termination_for_another_job_schedules_follow_up_in_three_months() {
        let c = candidate("Ola", CandidateStatus::Hired);
        let planned = LifecycleService::plan(
            &c,
            &StatusChange::terminate(TerminationReason::TookAnotherJob),
            fixed_now(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(planned.effects.tasks.len(), 1);
        assert_eq!(planned.effects.tasks[0].title, "Follow up with Ola (took another job)");
        assert_eq!(planned.effects.tasks[0].due_date, add_months(fixed_now(), 3).date_naive());
    }

    #[test]
    fn termination_for_other_reasons_creates_no_task() {
        let c = candidate("Ola", CandidateStatus::Hired);
        let planned = LifecycleService::plan(
            &c,
            &StatusChange::terminate(TerminationReason::PoorPerformance),
            fixed_now(),
        )
        .unwrap()
        .unwrap();
        assert!(planned.effects.tasks.is_empty());
    }

    #[test]
    fn withdrawal_for_another_job_queues_re_engagement() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);

        LifecycleService::transition(
            &mut snapshot,
            c.id,
            &StatusChange::withdraw(WithdrawalReason::TookAnotherJob),
            fixed_now(),
        )
        .unwrap();

        let entries: Vec<_> = snapshot
            .talent_pipeline
            .iter()
            .filter(|e| e.candidate_id == c.id)
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, TalentPipelineType::ReEngage);
        let expected = fixed_now() + Duration::days(91);
        assert!((entries[0].follow_up_on - expected).num_days().abs() <= 1);

        let updated = snapshot.candidate(c.id).unwrap();
        assert_eq!(updated.status, CandidateStatus::Withdrawn);
        assert_eq!(
            updated.notes[0].content,
            "Candidate withdrew from process. Reason: Took another job"
        );
        assert_eq!(updated.notes[0].author, "System");
    }

    #[test]
    fn withdrawal_replaces_an_existing_pipeline_entry() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        snapshot.talent_pipeline.push(TalentPipelineEntry {
            candidate_id: c.id,
            added_at: fixed_now() - Duration::days(200),
            follow_up_on: fixed_now() - Duration::days(10),
            entry_type: TalentPipelineType::Reconsider,
            notes: Some("old".to_string()),
        });

        LifecycleService::transition(
            &mut snapshot,
            c.id,
            &StatusChange::withdraw(WithdrawalReason::TookAnotherJob),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(snapshot.talent_pipeline.len(), 1);
        assert_eq!(snapshot.talent_pipeline[0].entry_type, TalentPipelineType::ReEngage);
    }

    #[test]
    fn withdrawal_for_other_reasons_only_adds_the_note() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        LifecycleService::transition(
            &mut snapshot,
            c.id,
            &StatusChange::withdraw(WithdrawalReason::Other("Moved abroad".to_string())),
            fixed_now(),
        )
        .unwrap();

        assert!(snapshot.talent_pipeline.is_empty());
        assert_eq!(
            snapshot.candidate(c.id).unwrap().notes[0].content,
            "Candidate withdrew from process. Reason: Moved abroad"
        );
    }

    #[test]
    fn every_transition_notifies() {
        let c = candidate("Ola", CandidateStatus::New);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        let change = StatusChange::to(CandidateStatus::Rejected);
        LifecycleService::transition(&mut snapshot, c.id, &change, fixed_now()).unwrap();

        assert_eq!(snapshot.notifications.len(), 1);
        let n = &snapshot.notifications[0];
        assert_eq!(n.message, "Ola moved to Rejected");
        assert_eq!(n.candidate_id, Some(c.id));
        assert!(!n.read);
    }

    #[test]
    fn walking_the_pipeline_to_hired_produces_four_tasks_and_three_notifications() {
        let c = tpj_candidate("Ola", CandidateStatus::New);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        for status in [
            CandidateStatus::Screening,
            CandidateStatus::VideoInterview,
            CandidateStatus::Hired,
        ] {
            let change = StatusChange::to(status);
            LifecycleService::transition(&mut snapshot, c.id, &change, fixed_now()).unwrap();
            assert!(hired_at_matches_status(&snapshot));
        }

        let titles: Vec<_> = snapshot.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Complete screening call for Ola",
                "Schedule video interview for Ola",
                "Finalise onboarding for Ola",
                "Pay TPJ Final Fee for Ola",
            ]
        );
        assert_eq!(snapshot.notifications.len(), 3);
    }

    #[test]
    fn hired_at_tracks_status_across_any_sequence() {
        let c = candidate("Ola", CandidateStatus::New);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        let sequence = [
            StatusChange::to(CandidateStatus::Hired),
            StatusChange::to(CandidateStatus::Induction),
            StatusChange::to(CandidateStatus::Hired),
            StatusChange::terminate(TerminationReason::NoShow),
            StatusChange::to(CandidateStatus::Hired),
            StatusChange::withdraw(WithdrawalReason::Unresponsive),
            StatusChange::to(CandidateStatus::Legacy),
        ];
        for change in &sequence {
            LifecycleService::transition(&mut snapshot, c.id, change, fixed_now()).unwrap();
            assert!(hired_at_matches_status(&snapshot));
        }
    }

    #[test]
    fn bulk_transition_applies_effects_per_candidate_with_one_notification() {
        let a = candidate("Ann", CandidateStatus::New);
        let b = candidate("Ben", CandidateStatus::New);
        let already = candidate("Cy", CandidateStatus::Screening);
        let untouched = candidate("Dee", CandidateStatus::New);
        let mut snapshot =
            snapshot_with(vec![a.clone(), b.clone(), already.clone(), untouched.clone()]);

        let count = LifecycleService::transition_many(
            &mut snapshot,
            &[a.id, b.id, already.id],
            &StatusChange::to(CandidateStatus::Screening),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.notifications.len(), 1);
        assert_eq!(
            snapshot.notifications[0].message,
            "Updated status to Screening for 3 candidates."
        );
        assert_eq!(snapshot.candidate(untouched.id).unwrap().status, CandidateStatus::New);
    }

    #[test]
    fn bulk_withdrawal_requires_a_reason() {
        let a = candidate("Ann", CandidateStatus::New);
        let mut snapshot = snapshot_with(vec![a.clone()]);
        let before = snapshot.clone();
        let result = LifecycleService::transition_many(
            &mut snapshot,
            &[a.id],
            &StatusChange::to(CandidateStatus::Withdrawn),
            fixed_now(),
        );
        assert!(result.is_err());
        assert_eq!(snapshot, before);
    }
}
