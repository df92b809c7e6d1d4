use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use crate::dto::candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::{
    Candidate, CandidateStatus, Note, ReferralSourceType, ScreeningRatings,
};
use crate::models::cost::{CostPart, CostSettings, PaymentStatus};
use crate::models::notification::{Notification, View};
use crate::models::snapshot::AppSnapshot;
use crate::models::task::Task;
use crate::utils::time::due_in_days;
use crate::utils::validation::{non_blank, normalize_email};

const CONTACT_REQUIRED: &str = "A name and a telephone number or email is required";
const BULK_EMAIL_PREVIEW_CHARS: usize = 150;

pub struct CandidateService;

impl CandidateService {
    /// Builds a new candidate from the intake form without touching the snapshot.
    pub fn from_intake(
        payload: CreateCandidatePayload,
        settings: &CostSettings,
        now: DateTime<Utc>,
    ) -> Result<Candidate> {
        let name = non_blank(&payload.name).map(str::to_string);
        let has_contact =
            non_blank(&payload.email).is_some() || non_blank(&payload.phone).is_some();
        let Some(name) = name.filter(|_| has_contact) else {
            return Err(Error::BadRequest(CONTACT_REQUIRED.to_string()));
        };

        let mut provider_cost = Vec::new();
        match payload.referral_source.as_ref().map(|r| r.source_type) {
            Some(ReferralSourceType::Tpj) => {
                provider_cost.push(CostPart::unpaid(
                    "Induction Fee",
                    payload.induction_fee.unwrap_or(settings.tpj_induction_fee),
                ));
                provider_cost.push(CostPart::unpaid(
                    "Final Fee",
                    payload.final_fee.unwrap_or(settings.tpj_final_fee),
                ));
            }
            Some(ReferralSourceType::Stpj) => {
                if let Some(amount) = payload.provider_fee {
                    provider_cost.push(CostPart::unpaid("Provider Fee", amount));
                }
            }
            _ => {}
        }

        Ok(Candidate {
            id: Uuid::new_v4(),
            name,
            email: payload.email.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            status: CandidateStatus::New,
            avatar_url: String::new(),
            last_contact: Some(now.date_naive()),
            notes: Vec::new(),
            date_of_birth: payload.date_of_birth,
            address: payload.address.trim().to_string(),
            postcode: payload.postcode.trim().to_uppercase(),
            license_points: payload.license_points,
            off_road_parking: payload.off_road_parking,
            referral_source: payload.referral_source,
            cv_filename: payload.cv_filename,
            created_at: now,
            hired_at: None,
            key_skills: payload.key_skills,
            work_history_summary: payload.work_history_summary,
            assigned_kit: Vec::new(),
            provider_cost,
            screening_ratings: None,
        })
    }

    /// Single intake: the candidate, a phone-screen task and a notification.
    pub fn add(
        snapshot: &mut AppSnapshot,
        payload: CreateCandidatePayload,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        let candidate = Self::from_intake(payload, &snapshot.cost_settings, now)?;
        let (id, name) = (candidate.id, candidate.name.clone());

        snapshot.candidates.insert(0, candidate);
        snapshot.tasks.insert(
            0,
            Task::automated(id, format!("Phone screen {}", name), due_in_days(now, 1)),
        );
        snapshot.notify(Notification::new(
            format!("New Candidate: {} added.", name),
            Some(id),
            View::CandidateDetail,
            now,
        ));
        Ok(id)
    }

    /// Bulk insert of already-triaged candidates. No per-candidate side effects.
    ///
    /// The whole batch is refused if any record reuses an id, starts anywhere
    /// but NEW or LEGACY, or carries a hire date.
    pub fn add_many(
        snapshot: &mut AppSnapshot,
        candidates: Vec<Candidate>,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if candidates.is_empty() {
            return Err(Error::BadRequest("No candidates to import".to_string()));
        }

        let mut seen: HashSet<Uuid> = snapshot.candidates.iter().map(|c| c.id).collect();
        for candidate in &candidates {
            if !seen.insert(candidate.id) {
                return Err(Error::rejected(format!(
                    "Candidate {} already exists",
                    candidate.id
                )));
            }
            if !matches!(candidate.status, CandidateStatus::New | CandidateStatus::Legacy) {
                return Err(Error::rejected(format!(
                    "Imported candidates must be New or Legacy, not {}",
                    candidate.status.label()
                )));
            }
            if candidate.hired_at.is_some() {
                return Err(Error::rejected("Imported candidates cannot have a hire date"));
            }
        }

        let count = candidates.len();
        snapshot.candidates.splice(0..0, candidates);
        snapshot.notify(Notification::new(
            format!("{} new candidates imported via CSV.", count),
            None,
            View::Candidates,
            now,
        ));
        Ok(count)
    }

    /// Edits profile fields. Status is never changed here.
    pub fn update(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        payload: UpdateCandidatePayload,
    ) -> Result<()> {
        let current = snapshot
            .candidate(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        let mut next = current.clone();

        if let Some(name) = payload.name {
            next.name = name.trim().to_string();
        }
        if let Some(email) = payload.email {
            next.email = email.trim().to_string();
        }
        if let Some(phone) = payload.phone {
            next.phone = phone.trim().to_string();
        }
        if let Some(dob) = payload.date_of_birth {
            next.date_of_birth = Some(dob);
        }
        if let Some(address) = payload.address {
            next.address = address.trim().to_string();
        }
        if let Some(postcode) = payload.postcode {
            next.postcode = postcode.trim().to_uppercase();
        }
        if let Some(points) = payload.license_points {
            next.license_points = points;
        }
        if let Some(parking) = payload.off_road_parking {
            next.off_road_parking = parking;
        }
        if let Some(source) = payload.referral_source {
            next.referral_source = Some(source);
        }
        if let Some(date) = payload.last_contact {
            next.last_contact = Some(date);
        }
        if let Some(skills) = payload.key_skills {
            next.key_skills = skills;
        }
        if let Some(summary) = payload.work_history_summary {
            next.work_history_summary = Some(summary);
        }

        if next.name.is_empty() || (next.email.is_empty() && next.phone.is_empty()) {
            return Err(Error::BadRequest(CONTACT_REQUIRED.to_string()));
        }

        if let Some(existing) = snapshot.candidate_mut(candidate_id) {
            *existing = next;
        }
        Ok(())
    }

    pub fn update_avatar(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        url: String,
    ) -> Result<()> {
        let candidate = snapshot
            .candidate_mut(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        candidate.avatar_url = url;
        Ok(())
    }

    pub fn add_note(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        content: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        let content = non_blank(content)
            .ok_or_else(|| Error::BadRequest("Note content is required".to_string()))?;
        let candidate = snapshot
            .candidate_mut(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        let note = Note::new(content, actor, now);
        let id = note.id;
        candidate.push_note(note);
        Ok(id)
    }

    /// Adds the same note to every listed candidate. Returns how many received it.
    pub fn bulk_add_note(
        snapshot: &mut AppSnapshot,
        candidate_ids: &[Uuid],
        content: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let content = non_blank(content)
            .ok_or_else(|| Error::BadRequest("Note content is required".to_string()))?;
        let wanted: HashSet<Uuid> = candidate_ids.iter().copied().collect();

        let mut count = 0;
        for candidate in snapshot
            .candidates
            .iter_mut()
            .filter(|c| wanted.contains(&c.id))
        {
            candidate.push_note(Note::new(content, actor, now));
            count += 1;
        }
        if count == 0 {
            return Err(Error::NotFound(
                "None of the selected candidates exist".to_string(),
            ));
        }
        Ok(count)
    }

    pub fn bulk_email_note(subject: &str, body: &str) -> String {
        let preview: String = body.chars().take(BULK_EMAIL_PREVIEW_CHARS).collect();
        let ellipsis = if body.chars().count() > BULK_EMAIL_PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        format!(
            "Bulk email sent\nSubject: {}\n\nContent:\n{}{}",
            subject, preview, ellipsis
        )
    }

    /// Logs a bulk email against every recipient.
    pub fn bulk_message(
        snapshot: &mut AppSnapshot,
        candidate_ids: &[Uuid],
        subject: &str,
        body: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if subject.trim().is_empty() || body.trim().is_empty() {
            return Err(Error::BadRequest("Subject and body are required".to_string()));
        }
        let note = Self::bulk_email_note(subject, body);
        Self::bulk_add_note(snapshot, candidate_ids, &note, actor, now)
    }

    /// Saves screening scores. Completing the assessment locks them and logs the totals.
    pub fn rate(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        ratings: ScreeningRatings,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !ratings.all_in_range() {
            return Err(Error::BadRequest(
                "Screening scores must be between 1 and 5".to_string(),
            ));
        }
        let candidate = snapshot
            .candidate_mut(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        if candidate
            .screening_ratings
            .map(|existing| existing.completed)
            .unwrap_or(false)
        {
            return Err(Error::rejected(
                "Screening assessment is already completed",
            ));
        }

        candidate.screening_ratings = Some(ratings);
        if ratings.completed {
            candidate.push_note(Note::new(
                format!(
                    "Screening Assessment Completed.\nTotal Score: {} / 20\n\nBreakdown:\n- Financial Viability: {}/5\n- Logistics: {}/5\n- Compliance: {}/5\n- Attitude: {}/5",
                    ratings.total(),
                    ratings.financial_viability,
                    ratings.logistics_availability,
                    ratings.compliance_tech,
                    ratings.attitude_experience,
                ),
                actor,
                now,
            ));
        }
        Ok(())
    }

    /// One-way UNPAID -> PAID. Paying twice changes nothing.
    pub fn mark_cost_paid(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        cost_id: Uuid,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let candidate = snapshot
            .candidate_mut(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        let cost = candidate
            .provider_cost
            .iter_mut()
            .find(|cost| cost.id == cost_id)
            .ok_or_else(|| Error::not_found("Cost", cost_id))?;
        if cost.status == PaymentStatus::Paid {
            return Ok(false);
        }

        cost.status = PaymentStatus::Paid;
        cost.paid_at = Some(now);
        let note = format!("Provider Cost \"{}\" marked as PAID.", cost.cost_type);
        candidate.push_note(Note::new(note, actor, now));
        Ok(true)
    }

    /// Folds the duplicates' notes into the master and drops the duplicates.
    /// Nothing happens unless at least two of the records exist.
    pub fn merge(
        snapshot: &mut AppSnapshot,
        master_id: Uuid,
        duplicate_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let mut involved: HashSet<Uuid> = duplicate_ids.iter().copied().collect();
        involved.insert(master_id);

        let (mut group, rest): (Vec<Candidate>, Vec<Candidate>) = snapshot
            .candidates
            .iter()
            .cloned()
            .partition(|c| involved.contains(&c.id));
        let Some(master_idx) = group.iter().position(|c| c.id == master_id) else {
            return Err(Error::not_found("Candidate", master_id));
        };
        if group.len() < 2 {
            return Ok(0);
        }

        let mut master = group.remove(master_idx);
        let merged = group.len();
        master
            .notes
            .extend(group.into_iter().flat_map(|duplicate| duplicate.notes));
        master.notes.sort_by(|a, b| b.date.cmp(&a.date));

        let message = format!("Merged {} duplicates into {}.", merged, master.name);
        snapshot.candidates = std::iter::once(master).chain(rest).collect();
        snapshot.notify(Notification::new(
            message,
            Some(master_id),
            View::CandidateDetail,
            now,
        ));
        Ok(merged)
    }

    /// Candidates sharing an email address, case-insensitively.
    pub fn duplicate_groups(snapshot: &AppSnapshot) -> Vec<Vec<Candidate>> {
        let mut by_email: BTreeMap<String, Vec<Candidate>> = BTreeMap::new();
        for candidate in &snapshot.candidates {
            let email = normalize_email(&candidate.email);
            if email.is_empty() {
                continue;
            }
            by_email.entry(email).or_default().push(candidate.clone());
        }
        by_email
            .into_values()
            .filter(|group| group.len() > 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::ReferralSource;
    use crate::services::fixtures::{candidate, fixed_now, snapshot_with, ACTOR};
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn intake(name: &str, email: &str, phone: &str) -> CreateCandidatePayload {
        CreateCandidatePayload {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            ..CreateCandidatePayload::default()
        }
    }

    fn with_source(
        mut payload: CreateCandidatePayload,
        source: ReferralSourceType,
    ) -> CreateCandidatePayload {
        payload.referral_source = Some(ReferralSource {
            source_type: source,
            detail: None,
        });
        payload
    }

    #[test]
    fn intake_requires_name_and_some_contact() {
        let settings = CostSettings::default();
        for payload in [
            intake("", "a@b.com", ""),
            intake("Ola", "", " "),
            intake("   ", "", "07123"),
        ] {
            let err = CandidateService::from_intake(payload, &settings, fixed_now()).unwrap_err();
            assert!(matches!(err, Error::BadRequest(msg) if msg == CONTACT_REQUIRED));
        }
        let phone_only = intake("Ola", "", "07123");
        assert!(CandidateService::from_intake(phone_only, &settings, fixed_now()).is_ok());
    }

    #[test]
    fn adding_a_candidate_raises_phone_screen_task_and_notification() {
        let mut snapshot = snapshot_with(vec![]);
        let payload = intake("Ola Smith", "ola@example.com", "");
        let id = CandidateService::add(&mut snapshot, payload, fixed_now()).unwrap();

        let added = snapshot.candidate(id).unwrap();
        assert_eq!(added.status, CandidateStatus::New);
        assert_eq!(added.last_contact, Some(fixed_now().date_naive()));
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].title, "Phone screen Ola Smith");
        assert_eq!(snapshot.tasks[0].due_date, due_in_days(fixed_now(), 1));
        assert_eq!(snapshot.notifications[0].message, "New Candidate: Ola Smith added.");
    }

    #[test]
    fn tpj_intake_gets_both_fees_from_settings() {
        let mut settings = CostSettings::default();
        settings.tpj_final_fee = Decimal::new(200, 0);
        let payload = with_source(intake("Ola", "ola@example.com", ""), ReferralSourceType::Tpj);

        let candidate = CandidateService::from_intake(payload, &settings, fixed_now()).unwrap();

        let costs: Vec<_> = candidate
            .provider_cost
            .iter()
            .map(|c| (c.cost_type.as_str(), c.amount, c.status))
            .collect();
        assert_eq!(
            costs,
            vec![
                ("Induction Fee", Decimal::new(150, 0), PaymentStatus::Unpaid),
                ("Final Fee", Decimal::new(200, 0), PaymentStatus::Unpaid),
            ]
        );
    }

    #[test]
    fn stpj_intake_records_provider_fee_only_when_given() {
        let settings = CostSettings::default();
        let without = with_source(intake("Ola", "ola@example.com", ""), ReferralSourceType::Stpj);
        assert!(CandidateService::from_intake(without.clone(), &settings, fixed_now())
            .unwrap()
            .provider_cost
            .is_empty());

        let with = CreateCandidatePayload {
            provider_fee: Some(Decimal::new(9950, 2)),
            ..without
        };
        let candidate = CandidateService::from_intake(with, &settings, fixed_now()).unwrap();
        assert_eq!(candidate.provider_cost.len(), 1);
        assert_eq!(candidate.provider_cost[0].cost_type, "Provider Fee");
        assert_eq!(candidate.total_provider_cost(), Decimal::new(9950, 2));
    }

    #[test]
    fn bulk_import_notifies_once() {
        let mut snapshot = snapshot_with(vec![]);
        let imported = vec![
            candidate("Ann", CandidateStatus::Legacy),
            candidate("Ben", CandidateStatus::Legacy),
        ];
        let count = CandidateService::add_many(&mut snapshot, imported, fixed_now()).unwrap();

        assert_eq!(count, 2);
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.notifications.len(), 1);
        assert_eq!(snapshot.notifications[0].message, "2 new candidates imported via CSV.");
    }

    #[test]
    fn bulk_import_refuses_ids_already_present() {
        let existing = candidate("Ann", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![existing.clone()]);
        let imported = vec![
            Candidate {
                status: CandidateStatus::New,
                ..existing.clone()
            },
            candidate("Ben", CandidateStatus::Legacy),
        ];

        let err = CandidateService::add_many(&mut snapshot, imported, fixed_now()).unwrap_err();

        assert!(matches!(err, Error::Rejected(_)));
        assert_eq!(snapshot.candidates.len(), 1);
        assert!(snapshot.notifications.is_empty());
    }

    #[test]
    fn bulk_import_refuses_ids_repeated_in_the_batch() {
        let mut snapshot = snapshot_with(vec![]);
        let ann = candidate("Ann", CandidateStatus::Legacy);
        let imported = vec![ann.clone(), ann];

        let err = CandidateService::add_many(&mut snapshot, imported, fixed_now()).unwrap_err();

        assert!(matches!(err, Error::Rejected(_)));
        assert!(snapshot.candidates.is_empty());
    }

    #[test]
    fn bulk_import_only_accepts_new_or_legacy() {
        let mut snapshot = snapshot_with(vec![]);
        let imported = vec![
            candidate("Ann", CandidateStatus::New),
            candidate("Ben", CandidateStatus::Hired),
        ];

        let err = CandidateService::add_many(&mut snapshot, imported, fixed_now()).unwrap_err();

        assert!(matches!(err, Error::Rejected(_)));
        assert!(snapshot.candidates.is_empty());
    }

    #[test]
    fn bulk_import_refuses_a_hire_date() {
        let mut snapshot = snapshot_with(vec![]);
        let imported = vec![Candidate {
            hired_at: Some(fixed_now()),
            ..candidate("Ann", CandidateStatus::Legacy)
        }];

        let err = CandidateService::add_many(&mut snapshot, imported, fixed_now()).unwrap_err();

        assert!(matches!(err, Error::Rejected(_)));
        assert!(snapshot.candidates.is_empty());
    }

    #[test]
    fn update_refuses_to_remove_all_contact_details() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        let payload = UpdateCandidatePayload {
            name: None,
            email: Some(String::new()),
            phone: Some(String::new()),
            date_of_birth: None,
            address: None,
            postcode: None,
            license_points: None,
            off_road_parking: None,
            referral_source: None,
            last_contact: None,
            key_skills: None,
            work_history_summary: None,
        };
        assert!(CandidateService::update(&mut snapshot, c.id, payload).is_err());
        assert_eq!(snapshot.candidate(c.id).unwrap().email, c.email);
    }

    #[test]
    fn notes_are_newest_first() {
        let c = candidate("Ola", CandidateStatus::New);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        CandidateService::add_note(&mut snapshot, c.id, "first", ACTOR, fixed_now()).unwrap();
        let later = fixed_now() + Duration::minutes(1);
        CandidateService::add_note(&mut snapshot, c.id, "second", ACTOR, later).unwrap();

        let notes = &snapshot.candidate(c.id).unwrap().notes;
        assert_eq!(notes[0].content, "second");
        assert_eq!(notes[1].content, "first");
        assert_eq!(notes[0].author, ACTOR);
    }

    #[test]
    fn bulk_message_logs_truncated_body() {
        let a = candidate("Ann", CandidateStatus::New);
        let b = candidate("Ben", CandidateStatus::New);
        let mut snapshot = snapshot_with(vec![a.clone(), b.clone()]);
        let body = "x".repeat(200);

        let ids = [a.id, b.id];
        let count =
            CandidateService::bulk_message(&mut snapshot, &ids, "Hello", &body, ACTOR, fixed_now())
                .unwrap();

        assert_eq!(count, 2);
        let expected = format!(
            "Bulk email sent\nSubject: Hello\n\nContent:\n{}...",
            "x".repeat(150)
        );
        assert_eq!(snapshot.candidate(a.id).unwrap().notes[0].content, expected);
        assert_eq!(snapshot.candidate(b.id).unwrap().notes[0].content, expected);
    }

    #[test]
    fn short_bulk_message_has_no_ellipsis() {
        assert_eq!(
            CandidateService::bulk_email_note("Hi", "Short body"),
            "Bulk email sent\nSubject: Hi\n\nContent:\nShort body"
        );
    }

    #[test]
    fn bulk_message_requires_subject_and_body() {
        let a = candidate("Ann", CandidateStatus::New);
        let mut snapshot = snapshot_with(vec![a.clone()]);
        let result =
            CandidateService::bulk_message(&mut snapshot, &[a.id], " ", "body", ACTOR, fixed_now());
        assert!(result.is_err());
        assert!(snapshot.candidate(a.id).unwrap().notes.is_empty());
    }

    fn ratings(score: u8, completed: bool) -> ScreeningRatings {
        ScreeningRatings {
            financial_viability: score,
            logistics_availability: score,
            compliance_tech: score,
            attitude_experience: score,
            completed,
        }
    }

    #[test]
    fn completed_ratings_are_locked() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);

        CandidateService::rate(&mut snapshot, c.id, ratings(3, false), ACTOR, fixed_now()).unwrap();
        CandidateService::rate(&mut snapshot, c.id, ratings(4, true), ACTOR, fixed_now()).unwrap();
        let err = CandidateService::rate(&mut snapshot, c.id, ratings(1, false), ACTOR, fixed_now())
            .unwrap_err();

        assert!(matches!(err, Error::Rejected(_)));
        let stored = snapshot.candidate(c.id).unwrap();
        assert_eq!(stored.screening_ratings, Some(ratings(4, true)));
        assert!(stored.notes[0]
            .content
            .starts_with("Screening Assessment Completed.\nTotal Score: 16 / 20"));
    }

    #[test]
    fn out_of_range_scores_are_refused() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        for score in [0, 6] {
            let scores = ratings(score, false);
            let result = CandidateService::rate(&mut snapshot, c.id, scores, ACTOR, fixed_now());
            assert!(result.is_err());
        }
        assert!(snapshot.candidate(c.id).unwrap().screening_ratings.is_none());
    }

    #[test]
    fn paying_a_cost_is_one_way() {
        let mut c = candidate("Ola", CandidateStatus::Hired);
        let cost = CostPart::unpaid("Final Fee", Decimal::new(150, 0));
        let cost_id = cost.id;
        c.provider_cost.push(cost);
        let mut snapshot = snapshot_with(vec![c.clone()]);

        let first = fixed_now();
        let later = fixed_now() + Duration::days(1);
        let paid = CandidateService::mark_cost_paid(&mut snapshot, c.id, cost_id, ACTOR, first);
        assert!(paid.unwrap());
        let repaid = CandidateService::mark_cost_paid(&mut snapshot, c.id, cost_id, ACTOR, later);
        assert!(!repaid.unwrap());

        let stored = snapshot.candidate(c.id).unwrap();
        assert_eq!(stored.provider_cost[0].status, PaymentStatus::Paid);
        assert_eq!(stored.provider_cost[0].paid_at, Some(fixed_now()));
        assert_eq!(stored.notes.len(), 1);
        assert_eq!(stored.notes[0].content, "Provider Cost \"Final Fee\" marked as PAID.");
    }

    fn with_notes(name: &str, days_ago: &[i64]) -> Candidate {
        let mut c = candidate(name, CandidateStatus::New);
        for days in days_ago {
            c.notes.push(Note::new(
                format!("{} note {}", name, days),
                ACTOR,
                fixed_now() - Duration::days(*days),
            ));
        }
        c
    }

    #[test]
    fn merge_unions_notes_newest_first_and_drops_duplicate() {
        let master = with_notes("Master", &[1, 10]);
        let duplicate = with_notes("Dupe", &[2, 5, 20]);
        let bystander = candidate("Other", CandidateStatus::New);
        let mut snapshot =
            snapshot_with(vec![bystander.clone(), duplicate.clone(), master.clone()]);

        let duplicates = [duplicate.id];
        let merged =
            CandidateService::merge(&mut snapshot, master.id, &duplicates, fixed_now()).unwrap();

        assert_eq!(merged, 1);
        assert!(snapshot.candidate(duplicate.id).is_none());
        assert!(snapshot.candidate(bystander.id).is_some());
        assert_eq!(snapshot.candidates[0].id, master.id);
        let notes = &snapshot.candidate(master.id).unwrap().notes;
        assert_eq!(notes.len(), 5);
        assert!(notes.windows(2).all(|pair| pair[0].date >= pair[1].date));
        assert_eq!(snapshot.notifications[0].message, "Merged 1 duplicates into Master.");
    }

    #[test]
    fn merge_with_nothing_to_merge_is_a_no_op() {
        let master = with_notes("Master", &[1]);
        let mut snapshot = snapshot_with(vec![master.clone()]);
        let before = snapshot.clone();

        let unknown = [Uuid::new_v4()];
        let merged =
            CandidateService::merge(&mut snapshot, master.id, &unknown, fixed_now()).unwrap();

        assert_eq!(merged, 0);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn duplicates_are_grouped_by_email_ignoring_case() {
        let a = candidate("Ola", CandidateStatus::New);
        let mut b = candidate("Ola Again", CandidateStatus::Legacy);
        b.email = format!("  {}", a.email.to_uppercase());
        let c = candidate("Someone Else", CandidateStatus::New);
        let snapshot = snapshot_with(vec![a.clone(), b.clone(), c]);

        let groups = CandidateService::duplicate_groups(&snapshot);
        assert_eq!(groups.len(), 1);
        let ids: HashSet<_> = groups[0].iter().map(|c| c.id).collect();
        assert_eq!(ids, HashSet::from([a.id, b.id]));
    }
}
