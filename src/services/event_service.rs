use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::candidate::Note;
use crate::models::event::{EventType, ScheduledEvent};
use crate::models::notification::{Notification, View};
use crate::models::snapshot::AppSnapshot;
use crate::utils::time::{uk_date, uk_date_time};
use crate::utils::validation::non_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub candidate_id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct EventService;

impl EventService {
    fn sort(snapshot: &mut AppSnapshot) {
        snapshot.events.sort_by_key(|e| e.date);
    }

    fn checked_title(payload: &EventPayload) -> Result<String> {
        non_blank(&payload.title)
            .map(str::to_string)
            .ok_or_else(|| Error::BadRequest("Event title is required".to_string()))
    }

    pub fn add(
        snapshot: &mut AppSnapshot,
        payload: EventPayload,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        let title = Self::checked_title(&payload)?;
        let candidate = snapshot
            .candidate_mut(payload.candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", payload.candidate_id))?;
        candidate.push_note(Note::new(
            format!("Event scheduled: {} on {}", title, uk_date_time(payload.date)),
            actor,
            now,
        ));
        let name = candidate.name.clone();

        let event = ScheduledEvent {
            id: Uuid::new_v4(),
            title,
            date: payload.date,
            event_type: payload.event_type,
            candidate_id: payload.candidate_id,
            description: payload.description,
        };
        let id = event.id;
        snapshot.events.push(event);
        Self::sort(snapshot);

        snapshot.notify(Notification::new(
            format!(
                "New Event: {} with {} on {}.",
                payload.event_type,
                name,
                uk_date(payload.date)
            ),
            Some(payload.candidate_id),
            View::Diary,
            now,
        ));
        Ok(id)
    }

    /// Replaces the event's details, including moving it to another slot.
    pub fn update(snapshot: &mut AppSnapshot, event_id: Uuid, payload: EventPayload) -> Result<()> {
        let title = Self::checked_title(&payload)?;
        if snapshot.candidate(payload.candidate_id).is_none() {
            return Err(Error::not_found("Candidate", payload.candidate_id));
        }
        let event = snapshot
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| Error::not_found("Event", event_id))?;

        *event = ScheduledEvent {
            id: event_id,
            title,
            date: payload.date,
            event_type: payload.event_type,
            candidate_id: payload.candidate_id,
            description: payload.description,
        };
        Self::sort(snapshot);
        Ok(())
    }

    pub fn delete(snapshot: &mut AppSnapshot, event_id: Uuid) -> Result<()> {
        let before = snapshot.events.len();
        snapshot.events.retain(|e| e.id != event_id);
        if snapshot.events.len() == before {
            return Err(Error::not_found("Event", event_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateStatus;
    use crate::services::fixtures::{candidate, fixed_now, snapshot_with, ACTOR};
    use chrono::Duration;

    fn payload(candidate_id: Uuid, title: &str, date: DateTime<Utc>) -> EventPayload {
        EventPayload {
            title: title.to_string(),
            date,
            event_type: EventType::VideoCall,
            candidate_id,
            description: None,
        }
    }

    #[test]
    fn adding_keeps_diary_sorted_and_notifies() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        let later = fixed_now() + Duration::days(3);
        let sooner = fixed_now() + Duration::days(1);

        for (title, date) in [("Second", later), ("First", sooner)] {
            let event = payload(c.id, title, date);
            EventService::add(&mut snapshot, event, ACTOR, fixed_now()).unwrap();
        }

        let titles: Vec<_> = snapshot.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(
            snapshot.notifications[0].message,
            "New Event: Video Call with Ola on 11/03/2025."
        );
        assert_eq!(
            snapshot.candidate(c.id).unwrap().notes[0].content,
            "Event scheduled: First on 11/03/2025 09:30"
        );
    }

    #[test]
    fn events_need_an_existing_candidate() {
        let mut snapshot = snapshot_with(vec![]);
        let result = EventService::add(
            &mut snapshot,
            payload(Uuid::new_v4(), "Call", fixed_now()),
            ACTOR,
            fixed_now(),
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(snapshot.events.is_empty());
    }

    #[test]
    fn moving_an_event_resorts_the_diary() {
        let c = candidate("Ola", CandidateStatus::Screening);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        let first =
            EventService::add(&mut snapshot, payload(c.id, "A", fixed_now()), ACTOR, fixed_now())
                .unwrap();
        EventService::add(
            &mut snapshot,
            payload(c.id, "B", fixed_now() + Duration::hours(2)),
            ACTOR,
            fixed_now(),
        )
        .unwrap();

        EventService::update(
            &mut snapshot,
            first,
            payload(c.id, "A", fixed_now() + Duration::days(1)),
        )
        .unwrap();

        assert_eq!(snapshot.events[1].id, first);
    }

    #[test]
    fn deleting_unknown_event_fails() {
        let mut snapshot = snapshot_with(vec![]);
        assert!(EventService::delete(&mut snapshot, Uuid::new_v4()).is_err());
    }
}
