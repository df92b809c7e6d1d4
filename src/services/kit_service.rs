use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::kit::{AssignedKitItem, DesiredKitItem};
use crate::models::snapshot::AppSnapshot;

pub struct KitService;

impl KitService {
    /// Replaces a candidate's kit with `desired`.
    ///
    /// Each desired item claims the first unclaimed existing item with the same
    /// type and size, keeping its id and dates but taking the new metadata.
    /// Unmatched desired items are newly assigned at `now`. Existing items that
    /// nothing claims are dropped together with their return history.
    pub fn reconcile(
        existing: &[AssignedKitItem],
        desired: Vec<DesiredKitItem>,
        now: DateTime<Utc>,
    ) -> Vec<AssignedKitItem> {
        let mut unmatched: Vec<&AssignedKitItem> = existing.iter().collect();

        desired
            .into_iter()
            .map(|item| {
                let position = unmatched
                    .iter()
                    .position(|ex| ex.kit_type == item.kit_type && ex.size == item.size);
                match position {
                    Some(idx) => {
                        let matched = unmatched.remove(idx);
                        AssignedKitItem {
                            metadata: item.metadata,
                            ..matched.clone()
                        }
                    }
                    None => AssignedKitItem {
                        id: Uuid::new_v4(),
                        kit_type: item.kit_type,
                        assigned_at: now,
                        returned_at: None,
                        size: item.size,
                        metadata: item.metadata,
                    },
                }
            })
            .collect()
    }

    pub fn update_kit(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        desired: Vec<DesiredKitItem>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let candidate = snapshot
            .candidate_mut(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        candidate.assigned_kit = Self::reconcile(&candidate.assigned_kit, desired, now);
        Ok(())
    }

    /// Stamps the return time. An item stays returned; a second call keeps the first stamp.
    pub fn mark_returned(
        snapshot: &mut AppSnapshot,
        candidate_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let candidate = snapshot
            .candidate_mut(candidate_id)
            .ok_or_else(|| Error::not_found("Candidate", candidate_id))?;
        let item = candidate
            .assigned_kit
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| Error::not_found("Kit item", item_id))?;

        if item.returned_at.is_none() {
            item.returned_at = Some(now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateStatus;
    use crate::models::kit::{KitItemType, KitMetadata};
    use crate::services::fixtures::{candidate, fixed_now, snapshot_with};
    use chrono::Duration;

    fn returned_tablet(returned_at: DateTime<Utc>) -> AssignedKitItem {
        AssignedKitItem {
            id: Uuid::new_v4(),
            kit_type: KitItemType::Tablet,
            assigned_at: fixed_now() - Duration::days(60),
            returned_at: Some(returned_at),
            size: None,
            metadata: KitMetadata {
                tablet_imei: Some("356938035643809".to_string()),
                ..KitMetadata::default()
            },
        }
    }

    fn desired(kit_type: KitItemType, size: Option<&str>) -> DesiredKitItem {
        DesiredKitItem {
            kit_type,
            size: size.map(str::to_string),
            metadata: KitMetadata::default(),
        }
    }

    #[test]
    fn matched_items_keep_identity_and_return_date() {
        let t1 = fixed_now() - Duration::days(5);
        let tablet = returned_tablet(t1);

        let result = KitService::reconcile(
            &[tablet.clone()],
            vec![
                desired(KitItemType::Tablet, None),
                desired(KitItemType::Jacket, Some("L")),
            ],
            fixed_now(),
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, tablet.id);
        assert_eq!(result[0].assigned_at, tablet.assigned_at);
        assert_eq!(result[0].returned_at, Some(t1));
        // metadata comes from the desired list
        assert_eq!(result[0].metadata.tablet_imei, None);

        assert_eq!(result[1].kit_type, KitItemType::Jacket);
        assert_eq!(result[1].size.as_deref(), Some("L"));
        assert_ne!(result[1].id, tablet.id);
        assert_eq!(result[1].assigned_at, fixed_now());
        assert_eq!(result[1].returned_at, None);
    }

    #[test]
    fn omitted_items_are_dropped_with_their_history() {
        let tablet = returned_tablet(fixed_now() - Duration::days(5));

        let result = KitService::reconcile(
            &[tablet.clone()],
            vec![desired(KitItemType::Jacket, Some("L"))],
            fixed_now(),
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kit_type, KitItemType::Jacket);
        assert!(result.iter().all(|item| item.id != tablet.id));
    }

    #[test]
    fn each_existing_item_is_claimed_once() {
        let shirt = |size: &str| AssignedKitItem {
            id: Uuid::new_v4(),
            kit_type: KitItemType::PoloShirt,
            assigned_at: fixed_now() - Duration::days(10),
            returned_at: None,
            size: Some(size.to_string()),
            metadata: KitMetadata::default(),
        };
        let existing = vec![shirt("M"), shirt("M")];

        let result = KitService::reconcile(
            &existing,
            vec![
                desired(KitItemType::PoloShirt, Some("M")),
                desired(KitItemType::PoloShirt, Some("M")),
                desired(KitItemType::PoloShirt, Some("M")),
            ],
            fixed_now(),
        );

        assert_eq!(result[0].id, existing[0].id);
        assert_eq!(result[1].id, existing[1].id);
        assert_eq!(result[2].assigned_at, fixed_now());
    }

    #[test]
    fn size_is_part_of_the_match() {
        let existing = vec![AssignedKitItem {
            id: Uuid::new_v4(),
            kit_type: KitItemType::Jacket,
            assigned_at: fixed_now() - Duration::days(10),
            returned_at: None,
            size: Some("M".to_string()),
            metadata: KitMetadata::default(),
        }];

        let result = KitService::reconcile(
            &existing,
            vec![desired(KitItemType::Jacket, Some("L"))],
            fixed_now(),
        );
        assert_ne!(result[0].id, existing[0].id);
    }

    #[test]
    fn returning_twice_keeps_first_timestamp() {
        let mut c = candidate("Ola", CandidateStatus::Hired);
        let mut tablet = returned_tablet(fixed_now());
        tablet.returned_at = None;
        let item_id = tablet.id;
        c.assigned_kit.push(tablet);
        let mut snapshot = snapshot_with(vec![c.clone()]);

        let first = fixed_now();
        KitService::mark_returned(&mut snapshot, c.id, item_id, first).unwrap();
        KitService::mark_returned(&mut snapshot, c.id, item_id, first + Duration::days(1)).unwrap();

        let item = &snapshot.candidate(c.id).unwrap().assigned_kit[0];
        assert_eq!(item.returned_at, Some(first));
    }

    #[test]
    fn returning_unknown_item_fails() {
        let c = candidate("Ola", CandidateStatus::Hired);
        let mut snapshot = snapshot_with(vec![c.clone()]);
        let result = KitService::mark_returned(&mut snapshot, c.id, Uuid::new_v4(), fixed_now());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
