use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::models::candidate::{Candidate, CandidateStatus, ReferralSource, ReferralSourceType};
use crate::models::snapshot::AppSnapshot;

pub const ACTOR: &str = "Admin";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap()
}

pub fn candidate(name: &str, status: CandidateStatus) -> Candidate {
    Candidate {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "07123 456789".to_string(),
        status,
        avatar_url: String::new(),
        last_contact: None,
        notes: Vec::new(),
        date_of_birth: None,
        address: String::new(),
        postcode: "M1 1AA".to_string(),
        license_points: 0,
        off_road_parking: false,
        referral_source: None,
        cv_filename: None,
        created_at: fixed_now(),
        hired_at: None,
        key_skills: Vec::new(),
        work_history_summary: None,
        assigned_kit: Vec::new(),
        provider_cost: Vec::new(),
        screening_ratings: None,
    }
}

pub fn tpj_candidate(name: &str, status: CandidateStatus) -> Candidate {
    Candidate {
        referral_source: Some(ReferralSource {
            source_type: ReferralSourceType::Tpj,
            detail: None,
        }),
        ..candidate(name, status)
    }
}

pub fn snapshot_with(candidates: Vec<Candidate>) -> AppSnapshot {
    AppSnapshot {
        candidates,
        ..AppSnapshot::seed()
    }
}
