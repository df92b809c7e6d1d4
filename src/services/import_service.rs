//! CSV triage for bulk imports.
//!
//! The sheet is split naively on commas with quotes dropped, which is what the
//! recruiter exports this was built for look like. Nothing here touches the
//! snapshot; only `new_candidates` are committed afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus, ReferralSource, ReferralSourceType};
use crate::utils::validation::normalize_email;

const NAME: &str = "Name";
const PHONE: &str = "Own phone or recruiter number";
const POSTCODE: &str = "Postcode";
const REFERRAL: &str = "Referral source";
const APPLICATION_STATUS: &str = "Application status";
const EMAIL: &str = "Own email";

pub const REQUIRED_HEADERS: [&str; 6] =
    [NAME, PHONE, POSTCODE, REFERRAL, APPLICATION_STATUS, EMAIL];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRow {
    /// 1-based, counting the header as row 1.
    pub row: usize,
    pub data: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvTriage {
    pub new_candidates: Vec<Candidate>,
    pub duplicate_candidates: Vec<Candidate>,
    pub invalid_rows: Vec<InvalidRow>,
}

struct Columns {
    name: usize,
    phone: usize,
    postcode: usize,
    referral: usize,
    email: usize,
}

fn split_row(row: &str) -> Vec<String> {
    row.split(',')
        .map(|cell| cell.trim().replace('"', ""))
        .collect()
}

fn locate_columns(header: &[String]) -> Result<Columns> {
    let find = |wanted: &str| {
        header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::BadRequest(format!("Missing required header: {}", wanted)))
    };
    for required in REQUIRED_HEADERS {
        find(required)?;
    }
    Ok(Columns {
        name: find(NAME)?,
        phone: find(PHONE)?,
        postcode: find(POSTCODE)?,
        referral: find(REFERRAL)?,
        email: find(EMAIL)?,
    })
}

pub fn map_referral_source(raw: &str) -> Option<ReferralSource> {
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_lowercase();
    let (source_type, detail) = if lower.contains("tpj") {
        (ReferralSourceType::Tpj, None)
    } else if lower.contains("website") {
        (ReferralSourceType::Website, None)
    } else if lower.contains("cold call") {
        (ReferralSourceType::ColdCall, None)
    } else {
        (ReferralSourceType::Other, Some(raw.to_string()))
    };
    Some(ReferralSource {
        source_type,
        detail,
    })
}

/// Drops stray punctuation, bullets and byte-order marks before the postcode.
pub fn clean_postcode(raw: &str) -> String {
    raw.trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
        .trim()
        .to_string()
}

pub fn triage(csv: &str, existing: &[Candidate], now: DateTime<Utc>) -> Result<CsvTriage> {
    let rows: Vec<&str> = csv.lines().filter(|row| !row.trim().is_empty()).collect();
    if rows.len() < 2 {
        return Err(Error::BadRequest(
            "CSV file is empty or has no data rows.".to_string(),
        ));
    }

    let header: Vec<String> = split_row(rows[0].trim_start_matches('\u{feff}'));
    let columns = locate_columns(&header)?;
    let known: HashSet<String> = existing.iter().map(|c| normalize_email(&c.email)).collect();

    let mut triage = CsvTriage::default();
    for (index, row) in rows.iter().skip(1).enumerate() {
        let values = split_row(row);
        if values.len() < REQUIRED_HEADERS.len() {
            continue;
        }
        let cell = |idx: usize| values.get(idx).map(String::as_str).unwrap_or("");

        let name = cell(columns.name);
        let email = cell(columns.email);
        if name.is_empty() || email.is_empty() {
            triage.invalid_rows.push(InvalidRow {
                row: index + 2,
                data: values.clone(),
                reason: "Missing name or email".to_string(),
            });
            continue;
        }

        let candidate = Candidate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: cell(columns.phone).to_string(),
            status: CandidateStatus::Legacy,
            avatar_url: String::new(),
            last_contact: Some(now.date_naive()),
            notes: Vec::new(),
            date_of_birth: None,
            address: String::new(),
            postcode: clean_postcode(cell(columns.postcode)),
            license_points: 0,
            off_road_parking: false,
            referral_source: map_referral_source(cell(columns.referral)),
            cv_filename: None,
            created_at: now,
            hired_at: None,
            key_skills: Vec::new(),
            work_history_summary: None,
            assigned_kit: Vec::new(),
            provider_cost: Vec::new(),
            screening_ratings: None,
        };

        if known.contains(&normalize_email(email)) {
            triage.duplicate_candidates.push(candidate);
        } else {
            triage.new_candidates.push(candidate);
        }
    }

    tracing::debug!(
        new = triage.new_candidates.len(),
        duplicates = triage.duplicate_candidates.len(),
        invalid = triage.invalid_rows.len(),
        "csv triage finished"
    );
    Ok(triage)
}
