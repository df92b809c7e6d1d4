use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::cost::CostPart;
use crate::models::kit::AssignedKitItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    New,
    Screening,
    VideoInterview,
    Induction,
    Hired,
    Rejected,
    Legacy,
    Terminated,
    Withdrawn,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 9] = [
        CandidateStatus::New,
        CandidateStatus::Screening,
        CandidateStatus::VideoInterview,
        CandidateStatus::Induction,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
        CandidateStatus::Legacy,
        CandidateStatus::Terminated,
        CandidateStatus::Withdrawn,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CandidateStatus::New => "New",
            CandidateStatus::Screening => "Screening",
            CandidateStatus::VideoInterview => "Video Interview",
            CandidateStatus::Induction => "Induction",
            CandidateStatus::Hired => "Hired",
            CandidateStatus::Rejected => "Rejected",
            CandidateStatus::Legacy => "Legacy",
            CandidateStatus::Terminated => "Terminated",
            CandidateStatus::Withdrawn => "Withdrawn",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralSourceType {
    Website,
    Tpj,
    Stpj,
    Referral,
    ColdCall,
    Other,
}

impl fmt::Display for ReferralSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReferralSourceType::Website => "Website",
            ReferralSourceType::Tpj => "TPJ",
            ReferralSourceType::Stpj => "STPJ",
            ReferralSourceType::Referral => "Referral",
            ReferralSourceType::ColdCall => "Cold Call",
            ReferralSourceType::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralSource {
    #[serde(rename = "type")]
    pub source_type: ReferralSourceType,
    pub detail: Option<String>,
}

/// Reason collected before a candidate may be moved to `Terminated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    RejectionOfWork,
    FailedBackgroundCheck,
    NoShow,
    PoorPerformance,
    VoluntaryResignation,
    TookAnotherJob,
    Other(String),
}

impl TerminationReason {
    /// `Other` with blank text counts as no reason at all.
    pub fn is_blank(&self) -> bool {
        matches!(self, TerminationReason::Other(text) if text.trim().is_empty())
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::RejectionOfWork => f.write_str("Rejection of work"),
            TerminationReason::FailedBackgroundCheck => f.write_str("Failed background check"),
            TerminationReason::NoShow => f.write_str("No-show for assignment"),
            TerminationReason::PoorPerformance => f.write_str("Poor performance"),
            TerminationReason::VoluntaryResignation => f.write_str("Voluntary resignation"),
            TerminationReason::TookAnotherJob => f.write_str("Took another job"),
            TerminationReason::Other(text) => f.write_str(text.trim()),
        }
    }
}

/// Reason collected before a candidate may be moved to `Withdrawn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalReason {
    TookAnotherJob,
    NoLongerInterested,
    Unresponsive,
    Other(String),
}

impl WithdrawalReason {
    pub fn is_blank(&self) -> bool {
        matches!(self, WithdrawalReason::Other(text) if text.trim().is_empty())
    }
}

impl fmt::Display for WithdrawalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawalReason::TookAnotherJob => f.write_str("Took another job"),
            WithdrawalReason::NoLongerInterested => f.write_str("No longer interested"),
            WithdrawalReason::Unresponsive => f.write_str("Unresponsive"),
            WithdrawalReason::Other(text) => f.write_str(text.trim()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub date: DateTime<Utc>,
    pub author: String,
}

pub const SYSTEM_AUTHOR: &str = "System";

impl Note {
    pub fn new(content: impl Into<String>, author: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            date,
            author: author.into(),
        }
    }

    pub fn system(content: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::new(content, SYSTEM_AUTHOR, date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningRatings {
    pub financial_viability: u8,
    pub logistics_availability: u8,
    pub compliance_tech: u8,
    pub attitude_experience: u8,
    #[serde(default)]
    pub completed: bool,
}

impl ScreeningRatings {
    pub fn total(&self) -> u32 {
        [
            self.financial_viability,
            self.logistics_availability,
            self.compliance_tech,
            self.attitude_experience,
        ]
        .iter()
        .map(|score| *score as u32)
        .sum()
    }

    pub fn all_in_range(&self) -> bool {
        [
            self.financial_viability,
            self.logistics_availability,
            self.compliance_tech,
            self.attitude_experience,
        ]
        .iter()
        .all(|score| (1..=5).contains(score))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: CandidateStatus,
    #[serde(default)]
    pub avatar_url: String,
    pub last_contact: Option<NaiveDate>,
    /// Newest first.
    #[serde(default)]
    pub notes: Vec<Note>,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub license_points: u8,
    #[serde(default)]
    pub off_road_parking: bool,
    pub referral_source: Option<ReferralSource>,
    pub cv_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub hired_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub key_skills: Vec<String>,
    pub work_history_summary: Option<String>,
    #[serde(default)]
    pub assigned_kit: Vec<AssignedKitItem>,
    #[serde(default)]
    pub provider_cost: Vec<CostPart>,
    pub screening_ratings: Option<ScreeningRatings>,
}

impl Candidate {
    pub fn is_tpj_referral(&self) -> bool {
        self.referral_source
            .as_ref()
            .map(|source| source.source_type == ReferralSourceType::Tpj)
            .unwrap_or(false)
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.insert(0, note);
    }

    pub fn total_provider_cost(&self) -> rust_decimal::Decimal {
        self.provider_cost.iter().map(|cost| cost.amount).sum()
    }
}
