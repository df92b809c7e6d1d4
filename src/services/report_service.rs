use chrono::{DateTime, Duration, NaiveTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::candidate::{Candidate, CandidateStatus, SYSTEM_AUTHOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl RangePreset {
    fn days(&self) -> Option<i64> {
        match self {
            RangePreset::Week => Some(7),
            RangePreset::Month => Some(30),
            RangePreset::Quarter => Some(90),
            RangePreset::Year => Some(365),
            RangePreset::All => None,
        }
    }
}

/// Inclusive bounds; `None` start means "since the beginning".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map(|start| at >= start).unwrap_or(true) && at <= self.end
    }
}

fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(at) + Duration::days(1) - Duration::milliseconds(1)
}

/// Current period ending today and the equally long period right before it.
pub fn periods(preset: RangePreset, now: DateTime<Utc>) -> (Period, Option<Period>) {
    let end = end_of_day(now);
    let Some(days) = preset.days() else {
        return (Period { start: None, end }, None);
    };

    let start = start_of_day(now) - Duration::days(days);
    let prev_end = end_of_day(start - Duration::days(1));
    let prev_start = start_of_day(prev_end) - Duration::days(days);
    (
        Period {
            start: Some(start),
            end,
        },
        Some(Period {
            start: Some(prev_start),
            end: prev_end,
        }),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodMetrics {
    pub total: usize,
    pub hired: usize,
    pub avg_days_to_hire: f64,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Count {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub preset: RangePreset,
    pub period: Period,
    pub current: PeriodMetrics,
    pub previous: PeriodMetrics,
    /// Percentage change per metric; `None` when the previous value was zero.
    pub hired_change_pct: Option<f64>,
    pub total_change_pct: Option<f64>,
    pub withdrawal_reasons: Vec<Count>,
    pub top_postcode_areas: Vec<Count>,
    pub avg_score_hired: f64,
    pub avg_score_rejected: f64,
    pub status_distribution: Vec<Count>,
}

/// Outward area of a UK postcode, e.g. "SW1A" for "SW1A 1AA".
pub fn postcode_area(postcode: &str) -> String {
    static AREA: OnceLock<Option<Regex>> = OnceLock::new();
    if postcode.is_empty() {
        return "Unknown".to_string();
    }
    AREA.get_or_init(|| Regex::new(r"(?i)^([A-Z]{1,2}[0-9][0-9A-Z]?)").ok())
        .as_ref()
        .and_then(|re| re.captures(postcode))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_else(|| "Other".to_string())
}

/// Reason recorded in the system note written at withdrawal time.
pub fn withdrawal_reason(candidate: &Candidate) -> Option<String> {
    if candidate.status != CandidateStatus::Withdrawn {
        return None;
    }
    let reason = candidate
        .notes
        .iter()
        .find(|n| n.author == SYSTEM_AUTHOR && n.content.contains("Reason:"))
        .and_then(|n| n.content.split_once("Reason: "))
        .map(|(_, rest)| rest.lines().next().unwrap_or("").to_string())
        .filter(|r| !r.is_empty());
    Some(reason.unwrap_or_else(|| "Unknown".to_string()))
}

/// Sum of the four scores, only once the assessment is completed.
pub fn screening_score(candidate: &Candidate) -> Option<u32> {
    candidate
        .screening_ratings
        .filter(|r| r.completed)
        .map(|r| r.total())
}

pub fn in_period<'a>(candidates: &'a [Candidate], period: &Period) -> Vec<&'a Candidate> {
    candidates
        .iter()
        .filter(|c| c.status != CandidateStatus::Legacy && period.contains(c.created_at))
        .collect()
}

fn metrics(candidates: &[&Candidate]) -> PeriodMetrics {
    let hired: Vec<_> = candidates
        .iter()
        .filter(|c| c.status == CandidateStatus::Hired)
        .collect();
    let days_to_hire: Vec<f64> = hired
        .iter()
        .filter_map(|c| c.hired_at.map(|at| (at - c.created_at).num_seconds() as f64 / 86_400.0))
        .collect();

    PeriodMetrics {
        total: candidates.len(),
        hired: hired.len(),
        avg_days_to_hire: if days_to_hire.is_empty() {
            0.0
        } else {
            days_to_hire.iter().sum::<f64>() / days_to_hire.len() as f64
        },
        total_cost: candidates.iter().map(|c| c.total_provider_cost()).sum(),
    }
}

fn change_pct(current: usize, previous: usize) -> Option<f64> {
    (previous > 0).then(|| (current as f64 - previous as f64) / previous as f64 * 100.0)
}

fn ranked(counts: HashMap<String, usize>) -> Vec<Count> {
    let mut out: Vec<Count> = counts
        .into_iter()
        .map(|(label, count)| Count { label, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}

fn average_score(candidates: &[&Candidate], statuses: &[CandidateStatus]) -> f64 {
    let scores: Vec<u32> = candidates
        .iter()
        .filter(|c| statuses.contains(&c.status))
        .filter_map(|c| screening_score(c))
        .collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<u32>() as f64 / scores.len() as f64
    }
}

pub fn build_report(candidates: &[Candidate], preset: RangePreset, now: DateTime<Utc>) -> Report {
    let (period, previous_period) = periods(preset, now);
    let current_set = in_period(candidates, &period);
    let current = metrics(&current_set);
    let previous = previous_period
        .map(|p| metrics(&in_period(candidates, &p)))
        .unwrap_or_default();

    let mut withdrawals = HashMap::new();
    for reason in current_set.iter().filter_map(|c| withdrawal_reason(c)) {
        *withdrawals.entry(reason).or_insert(0) += 1;
    }

    let mut areas = HashMap::new();
    for c in current_set.iter().filter(|c| !c.postcode.is_empty()) {
        *areas.entry(postcode_area(&c.postcode)).or_insert(0) += 1;
    }
    let mut top_postcode_areas = ranked(areas);
    top_postcode_areas.truncate(5);

    let status_distribution = [
        CandidateStatus::New,
        CandidateStatus::Screening,
        CandidateStatus::VideoInterview,
        CandidateStatus::Induction,
        CandidateStatus::Hired,
    ]
    .iter()
    .map(|status| Count {
        label: status.to_string(),
        count: current_set.iter().filter(|c| c.status == *status).count(),
    })
    .collect();

    Report {
        preset,
        period,
        hired_change_pct: change_pct(current.hired, previous.hired),
        total_change_pct: change_pct(current.total, previous.total),
        withdrawal_reasons: ranked(withdrawals),
        top_postcode_areas,
        avg_score_hired: average_score(&current_set, &[CandidateStatus::Hired]),
        avg_score_rejected: average_score(
            &current_set,
            &[CandidateStatus::Rejected, CandidateStatus::Terminated],
        ),
        status_distribution,
        current,
        previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::{Note, ScreeningRatings};
    use crate::models::cost::CostPart;
    use crate::services::fixtures::{candidate, fixed_now};

    fn created(name: &str, status: CandidateStatus, days_ago: i64) -> Candidate {
        let mut c = candidate(name, status);
        c.created_at = fixed_now() - Duration::days(days_ago);
        c
    }

    fn scored(mut c: Candidate, score: u8) -> Candidate {
        c.screening_ratings = Some(ScreeningRatings {
            financial_viability: score,
            logistics_availability: score,
            compliance_tech: score,
            attitude_experience: score,
            completed: true,
        });
        c
    }

    #[test]
    fn previous_period_ends_the_day_before_current_starts() {
        let (current, previous) = periods(RangePreset::Week, fixed_now());
        let previous = previous.unwrap();
        let start = current.start.unwrap();
        assert_eq!(start.date_naive(), (fixed_now() - Duration::days(7)).date_naive());
        assert_eq!(previous.end.date_naive(), (start - Duration::days(1)).date_naive());
        assert!(current.contains(fixed_now()));
        assert!(!previous.contains(fixed_now()));
    }

    #[test]
    fn metrics_skip_legacy_and_out_of_range_candidates() {
        let mut hired = created("Hired", CandidateStatus::Hired, 10);
        hired.hired_at = Some(hired.created_at + Duration::days(4));
        hired.provider_cost.push(CostPart::unpaid("Final Fee", Decimal::new(150, 0)));
        let candidates = vec![
            hired,
            created("Fresh", CandidateStatus::New, 1),
            created("Old", CandidateStatus::New, 200),
            created("Legacy", CandidateStatus::Legacy, 2),
        ];

        let report = build_report(&candidates, RangePreset::Month, fixed_now());

        assert_eq!(report.current.total, 2);
        assert_eq!(report.current.hired, 1);
        assert!((report.current.avg_days_to_hire - 4.0).abs() < 1e-9);
        assert_eq!(report.current.total_cost, Decimal::new(150, 0));
        assert_eq!(report.previous.total, 0);
        assert_eq!(report.total_change_pct, None);
    }

    #[test]
    fn all_time_has_no_previous_period() {
        let candidates = vec![created("Old", CandidateStatus::New, 2000)];
        let report = build_report(&candidates, RangePreset::All, fixed_now());
        assert_eq!(report.current.total, 1);
        assert_eq!(report.previous, PeriodMetrics::default());
    }

    #[test]
    fn withdrawal_reasons_come_from_system_note() {
        let mut a = created("A", CandidateStatus::Withdrawn, 3);
        a.notes.push(Note::system(
            "Candidate withdrew from process. Reason: Took another job",
            fixed_now(),
        ));
        let b = created("B", CandidateStatus::Withdrawn, 3);

        let report = build_report(&[a, b], RangePreset::Month, fixed_now());
        let reasons: Vec<_> = report
            .withdrawal_reasons
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect();
        assert_eq!(reasons, vec![("Took another job", 1), ("Unknown", 1)]);
    }

    #[test]
    fn postcode_areas() {
        assert_eq!(postcode_area("m1 1aa"), "M1");
        assert_eq!(postcode_area("SW1A 1AA"), "SW1A");
        assert_eq!(postcode_area("LS10 4AP"), "LS10");
        assert_eq!(postcode_area("12345"), "Other");
        assert_eq!(postcode_area(""), "Unknown");
    }

    #[test]
    fn top_areas_are_capped_at_five() {
        let candidates: Vec<_> = ["M1", "M2", "M3", "M4", "M5", "M6", "M1"]
            .iter()
            .map(|pc| {
                let mut c = created("X", CandidateStatus::New, 1);
                c.postcode = format!("{} 1AA", pc);
                c
            })
            .collect();
        let report = build_report(&candidates, RangePreset::Week, fixed_now());
        assert_eq!(report.top_postcode_areas.len(), 5);
        assert_eq!(report.top_postcode_areas[0].label, "M1");
        assert_eq!(report.top_postcode_areas[0].count, 2);
    }

    #[test]
    fn screening_averages_split_by_outcome() {
        let candidates = vec![
            scored(created("H1", CandidateStatus::Hired, 1), 5),
            scored(created("H2", CandidateStatus::Hired, 1), 3),
            scored(created("R", CandidateStatus::Rejected, 1), 2),
            scored(created("T", CandidateStatus::Terminated, 1), 1),
            created("Unscored", CandidateStatus::Hired, 1),
        ];
        let report = build_report(&candidates, RangePreset::Week, fixed_now());
        assert!((report.avg_score_hired - 16.0).abs() < 1e-9);
        assert!((report.avg_score_rejected - 6.0).abs() < 1e-9);
        let hired = report
            .status_distribution
            .iter()
            .find(|c| c.label == "Hired")
            .unwrap();
        assert_eq!(hired.count, 3);
    }
}
