use chrono::{DateTime, Duration, Months, NaiveDate, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Calendar date `days` after `from`, as used for task due dates.
pub fn due_in_days(from: DateTime<Utc>, days: i64) -> NaiveDate {
    (from + Duration::days(days)).date_naive()
}

/// Same day-of-month `months` later, clamped to the end of shorter months.
pub fn add_months(from: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    from.checked_add_months(Months::new(months)).unwrap_or(from)
}

/// `dd/mm/yyyy`, the format every user-facing date is written in.
pub fn uk_date(dt: DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y").to_string()
}

pub fn uk_date_time(dt: DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y %H:%M").to_string()
}
