// src/domain/dates.rs
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Timestamp layout used for every date column this app writes.
pub const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn to_db_timestamp(at: NaiveDateTime) -> String {
    at.format(DB_TIMESTAMP_FORMAT).to_string()
}

/// Accepts the layouts found in legacy rows: full timestamps (space or `T`
/// separated, optional fraction) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .or_else(|| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// `dd/mm/YYYY à HH:MM`; blank input reads "Non renseignée" and
/// unparseable input is shown as-is.
pub fn format_for_display(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        None | Some("") => "Non renseignée".to_string(),
        Some(value) => match parse_timestamp(value) {
            Some(at) => at.format("%d/%m/%Y à %H:%M").to_string(),
            None => value.to_string(),
        },
    }
}

/// Dashboard period filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Week,
    Month,
}

impl Period {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "today" => Some(Period::Today),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    /// Earliest timestamp inside the period, counted from midnight today.
    pub fn cutoff(self, now: NaiveDateTime) -> NaiveDateTime {
        let midnight = now.date().and_time(chrono::NaiveTime::MIN);
        match self {
            Period::Today => midnight,
            Period::Week => midnight - Duration::days(7),
            Period::Month => midnight - Duration::days(30),
        }
    }
}
