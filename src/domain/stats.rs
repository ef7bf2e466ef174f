// src/domain/stats.rs
use serde::Serialize;

use crate::domain::status::CanonicalStatus;

/// Registration counts per canonical status.
///
/// `unmatched` holds rows whose stored status is not a known spelling. Those
/// rows are left out of the three buckets, so
/// `pending + confirmed + refused` can be lower than the table's row count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "en_attente")]
    pub pending: i64,
    #[serde(rename = "confirmees")]
    pub confirmed: i64,
    #[serde(rename = "refusees")]
    pub refused: i64,
    pub unmatched: i64,
}

impl StatusCounts {
    pub fn get(&self, status: CanonicalStatus) -> i64 {
        match status {
            CanonicalStatus::Pending => self.pending,
            CanonicalStatus::Confirmed => self.confirmed,
            CanonicalStatus::Refused => self.refused,
        }
    }

    fn add(&mut self, raw: Option<&str>, count: i64) {
        match raw.map(CanonicalStatus::normalize) {
            Some(Ok(CanonicalStatus::Pending)) => self.pending += count,
            Some(Ok(CanonicalStatus::Confirmed)) => self.confirmed += count,
            Some(Ok(CanonicalStatus::Refused)) => self.refused += count,
            Some(Err(_)) | None => self.unmatched += count,
        }
    }
}

/// Fold a `(raw status, row count)` histogram into the canonical buckets.
/// A NULL status (`None`) counts as unmatched.
pub fn aggregate<'a, I>(histogram: I) -> StatusCounts
where
    I: IntoIterator<Item = (Option<&'a str>, i64)>,
{
    let mut counts = StatusCounts::default();
    for (raw, count) in histogram {
        counts.add(raw, count);
    }
    counts
}

/// Numbers shown on the dashboard cards and returned by the stats endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_inscriptions: i64,
    pub total_contacts: i64,
    #[serde(flatten)]
    pub statuses: StatusCounts,
    pub nouvelles_inscriptions: i64,
    pub nouveaux_messages: i64,
}
