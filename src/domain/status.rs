// src/domain/status.rs
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The semantic status of a registration, independent of how it is spelled in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    Pending,
    Confirmed,
    Refused,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized status: {0:?}")]
pub struct UnrecognizedStatus(pub String);

/// Every accepted spelling, matched after trim + lowercase.
/// Both the write path and the read side go through this one table.
const SYNONYMS: &[(&str, CanonicalStatus)] = &[
    ("en_attente", CanonicalStatus::Pending),
    ("pending", CanonicalStatus::Pending),
    ("attente", CanonicalStatus::Pending),
    ("accepte", CanonicalStatus::Confirmed),
    ("confirme", CanonicalStatus::Confirmed),
    ("confirmed", CanonicalStatus::Confirmed),
    ("valide", CanonicalStatus::Confirmed),
    ("refuse", CanonicalStatus::Refused),
    ("canceled", CanonicalStatus::Refused),
    ("annule", CanonicalStatus::Refused),
    ("rejete", CanonicalStatus::Refused),
    ("rejected", CanonicalStatus::Refused),
];

impl CanonicalStatus {
    pub const ALL: [CanonicalStatus; 3] = [
        CanonicalStatus::Pending,
        CanonicalStatus::Confirmed,
        CanonicalStatus::Refused,
    ];

    /// Strict mapping: anything outside the synonym table is an error.
    pub fn normalize(raw: &str) -> Result<Self, UnrecognizedStatus> {
        let key = raw.trim().to_lowercase();
        SYNONYMS
            .iter()
            .find(|(spelling, _)| *spelling == key)
            .map(|(_, status)| *status)
            .ok_or_else(|| UnrecognizedStatus(raw.to_string()))
    }

    /// Read-side mapping: a missing or blank value counts as pending.
    pub fn normalize_for_display(raw: Option<&str>) -> Result<Self, UnrecognizedStatus> {
        match raw.map(str::trim) {
            None | Some("") => Ok(CanonicalStatus::Pending),
            Some(value) => Self::normalize(value),
        }
    }

    /// The spelling written to storage.
    pub fn persisted_value(self) -> &'static str {
        match self {
            CanonicalStatus::Pending => "en_attente",
            CanonicalStatus::Confirmed => "accepte",
            CanonicalStatus::Refused => "refuse",
        }
    }

    pub fn display_label(self) -> &'static str {
        match self {
            CanonicalStatus::Pending => "En attente",
            CanonicalStatus::Confirmed => "Confirmée",
            CanonicalStatus::Refused => "Refusée",
        }
    }

    /// `canceled` stays the class for refused rows; stylesheets and filters key on it.
    pub fn css_class(self) -> &'static str {
        match self {
            CanonicalStatus::Pending => "pending",
            CanonicalStatus::Confirmed => "confirmed",
            CanonicalStatus::Refused => "canceled",
        }
    }

    /// Inverse of `css_class`, used by the dashboard status filter.
    pub fn from_css_class(class: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.css_class() == class.trim())
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

/// Write-path mapping from a submitted status to its persisted spelling.
pub fn persisted_spelling(raw: &str) -> Result<&'static str, UnrecognizedStatus> {
    CanonicalStatus::normalize(raw).map(CanonicalStatus::persisted_value)
}

/// How a stored value is shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub css_class: &'static str,
    pub label: String,
    pub status: Option<CanonicalStatus>,
}

impl StatusBadge {
    /// Unknown spellings keep the `pending` class and show the raw value capitalized.
    pub fn for_raw(raw: Option<&str>) -> Self {
        match CanonicalStatus::normalize_for_display(raw) {
            Ok(status) => Self {
                css_class: status.css_class(),
                label: status.display_label().to_string(),
                status: Some(status),
            },
            Err(UnrecognizedStatus(value)) => Self {
                css_class: CanonicalStatus::Pending.css_class(),
                label: capitalize(value.trim()),
                status: None,
            },
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_synonym_lands_in_its_bucket() {
        for raw in ["en_attente", "pending", "attente"] {
            assert_eq!(CanonicalStatus::normalize(raw), Ok(CanonicalStatus::Pending));
        }
        for raw in ["accepte", "confirme", "confirmed", "valide"] {
            assert_eq!(CanonicalStatus::normalize(raw), Ok(CanonicalStatus::Confirmed));
        }
        for raw in ["refuse", "canceled", "annule", "rejete", "rejected"] {
            assert_eq!(CanonicalStatus::normalize(raw), Ok(CanonicalStatus::Refused));
        }
    }

    #[test]
    fn matching_ignores_case_and_surrounding_space() {
        assert_eq!(
            CanonicalStatus::normalize("  Confirmed \n"),
            Ok(CanonicalStatus::Confirmed)
        );
        assert_eq!(CanonicalStatus::normalize("EN_ATTENTE"), Ok(CanonicalStatus::Pending));
    }

    #[test]
    fn unknown_values_are_rejected_without_fallback() {
        for raw in ["", "nouveau", "accepted", "en attente", "ok"] {
            assert_eq!(
                CanonicalStatus::normalize(raw),
                Err(UnrecognizedStatus(raw.to_string()))
            );
        }
    }

    #[test]
    fn display_mapping_treats_missing_as_pending() {
        assert_eq!(
            CanonicalStatus::normalize_for_display(None),
            Ok(CanonicalStatus::Pending)
        );
        assert_eq!(
            CanonicalStatus::normalize_for_display(Some("   ")),
            Ok(CanonicalStatus::Pending)
        );
        assert!(CanonicalStatus::normalize_for_display(Some("archive")).is_err());
    }

    #[test]
    fn labels_and_classes() {
        assert_eq!(CanonicalStatus::Pending.display_label(), "En attente");
        assert_eq!(CanonicalStatus::Confirmed.display_label(), "Confirmée");
        assert_eq!(CanonicalStatus::Refused.display_label(), "Refusée");

        assert_eq!(CanonicalStatus::Refused.css_class(), "canceled");
        assert_eq!(
            CanonicalStatus::from_css_class("canceled"),
            Some(CanonicalStatus::Refused)
        );
        assert_eq!(CanonicalStatus::from_css_class("refused"), None);
    }

    #[test]
    fn write_path_uses_canonical_spellings() {
        assert_eq!(persisted_spelling("confirme"), Ok("accepte"));
        assert_eq!(persisted_spelling("pending"), Ok("en_attente"));
        assert_eq!(persisted_spelling("rejected"), Ok("refuse"));
        assert!(persisted_spelling("bogus").is_err());
    }

    #[test]
    fn badge_for_unknown_value_keeps_raw_text() {
        let badge = StatusBadge::for_raw(Some("archivé"));
        assert_eq!(badge.css_class, "pending");
        assert_eq!(badge.label, "Archivé");
        assert_eq!(badge.status, None);

        let badge = StatusBadge::for_raw(Some("valide"));
        assert_eq!(badge.css_class, "confirmed");
        assert_eq!(badge.label, "Confirmée");
    }
}
