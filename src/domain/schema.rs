// src/domain/schema.rs
//
// Deployments of the site do not agree on table or column names, so the
// services work against logical names resolved here at the start of each
// operation.

use serde::Serialize;
use thiserror::Error;

use crate::db::store::{DataStore, StoreError};

pub const REGISTRATION_TABLES: &[&str] = &[
    "inscriptions",
    "inscription",
    "enfants",
    "registrations",
    "eleves",
];
pub const CONTACT_TABLES: &[&str] = &["contacts", "contact", "messages", "formulaire_contact"];
pub const PARENT_TABLES: &[&str] = &["parents", "parent", "tuteurs"];
/// Where child details live when registrations only reference them.
pub const CHILD_TABLES: &[&str] = &["enfants"];

pub const STATUS_COLUMNS: &[(&str, &str)] = &[
    ("statut", "statut"),
    ("status", "status"),
    ("etat", "etat"),
];
pub const REGISTRATION_DATE_COLUMNS: &[(&str, &str)] = &[
    ("date_inscription", "date_inscription"),
    ("created_at", "created_at"),
];
pub const CONTACT_DATE_COLUMNS: &[(&str, &str)] = &[
    ("date_creation", "date_creation"),
    ("created_at", "created_at"),
];
pub const CONTACT_BODY_COLUMNS: &[(&str, &str)] = &[("message", "message"), ("contenu", "contenu")];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("no matching table among {0:?}")]
    NoMatchingTable(Vec<String>),

    #[error("no matching column among {0:?}")]
    NoMatchingColumn(Vec<String>),
}

/// First candidate, in priority order, that exists in `available`.
pub fn locate_table<'a, S: AsRef<str>>(
    candidates: &[&'a str],
    available: &[S],
) -> Result<&'a str, SchemaError> {
    candidates
        .iter()
        .copied()
        .find(|candidate| available.iter().any(|t| t.as_ref() == *candidate))
        .ok_or_else(|| SchemaError::NoMatchingTable(to_owned(candidates.iter().copied())))
}

/// Walks `(column, use_as)` pairs in order and returns `use_as` for the first
/// column present in `available`.
pub fn locate_column<'a, S: AsRef<str>>(
    preferences: &[(&str, &'a str)],
    available: &[S],
) -> Result<&'a str, SchemaError> {
    preferences
        .iter()
        .find(|(column, _)| available.iter().any(|c| c.as_ref() == *column))
        .map(|(_, use_as)| *use_as)
        .ok_or_else(|| {
            SchemaError::NoMatchingColumn(to_owned(preferences.iter().map(|(c, _)| *c)))
        })
}

fn to_owned<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names.map(String::from).collect()
}

/// A resolved table and the columns it had when the binding was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBinding {
    pub name: String,
    pub columns: Vec<String>,
}

impl TableBinding {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn status_column(&self) -> Result<&'static str, SchemaError> {
        locate_column(STATUS_COLUMNS, &self.columns)
    }

    pub fn column(&self, preferences: &[(&str, &'static str)]) -> Option<&'static str> {
        locate_column(preferences, &self.columns).ok()
    }
}

/// Logical table/column names mapped onto what this database actually has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaBinding {
    pub tables: Vec<String>,
    pub registrations: Option<TableBinding>,
    pub contacts: Option<TableBinding>,
    pub parents: Option<TableBinding>,
    pub children: Option<TableBinding>,
}

impl SchemaBinding {
    pub fn resolve<S: DataStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let tables = store.list_tables()?;

        let bind = |candidates: &[&str]| -> Result<Option<TableBinding>, StoreError> {
            match locate_table(candidates, &tables) {
                Ok(name) => Ok(Some(TableBinding {
                    name: name.to_string(),
                    columns: store.list_columns(name)?,
                })),
                Err(_) => Ok(None),
            }
        };

        let registrations = bind(REGISTRATION_TABLES)?;
        let contacts = bind(CONTACT_TABLES)?;
        let parents = bind(PARENT_TABLES)?;
        let children = bind(CHILD_TABLES)?;

        tracing::debug!(
            registrations = registrations.as_ref().map(|t| t.name.as_str()),
            contacts = contacts.as_ref().map(|t| t.name.as_str()),
            parents = parents.as_ref().map(|t| t.name.as_str()),
            "schema binding resolved"
        );

        Ok(Self {
            tables,
            registrations,
            contacts,
            parents,
            children,
        })
    }
}
