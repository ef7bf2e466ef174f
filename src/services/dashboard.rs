// src/services/dashboard.rs
use chrono::{Duration, NaiveDateTime};
use rusqlite::types::Value;

use crate::db::store::{quote_ident, DataStore, Row, StoreError};
use crate::domain::dates::{parse_timestamp, to_db_timestamp, Period};
use crate::domain::schema::{
    TableBinding, CONTACT_BODY_COLUMNS, CONTACT_DATE_COLUMNS, REGISTRATION_DATE_COLUMNS,
};
use crate::domain::stats::{aggregate, DashboardStats, StatusCounts};
use crate::domain::{CanonicalStatus, SchemaBinding, StatusBadge};

const EXCERPT_CHARS: usize = 100;

/// Registration tables whose rows are the children themselves.
const CHILD_REGISTRATION_TABLES: &[&str] = &["enfants", "eleves"];

const PARENT_REF_COLUMNS: &[&str] = &["parent_id", "parent1_id", "id_parent", "pere_id", "mother_id"];
const CHILD_REF_COLUMNS: &[&str] = &["enfant_id", "child_id", "id_enfant"];

const PARENT_FIELDS: &[(&str, &str)] = &[
    ("nom", "parent_nom"),
    ("prenom", "parent_prenom"),
    ("email", "parent_email"),
    ("telephone", "parent_telephone"),
];
const CHILD_FIELDS: &[(&str, &str)] = &[
    ("nom", "enfant_nom"),
    ("prenom", "enfant_prenom"),
    ("classe", "classe_enfant"),
];

/// Histogram of the status column folded into canonical buckets.
pub fn status_counts<S: DataStore + ?Sized>(
    store: &S,
    table: &str,
    column: &str,
) -> Result<StatusCounts, StoreError> {
    let sql = format!(
        "SELECT {col} AS raw_status, COUNT(*) AS n FROM {table} GROUP BY {col}",
        col = quote_ident(column),
        table = quote_ident(table),
    );
    let rows = store.query(&sql, &[])?;

    let histogram: Vec<(Option<String>, i64)> = rows
        .iter()
        .map(|r| (r.text("raw_status"), r.integer("n").unwrap_or(0)))
        .collect();

    let counts = aggregate(histogram.iter().map(|(raw, n)| (raw.as_deref(), *n)));
    if counts.unmatched > 0 {
        tracing::warn!(
            table,
            column,
            unmatched = counts.unmatched,
            "rows with an unrecognized status are not counted in any bucket"
        );
    }
    Ok(counts)
}

fn count_rows<S: DataStore + ?Sized>(store: &S, table: &str) -> Result<i64, StoreError> {
    let sql = format!("SELECT COUNT(*) AS n FROM {}", quote_ident(table));
    Ok(store
        .query(&sql, &[])?
        .first()
        .and_then(Row::first_integer)
        .unwrap_or(0))
}

fn count_since<S: DataStore + ?Sized>(
    store: &S,
    table: &str,
    date_column: &str,
    since: NaiveDateTime,
) -> Result<i64, StoreError> {
    let sql = format!(
        "SELECT COUNT(*) AS n FROM {} WHERE {} >= ?",
        quote_ident(table),
        quote_ident(date_column),
    );
    Ok(store
        .query(&sql, &[Value::Text(to_db_timestamp(since))])?
        .first()
        .and_then(Row::first_integer)
        .unwrap_or(0))
}

/// Totals, status buckets and "new in the last `new_window_days`" counts.
/// A table the binding did not find contributes zeros.
pub fn dashboard_stats<S: DataStore + ?Sized>(
    store: &S,
    binding: &SchemaBinding,
    now: NaiveDateTime,
    new_window_days: i64,
) -> Result<DashboardStats, StoreError> {
    let mut stats = DashboardStats::default();
    // An out-of-range window counts everything.
    let since = Duration::try_days(new_window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(NaiveDateTime::MIN);

    if let Some(reg) = &binding.registrations {
        stats.total_inscriptions = count_rows(store, &reg.name)?;
        if let Ok(column) = reg.status_column() {
            stats.statuses = status_counts(store, &reg.name, column)?;
        }
        if let Some(date_col) = reg.column(REGISTRATION_DATE_COLUMNS) {
            stats.nouvelles_inscriptions = count_since(store, &reg.name, date_col, since)?;
        }
    }

    if let Some(contacts) = &binding.contacts {
        stats.total_contacts = count_rows(store, &contacts.name)?;
        if let Some(date_col) = contacts.column(CONTACT_DATE_COLUMNS) {
            stats.nouveaux_messages = count_since(store, &contacts.name, date_col, since)?;
        }
    }

    Ok(stats)
}

/// One line of the registrations table on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSummary {
    pub id: i64,
    pub parent_name: Option<String>,
    pub child_name: Option<String>,
    pub class_name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<String>,
    pub raw_status: Option<String>,
    pub badge: StatusBadge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSummary {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub excerpt: Option<String>,
    pub truncated: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    pub status: Option<CanonicalStatus>,
    pub period: Option<Period>,
}

impl RegistrationFilter {
    pub fn is_active(&self) -> bool {
        self.status.is_some() || self.period.is_some()
    }

    /// Status matches on the badge class, so unknown spellings count as pending.
    /// Rows without a readable date are kept by the period filter.
    pub fn matches(&self, row: &RegistrationSummary, now: NaiveDateTime) -> bool {
        if let Some(status) = self.status {
            if row.badge.css_class != status.css_class() {
                return false;
            }
        }
        if let Some(period) = self.period {
            if let Some(at) = row.created_at.as_deref().and_then(parse_timestamp) {
                if at < period.cutoff(now) {
                    return false;
                }
            }
        }
        true
    }
}

/// First non-blank value among `candidates`, looked up in each row in turn.
fn first_field(rows: &[&Row], candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|name| {
        rows.iter()
            .find_map(|row| row.text(name))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

fn join_names(last: Option<String>, first: Option<String>) -> Option<String> {
    match (last, first) {
        (None, None) => None,
        (last, first) => Some(
            [last, first]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
        ),
    }
}

fn order_clause(table: &TableBinding, date_column: Option<&str>) -> String {
    match date_column {
        Some(col) => format!(" ORDER BY {} DESC", quote_ident(col)),
        None if table.has_column("id") => " ORDER BY \"id\" DESC".to_string(),
        None => String::new(),
    }
}

/// `SELECT col AS alias, ...` over the columns `table` actually has.
/// `None` when it has none of them.
fn aliased_select(table: &TableBinding, fields: &[(&str, &str)]) -> Option<String> {
    let parts: Vec<String> = fields
        .iter()
        .filter(|(column, _)| table.has_column(column))
        .map(|(column, alias)| format!("{} AS {alias}", quote_ident(column)))
        .collect();
    (!parts.is_empty()).then(|| {
        format!(
            "SELECT {} FROM {}",
            parts.join(", "),
            quote_ident(&table.name)
        )
    })
}

/// Row of `table` whose `key_column` equals `key`, lowest id first.
fn related_row<S: DataStore + ?Sized>(
    store: &S,
    table: &TableBinding,
    fields: &[(&str, &str)],
    key_column: &str,
    key: i64,
) -> Result<Option<Row>, StoreError> {
    if !table.has_column(key_column) {
        return Ok(None);
    }
    let Some(select) = aliased_select(table, fields) else {
        return Ok(None);
    };
    let order = if table.has_column("id") { " ORDER BY \"id\"" } else { "" };
    let sql = format!("{select} WHERE {} = ?{order} LIMIT 1", quote_ident(key_column));
    Ok(store.query(&sql, &[Value::Integer(key)])?.into_iter().next())
}

/// The registration's guardian: through a parent reference column, or, when
/// the registration row is the child itself, through `parents.enfant_id`.
fn parent_row<S: DataStore + ?Sized>(
    store: &S,
    binding: &SchemaBinding,
    reg: &TableBinding,
    record: &Row,
) -> Result<Option<Row>, StoreError> {
    let Some(parents) = &binding.parents else {
        return Ok(None);
    };

    if let Some(ref_col) = PARENT_REF_COLUMNS.iter().find(|c| reg.has_column(c)) {
        return match record.integer(ref_col) {
            Some(parent_id) => related_row(store, parents, PARENT_FIELDS, "id", parent_id),
            None => Ok(None),
        };
    }

    if CHILD_REGISTRATION_TABLES.contains(&reg.name.as_str()) {
        if let Some(id) = record.integer("id") {
            return related_row(store, parents, PARENT_FIELDS, "enfant_id", id);
        }
    }

    Ok(None)
}

/// The child a registration points to through `enfant_id` and friends.
fn child_row<S: DataStore + ?Sized>(
    store: &S,
    binding: &SchemaBinding,
    reg: &TableBinding,
    record: &Row,
) -> Result<Option<Row>, StoreError> {
    let Some(children) = &binding.children else {
        return Ok(None);
    };
    if children.name == reg.name {
        return Ok(None);
    }
    let Some(child_id) = CHILD_REF_COLUMNS
        .iter()
        .find(|c| reg.has_column(c))
        .and_then(|c| record.integer(c))
    else {
        return Ok(None);
    };
    related_row(store, children, CHILD_FIELDS, "id", child_id)
}

/// Newest registrations first, at most `limit`, then filtered.
pub fn recent_registrations<S: DataStore + ?Sized>(
    store: &S,
    binding: &SchemaBinding,
    limit: usize,
    filter: RegistrationFilter,
    now: NaiveDateTime,
) -> Result<Vec<RegistrationSummary>, StoreError> {
    let Some(reg) = &binding.registrations else {
        return Ok(Vec::new());
    };

    let date_column = reg.column(REGISTRATION_DATE_COLUMNS);
    let sql = format!(
        "SELECT * FROM {}{} LIMIT ?",
        quote_ident(&reg.name),
        order_clause(reg, date_column)
    );
    let rows = store.query(&sql, &[Value::Integer(limit as i64)])?;

    let is_child_table = CHILD_REGISTRATION_TABLES.contains(&reg.name.as_str());
    let (parent_last, parent_first, child_last, child_first): (&[&str], &[&str], &[&str], &[&str]) =
        if is_child_table {
            (
                &["parent_nom", "nom_pere", "nom_parent"],
                &["parent_prenom", "prenom_pere", "prenom_parent"],
                &["enfant_nom", "nom_enfant", "nom"],
                &["enfant_prenom", "prenom_enfant", "prenom"],
            )
        } else {
            (
                &["parent_nom", "parent1_nom", "nom_pere", "nom_parent", "nom"],
                &["parent_prenom", "parent1_prenom", "prenom_pere", "prenom_parent", "prenom"],
                &["enfant_nom", "nom_enfant"],
                &["enfant_prenom", "prenom_enfant"],
            )
        };
    let status_column = reg.status_column().ok();

    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(id) = row.integer("id") else {
            continue;
        };
        let child = child_row(store, binding, reg, row)?;
        let parent = parent_row(store, binding, reg, row)?;
        let sources: Vec<&Row> = std::iter::once(row)
            .chain(child.as_ref())
            .chain(parent.as_ref())
            .collect();

        let raw_status = status_column.and_then(|c| row.text(c));
        let summary = RegistrationSummary {
            id,
            parent_name: join_names(
                first_field(&sources, parent_last),
                first_field(&sources, parent_first),
            ),
            child_name: join_names(
                first_field(&sources, child_last),
                first_field(&sources, child_first),
            ),
            class_name: first_field(&sources, &["classe", "classe_enfant"]),
            email: first_field(
                &sources,
                &["parent_email", "parent1_email", "email_pere", "email_parent", "email"],
            ),
            created_at: date_column.and_then(|c| first_field(&sources, &[c])),
            badge: StatusBadge::for_raw(raw_status.as_deref()),
            raw_status,
        };

        if filter.matches(&summary, now) {
            out.push(summary);
        }
    }
    Ok(out)
}

/// Newest contact messages first, with a short excerpt of the body.
pub fn recent_contacts<S: DataStore + ?Sized>(
    store: &S,
    binding: &SchemaBinding,
    limit: usize,
) -> Result<Vec<ContactSummary>, StoreError> {
    let Some(contacts) = &binding.contacts else {
        return Ok(Vec::new());
    };

    let date_column = contacts.column(CONTACT_DATE_COLUMNS);
    let sql = format!(
        "SELECT * FROM {}{} LIMIT ?",
        quote_ident(&contacts.name),
        order_clause(contacts, date_column)
    );
    let rows = store.query(&sql, &[Value::Integer(limit as i64)])?;

    let body_column = contacts.column(CONTACT_BODY_COLUMNS);
    Ok(rows
        .iter()
        .filter_map(|row| {
            let id = row.integer("id")?;
            let body = body_column.and_then(|c| first_field(&[row], &[c]));
            let truncated = body
                .as_ref()
                .is_some_and(|b| b.chars().count() > EXCERPT_CHARS);
            Some(ContactSummary {
                id,
                name: first_field(&[row], &["nom", "name"]),
                email: first_field(&[row], &["email"]),
                subject: first_field(&[row], &["sujet", "subject"]),
                excerpt: body.map(|b| b.chars().take(EXCERPT_CHARS).collect()),
                truncated,
                created_at: date_column.and_then(|c| first_field(&[row], &[c])),
            })
        })
        .collect())
}
