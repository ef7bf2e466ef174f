// src/services/status_update.rs
//
// Administrator status change for one registration: validate, compare with
// the stored value, write + read back inside one transaction, then report
// fresh counts.

use rusqlite::types::Value;
use serde::Serialize;
use thiserror::Error;

use crate::db::store::{in_transaction, quote_ident, DataStore, StoreError};
use crate::domain::stats::StatusCounts;
use crate::domain::status::persisted_spelling;
use crate::domain::SchemaBinding;
use crate::services::dashboard::status_counts;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Données manquantes : ID ou statut non fourni")]
    MissingInput,

    #[error("Statut non autorisé : {0}")]
    UnauthorizedStatus(String),

    #[error("Aucune table d'inscriptions trouvée")]
    NoRegistrationTable,

    #[error("Inscription avec l'ID {0} non trouvée")]
    RecordNotFound(i64),

    #[error("Aucune colonne de statut trouvée dans la table {0}")]
    NoStatusColumn(String),

    #[error("La vérification de la mise à jour a échoué")]
    UpdateVerificationFailed,

    #[error("Erreur de base de données : {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a successful (or already up to date) status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub record_id: i64,
    pub table: String,
    pub column: &'static str,
    pub old_status: String,
    pub new_status: &'static str,
    pub no_change: bool,
    pub stats: StatusCounts,
}

/// Set the status of registration `record_id` to the canonical spelling of
/// `requested`.
///
/// Writes nothing when the input is rejected, the record is missing, or the
/// stored value already equals the target. Otherwise exactly one `UPDATE` is
/// committed, and only after the stored value has been read back and matches.
pub fn update_status<S: DataStore + ?Sized>(
    store: &S,
    binding: &SchemaBinding,
    record_id: i64,
    requested: &str,
) -> Result<StatusUpdate, UpdateError> {
    if record_id <= 0 || requested.trim().is_empty() {
        return Err(UpdateError::MissingInput);
    }

    let target = persisted_spelling(requested)
        .map_err(|_| UpdateError::UnauthorizedStatus(requested.trim().to_string()))?;

    let table = binding
        .registrations
        .as_ref()
        .ok_or(UpdateError::NoRegistrationTable)?;
    let table_sql = quote_ident(&table.name);

    let current = store
        .query(
            &format!("SELECT * FROM {table_sql} WHERE id = ?"),
            &[Value::Integer(record_id)],
        )?
        .into_iter()
        .next()
        .ok_or(UpdateError::RecordNotFound(record_id))?;

    let column = table
        .status_column()
        .map_err(|_| UpdateError::NoStatusColumn(table.name.clone()))?;
    let column_sql = quote_ident(column);

    let old_status = current.text(column).unwrap_or_default();

    if old_status == target {
        tracing::debug!(record_id, status = target, "status already up to date");
        return Ok(StatusUpdate {
            record_id,
            table: table.name.clone(),
            column,
            old_status,
            new_status: target,
            no_change: true,
            stats: status_counts(store, &table.name, column)?,
        });
    }

    in_transaction(store, |tx| -> Result<(), UpdateError> {
        let affected = tx.execute(
            &format!("UPDATE {table_sql} SET {column_sql} = ? WHERE id = ?"),
            &[Value::Text(target.to_string()), Value::Integer(record_id)],
        )?;
        if affected == 0 {
            return Err(UpdateError::UpdateVerificationFailed);
        }

        let stored = tx
            .query(
                &format!("SELECT {column_sql} AS current_status FROM {table_sql} WHERE id = ?"),
                &[Value::Integer(record_id)],
            )?
            .first()
            .and_then(|row| row.text("current_status"));

        if stored.as_deref() != Some(target) {
            return Err(UpdateError::UpdateVerificationFailed);
        }
        Ok(())
    })?;

    let stats = status_counts(store, &table.name, column)?;

    tracing::info!(
        record_id,
        table = %table.name,
        column,
        old_status = %old_status,
        new_status = target,
        "registration status updated"
    );

    Ok(StatusUpdate {
        record_id,
        table: table.name.clone(),
        column,
        old_status,
        new_status: target,
        no_change: false,
        stats,
    })
}
