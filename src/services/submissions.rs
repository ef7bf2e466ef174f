// src/services/submissions.rs
use chrono::NaiveDateTime;
use rusqlite::types::Value;

use crate::db::store::{in_transaction, DataStore, StoreError};
use crate::domain::dates::to_db_timestamp;
use crate::domain::forms::{ContactForm, Guardian, RegistrationForm};
use crate::domain::CanonicalStatus;

/// Status given to a freshly received contact message.
pub const NEW_CONTACT_STATUS: &str = "nouveau";

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn opt_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}

fn insert_guardian<S: DataStore + ?Sized>(
    store: &S,
    child_id: i64,
    guardian: &Guardian,
    kind: &str,
    created_at: &str,
) -> Result<(), StoreError> {
    store.execute(
        "INSERT INTO parents (enfant_id, nom, prenom, email, telephone, profession, type_parent, date_creation)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        &[
            Value::Integer(child_id),
            text(&guardian.last_name),
            text(&guardian.first_name),
            opt_text(guardian.email.as_deref()),
            opt_text(guardian.phone.as_deref()),
            opt_text(guardian.profession.as_deref()),
            text(kind),
            text(created_at),
        ],
    )?;
    Ok(())
}

/// Store a registration: the child, one or two guardians and the address,
/// all or nothing. Returns the new registration id.
pub fn submit_registration<S: DataStore + ?Sized>(
    store: &S,
    form: &RegistrationForm,
    now: NaiveDateTime,
) -> Result<i64, StoreError> {
    let created_at = to_db_timestamp(now);

    let child_id = in_transaction(store, |tx| -> Result<i64, StoreError> {
        tx.execute(
            "INSERT INTO enfants (nom, prenom, date_naissance, lieu_naissance, sexe, classe,
                                  ancienne_ecole, besoins_particuliers, statut, date_inscription)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            &[
                text(&form.child_last_name),
                text(&form.child_first_name),
                text(&form.birth_date.format("%Y-%m-%d").to_string()),
                text(&form.birth_place),
                text(form.sex.as_str()),
                text(&form.class_name),
                opt_text(form.previous_school.as_deref()),
                opt_text(form.special_needs.as_deref()),
                text(CanonicalStatus::Pending.persisted_value()),
                text(&created_at),
            ],
        )?;
        let child_id = tx.last_insert_id();

        insert_guardian(tx, child_id, &form.parent1, "parent1", &created_at)?;
        if let Some(parent2) = &form.parent2 {
            insert_guardian(tx, child_id, parent2, "parent2", &created_at)?;
        }

        tx.execute(
            "INSERT INTO adresses (enfant_id, adresse_complete, date_creation) VALUES (?, ?, ?)",
            &[Value::Integer(child_id), text(&form.address), text(&created_at)],
        )?;

        Ok(child_id)
    })?;

    tracing::info!(
        registration_id = child_id,
        with_second_parent = form.parent2.is_some(),
        "registration stored"
    );
    Ok(child_id)
}

/// Store a contact message with status `nouveau`. Returns its id.
pub fn submit_contact<S: DataStore + ?Sized>(
    store: &S,
    form: &ContactForm,
    now: NaiveDateTime,
) -> Result<i64, StoreError> {
    store.execute(
        "INSERT INTO contacts (nom, email, telephone, sujet, message, date_creation, statut)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        &[
            text(&form.name),
            text(&form.email),
            opt_text(form.phone.as_deref()),
            text(&form.subject),
            text(&form.message),
            text(&to_db_timestamp(now)),
            text(NEW_CONTACT_STATUS),
        ],
    )?;
    let id = store.last_insert_id();

    tracing::info!(contact_id = id, "contact message stored");
    Ok(id)
}
