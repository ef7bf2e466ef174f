// src/handlers/public.rs
use astra::Request;
use serde_json::json;

use crate::domain::forms::{ContactForm, RegistrationForm};
use crate::errors::ResultResp;
use crate::handlers::{now, read_form};
use crate::responses::json_response;
use crate::router::App;
use crate::services::submissions;

pub fn submit_registration(req: &mut Request, app: &App) -> ResultResp {
    let fields = read_form(req)?;
    let now = now();

    let form = match RegistrationForm::from_fields(&fields, now.date()) {
        Ok(form) => form,
        Err(errors) => {
            tracing::debug!(errors = %errors, "registration rejected");
            return json_response(
                400,
                &json!({
                    "success": false,
                    "message": "Données invalides",
                    "errors": errors.0,
                }),
            );
        }
    };

    match app
        .db
        .with_store(|store| submissions::submit_registration(store, &form, now))
    {
        Ok(id) => json_response(
            200,
            &json!({
                "success": true,
                "message": "Inscription enregistrée avec succès",
                "data": {
                    "inscription_id": id,
                    "enfant": form.child_display_name(),
                },
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "registration insert failed");
            json_response(
                500,
                &json!({
                    "success": false,
                    "message": "Une erreur est survenue lors de l'enregistrement",
                }),
            )
        }
    }
}

pub fn submit_contact(req: &mut Request, app: &App) -> ResultResp {
    let fields = read_form(req)?;

    let form = match ContactForm::from_fields(&fields) {
        Ok(form) => form,
        Err(errors) => {
            tracing::debug!(errors = %errors, "contact message rejected");
            return json_response(
                400,
                &json!({ "success": false, "message": errors.to_string() }),
            );
        }
    };

    match app
        .db
        .with_store(|store| submissions::submit_contact(store, &form, now()))
    {
        Ok(id) => json_response(
            200,
            &json!({
                "success": true,
                "message": "Message envoyé avec succès !",
                "data": { "contact_id": id },
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "contact insert failed");
            json_response(
                500,
                &json!({
                    "success": false,
                    "message": "Erreur lors de l'envoi du message",
                }),
            )
        }
    }
}
