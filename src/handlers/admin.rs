// src/handlers/admin.rs
use astra::Request;
use serde::Serialize;
use serde_json::json;

use crate::db::StoreError;
use crate::domain::dates::Period;
use crate::domain::{CanonicalStatus, DashboardStats, SchemaBinding};
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{now, parse_query, read_form};
use crate::responses::{html_response, json_response, redirect};
use crate::router::App;
use crate::services::dashboard::{
    dashboard_stats, recent_contacts, recent_registrations, RegistrationFilter,
};
use crate::services::status_update::{update_status, StatusUpdate, UpdateError};
use crate::templates::pages::{admin_page, AdminVm};

/// `GET /admin`
pub fn dashboard(req: &Request, app: &App) -> ResultResp {
    let query = parse_query(req);
    let filter = RegistrationFilter {
        status: query
            .get("statut")
            .and_then(|v| CanonicalStatus::from_css_class(v)),
        period: query.get("periode").and_then(|v| Period::parse(v)),
    };
    let debug = query.contains_key("debug");
    let limits = app.dashboard;
    let now = now();

    let vm = app.db.with_store(|store| -> Result<AdminVm, StoreError> {
        let binding = SchemaBinding::resolve(store)?;
        Ok(AdminVm {
            stats: dashboard_stats(store, &binding, now, limits.new_window_days)?,
            registrations: recent_registrations(
                store,
                &binding,
                limits.registrations_limit,
                filter,
                now,
            )?,
            contacts: recent_contacts(store, &binding, limits.contacts_limit)?,
            filter,
            debug: debug.then_some(binding),
        })
    })?;

    html_response(admin_page(&vm))
}

/// `GET /admin/stats`
pub fn stats(app: &App) -> ResultResp {
    let window = app.dashboard.new_window_days;
    let stats = app.db.with_store(|store| -> Result<DashboardStats, StoreError> {
        let binding = SchemaBinding::resolve(store)?;
        dashboard_stats(store, &binding, now(), window)
    })?;

    json_response(200, &stats)
}

#[derive(Serialize)]
struct ActionResponse<'a> {
    success: bool,
    message: String,
    #[serde(flatten)]
    update: Option<&'a StatusUpdate>,
}

/// `POST /admin`: dashboard actions. Only `update_status` exists.
pub fn action(req: &mut Request, app: &App) -> ResultResp {
    let fields = read_form(req)?;

    if fields.get("action").map(String::as_str) != Some("update_status") {
        return json_response(
            200,
            &json!({ "success": false, "message": "Action non reconnue" }),
        );
    }

    // A missing or malformed id is reported like a missing one.
    let record_id = fields
        .get("id")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0);
    let requested = fields.get("status").map(String::as_str).unwrap_or("");
    let wants_redirect = fields.get("redirect").is_some_and(|v| v == "1");

    let outcome = app.db.with_store(|store| -> Result<StatusUpdate, UpdateError> {
        let binding = SchemaBinding::resolve(store)?;
        update_status(store, &binding, record_id, requested)
    });

    match &outcome {
        Err(UpdateError::Store(e)) => {
            tracing::error!(record_id, error = %e, "status update failed")
        }
        Err(e) => tracing::warn!(record_id, requested, error = %e, "status update rejected"),
        Ok(_) => {}
    }

    if wants_redirect {
        return match outcome {
            Ok(_) => redirect("/admin"),
            Err(UpdateError::Store(e)) => Err(ServerError::from(e)),
            Err(e) => Err(ServerError::BadRequest(e.to_string())),
        };
    }

    let body = match &outcome {
        Ok(update) => ActionResponse {
            success: true,
            message: if update.no_change {
                "Le statut était déjà à jour".to_string()
            } else {
                "Statut mis à jour avec succès".to_string()
            },
            update: Some(update),
        },
        Err(e) => ActionResponse {
            success: false,
            message: e.to_string(),
            update: None,
        },
    };

    json_response(200, &body)
}
