// src/handlers/mod.rs
use astra::Request;
use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;
use std::io::Read;

use crate::errors::ServerError;
use crate::domain::forms::FormFields;

pub mod admin;
pub mod public;

/// Largest form body accepted, in bytes.
const MAX_FORM_BYTES: u64 = 64 * 1024;

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn read_form(req: &mut Request) -> Result<FormFields, ServerError> {
    let mut raw = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_FORM_BYTES + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("Corps de requête illisible : {e}")))?;

    if raw.len() as u64 > MAX_FORM_BYTES {
        return Err(ServerError::BadRequest("Requête trop volumineuse".into()));
    }

    Ok(url::form_urlencoded::parse(&raw).into_owned().collect())
}
