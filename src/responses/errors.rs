use crate::errors::ServerError;
use crate::templates::pages::error_page;
use astra::{Body, Response, ResponseBuilder};

/// Convert a ServerError into an HTML error page with the matching status.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status_code();
    match &err {
        ServerError::DbError(msg) => tracing::error!(status, error = %msg, "request failed"),
        ServerError::InternalError => tracing::error!(status, "request failed"),
        _ => tracing::debug!(status, error = %err, "request rejected"),
    }

    let message = match err {
        ServerError::NotFound => "Page introuvable".to_string(),
        ServerError::MethodNotAllowed => "Méthode non autorisée".to_string(),
        ServerError::BadRequest(msg) => msg,
        ServerError::DbError(_) => "Erreur de base de données".to_string(),
        ServerError::InternalError => "Erreur interne du serveur".to_string(),
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(error_page(status, &message).into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
