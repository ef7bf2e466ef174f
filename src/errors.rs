use astra::Response;
use thiserror::Error;

use crate::db::store::StoreError;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        ServerError::DbError(err.to_string())
    }
}

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::MethodNotAllowed => 405,
            ServerError::BadRequest(_) => 400,
            ServerError::DbError(_) | ServerError::InternalError => 500,
        }
    }
}
