use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};
use serde::Serialize;

pub fn json_response<T: Serialize>(status: u16, payload: &T) -> ResultResp {
    let body = serde_json::to_vec(payload).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize response body");
        ServerError::InternalError
    })?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}
