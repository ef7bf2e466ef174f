use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

/// `303 See Other` back to a page after a form post.
pub fn redirect(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}
