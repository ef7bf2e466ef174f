use crate::config::DashboardConfig;
use crate::db::Database;
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{admin, public};
use crate::responses::html_response;
use crate::templates::pages;
use astra::Request;

/// Everything a request handler needs, shared by all workers.
pub struct App {
    pub db: Database,
    pub dashboard: DashboardConfig,
}

const KNOWN_PATHS: &[&str] = &["/", "/inscription", "/contact", "/admin", "/admin/stats"];

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    tracing::debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => html_response(pages::home_page()),

        ("GET", "/inscription") => html_response(pages::registration_page()),
        ("POST", "/inscription") => public::submit_registration(&mut req, app),

        ("GET", "/contact") => html_response(pages::contact_page()),
        ("POST", "/contact") => public::submit_contact(&mut req, app),

        ("GET", "/admin") => admin::dashboard(&req, app),
        ("POST", "/admin") => admin::action(&mut req, app),
        ("GET", "/admin/stats") => admin::stats(app),

        (_, p) if KNOWN_PATHS.contains(&p) => Err(ServerError::MethodNotAllowed),
        _ => Err(ServerError::NotFound),
    }
}
