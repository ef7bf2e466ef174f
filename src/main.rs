use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::responses::error_to_response;
use crate::router::{handle, App};
use anyhow::Context;
use astra::Server;

mod config;
mod db;
mod domain;
mod errors;
mod handlers;
mod logging;
mod responses;
mod router;
mod services;
mod templates;

#[cfg(test)]
mod tests;

fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let _log_guard = logging::init_logging(&config.logging.level, config.logging.file_path.as_deref())?;

    // 1️⃣ Create the database handle and make sure it answers
    let db = Database::new(config.database.path.clone()).with_busy_timeout(config.busy_timeout());
    db.ping()
        .with_context(|| format!("cannot open database {}", config.database.path.display()))?;

    // 2️⃣ Apply the schema (idempotent)
    init_db(&db, &config.database.schema_path).context("database initialization failed")?;

    // 3️⃣ Start the server
    let addr = config.socket_addr()?;
    tracing::info!(%addr, workers = config.server.max_workers, "starting server");

    let app = App {
        db,
        dashboard: config.dashboard,
    };
    let server = Server::bind(&addr).max_workers(config.server.max_workers);

    // 4️⃣ Serve requests; handler errors become HTML error pages
    server
        .serve(move |req, _info| handle(req, &app).unwrap_or_else(error_to_response))
        .context("server ended with error")?;

    tracing::info!("server shut down cleanly");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        tracing::error!("fatal: {e:#}");
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}
