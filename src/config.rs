// src/config.rs
use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration: defaults, then `config/default.*`,
/// then `config/local.*`, then `SCHOOL__SECTION__KEY` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub schema_path: PathBuf,
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    pub registrations_limit: usize,
    pub contacts_limit: usize,
    pub new_window_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            registrations_limit: 50,
            contacts_limit: 15,
            new_window_days: 7,
        }
    }
}

/// A century; anything wider is a typo.
const MAX_NEW_WINDOW_DAYS: i64 = 36_500;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let dashboard = DashboardConfig::default();

    Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("server.max_workers", 8)?
        .set_default("database.path", "school.sqlite3")?
        .set_default("database.schema_path", "sql/schema.sql")?
        .set_default("database.busy_timeout_ms", 5_000)?
        .set_default("logging.level", "info")?
        .set_default("dashboard.registrations_limit", dashboard.registrations_limit as u64)?
        .set_default("dashboard.contacts_limit", dashboard.contacts_limit as u64)?
        .set_default("dashboard.new_window_days", dashboard.new_window_days)
}

impl AppConfig {
    /// Load configuration from every source, later sources winning.
    pub fn load() -> Result<Self> {
        let config = with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SCHOOL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to load configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_workers == 0 {
            bail!("server.max_workers must be greater than 0");
        }
        if self.dashboard.registrations_limit == 0 || self.dashboard.contacts_limit == 0 {
            bail!("dashboard limits must be greater than 0");
        }
        if !(1..=MAX_NEW_WINDOW_DAYS).contains(&self.dashboard.new_window_days) {
            bail!(
                "dashboard.new_window_days must be between 1 and {}",
                MAX_NEW_WINDOW_DAYS
            );
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            bail!(
                "invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                LOG_LEVELS
            );
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid listen address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }
}
