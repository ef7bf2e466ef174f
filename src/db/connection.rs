use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::db::store::{SqliteStore, StoreError};

#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_millis(5_000),
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    fn open(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    /// Opens a connection for the duration of `f`.
    /// The connection is dropped when `f` returns, whatever the outcome.
    pub fn with_conn<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<StoreError>,
    {
        let conn = self.open()?;
        f(&conn)
    }

    /// Same as `with_conn`, wrapped in the `DataStore` boundary.
    pub fn with_store<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&SqliteStore<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.with_conn(|conn| f(&SqliteStore::new(conn)))
    }

    /// Fails if the database cannot be opened and queried.
    pub fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

/// Initialize database from a SQL schema file
pub fn init_db(db: &Database, schema_path: impl AsRef<Path>) -> Result<(), StoreError> {
    let schema_path = schema_path.as_ref();
    let schema_sql = fs::read_to_string(schema_path)?;

    db.with_conn(|conn| -> Result<(), StoreError> {
        conn.execute_batch(&schema_sql)?;
        Ok(())
    })?;

    tracing::info!(schema = %schema_path.display(), "database schema applied");
    Ok(())
}
