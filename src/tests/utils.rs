use crate::config::DashboardConfig;
use crate::db::connection::{init_db, Database};
use crate::db::store::{DataStore, Row, StoreError};
use crate::router::App;
use astra::Response;
use rusqlite::types::Value;
use std::cell::Cell;
use std::io::Read;
use tempfile::TempDir;

/// An `App` over a fresh database with the production schema.
/// The database lives in a temp dir removed when this is dropped.
pub struct TestApp {
    pub app: App,
    _dir: TempDir,
}

impl TestApp {
    pub fn db(&self) -> &Database {
        &self.app.db
    }
}

pub fn init_test_app() -> TestApp {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db = Database::new(dir.path().join("test.sqlite3"));

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    TestApp {
        app: App {
            db,
            dashboard: DashboardConfig::default(),
        },
        _dir: dir,
    }
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body()
        .reader()
        .read_to_string(&mut body)
        .expect("failed to read response body");
    body
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp)).expect("response body is not JSON")
}

/// Wraps a store and counts `execute` calls, so tests can assert how many
/// writes an operation issued.
pub struct CountingStore<S> {
    inner: S,
    writes: Cell<usize>,
}

impl<S: DataStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            writes: Cell::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl<S: DataStore> DataStore for CountingStore<S> {
    fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        self.inner.list_tables()
    }

    fn list_columns(&self, table: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list_columns(table)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        self.inner.query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, StoreError> {
        self.writes.set(self.writes.get() + 1);
        self.inner.execute(sql, params)
    }

    fn last_insert_id(&self) -> i64 {
        self.inner.last_insert_id()
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.inner.begin()
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.inner.commit()
    }

    fn rollback(&self) -> Result<(), StoreError> {
        self.inner.rollback()
    }
}
