// src/db/store.rs
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
}

/// One result row, columns kept in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, value)| value)
    }

    /// Text view of a cell. NULL and blobs read as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(value_as_text)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(value_as_integer)
    }

    /// First column as an integer, for `COUNT(*)` style queries.
    pub fn first_integer(&self) -> Option<i64> {
        self.columns.first().and_then(|(_, v)| value_as_integer(v))
    }
}

pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Null | Value::Blob(_) => None,
    }
}

pub fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Quote a table or column name for interpolation into SQL.
/// Names only ever come from the fixed candidate lists in `domain::schema`.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// The tabular store the services run against: metadata probes,
/// positional-parameter statements, and explicit transaction control.
pub trait DataStore {
    fn list_tables(&self) -> Result<Vec<String>, StoreError>;
    fn list_columns(&self, table: &str) -> Result<Vec<String>, StoreError>;
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError>;
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, StoreError>;
    fn last_insert_id(&self) -> i64;
    fn begin(&self) -> Result<(), StoreError>;
    fn commit(&self) -> Result<(), StoreError>;
    fn rollback(&self) -> Result<(), StoreError>;
}

/// Run `f` inside a transaction: commit on `Ok`, roll back on `Err`.
pub fn in_transaction<S, T, E, F>(store: &S, f: F) -> Result<T, E>
where
    S: DataStore + ?Sized,
    E: From<StoreError>,
    F: FnOnce(&S) -> Result<T, E>,
{
    store.begin()?;

    match f(store) {
        Ok(value) => {
            if let Err(e) = store.commit() {
                rollback_quietly(store);
                return Err(e.into());
            }
            Ok(value)
        }
        Err(e) => {
            rollback_quietly(store);
            Err(e)
        }
    }
}

fn rollback_quietly<S: DataStore + ?Sized>(store: &S) {
    if let Err(e) = store.rollback() {
        tracing::error!(error = %e, "transaction rollback failed");
    }
}

/// `DataStore` over a borrowed SQLite connection.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl DataStore for SqliteStore<'_> {
    fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tables = Vec::new();
        for r in rows {
            tables.push(r?);
        }
        Ok(tables)
    }

    fn list_columns(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let rows = stmt.query_map([table], |row| row.get::<_, String>(0))?;

        let mut columns = Vec::new();
        for r in rows {
            columns.push(r?);
        }
        Ok(columns)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                columns.push((name.clone(), row.get::<_, Value>(i)?));
            }
            out.push(Row::new(columns));
        }
        Ok(out)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, StoreError> {
        Ok(self.conn.execute(sql, params_from_iter(params.iter()))?)
    }

    fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    fn begin(&self) -> Result<(), StoreError> {
        // IMMEDIATE takes the write lock now, so the read-back cannot race another writer.
        Ok(self.conn.execute_batch("BEGIN IMMEDIATE")?)
    }

    fn commit(&self) -> Result<(), StoreError> {
        Ok(self.conn.execute_batch("COMMIT")?)
    }

    fn rollback(&self) -> Result<(), StoreError> {
        Ok(self.conn.execute_batch("ROLLBACK")?)
    }
}
